// Watched-author matching.
//
// Feeds list authors either in full ("First Last") or abbreviated
// ("F. Last"). A watched name matches a listed author when the strings are
// identical, or when the listed author is an initial followed by a period
// that agrees with the watched first name and the watched surname appears
// in it. Nothing fuzzier than that.

/// How a watched author was recognized in an author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorMatchKind {
    Full,
    Abbreviated,
}

impl AuthorMatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorMatchKind::Full => "Full match",
            AuthorMatchKind::Abbreviated => "Abbreviated match",
        }
    }
}

impl std::fmt::Display for AuthorMatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compare one watched full name against one listed author.
pub fn author_match(watched: &str, author: &str) -> Option<AuthorMatchKind> {
    if watched == author {
        return Some(AuthorMatchKind::Full);
    }

    let mut author_chars = author.chars();
    let (Some(initial), Some('.')) = (author_chars.next(), author_chars.next()) else {
        return None;
    };
    if watched.chars().next() != Some(initial) {
        return None;
    }

    let surname = watched.split_whitespace().last()?;
    author
        .contains(surname)
        .then_some(AuthorMatchKind::Abbreviated)
}

/// Watched authors found in one paper's author list.
///
/// `names` and `reasons` are parallel; a watched name appears once per
/// listed author it matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorHits {
    pub names: Vec<String>,
    pub reasons: Vec<String>,
}

impl AuthorHits {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Checks author lists against the configured watched names.
pub struct AuthorMatcher {
    watched: Vec<String>,
}

impl AuthorMatcher {
    pub fn new(watched: Vec<String>) -> Self {
        Self { watched }
    }

    pub fn watched(&self) -> &[String] {
        &self.watched
    }

    pub fn check(&self, authors: &[String]) -> AuthorHits {
        let mut hits = AuthorHits::default();
        for author in authors {
            for watched in &self.watched {
                if let Some(kind) = author_match(watched, author) {
                    hits.names.push(watched.clone());
                    hits.reasons.push(format!("{kind} {watched}"));
                }
            }
        }
        hits
    }
}
