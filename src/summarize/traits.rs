// Summarizer trait: optional abstract shortening.
//
// Purely functional from the pipeline's point of view: text in, shorter
// text out. The default implementation runs locally; a model-backed one
// can replace it without touching the collector.

/// Trait for condensing an abstract to a handful of sentences.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, sentences: usize) -> String;
}
