// Text normalization: markup stripping and cleanup of raw feed fields.
//
// Everything here is a pure string transform. The matchers downstream assume
// their input has already been through these functions.

pub mod normalize;

pub use normalize::{collapse_whitespace, extract_abstract, split_authors, strip_markup};
