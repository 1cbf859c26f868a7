// Digest composition and dispatch.

pub mod compose;
pub mod dispatch;

pub use compose::{compose, digest_path, write_digest};
pub use dispatch::{Delivery, Dispatcher, RunOutcome};
