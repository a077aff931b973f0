//! Operation executors.
//!
//! Each executor runs one iteration against an already opened client and
//! returns a [`Completion`](crate::recorder::Completion) or the error that
//! ended the iteration. Timing and outcome recording happen in the caller.

mod consume;
mod download;
mod produce;
pub mod progress;
mod upload;

pub use consume::{attributes_to_json, consume, NO_MESSAGES, RECEIVED};
pub use download::{download, DOWNLOADED};
pub use produce::{produce, SENT};
pub use progress::StreamProgress;
pub use upload::{upload, UPLOADED};
