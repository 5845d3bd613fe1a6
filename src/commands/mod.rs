//! User-facing actions on a compression session.
//!
//! - [`WorkflowController`]: Select, configure, compress and reset
//! - [`download_name`]: Name a download is saved under

mod workflow;
mod download;

pub use workflow::{CompressOutcome, WorkflowController};
pub use download::download_name;
