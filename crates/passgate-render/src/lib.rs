//! Rendering for CI surfaces: notifier tables, Markdown summaries, GitHub annotations.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod messages;
mod model;
mod table;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use messages::{failure_message, prevalidated_message, success_message};
pub use model::RenderableReport;
pub use table::render_table;
