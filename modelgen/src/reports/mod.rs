//! Report data structures for commands.
//!
//! Commands build reports, then render them to an [`Output`] target.

mod models;
mod output;

pub use models::{DialectSource, GeneratedReport, PlanReport};
pub use output::{Output, Report, TerminalOutput};
