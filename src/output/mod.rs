//! Console presentation and the Markdown run report

pub mod console;
pub mod report;

pub use console::ConsoleFormatter;
pub use report::{render_report, save_report};
