//! Job hunter library

pub mod cli;
pub mod config;
pub mod discovery;
pub mod embeddings;
pub mod error;
pub mod input;
pub mod letters;
pub mod llm;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod scoring;
pub mod tailoring;
pub mod tracker;

pub use config::Config;
pub use error::{JobHunterError, Result};
pub use pipeline::{Pipeline, RunContext, RunOptions};
