//! termshift command-line tool
//!
//! Sends documents to the analysis service and renders the flagged clauses
//! for the terminal, as HTML, or as JSON.

pub mod cli;
pub mod render;

pub use cli::{run, Cli, Command};
pub use render::{render, Format};
