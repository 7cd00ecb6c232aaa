//! UCI (Universal Chess Interface) protocol implementation

pub mod commands;
pub mod options;
pub mod output;
pub mod parser;

pub use commands::{GoParams, UciCommand};
pub use options::{option_table, EngineOption};
pub use output::{send_response, SearchInfo, UciResponse};
pub use parser::parse_uci_command;

/// Name reported in `id name`, followed by the crate version
pub const ENGINE_NAME: &str = "Aggro";
pub const ENGINE_AUTHOR: &str = "Aggro contributors";
