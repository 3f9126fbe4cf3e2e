//! Sales board client library: CLI definition and board clients.

pub mod board_client;
pub mod cli;
