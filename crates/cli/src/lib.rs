//! # climate-qa-cli
//!
//! Terminal front end for the climate assistant. The binary in `main.rs` only
//! parses arguments and wires up logging; the loops and printers live here so
//! they can be driven from tests with in-memory readers and writers.

pub mod chat;
pub mod commands;
