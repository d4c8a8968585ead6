//! Scripted study sessions for the command line.

pub mod commands;
pub mod config;
pub mod logging;
pub mod script;
pub mod session;
pub mod study;
pub mod types;
