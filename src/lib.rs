pub mod algorithm;
pub mod basic_terminal;
pub mod config;
pub mod input;
pub mod validate;
