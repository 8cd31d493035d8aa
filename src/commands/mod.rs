// src/commands/mod.rs
pub mod generate;
pub mod version;
