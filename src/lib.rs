//! ScriptScope - bundler fingerprinting for client-side JavaScript
//!
//! This crate inspects the scripts a web page ships and reports which bundler
//! produced them, how much duplicated module code webpack emitted, and how
//! many custom elements get registered.

pub mod analysis;
pub mod config;
pub mod export;
pub mod logger;
pub mod pattern;
pub mod report;
pub mod source;
