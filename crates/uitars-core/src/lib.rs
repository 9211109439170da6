//! uitars-core — action grammar for UI-TARS style GUI agents.
//!
//! A vision-language model answers each turn with
//! `Thought: ...\nAction: name(key='value', ...)`. This crate defines the
//! closed action vocabulary, parses model output into a [`ParsedOutput`],
//! renders the matching system prompt, and holds the executor config.
//! Carrying the actions out is `uitars-exec`'s job.

pub mod action;
pub mod config;
pub mod parser;
pub mod prompt;

pub use action::{Action, ActionKind, ParamSpec, ParsedOutput, ScrollDirection};
pub use config::{Config, ExecutorConfig};
pub use parser::{parse, parse_action};
