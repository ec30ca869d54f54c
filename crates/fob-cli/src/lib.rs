//! `frida-compile` — the command-line frontend over `fob-bundler`/`fob-config`/`fob-graph`.

pub mod cli;
pub mod commands;
pub mod compiler;
pub mod env;
pub mod error;
pub mod logger;
pub mod ui;
