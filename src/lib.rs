//! domscope: build an element tree from markup, export it, render and navigate it.
//!
//! Layers, innermost first:
//! - [`domain`]: element tree arena, tree builder, presentation helpers
//! - [`application`]: export/import, explorer, report, document service
//! - [`infrastructure`]: filesystem and markup-parser adapters, service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
