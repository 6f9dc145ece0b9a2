//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::TextScope;

/// Markup tree explorer: build an element tree, export it, render and navigate it
#[derive(Parser, Debug)]
#[command(name = "domscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Local config file (default: ./.domscope.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the class tree of a document
    Tree {
        /// Markup or exported JSON file (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Write the element tree as JSON
    Export {
        /// Markup file (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (default: export_file setting)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print text grouped by block tag
    Blocks {
        /// Markup file (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Block tags, comma separated (default: block_tags setting)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// exclusive: nested block text stays with the inner block; nested: outer blocks repeat it
        #[arg(short, long)]
        scope: Option<TextScope>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print root-to-node paths of all elements matching a query
    Breadcrumbs {
        /// Markup or exported JSON file (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Case-insensitive substring of the node identifier
        query: String,
    },

    /// Navigate the tree interactively (commands read from stdin)
    Explore {
        /// Markup or exported JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Write text blocks and class tree to a report file
    Report {
        /// Markup file (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (default: report_file setting)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
