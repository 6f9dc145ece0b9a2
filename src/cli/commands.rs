//! Command dispatch: loads settings, wires services and runs one subcommand.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::LoadedDocument;
use crate::application::{ApplicationError, Explorer};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{breadcrumbs, TextScope};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Input path meaning "read from stdin".
const STDIN_MARKER: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run `domscope --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { input } => cmd_tree(&container, input),
        Commands::Export { input, output } => cmd_export(&container, input, output.as_deref()),
        Commands::Blocks {
            input,
            tags,
            scope,
            json,
        } => cmd_blocks(&container, input, tags.as_deref(), *scope, *json),
        Commands::Breadcrumbs { input, query } => cmd_breadcrumbs(&container, input, query),
        Commands::Explore { input } => cmd_explore(&container, input),
        Commands::Report { input, output } => cmd_report(&container, input, output.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Load a document from a file, or from stdin for `-`.
fn load(container: &ServiceContainer, input: &Path) -> CliResult<LoadedDocument> {
    if input.as_os_str() == STDIN_MARKER {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| InfraError::io("read stdin", e))?;
        return Ok(container.documents.load_str(STDIN_MARKER, &content)?);
    }
    Ok(container.documents.load(input)?)
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let document = load(container, input)?;
    print!("{}", container.documents.render(&document)?);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let document = load(container, input)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.export_file.clone());
    container.documents.export(&document, &path)?;
    output::action(
        "Exported",
        &format!("{} element(s) to {}", document.tree.len(), path.display()),
    );
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_blocks(
    container: &ServiceContainer,
    input: &Path,
    tags: Option<&[String]>,
    scope: Option<TextScope>,
    json: bool,
) -> CliResult<()> {
    let document = load(container, input)?;
    let tags = tags.unwrap_or(container.settings.block_tags.as_slice());
    let scope = scope.unwrap_or(container.settings.text_scope);
    debug!("block tags: {}, scope: {}", tags.iter().join(","), scope);

    let blocks = container.documents.text_blocks(&document, tags, scope)?;
    if json {
        let rendered = serde_json::to_string_pretty(&blocks)
            .map_err(ApplicationError::from)?;
        output::info(&rendered);
        return Ok(());
    }

    if blocks.is_empty() {
        output::warning("no text found in block tags");
    }
    for (tag, texts) in &blocks {
        output::header(&format!("{}:", tag));
        for text in texts {
            output::detail(&format!("- {}", text));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_breadcrumbs(container: &ServiceContainer, input: &Path, query: &str) -> CliResult<()> {
    let document = load(container, input)?;
    let explorer = Explorer::new(&document.tree)
        .ok_or_else(|| ApplicationError::NoElements(document.source.clone()))?;

    let matches = explorer.search(query);
    if matches.is_empty() {
        output::warning(&format!("no element matches '{}'", query));
    }
    for idx in matches {
        output::info(&breadcrumbs(&document.tree, idx));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_explore(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    if input.as_os_str() == STDIN_MARKER {
        return Err(CliError::InvalidArgs(
            "explore reads commands from stdin, pass the document as a file".to_string(),
        ));
    }
    let document = load(container, input)?;
    let mut explorer = Explorer::new(&document.tree)
        .ok_or_else(|| ApplicationError::NoElements(document.source.clone()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    explorer
        .run(stdin.lock(), &mut stdout.lock())
        .map_err(|e| InfraError::io("explorer session", e))?;
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_report(container: &ServiceContainer, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let document = load(container, input)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.report_file.clone());
    let settings = &container.settings;
    container
        .documents
        .write_report(&document, &settings.block_tags, settings.text_scope, &path)?;
    output::action("Report written", &path.display());
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |path: &PathBuf| {
                let state = if path.exists() { "found" } else { "not found" };
                format!("{} ({})", path.display(), state)
            };
            match global_config_path() {
                Some(path) => output::action("global", &describe(&path)),
                None => output::action("global", "unavailable (no home directory)"),
            }
            let local = local
                .map(Path::to_path_buf)
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            output::action("local", &describe(&local));
        }
    }
    Ok(())
}
