//! Interactive explorer over a built element tree.
//!
//! The explorer borrows the tree immutably and keeps a single cursor into it.
//! Commands only ever move the cursor; the tree itself never changes.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::Colorize;
use generational_arena::Index;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{
    breadcrumbs, format_identifier, render_tree, DomainError, DomainResult, ElementNode,
    ElementTree,
};

/// Prompt listing the command surface.
pub const PROMPT: &str = "Command (ls, cd <index/class>, cd .., expand, search <text>, exit):";

/// Cursor moves that could not be carried out. The cursor stays where it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("already at the root")]
    AtRoot,

    #[error("index {index} out of range ({len} children)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("no child with matching class: {0}")]
    NoClassMatch(String),
}

/// One line of explorer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    /// `cd ..`, `cd <index>` or `cd <class text>`
    ChangeDir(String),
    Expand,
    Search(String),
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, arg) = match line.split_once(char::is_whitespace) {
            Some((keyword, arg)) => (keyword, Some(arg.trim())),
            None => (line, None),
        };

        match (keyword.to_ascii_lowercase().as_str(), arg) {
            ("ls", None) => Ok(Command::List),
            ("expand", None) => Ok(Command::Expand),
            ("exit", None) => Ok(Command::Exit),
            ("cd", Some(target)) => Ok(Command::ChangeDir(target.to_string())),
            ("search", query) => Ok(Command::Search(query.unwrap_or_default().to_string())),
            _ => Err(UnknownCommand(line.to_string())),
        }
    }
}

/// Whether the session goes on after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Stateful cursor over one element tree.
#[derive(Debug)]
pub struct Explorer<'t> {
    tree: &'t ElementTree,
    current: Index,
}

impl<'t> Explorer<'t> {
    /// Start at the root; `None` for an empty tree.
    pub fn new(tree: &'t ElementTree) -> Option<Self> {
        tree.root().map(|current| Self { tree, current })
    }

    /// Start at an arbitrary node of `tree`.
    pub fn at(tree: &'t ElementTree, current: Index) -> DomainResult<Self> {
        if !tree.contains(current) {
            return Err(DomainError::UnknownNode(current));
        }
        Ok(Self { tree, current })
    }

    pub fn current(&self) -> Index {
        self.current
    }

    pub fn current_node(&self) -> Option<&'t ElementNode> {
        self.tree.get_node(self.current)
    }

    /// Children of the current node as `(position, identifier)`.
    pub fn list(&self) -> Vec<(usize, String)> {
        self.tree
            .children_of(self.current)
            .iter()
            .filter_map(|&child| self.tree.get_node(child))
            .map(format_identifier)
            .enumerate()
            .collect()
    }

    /// Move to the parent.
    pub fn ascend(&mut self) -> Result<Index, NavigationError> {
        let parent = self
            .tree
            .parent_of(self.current)
            .ok_or(NavigationError::AtRoot)?;
        self.current = parent;
        Ok(parent)
    }

    /// Move by `..`, child position, or first child whose class list contains `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn descend(&mut self, target: &str) -> Result<Index, NavigationError> {
        if target == ".." {
            return self.ascend();
        }

        let children = self.tree.children_of(self.current);
        let next = match target.parse::<i64>() {
            Ok(index) => usize::try_from(index)
                .ok()
                .and_then(|i| children.get(i))
                .copied()
                .ok_or(NavigationError::IndexOutOfRange {
                    index,
                    len: children.len(),
                })?,
            Err(_) => children
                .iter()
                .copied()
                .find(|&child| {
                    self.tree
                        .get_node(child)
                        .is_some_and(|node| node.data.classes.join(" ").contains(target))
                })
                .ok_or_else(|| NavigationError::NoClassMatch(target.to_string()))?,
        };

        self.current = next;
        Ok(next)
    }

    /// Rendering of the subtree at the cursor.
    pub fn expand(&self) -> String {
        render_tree(self.tree, self.current)
    }

    /// Case-insensitive substring search over identifiers below the cursor, pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> Vec<Index> {
        let query = query.to_lowercase();
        self.tree
            .iter_from(self.current)
            .filter(|(_, node)| format_identifier(node).to_lowercase().contains(&query))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn breadcrumbs(&self) -> String {
        breadcrumbs(self.tree, self.current)
    }

    /// Apply one command and report its outcome on `out`.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::List => self.write_children(out)?,
            Command::ChangeDir(target) => {
                if let Err(e) = self.descend(target) {
                    debug!("navigation miss: {}", e);
                    writeln!(out, "{} {}", "Cannot move:".red(), e)?;
                }
            }
            Command::Expand => {
                writeln!(out, "\n{}", "Subtree from current node:".cyan().bold())?;
                write!(out, "{}", self.expand())?;
            }
            Command::Search(query) => {
                let results = self.search(query);
                if results.is_empty() {
                    writeln!(out, "{}", "No matches found.".yellow())?;
                } else {
                    writeln!(out, "\n{}", "Search results:".cyan().bold())?;
                    for (i, idx) in results.iter().enumerate() {
                        if let Some(node) = self.tree.get_node(*idx) {
                            writeln!(out, "  [{}] {}", i, format_identifier(node))?;
                        }
                    }
                }
            }
            Command::Exit => {
                writeln!(out, "Exiting explorer.")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Read commands line by line until `exit` or end of input.
    #[instrument(level = "debug", skip_all)]
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            writeln!(out, "\n{} {}", "Path:".cyan().bold(), self.breadcrumbs())?;
            self.write_children(out)?;
            write!(out, "\n{} ", PROMPT.cyan())?;
            out.flush()?;

            let Some(line) = lines.next().transpose()? else {
                writeln!(out)?;
                debug!("end of input, leaving explorer");
                return Ok(());
            };

            match line.parse::<Command>() {
                // `ls` only re-lists, which every iteration does anyway
                Ok(Command::List) => {}
                Ok(command) => {
                    if self.execute(&command, out)? == Flow::Exit {
                        return Ok(());
                    }
                }
                Err(e) => writeln!(out, "{}", e.to_string().red())?,
            }
        }
    }

    fn write_children<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let children = self.list();
        if children.is_empty() {
            writeln!(out, "{}", "No children.".yellow())?;
        } else {
            writeln!(out, "{}", "Children:".bold())?;
            for (i, identifier) in children {
                writeln!(out, "  [{}] {}", i, identifier)?;
            }
        }
        Ok(())
    }
}
