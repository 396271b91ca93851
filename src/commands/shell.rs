//! Interactive package page.
//!
//! Reads one command per line, keeps the search/category state between
//! commands and re-renders the list whenever the query changes or a write
//! succeeds.

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    api::{AdminApi, CategoryFilter, PackageId},
    notify::Notifier,
    page::{ListView, PackageAction, PackagesPage, available_actions, render},
};

const HELP: &str = "\
Commands:
  search [TEXT]          filter by text (no TEXT clears the search)
  category CATEGORY      all, frontend, backend, fullstack, utility, plugin
  refresh                reload the list
  show ID                full details of a package
  edit ID                edit a package
  approve ID             approve a pending package
  feature ID             feature a package
  delete ID              delete a package
  stats                  summary figures
  categories             list category values
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Search(String),
    Category(CategoryFilter),
    Refresh,
    Action(PackageAction, PackageId),
    Stats,
    Categories,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "search" => ShellCommand::Search(rest.to_string()),
            "category" => {
                if rest.is_empty() {
                    return Err(anyhow!("Usage: category CATEGORY"));
                }
                ShellCommand::Category(rest.parse()?)
            }
            "refresh" => ShellCommand::Refresh,
            "stats" => ShellCommand::Stats,
            "categories" => ShellCommand::Categories,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                let action: PackageAction = other
                    .parse()
                    .map_err(|_| anyhow!("Unknown command '{}'. Type 'help'.", other))?;
                let id = rest
                    .parse::<PackageId>()
                    .map_err(|_| anyhow!("Usage: {} ID", other))?;
                ShellCommand::Action(action, id)
            }
        };
        Ok(Some(command))
    }
}

async fn reload<A: AdminApi, N: Notifier, W: Write>(
    page: &PackagesPage<A, N>,
    out: &mut W,
) -> Result<ListView> {
    writeln!(out, "{}", render::LOADING)?;
    let view = page.load().await;
    write!(out, "{}", render::list(&view))?;
    Ok(view)
}

/// Runs the shell until `quit` or end of input.
pub async fn run_shell<A, N, I, W>(mut page: PackagesPage<A, N>, input: I, out: &mut W) -> Result<()>
where
    A: AdminApi,
    N: Notifier,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", render::header())?;
    write!(out, "{}", render::filters(page.query()))?;
    let mut view = reload(&page, out).await?;
    write!(out, "> ")?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Stats => write!(out, "{}", render::stats())?,
            ShellCommand::Categories => writeln!(out, "{}", render::category_options())?,
            ShellCommand::Search(search) => {
                page.set_search(search);
                write!(out, "{}", render::filters(page.query()))?;
                view = reload(&page, out).await?;
            }
            ShellCommand::Category(category) => {
                page.set_category(category);
                write!(out, "{}", render::filters(page.query()))?;
                view = reload(&page, out).await?;
            }
            ShellCommand::Refresh => {
                page.refresh();
                view = reload(&page, out).await?;
            }
            ShellCommand::Action(action, id) => {
                let Some(pkg) = view.find(&id) else {
                    writeln!(out, "No package with id {} in the current list.", id)?;
                    write!(out, "> ")?;
                    out.flush()?;
                    continue;
                };

                if !available_actions(pkg).contains(&action) {
                    writeln!(out, "{} is not available for package {}.", action.label(), id)?;
                } else if let Some(mutation) = action.mutation() {
                    // Failures were already reported through the notifier.
                    if page.mutate(mutation, &id).await.is_ok() {
                        view = reload(&page, out).await?;
                    }
                } else if action == PackageAction::Preview {
                    write!(out, "{}", render::preview(pkg))?;
                } else {
                    writeln!(out, "Editing packages is not available.")?;
                }
            }
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
