//! Console input
//!
//! Reads user intents line by line and forwards toggles to the controller.

use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error};

use dish_core::{DashboardState, DishId};
use dish_sync::SyncController;

use crate::render::render;
use crate::view::DashboardView;

pub const USAGE: &str = "Commands: toggle <id> (t <id>), list, help, quit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw identifier as typed
    Toggle(String),
    List,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("toggle needs a dish id")]
    MissingId,

    #[error("unknown command: {0}")]
    Unknown(String),
}

/// Parse one line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_lowercase().as_str() {
        "toggle" | "t" => {
            let id = words.next().ok_or(CommandError::MissingId)?;
            Command::Toggle(id.to_string())
        }
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Map a typed identifier onto the snapshot's identifier.
///
/// An exact match wins; otherwise the display form is compared so `42` also
/// finds a string id `"42"`. Unknown ids are passed on as typed.
pub fn resolve_dish_id(state: &DashboardState, raw: &str) -> DishId {
    let typed = DishId::parse(raw);
    if state.dish(&typed).is_some() {
        return typed;
    }
    state
        .dishes
        .iter()
        .find(|d| d.dish_id.to_string() == raw)
        .map(|d| d.dish_id.clone())
        .unwrap_or(typed)
}

/// Process input until `quit` or end of input.
///
/// Toggles run as detached tasks so a slow service never blocks input; they
/// are left to finish on their own after this returns.
pub async fn run<R, W>(controller: &SyncController, input: R, mut out: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => {
                debug!("Quit requested");
                break;
            }
            Ok(Some(Command::Help)) => writeln!(out, "{}", USAGE)?,
            Ok(Some(Command::List)) => {
                let view = DashboardView::from_state(&controller.store().snapshot());
                write!(out, "{}", render(&view))?;
            }
            Ok(Some(Command::Toggle(raw))) => {
                let id = resolve_dish_id(&controller.store().snapshot(), &raw);
                let controller = controller.clone();
                tokio::spawn(async move {
                    let outcome = controller.toggle(&id).await;
                    if !outcome.persisted {
                        error!("Toggle of dish {} was not confirmed by the service", id);
                    }
                });
            }
            Err(e) => writeln!(out, "{}. {}", e, USAGE)?,
        }
        out.flush()?;
    }
    Ok(())
}
