//! Line-based terminal front end.
//!
//! Reads one command per line and drives the [`ConsoleController`] with it.
//! After every command the notices the controller raised are printed as
//! `[severity] message`.
//!
//! ```text
//! > go domain/justine.lol
//! domain justine.lol (view)
//!   domain:name = justine.lol
//!   ...
//! > edit
//! > set domain:registrant GK Chesterton
//! > save
//! ```

use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::application::ConsoleController;
use crate::domain::page::{Page, PageMode};

pub const HELP: &str = "\
commands:
  go <location>          open a page (dashboard, resources, domain/<name>, contact, ...)
  show [--json]          print the current page
  edit                   make the current object editable
  set <field> <value...> change a field, e.g. set domain:contact[0].@type tech
  add <group>            append an empty row to a repeated group
  remove <group> <row>   delete a row of a repeated group
  save                   send the changes
  cancel                 discard the changes
  help                   show this text
  quit                   leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Go(String),
    Show { json: bool },
    Edit,
    Set { field: String, value: String },
    Add(String),
    Remove { group: String, row: usize },
    Save,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command \"{0}\" (try help)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl ReplCommand {
    /// Parses one non-empty input line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match word {
            "go" => Ok(ReplCommand::Go(rest.to_string())),
            "show" => match rest {
                "" => Ok(ReplCommand::Show { json: false }),
                "--json" => Ok(ReplCommand::Show { json: true }),
                _ => Err(ParseError::Usage("show [--json]")),
            },
            "edit" => Ok(ReplCommand::Edit),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(ParseError::Usage("set <field> <value...>"));
                }
                Ok(ReplCommand::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "add" if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
                Ok(ReplCommand::Add(rest.to_string()))
            }
            "add" => Err(ParseError::Usage("add <group>")),
            "remove" => {
                let mut words = rest.split_whitespace();
                match (words.next(), words.next().map(str::parse::<usize>), words.next()) {
                    (Some(group), Some(Ok(row)), None) => Ok(ReplCommand::Remove {
                        group: group.to_string(),
                        row,
                    }),
                    _ => Err(ParseError::Usage("remove <group> <row>")),
                }
            }
            "save" => Ok(ReplCommand::Save),
            "cancel" => Ok(ReplCommand::Cancel),
            "help" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" => Ok(ReplCommand::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Reads commands from `input` until it ends or `quit` is entered.
///
/// # Errors
///
/// Only I/O errors on `input` or `output`; console failures are printed.
pub async fn run_repl<R, W>(
    controller: &ConsoleController,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    write!(output, "> ")?;
    output.flush()?;
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            match ReplCommand::parse(&line) {
                Ok(ReplCommand::Quit) => break,
                Ok(command) => execute(controller, command, output).await?,
                Err(err) => writeln!(output, "{err}")?,
            }
            for notice in controller.take_notices() {
                writeln!(output, "{notice}")?;
            }
        }
        write!(output, "> ")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

async fn execute<W: Write>(
    controller: &ConsoleController,
    command: ReplCommand,
    output: &mut W,
) -> io::Result<()> {
    // Navigation and save failures arrive as notices.
    let local = match command {
        ReplCommand::Go(location) => {
            if let Err(err) = controller.navigate(&location).await {
                debug!(error = %err, "navigation failed");
            }
            return show(controller, false, output);
        }
        ReplCommand::Save => {
            if controller.save().await.is_ok() {
                return show(controller, false, output);
            }
            return Ok(());
        }
        ReplCommand::Show { json } => return show(controller, json, output),
        ReplCommand::Help => return writeln!(output, "{HELP}"),
        ReplCommand::Quit => return Ok(()),
        ReplCommand::Edit => controller.edit(),
        ReplCommand::Set { field, value } => controller.set_field(&field, &value),
        ReplCommand::Add(group) => {
            if !can_add_row(controller, &group) {
                return writeln!(output, "\"{group}\" is full");
            }
            controller
                .add_row(&group)
                .map(|row| debug!(group, row, "row added"))
        }
        ReplCommand::Remove { group, row } => controller.remove_row(&group, row),
        ReplCommand::Cancel => controller.cancel(),
    };
    match local {
        Ok(()) => Ok(()),
        Err(err) => writeln!(output, "{}", err.to_notice()),
    }
}

fn can_add_row(controller: &ConsoleController, group: &str) -> bool {
    match controller.page() {
        Some(Page::Object(page)) => page.form.group(group).is_none() || page.form.can_add_row(group),
        _ => true,
    }
}

fn show<W: Write>(controller: &ConsoleController, json: bool, output: &mut W) -> io::Result<()> {
    match controller.page() {
        None => writeln!(output, "no page ({:?})", controller.state()),
        Some(Page::Dashboard) => writeln!(output, "dashboard"),
        Some(Page::Static(page)) => writeln!(output, "{page}"),
        Some(Page::Object(page)) if json => {
            let rendered = serde_json::to_string_pretty(&serde_json::json!({
                "infData": page.current_tree,
                "extension": page.extension,
            }))
            .map_err(io::Error::other)?;
            writeln!(output, "{rendered}")
        }
        Some(Page::Object(page)) => {
            let mode = match page.mode {
                PageMode::View => "view",
                PageMode::Edit => "edit",
            };
            let key = if page.is_new { "(new)" } else { page.object_key.as_str() };
            writeln!(output, "{} {key} ({mode})", page.kind)?;
            for (name, value) in page.form.fields() {
                writeln!(output, "  {name} = {value}")?;
            }
            for (group, values) in page.form.groups() {
                if let Some(max) = values.max_rows() {
                    writeln!(output, "  {group}: {} of {max} rows", values.rows().len())?;
                }
            }
            Ok(())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
