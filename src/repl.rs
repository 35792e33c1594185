//! Line-oriented command loop over a [`Sheet`].

use log::debug;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tally_core::Sheet;
use tally_engine::engine::CellId;
use thiserror::Error;

use crate::config::Config;

const HELP_TEXT: &str = "\
Commands:
  set ID CONTENTS   Set a cell to a number, text or =formula (blank clears it)
  delete ID         Clear a cell
  save FILE         Save the sheet
  load FILE         Replace the sheet with a saved one
  show              Print the sheet
  tree ID           Print the formula tree of a cell
  help              Show this help
  quit              Exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { id: String, contents: String },
    Delete(String),
    Save(PathBuf),
    Load(PathBuf),
    Show,
    Tree(String),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: '{0}' (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let single_arg = |usage: &'static str| {
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                Err(CommandError::Usage(usage))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "set" => {
                let (id, contents) = match rest.split_once(char::is_whitespace) {
                    Some((id, contents)) => (id, contents.trim_start()),
                    None => (rest, ""),
                };
                if id.is_empty() {
                    return Err(CommandError::Usage("set ID CONTENTS"));
                }
                Ok(Command::Set {
                    id: id.to_string(),
                    contents: contents.to_string(),
                })
            }
            "delete" => single_arg("delete ID").map(Command::Delete),
            "tree" => single_arg("tree ID").map(Command::Tree),
            "save" if !rest.is_empty() => Ok(Command::Save(PathBuf::from(rest))),
            "save" => Err(CommandError::Usage("save FILE")),
            "load" if !rest.is_empty() => Ok(Command::Load(PathBuf::from(rest))),
            "load" => Err(CommandError::Usage("load FILE")),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// An interactive session: the sheet being edited and how to present it.
pub struct Session {
    sheet: Sheet,
    config: Config,
}

impl Session {
    pub fn new(sheet: Sheet, config: Config) -> Self {
        Self { sheet, config }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            write!(out, "{}", self.config.prompt)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            // Invalid UTF-8 is replaced rather than ending the session.
            let line = String::from_utf8_lossy(&buf);
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if self.config.echo_commands {
                writeln!(out, "{}", trimmed)?;
            }
            if trimmed.trim().is_empty() {
                continue;
            }

            match trimmed.parse::<Command>() {
                Ok(Command::Quit) => return Ok(()),
                Ok(command) => self.execute(command, out)?,
                Err(err) => writeln!(out, "{}", err)?,
            }
        }
    }

    /// Apply one command and report the outcome to `out`.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        debug!("executing {:?}", command);
        match command {
            Command::Set { id, contents } => match self.sheet.set_cell(&id, &contents) {
                Ok(()) => self.print_sheet(out),
                Err(err) => writeln!(out, "Could not set cell {} to {}: {}", id, contents, err),
            },
            Command::Delete(id) => match self.sheet.delete_cell(&id) {
                Ok(()) => self.print_sheet(out),
                Err(err) => writeln!(out, "Could not delete cell {}: {}", id, err),
            },
            Command::Save(path) => {
                write!(out, "Saving sheet to '{}'... ", path.display())?;
                match self.sheet.save(&path) {
                    Ok(()) => writeln!(out, "done."),
                    Err(err) => writeln!(out, "failed: {}", err),
                }
            }
            Command::Load(path) => {
                write!(out, "Loading sheet from '{}'... ", path.display())?;
                match Sheet::load(&path) {
                    Ok(sheet) => {
                        self.sheet = sheet;
                        writeln!(out, "done.")?;
                        self.print_sheet(out)
                    }
                    Err(err) => writeln!(out, "failed: {}", err),
                }
            }
            Command::Show => self.print_sheet(out),
            Command::Tree(id) => self.print_tree(&id, out),
            Command::Help => writeln!(out, "{}", HELP_TEXT),
            Command::Quit => Ok(()),
        }
    }

    fn print_sheet<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.config.show_dependencies {
            write!(out, "{}", self.sheet)
        } else {
            write!(out, "{}", self.sheet.render_table())
        }
    }

    fn print_tree<W: Write>(&self, id: &str, out: &mut W) -> io::Result<()> {
        let cell_id = match id.parse::<CellId>() {
            Ok(cell_id) => cell_id,
            Err(err) => return writeln!(out, "{}", err),
        };
        match self.sheet.cell(&cell_id).and_then(|cell| cell.formula()) {
            Some(formula) => write!(out, "{}", formula.tree()),
            None => writeln!(out, "{} does not hold a formula", cell_id),
        }
    }
}
