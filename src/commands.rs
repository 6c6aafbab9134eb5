//! Pre- and post-request commands.
//!
//! Commands run strictly in list order against the shared
//! [`VariableStore`], so each command sees what earlier ones set.
//!
//! ```yaml
//! commands:
//!   - command: echo
//!     description: "print response code"
//!     value: "response code: {{response.status_code}}"
//!   - command: add_variable
//!     variable: greeting
//!     value: "hello {{environment.name}}"
//!   - command: add_json_variable
//!     variable: ip
//!     from_variable: response.body
//!     path: origin
//! ```

use crate::config::text_or_empty;
use crate::variables::{extract, interpolate, VarError, VariableStore};
use log::debug;
use serde::{Deserialize, Serialize};

/// A single command, tagged by its `command` field.
///
/// Documents are read through [`RawCommand`] so that scalar values keep
/// their source spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "snake_case",
    try_from = "RawCommand"
)]
pub enum Command {
    /// Interpolates `value` and reports it. Does not touch the store.
    Echo { description: String, value: String },

    /// Interpolates `value` and stores it under `variable`.
    AddVariable {
        description: String,
        variable: String,
        value: String,
    },

    /// Extracts `path` from the JSON held in `from_variable` and stores it
    /// under `variable`. A miss leaves the store unchanged.
    AddJsonVariable {
        description: String,
        variable: String,
        from_variable: String,
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CommandKind {
    Echo,
    AddVariable,
    AddJsonVariable,
}

/// Flat form of a command as written in a document.
#[derive(Debug, Deserialize)]
pub struct RawCommand {
    command: CommandKind,
    #[serde(default, deserialize_with = "text_or_empty")]
    description: String,
    #[serde(default)]
    variable: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    value: String,
    #[serde(default)]
    from_variable: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

fn required(kind: &str, field: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} command requires '{}'", kind, field))
}

impl TryFrom<RawCommand> for Command {
    type Error = String;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let RawCommand {
            command,
            description,
            variable,
            value,
            from_variable,
            path,
        } = raw;

        Ok(match command {
            CommandKind::Echo => Command::Echo { description, value },
            CommandKind::AddVariable => Command::AddVariable {
                description,
                variable: required("add_variable", "variable", variable)?,
                value,
            },
            CommandKind::AddJsonVariable => Command::AddJsonVariable {
                description,
                variable: required("add_json_variable", "variable", variable)?,
                from_variable: required("add_json_variable", "from_variable", from_variable)?,
                path: required("add_json_variable", "path", path)?,
            },
        })
    }
}

impl Command {
    pub fn description(&self) -> &str {
        match self {
            Command::Echo { description, .. }
            | Command::AddVariable { description, .. }
            | Command::AddJsonVariable { description, .. } => description,
        }
    }

    /// Tag used in configuration documents.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Echo { .. } => "echo",
            Command::AddVariable { .. } => "add_variable",
            Command::AddJsonVariable { .. } => "add_json_variable",
        }
    }
}

/// Observable result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Description copied from the command.
    pub description: String,

    /// Interpolated text of an `echo` command.
    pub echo: Option<String>,
}

/// Runs `commands` in order against `store`.
///
/// # Errors
///
/// Fails only when interpolating a value hits an inline function error.
/// Commands before the failing one have already been applied.
pub fn run_commands(
    commands: &[Command],
    store: &mut VariableStore,
) -> Result<Vec<CommandOutput>, VarError> {
    let mut outputs = Vec::with_capacity(commands.len());

    for command in commands {
        debug!("running {} command '{}'", command.name(), command.description());
        let echo = run_command(command, store)?;
        outputs.push(CommandOutput {
            description: command.description().to_string(),
            echo,
        });
    }

    Ok(outputs)
}

fn run_command(command: &Command, store: &mut VariableStore) -> Result<Option<String>, VarError> {
    match command {
        Command::Echo { value, .. } => Ok(Some(interpolate(value, store)?)),
        Command::AddVariable {
            variable, value, ..
        } => {
            let value = interpolate(value, store)?;
            store.set(variable.clone(), value);
            Ok(None)
        }
        Command::AddJsonVariable {
            variable,
            from_variable,
            path,
            ..
        } => {
            let value = extract(store.get(from_variable), path);
            if value.is_empty() {
                debug!(
                    "path '{}' matched nothing in '{}', '{}' left unchanged",
                    path, from_variable, variable
                );
            } else {
                store.set(variable.clone(), value);
            }
            Ok(None)
        }
    }
}
