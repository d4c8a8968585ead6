//! Session command scripts.
//!
//! One command per line; blank lines and lines starting with `#` are
//! skipped.

use std::str::FromStr;

use thiserror::Error;

use study_model::{ObjectId, StateIndex, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Append a snapshot of the tracked objects to the history.
    Capture,
    /// Replace history entry `i` with a fresh snapshot.
    Replace(usize),
    Remove(usize),
    UpdateMissing,
    /// Track every object carrying the tag.
    Track(String),
    Set(StateIndex),
    Next,
    Reset,
    /// Push the increment button.
    Press,
    /// Deliver a step result from the external system.
    Result {
        step: i32,
        has_error: bool,
        message: String,
    },
    /// Move an object to a new position.
    Move {
        object: ObjectId,
        position: Vec3,
    },
    Finish,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: usage: {usage}")]
    Usage { line: usize, usage: &'static str },

    #[error("line {line}: invalid value '{value}'")]
    InvalidValue { line: usize, value: String },
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: ScriptCommand,
}

/// Parses a whole script; the first bad line fails the parse.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(ScriptLine {
            line,
            command: parse_line(line, trimmed)?,
        });
    }
    Ok(lines)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptCommand, ScriptError> {
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Err(ScriptError::Usage {
            line,
            usage: "<command> [args]",
        });
    };
    let args: Vec<&str> = words.collect();
    let usage = |usage| ScriptError::Usage { line, usage };

    let parsed = match (command, args.as_slice()) {
        ("capture", []) => ScriptCommand::Capture,
        ("replace", [index]) => ScriptCommand::Replace(number(line, index)?),
        ("replace", _) => return Err(usage("replace <index>")),
        ("remove", [index]) => ScriptCommand::Remove(number(line, index)?),
        ("remove", _) => return Err(usage("remove <index>")),
        ("update-missing", []) => ScriptCommand::UpdateMissing,
        ("track", [tag]) => ScriptCommand::Track((*tag).to_string()),
        ("track", _) => return Err(usage("track <tag>")),
        ("set", [state]) => ScriptCommand::Set(number(line, state)?),
        ("set", _) => return Err(usage("set <state>")),
        ("next", []) => ScriptCommand::Next,
        ("reset", []) => ScriptCommand::Reset,
        ("press", []) => ScriptCommand::Press,
        ("result", [step, outcome, message @ ..]) => {
            let has_error = match *outcome {
                "ok" => false,
                "error" => true,
                other => {
                    return Err(ScriptError::InvalidValue {
                        line,
                        value: other.to_string(),
                    });
                }
            };
            ScriptCommand::Result {
                step: number(line, step)?,
                has_error,
                message: message.join(" "),
            }
        }
        ("result", _) => return Err(usage("result <step> ok|error [message]")),
        ("move", [object, x, y, z]) => ScriptCommand::Move {
            object: ObjectId::new(*object).map_err(|_| ScriptError::InvalidValue {
                line,
                value: (*object).to_string(),
            })?,
            position: Vec3::new(number(line, x)?, number(line, y)?, number(line, z)?),
        },
        ("move", _) => return Err(usage("move <object> <x> <y> <z>")),
        ("finish", []) => ScriptCommand::Finish,
        ("capture" | "update-missing" | "next" | "reset" | "press" | "finish", _) => {
            return Err(usage("command takes no arguments"));
        }
        (other, _) => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(parsed)
}

fn number<T: FromStr>(line: usize, value: &str) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidValue {
        line,
        value: value.to_string(),
    })
}
