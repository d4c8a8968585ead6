//! Indenting log buffer.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use study_model::{Quat, Transform, Vec3};

use crate::error::Result;
use crate::io::write_file;

/// A value accepted by [`LogWriter::write_line`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Str(String),
    Int(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Vec3(Vec3),
    Quat(Quat),
    /// Written as a nested object with `position`, `rotation` and `localScale`.
    Transform(Transform),
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i32> for LogValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for LogValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for LogValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f32> for LogValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec3> for LogValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Quat> for LogValue {
    fn from(value: Quat) -> Self {
        Self::Quat(value)
    }
}

impl From<Transform> for LogValue {
    fn from(value: Transform) -> Self {
        Self::Transform(value)
    }
}

/// Where sidecar data files of a session go.
#[derive(Debug, Clone)]
struct DataLocation {
    base_path: PathBuf,
    /// `<identifier>/<data_path>`, relative to `base_path`.
    relative_dir: String,
}

/// Append-only text buffer with indentation tracking.
///
/// Every value line ends with a separator and a newline. Opening a bracket
/// indents by the configured step; closing it outdents again.
#[derive(Debug, Clone)]
pub struct LogWriter {
    buf: String,
    indent_step: usize,
    current_indent: usize,
    strict: bool,
    opened: usize,
    closed: usize,
    data: Option<DataLocation>,
}

impl LogWriter {
    pub fn new(indent_step: usize) -> Self {
        Self {
            buf: String::new(),
            indent_step,
            current_indent: 0,
            strict: false,
            opened: 0,
            closed: 0,
            data: None,
        }
    }

    /// Drop the separator preceding each closing bracket.
    #[must_use]
    pub fn with_strict_json(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enables [`LogWriter::write_data_file`] for a session.
    #[must_use]
    pub fn with_data_location(
        mut self,
        base_path: impl Into<PathBuf>,
        identifier: &str,
        data_path: &str,
    ) -> Self {
        let data_path = data_path.trim_matches('/');
        let relative_dir = if data_path.is_empty() {
            identifier.to_string()
        } else {
            format!("{identifier}/{data_path}")
        };
        self.data = Some(DataLocation {
            base_path: base_path.into(),
            relative_dir,
        });
        self
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    pub fn current_indent(&self) -> usize {
        self.current_indent
    }

    /// Number of brackets opened so far.
    pub fn open_count(&self) -> usize {
        self.opened
    }

    /// Number of brackets closed so far.
    pub fn close_count(&self) -> usize {
        self.closed
    }

    // ---- Structure --------------------------------------------------------

    /// Writes an opening bracket, optionally keyed, and indents.
    pub fn open(&mut self, key: Option<&str>, bracket: char) {
        self.add_indent();
        if let Some(key) = key {
            self.push_key(key);
        }
        self.buf.push(bracket);
        self.opened += 1;
        self.current_indent += self.indent_step;
        self.newline();
    }

    /// Outdents and writes a closing bracket, with a separator if requested.
    pub fn close(&mut self, bracket: char, separator: bool) {
        if self.strict {
            self.trim_separator();
        }
        self.current_indent = self.current_indent.saturating_sub(self.indent_step);
        self.add_indent();
        self.buf.push(bracket);
        self.closed += 1;
        if separator {
            self.buf.push(',');
        }
        self.newline();
    }

    /// Begins a keyed object.
    pub fn begin_named_object(&mut self, key: &str) {
        self.open(Some(key), '{');
    }

    /// Ends the innermost object.
    pub fn end_object(&mut self) {
        self.close('}', true);
    }

    // ---- Values -----------------------------------------------------------

    /// Writes `"key": value,` at the current indentation.
    pub fn write_line(&mut self, key: &str, value: impl Into<LogValue>) {
        match value.into() {
            LogValue::Transform(transform) => self.write_transform(key, &transform),
            LogValue::Str(s) => self.write_scalar(key, |log| log.push_string(&s)),
            LogValue::Int(i) => self.write_scalar(key, |log| log.push_display(i)),
            LogValue::Float(f) => self.write_scalar(key, |log| log.push_number(f.is_finite(), f)),
            LogValue::Double(d) => self.write_scalar(key, |log| log.push_number(d.is_finite(), d)),
            LogValue::Bool(b) => self.write_scalar(key, |log| log.push_display(b)),
            LogValue::Vec3(v) => self.write_scalar(key, |log| log.push_array(&v.to_array())),
            LogValue::Quat(q) => self.write_scalar(key, |log| log.push_array(&q.to_array())),
        }
    }

    /// Writes one `"key": ...,` line whose value is produced by `push`.
    fn write_scalar(&mut self, key: &str, push: impl FnOnce(&mut Self)) {
        self.add_indent();
        self.push_key(key);
        push(self);
        self.buf.push(',');
        self.newline();
    }

    fn write_transform(&mut self, key: &str, transform: &Transform) {
        self.begin_named_object(key);
        self.write_line("position", transform.position);
        self.write_line("rotation", transform.rotation);
        self.write_line("localScale", transform.local_scale);
        self.end_object();
    }

    /// Stores an already encoded image next to the log and writes its path,
    /// relative to the result directory, under `key`.
    ///
    /// Without a data location the file is not written and only the path
    /// relative to the session is logged.
    pub fn write_data_file(&mut self, key: &str, name: &str, png: &[u8]) -> Result<PathBuf> {
        let (relative, absolute) = match &self.data {
            Some(location) => {
                let relative = format!("{}/{}.png", location.relative_dir, name);
                let absolute = location.base_path.join(&relative);
                write_file(&absolute, png)?;
                (relative, absolute)
            }
            None => {
                tracing::warn!(key, name, "no data location configured, data file skipped");
                let relative = format!("{name}.png");
                (relative.clone(), PathBuf::from(relative))
            }
        };
        self.write_line(key, relative.as_str());
        tracing::debug!(path = %absolute.display(), "wrote data file");
        Ok(absolute)
    }

    /// Base directory of sidecar data files, if configured.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data
            .as_ref()
            .map(|location| location.base_path.join(&location.relative_dir))
    }

    // ---- Primitives -------------------------------------------------------

    fn add_indent(&mut self) {
        for _ in 0..self.current_indent {
            self.buf.push(' ');
        }
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn push_key(&mut self, key: &str) {
        self.push_string(key);
        self.buf.push_str(": ");
    }

    fn push_string(&mut self, value: &str) {
        match serde_json::to_string(value) {
            Ok(quoted) => self.buf.push_str(&quoted),
            Err(_) => {
                let _ = write!(self.buf, "\"{value}\"");
            }
        }
    }

    fn push_display(&mut self, value: impl fmt::Display) {
        let _ = write!(self.buf, "{value}");
    }

    fn push_number(&mut self, finite: bool, value: impl fmt::Display) {
        if finite {
            self.push_display(value);
        } else {
            self.buf.push_str("null");
        }
    }

    fn push_array(&mut self, values: &[f32]) {
        self.buf.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.push_number(value.is_finite(), value);
        }
        self.buf.push(']');
    }

    fn trim_separator(&mut self) {
        if self.buf.ends_with(",\n") {
            self.buf.truncate(self.buf.len() - 2);
            self.buf.push('\n');
        }
    }
}
