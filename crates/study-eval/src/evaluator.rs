//! Session evaluation protocol.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime};
use study_model::StateIndex;

use crate::config::EvaluatorConfig;
use crate::counter::{format_identifier, load_identifier_index, save_identifier_index};
use crate::error::{EvaluatorError, Result};
use crate::io::write_atomic;
use crate::writer::LogWriter;

/// Timestamp layout of the header (sortable, seconds precision).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Study-specific log content.
///
/// Every method defaults to writing nothing.
pub trait EvaluationHooks {
    /// Adds custom header fields after `version`.
    fn write_header_lines(&mut self, _log: &mut LogWriter) {}

    /// Adds fields when a state is entered, after `state`.
    fn start_state_data(&mut self, _state: StateIndex, _log: &mut LogWriter) {}

    /// Adds fields when a state is left, before the block is closed.
    fn end_state_data(&mut self, _state: StateIndex, _log: &mut LogWriter) {}
}

/// Hooks that add nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl EvaluationHooks for NoHooks {}

/// Evaluator handle shared between the session scope and the controllers.
pub type SharedEvaluator = Rc<RefCell<StudyEvaluator>>;

/// Writes one session's evaluation log.
///
/// The log is buffered in memory and persisted by [`StudyEvaluator::finalize`]
/// only; a crash before that loses the session's log.
pub struct StudyEvaluator {
    config: EvaluatorConfig,
    identifier_index: u32,
    identifier: String,
    writer: LogWriter,
    hooks: Box<dyn EvaluationHooks>,
    header_written: bool,
    finalized: bool,
}

impl StudyEvaluator {
    /// Creates an evaluator, reading the identifier counter file.
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        let index = load_identifier_index(&config.config_path)?;
        Ok(Self::with_identifier_index(config, index))
    }

    /// Creates an evaluator with a known identifier index, without touching
    /// the counter file.
    pub fn with_identifier_index(config: EvaluatorConfig, identifier_index: u32) -> Self {
        let identifier = format_identifier(&config.identifier_pattern, identifier_index);
        tracing::info!(%identifier, "created session identifier");
        let writer = LogWriter::new(config.indent)
            .with_strict_json(config.strict_json)
            .with_data_location(&config.base_path, &identifier, &config.data_path);
        Self {
            config,
            identifier_index,
            identifier,
            writer,
            hooks: Box::new(NoHooks),
            header_written: false,
            finalized: false,
        }
    }

    /// Installs study-specific hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl EvaluationHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Wraps the evaluator into a shareable handle.
    pub fn into_shared(self) -> SharedEvaluator {
        Rc::new(RefCell::new(self))
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn identifier_index(&self) -> u32 {
        self.identifier_index
    }

    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    /// Direct access for writing values outside the hooks.
    pub fn writer_mut(&mut self) -> &mut LogWriter {
        &mut self.writer
    }

    pub fn text(&self) -> &str {
        self.writer.text()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Path of the result file written by [`StudyEvaluator::finalize`].
    pub fn result_path(&self) -> PathBuf {
        self.config
            .base_path
            .join(format!("{}.json", self.identifier))
    }

    // ---- Protocol ---------------------------------------------------------

    /// Opens the document with the current local time.
    pub fn write_header(&mut self) {
        self.write_header_at(Local::now().naive_local());
    }

    /// Opens the document, writes the identification lines and opens the
    /// `states` array.
    pub fn write_header_at(&mut self, timestamp: NaiveDateTime) {
        if self.header_written {
            tracing::warn!(identifier = %self.identifier, "header already written");
            return;
        }
        self.header_written = true;

        self.writer.open(None, '[');
        self.writer.open(None, '{');
        self.writer
            .write_line("timestamp", timestamp.format(TIMESTAMP_FORMAT).to_string());
        self.writer.write_line("study", self.config.study_name.as_str());
        self.writer.write_line("id", self.identifier.as_str());
        self.writer.write_line("version", self.config.version);

        self.hooks.write_header_lines(&mut self.writer);

        self.writer.open(Some("states"), '[');
    }

    /// Closes the `states` array and the document.
    pub fn write_footer(&mut self) {
        self.writer.close(']', true);
        self.writer.close('}', false);
        self.writer.close(']', false);
    }

    /// Opens the block of `state`. Writes the header first if needed.
    pub fn start_state(&mut self, state: StateIndex) {
        if !self.header_written {
            self.write_header();
        }
        self.writer.open(None, '{');
        self.writer.write_line("state", state);
        self.hooks.start_state_data(state, &mut self.writer);
    }

    /// Closes the block of `state`.
    pub fn end_state(&mut self, state: StateIndex) {
        self.hooks.end_state_data(state, &mut self.writer);
        self.writer.close('}', true);
        tracing::trace!(state, log = %self.writer.text(), "closed evaluation state");
    }

    /// Writes the footer, the result file and the counter file.
    ///
    /// This is the only point at which the log touches durable storage.
    /// The counter file is written with the index read at startup.
    pub fn finalize(&mut self) -> Result<PathBuf> {
        if self.finalized {
            return Err(EvaluatorError::AlreadyFinalized {
                identifier: self.identifier.clone(),
            });
        }
        if !self.header_written {
            self.write_header();
        }
        self.write_footer();
        self.finalized = true;

        let path = self.result_path();
        write_atomic(&path, self.writer.text().as_bytes())?;
        tracing::info!(path = %path.display(), "evaluation log written");

        save_identifier_index(&self.config.config_path, self.identifier_index)?;
        Ok(path)
    }
}

impl fmt::Debug for StudyEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyEvaluator")
            .field("identifier", &self.identifier)
            .field("header_written", &self.header_written)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}
