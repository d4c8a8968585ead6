//! Evaluation log for study sessions.
//!
//! The log is a nested, append-only JSON-like document buffered in memory
//! for the whole session and written to disk exactly once, at finalize.
//!
//! # File Format
//!
//! ```text
//! [
//!   {
//!     "timestamp": "2026-10-19T09:30:00",
//!     "study": "Pick and Place",
//!     "id": "P007",
//!     "version": 1,
//!     <custom header lines>
//!     "states": [
//!       {
//!         "state": 0,
//!         <custom state lines>
//!       },
//!     ],
//!   }
//! ]
//! ```
//!
//! Every value line carries its own trailing separator. With
//! [`EvaluatorConfig::strict_json`] the separator before each closing
//! bracket is dropped so the file parses as JSON.
//!
//! # Architecture
//!
//! - `writer.rs` - [`LogWriter`], the indenting text buffer and value writers
//! - `evaluator.rs` - [`StudyEvaluator`], header/state/footer protocol and finalize
//! - `counter.rs` - identifier counter file and identifier formatting
//! - `config.rs` - [`EvaluatorConfig`]
//! - `error.rs` - error types with user-facing messages

mod config;
mod counter;
mod error;
mod evaluator;
mod io;
mod writer;

pub use config::EvaluatorConfig;
pub use counter::{format_identifier, load_identifier_index, save_identifier_index};
pub use error::{EvaluatorError, Result};
pub use evaluator::{EvaluationHooks, NoHooks, SharedEvaluator, StudyEvaluator};
pub use writer::{LogValue, LogWriter};
