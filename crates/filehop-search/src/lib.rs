//! Search orchestration for filehop.
//!
//! A [`SearchSession`] turns typed queries into runs of an external,
//! ripgrep-compatible tool: one process set per target directory, a fresh
//! generation per settled query, and the previous generation cancelled
//! before the next one starts.
//!
//! # Overview
//!
//! - **Tokenizing** queries into argument vectors ([`tokenize`])
//! - **Command shapes** for name and content search ([`SearchMode`])
//! - **Process execution** behind the [`ProcessRunner`] trait, with
//!   [`TokioRunner`] as the real implementation
//! - **Debouncing** input bursts ([`Debouncer`])
//! - **Scrollback** of accepted queries ([`Scrollback`])
//!
//! Failures are per directory: one directory's error never hides another
//! directory's results.

mod command;
mod debounce;
mod error;
mod parse;
mod query;
mod runner;
mod scrollback;
mod session;

pub use command::{CommandSpec, Pipeline, SearchMode};
pub use debounce::{DEBOUNCE_WINDOW, Debouncer};
pub use error::SearchError;
pub use parse::{
    MAX_DESCRIPTION_LEN, SearchHit, parse_content_line, parse_lines, parse_name_line, parse_output,
};
pub use query::{has_pattern, tokenize};
pub use runner::{LineSender, MAX_BATCH_LINES, ProcessRunner, TokioRunner};
pub use scrollback::{SCROLLBACK_CAPACITY, Scrollback};
pub use session::{SearchEvent, SearchSession};
