//! Engine and session contracts.
//!
//! An engine parses one file through a named lens and hands back a session:
//! a private working tree plus the path-addressed edit operations. All pending
//! edits become durable on `save` — atomically, or not at all — and a session
//! dropped without saving discards them.
//!
//! Release discipline: sessions free their resources on drop. There is no
//! `close` to forget on an error path; an engine wrapping an external handle
//! implements `Drop` for it.

use crate::Error;

/// Opens files into edit sessions.
pub trait TreeEngine {
    type Session: TreeSession;

    /// Parse `file` through the lens named `lens`.
    ///
    /// Fails with [`Error::Io`] when the file is missing or unreadable, and
    /// with [`Error::Lens`] when the engine has no such lens.
    fn open(&self, lens: &str, file: &str) -> Result<Self::Session, Error>;
}

/// Path-addressed operations on one open file.
///
/// Expressions follow the grammar in [`crate::expr`]; all paths are absolute
/// and scoped under the file's root (`/files<file>`).
pub trait TreeSession {
    /// Value of the first node matching `expr`; `Ok(None)` when nothing
    /// matches or the node carries no value.
    fn get(&mut self, expr: &str) -> Result<Option<String>, Error>;

    /// Set the value of the node at `expr`, creating it (and any missing
    /// ancestors reachable through plain labels or `[last()+1]`) if needed.
    fn set(&mut self, expr: &str, value: &str) -> Result<(), Error>;

    /// Concrete paths of every node matching `expr`, in document order.
    fn matches(&mut self, expr: &str) -> Result<Vec<String>, Error>;

    /// Insert a new node labeled `label` immediately before or after the
    /// single node matching `anchor`.
    fn insert(&mut self, anchor: &str, label: &str, before: bool) -> Result<(), Error>;

    /// Remove every subtree matching `expr`; returns how many were removed.
    /// Zero matches is not an error.
    fn remove(&mut self, expr: &str) -> Result<usize, Error>;

    /// Commit all pending edits to durable storage, atomically. On failure the
    /// durable state is untouched and the working tree keeps its edits.
    fn save(&mut self) -> Result<(), Error>;
}
