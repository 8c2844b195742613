//! treetab: edit mount tables as flat records over a structured file tree.
//!
//! Instead of patching fstab-style files as text, treetab edits the tree a
//! format lens parses them into — one subtree per entry, one node per field —
//! and commits each change with a single atomic save.
//!
//! This crate re-exports the two layers:
//! - [`tree`]: the session contract and the in-memory reference engine
//! - [`mounttab`]: the flat-record view and its operations

pub use treetab_mounttab as mounttab;
pub use treetab_tree as tree;

pub use treetab_mounttab::{Field, MountEntry, MountTab, Platform, Presence, Target};
pub use treetab_tree::{MemoryEngine, Node, TreeEngine, TreeSession};
