//! treetab-tree: the tree-edit session layer.
//!
//! A lens-backed engine turns a line-oriented system file into a navigable
//! tree; this crate is the contract for talking to one:
//! - `TreeEngine` / `TreeSession`: open a file, then get/set/match/insert/
//!   remove path-addressed nodes, with a single atomic `save`
//! - `Node`: the ordered, labeled tree shape a lens produces
//! - `quote`: the only way a literal enters a path expression
//! - `MemoryEngine`: an in-memory reference engine implementing the full
//!   contract, for tests and in-process embedding
//!
//! # Example
//!
//! ```rust
//! use treetab_tree::{MemoryEngine, Node, TreeEngine, TreeSession};
//!
//! let engine = MemoryEngine::new();
//! engine.load_file(
//!     "/etc/fstab",
//!     vec![Node::with_children(
//!         "1",
//!         vec![Node::leaf("file", "/"), Node::leaf("spec", "/dev/sda1")],
//!     )],
//! );
//!
//! let mut session = engine.open("Fstab.lns", "/etc/fstab").unwrap();
//! assert_eq!(
//!     session.get("/files/etc/fstab/*[file = '/']/spec").unwrap(),
//!     Some("/dev/sda1".to_string()),
//! );
//! session.set("/files/etc/fstab/1/vfstype", "ext4").unwrap();
//! session.save().unwrap();
//! ```

mod error;
mod expr;
mod memory;
mod node;
mod session;

pub use error::Error;
pub use expr::quote;
pub use memory::{MemoryEngine, MemorySession};
pub use node::{render, Node};
pub use session::{TreeEngine, TreeSession};
