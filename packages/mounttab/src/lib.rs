//! treetab-mounttab: mount-table entries as flat records.
//!
//! One fstab-style record (device, mountpoint, filesystem type, options,
//! dump flag, pass number) maps onto one subtree of a parsed file; this crate
//! owns that mapping:
//! - `MountEntry`: the flat record, keyed by mountpoint within its file
//! - `Target` / `Platform`: which file to edit, through which lens
//! - `MountTab`: list/exists/create/destroy plus per-field getters and
//!   setters, each a single open→edit→save→drop session
//! - `locate` and the option codec: how records are found and how option
//!   lists travel between token-list and tree form
//!
//! # Example
//!
//! ```rust
//! use treetab_mounttab::{MountEntry, MountTab, Platform, Target};
//! use treetab_tree::MemoryEngine;
//!
//! let engine = MemoryEngine::new();
//! engine.load_file("/etc/fstab", Vec::new());
//!
//! let tab = MountTab::new(engine);
//! let target = Target::new(Platform::Linux);
//! let entry = MountEntry::new("/data", "/dev/sdb1", "ext4")
//!     .with_options(["noatime"])
//!     .with_pass("2");
//! tab.create(&target, &entry).unwrap();
//!
//! assert!(tab.exists(&target, "/data").unwrap());
//! assert_eq!(tab.options(&target, "/data").unwrap(), "noatime");
//! ```

mod config;
mod entry;
mod error;
pub mod locate;
pub mod options;
mod provider;

pub use config::{Platform, Target};
pub use entry::{MountEntry, Presence};
pub use error::Error;
pub use provider::{Field, MountTab};
