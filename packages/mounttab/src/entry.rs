//! The flat mount-entry record.

use serde::{Deserialize, Serialize};

/// Whether an entry currently exists in its file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Present,
    Absent,
}

/// One mount-table record: the flat projection of an entry subtree.
///
/// `name` is the mountpoint and the unique key within a file; renaming is
/// destroy-plus-create at a higher layer, never an in-place edit. `options`
/// keeps token order and duplicates. `dump` and `pass` stay unset when their
/// fields are absent from the file — absence is informative, not a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountEntry {
    pub name: String,
    pub device: Option<String>,
    pub fstype: Option<String>,
    pub options: Vec<String>,
    pub dump: Option<String>,
    pub pass: Option<String>,
    pub state: Presence,
    /// File the entry belongs to; filled in by the listing, empty on records
    /// built by hand.
    pub target: String,
}

impl MountEntry {
    /// A present entry with the three fields every record needs.
    pub fn new(
        name: impl Into<String>,
        device: impl Into<String>,
        fstype: impl Into<String>,
    ) -> Self {
        MountEntry {
            name: name.into(),
            device: Some(device.into()),
            fstype: Some(fstype.into()),
            options: Vec::new(),
            dump: None,
            pass: None,
            state: Presence::Present,
            target: String::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dump(mut self, dump: impl Into<String>) -> Self {
        self.dump = Some(dump.into());
        self
    }

    pub fn with_pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }
}
