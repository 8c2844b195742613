//! Target selection: which file to edit, through which lens.
//!
//! The target is an explicit value handed to every provider call. There is no
//! process-wide "default mount table" state to consult or mutate.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Operating-system family the mount table belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Bsd,
    Solaris,
}

impl Platform {
    /// The platform's standard mount-table file.
    pub fn default_file(&self) -> &'static str {
        match self {
            Platform::Linux | Platform::Bsd => "/etc/fstab",
            Platform::Solaris => "/etc/vfstab",
        }
    }
}

/// The file one provider call operates on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    platform: Platform,
    file: String,
}

impl Target {
    /// The platform's standard file.
    pub fn new(platform: Platform) -> Self {
        Target {
            platform,
            file: platform.default_file().to_string(),
        }
    }

    /// An explicit file. Trailing path separators are stripped.
    pub fn with_file(platform: Platform, file: impl Into<String>) -> Self {
        let mut file = file.into();
        while file.len() > 1 && file.ends_with('/') {
            file.pop();
        }
        Target { platform, file }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Root of this file's tree inside a session.
    pub fn root(&self) -> String {
        format!("/files{}", self.file)
    }

    /// Lens used to parse this platform's table format.
    ///
    /// Solaris tables need a vfstab lens that is not wired up yet. The refusal
    /// happens here, before any tree access, so a Solaris target fails loudly
    /// instead of silently doing nothing.
    pub(crate) fn lens(&self) -> Result<&'static str, Error> {
        match self.platform {
            Platform::Linux | Platform::Bsd => Ok("Fstab.lns"),
            Platform::Solaris => Err(Error::Tree(treetab_tree::Error::Lens {
                lens: "Vfstab.lns".to_string(),
                file: self.file.clone(),
                message: "not implemented".to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_files_per_platform() {
        assert_eq!(Target::new(Platform::Linux).file(), "/etc/fstab");
        assert_eq!(Target::new(Platform::Bsd).file(), "/etc/fstab");
        assert_eq!(Target::new(Platform::Solaris).file(), "/etc/vfstab");
    }

    #[test]
    fn trailing_separators_are_stripped() {
        let target = Target::with_file(Platform::Linux, "/srv/fstab/");
        assert_eq!(target.file(), "/srv/fstab");
        let target = Target::with_file(Platform::Linux, "/srv/fstab//");
        assert_eq!(target.file(), "/srv/fstab");
    }

    #[test]
    fn root_is_prefixed() {
        let target = Target::with_file(Platform::Linux, "/srv/fstab");
        assert_eq!(target.root(), "/files/srv/fstab");
    }

    #[test]
    fn solaris_lens_is_refused() {
        let err = Target::new(Platform::Solaris).lens().err().unwrap();
        assert!(matches!(
            err,
            Error::Tree(treetab_tree::Error::Lens { .. })
        ));
        assert_eq!(
            Target::new(Platform::Linux).lens().unwrap(),
            "Fstab.lns"
        );
    }
}
