//! Error types for the tree session layer.

use thiserror::Error;

/// Errors surfaced by engines and sessions.
///
/// Nothing at this layer retries or recovers: every failure propagates to the
/// caller, which owns the decision to run the whole operation again later.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing file could not be opened or parsed.
    #[error("cannot open '{file}': {message}")]
    Io { file: String, message: String },

    /// No usable lens exists for the requested file.
    #[error("lens '{lens}' unavailable for '{file}': {message}")]
    Lens {
        lens: String,
        file: String,
        message: String,
    },

    /// The engine rejected the save. The durable state is unchanged; the
    /// session's working tree keeps its pending edits.
    #[error("save of '{file}' failed: {message}")]
    Save { file: String, message: String },

    /// A path expression could not be parsed.
    #[error("invalid path expression '{expr}': {message}")]
    Expr { expr: String, message: String },

    /// An operation required a matching node and found none.
    #[error("no node matches '{expr}'")]
    NoMatch { expr: String },

    /// An operation required a single matching node and found several.
    #[error("'{expr}' matches {count} nodes, expected exactly one")]
    Ambiguous { expr: String, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = Error::Io {
            file: "/etc/fstab".to_string(),
            message: "no such file".to_string(),
        };
        assert!(format!("{}", e).contains("/etc/fstab"));

        let e = Error::NoMatch {
            expr: "/files/etc/fstab/*".to_string(),
        };
        assert!(format!("{}", e).contains("/files/etc/fstab/*"));
    }

    #[test]
    fn ambiguous_reports_count() {
        let e = Error::Ambiguous {
            expr: "/files/etc/fstab/1/opt".to_string(),
            count: 3,
        };
        assert!(format!("{}", e).contains("3 nodes"));
    }
}
