//! Option-list codec.
//!
//! In memory an option list is a sequence of tokens, each a bare flag
//! (`noauto`) or a `key=value` pair (`rw=1`). In the tree every token is one
//! `opt` child of the entry, with the value — when there is one — in a
//! `value` child below it. At the resource boundary the whole list travels as
//! one comma-joined string.

use treetab_tree::TreeSession;

use crate::Error;

/// Fill-in written when an entry needs an options field but no real options
/// were supplied. Older format readers assume at least one option is present,
/// so the field is never left empty.
pub const DEFAULTS: &str = "defaults";

/// Split a token at its first `=` into key and optional value. Later `=`
/// signs stay inside the value; an empty token passes through untouched.
pub fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (token, None),
    }
}

/// Reassemble a token from a key and optional value.
pub fn join_token(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{}={}", key, v),
        None => key.to_string(),
    }
}

/// The flat comma-joined form exchanged at the resource boundary.
pub fn to_property(tokens: &[String]) -> String {
    tokens.join(",")
}

/// Read the option tokens under `entry`, in sibling order.
pub(crate) fn read<S: TreeSession>(session: &mut S, entry: &str) -> Result<Vec<String>, Error> {
    let mut tokens = Vec::new();
    for opt_path in session.matches(&format!("{}/opt", entry))? {
        let key = session.get(&opt_path)?.unwrap_or_default();
        let value = session.get(&format!("{}/value", opt_path))?;
        tokens.push(join_token(&key, value.as_deref()));
    }
    Ok(tokens)
}

/// Append option nodes at the tail of a fresh entry (the creation path, where
/// fields are written front to back). An empty list writes the single
/// `defaults` fill-in.
pub(crate) fn append<S: TreeSession>(
    session: &mut S,
    entry: &str,
    tokens: &[String],
) -> Result<(), Error> {
    if tokens.is_empty() {
        session.set(&format!("{}/opt", entry), DEFAULTS)?;
        return Ok(());
    }
    for token in tokens {
        let (key, value) = split_token(token);
        session.set(&format!("{}/opt[last()+1]", entry), key)?;
        if let Some(v) = value {
            session.set(&format!("{}/opt[last()]/value", entry), v)?;
        }
    }
    Ok(())
}

/// Replace the options under an existing entry.
///
/// Every current `opt` subtree is removed, then each token is inserted after
/// a cursor that starts at `vfstype` and moves to the option just written, so
/// the list lands after the filesystem type in supplied order. An empty list
/// reinstates the `defaults` fill-in through the same cursor.
pub(crate) fn rebuild<S: TreeSession>(
    session: &mut S,
    entry: &str,
    tokens: &[String],
) -> Result<(), Error> {
    session.remove(&format!("{}/opt", entry))?;

    let mut anchor = format!("{}/vfstype", entry);
    if tokens.is_empty() {
        session.insert(&anchor, "opt", false)?;
        session.set(&format!("{}/opt", entry), DEFAULTS)?;
        return Ok(());
    }
    for token in tokens {
        let (key, value) = split_token(token);
        session.insert(&anchor, "opt", false)?;
        session.set(&format!("{}/opt[last()]", entry), key)?;
        if let Some(v) = value {
            session.set(&format!("{}/opt[last()]/value", entry), v)?;
        }
        anchor = format!("{}/opt[last()]", entry);
    }
    Ok(())
}
