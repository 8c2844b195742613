//! Entry location queries.

use crate::Error;

/// Query selecting the entry whose `file` field equals `name`, scoped under
/// the file root.
///
/// The name only enters the expression through [`treetab_tree::quote`]; a
/// name carrying both quote characters is rejected outright, never spliced in
/// raw.
pub fn entry(root: &str, name: &str) -> Result<String, Error> {
    let quoted = treetab_tree::quote(name).ok_or_else(|| Error::UnquotableName {
        name: name.to_string(),
    })?;
    Ok(format!("{}/*[file = {}]", root, quoted))
}
