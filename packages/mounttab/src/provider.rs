//! Mount-table operations over a tree engine.
//!
//! Every public operation opens one session, does its reads and writes, saves
//! at most once, and lets the session drop. Nothing carries across calls, so
//! setting N fields means N fully durable writes — that shape is observable
//! behavior, not an accident.

use treetab_tree::{TreeEngine, TreeSession};

use crate::{locate, options, Error, MountEntry, Presence, Target};

/// Mount-table fields addressable one at a time.
///
/// Each variant knows its node label inside an entry subtree. `Atboot` is
/// readable, but its setter is a deliberate no-op: the field has no usable
/// tree representation yet, and the stub stays visible so callers can rely on
/// "setting atboot never persists anything".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Device,
    Fstype,
    Dump,
    Pass,
    Atboot,
}

impl Field {
    fn node(&self) -> &'static str {
        match self {
            Field::Device => "spec",
            Field::Fstype => "vfstype",
            Field::Dump => "dump",
            Field::Pass => "passno",
            Field::Atboot => "atboot",
        }
    }
}

/// Flat-record view of mount-table files, generic over the tree engine that
/// parses them.
pub struct MountTab<E: TreeEngine> {
    engine: E,
}

impl<E: TreeEngine> MountTab<E> {
    pub fn new(engine: E) -> Self {
        MountTab { engine }
    }

    fn open(&self, target: &Target) -> Result<E::Session, Error> {
        let lens = target.lens()?;
        Ok(self.engine.open(lens, target.file())?)
    }

    /// Concrete node path of the entry named `name`; `NotFound` when the file
    /// has no such entry. Mutations resolve their target once through this
    /// and address the concrete node afterwards.
    fn entry_path(session: &mut E::Session, target: &Target, name: &str) -> Result<String, Error> {
        let query = locate::entry(&target.root(), name)?;
        session
            .matches(&query)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
                file: target.file().to_string(),
            })
    }

    /// Every entry in the file as a flat record, tagged present.
    ///
    /// Nodes without a resolvable name — comment lines, malformed records —
    /// are skipped rather than failing the listing. dump and pass are read
    /// only when their nodes exist; absence stays absence.
    pub fn list_all(&self, target: &Target) -> Result<Vec<MountEntry>, Error> {
        let mut session = self.open(target)?;
        let mut entries = Vec::new();
        for path in session.matches(&format!("{}/*", target.root()))? {
            let Some(name) = session.get(&format!("{}/file", path))? else {
                continue;
            };
            entries.push(MountEntry {
                name,
                device: session.get(&format!("{}/spec", path))?,
                fstype: session.get(&format!("{}/vfstype", path))?,
                options: options::read(&mut session, &path)?,
                dump: session.get(&format!("{}/dump", path))?,
                pass: session.get(&format!("{}/passno", path))?,
                state: Presence::Present,
                target: target.file().to_string(),
            });
        }
        log::debug!("listed {} entries from {}", entries.len(), target.file());
        Ok(entries)
    }

    /// True when an entry named `name` exists in the file.
    pub fn exists(&self, target: &Target, name: &str) -> Result<bool, Error> {
        let mut session = self.open(target)?;
        let query = locate::entry(&target.root(), name)?;
        Ok(!session.matches(&query)?.is_empty())
    }

    /// Write a new entry into the staging slot and save once.
    ///
    /// Fields land in record order: spec, file, vfstype, options, dump,
    /// passno. dump and passno are always written — unset coerces to "0" —
    /// because trailing fields must not dangle behind an absent options
    /// field. The `01` slot label is a placeholder the engine renumbers on
    /// save.
    pub fn create(&self, target: &Target, entry: &MountEntry) -> Result<(), Error> {
        let device = entry.device.as_deref().ok_or_else(|| Error::MissingField {
            name: entry.name.clone(),
            field: "device",
        })?;
        let fstype = entry.fstype.as_deref().ok_or_else(|| Error::MissingField {
            name: entry.name.clone(),
            field: "fstype",
        })?;

        let mut session = self.open(target)?;
        let slot = format!("{}/01", target.root());
        session.set(&format!("{}/spec", slot), device)?;
        session.set(&format!("{}/file", slot), &entry.name)?;
        session.set(&format!("{}/vfstype", slot), fstype)?;
        options::append(&mut session, &slot, &entry.options)?;
        session.set(&format!("{}/dump", slot), entry.dump.as_deref().unwrap_or("0"))?;
        session.set(
            &format!("{}/passno", slot),
            entry.pass.as_deref().unwrap_or("0"),
        )?;
        log::debug!("creating mount entry '{}' in {}", entry.name, target.file());
        session.save()?;
        Ok(())
    }

    /// Remove the whole subtree of the entry named `name` and save. A name
    /// with no entry removes nothing and still saves — callers are expected
    /// to check `exists` first, but nothing breaks if they don't.
    pub fn destroy(&self, target: &Target, name: &str) -> Result<(), Error> {
        let mut session = self.open(target)?;
        let query = locate::entry(&target.root(), name)?;
        let removed = session.remove(&query)?;
        log::debug!(
            "destroyed {} subtree(s) for '{}' in {}",
            removed,
            name,
            target.file()
        );
        session.save()?;
        Ok(())
    }

    /// Read one field of the entry named `name`. `Ok(None)` both when the
    /// field node is absent and when the entry itself is — an absent record
    /// is a normal read result, not an error.
    pub fn get_field(
        &self,
        target: &Target,
        name: &str,
        field: Field,
    ) -> Result<Option<String>, Error> {
        let mut session = self.open(target)?;
        let query = locate::entry(&target.root(), name)?;
        Ok(session.get(&format!("{}/{}", query, field.node()))?)
    }

    /// The entry's options, comma-joined — the flat form the resource
    /// boundary exchanges. An absent entry reads as the empty string.
    pub fn options(&self, target: &Target, name: &str) -> Result<String, Error> {
        let mut session = self.open(target)?;
        let query = locate::entry(&target.root(), name)?;
        let tokens = options::read(&mut session, &query)?;
        Ok(options::to_property(&tokens))
    }

    /// Set one field of an existing entry and save.
    ///
    /// The record format fills left to right: dump may not appear without an
    /// options field, and passno may not appear without dump. The dump and
    /// pass setters therefore seed whatever is missing to their left —
    /// options with the `defaults` fill-in, dump with "0" — before writing.
    pub fn set_field(
        &self,
        target: &Target,
        name: &str,
        field: Field,
        value: &str,
    ) -> Result<(), Error> {
        if field == Field::Atboot {
            // Deliberately not persisted; see the Field docs.
            log::debug!("ignoring atboot update for '{}'", name);
            return Ok(());
        }

        let mut session = self.open(target)?;
        let entry = Self::entry_path(&mut session, target, name)?;
        match field {
            Field::Dump => {
                Self::seed_options(&mut session, &entry)?;
            }
            Field::Pass => {
                Self::seed_options(&mut session, &entry)?;
                if session.matches(&format!("{}/dump", entry))?.is_empty() {
                    session.set(&format!("{}/dump", entry), "0")?;
                }
            }
            Field::Device | Field::Fstype | Field::Atboot => {}
        }
        session.set(&format!("{}/{}", entry, field.node()), value)?;
        session.save()?;
        Ok(())
    }

    /// Replace the option list of an existing entry and save.
    pub fn set_options(&self, target: &Target, name: &str, tokens: &[String]) -> Result<(), Error> {
        let mut session = self.open(target)?;
        let entry = Self::entry_path(&mut session, target, name)?;
        options::rebuild(&mut session, &entry, tokens)?;
        session.save()?;
        Ok(())
    }

    fn seed_options(session: &mut E::Session, entry: &str) -> Result<(), Error> {
        if session.matches(&format!("{}/opt", entry))?.is_empty() {
            session.set(&format!("{}/opt", entry), options::DEFAULTS)?;
        }
        Ok(())
    }

    // Per-field accessors: the resource-model boundary.

    pub fn device(&self, target: &Target, name: &str) -> Result<Option<String>, Error> {
        self.get_field(target, name, Field::Device)
    }

    pub fn set_device(&self, target: &Target, name: &str, value: &str) -> Result<(), Error> {
        self.set_field(target, name, Field::Device, value)
    }

    pub fn fstype(&self, target: &Target, name: &str) -> Result<Option<String>, Error> {
        self.get_field(target, name, Field::Fstype)
    }

    pub fn set_fstype(&self, target: &Target, name: &str, value: &str) -> Result<(), Error> {
        self.set_field(target, name, Field::Fstype, value)
    }

    pub fn dump(&self, target: &Target, name: &str) -> Result<Option<String>, Error> {
        self.get_field(target, name, Field::Dump)
    }

    pub fn set_dump(&self, target: &Target, name: &str, value: &str) -> Result<(), Error> {
        self.set_field(target, name, Field::Dump, value)
    }

    pub fn pass(&self, target: &Target, name: &str) -> Result<Option<String>, Error> {
        self.get_field(target, name, Field::Pass)
    }

    pub fn set_pass(&self, target: &Target, name: &str, value: &str) -> Result<(), Error> {
        self.set_field(target, name, Field::Pass, value)
    }

    pub fn atboot(&self, target: &Target, name: &str) -> Result<Option<String>, Error> {
        self.get_field(target, name, Field::Atboot)
    }

    pub fn set_atboot(&self, target: &Target, name: &str, value: &str) -> Result<(), Error> {
        self.set_field(target, name, Field::Atboot, value)
    }
}
