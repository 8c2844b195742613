use treetab_mounttab::{Error, MountEntry, MountTab, Platform, Presence, Target};
use treetab_tree::{Error as TreeError, MemoryEngine, Node};

fn entry_node(
    label: &str,
    spec: &str,
    file: &str,
    vfstype: &str,
    opts: &[(&str, Option<&str>)],
    dump: Option<&str>,
    passno: Option<&str>,
) -> Node {
    let mut children = vec![
        Node::leaf("spec", spec),
        Node::leaf("file", file),
        Node::leaf("vfstype", vfstype),
    ];
    for (key, value) in opts {
        let mut opt = Node::leaf("opt", *key);
        if let Some(v) = value {
            opt.children.push(Node::leaf("value", *v));
        }
        children.push(opt);
    }
    if let Some(d) = dump {
        children.push(Node::leaf("dump", d));
    }
    if let Some(p) = passno {
        children.push(Node::leaf("passno", p));
    }
    Node::with_children(label, children)
}

/// A table with a root mount, a data mount, a comment line, and one bare
/// entry that has neither options nor dump/passno.
fn fixture() -> (MountTab<MemoryEngine>, MemoryEngine, Target) {
    let engine = MemoryEngine::new();
    engine.load_file(
        "/etc/fstab",
        vec![
            entry_node(
                "1",
                "/dev/sda1",
                "/",
                "ext4",
                &[("defaults", None)],
                Some("0"),
                Some("1"),
            ),
            entry_node(
                "2",
                "/dev/sdb1",
                "/data",
                "ext4",
                &[("noatime", None), ("defaults", None)],
                Some("0"),
                Some("2"),
            ),
            Node::leaf("#comment", "backups live on /dev/sdc1"),
            entry_node("3", "/dev/sdc1", "/backup", "xfs", &[], None, None),
        ],
    );
    let tab = MountTab::new(engine.clone());
    (tab, engine, Target::new(Platform::Linux))
}

#[test]
fn list_all_projects_flat_records() {
    let (tab, _engine, target) = fixture();
    let entries = tab.list_all(&target).unwrap();

    // The comment line has no `file` child and is skipped.
    assert_eq!(entries.len(), 3);

    let data: Vec<_> = entries.iter().filter(|e| e.name == "/data").collect();
    assert_eq!(data.len(), 1);
    let data = data[0];
    assert_eq!(data.device.as_deref(), Some("/dev/sdb1"));
    assert_eq!(data.fstype.as_deref(), Some("ext4"));
    assert_eq!(data.options, vec!["noatime", "defaults"]);
    assert_eq!(data.dump.as_deref(), Some("0"));
    assert_eq!(data.pass.as_deref(), Some("2"));
    assert_eq!(data.state, Presence::Present);
    assert_eq!(data.target, "/etc/fstab");
}

#[test]
fn list_all_leaves_absent_trailing_fields_unset() {
    let (tab, _engine, target) = fixture();
    let entries = tab.list_all(&target).unwrap();
    let backup = entries.iter().find(|e| e.name == "/backup").unwrap();
    assert!(backup.options.is_empty());
    assert!(backup.dump.is_none());
    assert!(backup.pass.is_none());
}

#[test]
fn create_then_list_round_trips_the_record() {
    let (tab, _engine, target) = fixture();
    let entry = MountEntry::new("/srv/media", "/dev/sdd1", "xfs")
        .with_options(["rw=1", "noauto"])
        .with_dump("1")
        .with_pass("2");
    tab.create(&target, &entry).unwrap();

    let entries = tab.list_all(&target).unwrap();
    let matching: Vec<_> = entries.iter().filter(|e| e.name == "/srv/media").collect();
    assert_eq!(matching.len(), 1);
    let created = matching[0];
    assert_eq!(created.device.as_deref(), Some("/dev/sdd1"));
    assert_eq!(created.fstype.as_deref(), Some("xfs"));
    assert_eq!(created.options, vec!["rw=1", "noauto"]);
    assert_eq!(created.dump.as_deref(), Some("1"));
    assert_eq!(created.pass.as_deref(), Some("2"));
}

#[test]
fn create_fills_unsupplied_fields() {
    let (tab, _engine, target) = fixture();
    tab.create(&target, &MountEntry::new("/scratch", "/dev/sde1", "ext4"))
        .unwrap();

    // No options supplied: the defaults fill-in lands; dump and passno are
    // materialized as "0" rather than left absent.
    assert_eq!(tab.options(&target, "/scratch").unwrap(), "defaults");
    assert_eq!(tab.dump(&target, "/scratch").unwrap().as_deref(), Some("0"));
    assert_eq!(tab.pass(&target, "/scratch").unwrap().as_deref(), Some("0"));
}

#[test]
fn create_renumbers_the_staging_slot() {
    let (tab, engine, target) = fixture();
    tab.create(&target, &MountEntry::new("/scratch", "/dev/sde1", "ext4"))
        .unwrap();
    let dump = engine.dump("/etc/fstab").unwrap();
    assert!(dump.contains("/files/etc/fstab/4/file = \"/scratch\""));
    assert!(!dump.contains("/files/etc/fstab/01"));
}

#[test]
fn create_requires_device_and_fstype() {
    let (tab, _engine, target) = fixture();
    let mut entry = MountEntry::new("/scratch", "/dev/sde1", "ext4");
    entry.fstype = None;
    let err = tab.create(&target, &entry).err().unwrap();
    assert!(matches!(err, Error::MissingField { field: "fstype", .. }));
}

#[test]
fn destroy_removes_and_is_idempotent() {
    let (tab, engine, target) = fixture();
    assert!(tab.exists(&target, "/data").unwrap());
    tab.destroy(&target, "/data").unwrap();
    assert!(!tab.exists(&target, "/data").unwrap());
    assert_eq!(tab.list_all(&target).unwrap().len(), 2);

    // Destroying a name that is not there changes nothing.
    let before = engine.dump("/etc/fstab").unwrap();
    tab.destroy(&target, "/data").unwrap();
    assert_eq!(engine.dump("/etc/fstab").unwrap(), before);
}

#[test]
fn set_options_then_get_round_trips() {
    let (tab, _engine, target) = fixture();
    let cases: Vec<Vec<&str>> = vec![
        vec!["noauto"],
        vec!["rw=1"],
        vec!["noatime", "rw=1", "user=alice", "sync"],
        vec!["defaults", "defaults"],
    ];
    for tokens in cases {
        let owned: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        tab.set_options(&target, "/data", &owned).unwrap();
        assert_eq!(tab.options(&target, "/data").unwrap(), owned.join(","));
    }
}

#[test]
fn set_options_empty_reinstates_defaults() {
    let (tab, _engine, target) = fixture();
    tab.set_options(&target, "/data", &[]).unwrap();
    assert_eq!(tab.options(&target, "/data").unwrap(), "defaults");
}

#[test]
fn set_options_keeps_file_position() {
    let (tab, engine, target) = fixture();
    tab.set_options(
        &target,
        "/data",
        &["ro".to_string(), "user=alice".to_string()],
    )
    .unwrap();

    // In the rendered file the options sit between vfstype and dump.
    let dump = engine.dump("/etc/fstab").unwrap();
    let vfstype_at = dump.find("/files/etc/fstab/2/vfstype").unwrap();
    let opt1_at = dump.find("/files/etc/fstab/2/opt[1] = \"ro\"").unwrap();
    let opt2_at = dump.find("/files/etc/fstab/2/opt[2] = \"user\"").unwrap();
    let dump_at = dump.find("/files/etc/fstab/2/dump").unwrap();
    assert!(vfstype_at < opt1_at && opt1_at < opt2_at && opt2_at < dump_at);
    assert!(dump.contains("/files/etc/fstab/2/opt[2]/value = \"alice\""));
}

#[test]
fn option_value_keeps_later_equals_signs() {
    let (tab, _engine, target) = fixture();
    tab.set_options(&target, "/data", &["rw=ro=strange".to_string()])
        .unwrap();
    assert_eq!(tab.options(&target, "/data").unwrap(), "rw=ro=strange");

    let entries = tab.list_all(&target).unwrap();
    let data = entries.iter().find(|e| e.name == "/data").unwrap();
    assert_eq!(data.options, vec!["rw=ro=strange"]);
}

#[test]
fn empty_option_token_passes_through() {
    let (tab, _engine, target) = fixture();
    tab.set_options(&target, "/data", &[String::new()]).unwrap();
    let entries = tab.list_all(&target).unwrap();
    let data = entries.iter().find(|e| e.name == "/data").unwrap();
    assert_eq!(data.options, vec![String::new()]);
}

#[test]
fn set_dump_seeds_the_options_field() {
    let (tab, _engine, target) = fixture();
    tab.set_dump(&target, "/backup", "1").unwrap();
    assert_eq!(tab.dump(&target, "/backup").unwrap().as_deref(), Some("1"));
    assert_eq!(tab.options(&target, "/backup").unwrap(), "defaults");
}

#[test]
fn set_pass_seeds_options_and_dump() {
    let (tab, _engine, target) = fixture();
    tab.set_pass(&target, "/backup", "2").unwrap();
    assert_eq!(tab.pass(&target, "/backup").unwrap().as_deref(), Some("2"));
    assert_eq!(tab.dump(&target, "/backup").unwrap().as_deref(), Some("0"));
    assert_eq!(tab.options(&target, "/backup").unwrap(), "defaults");
}

#[test]
fn set_pass_leaves_existing_dump_and_options_alone() {
    let (tab, _engine, target) = fixture();
    tab.set_pass(&target, "/data", "9").unwrap();
    assert_eq!(tab.pass(&target, "/data").unwrap().as_deref(), Some("9"));
    assert_eq!(tab.dump(&target, "/data").unwrap().as_deref(), Some("0"));
    assert_eq!(tab.options(&target, "/data").unwrap(), "noatime,defaults");
}

#[test]
fn setters_on_existing_fields_persist_independently() {
    let (tab, _engine, target) = fixture();
    tab.set_device(&target, "/data", "/dev/disk/by-label/data")
        .unwrap();
    tab.set_fstype(&target, "/data", "xfs").unwrap();
    assert_eq!(
        tab.device(&target, "/data").unwrap().as_deref(),
        Some("/dev/disk/by-label/data")
    );
    assert_eq!(tab.fstype(&target, "/data").unwrap().as_deref(), Some("xfs"));
}

#[test]
fn each_setter_is_its_own_durable_write() {
    let (tab, engine, target) = fixture();
    tab.set_device(&target, "/data", "/dev/sdx1").unwrap();

    // A later setter failing does not roll back the earlier one.
    engine.fail_next_save();
    let err = tab.set_fstype(&target, "/data", "xfs").err().unwrap();
    assert!(matches!(err, Error::Tree(TreeError::Save { .. })));
    assert_eq!(
        tab.device(&target, "/data").unwrap().as_deref(),
        Some("/dev/sdx1")
    );
    assert_eq!(tab.fstype(&target, "/data").unwrap().as_deref(), Some("ext4"));
}

#[test]
fn failed_save_leaves_the_durable_tree_untouched() {
    let (tab, engine, target) = fixture();
    let before = engine.dump("/etc/fstab").unwrap();
    engine.fail_next_save();
    let err = tab
        .set_options(&target, "/data", &["ro".to_string()])
        .err()
        .unwrap();
    assert!(matches!(err, Error::Tree(TreeError::Save { .. })));
    assert_eq!(engine.dump("/etc/fstab").unwrap(), before);
    assert_eq!(tab.options(&target, "/data").unwrap(), "noatime,defaults");
}

#[test]
fn set_atboot_is_a_stub_that_never_persists() {
    let (tab, engine, target) = fixture();
    let before = engine.dump("/etc/fstab").unwrap();
    tab.set_atboot(&target, "/data", "yes").unwrap();
    assert_eq!(engine.dump("/etc/fstab").unwrap(), before);
    assert_eq!(tab.atboot(&target, "/data").unwrap(), None);
}

#[test]
fn readers_treat_missing_entries_as_unset() {
    let (tab, _engine, target) = fixture();
    assert_eq!(tab.device(&target, "/nope").unwrap(), None);
    assert_eq!(tab.dump(&target, "/nope").unwrap(), None);
    assert_eq!(tab.options(&target, "/nope").unwrap(), "");
    assert!(!tab.exists(&target, "/nope").unwrap());
}

#[test]
fn mutators_require_an_existing_entry() {
    let (tab, _engine, target) = fixture();
    let err = tab.set_device(&target, "/nope", "/dev/sdz1").err().unwrap();
    assert!(matches!(err, Error::NotFound { .. }));
    let err = tab
        .set_options(&target, "/nope", &["ro".to_string()])
        .err()
        .unwrap();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn names_with_a_single_quote_are_queried_safely() {
    let (tab, _engine, target) = fixture();
    let entry = MountEntry::new("/mnt/o'brien", "/dev/sdf1", "ext4");
    tab.create(&target, &entry).unwrap();
    assert!(tab.exists(&target, "/mnt/o'brien").unwrap());
    assert_eq!(
        tab.device(&target, "/mnt/o'brien").unwrap().as_deref(),
        Some("/dev/sdf1")
    );
    tab.destroy(&target, "/mnt/o'brien").unwrap();
    assert!(!tab.exists(&target, "/mnt/o'brien").unwrap());
}

#[test]
fn unquotable_names_are_rejected_not_spliced() {
    let (tab, _engine, target) = fixture();
    let err = tab.exists(&target, "/a'b\"c").err().unwrap();
    assert!(matches!(err, Error::UnquotableName { .. }));
}

#[test]
fn missing_file_surfaces_io_error() {
    let engine = MemoryEngine::new();
    let tab = MountTab::new(engine);
    let target = Target::new(Platform::Linux);
    let err = tab.list_all(&target).err().unwrap();
    assert!(matches!(err, Error::Tree(TreeError::Io { .. })));
}

#[test]
fn solaris_target_fails_before_any_tree_access() {
    let engine = MemoryEngine::new();
    // Deliberately nothing loaded: the lens refusal must come first.
    let tab = MountTab::new(engine);
    let target = Target::new(Platform::Solaris);
    let err = tab.list_all(&target).err().unwrap();
    assert!(matches!(err, Error::Tree(TreeError::Lens { .. })));
}

#[test]
fn explicit_target_file_is_honored() {
    let engine = MemoryEngine::new();
    engine.load_file(
        "/srv/chroot/etc/fstab",
        vec![entry_node(
            "1",
            "/dev/sda1",
            "/",
            "ext4",
            &[("defaults", None)],
            Some("0"),
            Some("1"),
        )],
    );
    let tab = MountTab::new(engine);
    // Trailing separator is stripped before the engine sees the path.
    let target = Target::with_file(Platform::Linux, "/srv/chroot/etc/fstab/");
    let entries = tab.list_all(&target).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target, "/srv/chroot/etc/fstab");
}
