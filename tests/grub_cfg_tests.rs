//! Boot menu reconstruction against generated grub.cfg files.

mod helpers;

use grub2cfg::cfa::MemoryFile;
use grub2cfg::grub2::{BootEntry, GrubCfg};
use helpers::{fixture, TestEnv};
use std::sync::Arc;

fn load_fixture(name: &str) -> GrubCfg {
    let file = Arc::new(MemoryFile::new(fixture(name)));
    let mut grub_cfg = GrubCfg::new(file).expect("menu regexes compile");
    grub_cfg.load().expect("load should succeed");
    grub_cfg
}

fn entry(title: &str, path: &str) -> BootEntry {
    BootEntry::new(title, path)
}

#[test]
fn test_sections_lists_titles() {
    let grub_cfg = load_fixture("grub.cfg");
    assert_eq!(
        grub_cfg.sections(),
        vec![
            "openSUSE Leap 42.1",
            "openSUSE Leap 42.1, with Linux 4.1.12-1-default",
            "openSUSE Leap 42.1, with Linux 4.1.12-1-default (recovery mode)",
            "halt",
        ]
    );
}

#[test]
fn test_boot_entries_have_submenu_paths() {
    let grub_cfg = load_fixture("grub.cfg");
    assert_eq!(
        grub_cfg.boot_entries(),
        &[
            entry("openSUSE Leap 42.1", "openSUSE Leap 42.1"),
            entry(
                "openSUSE Leap 42.1, with Linux 4.1.12-1-default",
                "Advanced options for openSUSE Leap 42.1>openSUSE Leap 42.1, with Linux 4.1.12-1-default",
            ),
            entry(
                "openSUSE Leap 42.1, with Linux 4.1.12-1-default (recovery mode)",
                "Advanced options for openSUSE Leap 42.1>openSUSE Leap 42.1, with Linux 4.1.12-1-default (recovery mode)",
            ),
            entry("halt", "halt"),
        ]
    );
}

#[test]
fn test_snapper_hint_entries_are_filtered() {
    let grub_cfg = load_fixture("grub-with-snapper.cfg");
    assert_eq!(
        grub_cfg.boot_entries(),
        &[
            entry("SLES 12-SP2", "SLES 12-SP2"),
            entry(
                "SLES 12-SP2, with Linux 4.4.13-46-default",
                "Advanced options for SLES 12-SP2>SLES 12-SP2, with Linux 4.4.13-46-default",
            ),
            entry(
                "SLES 12-SP2, with Linux 4.4.13-46-default (recovery mode)",
                "Advanced options for SLES 12-SP2>SLES 12-SP2, with Linux 4.4.13-46-default (recovery mode)",
            ),
        ]
    );
}

#[test]
fn test_multilevel_submenus() {
    let grub_cfg = load_fixture("grub_multilevel.cfg");
    let xen = "Advanced options for SLES 12-SP2 (with Xen hypervisor)>Xen hypervisor, version 4.7.0_12-23";
    assert_eq!(
        grub_cfg.boot_entries(),
        &[
            entry("SLES 12-SP2", "SLES 12-SP2"),
            entry(
                "SLES 12-SP2, with Linux 4.4.30-69-default-bug1005169",
                "Advanced options for SLES 12-SP2>SLES 12-SP2, with Linux 4.4.30-69-default-bug1005169",
            ),
            entry(
                "SLES 12-SP2, with Linux 4.4.21-69-default",
                "Advanced options for SLES 12-SP2>SLES 12-SP2, with Linux 4.4.21-69-default",
            ),
            entry(
                "SLES 12-SP2, with Linux 4.4.21-68-default",
                "Advanced options for SLES 12-SP2>SLES 12-SP2, with Linux 4.4.21-68-default",
            ),
            entry(
                "SLES 12-SP2, with Xen hypervisor",
                "SLES 12-SP2, with Xen hypervisor",
            ),
            entry(
                "SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.30-69-default-bug1005169",
                &format!(
                    "{}>SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.30-69-default-bug1005169",
                    xen
                ),
            ),
            entry(
                "SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.21-69-default",
                &format!(
                    "{}>SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.21-69-default",
                    xen
                ),
            ),
            entry(
                "SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.21-68-default",
                &format!(
                    "{}>SLES 12-SP2, with Xen 4.7.0_12-23 and Linux 4.4.21-68-default",
                    xen
                ),
            ),
        ]
    );
}

#[test]
fn test_save_is_refused() {
    let grub_cfg = load_fixture("grub.cfg");
    let err = grub_cfg.save().unwrap_err();
    assert!(format!("{:#}", err).contains("grub2-mkconfig"));
}

#[test]
fn test_load_from_disk() {
    let env = TestEnv::new();
    env.install_grub_cfg("grub_multilevel.cfg");

    let mut grub_cfg = GrubCfg::with_path(env.handler(), &env.config.grub_cfg).unwrap();
    grub_cfg.load().unwrap();
    assert_eq!(grub_cfg.boot_entries().len(), 8);

    // grub.cfg on disk is never touched
    assert!(grub_cfg.save().is_err());
    assert_eq!(helpers::read(&env.config.grub_cfg), fixture("grub_multilevel.cfg"));
}

#[test]
fn test_missing_file_fails_to_load() {
    let env = TestEnv::new();
    let mut grub_cfg = GrubCfg::with_path(env.handler(), &env.config.grub_cfg).unwrap();
    assert!(grub_cfg.load().is_err());
}

#[test]
fn test_entries_round_trip_through_json() {
    let grub_cfg = load_fixture("grub.cfg");
    let json = serde_json::to_string(grub_cfg.boot_entries()).unwrap();
    let parsed: Vec<BootEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, grub_cfg.boot_entries());
}
