use std::fs::{self, File};

use tempfile::TempDir;
use unaccent_core::{rename, restore_from_file, Ledger, LogBuffer, LogLine, NoProgress, SanitizeConfig};

/// Each character transliterates to several ASCII letters, so the sanitized
/// name no longer fits in a single path component.
fn overlong_name() -> String {
    "中".repeat(80)
}

#[test]
fn failed_rename_is_logged_and_left_out_of_the_ledger() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let long_name = overlong_name();
    fs::create_dir(root.join("Mục 1")).unwrap();
    File::create(root.join("Mục 1").join(&long_name)).unwrap();
    File::create(root.join("Mục 1/Báo.txt")).unwrap();
    File::create(root.join("Ảnh.png")).unwrap();
    let mut log = LogBuffer::new();

    let outcome = rename(root, SanitizeConfig::default(), true, &mut NoProgress, &mut log).unwrap();

    assert_eq!(outcome.walk.changes, 4);
    assert_eq!(outcome.walk.renamed, 3);
    assert_eq!(outcome.walk.failed, 1);
    assert_eq!(log.failures(), 1);
    assert!(root.join("Anh.png").is_file());
    assert!(root.join("Muc 1/Bao.txt").is_file());
    assert!(root.join("Muc 1").join(&long_name).is_file());

    let backup = outcome.backup_file.unwrap();
    let ledger = Ledger::load(&backup).unwrap();
    assert_eq!(ledger.len(), 3);
    assert!(ledger
        .records()
        .iter()
        .all(|r| !r.original_path.contains(&long_name)));

    let result = restore_from_file(&backup, &mut NoProgress, &mut LogBuffer::new()).unwrap();
    assert_eq!(result.restored, 3);
    assert!(root.join("Mục 1").join(&long_name).is_file());
    assert!(root.join("Mục 1/Báo.txt").is_file());
}

#[cfg(unix)]
mod permissions {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use unaccent_core::UnaccentError;

    fn set_mode(path: &Path, mode: u32) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    /// Privileged users ignore permission bits; those runs have nothing to check.
    fn is_writable(dir: &Path) -> bool {
        let marker = dir.join(".write-check");
        let writable = File::create(&marker).is_ok();
        let _ = fs::remove_file(&marker);
        writable
    }

    #[test]
    fn read_only_root_fails_directory_rename_and_backup() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("Mục 1")).unwrap();
        File::create(root.join("Mục 1/Báo.txt")).unwrap();
        set_mode(root, 0o555);
        if is_writable(root) {
            set_mode(root, 0o755);
            eprintln!("permission bits are not enforced for this user; skipping");
            return;
        }

        let mut log = LogBuffer::new();
        let outcome = rename(root, SanitizeConfig::default(), true, &mut NoProgress, &mut log);
        set_mode(root, 0o755);
        let outcome = outcome.unwrap();

        assert_eq!(outcome.walk.renamed, 1);
        assert_eq!(outcome.walk.failed, 1);
        assert!(root.join("Mục 1/Bao.txt").is_file());
        assert!(matches!(
            &log.lines[1],
            LogLine::Failed { path, target: Some(_), .. } if path.ends_with("Mục 1")
        ));
        assert_eq!(outcome.walk.ledger.len(), 1);
        assert!(outcome.walk.ledger.records()[0].final_path.ends_with("Bao.txt"));
        assert!(outcome.backup_file.is_none());
        assert!(matches!(outcome.backup_error, Some(UnaccentError::LedgerWrite { .. })));
    }

    #[test]
    fn unreadable_subdirectory_does_not_stop_the_walk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("khóa")).unwrap();
        File::create(root.join("khóa/Báo.txt")).unwrap();
        File::create(root.join("Ảnh.png")).unwrap();
        set_mode(&root.join("khóa"), 0o000);
        if fs::read_dir(root.join("khóa")).is_ok() {
            set_mode(&root.join("khóa"), 0o755);
            eprintln!("permission bits are not enforced for this user; skipping");
            return;
        }

        let mut log = LogBuffer::new();
        let outcome = rename(root, SanitizeConfig::default(), false, &mut NoProgress, &mut log);
        set_mode(&root.join("khoa"), 0o755);
        let outcome = outcome.unwrap();

        assert!(root.join("Anh.png").is_file());
        assert!(root.join("khoa/Báo.txt").is_file());
        assert_eq!(outcome.walk.renamed, 2);
        assert_eq!(outcome.walk.failed, 1);
        assert!(log.lines.iter().any(|l| matches!(
            l,
            LogLine::Failed { path, reason, .. }
                if path.ends_with("khóa") && reason.starts_with("cannot read directory")
        )));
    }
}
