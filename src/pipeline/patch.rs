//! Document patcher: splice a fresh fragment into the marker-bounded
//! region of the target page.
//!
//! This is the only pipeline stage with an observable side effect, so it is
//! the only one with recovery logic. The contract: on success the marked
//! region is replaced; on any failure the target is left byte-identical to
//! its pre-call state.
//!
//! ## Procedure
//!
//! 1. Check preconditions (target exists, fragment non-empty, marker occurs
//!    exactly twice) — all read-only, no side effects yet.
//! 2. Ensure the sibling backup directory exists and prune old backups down
//!    to the retention cap.
//! 3. Copy the target to a timestamped backup, and arm a [`BackupGuard`].
//! 4. Splice `marker\n{fragment}\n      marker` over the marked span.
//! 5. If the result is byte-identical, succeed without writing.
//! 6. Otherwise write; the guard restores the target from the backup on
//!    every exit path other than success, including panics.
//!
//! Backup names carry a whole-second local timestamp; two patches against
//! the same target within one second collide on the same name. Accepted —
//! callers serialize patches per target (see crate docs).

use crate::config::PublishConfig;
use crate::error::ScheduleError;
use crate::output::PatchOutcome;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Replace the marker-bounded region of `target` with `fragment`.
///
/// # Errors
/// * [`ScheduleError::TargetNotFound`] — target missing
/// * [`ScheduleError::EmptyFragment`] — fragment is whitespace-only
/// * [`ScheduleError::MarkerMismatch`] — marker count ≠ 2
/// * [`ScheduleError::BackupFailed`] / [`ScheduleError::WriteFailed`] — I/O;
///   after a failed write the target has been restored from the backup
pub fn patch_file(
    target: &Path,
    fragment: &str,
    config: &PublishConfig,
) -> Result<PatchOutcome, ScheduleError> {
    // ── Preconditions (read-only) ────────────────────────────────────────
    if !target.exists() {
        return Err(ScheduleError::TargetNotFound {
            path: target.to_path_buf(),
        });
    }
    if fragment.trim().is_empty() {
        return Err(ScheduleError::EmptyFragment);
    }

    let content = fs::read_to_string(target).map_err(|e| ScheduleError::InputReadFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    let occurrences: Vec<usize> = content
        .match_indices(config.marker.as_str())
        .map(|(i, _)| i)
        .collect();
    if occurrences.len() != 2 {
        return Err(ScheduleError::MarkerMismatch {
            path: target.to_path_buf(),
            found: occurrences.len(),
        });
    }

    // ── Backup, then mutate under the guard ──────────────────────────────
    let backup = create_backup(target, config)?;
    let mut guard = BackupGuard::new(target.to_path_buf(), backup.clone());

    let region_start = occurrences[0];
    let region_end = occurrences[1] + config.marker.len();

    let mut new_content = String::with_capacity(content.len() + fragment.len());
    new_content.push_str(&content[..region_start]);
    new_content.push_str(&config.marker);
    new_content.push('\n');
    new_content.push_str(fragment);
    new_content.push_str("\n      ");
    new_content.push_str(&config.marker);
    new_content.push_str(&content[region_end..]);

    if new_content == content {
        info!("Target content unchanged; nothing written");
        guard.disarm();
        return Ok(PatchOutcome {
            target: target.to_path_buf(),
            backup,
            changed: false,
        });
    }

    fs::write(target, &new_content).map_err(|e| ScheduleError::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    guard.disarm();

    info!("Patched {} ({} bytes)", target.display(), new_content.len());
    Ok(PatchOutcome {
        target: target.to_path_buf(),
        backup,
        changed: true,
    })
}

// ── Backup handling ──────────────────────────────────────────────────────────

/// Prune old backups to the retention cap, then copy the current target to
/// a fresh timestamped backup.
fn create_backup(target: &Path, config: &PublishConfig) -> Result<PathBuf, ScheduleError> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let backup_dir = parent.join(&config.backup_dir);
    fs::create_dir_all(&backup_dir).map_err(|e| ScheduleError::BackupFailed {
        path: backup_dir.clone(),
        source: e,
    })?;

    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_string());

    prune_backups(&backup_dir, &name, config.backup_cap)?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup = backup_dir.join(format!("{name}.backup_{stamp}"));
    fs::copy(target, &backup).map_err(|e| ScheduleError::BackupFailed {
        path: backup.clone(),
        source: e,
    })?;
    debug!("Backed up {} → {}", target.display(), backup.display());
    Ok(backup)
}

/// Delete the oldest backups so that after the new one is added at most
/// `cap` remain.
fn prune_backups(backup_dir: &Path, name: &str, cap: usize) -> Result<(), ScheduleError> {
    let prefix = format!("{name}.backup_");
    let entries = fs::read_dir(backup_dir).map_err(|e| ScheduleError::BackupFailed {
        path: backup_dir.to_path_buf(),
        source: e,
    })?;

    let mut backups: Vec<(PathBuf, SystemTime)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .filter_map(|entry| {
            let mtime = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), mtime))
        })
        .collect();
    backups.sort_by_key(|&(_, mtime)| mtime);

    let keep = cap.saturating_sub(1);
    if backups.len() > keep {
        let excess = backups.len() - keep;
        for (path, _) in backups.drain(..excess) {
            fs::remove_file(&path).map_err(|e| ScheduleError::BackupFailed {
                path: path.clone(),
                source: e,
            })?;
            debug!("Pruned old backup {}", path.display());
        }
    }
    Ok(())
}

/// Restores the target from its backup unless disarmed.
///
/// Armed right after the backup copy succeeds; disarmed on both success
/// paths (no-op and written). Every other exit — write error, panic —
/// triggers a best-effort restore in `drop`.
struct BackupGuard {
    target: PathBuf,
    backup: PathBuf,
    armed: bool,
}

impl BackupGuard {
    fn new(target: PathBuf, backup: PathBuf) -> Self {
        Self {
            target,
            backup,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(
                "Patch failed; restoring {} from {}",
                self.target.display(),
                self.backup.display()
            );
            if let Err(e) = fs::copy(&self.backup, &self.target) {
                warn!("Restore from backup failed: {}", e);
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCHEDULE_MARKER;

    fn page_with_markers(body: &str) -> String {
        format!(
            "<html>\n<body>\n      {SCHEDULE_MARKER}\n{body}\n      {SCHEDULE_MARKER}\n</body>\n</html>\n"
        )
    }

    #[test]
    fn replaces_region_between_markers() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, page_with_markers("старое расписание")).unwrap();

        let outcome = patch_file(&target, "<div>новое</div>", &PublishConfig::default()).unwrap();
        assert!(outcome.changed);

        let patched = fs::read_to_string(&target).unwrap();
        assert!(patched.contains("<div>новое</div>"));
        assert!(!patched.contains("старое расписание"));
        assert_eq!(patched.matches(SCHEDULE_MARKER).count(), 2);
        // Page outside the region is untouched.
        assert!(patched.starts_with("<html>\n<body>\n      "));
        assert!(patched.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn missing_target_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = patch_file(
            &dir.path().join("absent.html"),
            "<div>x</div>",
            &PublishConfig::default(),
        );
        assert!(matches!(result, Err(ScheduleError::TargetNotFound { .. })));
    }

    #[test]
    fn whitespace_fragment_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, page_with_markers("x")).unwrap();

        let result = patch_file(&target, "  \n ", &PublishConfig::default());
        assert!(matches!(result, Err(ScheduleError::EmptyFragment)));
    }

    #[test]
    fn single_marker_leaves_file_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        let original = format!("<html>{SCHEDULE_MARKER}</html>");
        fs::write(&target, &original).unwrap();

        let result = patch_file(&target, "<div>x</div>", &PublishConfig::default());
        assert!(
            matches!(result, Err(ScheduleError::MarkerMismatch { found: 1, .. })),
            "got: {result:?}"
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), original);
        // No backup directory either: preconditions run before side effects.
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn three_markers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(
            &target,
            format!("{SCHEDULE_MARKER}a{SCHEDULE_MARKER}b{SCHEDULE_MARKER}"),
        )
        .unwrap();

        let result = patch_file(&target, "<div>x</div>", &PublishConfig::default());
        assert!(matches!(
            result,
            Err(ScheduleError::MarkerMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn identical_content_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, page_with_markers("<div>same</div>")).unwrap();

        let outcome = patch_file(&target, "<div>same</div>", &PublishConfig::default()).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.backup.exists());
    }

    #[test]
    fn backup_holds_pre_patch_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        let original = page_with_markers("до");
        fs::write(&target, &original).unwrap();

        let outcome = patch_file(&target, "<div>после</div>", &PublishConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&outcome.backup).unwrap(), original);
    }
}
