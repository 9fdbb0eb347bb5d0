//! ISO discovery — scan one directory for `*.iso` files and number them.
//!
//! Numbers are 1-based and only valid until the next [`IsoManager::load`].

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::mount::{LoopMount, MountError, Mounter};

/// Where images are mounted when no target is given.
pub const DEFAULT_MOUNT_DIR: &str = "/tmp/iso2chroot";

#[derive(Debug, Error)]
pub enum IsoError {
    #[error("read {}: {error}", path.display())]
    ReadDir { path: PathBuf, error: walkdir::Error },
    #[error("choice {0} not available")]
    Unavailable(usize),
    #[error("prepare mount dir {}: {error}", path.display())]
    PrepareMountDir { path: PathBuf, error: std::io::Error },
    #[error(transparent)]
    Mount(#[from] MountError),
}

/// A single ISO entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoInfo {
    pub name: String,
}

/// Formatted presentation of the last scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// One `"{n:>2}. {name}\n"` line per image, or a "none found" notice.
    pub display: String,
    pub count: usize,
}

pub struct IsoManager {
    dir: PathBuf,
    by_choice: HashMap<usize, IsoInfo>,
    ordered: Vec<IsoInfo>,
    mounter: Box<dyn Mounter>,
}

impl IsoManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_mounter(dir, LoopMount)
    }

    pub fn with_mounter(dir: impl Into<PathBuf>, mounter: impl Mounter + 'static) -> Self {
        Self {
            dir: dir.into(),
            by_choice: HashMap::new(),
            ordered: Vec::new(),
            mounter: Box::new(mounter),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn entry_count(&self) -> usize {
        self.ordered.len()
    }

    /// Rescan the directory and renumber its images, sorted by file name.
    pub fn load(&mut self) -> Result<Listing, IsoError> {
        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1) // immediate children only
            .sort_by_file_name();

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|error| IsoError::ReadDir {
                path: self.dir.clone(),
                error,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().ends_with(".iso") {
                names.push(name);
            }
        }
        tracing::debug!(dir = %self.dir.display(), found = names.len(), "scanned for ISOs");

        self.by_choice.clear();
        self.ordered.clear();

        if names.is_empty() {
            return Ok(Listing {
                display: format!("No ISO files found in {}", self.dir.display()),
                count: 0,
            });
        }

        let mut display = String::new();
        for (i, name) in names.into_iter().enumerate() {
            let choice = i + 1;
            let _ = writeln!(display, "{choice:>2}. {name}");
            let info = IsoInfo { name };
            self.by_choice.insert(choice, info.clone());
            self.ordered.push(info);
        }

        Ok(Listing {
            display,
            count: self.ordered.len(),
        })
    }

    /// Look up an image by the number shown in the last listing.
    pub fn select(&self, choice: usize) -> Result<IsoInfo, IsoError> {
        self.by_choice
            .get(&choice)
            .cloned()
            .ok_or(IsoError::Unavailable(choice))
    }

    pub fn mount(&self, choice: usize, target: &Path) -> Result<IsoInfo, IsoError> {
        let iso = self.select(choice)?;
        self.mount_image(&iso, target)?;
        Ok(iso)
    }

    /// Mount `iso` read-only at `target` (or [`DEFAULT_MOUNT_DIR`] when
    /// `target` is empty), creating the directory first.
    pub fn mount_image(&self, iso: &IsoInfo, target: &Path) -> Result<(), IsoError> {
        let target = if target.as_os_str().is_empty() {
            Path::new(DEFAULT_MOUNT_DIR)
        } else {
            target
        };

        std::fs::create_dir_all(target).map_err(|error| IsoError::PrepareMountDir {
            path: target.to_path_buf(),
            error,
        })?;

        let image = self.dir.join(&iso.name);
        self.mounter.mount(&image, target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mount::testing::RecordingMounter;

    fn iso_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn lists_only_iso_files_sorted() {
        let dir = iso_dir(&["b.iso", "a.iso", "notes.txt", "C.ISO"]);
        std::fs::create_dir(dir.path().join("dir.iso")).unwrap();

        let mut manager = IsoManager::new(dir.path());
        let listing = manager.load().unwrap();

        assert_eq!(listing.count, 3);
        assert_eq!(listing.display, " 1. C.ISO\n 2. a.iso\n 3. b.iso\n");
        assert_eq!(manager.entry_count(), 3);
        assert_eq!(manager.select(3).unwrap().name, "b.iso");
    }

    #[test]
    fn empty_directory_reports_none_and_clears_choices() {
        let dir = iso_dir(&["a.iso"]);
        let mut manager = IsoManager::new(dir.path());
        manager.load().unwrap();
        assert!(manager.select(1).is_ok());

        std::fs::remove_file(dir.path().join("a.iso")).unwrap();
        let listing = manager.load().unwrap();

        assert_eq!(listing.count, 0);
        assert!(listing.display.starts_with("No ISO files found in "));
        assert!(matches!(manager.select(1), Err(IsoError::Unavailable(1))));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = IsoManager::new(dir.path().join("nope"));
        let err = manager.load().unwrap_err();
        assert!(matches!(err, IsoError::ReadDir { .. }));
        assert!(err.to_string().starts_with("read "));
    }

    #[test]
    fn unknown_choice_message() {
        let manager = IsoManager::new("/nonexistent");
        assert_eq!(manager.select(7).unwrap_err().to_string(), "choice 7 not available");
    }

    #[test]
    fn mount_creates_target_and_passes_image_path() {
        let dir = iso_dir(&["a.iso", "b.iso"]);
        let target = tempfile::tempdir().unwrap();
        let target = target.path().join("nested/root");

        let mounter = RecordingMounter::default();
        let calls = mounter.calls.clone();
        let mut manager = IsoManager::with_mounter(dir.path(), mounter);
        manager.load().unwrap();

        let iso = manager.mount(2, &target).unwrap();

        assert_eq!(iso.name, "b.iso");
        assert!(target.is_dir());
        assert_eq!(
            calls.borrow().as_slice(),
            [(dir.path().join("b.iso"), target.clone())]
        );
    }

    #[test]
    fn mount_failure_is_surfaced() {
        let dir = iso_dir(&["a.iso"]);
        let target = tempfile::tempdir().unwrap();
        let mut manager =
            IsoManager::with_mounter(dir.path(), RecordingMounter::failing("not a block device"));
        manager.load().unwrap();

        let err = manager.mount(1, target.path()).unwrap_err();
        assert!(matches!(err, IsoError::Mount(_)));
        assert!(err.to_string().contains("not a block device"));
    }

    #[test]
    fn mount_rejects_unknown_choice_before_touching_disk() {
        let mounter = RecordingMounter::default();
        let calls = mounter.calls.clone();
        let manager = IsoManager::with_mounter("/nonexistent", mounter);

        assert!(matches!(
            manager.mount(1, Path::new("")),
            Err(IsoError::Unavailable(1))
        ));
        assert!(calls.borrow().is_empty());
    }
}
