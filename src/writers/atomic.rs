use crate::error::Result;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Output staged in a temporary file beside its final location.
pub struct StagedFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    /// Stage in the target's directory so the final rename never crosses filesystems.
    pub fn new(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".staging-")
            .tempfile_in(dir)?;

        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

fn restore(backups: &[(PathBuf, PathBuf)]) {
    for (target, backup) in backups {
        if let Err(e) = fs::rename(backup, target) {
            warn!("Could not restore {} from backup: {}", target.display(), e);
        }
    }
}

/// Move every staged file into place, or none of them.
///
/// Existing targets are set aside as `.bak` first and put back if any
/// step fails; staged files left behind are removed on drop.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    for file in &staged {
        file.temp.as_file().sync_all()?;
    }

    let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
    for file in &staged {
        if file.target.exists() {
            let backup = backup_path(&file.target);
            if let Err(e) = fs::rename(&file.target, &backup) {
                restore(&backups);
                return Err(e.into());
            }
            backups.push((file.target.clone(), backup));
        }
    }

    let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for file in staged {
        let target = file.target;
        if let Err(e) = file.temp.persist(&target) {
            for path in &persisted {
                let _ = fs::remove_file(path);
            }
            restore(&backups);
            return Err(e.into());
        }
        debug!("Committed {}", target.display());
        persisted.push(target);
    }

    for (_, backup) in backups {
        if let Err(e) = fs::remove_file(&backup) {
            warn!("Could not remove backup {}: {}", backup.display(), e);
        }
    }

    Ok(persisted)
}
