//! # Post-Print Hooks
//!
//! Every executable file in the hooks directory runs once after a
//! successful print, in file-name order. A failing hook is logged and does
//! not stop the others.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::error::{PaperangError, Result};

/// Executables found in a hooks directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    scripts: Vec<PathBuf>,
}

impl Hooks {
    /// Collect the executable regular files in `dir`.
    ///
    /// A directory that does not exist yields no hooks. Entries that cannot
    /// be inspected (dangling symlinks, permission errors) are skipped.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(PaperangError::Hook(format!("{}: {}", dir.display(), e))),
        };

        let mut scripts = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping hook {}: {}", path.display(), e);
                    continue;
                }
            };
            if metadata.is_file() && is_executable(&metadata) {
                scripts.push(path);
            }
        }
        scripts.sort();
        Ok(Self { scripts })
    }

    pub fn scripts(&self) -> &[PathBuf] {
        &self.scripts
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Run every hook and return how many failed.
    pub fn run_all(&self) -> usize {
        self.scripts
            .iter()
            .filter(|script| {
                info!("Running hook {}", script.display());
                match Command::new(script).status() {
                    Ok(status) if status.success() => false,
                    Ok(status) => {
                        warn!("Hook {} exited with {}", script.display(), status);
                        true
                    }
                    Err(e) => {
                        warn!("Hook {} failed to start: {}", script.display(), e);
                        true
                    }
                }
            })
            .count()
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

// ============================================================================
// TESTS
// ============================================================================
