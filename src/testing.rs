//! Test-only filesystem helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// A temporary directory removed on drop.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub(crate) fn new(name: &str) -> Self {
        let path = env::temp_dir().join(format!("sctest_{}_{}", process::id(), name));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap_or_else(|e| panic!("cannot create {}: {}", path.display(), e));
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn mkdir(&self, relative: &str) -> PathBuf {
        let dir = self.path.join(relative);
        fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("cannot create {}: {}", dir.display(), e));
        dir
    }

    pub(crate) fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let file = self.path.join(relative);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| panic!("cannot create {}: {}", parent.display(), e));
        }
        fs::write(&file, contents).unwrap_or_else(|e| panic!("cannot write {}: {}", file.display(), e));
        file
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
