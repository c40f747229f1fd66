//! Test corpus discovery.
//!
//! A corpus root holds one directory per suite; each suite holds test sources with the configured extension:
//!
//! ```text
//! tests/
//!   basic/add.sc
//!   memory/alloc_struct.sc
//! ```
//!
//! Suites and files are sorted by name so repeated runs visit tests in the same order. Test paths are made absolute
//! against the working directory (without resolving symlinks).

use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// A named group of test files (one corpus subdirectory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    name: String,
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

/// One test source file.
///
/// The raw first-line annotation is not stored here; [`crate::expectation::read_annotation`] reads it when the
/// test is evaluated, so discovery never opens test files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    path: PathBuf,
    suite: String,
}

impl TestCase {
    pub fn new(path: impl Into<PathBuf>, suite: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            suite: suite.into(),
        }
    }

    /// Absolute path of the source.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }
}

/// Discover every suite under `root` and the test files they contain.
///
/// ## Errors
///
/// Returns [`HarnessError::Discovery`] if `root` cannot be read. An unreadable suite directory is logged and
/// skipped; a suite with no matching files is not an error.
#[tracing::instrument(skip_all, fields(root = %root.display(), extension = %extension))]
pub fn discover(root: &Path, extension: &str) -> HarnessResult<Vec<Suite>> {
    let root = path::absolute(root).map_err(|source| HarnessError::Discovery {
        path: root.to_path_buf(),
        source,
    })?;

    let mut suites = Vec::new();
    for dir in sorted_entries(&root)? {
        if !dir.is_dir() || is_hidden(&dir) {
            continue;
        }
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let entries = match sorted_entries(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(suite = %name, error = %e, "skipping unreadable suite");
                continue;
            }
        };
        let cases: Vec<TestCase> = entries
            .into_iter()
            .filter(|path| path.is_file() && has_extension(path, extension))
            .map(|path| TestCase::new(path, name.clone()))
            .collect();

        tracing::debug!(suite = %name, tests = cases.len(), "discovered suite");
        suites.push(Suite { name, cases });
    }

    let total: usize = suites.iter().map(|s| s.cases.len()).sum();
    tracing::info!(suites = suites.len(), tests = total, "discovered corpus");
    Ok(suites)
}

fn sorted_entries(dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    let discovery_error = |source: io::Error| HarnessError::Discovery {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery_error)? {
        paths.push(entry.map_err(discovery_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::ScratchDir;

    #[test]
    fn test_discovers_sorted_suites_and_files() {
        let corpus = ScratchDir::new("discover_sorted");
        corpus.write("memory/alloc_struct.sc", "// 5 10;\n");
        corpus.write("basic/sub.sc", "// 1;\n");
        corpus.write("basic/add.sc", "// 7;\n");
        corpus.write("basic/notes.txt", "not a test");
        corpus.write("README.md", "top-level files are ignored");

        let suites = discover(corpus.path(), "sc").unwrap();
        let names: Vec<_> = suites.iter().map(Suite::name).collect();
        assert_eq!(names, ["basic", "memory"]);

        let basic: Vec<_> = suites[0].cases().iter().map(|c| c.path().file_name().unwrap()).collect();
        assert_eq!(basic, ["add.sc", "sub.sc"]);
        assert_eq!(suites[0].cases()[0].suite(), "basic");
        assert_eq!(suites[0].cases()[0].path(), corpus.path().join("basic/add.sc"));
    }

    #[test]
    fn test_empty_suite_contributes_no_cases() {
        let corpus = ScratchDir::new("discover_empty_suite");
        corpus.mkdir("empty");
        corpus.write("basic/add.sc", "// 7;\n");

        let suites = discover(corpus.path(), "sc").unwrap();
        assert_eq!(suites.len(), 2);
        assert!(suites.iter().find(|s| s.name() == "empty").unwrap().cases().is_empty());
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let corpus = ScratchDir::new("discover_hidden");
        corpus.write(".cache/stale.sc", "// 1;\n");

        assert!(discover(corpus.path(), "sc").unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_suite_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let corpus = ScratchDir::new("discover_unreadable_suite");
        corpus.write("basic/add.sc", "// 7;\n");
        let locked = corpus.mkdir("locked");
        corpus.write("locked/hidden.sc", "// 1;\n");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Permissions are not enforced for this user (e.g. root)
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let suites = discover(corpus.path(), "sc");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<_> = suites.unwrap().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, ["basic"]);
    }

    #[test]
    fn test_paths_are_absolute() {
        let corpus = ScratchDir::new("discover_absolute");
        corpus.write("basic/add.sc", "// 7;\n");

        let suites = discover(corpus.path(), "sc").unwrap();
        assert!(suites[0].cases()[0].path().is_absolute());
    }

    #[test]
    fn test_missing_root_is_a_discovery_error() {
        let corpus = ScratchDir::new("discover_missing");
        let err = discover(&corpus.path().join("nope"), "sc").unwrap_err();
        assert!(matches!(err, HarnessError::Discovery { .. }));
        assert!(err.is_fatal());
    }
}
