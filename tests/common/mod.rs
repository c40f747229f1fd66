//! Shared fixtures: a throwaway corpus plus a toy toolchain made of shell scripts.
//!
//! Test sources carry directives the toy compiler understands:
//!
//! - `//@ compile: <line>` is echoed on the compiler's stdout
//! - `//@ print: <line>` becomes a line the built program prints
//! - `//@ nobuild` makes the build step exit without producing an executable
//! - `//@ hang` makes the built program sleep far past any test timeout
//! - `//@ hang-child` makes the built program exit at once, leaving a sleeping child holding its stdout
//! - `//@ slowlink` makes the build step block on a subshell that writes `work/late_link` after two seconds

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use sctest::{CommandLine, HarnessConfig};

pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(name: &str) -> Self {
        let root = env::temp_dir().join(format!("sctest_it_{}_{}", process::id(), name));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::create_dir_all(root.join("work")).unwrap();

        let work = root.join("work");
        let work = work.display();
        fs::write(
            root.join("compile.sh"),
            format!(
                r#"#!/bin/sh
src="$1"
sed -n 's|^//@ compile: ||p' "$src"
sed -n 's|^//@ print: ||p' "$src" > "{work}/program.txt"
for flag in nobuild hang hang-child slowlink; do
    if grep -q "^//@ $flag\$" "$src"; then touch "{work}/$flag"; else rm -f "{work}/$flag"; fi
done
"#
            ),
        )
        .unwrap();
        fs::write(
            root.join("build.sh"),
            format!(
                r#"#!/bin/sh
if [ -f "{work}/nobuild" ]; then echo "link error" >&2; exit 1; fi
if [ -f "{work}/slowlink" ]; then
    (sleep 2; echo late > "{work}/late_link")
fi
if [ -f "{work}/hang" ]; then
    printf '#!/bin/sh\nexec sleep 30\n' > "{work}/a.out"
elif [ -f "{work}/hang-child" ]; then
    printf '#!/bin/sh\nsleep 30 &\necho 1\n' > "{work}/a.out"
else
    printf '#!/bin/sh\ncat "{work}/program.txt"\n' > "{work}/a.out"
fi
chmod +x "{work}/a.out"
"#
            ),
        )
        .unwrap();

        Self { root }
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.root.join("tests")
    }

    pub fn work_file(&self, name: &str) -> PathBuf {
        self.root.join("work").join(name)
    }

    pub fn executable(&self) -> PathBuf {
        self.root.join("work").join("a.out")
    }

    pub fn compiler(&self) -> String {
        format!("sh {}", self.root.join("compile.sh").display())
    }

    pub fn build(&self) -> String {
        format!("sh {}", self.root.join("build.sh").display())
    }

    /// Add a test source under the corpus root.
    pub fn test(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.tests_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::new()
            .with_tests_dir(self.tests_dir())
            .with_compiler(self.compiler().parse::<CommandLine>().unwrap())
            .with_build(self.build().parse::<CommandLine>().unwrap())
            .with_executable(self.executable())
            .with_timeout_secs(10)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
