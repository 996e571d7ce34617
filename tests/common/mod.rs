#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use openxt_import::{CopyMethod, ImportConfig, ImportRequest};
use tempfile::TempDir;

/// A receiving repository plus a directory of local "remotes" to import from.
pub struct Fixture {
    _dir: TempDir,
    pub remotes: PathBuf,
    pub root: PathBuf,
    pub work: PathBuf,
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Fixture", "-c", "user.email=fixture@example.com"])
        .args(args)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let remotes = dir.path().join("remotes");
        let root = dir.path().join("workspace");
        let work = dir.path().join("work");
        for path in [&remotes, &root, &work] {
            fs::create_dir_all(path).unwrap();
        }

        git(&root, &["init", "--quiet"]);
        git(&root, &["commit", "--quiet", "--allow-empty", "-m", "initial"]);

        Self {
            _dir: dir,
            remotes,
            root,
            work,
        }
    }

    /// Create `remotes/<name>.git` holding `files` in one commit; returns its revision.
    pub fn add_remote(&self, name: &str, files: &[(&str, &str)]) -> String {
        let path = self.remote_path(name);
        fs::create_dir_all(&path).unwrap();
        git(&path, &["init", "--quiet"]);
        self.write_and_commit(&path, files)
    }

    /// Replace the whole tree of an existing remote with `files` and commit.
    pub fn commit_to_remote(&self, name: &str, files: &[(&str, &str)]) -> String {
        let path = self.remote_path(name);
        git(&path, &["rm", "-r", "--quiet", "."]);
        self.write_and_commit(&path, files)
    }

    fn write_and_commit(&self, path: &Path, files: &[(&str, &str)]) -> String {
        for (file, content) in files {
            write(&path.join(file), content);
        }
        git(path, &["add", "--all"]);
        git(path, &["commit", "--quiet", "-m", "update"]);
        git(path, &["rev-parse", "HEAD"])
    }

    pub fn remote_path(&self, name: &str) -> PathBuf {
        self.remotes.join(format!("{name}.git"))
    }

    pub fn request(&self, name: &str) -> ImportRequest {
        let config = ImportConfig {
            remote_base: self.remotes.to_string_lossy().into_owned(),
            copy_method: CopyMethod::Native,
            ..ImportConfig::default()
        };
        let mut request = ImportRequest::new(name, &self.root, config);
        request.work_parent = Some(self.work.clone());
        request
    }

    pub fn commit_count(&self) -> usize {
        git(&self.root, &["rev-list", "--count", "HEAD"])
            .parse()
            .unwrap()
    }

    pub fn last_message(&self) -> String {
        git(&self.root, &["log", "-1", "--format=%s"])
    }

    pub fn set_local_identity(&self, name: &str, email: &str) {
        git(&self.root, &["config", "--local", "user.name", name]);
        git(&self.root, &["config", "--local", "user.email", email]);
    }

    pub fn work_is_empty(&self) -> bool {
        fs::read_dir(&self.work).unwrap().next().is_none()
    }
}

pub fn rsync_available() -> bool {
    Command::new("rsync")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}
