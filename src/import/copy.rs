use std::fs;
use std::path::Path;
use std::process::Command;

use cause::{Cause, cause};
use log::debug;
use walkdir::{DirEntry, WalkDir};

use super::common::ErrorType::{
    DestinationCreation, NativeCopy, RsyncCommand, RsyncCommandExitStatus,
};
use super::common::{CopyMethod, ErrorType, command::run_checked};

/// Version-control metadata never copied into the destination.
pub const EXCLUDED_NAME: &str = ".git";

/// Copy the tree at `source` into `dest`, creating `dest` first.
///
/// Files already in `dest` are overwritten; files absent from `source` are left alone.
pub fn copy_tree(source: &Path, dest: &Path, method: CopyMethod) -> Result<(), Cause<ErrorType>> {
    fs::create_dir_all(dest).map_err(|e| {
        cause!(DestinationCreation)
            .src(e)
            .msg(format!("Could not create {}", dest.display()))
    })?;

    println!("  - copy ({method}): {}", dest.display());

    match method {
        CopyMethod::Rsync => copy_with_rsync(source, dest),
        CopyMethod::Native => copy_native(source, dest),
    }
}

fn copy_with_rsync(source: &Path, dest: &Path) -> Result<(), Cause<ErrorType>> {
    // Trailing slash: copy the contents of `source`, not the directory itself.
    let mut source_arg = source.as_os_str().to_owned();
    source_arg.push("/");

    let mut command = Command::new("rsync");
    command
        .args(["-rE", "--exclude", EXCLUDED_NAME])
        .arg(source_arg)
        .arg(dest);
    run_checked(command, RsyncCommand, RsyncCommandExitStatus)
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name() == EXCLUDED_NAME
}

fn copy_native(source: &Path, dest: &Path) -> Result<(), Cause<ErrorType>> {
    let walker = WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    for entry in walker {
        let entry = entry.map_err(|e| cause!(NativeCopy).src(e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| cause!(NativeCopy).src(e))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                cause!(NativeCopy)
                    .src(e)
                    .msg(format!("Could not create {}", target.display()))
            })?;
        } else if file_type.is_file() {
            // fs::copy carries the permission bits, so executables stay executable.
            fs::copy(entry.path(), &target).map_err(|e| {
                cause!(NativeCopy)
                    .src(e)
                    .msg(format!("Could not copy to {}", target.display()))
            })?;
        } else {
            debug!("skipping non-regular file {}", entry.path().display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_native_copy_skips_git_metadata_at_any_depth() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(&src.path().join("README"), "top");
        write(&src.path().join(".git/HEAD"), "ref: refs/heads/master");
        write(&src.path().join("sub/file.c"), "int x;");
        write(&src.path().join("sub/.git"), "gitdir: ../.git/modules/sub");

        let dest = dst.path().join("manager");
        copy_tree(src.path(), &dest, CopyMethod::Native).unwrap();

        assert_eq!(fs::read_to_string(dest.join("README")).unwrap(), "top");
        assert_eq!(fs::read_to_string(dest.join("sub/file.c")).unwrap(), "int x;");
        assert!(!dest.join(".git").exists());
        assert!(!dest.join("sub/.git").exists());
    }

    #[test]
    fn test_native_copy_overwrites_and_keeps_stale_files() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(&src.path().join("kept"), "new");
        write(&dst.path().join("kept"), "old");
        write(&dst.path().join("stale"), "from a previous import");

        copy_tree(src.path(), dst.path(), CopyMethod::Native).unwrap();

        assert_eq!(fs::read_to_string(dst.path().join("kept")).unwrap(), "new");
        assert!(dst.path().join("stale").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_native_copy_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let script = src.path().join("build.sh");
        write(&script, "#!/bin/sh\n");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        copy_tree(src.path(), dst.path(), CopyMethod::Native).unwrap();

        let mode = fs::metadata(dst.path().join("build.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_copy_creates_nested_destination() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(&src.path().join("a"), "a");

        let dest = dst.path().join("deep/er/dest");
        copy_tree(src.path(), &dest, CopyMethod::Native).unwrap();

        assert!(dest.join("a").is_file());
    }
}
