pub mod commit;
pub mod common;
pub mod copy;
pub mod fetch;
pub mod identity;

use std::path::{Path, PathBuf};

use cause::{Cause, cause};
use log::{debug, info, warn};

use crate::config::ImportConfig;
use common::ErrorType::TempDirRemoval;
use common::{ErrorType, Identity};
use identity::IdentityGuard;

pub use commit::commit_message;

/// One import of a named repository into the enclosing repository at `root`.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub name: String,
    pub root: PathBuf,
    pub config: ImportConfig,
    /// Parent of the temporary clone directory; the system temp dir when `None`.
    pub work_parent: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub name: String,
    pub revision: String,
    pub destination: PathBuf,
    pub message: String,
}

impl ImportRequest {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, config: ImportConfig) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            config,
            work_parent: None,
        }
    }

    pub fn remote_url(&self) -> String {
        remote_url(&self.config.remote_base, &self.name)
    }

    pub fn destination(&self) -> PathBuf {
        self.root.join(&self.name)
    }
}

/// `<base>/<name>.git`, without doubling a trailing slash on `base`.
pub fn remote_url(base: &str, name: &str) -> String {
    format!("{}/{name}.git", base.trim_end_matches('/'))
}

/// Clone the named repository, copy it under `root/<name>` and commit it
/// with the configured identity.
///
/// The temporary clone is removed and the prior identity restored whatever
/// step fails. The first error in step order is the one returned.
pub fn import_repository(request: &ImportRequest) -> Result<ImportOutcome, Cause<ErrorType>> {
    info!("import of {} started", request.name);

    let url = request.remote_url();
    let work_parent = request
        .work_parent
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    let tempdir = fetch::clone_to_tempdir(&url, &work_parent)?;
    let result = import_from_clone(request, tempdir.path());

    let tempdir_path = tempdir.path().to_path_buf();
    let removal = tempdir.close();
    match (result, removal) {
        (Ok(outcome), Ok(())) => {
            debug!("removed {}", tempdir_path.display());
            info!("import of {} completed", request.name);
            Ok(outcome)
        }
        (Ok(_), Err(e)) => Err(cause!(TempDirRemoval)
            .src(e)
            .msg(format!("Could not remove {}", tempdir_path.display()))),
        (Err(err), removal) => {
            if let Err(e) = removal {
                warn!("could not remove {}: {e}", tempdir_path.display());
            }
            Err(err)
        }
    }
}

fn import_from_clone(
    request: &ImportRequest,
    clone: &Path,
) -> Result<ImportOutcome, Cause<ErrorType>> {
    let revision = fetch::head_revision(clone)?;
    println!("  - version: {revision}");

    let destination = request.destination();
    copy::copy_tree(clone, &destination, request.config.copy_method)?;
    commit::stage(&request.root, &request.name)?;

    let message = commit_message(&request.name, &revision);
    commit_as(&request.root, &request.config.author, &message)?;

    Ok(ImportOutcome {
        name: request.name.clone(),
        revision,
        destination,
        message,
    })
}

fn commit_as(root: &Path, author: &Identity, message: &str) -> Result<(), Cause<ErrorType>> {
    let guard = IdentityGuard::apply(root, author)?;
    let committed = commit::commit(root, message);
    let restored = guard.restore();

    match (committed, restored) {
        (Err(err), Err(e)) => {
            warn!("failed to restore commit identity: {e}");
            Err(err)
        }
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Ok(()), Ok(())) => Ok(()),
    }
}
