//! Scoped override of the repository-local commit identity.
//!
//! [`IdentityGuard::apply`] records the repository-local `user.name` and
//! `user.email`, writes the override, and hands back a guard. The prior values
//! come back either through [`IdentityGuard::restore`], which reports failures,
//! or through `Drop` when the guard is abandoned by an early return.

use std::path::Path;

use cause::{Cause, cause};
use git2::{Config, ConfigLevel, ErrorCode, Repository};
use log::{debug, warn};

use super::common::ErrorType::{GitConfigOpen, GitConfigRead, GitConfigWrite, IdentityRestore};
use super::common::{ErrorType, Identity};

pub const NAME_KEY: &str = "user.name";
pub const EMAIL_KEY: &str = "user.email";

/// Repository-local identity values before the override. `None` means unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriorIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct IdentityGuard {
    config: Config,
    prior: PriorIdentity,
    restored: bool,
}

/// Open the configuration file of the repository containing `root`, local level only.
pub fn open_local_config(root: &Path) -> Result<Config, Cause<ErrorType>> {
    let repo = Repository::discover(root).map_err(|e| cause!(GitConfigOpen).src(e))?;
    repo.config()
        .and_then(|c| c.open_level(ConfigLevel::Local))
        .map_err(|e| cause!(GitConfigOpen).src(e))
}

/// Read `key`, mapping an absent entry to `None`.
pub fn read_optional(config: &Config, key: &str) -> Result<Option<String>, Cause<ErrorType>> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(cause!(GitConfigRead)
            .src(e)
            .msg(format!("Could not read {key}"))),
    }
}

/// Current repository-local identity of the repository containing `root`.
pub fn read_local_identity(root: &Path) -> Result<PriorIdentity, Cause<ErrorType>> {
    let config = open_local_config(root)?;
    Ok(PriorIdentity {
        name: read_optional(&config, NAME_KEY)?,
        email: read_optional(&config, EMAIL_KEY)?,
    })
}

fn write_value(config: &mut Config, key: &str, value: Option<&str>) -> Result<(), git2::Error> {
    match value {
        Some(value) => config.set_str(key, value),
        None => match config.remove(key) {
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            other => other,
        },
    }
}

impl IdentityGuard {
    pub fn apply(root: &Path, identity: &Identity) -> Result<Self, Cause<ErrorType>> {
        let config = open_local_config(root)?;
        let prior = PriorIdentity {
            name: read_optional(&config, NAME_KEY)?,
            email: read_optional(&config, EMAIL_KEY)?,
        };
        debug!("prior identity: {prior:?}");

        // Guard exists before the first write so a half-applied override is undone.
        let mut guard = Self {
            config,
            prior,
            restored: false,
        };

        println!("  - identity: {} <{}>", identity.name, identity.email);
        for (key, value) in [(NAME_KEY, &identity.name), (EMAIL_KEY, &identity.email)] {
            guard.config.set_str(key, value).map_err(|e| {
                cause!(GitConfigWrite)
                    .src(e)
                    .msg(format!("Could not set {key}"))
            })?;
        }

        Ok(guard)
    }

    #[cfg(test)]
    fn prior(&self) -> &PriorIdentity {
        &self.prior
    }

    /// Put the prior identity back. Both keys are attempted; the first failure is returned.
    pub fn restore(mut self) -> Result<(), Cause<ErrorType>> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> Result<(), Cause<ErrorType>> {
        self.restored = true;
        debug!("restoring identity: {:?}", self.prior);

        let name = write_value(&mut self.config, NAME_KEY, self.prior.name.as_deref());
        let email = write_value(&mut self.config, EMAIL_KEY, self.prior.email.as_deref());

        name.map_err(|e| {
            cause!(IdentityRestore)
                .src(e)
                .msg(format!("Could not restore {NAME_KEY}"))
        })?;
        email.map_err(|e| {
            cause!(IdentityRestore)
                .src(e)
                .msg(format!("Could not restore {EMAIL_KEY}"))
        })?;
        Ok(())
    }
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.restore_inner() {
            warn!("failed to restore commit identity: {e}");
        }
    }
}
