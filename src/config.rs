use std::path::Path;

use cause::{Cause, cause};
use git2::{Config as GitConfig, ConfigLevel};
use log::debug;

use crate::import::common::ErrorType::InvalidConfiguration;
use crate::import::common::{CopyMethod, ErrorType, Identity};

pub const DEFAULT_REMOTE_BASE: &str = "https://github.com/OpenXT";
pub const DEFAULT_AUTHOR_NAME: &str = "Open XT";
pub const DEFAULT_AUTHOR_EMAIL: &str = "openxtprime@gmail.com";

const REMOTE_BASE_KEY: &str = "openxt-import.remotebase";
const AUTHOR_NAME_KEY: &str = "openxt-import.authorname";
const AUTHOR_EMAIL_KEY: &str = "openxt-import.authoremail";
const COPY_METHOD_KEY: &str = "openxt-import.copymethod";

const REMOTE_BASE_ENV: &str = "OPENXT_IMPORT_REMOTE_BASE";
const AUTHOR_NAME_ENV: &str = "OPENXT_IMPORT_AUTHOR_NAME";
const AUTHOR_EMAIL_ENV: &str = "OPENXT_IMPORT_AUTHOR_EMAIL";
const COPY_METHOD_ENV: &str = "OPENXT_IMPORT_COPY_METHOD";

/// Get a configuration value with layered priority: env var > local git config > global git config
fn get_layered_value(
    key: &str,
    env_value: Option<String>,
    local_config: Option<&GitConfig>,
    global_config: Option<&GitConfig>,
) -> Option<String> {
    if env_value.is_some() {
        return env_value;
    }

    if let Some(local) = local_config
        && let Ok(val) = local.get_string(key)
    {
        return Some(val);
    }

    if let Some(global) = global_config
        && let Ok(val) = global.get_string(key)
    {
        return Some(val);
    }

    None
}

/// Settings of an import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Remote location prefix; the clone URL is `<remote_base>/<name>.git`
    pub remote_base: String,
    /// Identity the import commit is made with
    pub author: Identity,
    pub copy_method: CopyMethod,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            author: Identity::new(DEFAULT_AUTHOR_NAME, DEFAULT_AUTHOR_EMAIL),
            copy_method: CopyMethod::default(),
        }
    }
}

/// Values given on the command line; each one wins over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub remote_base: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub copy_method: Option<CopyMethod>,
}

impl ImportConfig {
    /// Load the configuration for the repository at `root` with layered priority:
    /// cli > env > local git > global git > defaults
    pub fn load(root: &Path, overrides: ConfigOverrides) -> Result<Self, Cause<ErrorType>> {
        let global_config = GitConfig::open_default()
            .and_then(|c| c.open_level(ConfigLevel::Global))
            .ok();
        let local_config = git2::Repository::discover(root)
            .and_then(|repo| repo.config())
            .and_then(|c| c.open_level(ConfigLevel::Local))
            .ok();

        Self::resolve(
            overrides,
            |var| std::env::var(var).ok(),
            local_config.as_ref(),
            global_config.as_ref(),
        )
    }

    /// Resolve every field from the given sources. A field set in `overrides`
    /// is taken as is; lower layers are not read for it.
    pub fn resolve(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        local_config: Option<&GitConfig>,
        global_config: Option<&GitConfig>,
    ) -> Result<Self, Cause<ErrorType>> {
        let lookup = |cli: Option<String>, key: &str, var: &str| {
            cli.or_else(|| get_layered_value(key, env(var), local_config, global_config))
        };

        let defaults = Self::default();

        let remote_base = lookup(overrides.remote_base, REMOTE_BASE_KEY, REMOTE_BASE_ENV)
            .unwrap_or(defaults.remote_base);
        let name = lookup(overrides.author_name, AUTHOR_NAME_KEY, AUTHOR_NAME_ENV)
            .unwrap_or(defaults.author.name);
        let email = lookup(overrides.author_email, AUTHOR_EMAIL_KEY, AUTHOR_EMAIL_ENV)
            .unwrap_or(defaults.author.email);
        let copy_method = match overrides.copy_method {
            Some(method) => method,
            None => match lookup(None, COPY_METHOD_KEY, COPY_METHOD_ENV) {
                Some(value) => value
                    .parse()
                    .map_err(|e: String| cause!(InvalidConfiguration, e))?,
                None => defaults.copy_method,
            },
        };

        let config = Self {
            remote_base,
            author: Identity::new(name, email),
            copy_method,
        };
        debug!("resolved configuration: {config:?}");
        Ok(config)
    }
}
