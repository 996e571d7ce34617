pub mod command;

use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub enum ErrorType {
    TempDirCreation,
    TempDirRemoval,
    GitCloneCommand,
    GitCloneCommandExitStatus,
    HeadRevisionLookup,
    DestinationCreation,
    RsyncCommand,
    RsyncCommandExitStatus,
    NativeCopy,
    GitAddCommand,
    GitAddCommandExitStatus,
    GitCommitCommand,
    GitCommitCommandExitStatus,
    GitConfigOpen,
    GitConfigRead,
    GitConfigWrite,
    IdentityRestore,
    InvalidConfiguration,
}

/// How the cloned tree is copied into the destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMethod {
    /// `rsync -rE --exclude .git`
    #[default]
    Rsync,
    /// In-process recursive copy with the same filter.
    Native,
}

impl CopyMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsync => "rsync",
            Self::Native => "native",
        }
    }
}

impl FromStr for CopyMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rsync" => Ok(Self::Rsync),
            "native" => Ok(Self::Native),
            other => Err(format!(
                "unknown copy method '{other}' (expected 'rsync' or 'native')"
            )),
        }
    }
}

impl fmt::Display for CopyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit identity as stored under `user.name` / `user.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
