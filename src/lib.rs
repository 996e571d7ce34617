pub mod config;
pub mod import;

pub use config::{ConfigOverrides, ImportConfig};
pub use import::common::{CopyMethod, ErrorType, Identity};
pub use import::{ImportOutcome, ImportRequest, commit_message, import_repository, remote_url};

pub fn init_logger() {
    env_logger::init();
}
