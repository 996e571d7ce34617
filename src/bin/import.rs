use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use colored::Colorize;
use openxt_import::{
    ConfigOverrides, CopyMethod, ImportConfig, ImportRequest, import_repository, init_logger,
};

/// Imports an OpenXT repository into a subdirectory of the current repository
/// and commits it as `import <REPO> version <revision>`.
#[derive(Parser)]
#[command(version, author, about, long_about = None)]
struct Cli {
    /// Name of the repository to import; also the destination directory
    repo: String,

    /// Root of the repository receiving the import
    #[arg(short = 'C', long, default_value = ".")]
    repo_root: PathBuf,

    /// Remote location prefix; the clone URL is `<REMOTE_BASE>/<REPO>.git`
    #[arg(long)]
    remote_base: Option<String>,

    /// Name recorded on the import commit
    #[arg(long)]
    author_name: Option<String>,

    /// Email recorded on the import commit
    #[arg(long)]
    author_email: Option<String>,

    /// How the clone is copied into the destination (rsync or native)
    #[arg(long)]
    copy_method: Option<CopyMethod>,
}

fn main() {
    init_logger();

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        remote_base: cli.remote_base,
        author_name: cli.author_name,
        author_email: cli.author_email,
        copy_method: cli.copy_method,
    };

    let config = match ImportConfig::load(&cli.repo_root, overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Invalid configuration: {e}").red().bold());
            exit(1);
        }
    };

    let request = ImportRequest::new(cli.repo, cli.repo_root, config);

    println!("import of {} started\n", request.name);
    match import_repository(&request) {
        Ok(outcome) => {
            println!("\n{}", outcome.message);
            println!("{}", "Success".green().bold());
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            exit(1);
        }
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
