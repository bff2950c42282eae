//! Pbxlint - PBX Configuration Checker
//!
//! Reads a configuration file and everything it includes, prints one line
//! per finding and exits with the worst severity found.
//!
//! # Usage
//!
//! ```bash
//! pbxlint /etc/asterisk/extensions.conf
//! RUST_LOG=pbxlint_core=debug pbxlint --base-dir /etc/asterisk sip.conf
//! ```
//!
//! Exit status: 0 when clean or only hints, 1 for warnings, 2 for errors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pbxlint_core::{
    error::{LintError, Result},
    parse_config, parse_dialplan, AppRegistry, BlankLineScope, Collector, FileResolver,
    ParserOptions, Severity, DIALPLAN_FILENAME,
};
use tracing_subscriber::EnvFilter;

/// Static syntax checker for PBX configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to check
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Parse as a dialplan (automatic for extensions.conf)
    #[arg(short, long)]
    dialplan: bool,

    /// Directory include names are resolved against [default: the file's directory]
    #[arg(short, long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Also check blank lines at the start and end of included files
    #[arg(long)]
    every_file_eof: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "pbxlint_core=debug",
        _ => "pbxlint_core=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Base directory and root file name as the resolver should see them.
fn locate(file: &Path, base_dir: Option<PathBuf>) -> Result<(PathBuf, String)> {
    match base_dir {
        Some(base_dir) => {
            std::fs::metadata(&base_dir)
                .map_err(|err| LintError::io(base_dir.display().to_string(), err))?;
            let root = if file.is_absolute() {
                file.to_path_buf()
            } else {
                std::env::current_dir()
                    .map_err(|err| LintError::io(".", err))?
                    .join(file)
            };
            Ok((base_dir, root.display().to_string()))
        }
        None => {
            let parent = file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let name = file
                .file_name()
                .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok((parent, name))
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (base_dir, root) = locate(&args.file, args.base_dir)?;
    let dialplan_mode = args.dialplan
        || args
            .file
            .file_name()
            .is_some_and(|name| name == DIALPLAN_FILENAME);

    let scope = if args.every_file_eof {
        BlankLineScope::EveryFile
    } else {
        BlankLineScope::Outermost
    };
    let options = ParserOptions::default().with_blank_line_scope(scope);
    let resolver = FileResolver::new(&base_dir);
    let collector = Collector::shared();

    tracing::debug!(root = %root, base_dir = %base_dir.display(), dialplan = dialplan_mode, "starting");

    if dialplan_mode {
        let registry = AppRegistry::v11();
        let dialplan = parse_dialplan(resolver, &root, collector.clone(), &registry, options)?;
        tracing::info!(contexts = dialplan.contexts.len(), "parsed dialplan");
    } else {
        let sections = parse_config(resolver, &root, collector.clone(), options)?;
        tracing::info!(sections = sections.len(), "parsed config");
    }

    for diagnostic in collector.diagnostics().iter() {
        println!("{diagnostic}");
    }

    let status = match collector.worst_severity() {
        Some(Severity::Error) => 2,
        Some(Severity::Warning) => 1,
        Some(Severity::Hint) | None => 0,
    };
    Ok(ExitCode::from(status))
}
