//! set_folder_icon - apply folder.ico / folder.png as a Windows folder icon
//!
//! Usage:
//!   set_folder_icon "D:\Music"
//!   set_folder_icon "D:\Music" --recursive --verbose
//!   set_folder_icon "D:\Music" --absolute --backend attrib

use anyhow::Result;
use clap::Parser;
use folder_icon::{
    AttributeBackend, IconReference, Reconciler, Silent, VerboseLog, platform_attributes,
    render_summary,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "set_folder_icon")]
#[command(
    about = "Set custom icon for Windows folders using folder.ico or folder.png",
    version
)]
#[command(after_help = "How it works:
  1. Looks for folder.ico in the target folder
  2. Validates ICO has required sizes (16, 32, 48, 256)
  3. If sizes are missing, regenerates from folder.png
  4. If no ICO found, converts folder.png to folder.ico
  5. Creates/updates desktop.ini with the icon reference
  6. Sets Windows system and hidden attributes

Note: You may need to refresh Windows Explorer (F5) to see the icon changes.")]
struct Cli {
    /// Path to the folder to set icon for
    folder_path: PathBuf,

    /// Also process immediate subfolders (first level only)
    #[arg(short, long)]
    recursive: bool,

    /// Use absolute path in desktop.ini (default: relative path)
    #[arg(short, long)]
    absolute: bool,

    /// Show detailed processing information
    #[arg(short, long)]
    verbose: bool,

    /// How file attributes are changed: native or attrib
    #[arg(long, default_value_t = AttributeBackend::Native)]
    backend: AttributeBackend,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");

            // Print chain of errors
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }

            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    let attributes = platform_attributes(cli.backend)?;
    let reference = if cli.absolute {
        IconReference::Absolute
    } else {
        IconReference::Relative
    };
    let reconciler = Reconciler::new(attributes).with_reference(reference);

    let report = if cli.verbose {
        let mut log = VerboseLog::new(std::io::stdout());
        reconciler.reconcile_batch(&cli.folder_path, cli.recursive, &mut log)?
    } else {
        reconciler.reconcile_batch(&cli.folder_path, cli.recursive, &mut Silent)?
    };

    println!();
    print!("{}", render_summary(&report));
    Ok(report.is_success())
}
