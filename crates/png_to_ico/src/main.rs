//! png_to_ico - PNG to ICO conversion, favicon sets and folder icons
//!
//! Usage:
//!   png_to_ico convert logo.png --sizes 16,32,48
//!   png_to_ico convert a.png b.png c.png --output icons/
//!   png_to_ico favicon logo.png --out-dir public --prefix site- --theme-color "#1e90ff"
//!   png_to_ico folder "D:\Music" --recursive

mod config;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use config::FaviconArgs;
use folder_icon::{
    AttributeBackend, IconReference, Reconciler, Silent, platform_attributes, render_summary,
};
use icon_tools::{ConversionRequest, Destination, IconSizes, assemble_favicon_set, convert_file};
use output::{print_error, print_info, print_list, print_success, print_warning};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "png_to_ico")]
#[command(
    about = "Convert PNG images to ICO files and generate complete favicon sets",
    version
)]
struct Cli {
    /// Show detailed logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more PNG files to ICO
    Convert {
        /// PNG files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Comma-separated icon sizes (default: 16,32,48,64,128,256)
        #[arg(long)]
        sizes: Option<IconSizes>,

        /// Output file for a single source, output directory for several
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate favicon.ico, PNG variants, manifest.json and an HTML snippet
    Favicon {
        /// Source PNG
        source: PathBuf,

        /// Directory receiving the generated files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        options: FaviconArgs,
    },

    /// Apply folder.ico or folder.png as a Windows folder icon
    Folder {
        /// Folder to set the icon for
        path: PathBuf,

        /// Also process immediate subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Use absolute path in desktop.ini
        #[arg(short, long)]
        absolute: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&format!("Error: {e}"));

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

fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Convert {
            files,
            sizes,
            output,
        } => convert(files, sizes.unwrap_or_default(), output),
        Commands::Favicon {
            source,
            out_dir,
            options,
        } => favicon(source, out_dir, &options),
        Commands::Folder {
            path,
            recursive,
            absolute,
        } => folder(path, recursive, absolute),
    }
}

fn convert(files: Vec<PathBuf>, sizes: IconSizes, output: Option<PathBuf>) -> Result<bool> {
    if let [source] = files.as_slice() {
        let written = convert_file(source, &sizes, output.as_deref())
            .with_context(|| format!("Conversion failed for {}", source.display()))?;
        print_success(&format!("ICO file saved to: {}", written.display()));
        print_info(&format!("Sizes included: {sizes}"));
        return Ok(true);
    }

    let directory = output.unwrap_or_else(|| PathBuf::from("."));
    let summary =
        ConversionRequest::new(files, sizes, Destination::Directory(directory.clone())).run();

    if summary.is_complete_success() {
        print_success(&format!(
            "Converted {} ICO files to: {}",
            summary.succeeded,
            directory.display()
        ));
    } else {
        print_warning(&format!(
            "Converted {} files. {} files failed.",
            summary.succeeded, summary.failed
        ));
        print_list(
            summary
                .failures
                .iter()
                .map(|(path, reason)| format!("{}: {}", path.display(), reason)),
        );
    }
    Ok(summary.is_complete_success())
}

fn favicon(source: PathBuf, out_dir: PathBuf, args: &FaviconArgs) -> Result<bool> {
    let options = args.resolve()?;
    let set = assemble_favicon_set(&source, &options, &out_dir)
        .with_context(|| format!("Failed to generate favicon set from {}", source.display()))?;

    print_success(&format!("Favicon set generated in: {}", set.directory.display()));
    print_info("Files created:");
    print_list(&set.files);
    println!();
    print_info("Add this to your <head>:");
    print!("{}", set.html_snippet);
    Ok(true)
}

fn folder(path: PathBuf, recursive: bool, absolute: bool) -> Result<bool> {
    let attributes = platform_attributes(AttributeBackend::Native)?;
    let reference = if absolute {
        IconReference::Absolute
    } else {
        IconReference::Relative
    };
    let report = Reconciler::new(attributes)
        .with_reference(reference)
        .reconcile_batch(&path, recursive, &mut Silent)?;

    print!("{}", render_summary(&report));
    Ok(report.is_success())
}
