use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hmctl::cmd_fmt;
use hmctl::cmd_get;
use hmctl::cmd_set;
use hmctl::cmd_show;
use hmctl::cmd_split::{self, SplitArgs};
use hmctl::cmd_validate;
use hmxml::JobSettings;

#[derive(Parser, Debug)]
#[command(name = "hmctl", version, about = "HMxml reconstruction parameter CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long, global = true)]
    json: bool,
    /// Reject unknown elements and attributes instead of warning
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print a summary, every value (--flat) or the whole model (--json)
    Show {
        file: PathBuf,
        #[arg(long)]
        flat: bool,
    },
    /// Read one parameter, e.g. FBP/Backprojection/ImageCentre
    Get { file: PathBuf, path: String },
    /// Write one parameter or attribute (path@attr)
    Set {
        file: PathBuf,
        path: String,
        value: String,
        /// Write to this file instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a parameter, group or attribute
    Unset {
        file: PathBuf,
        path: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check schema conformance and parameter consistency
    Validate { file: PathBuf },
    /// Rewrite in schema order with consistent indentation
    Fmt {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
    /// Split a template into per-chunk job files
    Split {
        file: PathBuf,
        /// First slice
        #[arg(long)]
        first: i32,
        /// Slice after the last one reconstructed
        #[arg(long)]
        last: i32,
        #[arg(long, default_value_t = 16)]
        chunks: u32,
        #[arg(long, default_value_t = 1)]
        step: i32,
        /// Directory for chunk files
        #[arg(long)]
        out: PathBuf,
        /// Directory for per-chunk log files (default: --out)
        #[arg(long)]
        log_dir: Option<PathBuf>,
        #[arg(long)]
        input_folder: Option<String>,
        #[arg(long)]
        input_prefix: Option<String>,
        #[arg(long)]
        output_folder: Option<String>,
        #[arg(long)]
        output_prefix: Option<String>,
        /// Flat field image
        #[arg(long)]
        flat: Option<String>,
        /// Dark field image
        #[arg(long)]
        dark: Option<String>,
        /// Centre of rotation
        #[arg(long)]
        centre: Option<String>,
    },
}

fn main() -> Result<()> {
    let Cli {
        verbose,
        json,
        strict,
        cmd,
    } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Show { file, flat } => cmd_show::run(file, flat, strict, json)?,
        Cmd::Get { file, path } => cmd_get::run(file, path, strict, json)?,
        Cmd::Set {
            file,
            path,
            value,
            output,
        } => cmd_set::run(file, path, Some(value), output, strict, json)?,
        Cmd::Unset { file, path, output } => {
            cmd_set::run(file, path, None, output, strict, json)?
        }
        Cmd::Validate { file } => cmd_validate::run(file, strict, json)?,
        Cmd::Fmt {
            file,
            output,
            indent,
        } => cmd_fmt::run(file, output, indent, strict)?,
        Cmd::Split {
            file,
            first,
            last,
            chunks,
            step,
            out,
            log_dir,
            input_folder,
            input_prefix,
            output_folder,
            output_prefix,
            flat,
            dark,
            centre,
        } => {
            let args = SplitArgs {
                file,
                first,
                last,
                chunks,
                step,
                out,
                log_dir,
                job: JobSettings {
                    input_folder,
                    input_prefix,
                    output_folder,
                    output_prefix,
                    flat_file: flat,
                    dark_file: dark,
                    image_centre: centre,
                },
            };
            cmd_split::run(args, strict, json)?
        }
    };

    Ok(())
}
