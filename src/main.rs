//! wp-md - WordPress export to Markdown converter

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use wpmd::{Error, OutputFormat, SourceFormat, export_posts, read_posts};

#[derive(Parser)]
#[command(name = "wp-md")]
#[command(version, about = "Convert WordPress export XML into Markdown files", long_about = None)]
#[command(after_help = "EXAMPLES:
    wp-md blog.xml posts/                 Convert a WXR export to Pelican files
    wp-md --if pma_xml dump.xml posts/    Convert a PHPMyAdmin database dump
    wp-md --of mynt blog.xml posts/       Emit mynt-style YAML frontmatter")]
struct Cli {
    /// Input export file (WXR or PHPMyAdmin XML)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory to put the converted files in (created if missing)
    #[arg(value_name = "OUTPUT_DIR")]
    outdir: PathBuf,

    /// Input format: wp_rss or pma_xml. If unsure, it is probably wp_rss.
    #[arg(long = "if", visible_alias = "input-format", default_value = "wp_rss")]
    input_format: String,

    /// Output format, matching the target static site generator:
    /// pelican, nikola, or mynt
    #[arg(long = "of", visible_alias = "output-format", default_value = "pelican")]
    output_format: String,

    /// Suppress per-post progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(count) => {
            log::info!("converted {count} posts");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> wpmd::Result<usize> {
    let source: SourceFormat = cli.input_format.parse()?;
    let format: OutputFormat = cli.output_format.parse()?;

    if cli.outdir.exists() && !cli.outdir.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination should be a directory, not a file",
        )));
    }

    let posts = read_posts(&cli.input, source)?;
    export_posts(&posts, &cli.outdir, format)
}
