// src/main.rs
mod logger;

use anyhow::{bail, Context};
use clap::{ArgAction, ArgGroup, Parser};
use huffman_archiver::archiver;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "archiver", version)]
#[command(about = "Multi-file archiver built on per-file canonical Huffman codes.", long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["compress", "decompress", "list"])
))]
struct Cli {
    /// Compress FILES, in the given order, into ARCHIVE
    #[arg(short = 'c', long, value_name = "ARCHIVE")]
    compress: Option<PathBuf>,

    /// Recreate the files stored in ARCHIVE
    #[arg(short = 'd', long, value_name = "ARCHIVE")]
    decompress: Option<PathBuf>,

    /// List the files stored in ARCHIVE without extracting them
    #[arg(short = 'l', long, value_name = "ARCHIVE")]
    list: Option<PathBuf>,

    /// Files to compress
    #[arg(
        value_name = "FILES",
        requires = "compress",
        conflicts_with_all = ["decompress", "list"]
    )]
    files: Vec<PathBuf>,

    /// Directory to extract into
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    json: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level())?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    if let Some(archive) = &cli.compress {
        if cli.files.is_empty() {
            bail!("at least one file is required to build an archive");
        }
        archiver::compress_files(archive, &cli.files)
            .with_context(|| format!("failed to create archive {}", archive.display()))?;
    } else if let Some(archive) = &cli.decompress {
        archiver::extract_archive(archive, &cli.output_dir)
            .with_context(|| format!("failed to extract archive {}", archive.display()))?;
    } else if let Some(archive) = &cli.list {
        let entries = archiver::list_archive(archive)
            .with_context(|| format!("failed to read archive {}", archive.display()))?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!("{:>12}  {}  {}", entry.size, entry.sha256, entry.name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from(["archiver", "-c", "out.huf", "a", "b"]).unwrap();
        assert_eq!(cli.compress, Some(PathBuf::from("out.huf")));
        assert_eq!(cli.files, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn test_parse_decompress() {
        let cli = Cli::try_parse_from(["archiver", "-d", "out.huf", "-vv"]).unwrap();
        assert_eq!(cli.decompress, Some(PathBuf::from("out.huf")));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.log_level(), Level::TRACE);
    }

    #[test]
    fn test_mode_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["archiver"]).is_err());
        assert!(Cli::try_parse_from(["archiver", "-c", "x", "-d", "y"]).is_err());
        assert!(Cli::try_parse_from(["archiver", "-d", "x", "extra"]).is_err());
        assert!(Cli::try_parse_from(["archiver", "-l", "x", "extra"]).is_err());
    }
}
