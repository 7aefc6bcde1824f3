use clap::{Args, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "chin: a minimal directory archiver", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Copy, Debug, Default)]
pub struct Verbosity {
    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors; hides progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and directories into a .chin archive
    Compress {
        /// Files or directories to pack
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Split the archive into parts of at most N MiB
        #[arg(long = "mb", value_name = "N")]
        split_mb: Option<NonZeroU32>,

        /// Directory the archive (or its parts) is written to
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Extract a .chin archive; pass any part to rejoin a split archive
    Decompress {
        archive: PathBuf,

        /// Destination directory
        #[arg(short = 'C', long = "dest", default_value = ".")]
        dest: PathBuf,
    },

    /// Check that an archive decodes cleanly without writing anything
    Verify { archive: PathBuf },

    /// List archive entries
    List {
        archive: PathBuf,

        /// Emit rows as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_args() {
        let cli = Cli::parse_from(["chin", "compress", "--mb", "2", "-o", "out", "a", "b"]);
        match cli.command {
            Commands::Compress {
                sources,
                split_mb,
                out_dir,
            } => {
                assert_eq!(sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
                assert_eq!(split_mb.map(NonZeroU32::get), Some(2));
                assert_eq!(out_dir, PathBuf::from("out"));
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_zero_mb_rejected() {
        assert!(Cli::try_parse_from(["chin", "compress", "--mb", "0", "a"]).is_err());
    }

    #[test]
    fn test_compress_needs_a_source() {
        assert!(Cli::try_parse_from(["chin", "compress"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["chin", "verify", "x.chin", "-q"]);
        assert!(cli.verbosity.quiet);
        assert!(!cli.verbosity.verbose);
        assert!(Cli::try_parse_from(["chin", "-v", "-q", "verify", "x.chin"]).is_err());
    }

    #[test]
    fn test_decompress_default_dest() {
        let cli = Cli::parse_from(["chin", "decompress", "a-1.chin"]);
        match cli.command {
            Commands::Decompress { archive, dest } => {
                assert_eq!(archive, PathBuf::from("a-1.chin"));
                assert_eq!(dest, PathBuf::from("."));
            }
            _ => panic!("expected decompress"),
        }
    }
}
