//! Command-line arguments for the extraction job.

use std::path::PathBuf;

use clap::Parser;

/// Default SQLite catalog path.
pub const DEFAULT_DB_PATH: &str = "injection_templates.db";

#[derive(Parser, Debug)]
#[command(
    name = "injectable-extract",
    version,
    about = "Load injectable medication templates from SNOMED CT description files",
    long_about = "Scans SNOMED CT RF2 description snapshots, keeps the terms that denote \
                  injectable drug products and loads them as templates into a catalog.\n\n\
                  Safe to re-run: templates already in the catalog are skipped."
)]
pub struct Cli {
    /// SQLite catalog database.
    #[arg(long, env = "INJECTABLE_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// RF2 release directories, regional extension first.
    #[arg(
        long = "release",
        value_name = "DIR",
        env = "INJECTABLE_RELEASE_PATHS",
        value_delimiter = ','
    )]
    pub releases: Vec<PathBuf>,

    /// Description files to read directly, in priority order. Takes precedence
    /// over `--release` and skips release discovery.
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Templates buffered per store flush.
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Classify and parse only; load into an in-memory catalog.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_release_order_is_kept() {
        let cli = Cli::try_parse_from([
            "injectable-extract",
            "--release",
            "uk",
            "--release",
            "int",
            "--batch-size",
            "50",
        ])
        .unwrap();
        assert_eq!(cli.releases, vec![PathBuf::from("uk"), PathBuf::from("int")]);
        assert_eq!(cli.batch_size, 50);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_files_and_releases_both_parse() {
        let cli = Cli::try_parse_from([
            "injectable-extract",
            "--release",
            "uk",
            "--file",
            "a.txt",
        ])
        .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.txt")]);
        assert_eq!(cli.releases, vec![PathBuf::from("uk")]);
    }
}
