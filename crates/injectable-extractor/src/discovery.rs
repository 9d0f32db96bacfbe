//! RF2 release discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{ExtractError, ExtractResult};

/// Filename prefix of description snapshot files.
pub const DESCRIPTION_SNAPSHOT_PREFIX: &str = "sct2_Description_Snapshot";

/// A description file found in a release directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionFile {
    /// Path to the file.
    pub path: PathBuf,
    /// Release date extracted from the filename (YYYYMMDD).
    pub release_date: Option<String>,
}

/// Finds the description snapshot file of every release directory.
///
/// Files are returned in the order the directories were given, so callers
/// pass the regional extension first and the international edition after it.
/// A missing directory, or one without a description file, is logged and
/// skipped.
pub fn discover_description_files<P: AsRef<Path>>(
    releases: &[P],
) -> ExtractResult<Vec<DescriptionFile>> {
    let mut files = Vec::with_capacity(releases.len());

    for release in releases {
        let release = release.as_ref();
        match find_description_file(release) {
            Ok(Some(file)) => {
                tracing::info!(
                    path = %file.path.display(),
                    release_date = file.release_date.as_deref().unwrap_or("unknown"),
                    "Discovered description file"
                );
                files.push(file);
            }
            Ok(None) => tracing::warn!(
                "No {}*.txt found in {}",
                DESCRIPTION_SNAPSHOT_PREFIX,
                release.display()
            ),
            Err(ExtractError::DirectoryNotFound { path }) => {
                tracing::warn!("Release directory not found, skipping: {}", path);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(files)
}

/// Finds the description snapshot file in a single release directory.
pub fn find_description_file(release: &Path) -> ExtractResult<Option<DescriptionFile>> {
    if !release.is_dir() {
        return Err(ExtractError::DirectoryNotFound {
            path: release.display().to_string(),
        });
    }

    for dir in candidate_dirs(release)? {
        if let Some(path) = scan_for_descriptions(&dir)? {
            let release_date = path
                .file_name()
                .and_then(|name| extract_release_date(&name.to_string_lossy()));
            return Ok(Some(DescriptionFile { path, release_date }));
        }
    }

    Ok(None)
}

/// Directories that may hold the Terminology files, most likely first.
fn candidate_dirs(base: &Path) -> ExtractResult<Vec<PathBuf>> {
    let mut dirs = vec![
        base.join("Snapshot").join("Terminology"),
        base.join("Terminology"),
        base.to_path_buf(),
    ];

    // Search one level deep for a directory containing the structure
    let mut nested: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let subdir = entry.path();
            nested.push(subdir.join("Snapshot").join("Terminology"));
            nested.push(subdir.join("Terminology"));
        }
    }
    nested.sort();
    dirs.extend(nested);

    Ok(dirs.into_iter().filter(|dir| dir.is_dir()).collect())
}

fn scan_for_descriptions(dir: &Path) -> ExtractResult<Option<PathBuf>> {
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let filename = entry.file_name();
        let filename_str = filename.to_string_lossy();

        if filename_str.starts_with(DESCRIPTION_SNAPSHOT_PREFIX) && filename_str.ends_with(".txt")
        {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Extracts release date from RF2 filename.
///
/// RF2 files have names like `sct2_Description_Snapshot-en_INT_20251201.txt`
pub fn extract_release_date(filename: &str) -> Option<String> {
    let without_ext = filename.trim_end_matches(".txt");
    let last = without_ext.rsplit('_').next()?;

    if last.len() == 8 && last.chars().all(|c| c.is_ascii_digit()) {
        Some(last.to_string())
    } else {
        None
    }
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
