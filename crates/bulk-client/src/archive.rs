//! Artifact archive inspection.
//!
//! The CSV names artifacts by file name only, so archive entries are
//! indexed by their final path component.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use bulk_schema::ValidationReport;

use crate::error::Result;

/// File names contained in an artifact archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveListing {
    pub path: PathBuf,
    pub file_names: BTreeSet<String>,
}

impl ArchiveListing {
    pub fn contains(&self, name: &str) -> bool {
        self.file_names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.file_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty()
    }
}

/// Lists the files in a zip archive, skipping directories and macOS metadata.
pub fn inspect_archive(path: &Path) -> Result<ArchiveListing> {
    let file = File::open(path)?;
    let archive = zip::ZipArchive::new(file)?;
    let file_names: BTreeSet<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/') && !name.starts_with("__MACOSX/"))
        .filter_map(|name| name.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.starts_with("._"))
        .map(str::to_string)
        .collect();
    tracing::debug!(
        archive = %path.display(),
        files = file_names.len(),
        "inspected artifact archive"
    );
    Ok(ArchiveListing {
        path: path.to_path_buf(),
        file_names,
    })
}

/// Filenames referenced by accepted rows that the archive does not contain.
pub fn missing_artifacts(listing: &ArchiveListing, report: &ValidationReport) -> Vec<String> {
    report
        .referenced_artifacts()
        .into_iter()
        .filter(|name| !listing.contains(name))
        .collect()
}
