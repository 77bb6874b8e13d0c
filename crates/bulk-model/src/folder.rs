//! Artifact folders and breadcrumb navigation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criterion::{null_as_default, string_or_number};
use crate::error::{ModelError, Result};

/// Entry of an artifact folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    /// True for sub-folders, false for artifact files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_folder: bool,
}

/// A folder visited on the way down from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub folder_id: String,
    pub name: String,
}

/// Breadcrumb trail from the root folder to the current folder.
///
/// The root is implicit: an empty trail means the root is current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTrail {
    crumbs: Vec<Breadcrumb>,
}

impl FolderTrail {
    pub fn root() -> Self {
        Self::default()
    }

    /// Descends into `folder`.
    pub fn enter(&mut self, folder: &FolderEntry) {
        self.crumbs.push(Breadcrumb {
            folder_id: folder.id.clone(),
            name: folder.name.clone(),
        });
    }

    /// Jumps back to breadcrumb `index`, dropping everything after it.
    pub fn navigate_to(&mut self, index: usize) -> Result<()> {
        if index >= self.crumbs.len() {
            return Err(ModelError::BreadcrumbOutOfRange {
                index,
                depth: self.crumbs.len(),
            });
        }
        self.crumbs.truncate(index + 1);
        Ok(())
    }

    /// Returns to the root.
    pub fn reset(&mut self) {
        self.crumbs.clear();
    }

    /// Current folder, or `None` at the root.
    pub fn current(&self) -> Option<&Breadcrumb> {
        self.crumbs.last()
    }

    pub fn depth(&self) -> usize {
        self.crumbs.len()
    }

    pub fn crumbs(&self) -> &[Breadcrumb] {
        &self.crumbs
    }

    /// Human-readable trail, e.g. `Root / batch-2024 / images`.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FolderTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Root")?;
        for crumb in &self.crumbs {
            write!(f, " / {}", crumb.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, name: &str) -> FolderEntry {
        FolderEntry {
            id: id.to_string(),
            name: name.to_string(),
            is_folder: true,
        }
    }

    #[test]
    fn test_enter_and_navigate_back() {
        let mut trail = FolderTrail::root();
        trail.enter(&folder("1", "batch-2024"));
        trail.enter(&folder("2", "images"));
        trail.enter(&folder("3", "large"));
        assert_eq!(trail.to_string(), "Root / batch-2024 / images / large");

        trail.navigate_to(0).unwrap();
        assert_eq!(trail.depth(), 1);
        assert_eq!(trail.current().unwrap().folder_id, "1");

        trail.enter(&folder("4", "code"));
        assert_eq!(trail.to_string(), "Root / batch-2024 / code");
    }

    #[test]
    fn test_navigate_out_of_range_keeps_trail() {
        let mut trail = FolderTrail::root();
        trail.enter(&folder("1", "a"));
        assert!(trail.navigate_to(1).is_err());
        assert_eq!(trail.depth(), 1);
    }

    #[test]
    fn test_reset_returns_to_root() {
        let mut trail = FolderTrail::root();
        trail.enter(&folder("1", "a"));
        trail.reset();
        assert!(trail.current().is_none());
        assert_eq!(trail.to_string(), "Root");
    }
}
