use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::core::errors::Result;
use crate::core::services::structure_validator::RESERVED_FOLDER;

/// Collect every regular file below `root`, in path order.
///
/// Descends into all folders except `.git` and never follows symlinks.
/// No layout filtering happens here; grouping drops anything that is not
/// exactly `application/environment/file` below the root.
pub fn walk_file_tree(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_reserved(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_reserved(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == RESERVED_FOLDER
}
