pub mod build;
pub mod deploy;
pub mod sync;
pub mod validate;

use std::path::{Path, PathBuf};

use crate::core::errors::Result;
use crate::core::services::grouping::root_depth;
use crate::core::services::structure_validator::StructureValidator;
use crate::core::services::tree_walker::walk_file_tree;

/// Configuration files of a validated tree, with the depth of its root.
pub struct LoadedTree {
    pub root_depth: usize,
    pub files: Vec<PathBuf>,
}

/// Pre-flight shared by every command reading a tree: validate the layout,
/// then list its files.
pub fn load_tree(root: &Path) -> Result<LoadedTree> {
    StructureValidator.validate(root)?;
    let files = walk_file_tree(root)?;
    tracing::debug!(root = %root.display(), files = files.len(), "configuration tree loaded");
    Ok(LoadedTree {
        root_depth: root_depth(root),
        files,
    })
}
