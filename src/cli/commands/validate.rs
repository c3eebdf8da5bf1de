use std::path::Path;

use crate::cli::output;
use crate::core::errors::Result;
use crate::core::services::grouping::{group_applications, root_depth};
use crate::core::services::structure_validator::StructureValidator;
use crate::core::services::tree_walker::walk_file_tree;

/// Execute the `acs validate` command.
///
/// Lists every structural problem of the tree, then fails with the first
/// one. A well-formed tree is also checked for invalid names.
pub fn execute(root: &Path) -> Result<()> {
    output::header("🔍 acs validate");

    let violations = StructureValidator.violations(root)?;
    if let Some(first) = violations.first() {
        output::warning(&format!("Structure problems ({}):", violations.len()));
        for violation in &violations {
            tracing::debug!(folder = %violation.path().display(), "structure violation");
            output::detail(&violation.to_string());
        }
        return Err(first.clone().into());
    }

    let files = walk_file_tree(root)?;
    let applications = group_applications(root_depth(root), &files)?;
    let environments: usize = applications.iter().map(|a| a.environments.len()).sum();

    output::success(&format!(
        "{} applications, {environments} environments: structure and names are valid",
        applications.len()
    ));
    Ok(())
}
