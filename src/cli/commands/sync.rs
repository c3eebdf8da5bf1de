use std::path::Path;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::report::SyncOutcome;
use crate::core::services::grouping::application_map;
use crate::core::services::sync_service::SyncService;

/// Execute the `acs sync` command.
///
/// Validates the tree, then stores every changed configuration file as a
/// new hosted version of its profile.
pub fn execute(ctx: &Context, root: &Path) -> Result<()> {
    let tree = super::load_tree(root)?;
    let applications = application_map(tree.root_depth, &tree.files)?;
    let service = ctx.config_service()?;

    let spinner = output::spinner("Synchronizing hosted configuration versions...");
    let result = SyncService {
        service: &service,
        config: &ctx.config,
    }
    .sync(&applications);
    spinner.finish_and_clear();
    let reports = result?;

    output::header("🔄 acs sync");
    if reports.is_empty() {
        output::warning("No managed applications found on the configuration service");
        return Ok(());
    }

    let mut created = 0;
    for report in &reports {
        let target = format!("{}/{}", report.application, report.environment);
        match report.outcome {
            SyncOutcome::Created { version } => {
                created += 1;
                output::success(&format!("{target}: created version {version}"));
            }
            SyncOutcome::Unchanged { version } => {
                output::detail(&format!("{target}: unchanged (version {version})"));
            }
        }
        if !report.removed.is_empty() {
            let removed: Vec<String> = report.removed.iter().map(i64::to_string).collect();
            output::detail(&format!("{target}: removed old versions {}", removed.join(", ")));
        }
    }

    output::success(&format!(
        "{created}/{} environments updated",
        reports.len()
    ));
    Ok(())
}
