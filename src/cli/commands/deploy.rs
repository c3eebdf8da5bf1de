use std::collections::BTreeSet;
use std::path::Path;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::report::DeployOutcome;
use crate::core::services::deploy_service::DeployService;
use crate::core::services::grouping::application_map;

/// Execute the `acs deploy` command.
///
/// Deploys the latest hosted version of every managed profile that is not
/// live yet. With a `root`, the tree is validated first and only its
/// applications are deployed.
pub fn execute(ctx: &Context, root: Option<&Path>) -> Result<()> {
    let only = match root {
        Some(root) => {
            let tree = super::load_tree(root)?;
            let names: BTreeSet<String> = application_map(tree.root_depth, &tree.files)?
                .into_keys()
                .collect();
            Some(names)
        }
        None => None,
    };
    let service = ctx.config_service()?;

    let spinner = output::spinner("Deploying configuration versions...");
    let result = DeployService {
        service: &service,
        config: &ctx.config,
    }
    .deploy(only.as_ref());
    spinner.finish_and_clear();
    let reports = result?;

    output::header("🚀 acs deploy");
    let mut deployed = 0;
    for report in &reports {
        let target = format!("{}/{}", report.application, report.environment);
        match report.outcome {
            DeployOutcome::Deployed { version } => {
                deployed += 1;
                output::success(&format!("{target}: deployed version {version}"));
            }
            DeployOutcome::UpToDate { version } => {
                output::detail(&format!("{target}: version {version} already deployed"));
            }
            DeployOutcome::NoVersion => {
                output::warning(&format!("{target}: no hosted version to deploy"));
            }
        }
    }

    if deployed > 0 {
        output::warning("Restart the deployed applications to pick up the new configuration");
    } else {
        output::success("Everything is already deployed");
    }
    Ok(())
}
