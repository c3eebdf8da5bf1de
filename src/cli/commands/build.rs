use std::path::Path;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::services::grouping::group_applications;
use crate::core::services::template_renderer::TemplateRenderer;

/// Execute the `acs build` command.
///
/// Renders the deployment template for every application and environment
/// of the tree into `output`. `template` wins over `[template] path`, which
/// wins over the built-in template.
pub fn execute(ctx: &Context, root: &Path, output_dir: &Path, template: Option<&Path>) -> Result<()> {
    let tree = super::load_tree(root)?;
    let applications = group_applications(tree.root_depth, &tree.files)?;

    let renderer = match template.or(ctx.config.template.path.as_deref()) {
        Some(path) => TemplateRenderer::from_file(path)?,
        None => TemplateRenderer::builtin()?,
    };
    let written = renderer.render_to(
        &applications,
        output_dir,
        &ctx.config.template.output_file,
    )?;

    output::header("🛠  acs build");
    for application in &applications {
        let environments: Vec<&str> = application
            .environments
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        output::detail(&format!("{}: {}", application.name, environments.join(", ")));
    }
    output::success(&format!("Template written to {}", written.display()));
    Ok(())
}
