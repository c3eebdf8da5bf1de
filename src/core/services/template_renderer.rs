use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::core::errors::{AcsError, Result};
use crate::core::models::config_tree::ApplicationGroup;

/// CloudFormation template for the AppConfig resources of every
/// application and environment in the store.
const BUILTIN_TEMPLATE: &str = include_str!("../../../templates/template.yaml.hbs");

const TEMPLATE_NAME: &str = "deployment";

/// Data handed to the template: `{ applications: [...] }`.
#[derive(Debug, Serialize)]
struct TemplateContext<'a> {
    applications: &'a [ApplicationGroup],
}

/// Renders the deployment template from the grouped configuration tree.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Renderer for the built-in CloudFormation template.
    pub fn builtin() -> Result<Self> {
        Self::from_source(BUILTIN_TEMPLATE)
    }

    /// Renderer for a user-supplied handlebars template.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AcsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let source = fs::read_to_string(path)?;
        Self::from_source(&source).map_err(|e| AcsError::Template {
            detail: format!("{}: {e}", path.display()),
        })
    }

    fn from_source(source: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Output is YAML, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| AcsError::Template {
                detail: e.to_string(),
            })?;
        Ok(Self { handlebars })
    }

    /// Render the template for `applications`.
    pub fn render(&self, applications: &[ApplicationGroup]) -> Result<String> {
        self.handlebars
            .render(TEMPLATE_NAME, &TemplateContext { applications })
            .map_err(|e| AcsError::Template {
                detail: e.to_string(),
            })
    }

    /// Render and write the result to `output_dir/file_name`, creating the
    /// folder when needed. Returns the written path.
    pub fn render_to(
        &self,
        applications: &[ApplicationGroup],
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        let rendered = self.render(applications)?;
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(file_name);
        fs::write(&path, rendered)?;
        debug!(path = %path.display(), "template written");
        Ok(path)
    }
}
