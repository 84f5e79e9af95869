use fogros_models::ProvisionError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

mod template;

pub use template::DOCKERFILE_TEMPLATE;

pub const DOCKERFILE_NAME: &str = "Dockerfile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecipe {
    pub path: PathBuf,
    pub sha256: String,
}

pub fn dockerfile_path(workspace: &Path) -> PathBuf {
    workspace.join(DOCKERFILE_NAME)
}

pub fn recipe_sha256() -> String {
    format!("{:x}", Sha256::digest(DOCKERFILE_TEMPLATE.as_bytes()))
}

/// Writes the template to `<workspace>/Dockerfile`, truncating any previous
/// content. Concurrent renders into one workspace are not coordinated.
#[instrument(skip(workspace), fields(workspace = %workspace.display()))]
pub async fn render_recipe(workspace: &Path) -> Result<RenderedRecipe, ProvisionError> {
    let path = dockerfile_path(workspace);
    tokio::fs::write(&path, DOCKERFILE_TEMPLATE)
        .await
        .map_err(|e| ProvisionError::io(&path, e))?;

    let sha256 = recipe_sha256();
    info!(path = %path.display(), sha256 = %sha256, "Rendered build recipe");
    Ok(RenderedRecipe { path, sha256 })
}
