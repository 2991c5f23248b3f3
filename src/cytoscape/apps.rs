use tracing::{debug, info};

use crate::error::PipelineError;

use super::NetworkService;

/// 3D-capable renderer add-on.
pub const RENDERER_APP: &str = "Cy3D";
/// Pathway-markup importer add-on.
pub const PATHWAY_IMPORT_APP: &str = "KEGGScape";

/// Installs the required service add-ons that are not yet present.
pub async fn ensure_required_apps(service: &dyn NetworkService) -> Result<(), PipelineError> {
    let installed = service.installed_apps().await?;
    for app in [RENDERER_APP, PATHWAY_IMPORT_APP] {
        if installed.iter().any(|name| name == app) {
            debug!("App {} already installed", app);
        } else {
            info!("Installing app {}", app);
            service.install_app(app).await?;
        }
    }
    Ok(())
}
