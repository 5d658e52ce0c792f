//! requirements.lock refresh through helm

use crate::error::ToolError;
use crate::process::Tool;
use std::path::Path;

/// Regenerate requirements.lock and charts/ from the pins in requirements.yaml.
///
/// Index refresh is skipped since the synchronizer already did it.
pub fn sync_lock(helm: &Tool, chart_path: &Path) -> Result<(), ToolError> {
    helm.ensure_installed(&["version", "--short"])?;
    let chart = chart_path.to_string_lossy();
    let output = helm.run(&["dependency", "update", "--skip-refresh", chart.as_ref()])?;
    tracing::debug!(chart = %chart_path.display(), "{}", output);
    tracing::info!(chart = %chart_path.display(), "requirements.lock updated");
    Ok(())
}
