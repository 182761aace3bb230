//! Kubernetes manifest provisioning via kubectl.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::cleanup::CleanupAction;
use crate::command::{run_command, CommandResult};
use crate::error::Result;
use crate::template::TemplateVars;

/// Expand the template at `yaml_path`, write the result to a kept temp
/// file, and `kubectl apply` it. Returns the action that deletes the
/// applied objects.
///
/// The temp file is deliberately not removed: the expanded manifest stays
/// on disk for post-mortem inspection, and the delete action references
/// it by path.
pub fn apply_manifest(yaml_path: &Path, kubectl_path: &str) -> Result<CleanupAction> {
    let expanded = TemplateVars::from_env().expand_file(yaml_path)?;

    let mut tmp = tempfile::Builder::new()
        .prefix("healthprobe-")
        .suffix(".yaml")
        .tempfile()?;
    tmp.write_all(expanded.as_bytes())?;
    let (_file, tmp_path) = tmp.keep().map_err(|e| e.error)?;

    apply_yaml_file(&tmp_path, kubectl_path)
}

/// Apply the manifest at `yaml_path` and return the matching delete
/// action. A non-zero exit from the apply is logged but not checked; the
/// delete action is returned unconditionally.
pub fn apply_yaml_file(yaml_path: &Path, kubectl_path: &str) -> Result<CleanupAction> {
    run_command(
        &format!("{kubectl_path} apply -f {}", yaml_path.display()),
        false,
    )?;
    Ok(CleanupAction::new(format!(
        "{kubectl_path} delete -f {}",
        yaml_path.display()
    )))
}

/// Expand and apply `yaml_path`, collecting the cleanup in a vec for
/// callers that aggregate cleanups across several provisioning steps.
pub fn create_k8s_objects(yaml_path: &Path, kubectl_path: &str) -> Result<Vec<CleanupAction>> {
    Ok(vec![apply_manifest(yaml_path, kubectl_path)?])
}

/// Label a node, overwriting any existing value for the key.
pub fn add_node_label(
    kubectl_path: &str,
    node_name: &str,
    key: &str,
    value: &str,
) -> Result<CommandResult> {
    info!("adding label {key}={value} to node {node_name}");
    run_command(
        &format!("{kubectl_path} label node {node_name} {key}={value} --overwrite"),
        false,
    )
}
