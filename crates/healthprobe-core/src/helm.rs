//! Helm release provisioning.

use indexmap::IndexMap;
use tracing::info;

use crate::cleanup::CleanupAction;
use crate::command::run_command;
use crate::error::Result;

/// Which helm subcommand to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelmMode {
    Install,
    Uninstall,
}

/// Parameters for a helm release managed by a health check.
#[derive(Debug, Clone, Default)]
pub struct HelmRelease {
    pub helm_path: String,
    pub release_name: String,
    pub chart: Option<String>,
    /// `--set key=value` overrides, emitted in insertion order.
    pub values: Option<IndexMap<String, String>>,
    /// Chart version; helm defaults to latest when unset.
    pub chart_version: Option<String>,
    /// Extra flags appended verbatim to `helm install`.
    pub install_flags: Option<String>,
}

/// Build the helm command line for `release` in the given mode.
///
/// Uninstall produces `<helm> uninstall <release>` and ignores chart,
/// values, version and extra flags. Install appends, in this order:
/// `--version` if set, one `--set k=v` per values entry, then any extra
/// flags verbatim.
pub fn generate_helm_command(release: &HelmRelease, mode: HelmMode) -> String {
    let mut command = release.helm_path.clone();
    match mode {
        HelmMode::Uninstall => {
            command = format!("{command} uninstall {}", release.release_name);
        }
        HelmMode::Install => {
            command = format!(
                "{command} install {} {}",
                release.release_name,
                release.chart.as_deref().unwrap_or_default()
            );
            if let Some(version) = &release.chart_version {
                command = format!("{command} --version {version}");
            }
            if let Some(values) = &release.values {
                for (k, v) in values {
                    command = format!("{command} --set {k}={v}");
                }
            }
            if let Some(flags) = &release.install_flags {
                command = format!("{command} {flags}");
            }
        }
    }
    command
}

/// Install `release` and return the action that uninstalls it.
///
/// The install runs immediately; a non-zero exit is logged but not
/// checked, so the uninstall action is returned even when the install
/// failed. Only a spawn failure surfaces as an error.
pub fn install_helm_release(release: &HelmRelease) -> Result<CleanupAction> {
    let install = generate_helm_command(release, HelmMode::Install);
    run_command(&install, false)?;

    let uninstall = generate_helm_command(release, HelmMode::Uninstall);
    info!("release {} installed", release.release_name);
    Ok(CleanupAction::new(uninstall))
}

/// Install `release`, collecting the cleanup in a vec for callers that
/// aggregate cleanups across several provisioning steps.
pub fn create_helm_release(release: &HelmRelease) -> Result<Vec<CleanupAction>> {
    Ok(vec![install_helm_release(release)?])
}
