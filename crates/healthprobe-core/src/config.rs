//! Binary paths and environment preconditions for health-check runs.

use std::env;

use crate::error::{HealthprobeError, Result};

// Install locations baked into the health-check images.
const DEFAULT_HELM_PATH: &str = "/usr/local/bin/helm";
const DEFAULT_KUBECTL_PATH: &str = "/app/kubectl";

/// Path to the helm binary: `HELM_PATH` env var if set, then a `$PATH`
/// lookup, then the image's install location.
pub fn helm_path() -> String {
    binary_path("HELM_PATH", "helm", DEFAULT_HELM_PATH)
}

/// Path to the kubectl binary: `KUBECTL_PATH` env var if set, then a
/// `$PATH` lookup, then the image's install location.
pub fn kubectl_path() -> String {
    binary_path("KUBECTL_PATH", "kubectl", DEFAULT_KUBECTL_PATH)
}

fn binary_path(env_key: &str, binary: &str, default: &str) -> String {
    if let Ok(path) = env::var(env_key) {
        return path;
    }
    match which::which(binary) {
        Ok(found) => found.to_string_lossy().into_owned(),
        Err(_) => default.to_string(),
    }
}

/// Fail with `MissingEnv` for the first of `required` that is not set.
///
/// Health checks call this up front so a misconfigured deployment fails
/// before any cluster resources are provisioned.
pub fn ensure_env_vars(required: &[&str]) -> Result<()> {
    for key in required {
        if env::var(key).is_err() {
            return Err(HealthprobeError::MissingEnv((*key).to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_overrides_lookup() {
        // The only test that touches HELM_PATH, so no interleaving.
        env::set_var("HELM_PATH", "/opt/helm");
        assert_eq!(helm_path(), "/opt/helm");
        env::remove_var("HELM_PATH");
    }

    #[test]
    fn binary_path_falls_back_to_default() {
        let path = binary_path(
            "HEALTHPROBE_TEST_UNSET",
            "no-such-binary-healthprobe",
            "/fallback/bin",
        );
        assert_eq!(path, "/fallback/bin");
    }

    #[test]
    fn ensure_env_vars_reports_first_missing() {
        env::set_var("HEALTHPROBE_TEST_PRESENT", "1");
        assert!(ensure_env_vars(&["HEALTHPROBE_TEST_PRESENT"]).is_ok());

        let err = ensure_env_vars(&["HEALTHPROBE_TEST_PRESENT", "HEALTHPROBE_TEST_ABSENT"])
            .unwrap_err();
        match err {
            HealthprobeError::MissingEnv(key) => assert_eq!(key, "HEALTHPROBE_TEST_ABSENT"),
            other => panic!("expected MissingEnv, got {other:?}"),
        }
        env::remove_var("HEALTHPROBE_TEST_PRESENT");
    }
}
