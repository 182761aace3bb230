//! Safe expansion of manifest templates.
//!
//! Templates use `${NAME}` / `$NAME` placeholders drawn from a fixed set
//! of runtime-derived variables. Unrecognized placeholders are left
//! verbatim, so a manifest can mix our variables with ones resolved by a
//! later stage (or with literal `$` text) without escaping.

use std::env;
use std::path::Path;
use std::sync::OnceLock;

use chrono::Utc;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::error::Result;

const DEFAULT_IMAGE_TAG: &str = "latest";
const DEFAULT_ITERATIONS: &str = "5";
const DEFAULT_HEALTH_VALIDITY_HOURS: i64 = 24;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("placeholder regex is valid")
    })
}

/// The closed set of substitution variables recognized in templates.
///
/// [`from_env`](Self::from_env) snapshots the process environment and
/// wall clock; tests build the struct directly for deterministic output.
/// Variables are recomputed fresh on every snapshot, never cached.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    /// Current time, seconds since epoch.
    pub check_time_epoch_sec: i64,
    /// `DRY_RUN` env var; empty when unset.
    pub dry_run: String,
    /// `CHECK_TIME_EPOCH_SEC` env var (the launcher's timestamp); empty when unset.
    pub orig_check_time_epoch_sec: String,
    /// `R_LEVEL` env var; empty when unset.
    pub r_level: String,
    /// `IMAGE_TAG` env var, default `latest`.
    pub image_tag: String,
    /// `SHORT_GUID` env var, default: first 4 chars of a fresh v4 UUID.
    pub short_guid: String,
    /// `ITERATIONS` env var, default `5`.
    pub iterations: String,
    /// Oldest still-valid check time: now minus `HEALTH_VALIDITY_HOURS`
    /// (default 24) hours.
    pub expiry_time_epoch_sec: i64,
}

impl TemplateVars {
    /// Snapshot the current environment and clock.
    pub fn from_env() -> Self {
        let now = Utc::now().timestamp();
        let validity_hours = env::var("HEALTH_VALIDITY_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_HEALTH_VALIDITY_HOURS);
        Self {
            check_time_epoch_sec: now,
            dry_run: env::var("DRY_RUN").unwrap_or_default(),
            orig_check_time_epoch_sec: env::var("CHECK_TIME_EPOCH_SEC").unwrap_or_default(),
            r_level: env::var("R_LEVEL").unwrap_or_default(),
            image_tag: env::var("IMAGE_TAG").unwrap_or_else(|_| DEFAULT_IMAGE_TAG.to_string()),
            short_guid: env::var("SHORT_GUID").unwrap_or_else(|_| short_guid()),
            iterations: env::var("ITERATIONS").unwrap_or_else(|_| DEFAULT_ITERATIONS.to_string()),
            expiry_time_epoch_sec: now - validity_hours * 60 * 60,
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "CHECK_TIME_EPOCH_SEC" => Some(self.check_time_epoch_sec.to_string()),
            "DRY_RUN" => Some(self.dry_run.clone()),
            "ORIG_CHECK_TIME_EPOCH_SEC" => Some(self.orig_check_time_epoch_sec.clone()),
            "R_LEVEL" => Some(self.r_level.clone()),
            "IMAGE_TAG" => Some(self.image_tag.clone()),
            "SHORT_GUID" => Some(self.short_guid.clone()),
            "ITERATIONS" => Some(self.iterations.clone()),
            "EXPIRY_TIME_EPOCH_SEC" => Some(self.expiry_time_epoch_sec.to_string()),
            _ => None,
        }
    }

    /// Substitute recognized `${NAME}` / `$NAME` placeholders in `text`.
    /// Anything else, including malformed placeholder syntax, passes
    /// through unchanged.
    pub fn expand(&self, text: &str) -> String {
        placeholder_re()
            .replace_all(text, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                self.lookup(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Read the file at `path` and expand it.
    pub fn expand_file(&self, path: &Path) -> Result<String> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.expand(&text))
    }
}

/// First four characters of a fresh v4 UUID.
fn short_guid() -> String {
    Uuid::new_v4().to_string().chars().take(4).collect()
}

/// Expand the template at `path` with variables snapshotted from the
/// current environment and clock.
pub fn expand_template(path: &Path) -> Result<String> {
    TemplateVars::from_env().expand_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars() -> TemplateVars {
        TemplateVars {
            check_time_epoch_sec: 1_700_000_000,
            dry_run: "true".to_string(),
            orig_check_time_epoch_sec: "1699990000".to_string(),
            r_level: "2".to_string(),
            image_tag: "v2".to_string(),
            short_guid: "ab12".to_string(),
            iterations: "5".to_string(),
            expiry_time_epoch_sec: 1_699_913_600,
        }
    }

    #[test]
    fn substitutes_braced_and_bare_forms() {
        let v = vars();
        assert_eq!(v.expand("tag: ${IMAGE_TAG}"), "tag: v2");
        assert_eq!(v.expand("tag: $IMAGE_TAG"), "tag: v2");
    }

    #[test]
    fn substitutes_numeric_variables() {
        let v = vars();
        assert_eq!(v.expand("at: ${CHECK_TIME_EPOCH_SEC}"), "at: 1700000000");
        assert_eq!(
            v.expand("until: ${EXPIRY_TIME_EPOCH_SEC}"),
            "until: 1699913600"
        );
    }

    #[test]
    fn unknown_placeholder_passes_through() {
        let v = vars();
        assert_eq!(v.expand("keep ${FOO} as-is"), "keep ${FOO} as-is");
        assert_eq!(v.expand("keep $FOO as-is"), "keep $FOO as-is");
    }

    #[test]
    fn malformed_placeholder_passes_through() {
        let v = vars();
        assert_eq!(v.expand("broken ${ not a var"), "broken ${ not a var");
        assert_eq!(v.expand("lone $ sign"), "lone $ sign");
    }

    #[test]
    fn expands_several_placeholders_in_one_document() {
        let v = vars();
        let doc = "guid: ${SHORT_GUID}\niterations: ${ITERATIONS}\nlevel: $R_LEVEL\n";
        assert_eq!(v.expand(doc), "guid: ab12\niterations: 5\nlevel: 2\n");
    }

    #[test]
    fn expand_file_reads_and_substitutes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.yaml");
        std::fs::write(&path, "image: repo/app:${IMAGE_TAG}\n").unwrap();
        let out = vars().expand_file(&path).unwrap();
        assert_eq!(out, "image: repo/app:v2\n");
    }

    #[test]
    fn expand_file_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = vars().expand_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, crate::HealthprobeError::Io(_)));
    }

    #[test]
    fn from_env_applies_env_overrides_and_defaults() {
        // The only test that touches these env vars, so no interleaving.
        std::env::set_var("IMAGE_TAG", "v9");
        std::env::set_var("SHORT_GUID", "zz99");
        let v = TemplateVars::from_env();
        assert_eq!(v.image_tag, "v9");
        assert_eq!(v.short_guid, "zz99");
        assert_eq!(
            v.expiry_time_epoch_sec,
            v.check_time_epoch_sec - 24 * 60 * 60
        );

        std::env::remove_var("IMAGE_TAG");
        std::env::remove_var("SHORT_GUID");
        let v = TemplateVars::from_env();
        assert_eq!(v.image_tag, "latest");
        assert_eq!(v.short_guid.len(), 4);
        assert_eq!(v.iterations, "5");
        assert!(v.dry_run.is_empty());
    }

    #[test]
    fn short_guid_is_four_hex_chars() {
        let g = short_guid();
        assert_eq!(g.len(), 4);
        assert!(g.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
