//! Manager version and build metadata.
//!
//! The version recorded in the ownership ledger is always passed explicitly
//! into ledger-writing operations; [`CURRENT`] is only read at the CLI edge.

use serde::Serialize;

/// Version of this `mcs` build, recorded as the owner version of written keys.
pub const CURRENT: &str = env!("CARGO_PKG_VERSION");

/// Short git commit the binary was built from (or "unknown").
pub const GIT_COMMIT: &str = env!("MCS_GIT_COMMIT");

/// ISO 8601 build timestamp.
pub const BUILD_TIMESTAMP: &str = env!("MCS_BUILD_TIMESTAMP");

/// Build information reported by `mcs version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub built_at: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: CURRENT,
            commit: GIT_COMMIT,
            built_at: BUILD_TIMESTAMP,
        }
    }
}

impl crate::commands::Output for VersionInfo {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!(
            "mcs {} (commit {}, built {})",
            self.version, self.commit, self.built_at
        )
    }
}
