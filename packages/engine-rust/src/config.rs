use serde::{Deserialize, Serialize};

/// Group a procedure is added to when its spec names no groups.
pub const DEFAULT_PROCEDURES_GROUP: &str = "default_procedures";
/// Group a constraint is added to when its spec names no groups.
pub const DEFAULT_CONSTRAINTS_GROUP: &str = "default_constraints";

/// Engine-level configuration.
///
/// Controls default operation groups for catalog entries and the tracing
/// subscriber installed by [`logging::init`](crate::logging::init).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Operation group for procedures without explicit groups.
    pub default_procedures_group: String,
    /// Operation group for constraints without explicit groups.
    pub default_constraints_group: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit JSON log lines instead of the compact text format.
    pub log_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_procedures_group: DEFAULT_PROCEDURES_GROUP.to_string(),
            default_constraints_group: DEFAULT_CONSTRAINTS_GROUP.to_string(),
            log_filter: "warn".to_string(),
            log_json: false,
        }
    }
}
