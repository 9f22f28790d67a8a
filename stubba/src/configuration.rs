//! Stubbing configuration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Level at which a stub reports an original method it could not preserve or restore.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LostOriginalLogLevel {
    /// Not logged, the loss is only visible in the stub state
    Silent,

    /// Logged at debug level
    Debug,

    /// Logged at warning level
    #[default]
    Warning,
}

/// Options driving how stubs are installed and removed.
///
/// Every field has a default so the configuration can be embedded partially in a host test
/// framework configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubbingConfiguration {
    /// Reject calls of a keyword selector interceptor with a wrong number of arguments.
    pub validate_keyword_arity: bool,

    /// Level at which a lost original method is logged.
    pub lost_original_log_level: LostOriginalLogLevel,
}

impl Default for StubbingConfiguration {
    fn default() -> Self {
        Self {
            validate_keyword_arity: true,
            lost_original_log_level: LostOriginalLogLevel::default(),
        }
    }
}
