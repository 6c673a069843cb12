//! Mileage (loyalty point) snapshot model

use serde::{Deserialize, Serialize};

/// Read-only mileage snapshot supplied by the upstream membership system
///
/// Eligibility (`can_use`, which requires at least two concurrent course
/// contracts) is decided upstream; the engine only validates the
/// redemption request against this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MileInfo {
    /// Current point balance
    pub balance: i64,
    /// Whether redemption is allowed for this student
    pub can_use: bool,
    /// Upstream reason when redemption is not allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
