//! Reconciliation modes.

use crate::VrfError;

/// Policy applied to a desired-configuration batch.
///
/// Every mode answers the same question — "make the controller's
/// resource set match the desired set" — with a different create /
/// update / delete policy. See the state handlers for the per-mode
/// algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileMode {
    /// Create absent resources, update drifted ones. Never deletes.
    Merged,
    /// Like merged, but a drifted resource is deleted and recreated
    /// whole rather than updated in place.
    Replaced,
    /// Per fabric: delete every resource not in the desired set, then
    /// apply merged logic to the desired set.
    Overridden,
    /// Delete the named resources, or everything in a fabric when no
    /// name is given. Idempotent.
    Deleted,
    /// Read-only aggregation. Never mutates.
    Query,
}

impl ReconcileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileMode::Merged => "merged",
            ReconcileMode::Replaced => "replaced",
            ReconcileMode::Overridden => "overridden",
            ReconcileMode::Deleted => "deleted",
            ReconcileMode::Query => "query",
        }
    }
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReconcileMode {
    type Err = VrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merged" => Ok(ReconcileMode::Merged),
            "replaced" => Ok(ReconcileMode::Replaced),
            "overridden" => Ok(ReconcileMode::Overridden),
            "deleted" => Ok(ReconcileMode::Deleted),
            "query" => Ok(ReconcileMode::Query),
            other => Err(VrfError::Configuration(format!(
                "unsupported reconciliation mode: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for mode in [
            ReconcileMode::Merged,
            ReconcileMode::Replaced,
            ReconcileMode::Overridden,
            ReconcileMode::Deleted,
            ReconcileMode::Query,
        ] {
            assert_eq!(mode.as_str().parse::<ReconcileMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("absent".parse::<ReconcileMode>().is_err());
    }
}
