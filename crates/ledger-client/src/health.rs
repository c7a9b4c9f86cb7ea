// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health status reported by ledger clients

use serde::{Deserialize, Serialize};

/// Health status of a ledger node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Node is healthy and caught up
    Up,
    /// Node answers but is lagging or otherwise impaired
    Degraded { reason: String },
    /// Node cannot be reached
    Down { reason: String },
}

impl HealthStatus {
    /// Check if this health status indicates the node can serve requests
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded { .. })
    }

    /// Check if this health status indicates the node is completely down
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Node is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_availability() {
        assert!(HealthStatus::Up.is_available());
        assert!(
            HealthStatus::Degraded {
                reason: "behind by 42 slots".to_string()
            }
            .is_available()
        );
        assert!(
            !HealthStatus::Down {
                reason: "connection refused".to_string()
            }
            .is_available()
        );
    }

    #[test]
    fn health_status_description() {
        assert_eq!(HealthStatus::Up.description(), "Node is healthy");
        assert!(!HealthStatus::Up.is_down());
        let down = HealthStatus::Down {
            reason: "offline".to_string(),
        };
        assert_eq!(down.description(), "offline");
        assert!(down.is_down());
    }
}
