// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Outcome of a mount-approval request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Let the mount proceed.
    Allow,
    /// Veto the mount; the reason is handed back to the OS with the dissent.
    Deny { reason: String },
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
