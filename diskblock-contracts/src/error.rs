// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Errors raised by an arbitration backend.
///
/// Only session establishment can fail; every later OS interaction reports
/// absence through `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbitrationError {
    #[error("disk arbitration session unavailable: {0}")]
    SessionUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ArbitrationError>;
