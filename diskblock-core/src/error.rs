// SPDX-License-Identifier: GPL-3.0-only

use diskblock_contracts::ArbitrationError;
use thiserror::Error;

use crate::ControllerState;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("could not establish disk arbitration session: {0}")]
    SessionUnavailable(#[from] ArbitrationError),

    #[error("controller must be started before running (state: {0:?})")]
    NotStarted(ControllerState),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
