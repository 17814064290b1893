//! Error types shared by every module of the core.

use thiserror::Error;

use crate::types::View;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid donation amount: {0:?}")]
    InvalidAmount(String),

    #[error("No transition from {from:?} on {action}")]
    InvalidTransition { from: View, action: String },

    #[error("A donation is being settled; navigation is locked")]
    FlowLocked,

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Moment not found: {0}")]
    MomentNotFound(String),

    #[error("Action not allowed: {0}")]
    NotAllowed(String),

    #[error("A request is already in flight")]
    Busy,
}

pub type Result<T> = std::result::Result<T, CoreError>;
