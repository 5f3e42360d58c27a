//! Match-and-notify core: highlight matching, nickname tracking and command
//! dispatch.

pub mod dispatch;
pub mod highlight;
pub mod identity;

use std::io;
use thiserror::Error;

/// Everything that can go wrong while configuring or notifying. None of these
/// are fatal; callers report them to the operator and carry on.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid option name '{0}'")]
    UnknownOption(String),

    #[error("{0}")]
    Usage(&'static str),

    #[error("command to run not specified")]
    NoCommandConfigured,

    #[error("failed to run '{cmd}': {source}")]
    Invocation {
        cmd: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to save options: {0}")]
    Persist(#[from] io::Error),
}

impl NotifyError {
    /// Single line shown to the operator.
    pub fn operator_message(&self) -> String {
        match self {
            Self::Usage(usage) => format!("Usage: {}", usage),
            other => format!("Error: {}", other),
        }
    }
}
