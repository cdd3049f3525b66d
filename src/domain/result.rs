//! Result type alias for pushcal operations

use crate::domain::errors::PushcalError;

/// Result type used throughout pushcal
pub type Result<T> = std::result::Result<T, PushcalError>;
