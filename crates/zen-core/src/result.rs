//! Result type alias for expansion operations

use crate::error::ZenError;

/// Standard Result type for expansion operations
pub type Result<T> = std::result::Result<T, ZenError>;
