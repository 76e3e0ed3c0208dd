//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Contract lifecycle commands
pub mod contract;

/// General utility commands
pub mod general;

/// Payment commands and reports
pub mod payment;

// Export commands
pub use contract::*;
pub use general::*;
pub use payment::*;
