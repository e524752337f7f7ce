//! # Arbitrage Module
//!
//! Identifiers, constant-product hop math and path quotation shared by the
//! vault's executor and the command line. Nothing here mutates chain state.

/// Path quotation
pub mod quote;
/// Hop direction and constant-product output
pub mod swap;
/// Test helpers and fixtures
#[cfg(test)]
pub(crate) mod test_helpers;
/// Token and pool identifiers
pub mod token;
