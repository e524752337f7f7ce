/*!
 * # Icicle - Custodial Arbitrage Vault
 *
 * Icicle holds a pool of wrapped native currency on behalf of one administrator
 * and lets a set of operators route it through constant-product pools, keeping
 * a trade only if it returns at least a caller-chosen minimum.
 *
 * ## Core Features
 *
 * - **Access Control**: one fixed Administrator manages the Operator set
 * - **Custody**: native value enters by wrapping and leaves by unwrapping
 * - **Path Validation**: closed paths through the settlement asset, one pool per hop
 * - **Atomic Execution**: every hop and transfer of a failed arbitrage is undone
 *
 * ## Module Structure
 *
 * - `arb`: identifiers, hop math and path quotes
 * - `config`: environment configuration
 * - `host`: the in-process chain the vault runs against
 * - `scenario`: JSON scenarios for the command line
 * - `utils`: logging and constants
 * - `vault`: the vault itself
 */

/// Identifiers, hop math and path quotes
pub mod arb;
/// Environment configuration
pub mod config;
/// In-process chain: journaled state, wrapped native and pools
pub mod host;
/// JSON scenarios
pub mod scenario;
/// Utility functions and helpers
pub mod utils;
/// The custodial arbitrage vault
pub mod vault;
