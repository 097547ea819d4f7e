//! Chain access for the F20 token-sale front-end.
//!
//! A [`WalletProvider`] is the only way out to the network. [`ChainAccess`]
//! wraps one together with the contract address, hands out connections and
//! per-operation contract handles, and [`units`] converts between the
//! contract's 18-decimal integers and display strings.

pub mod access;
pub mod error;
pub mod provider;
pub mod schema;
pub mod units;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use access::{ChainAccess, Connection, F20Contract, PendingTx};
pub use error::ChainError;
pub use provider::{CallRequest, HttpWallet, TransactionReceipt, TransactionRequest, WalletProvider};
pub use schema::{DEFAULT_CONTRACT_ADDRESS, IF20};
pub use units::{format_units, parse_positive, parse_units, purchase_cost, UnitsError};
