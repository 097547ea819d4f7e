//! The connect-then-read sequence both pages share.
//!
//! Everything here blocks on the wallet; pages call it through
//! [`blocking`] so the UI thread keeps running.

use alloy_primitives::Address;
use f20_chain::{format_units, ChainAccess, ChainError, Connection, F20Contract};
use tracing::{error, info};

use crate::state::SharedChain;

/// Display values fetched from the contract. `None` means the read failed
/// and the page keeps whatever it showed before.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketReads {
    pub available: Option<String>,
    pub price: Option<String>,
    pub balance: Option<String>,
}

/// Runs `f` against the chain on tokio's blocking pool.
pub async fn blocking<T, F>(chain: SharedChain, f: F) -> Result<T, ChainError>
where
    T: Send + 'static,
    F: FnOnce(&ChainAccess) -> Result<T, ChainError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&chain))
        .await
        .map_err(|e| ChainError::Provider(format!("chain task aborted: {e}")))?
}

pub fn connect_wallet(chain: &ChainAccess) -> Result<Connection, ChainError> {
    chain.connect().inspect_err(|e| error!(error = %e, "could not connect wallet"))
}

/// Supply, price and the caller's balance. Each read stands alone.
pub fn read_market(chain: &ChainAccess, connection: &Connection) -> MarketReads {
    MarketReads {
        available: read_available(chain, connection),
        price: read_price(chain, connection),
        balance: read_balance(chain, connection),
    }
}

/// What changes after a purchase: supply and the caller's balance.
pub fn read_refresh(chain: &ChainAccess, connection: &Connection) -> MarketReads {
    MarketReads {
        available: read_available(chain, connection),
        price: None,
        balance: read_balance(chain, connection),
    }
}

pub fn read_available(chain: &ChainAccess, connection: &Connection) -> Option<String> {
    read(chain, connection, "available supply", F20Contract::available_tokens).map(format_units)
}

pub fn read_price(chain: &ChainAccess, connection: &Connection) -> Option<String> {
    read(chain, connection, "price", F20Contract::price).map(format_units)
}

pub fn read_balance(chain: &ChainAccess, connection: &Connection) -> Option<String> {
    read(chain, connection, "balance", |contract| contract.balance_of(contract.signer()))
        .map(format_units)
}

pub fn read_owner(chain: &ChainAccess, connection: &Connection) -> Option<Address> {
    read(chain, connection, "owner", F20Contract::owner)
}

fn read<T>(
    chain: &ChainAccess,
    connection: &Connection,
    what: &'static str,
    f: impl FnOnce(&F20Contract) -> Result<T, ChainError>,
) -> Option<T> {
    match chain.contract(connection).and_then(|contract| f(&contract)) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(what, error = %e, "contract read failed");
            None
        }
    }
}

/// Connects and immediately loads the sale figures.
pub fn connect_and_read(chain: &ChainAccess) -> Result<(Connection, MarketReads), ChainError> {
    let connection = connect_wallet(chain)?;
    let reads = read_market(chain, &connection);
    info!(address = %connection.address, ?reads, "sale figures loaded");
    Ok((connection, reads))
}
