//! State behind the public sale page.

use alloy_primitives::U256;
use f20_chain::{format_units, parse_positive, purchase_cost, ChainAccess, ChainError, Connection};
use tracing::{debug, error, info};

use crate::session::{self, MarketReads};
use crate::state::{ConnectionStatus, PendingOperation};

pub const PURCHASE_CONFIRMED: &str = "Purchase successful";
pub const PURCHASE_FAILED: &str = "Purchase failed";
pub const INVALID_QUANTITY: &str = "Enter a quantity greater than zero";

#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseView {
    pub connection: ConnectionStatus,
    pub available: String,
    pub price: String,
    pub balance: String,
    /// Raw text of the quantity input.
    pub quantity: String,
    pub purchase: PendingOperation,
}

impl Default for PurchaseView {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Disconnected,
            available: format_units(U256::ZERO),
            price: format_units(U256::ZERO),
            balance: format_units(U256::ZERO),
            quantity: String::new(),
            purchase: PendingOperation::default(),
        }
    }
}

impl PurchaseView {
    /// Returns false when a connect is already running or cannot succeed.
    pub fn begin_connect(&mut self) -> bool {
        if !self.connection.can_connect() {
            return false;
        }
        self.connection = ConnectionStatus::Connecting;
        true
    }

    pub fn finish_connect(&mut self, result: Result<(Connection, MarketReads), ChainError>) {
        match result {
            Ok((connection, reads)) => {
                self.connection = ConnectionStatus::Connected(connection);
                self.apply_reads(reads);
            }
            Err(e) => self.connection = ConnectionStatus::from_error(&e),
        }
    }

    /// Overwrites only the figures that were actually read.
    pub fn apply_reads(&mut self, reads: MarketReads) {
        if let Some(available) = reads.available {
            self.available = available;
        }
        if let Some(price) = reads.price {
            self.price = price;
        }
        if let Some(balance) = reads.balance {
            self.balance = balance;
        }
    }

    /// Validates the quantity and marks the purchase in flight. `None` means
    /// nothing should be sent.
    pub fn begin_buy(&mut self) -> Option<(Connection, U256)> {
        if self.purchase.is_busy() {
            return None;
        }
        let connection = self.connection.connection()?;
        match parse_positive(&self.quantity) {
            Ok(quantity) => {
                self.purchase.begin();
                Some((connection, quantity))
            }
            Err(e) => {
                debug!(input = %self.quantity, error = %e, "purchase quantity refused");
                self.purchase.reject(INVALID_QUANTITY);
                None
            }
        }
    }

    pub fn finish_buy(&mut self, result: Result<MarketReads, ChainError>) {
        match result {
            Ok(reads) => {
                self.purchase.confirm(PURCHASE_CONFIRMED);
                self.apply_reads(reads);
            }
            Err(e) => {
                error!(error = %e, "purchase failed");
                self.purchase.fail(PURCHASE_FAILED);
            }
        }
    }
}

/// Buys `quantity` tokens at the price the contract quotes right now, waits
/// for the block, then re-reads supply and balance.
pub fn run_buy(
    chain: &ChainAccess,
    connection: &Connection,
    quantity: U256,
) -> Result<MarketReads, ChainError> {
    let contract = chain.contract(connection)?;
    let price = contract.price()?;
    let cost = purchase_cost(quantity, price)?;
    info!(
        quantity = %format_units(quantity),
        cost = %format_units(cost),
        "buying tokens"
    );
    contract.buy(quantity, cost)?.wait()?;
    Ok(session::read_refresh(chain, connection))
}
