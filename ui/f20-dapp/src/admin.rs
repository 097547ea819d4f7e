//! State behind the owner-only admin page.

use alloy_primitives::{Address, U256};
use f20_chain::{format_units, parse_positive, ChainAccess, ChainError, Connection};
use tracing::{error, info, warn};

use crate::session;
use crate::state::{ConnectionStatus, PendingOperation};

pub const ACCESS_DENIED: &str = "Access denied: the connected wallet is not the contract owner";
pub const OWNER_UNKNOWN: &str = "Could not read the contract owner";

pub const MINT_CONFIRMED: &str = "Tokens minted successfully";
pub const MINT_FAILED: &str = "Failed to mint tokens";
pub const PRICE_CONFIRMED: &str = "Price updated successfully";
pub const PRICE_FAILED: &str = "Failed to change the price";
pub const WITHDRAW_CONFIRMED: &str = "Funds withdrawn successfully";
pub const WITHDRAW_FAILED: &str = "Failed to withdraw funds";
pub const INVALID_AMOUNT: &str = "Enter an amount greater than zero";
pub const INVALID_PRICE: &str = "Enter a price greater than zero";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ownership {
    /// Not checked yet, or the owner read failed.
    #[default]
    Unknown,
    Owner,
    NotOwner,
}

/// Case-insensitive comparison of two hex addresses.
pub fn owner_matches(owner: &str, address: &str) -> bool {
    owner.trim().eq_ignore_ascii_case(address.trim())
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdminView {
    pub connection: ConnectionStatus,
    pub ownership: Ownership,
    pub mint_amount: String,
    pub new_price: String,
    pub mint: PendingOperation,
    pub price_change: PendingOperation,
    pub withdrawal: PendingOperation,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Disconnected,
            ownership: Ownership::Unknown,
            mint_amount: String::new(),
            new_price: String::new(),
            mint: PendingOperation::default(),
            price_change: PendingOperation::default(),
            withdrawal: PendingOperation::default(),
        }
    }
}

impl AdminView {
    pub fn begin_connect(&mut self) -> bool {
        if !self.connection.can_connect() {
            return false;
        }
        self.connection = ConnectionStatus::Connecting;
        true
    }

    pub fn finish_connect(&mut self, result: Result<(Connection, Option<Address>), ChainError>) {
        match result {
            Ok((connection, owner)) => {
                self.ownership = match owner {
                    Some(owner) => {
                        if owner_matches(&owner.to_string(), &connection.address.to_string()) {
                            Ownership::Owner
                        } else {
                            warn!(address = %connection.address, %owner, "admin access denied");
                            Ownership::NotOwner
                        }
                    }
                    None => Ownership::Unknown,
                };
                self.connection = ConnectionStatus::Connected(connection);
            }
            Err(e) => {
                self.connection = ConnectionStatus::from_error(&e);
                self.ownership = Ownership::Unknown;
            }
        }
    }

    /// The connection, but only when it belongs to the owner.
    fn authorized(&self) -> Option<Connection> {
        match self.ownership {
            Ownership::Owner => self.connection.connection(),
            _ => None,
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.authorized().is_some()
    }

    /// Message shown in place of the controls, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.connection.connection()?;
        match self.ownership {
            Ownership::Owner => None,
            Ownership::NotOwner => Some(ACCESS_DENIED),
            Ownership::Unknown => Some(OWNER_UNKNOWN),
        }
    }

    pub fn begin_mint(&mut self) -> Option<(Connection, U256)> {
        let connection = self.authorized()?;
        if self.mint.is_busy() {
            return None;
        }
        match parse_positive(&self.mint_amount) {
            Ok(amount) => {
                self.mint.begin();
                Some((connection, amount))
            }
            Err(_) => {
                self.mint.reject(INVALID_AMOUNT);
                None
            }
        }
    }

    pub fn begin_change_price(&mut self) -> Option<(Connection, U256)> {
        let connection = self.authorized()?;
        if self.price_change.is_busy() {
            return None;
        }
        match parse_positive(&self.new_price) {
            Ok(price) => {
                self.price_change.begin();
                Some((connection, price))
            }
            Err(_) => {
                self.price_change.reject(INVALID_PRICE);
                None
            }
        }
    }

    pub fn begin_withdraw(&mut self) -> Option<Connection> {
        let connection = self.authorized()?;
        if self.withdrawal.is_busy() {
            return None;
        }
        self.withdrawal.begin();
        Some(connection)
    }

    pub fn finish_mint(&mut self, result: Result<(), ChainError>) {
        finish(&mut self.mint, result, "mint", MINT_CONFIRMED, MINT_FAILED);
    }

    pub fn finish_change_price(&mut self, result: Result<(), ChainError>) {
        finish(&mut self.price_change, result, "price change", PRICE_CONFIRMED, PRICE_FAILED);
    }

    pub fn finish_withdraw(&mut self, result: Result<(), ChainError>) {
        finish(&mut self.withdrawal, result, "withdrawal", WITHDRAW_CONFIRMED, WITHDRAW_FAILED);
    }
}

fn finish(
    op: &mut PendingOperation,
    result: Result<(), ChainError>,
    action: &'static str,
    confirmed: &str,
    failed: &str,
) {
    match result {
        Ok(()) => op.confirm(confirmed),
        Err(e) => {
            error!(action, error = %e, "admin action failed");
            op.fail(failed);
        }
    }
}

/// Connects and looks up the recorded owner. A failed owner read is logged
/// and reported as `None`.
pub fn connect_and_check_owner(
    chain: &ChainAccess,
) -> Result<(Connection, Option<Address>), ChainError> {
    let connection = session::connect_wallet(chain)?;
    let owner = session::read_owner(chain, &connection);
    Ok((connection, owner))
}

pub fn run_mint(chain: &ChainAccess, connection: &Connection, amount: U256) -> Result<(), ChainError> {
    info!(amount = %format_units(amount), "minting tokens");
    chain.contract(connection)?.mint(amount)?.wait()?;
    Ok(())
}

pub fn run_change_price(
    chain: &ChainAccess,
    connection: &Connection,
    price: U256,
) -> Result<(), ChainError> {
    info!(price = %format_units(price), "changing token price");
    chain.contract(connection)?.change_price(price)?.wait()?;
    Ok(())
}

pub fn run_withdraw(chain: &ChainAccess, connection: &Connection) -> Result<(), ChainError> {
    info!("withdrawing sale funds");
    chain.contract(connection)?.withdraw()?.wait()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy_primitives::address;
    use alloy_sol_types::SolCall;
    use f20_chain::testing::{RpcCall, ScriptedWallet};
    use f20_chain::units::SCALE;
    use f20_chain::{DEFAULT_CONTRACT_ADDRESS, IF20};

    use super::*;
    use crate::state::OperationStatus;

    const OWNER: Address = address!("00000000000000000000000000000000000000aa");
    const STRANGER: Address = address!("00000000000000000000000000000000000000bb");

    fn connect_as(account: Address) -> (Arc<ScriptedWallet>, ChainAccess, AdminView) {
        let wallet = Arc::new(ScriptedWallet::new(vec![account]));
        wallet.set_owner(OWNER);
        let chain = ChainAccess::new(wallet.clone(), DEFAULT_CONTRACT_ADDRESS, Duration::ZERO);
        let mut view = AdminView::default();
        assert!(view.begin_connect());
        view.finish_connect(connect_and_check_owner(&chain));
        wallet.clear_calls();
        (wallet, chain, view)
    }

    fn sends(wallet: &ScriptedWallet) -> usize {
        wallet
            .calls()
            .iter()
            .filter(|c| matches!(c, RpcCall::Send(_)))
            .count()
    }

    #[test]
    fn ownership_check_ignores_case() {
        assert!(owner_matches(
            "0xABCDEF0000000000000000000000000000000001",
            "0xabcdef0000000000000000000000000000000001"
        ));
        assert!(!owner_matches(
            "0xABCDEF0000000000000000000000000000000001",
            "0xabcdef0000000000000000000000000000000002"
        ));
    }

    #[test]
    fn owner_sees_controls() {
        let (_, _, view) = connect_as(OWNER);
        assert_eq!(view.ownership, Ownership::Owner);
        assert!(view.controls_visible());
        assert_eq!(view.notice(), None);
    }

    #[test]
    fn stranger_is_denied_and_cannot_write() {
        let (wallet, _, mut view) = connect_as(STRANGER);
        assert_eq!(view.ownership, Ownership::NotOwner);
        assert!(!view.controls_visible());
        assert_eq!(view.notice(), Some(ACCESS_DENIED));

        view.mint_amount = "5".into();
        view.new_price = "1".into();
        assert!(view.begin_mint().is_none());
        assert!(view.begin_change_price().is_none());
        assert!(view.begin_withdraw().is_none());
        assert!(wallet.calls().is_empty());
    }

    #[test]
    fn failed_owner_read_keeps_controls_hidden() {
        let wallet = Arc::new(ScriptedWallet::new(vec![OWNER]));
        wallet.fail_call(IF20::ownerCall::SELECTOR, ChainError::Provider("down".into()));
        let chain = ChainAccess::new(wallet.clone(), DEFAULT_CONTRACT_ADDRESS, Duration::ZERO);

        let mut view = AdminView::default();
        view.begin_connect();
        view.finish_connect(connect_and_check_owner(&chain));
        assert!(view.connection.connection().is_some());
        assert_eq!(view.ownership, Ownership::Unknown);
        assert!(!view.controls_visible());
        assert_eq!(view.notice(), Some(OWNER_UNKNOWN));
    }

    #[test]
    fn mint_submits_scaled_amount_and_confirms() {
        let (wallet, chain, mut view) = connect_as(OWNER);
        view.mint_amount = "1.5".into();
        let (connection, amount) = view.begin_mint().unwrap();
        assert!(view.mint.is_busy());
        assert_eq!(amount, SCALE + SCALE / U256::from(2));

        view.finish_mint(run_mint(&chain, &connection, amount));
        assert_eq!(view.mint.status, OperationStatus::Confirmed);
        assert_eq!(view.mint.message.as_deref(), Some(MINT_CONFIRMED));
        assert_eq!(wallet.available(), amount);
        assert_eq!(&wallet.sent()[0].data[..4], &IF20::mintF20Call::SELECTOR);
    }

    #[test]
    fn non_positive_inputs_are_refused_locally() {
        let (wallet, _, mut view) = connect_as(OWNER);
        for input in ["", "0", "-1", "x"] {
            view.mint_amount = input.into();
            view.new_price = input.into();
            assert!(view.begin_mint().is_none());
            assert!(view.begin_change_price().is_none());
        }
        assert_eq!(view.mint.message.as_deref(), Some(INVALID_AMOUNT));
        assert_eq!(view.price_change.message.as_deref(), Some(INVALID_PRICE));
        assert!(wallet.calls().is_empty());
    }

    #[test]
    fn change_price_sends_native_units() {
        let (wallet, chain, mut view) = connect_as(OWNER);
        view.new_price = "0.25".into();
        let (connection, price) = view.begin_change_price().unwrap();
        view.finish_change_price(run_change_price(&chain, &connection, price));

        assert_eq!(view.price_change.status, OperationStatus::Confirmed);
        assert_eq!(wallet.price(), SCALE / U256::from(4));
    }

    #[test]
    fn withdraw_needs_no_input() {
        let (wallet, chain, mut view) = connect_as(OWNER);
        let connection = view.begin_withdraw().unwrap();
        view.finish_withdraw(run_withdraw(&chain, &connection));

        assert_eq!(view.withdrawal.message.as_deref(), Some(WITHDRAW_CONFIRMED));
        let sent = wallet.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].value, None);
        assert_eq!(&sent[0].data[..4], &IF20::withdrawCall::SELECTOR);
    }

    #[test]
    fn failed_write_clears_busy_and_reports() {
        let (wallet, chain, mut view) = connect_as(OWNER);
        wallet.revert_transactions(true);
        let connection = view.begin_withdraw().unwrap();
        view.finish_withdraw(run_withdraw(&chain, &connection));

        assert!(!view.withdrawal.is_busy());
        assert_eq!(view.withdrawal.status, OperationStatus::Failed);
        assert_eq!(view.withdrawal.message.as_deref(), Some(WITHDRAW_FAILED));
        assert_eq!(sends(&wallet), 1);
    }

    #[test]
    fn actions_are_independent_but_not_reentrant() {
        let (_, _, mut view) = connect_as(OWNER);
        view.mint_amount = "1".into();
        view.new_price = "2".into();

        assert!(view.begin_mint().is_some());
        assert!(view.begin_mint().is_none());
        assert!(view.begin_change_price().is_some());
        assert!(view.begin_withdraw().is_some());
        assert!(view.mint.is_busy() && view.price_change.is_busy() && view.withdrawal.is_busy());
    }
}
