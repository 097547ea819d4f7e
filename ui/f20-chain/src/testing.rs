//! In-memory wallet and contract used by tests in place of [`HttpWallet`].
//!
//! [`HttpWallet`]: crate::provider::HttpWallet

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolCall;

use crate::error::ChainError;
use crate::provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
use crate::schema::IF20;
use crate::units::SCALE;

/// One request as the wallet saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcCall {
    RequestAccounts,
    Accounts,
    Call([u8; 4]),
    Send([u8; 4]),
    Receipt(B256),
}

#[derive(Default)]
struct Script {
    accounts: Vec<Address>,
    owner: Address,
    price: U256,
    available: U256,
    balances: HashMap<Address, U256>,
    calls: Vec<RpcCall>,
    sent: Vec<TransactionRequest>,
    request_accounts_error: Option<ChainError>,
    call_errors: HashMap<[u8; 4], ChainError>,
    send_error: Option<ChainError>,
    revert: bool,
    receipt_delay: usize,
    pending_polls: HashMap<B256, usize>,
}

/// Scripted wallet backed by a toy F20 contract.
///
/// Purchases and mints move the toy balances so reads after a write see
/// the new state, the same way the real contract behaves.
pub struct ScriptedWallet {
    script: Mutex<Script>,
}

impl ScriptedWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            script: Mutex::new(Script {
                accounts,
                price: SCALE,
                ..Script::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.lock().accounts = accounts;
    }

    pub fn set_owner(&self, owner: Address) {
        self.lock().owner = owner;
    }

    pub fn set_price(&self, price: U256) {
        self.lock().price = price;
    }

    pub fn set_available(&self, available: U256) {
        self.lock().available = available;
    }

    pub fn set_balance(&self, holder: Address, balance: U256) {
        self.lock().balances.insert(holder, balance);
    }

    pub fn fail_request_accounts(&self, error: ChainError) {
        self.lock().request_accounts_error = Some(error);
    }

    /// Makes every `eth_call` to the function with `selector` fail.
    pub fn fail_call(&self, selector: [u8; 4], error: ChainError) {
        self.lock().call_errors.insert(selector, error);
    }

    pub fn fail_send(&self, error: ChainError) {
        self.lock().send_error = Some(error);
    }

    pub fn revert_transactions(&self, revert: bool) {
        self.lock().revert = revert;
    }

    /// Number of receipt polls answered with "not mined yet" per transaction.
    pub fn delay_receipts(&self, polls: usize) {
        self.lock().receipt_delay = polls;
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.lock().calls.clone()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.lock().sent.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// How many `eth_call`s hit the function with `selector`.
    pub fn reads_of(&self, selector: [u8; 4]) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == RpcCall::Call(selector))
            .count()
    }

    pub fn available(&self) -> U256 {
        self.lock().available
    }

    pub fn price(&self) -> U256 {
        self.lock().price
    }

    pub fn balance(&self, holder: Address) -> U256 {
        self.lock().balances.get(&holder).copied().unwrap_or_default()
    }
}

fn selector_of(data: &[u8]) -> [u8; 4] {
    let mut selector = [0u8; 4];
    if data.len() >= 4 {
        selector.copy_from_slice(&data[..4]);
    }
    selector
}

fn word_arg(data: &[u8]) -> U256 {
    data.get(4..36).map(U256::from_be_slice).unwrap_or_default()
}

fn address_arg(data: &[u8]) -> Address {
    data.get(16..36).map(Address::from_slice).unwrap_or_default()
}

fn encode_word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

impl WalletProvider for ScriptedWallet {
    fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        let mut script = self.lock();
        script.calls.push(RpcCall::RequestAccounts);
        match script.request_accounts_error.clone() {
            Some(error) => Err(error),
            None => Ok(script.accounts.clone()),
        }
    }

    fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let mut script = self.lock();
        script.calls.push(RpcCall::Accounts);
        Ok(script.accounts.clone())
    }

    fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        let mut script = self.lock();
        let selector = selector_of(&request.data);
        script.calls.push(RpcCall::Call(selector));
        if let Some(error) = script.call_errors.get(&selector) {
            return Err(error.clone());
        }

        let output = if selector == IF20::getAvailablesTokensCall::SELECTOR {
            encode_word(script.available)
        } else if selector == IF20::priceCall::SELECTOR {
            encode_word(script.price)
        } else if selector == IF20::balanceOfCall::SELECTOR {
            let holder = address_arg(&request.data);
            encode_word(script.balances.get(&holder).copied().unwrap_or_default())
        } else if selector == IF20::ownerCall::SELECTOR {
            Bytes::from(script.owner.into_word().to_vec())
        } else {
            return Err(ChainError::Rpc {
                code: -32601,
                message: format!("unknown selector {selector:02x?}"),
            });
        };
        Ok(output)
    }

    fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ChainError> {
        let mut script = self.lock();
        let selector = selector_of(&request.data);
        script.calls.push(RpcCall::Send(selector));
        if let Some(error) = script.send_error.clone() {
            return Err(error);
        }

        script.sent.push(request.clone());
        let hash = B256::with_last_byte(script.sent.len() as u8);
        let delay = script.receipt_delay;
        script.pending_polls.insert(hash, delay);

        if !script.revert {
            let amount = word_arg(&request.data);
            if selector == IF20::buyF20Call::SELECTOR {
                script.available = script.available.saturating_sub(amount);
                let balance = script.balances.entry(request.from).or_default();
                *balance = balance.saturating_add(amount);
            } else if selector == IF20::mintF20Call::SELECTOR {
                script.available = script.available.saturating_add(amount);
            } else if selector == IF20::changePriceOfF20Call::SELECTOR {
                script.price = amount;
            }
        }
        Ok(hash)
    }

    fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError> {
        let mut script = self.lock();
        script.calls.push(RpcCall::Receipt(hash));
        let revert = script.revert;
        match script.pending_polls.get_mut(&hash) {
            None => Ok(None),
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Ok(None)
            }
            Some(_) => Ok(Some(TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(1u64)),
                status: Some(U64::from(if revert { 0u64 } else { 1u64 })),
            })),
        }
    }
}
