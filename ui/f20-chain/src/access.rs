//! Connecting to the wallet and binding contract handles to its signer.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use tracing::{debug, info, warn};

use crate::error::ChainError;
use crate::provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
use crate::schema::IF20;

/// An attached wallet account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub address: Address,
}

/// Entry point the views hold: the injected provider plus the fixed
/// contract it is pointed at.
#[derive(Clone)]
pub struct ChainAccess {
    provider: Arc<dyn WalletProvider>,
    contract: Address,
    poll_interval: Duration,
}

impl ChainAccess {
    pub fn new(provider: Arc<dyn WalletProvider>, contract: Address, poll_interval: Duration) -> Self {
        Self {
            provider,
            contract,
            poll_interval,
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Requests account access. Every call goes back to the wallet, which
    /// decides whether to prompt again.
    pub fn connect(&self) -> Result<Connection, ChainError> {
        let accounts = self.provider.request_accounts()?;
        let address = accounts.first().copied().ok_or(ChainError::NoSigner)?;
        info!(%address, "wallet connected");
        Ok(Connection { address })
    }

    /// Binds a handle to whichever account the wallet exposes right now.
    ///
    /// Not memoized: the user may switch accounts between operations.
    pub fn contract(&self, connection: &Connection) -> Result<F20Contract, ChainError> {
        let signer = self
            .provider
            .accounts()?
            .first()
            .copied()
            .ok_or(ChainError::NoSigner)?;
        if signer != connection.address {
            debug!(connected = %connection.address, %signer, "wallet account changed since connect");
        }
        Ok(F20Contract {
            provider: Arc::clone(&self.provider),
            address: self.contract,
            signer,
            poll_interval: self.poll_interval,
        })
    }
}

/// Callable F20 contract bound to one signer.
pub struct F20Contract {
    provider: Arc<dyn WalletProvider>,
    address: Address,
    signer: Address,
    poll_interval: Duration,
}

impl F20Contract {
    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn available_tokens(&self) -> Result<U256, ChainError> {
        Ok(self.read(IF20::getAvailablesTokensCall {})?.available)
    }

    pub fn price(&self) -> Result<U256, ChainError> {
        Ok(self.read(IF20::priceCall {})?.price)
    }

    pub fn balance_of(&self, holder: Address) -> Result<U256, ChainError> {
        Ok(self.read(IF20::balanceOfCall { holder })?.balance)
    }

    pub fn owner(&self) -> Result<Address, ChainError> {
        Ok(self.read(IF20::ownerCall {})?.owner)
    }

    /// Payable purchase; `value` must be the full cost in native wei.
    pub fn buy(&self, amount: U256, value: U256) -> Result<PendingTx, ChainError> {
        self.send(IF20::buyF20Call { amount }, Some(value))
    }

    pub fn mint(&self, amount: U256) -> Result<PendingTx, ChainError> {
        self.send(IF20::mintF20Call { amount }, None)
    }

    pub fn change_price(&self, new_price: U256) -> Result<PendingTx, ChainError> {
        self.send(IF20::changePriceOfF20Call { newPrice: new_price }, None)
    }

    pub fn withdraw(&self) -> Result<PendingTx, ChainError> {
        self.send(IF20::withdrawCall {}, None)
    }

    fn read<C: SolCall>(&self, call: C) -> Result<C::Return, ChainError> {
        let request = CallRequest {
            from: Some(self.signer),
            to: self.address,
            data: call.abi_encode().into(),
        };
        let output = self.provider.call(&request)?;
        C::abi_decode_returns(&output, true)
            .map_err(|e| ChainError::Decode(format!("{}: {e}", C::SIGNATURE)))
    }

    fn send<C: SolCall>(&self, call: C, value: Option<U256>) -> Result<PendingTx, ChainError> {
        let request = TransactionRequest {
            from: self.signer,
            to: self.address,
            data: call.abi_encode().into(),
            value,
        };
        let hash = self.provider.send_transaction(&request)?;
        info!(%hash, function = C::SIGNATURE, "transaction submitted");
        Ok(PendingTx {
            provider: Arc::clone(&self.provider),
            hash,
            poll_interval: self.poll_interval,
        })
    }
}

/// A submitted transaction that has not been seen in a block yet.
#[must_use = "a submitted transaction is only final once waited on"]
pub struct PendingTx {
    provider: Arc<dyn WalletProvider>,
    hash: B256,
    poll_interval: Duration,
}

impl PendingTx {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Blocks until the transaction is mined. There is no deadline; a
    /// transaction the network never includes keeps this waiting.
    pub fn wait(self) -> Result<TransactionReceipt, ChainError> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(self.hash)? {
                if !receipt.succeeded() {
                    warn!(hash = %self.hash, "transaction reverted");
                    return Err(ChainError::Reverted(self.hash));
                }
                info!(hash = %self.hash, block = ?receipt.block_number, "transaction confirmed");
                return Ok(receipt);
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}
