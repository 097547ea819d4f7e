use alloy_primitives::B256;
use thiserror::Error;

use crate::units::UnitsError;

/// JSON-RPC error code a wallet returns when the user dismisses a prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Everything that can go wrong between the views and the contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChainError {
    #[error("no wallet found, install or start a wallet and try again")]
    NoWalletExtension,

    #[error("the wallet rejected the request")]
    UserRejected,

    #[error("the wallet exposes no account to sign with")]
    NoSigner,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Units(#[from] UnitsError),
}

impl ChainError {
    /// Maps a JSON-RPC error object onto the taxonomy the views understand.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            Self::UserRejected
        } else {
            Self::Rpc {
                code,
                message: message.into(),
            }
        }
    }

    /// True when nothing the user does inside the app can fix it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoWalletExtension)
    }
}
