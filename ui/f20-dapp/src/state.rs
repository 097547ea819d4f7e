//! Shared view-state types for the sale and admin pages.

use std::sync::Arc;

use dioxus::prelude::Signal;
use f20_chain::{ChainAccess, ChainError, Connection};

/// Chain access handed to every page through the Dioxus context.
pub type SharedChain = Arc<ChainAccess>;

/// Last connection outcome of whichever page connected, shown in the top bar.
pub type WalletStatus = Signal<ConnectionStatus>;

/// Where a page is in attaching a wallet.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected(Connection),
    /// No wallet answered. Nothing inside the app can fix this.
    WalletMissing,
    /// Recoverable failure, e.g. the user dismissed the prompt.
    Error(String),
}

impl ConnectionStatus {
    pub fn from_error(error: &ChainError) -> Self {
        if error.is_fatal() {
            Self::WalletMissing
        } else {
            Self::Error(error.to_string())
        }
    }

    pub fn connection(&self) -> Option<Connection> {
        match self {
            Self::Connected(connection) => Some(*connection),
            _ => None,
        }
    }

    pub fn can_connect(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Error(_))
    }

    /// Dot class and short label for the status indicators.
    pub fn indicator(&self) -> (&'static str, &'static str) {
        match self {
            Self::Disconnected => ("dot disconnected", "Disconnected"),
            Self::Connecting => ("dot connecting", "Connecting"),
            Self::Connected(_) => ("dot connected", "Connected"),
            Self::WalletMissing => ("dot error", "No wallet"),
            Self::Error(_) => ("dot error", "Error"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperationStatus {
    #[default]
    Idle,
    Submitting,
    Confirmed,
    Failed,
}

/// One write action's progress plus the message shown under it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingOperation {
    pub status: OperationStatus,
    pub message: Option<String>,
}

impl PendingOperation {
    pub fn is_busy(&self) -> bool {
        self.status == OperationStatus::Submitting
    }

    pub fn begin(&mut self) {
        self.status = OperationStatus::Submitting;
        self.message = None;
    }

    pub fn confirm(&mut self, message: &str) {
        self.status = OperationStatus::Confirmed;
        self.message = Some(message.to_string());
    }

    pub fn fail(&mut self, message: &str) {
        self.status = OperationStatus::Failed;
        self.message = Some(message.to_string());
    }

    /// Input refused before anything was sent.
    pub fn reject(&mut self, message: &str) {
        self.status = OperationStatus::Idle;
        self.message = Some(message.to_string());
    }

    pub fn is_failure(&self) -> bool {
        self.status == OperationStatus::Failed
    }
}
