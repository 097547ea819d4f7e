//! Fixed interface of the F20 token-sale contract.
//!
//! Every quantity and price crossing this interface is an 18-decimal
//! fixed-point `uint256`; see [`crate::units`].

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// Sepolia deployment the front-end talks to unless configured otherwise.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("126630e0Bf6f76a26D5D228C285E708941E64d0b");

sol! {
    interface IF20 {
        function getAvailablesTokens() external view returns (uint256 available);
        function price() external view returns (uint256 price);
        function balanceOf(address holder) external view returns (uint256 balance);
        function owner() external view returns (address owner);

        function buyF20(uint256 amount) external payable;
        function mintF20(uint256 amount) external;
        function changePriceOfF20(uint256 newPrice) external;
        function withdraw() external;
    }
}
