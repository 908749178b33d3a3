//! Calldata builders for the contracts the engine talks to directly.

use alloy::primitives::{Address, U256};

use crate::erc20::IERC20;
use crate::partner::IPartnerTracker;
use crate::prepared_call::PreparedCall;
use crate::vault::IVault;

/// Deposit `amount` of the vault's underlying token, crediting shares to `recipient`.
///
/// `value` is the native amount attached to the call; it is zero for ERC-20 deposits.
pub fn vault_deposit(
    vault: Address,
    amount: U256,
    recipient: Address,
    value: U256,
) -> PreparedCall<IVault::depositCall> {
    let call = IVault::depositCall { amount, recipient };
    PreparedCall::new(vault, call, value)
}

/// Burn up to `max_shares` vault shares, sending the underlying token to `recipient`.
pub fn vault_withdraw(
    vault: Address,
    max_shares: U256,
    recipient: Address,
) -> PreparedCall<IVault::withdrawCall> {
    let call = IVault::withdrawCall {
        maxShares: max_shares,
        recipient,
    };
    PreparedCall::new(vault, call, U256::ZERO)
}

/// Deposit through the partner tracker so the deposit is attributed to `partner_id`.
pub fn partner_deposit(
    tracker: Address,
    vault: Address,
    partner_id: Address,
    amount: U256,
) -> PreparedCall<IPartnerTracker::depositCall> {
    let call = IPartnerTracker::depositCall {
        vault,
        partnerId: partner_id,
        amount,
    };
    PreparedCall::new(tracker, call, U256::ZERO)
}

/// Approve `spender` to pull `amount` of `token`.
pub fn approve(token: Address, spender: Address, amount: U256) -> PreparedCall<IERC20::approveCall> {
    let call = IERC20::approveCall { spender, amount };
    PreparedCall::new(token, call, U256::ZERO)
}
