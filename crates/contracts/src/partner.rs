//! Partner tracker interface definitions.
//!
//! The tracker pulls the underlying token from the caller, records the deposit against a
//! partner id and forwards it to the vault.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPartnerTracker {
        function deposit(address vault, address partnerId, uint256 amount) external returns (uint256 shares);
    }
}
