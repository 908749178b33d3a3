//! Prepared call types for deferred transaction execution.
//!
//! A `PreparedCall` is a typed contract call bound to its target and the native value it
//! carries. It is built locally without touching the network and later encoded into the
//! raw `to`/`data`/`value` triple a signer submits.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

/// A typed call that has been constructed but not yet sent.
///
/// # Example
///
/// ```rust,ignore
/// let call = calls::vault_deposit(vault, amount, recipient, U256::ZERO);
/// let (to, data, value) = call.encode();
/// ```
#[derive(Debug, Clone)]
pub struct PreparedCall<C: SolCall> {
    to: Address,
    call: C,
    value: U256,
}

impl<C: SolCall> PreparedCall<C> {
    /// Create a new prepared call.
    pub fn new(to: Address, call: C, value: U256) -> Self {
        Self { to, call, value }
    }

    /// Consumes self and returns `(address, call)`.
    pub fn prepare(self) -> (Address, C) {
        (self.to, self.call)
    }

    /// Returns the target address for this call.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the native value to send with this call.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// ABI-encoded calldata, selector included.
    pub fn calldata(&self) -> Bytes {
        Bytes::from(self.call.abi_encode())
    }

    /// Consumes self and returns the raw `(to, data, value)` triple.
    pub fn encode(self) -> (Address, Bytes, U256) {
        let data = self.calldata();
        (self.to, data, self.value)
    }
}
