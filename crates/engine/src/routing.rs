//! Execution-path selection for deposits and withdrawals.
//!
//! Resolution is pure: it looks only at the vault, the token, the chain profile and the
//! configured address book. Nothing here touches the network.

use alloy_primitives::Address;

use crate::config::{AddressBook, ChainProfile};
use crate::error::{EngineError, Result};
use crate::types::{is_native_token, VaultStatic, ZapProtocol};

/// Which contract or service executes a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// The vault contract itself.
    Vault(Address),
    /// The partner tracking proxy, forwarding to the vault.
    PartnerProxy(Address),
    /// A zap contract from the address book, fed by the quote service.
    ZapContract {
        protocol: ZapProtocol,
        address: Address,
    },
    /// The chain's routing aggregator, fed by the quote service.
    Router(Address),
}

impl RouteTarget {
    pub fn address(&self) -> Address {
        match *self {
            RouteTarget::Vault(address)
            | RouteTarget::PartnerProxy(address)
            | RouteTarget::ZapContract { address, .. }
            | RouteTarget::Router(address) => address,
        }
    }
}

/// The outcome of route resolution. Lives for a single deposit or withdraw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    pub target: RouteTarget,
    pub requires_slippage: bool,
    /// Protocol to request a quote for, on zap routes.
    pub zap_protocol: Option<ZapProtocol>,
}

impl RouteDecision {
    fn direct(target: RouteTarget) -> Self {
        Self {
            target,
            requires_slippage: false,
            zap_protocol: None,
        }
    }

    fn zap(target: RouteTarget, protocol: ZapProtocol) -> Self {
        Self {
            target,
            requires_slippage: true,
            zap_protocol: Some(protocol),
        }
    }

    pub fn target_address(&self) -> Address {
        self.target.address()
    }

    pub fn is_zap(&self) -> bool {
        self.zap_protocol.is_some()
    }

    /// Check a caller-provided slippage tolerance against this route.
    ///
    /// Zap routes need a fraction strictly between 0 and 1. Direct routes ignore it.
    pub fn validate_slippage(&self, slippage: Option<f64>) -> Result<Option<f64>> {
        if !self.requires_slippage {
            return Ok(slippage);
        }
        match slippage {
            None => Err(EngineError::MissingSlippage),
            Some(value) if value.is_finite() && value > 0.0 && value < 1.0 => Ok(Some(value)),
            Some(value) => Err(EngineError::InvalidSlippage(value)),
        }
    }
}

/// Resolves routes for one chain.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    profile: ChainProfile,
    addresses: AddressBook,
    pickle_jars: Vec<Address>,
}

impl RouteResolver {
    pub fn new(profile: ChainProfile, addresses: AddressBook, pickle_jars: Vec<Address>) -> Self {
        Self {
            profile,
            addresses,
            pickle_jars,
        }
    }

    /// Route for depositing `token` into `vault`.
    ///
    /// Native deposits always go to the vault. Jar membership and partner eligibility are
    /// checked before falling back to a generic zap.
    pub fn resolve_deposit(
        &self,
        vault: &VaultStatic,
        token: Address,
        partner_eligible: bool,
    ) -> Result<RouteDecision> {
        if is_native_token(token) {
            return Ok(RouteDecision::direct(RouteTarget::Vault(vault.address)));
        }

        if self.pickle_jars.contains(&vault.address) {
            let address = self.addresses.zap_contract(ZapProtocol::PickleZapIn)?;
            return Ok(RouteDecision::zap(
                RouteTarget::ZapContract {
                    protocol: ZapProtocol::PickleZapIn,
                    address,
                },
                ZapProtocol::PickleZapIn,
            ));
        }

        if token == vault.token {
            return if partner_eligible {
                let proxy = self.addresses.partner_proxy()?;
                Ok(RouteDecision::direct(RouteTarget::PartnerProxy(proxy)))
            } else {
                Ok(RouteDecision::direct(RouteTarget::Vault(vault.address)))
            };
        }

        self.zap_route(ZapProtocol::ZapIn)
    }

    /// Route for withdrawing `vault` shares into `token`.
    pub fn resolve_withdraw(&self, vault: &VaultStatic, token: Address) -> Result<RouteDecision> {
        if token == vault.token {
            return Ok(RouteDecision::direct(RouteTarget::Vault(vault.address)));
        }
        self.zap_route(ZapProtocol::ZapOut)
    }

    fn zap_route(&self, protocol: ZapProtocol) -> Result<RouteDecision> {
        if let Some(router) = self.profile.router() {
            return Ok(RouteDecision::zap(
                RouteTarget::Router(router),
                ZapProtocol::Router,
            ));
        }
        let address = self.addresses.zap_contract(protocol)?;
        Ok(RouteDecision::zap(
            RouteTarget::ZapContract { protocol, address },
            protocol,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_routes_ignore_slippage() {
        let decision = RouteDecision::direct(RouteTarget::Vault(Address::repeat_byte(1)));
        assert_eq!(decision.validate_slippage(None).unwrap(), None);
        assert!(!decision.is_zap());
    }

    #[test]
    fn test_zap_slippage_bounds() {
        let decision = RouteDecision::zap(RouteTarget::Router(Address::repeat_byte(1)), ZapProtocol::Router);

        assert!(matches!(decision.validate_slippage(None), Err(EngineError::MissingSlippage)));
        assert!(matches!(
            decision.validate_slippage(Some(0.0)),
            Err(EngineError::InvalidSlippage(_))
        ));
        assert!(matches!(
            decision.validate_slippage(Some(1.5)),
            Err(EngineError::InvalidSlippage(_))
        ));
        assert!(matches!(
            decision.validate_slippage(Some(f64::NAN)),
            Err(EngineError::InvalidSlippage(_))
        ));
        assert_eq!(decision.validate_slippage(Some(0.01)).unwrap(), Some(0.01));
    }

    #[test]
    fn test_target_address() {
        let address = Address::repeat_byte(9);
        let target = RouteTarget::ZapContract {
            protocol: ZapProtocol::ZapOut,
            address,
        };
        assert_eq!(target.address(), address);
    }
}
