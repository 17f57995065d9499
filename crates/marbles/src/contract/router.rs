use crate::{config::ContractConfig, contract::args::Args};
use marbles_core::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    ledger::Ledger,
};
use std::collections::BTreeMap;

///
/// Call
/// Everything one handler sees: the transaction's ledger view, its
/// arguments, and the contract settings.
///

pub(crate) struct Call<'a, L> {
    pub(crate) ledger: &'a mut L,
    pub(crate) args: Args<'a>,
    pub(crate) config: &'a ContractConfig,
}

impl<L: Ledger> Call<'_, L> {
    pub(crate) fn ledger(&self) -> &L {
        self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut L {
        self.ledger
    }

    pub(crate) fn debug_log(&self, s: impl AsRef<str>) {
        if self.config.debug {
            println!("[debug] [{}] {}", self.ledger.tx_id(), s.as_ref());
        }
    }
}

pub(crate) type Handler<L> = fn(&mut Call<'_, L>) -> Result<Vec<u8>, InternalError>;

///
/// Router
/// Operation name to typed handler, validated as it is built.
///

pub(crate) struct Router<L> {
    routes: BTreeMap<&'static str, Handler<L>>,
}

impl<L: Ledger> Router<L> {
    /// Build a router; a name registered twice is rejected.
    pub(crate) fn new(routes: &[(&'static str, Handler<L>)]) -> Result<Self, InternalError> {
        let mut table = BTreeMap::new();

        for (name, handler) in routes {
            if name.is_empty() {
                return Err(InternalError::new(
                    ErrorClass::Internal,
                    ErrorOrigin::Dispatch,
                    "operation name must not be empty",
                ));
            }
            if table.insert(*name, *handler).is_some() {
                return Err(InternalError::new(
                    ErrorClass::Internal,
                    ErrorOrigin::Dispatch,
                    format!("operation '{name}' registered twice"),
                ));
            }
        }

        Ok(Self { routes: table })
    }

    /// Registered name and handler for `function`.
    pub(crate) fn resolve(&self, function: &str) -> Option<(&'static str, Handler<L>)> {
        self.routes
            .get_key_value(function)
            .map(|(name, handler)| (*name, *handler))
    }

    pub(crate) fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }
}
