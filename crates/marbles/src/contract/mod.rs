//! Invocation dispatch.
//!
//! A host hands the contract one ledger view per transaction, a function
//! name and its string arguments. The contract resolves the name against a
//! table built when the contract is constructed and runs the typed handler.

mod args;
mod handlers;
mod router;


use crate::{
    config::ContractConfig,
    contract::{args::Args, router::Call, router::Router},
    error::Error,
    response::Response,
};
use marbles_core::{error::InternalError, ledger::Ledger, obs::Span};

/// Operation label recorded for names with no handler.
pub const UNKNOWN_OPERATION: &str = "unknown";

///
/// Contract
///

pub struct Contract<L: Ledger> {
    router: Router<L>,
    config: ContractConfig,
}

impl<L: Ledger> Contract<L> {
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ContractConfig::default())
    }

    pub fn with_config(config: ContractConfig) -> Result<Self, Error> {
        config.validate()?;
        let router = Router::new(&handlers::routes::<L>())?;

        Ok(Self { router, config })
    }

    #[must_use]
    pub const fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Names of every registered operation, sorted.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.router.operations()
    }

    /// Bootstrap hook; touches no state.
    #[must_use]
    pub fn init(&self, ledger: &L) -> Response {
        self.debug_log(format!("[{}] init", ledger.tx_id()));

        Response::success(Vec::new())
    }

    /// Run `function` against `ledger`.
    ///
    /// On failure the host must discard the transaction's write set.
    pub fn invoke(&self, ledger: &mut L, function: &str, args: &[&str]) -> Result<Vec<u8>, Error> {
        let Some((operation, handler)) = self.router.resolve(function) else {
            let _span = Span::new(UNKNOWN_OPERATION);
            self.debug_log(format!("[{}] unknown function {function}", ledger.tx_id()));

            return Err(InternalError::unknown_operation(function).into());
        };

        let mut span = Span::new(operation);
        self.debug_log(format!(
            "[{}] {operation} with {} args",
            ledger.tx_id(),
            args.len()
        ));

        let mut call = Call {
            ledger,
            args: Args::new(operation, args),
            config: &self.config,
        };

        match handler(&mut call) {
            Ok(payload) => {
                span.succeed();
                call.debug_log(format!("{operation} ok, {} bytes", payload.len()));

                Ok(payload)
            }
            Err(err) => {
                call.debug_log(format!("{operation} failed: {}", err.display_with_class()));

                Err(err.into())
            }
        }
    }

    /// `invoke`, wrapped in the host response envelope.
    pub fn handle(&self, ledger: &mut L, function: &str, args: &[&str]) -> Response {
        self.invoke(ledger, function, args).into()
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.config.debug {
            println!("[debug] {}", s.as_ref());
        }
    }
}
