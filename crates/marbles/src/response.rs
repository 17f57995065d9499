use crate::error::Error;
use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// Response
/// Envelope handed back to the invoking host. A failure keeps its
/// structured `error` next to the plain `message`.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
    pub error: Option<Error>,
}

impl Response {
    pub const OK: u16 = 200;
    pub const ERROR: u16 = 500;

    #[must_use]
    pub const fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
            error: None,
        }
    }

    #[must_use]
    pub fn error(err: Error) -> Self {
        Self {
            status: Self::ERROR,
            message: err.message.clone(),
            payload: Vec::new(),
            error: Some(err),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<Result<Vec<u8>, Error>> for Response {
    fn from(result: Result<Vec<u8>, Error>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::error(err),
        }
    }
}
