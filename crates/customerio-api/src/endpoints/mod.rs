// Endpoint methods for each API surface.
//
// Each module adds inherent methods to `Client`: validate parameters, build
// the target URL, dispatch, decode. None of them talk HTTP directly.

pub mod account;
pub mod collections;
pub mod customers;
pub mod emails;
pub mod events;

use crate::error::Error;

/// Reject an empty required parameter before any request is built.
pub(crate) fn require(value: &str, param: &'static str) -> Result<(), Error> {
    if value.is_empty() {
        Err(Error::Param { param })
    } else {
        Ok(())
    }
}
