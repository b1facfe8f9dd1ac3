#[macro_use]
extern crate napi_derive;

pub mod bundle_api;
pub mod policy_api;

#[napi]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
