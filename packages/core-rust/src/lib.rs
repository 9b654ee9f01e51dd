//! `opgroups` core: dynamic values and call argument bundles shared by the
//! operation engine and its callers.

pub mod args;
pub mod types;

pub use args::CallArgs;
pub use types::Value;
