//! parley-core — configuration, command dispatch, and the shared client
//! counter. The daemon crate depends on this one.

pub mod config;
pub mod counter;
pub mod dispatch;

pub use counter::{ClientCounter, ClientGuard};
pub use dispatch::{dispatch, Outcome};
