//! Editable inputs of a handout: the server [`Config`] and the accounts.

mod account;
mod config;

pub use account::{Account, AccountField, AccountList};
pub use config::{Config, PortId};
