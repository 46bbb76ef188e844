//! Use-case services over the repositories.

pub mod ledger_service;

pub use ledger_service::{Ledger, LedgerError, LedgerResult};
