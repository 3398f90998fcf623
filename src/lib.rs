//! Shared bill ledger: members record expenses and settlements, and the
//! engine derives who owes what and a short list of transfers that clears it.
//!
//! The engine ([`ledger`], [`balance`], [`exchange`]) is pure and works on
//! the whole transaction log each time. [`routes`] and [`store`] host it
//! behind HTTP with MongoDB underneath.

pub mod balance;
pub mod config;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod member;
pub mod money;
pub mod routes;
pub mod schemas;
pub mod store;
pub mod summary;

pub use balance::{compute_balances, Balances};
pub use error::EngineError;
pub use exchange::{pairwise_debts, suggest_settlements};
pub use ledger::Ledger;
pub use schemas::{Expense, Group, Settlement, Transfer};
