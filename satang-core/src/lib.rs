//! satang-core: shared data model and keyword lexicons for Thai bank
//! statement parsing.

pub mod keywords;
pub mod models;

pub use models::{Account, Bank, Language, Statement, Transaction};
