//! satang-ledger: consolidation of parsed statements into per-account
//! histories, plus JSON/CSV export writers.

pub mod consolidate;
pub mod export;

pub use consolidate::{
    BalanceIssue, consolidate, deduplicate_transactions, group_by_account, merge_transactions,
    select_statements, validate_balance_continuity, validate_transaction_continuity,
};
pub use export::{export_csv_dir, write_account_csv, write_json};
