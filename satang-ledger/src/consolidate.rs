//! Consolidation: group statements by account, select a non-redundant
//! subset, validate balance continuity, and merge transactions.
//!
//! The whole pipeline is a pure recomputation over its input batch:
//! feeding the same statements in again produces the same accounts, and
//! previously returned accounts are never mutated.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use satang_core::{Account, Language, Statement, Transaction};

/// Uncovered-days fraction below which a candidate statement is treated
/// as a near-duplicate re-submission and skipped.
const MIN_NEW_COVERAGE: f64 = 0.1;

/// Two satang of rounding slack before a balance mismatch counts as a
/// discontinuity.
fn balance_tolerance() -> Decimal {
    Decimal::new(2, 2)
}

/// A balance-continuity mismatch between consecutive statements. A
/// diagnostic, not an error: consolidation always completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceIssue {
    pub statement: Statement,
    pub expected_opening: Decimal,
    pub actual_opening: Decimal,
    pub prev_statement: Option<Statement>,
}

/// Partition a batch by account number. The BTreeMap keeps account
/// iteration (and therefore all downstream output) deterministic.
pub fn group_by_account(statements: &[Statement]) -> BTreeMap<String, Vec<Statement>> {
    let mut groups: BTreeMap<String, Vec<Statement>> = BTreeMap::new();
    for stmt in statements {
        groups
            .entry(stmt.account_number.clone())
            .or_default()
            .push(stmt.clone());
    }
    groups
}

/// Select a non-redundant statement subset for one account.
///
/// Candidates are walked earliest-start first, with longer periods and
/// the preferred language ahead of their rivals. A candidate adding no
/// new calendar days is dropped outright; once anything is selected, a
/// candidate adding under 10% new days is dropped too — that shape is a
/// near-duplicate re-submission of the same period, usually in the other
/// language. The survivors come back sorted by period start.
pub fn select_statements(statements: &[Statement], preferred: Language) -> Vec<Statement> {
    let mut ordered: Vec<&Statement> = statements.iter().collect();
    ordered.sort_by_key(|s| {
        let length = (s.period_end - s.period_start).num_days();
        let lang_rank = if s.language == preferred { 0 } else { 1 };
        (s.period_start, -length, lang_rank)
    });

    let mut selected: Vec<Statement> = Vec::new();
    let mut covered: HashSet<NaiveDate> = HashSet::new();

    for stmt in ordered {
        let days = period_days(stmt);
        let uncovered = days.iter().filter(|d| !covered.contains(d)).count();
        if uncovered == 0 {
            continue;
        }
        let new_coverage = uncovered as f64 / days.len() as f64;
        if new_coverage < MIN_NEW_COVERAGE && !selected.is_empty() {
            continue;
        }
        covered.extend(days);
        selected.push(stmt.clone());
    }

    selected.sort_by_key(|s| s.period_start);
    selected
}

/// Every calendar day of a statement's inclusive period. Empty when the
/// period bounds are inverted.
fn period_days(stmt: &Statement) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = stmt.period_start;
    while day <= stmt.period_end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Check closing-vs-opening continuity across a period-sorted statement
/// sequence. Pairs whose periods leave a gap are not comparable and are
/// skipped; differences within tolerance pass.
pub fn validate_balance_continuity(statements: &[Statement]) -> Vec<BalanceIssue> {
    let mut issues = Vec::new();

    for pair in statements.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        // Only periods that touch or overlap carry the balance forward.
        if curr.period_start > prev.period_end {
            continue;
        }

        let expected = prev.closing_balance;
        let actual = curr.opening_balance;
        if (expected - actual).abs() > balance_tolerance() {
            issues.push(BalanceIssue {
                statement: curr.clone(),
                expected_opening: expected,
                actual_opening: actual,
                prev_statement: Some(prev.clone()),
            });
        }
    }

    issues
}

/// Auxiliary integrity check over one chronologically sorted transaction
/// sequence: each balance must equal the previous balance plus deposit
/// minus withdrawal, within tolerance. Not part of the consolidation
/// pipeline.
pub fn validate_transaction_continuity(transactions: &[Transaction]) -> bool {
    for pair in transactions.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        let mut expected = prev.balance;
        if let Some(deposit) = curr.deposit {
            expected += deposit;
        }
        if let Some(withdrawal) = curr.withdrawal {
            expected -= withdrawal;
        }

        if (expected - curr.balance).abs() > balance_tolerance() {
            return false;
        }
    }
    true
}

/// Drop repeated transactions, keeping the first occurrence of each
/// dedup key.
pub fn deduplicate_transactions(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for txn in transactions {
        if seen.insert(txn.dedup_key()) {
            unique.push(txn);
        }
    }
    unique
}

/// Concatenate, deduplicate, and chronologically sort the transactions of
/// the given statements. The sort is stable, so same-instant transactions
/// keep statement order.
pub fn merge_transactions(statements: &[Statement]) -> Vec<Transaction> {
    let all: Vec<Transaction> = statements
        .iter()
        .flat_map(|s| s.transactions.iter().cloned())
        .collect();

    let mut unique = deduplicate_transactions(all);
    unique.sort_by_key(|t| t.sort_key());
    unique
}

/// Consolidate a statement batch into per-account histories.
///
/// Four stages per account: group, select, validate, merge. Balance
/// issues come back alongside the accounts and never abort the run.
pub fn consolidate(
    statements: &[Statement],
    preferred: Language,
) -> (Vec<Account>, Vec<BalanceIssue>) {
    let groups = group_by_account(statements);

    let mut accounts = Vec::new();
    let mut issues = Vec::new();

    for (account_number, group) in groups {
        let selected = select_statements(&group, preferred);

        issues.extend(validate_balance_continuity(&selected));

        let account_name = selected
            .iter()
            .filter_map(|s| s.account_name.as_deref())
            .find(|name| !name.is_empty())
            .map(str::to_string);

        let transactions = merge_transactions(&selected);

        accounts.push(Account {
            account_number,
            account_name,
            statements: selected,
            transactions,
        });
    }

    (accounts, issues)
}
