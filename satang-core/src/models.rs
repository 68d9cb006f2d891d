//! Data model: normalized transactions, per-document statements, and the
//! consolidated account aggregate.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Issuing bank of a statement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    #[serde(rename = "kbank")]
    Kbank,
    #[serde(rename = "bbl")]
    Bbl,
    #[serde(rename = "scb")]
    Scb,
}

impl Bank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Kbank => "kbank",
            Bank::Bbl => "bbl",
            Bank::Scb => "scb",
        }
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement language. Detection only ever yields `En` or `Th`; `Unknown`
/// is the state of a statement that has not been through detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "th")]
    Th,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Th => "th",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bank transaction.
///
/// Two transactions with the same date, time, trimmed description and
/// withdrawal/deposit amounts describe the same real-world event; that
/// tuple is the deduplication key used during consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub description: String,
    /// Channel label: K PLUS, EDC, ATM, mPhone, Gtway, BR0369, etc.
    pub channel: Option<String>,
    pub withdrawal: Option<Decimal>,
    pub deposit: Option<Decimal>,
    /// Running balance after this transaction. Always present.
    pub balance: Decimal,
    pub reference: Option<String>,
    /// BBL cheque number, where the statement carries one.
    pub check_number: Option<String>,
}

impl Transaction {
    /// Identity key for deduplication across overlapping statements.
    pub fn dedup_key(&self) -> (NaiveDate, Option<NaiveTime>, String, Option<Decimal>, Option<Decimal>) {
        (
            self.date,
            self.time,
            self.description.trim().to_string(),
            self.withdrawal,
            self.deposit,
        )
    }

    /// Chronological sort key; timeless transactions sort to midnight.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// One parsed statement document: account header plus its transactions in
/// input order. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Issuer-formatted account number, e.g. "369-4-58959-3". Primary
    /// grouping key for consolidation.
    pub account_number: String,
    pub account_name: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub transactions: Vec<Transaction>,
    /// Identifier of the source document this statement came from.
    pub source: String,
    pub language: Language,
    pub bank: Bank,
    /// e.g. "0369 KUMPHAWAPI BRANCH" (BBL/SCB only).
    pub branch: Option<String>,
    pub currency: String,
}

/// Consolidated view of one account across multiple statements: the
/// selected non-redundant statement subset and the deduplicated,
/// chronologically sorted transaction history.
///
/// Accounts are derived fresh from a statement batch on every
/// consolidation run; they are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: String,
    pub account_name: Option<String>,
    pub statements: Vec<Statement>,
    pub transactions: Vec<Transaction>,
}
