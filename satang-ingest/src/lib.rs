//! satang-ingest: bank/language detection and per-issuer statement text
//! parsers (KBank, BBL, SCB).

pub mod detect;
pub mod document;
pub mod header;
pub mod scan;

pub mod parsers {
    pub mod bbl;
    pub mod kbank;
    pub mod scb;
}

pub use document::parse_document;
pub use header::HeaderInfo;
