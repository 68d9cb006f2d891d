//! Statement assembly: detect the issuer and language once, then run that
//! issuer's header extractor and line grammar over every page of
//! extracted text.

use chrono::Local;
use rust_decimal::Decimal;

use satang_core::{Bank, Statement, Transaction};

use crate::detect::{detect_bank, detect_language};
use crate::parsers::{bbl, kbank, scb};

/// Parse one document's extracted page text into a Statement.
///
/// Never fails: header fields that cannot be recovered fall back to
/// documented defaults ("UNKNOWN" account number, today's date for the
/// period bounds, zero balances), and lines matching no grammar are
/// silently dropped. Partial-line noise is expected in extracted PDF
/// text and is not reported.
pub fn parse_document(pages: &[String], source: &str) -> Statement {
    let full_text = pages.join("\n");
    let bank = detect_bank(&full_text);
    let language = detect_language(&full_text);

    // Header fields live on the first page; balances can sit anywhere.
    let header_text = pages.first().map(String::as_str).unwrap_or("");

    let (header, (opening, closing)) = match bank {
        Bank::Kbank => (
            kbank::extract_header(header_text),
            kbank::extract_balances(&full_text),
        ),
        Bank::Bbl => (
            bbl::extract_header(header_text),
            bbl::extract_balances(&full_text),
        ),
        Bank::Scb => (
            scb::extract_header(header_text),
            scb::extract_balances(&full_text),
        ),
    };

    let mut transactions: Vec<Transaction> = Vec::new();
    for page in pages {
        for line in page.lines() {
            let txn = match bank {
                Bank::Kbank => kbank::parse_line(line),
                Bank::Bbl => bbl::parse_line(line),
                Bank::Scb => scb::parse_line(line),
            };
            if let Some(txn) = txn {
                transactions.push(txn);
            }
        }
    }

    let today = Local::now().date_naive();

    Statement {
        account_number: header.account_number.unwrap_or_else(|| "UNKNOWN".to_string()),
        account_name: header.account_name,
        period_start: header.period_start.unwrap_or(today),
        period_end: header.period_end.unwrap_or(today),
        opening_balance: opening.unwrap_or(Decimal::ZERO),
        closing_balance: closing.unwrap_or(Decimal::ZERO),
        transactions,
        source: source.to_string(),
        language,
        bank,
        branch: header.branch,
        currency: header.currency.unwrap_or_else(|| "THB".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use satang_core::Language;

    fn pages(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[test]
    fn test_kbank_document_end_to_end() {
        let text = "\
KASIKORNBANK
Account Number 123-4-56789-0
Period 01/11/2025 - 30/11/2025
01-11-25 Beginning Balance 58,400.00
01-11-25 10:30 Transfer Withdrawal 8,400.00 50,000.00 K PLUS REF123456
02-11-25 14:02 Transfer Deposit 1,500.00 51,500.00 ATM
30-11-25 Ending Balance 51,500.00
";
        let stmt = parse_document(&pages(text), "kbank-nov.txt");

        assert_eq!(stmt.bank, Bank::Kbank);
        assert_eq!(stmt.language, Language::En);
        assert_eq!(stmt.account_number, "123-4-56789-0");
        assert_eq!(stmt.period_start, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(stmt.period_end, NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());
        assert_eq!(stmt.opening_balance, "58400.00".parse().unwrap());
        assert_eq!(stmt.closing_balance, "51500.00".parse().unwrap());
        assert_eq!(stmt.transactions.len(), 2);
        assert_eq!(stmt.source, "kbank-nov.txt");
        assert_eq!(stmt.currency, "THB");
    }

    #[test]
    fn test_scb_document_dispatches_on_markers() {
        let text = "\
THE SIAM COMMERCIAL BANK
UDON THANI BRANCH
นาย ณัฐชนน นินยวี 423-044803-0
01/04/2024 - 30/04/2024
ยอดเงินคงเหลือยกมา (BALANCE BROUGHT FORWARD) 45,542.00
01/04/24 19:20 X2 ENET 3,470.00 42,072.00 PromptPay x9119
";
        let stmt = parse_document(&pages(text), "scb-apr.txt");

        assert_eq!(stmt.bank, Bank::Scb);
        assert_eq!(stmt.account_number, "423-044803-0");
        assert_eq!(stmt.branch.as_deref(), Some("UDON THANI BRANCH"));
        assert_eq!(stmt.transactions.len(), 1);
        assert_eq!(stmt.transactions[0].withdrawal, Some("3470.00".parse().unwrap()));
    }

    #[test]
    fn test_headerless_document_gets_defaults() {
        let text = "01-11-25 10:30 Transfer Withdrawal 8,400.00 50,000.00 K PLUS\n";
        let stmt = parse_document(&pages(text), "mystery.txt");

        let today = Local::now().date_naive();
        assert_eq!(stmt.account_number, "UNKNOWN");
        assert_eq!(stmt.account_name, None);
        assert_eq!(stmt.period_start, today);
        assert_eq!(stmt.period_end, today);
        assert_eq!(stmt.opening_balance, Decimal::ZERO);
        // KBank closing balance needs an Ending Balance label; absent here.
        assert_eq!(stmt.closing_balance, Decimal::ZERO);
        assert_eq!(stmt.transactions.len(), 1);
    }

    #[test]
    fn test_transactions_collected_across_pages() {
        let p1 = "Bangkok Bank\nStatement Period 01/11/2025 - 06/11/2025\n01/11/25 B/F 831,099.60\n01/11/25 TRF TO OTH BK 48,755.00 782,344.60 mPhone\n".to_string();
        let p2 = "04/11/25 CASH DEP NBK 10,000.00 792,344.60 BR0369 KUMPHAWAPI\n".to_string();
        let stmt = parse_document(&[p1, p2], "bbl-nov.txt");

        assert_eq!(stmt.bank, Bank::Bbl);
        assert_eq!(stmt.transactions.len(), 2);
        assert_eq!(stmt.opening_balance, "831099.60".parse().unwrap());
        assert_eq!(stmt.closing_balance, "792344.60".parse().unwrap());
    }
}
