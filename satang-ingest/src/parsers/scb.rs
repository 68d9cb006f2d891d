//! SCB (Siam Commercial Bank) header extraction and fixed-column line
//! grammar.
//!
//! SCB exports are already column-aligned, so a single anchored pattern
//! covers the whole line instead of the free-text heuristics the other
//! issuers need:
//!   DD/MM/YY HH:MM X1|X2 CHANNEL AMOUNT BALANCE DESCRIPTION
//!   01/04/24 19:20 X2 ENET 3,470.00 42,072.00 PromptPay x9119 ...
//! X1 marks a credit (deposit), X2 a debit (withdrawal).

use rust_decimal::Decimal;

use satang_core::Transaction;

use crate::header::HeaderInfo;
use crate::scan;

/// Extract account number, holder name, period and branch from header
/// text. SCB account numbers group as XXX-XXXXXX-X.
pub fn extract_header(text: &str) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    // Standalone branch line, e.g. "UDON THANI BRANCH". The bank's own
    // header line is upper-case too, so anything naming the bank is
    // rejected rather than retried.
    info.branch = scan::capture1(text, r"(?m)^([A-Z][A-Z ]+BRANCH)$")
        .filter(|b| !b.contains("COMMERCIAL"))
        .map(|b| b.trim().to_string());

    info.account_number = scan::capture1(text, r"(\d{3}-\d{6}-\d)");
    info.currency = Some("THB".to_string());

    if let Some((start, end)) =
        scan::capture2(text, r"(\d{2}/\d{2}/\d{4})\s*-\s*(\d{2}/\d{2}/\d{4})")
    {
        info.period_start = scan::parse_dmy_full(&start);
        info.period_end = scan::parse_dmy_full(&end);
    }

    // Thai honorific + name printed immediately before the account number.
    info.account_name = scan::capture1(
        text,
        r"((?:นาย|นาง|นางสาว)\s+[ก-๙\s]+?)\s+\d{3}-\d{6}-\d",
    )
    .map(|n| n.trim().to_string());

    info
}

/// Opening balance from the BALANCE BROUGHT FORWARD row; closing balance
/// from the balance column of the last line matching the fixed grammar.
pub fn extract_balances(text: &str) -> (Option<Decimal>, Option<Decimal>) {
    let opening = scan::capture1(text, r"BALANCE BROUGHT FORWARD\)?\s*([\d,]+\.\d{2})")
        .and_then(|a| scan::parse_amount(&a));

    let mut closing = None;
    if let Some(re) = scan::regex(
        r"(?m)^\d{2}/\d{2}/\d{2}\s+\d{2}:\d{2}\s+X[12]\s+\w+\s+[\d,]+\.\d{2}\s+([\d,]+\.\d{2})",
    ) {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                closing = scan::parse_amount(m.as_str());
            }
        }
    }

    (opening, closing)
}

/// Parse one SCB transaction line with the anchored column grammar;
/// `None` for anything that does not match it exactly.
pub fn parse_line(line: &str) -> Option<Transaction> {
    let re = scan::regex(concat!(
        r"^(?P<date>\d{2}/\d{2}/\d{2})\s+",
        r"(?P<time>\d{2}:\d{2})\s+",
        r"(?P<code>X[12])\s+",
        r"(?P<channel>\w+)\s+",
        r"(?P<amount>[\d,]+\.\d{2})\s+",
        r"(?P<balance>[\d,]+\.\d{2})\s+",
        r"(?P<desc>.+)$",
    ))?;
    let caps = re.captures(line)?;

    let date = scan::parse_dmy_short(&caps["date"], '/')?;
    let time = scan::parse_clock(&caps["time"]);
    let amount = scan::parse_amount(&caps["amount"]);
    let balance = scan::parse_amount(&caps["balance"])?;

    // X1 = credit, X2 = debit
    let (withdrawal, deposit) = match &caps["code"] {
        "X1" => (None, amount),
        _ => (amount, None),
    };

    Some(Transaction {
        date,
        time,
        description: caps["desc"].trim().to_string(),
        channel: Some(caps["channel"].to_string()),
        withdrawal,
        deposit,
        balance,
        reference: None,
        check_number: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_debit_line() {
        let txn =
            parse_line("01/04/24 19:20 X2 ENET 3,470.00 42,072.00 PromptPay x9119 นาย วรพงษ์")
                .unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(txn.time, NaiveTime::from_hms_opt(19, 20, 0));
        assert_eq!(txn.withdrawal, Some(dec("3470.00")));
        assert_eq!(txn.deposit, None);
        assert_eq!(txn.balance, dec("42072.00"));
        assert_eq!(txn.channel.as_deref(), Some("ENET"));
        assert_eq!(txn.description, "PromptPay x9119 นาย วรพงษ์");
    }

    #[test]
    fn test_parse_credit_line() {
        let txn = parse_line("02/04/24 08:05 X1 CDM 5,000.00 47,072.00 Cash deposit").unwrap();
        assert_eq!(txn.deposit, Some(dec("5000.00")));
        assert_eq!(txn.withdrawal, None);
        assert_eq!(txn.balance, dec("47072.00"));
    }

    #[test]
    fn test_rejects_free_text_lines() {
        // Missing the X-code column: not the SCB grammar.
        assert!(parse_line("01/04/24 19:20 ENET 3,470.00 42,072.00 PromptPay").is_none());
        assert!(parse_line("ยอดเงินคงเหลือยกมา (BALANCE BROUGHT FORWARD) 45,542.00").is_none());
    }

    #[test]
    fn test_header_extraction() {
        let text = "THE SIAM COMMERCIAL BANK\nUDON THANI BRANCH\nนาย ณัฐชนน นินยวี 423-044803-0\n01/04/2024 - 30/04/2024\n";
        let info = extract_header(text);
        assert_eq!(info.branch.as_deref(), Some("UDON THANI BRANCH"));
        assert_eq!(info.account_number.as_deref(), Some("423-044803-0"));
        assert_eq!(info.account_name.as_deref(), Some("นาย ณัฐชนน นินยวี"));
        assert_eq!(info.period_start, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(info.period_end, NaiveDate::from_ymd_opt(2024, 4, 30));
        assert_eq!(info.currency.as_deref(), Some("THB"));
    }

    #[test]
    fn test_branch_rejected_when_it_names_the_bank() {
        let info = extract_header("THE SIAM COMMERCIAL BRANCH\n");
        assert_eq!(info.branch, None);
    }

    #[test]
    fn test_balances() {
        let text = "ยอดเงินคงเหลือยกมา (BALANCE BROUGHT FORWARD) 45,542.00\n01/04/24 19:20 X2 ENET 3,470.00 42,072.00 PromptPay\n02/04/24 08:05 X1 CDM 5,000.00 47,072.00 Cash deposit\n";
        let (opening, closing) = extract_balances(text);
        assert_eq!(opening, Some(dec("45542.00")));
        assert_eq!(closing, Some(dec("47072.00")));
    }
}
