//! Bangkok Bank (BBL) header extraction and transaction-line grammar.
//!
//! Expected line shape:
//!   DD/MM/YY DESCRIPTION [CHQ.NO] [WITHDRAWAL] [DEPOSIT] BALANCE VIA
//!   01/11/25 TRF TO OTH BK 48,755.00 782,344.60 mPhone
//!   04/11/25 CASH DEP NBK 10,000.00 688,797.52 BR0369 KUMPHAWAPI
//!
//! BBL lines carry no clock time; the opening balance is the B/F
//! (Brought Forward) row.

use rust_decimal::Decimal;

use satang_core::Transaction;

use crate::header::HeaderInfo;
use crate::scan;

/// Extract account number, holder name, period, branch and currency from
/// header text. BBL is the only issuer printing an explicit currency
/// field.
pub fn extract_header(text: &str) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    // "0369 KUMPHAWAPI BRANCH" or "0369 สาขากุมภวาปี"
    info.branch = scan::capture1(text, r"(\d{4}\s+[A-Z\s]+BRANCH)")
        .or_else(|| scan::capture1(text, r"(\d{4}\s+สาขา[ก-๙\s]+)"))
        .map(|b| b.trim().to_string());

    info.account_number = scan::capture1(text, r"(\d{3}-\d-\d{5}-\d)");

    info.currency = scan::capture1(text, r"(?:Currency|สกุลเงิน/Currency)\s+([A-Z]{3})")
        .or_else(|| Some("THB".to_string()));

    if let Some((start, end)) = scan::capture2(
        text,
        r"(?:Statement Period|รอบรายการบัญชี\s*/\s*Statement Period)\s+(\d{2}/\d{2}/\d{4})\s*-\s*(\d{2}/\d{2}/\d{4})",
    ) {
        info.period_start = scan::parse_dmy_full(&start);
        info.period_end = scan::parse_dmy_full(&end);
    }

    // English "Name MR NUTCHANON ..." first, then the bilingual Thai label.
    // BBL honorifics are kept as printed; only KBank normalizes them.
    info.account_name = scan::capture1(
        text,
        r"Name\s+((?:MR|MRS|MS)\s+[A-Z\s]+?)(?:\s+เลขที่|Account|\n)",
    )
    .or_else(|| {
        scan::capture1(
            text,
            r"ชื่อ/Name\s+((?:นาย|นาง|นางสาว)\s+[ก-๙\s]+?)(?:\s+เลขที่)",
        )
    })
    .map(|n| n.trim().to_string());

    info
}

/// Opening balance from the B/F row; closing balance from the last amount
/// of the last transaction-shaped line.
pub fn extract_balances(text: &str) -> (Option<Decimal>, Option<Decimal>) {
    let opening =
        scan::capture1(text, r"B/F\s+([\d,]+\.\d{2})").and_then(|a| scan::parse_amount(&a));

    let mut closing = None;
    if let Some(date_re) = scan::regex(r"^\d{2}/\d{2}/\d{2}\s+") {
        for line in text.lines() {
            if date_re.is_match(line) && !line.contains("B/F") {
                if let Some(last) = scan::find_amounts(line).last() {
                    closing = Some(*last);
                }
            }
        }
    }

    (opening, closing)
}

/// Parse one BBL transaction line; `None` for non-transaction rows
/// (wrong shape, or the B/F carry-over).
pub fn parse_line(line: &str) -> Option<Transaction> {
    let date_token = scan::capture1(line, r"^(\d{2}/\d{2}/\d{2})\s+")?;

    if line.contains("B/F") {
        return None;
    }

    let date = scan::parse_dmy_short(&date_token, '/')?;

    let amounts = scan::find_amounts(line);
    if amounts.is_empty() {
        return None;
    }

    let description = scan::capture1(line, r"^\d{2}/\d{2}/\d{2}\s+(.+?)\d[\d,]*\.\d{2}")
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    let (is_withdrawal, is_deposit) = scan::classify(line);

    let mut withdrawal = None;
    let mut deposit = None;
    let balance;
    if amounts.len() >= 2 {
        balance = *amounts.last()?;
        if is_withdrawal {
            withdrawal = Some(amounts[0]);
        } else if is_deposit {
            deposit = Some(amounts[0]);
        } else {
            // Same ambiguity fallback as KBank: unmatched lines with two
            // amounts read the first as a debit.
            withdrawal = Some(amounts[0]);
        }
    } else {
        balance = amounts[0];
    }

    // Channel ("Via" column): a BRnnnn branch code, optionally followed by
    // the branch name, takes precedence over the keyword table.
    let channel = scan::capture2(line, r"(BR\d{4})\s+([A-Z]+)")
        .map(|(code, name)| format!("{code} {name}"))
        .or_else(|| scan::capture1(line, r"\b(BR\d{4})\b"))
        .or_else(|| scan::find_channel(line));

    Some(Transaction {
        date,
        time: None,
        description,
        channel,
        withdrawal,
        deposit,
        balance,
        reference: None,
        check_number: None,
    })
}
