//! KBank (Kasikornbank) header extraction and transaction-line grammar.
//!
//! Expected line shape after PDF text extraction:
//!   DD-MM-YY [HH:MM] DESCRIPTION AMOUNT [AMOUNT...] BALANCE CHANNEL DETAILS
//!   01-11-25 10:30 Transfer Withdrawal 8,400.00 50,000.00 K PLUS REF123456

use rust_decimal::Decimal;

use satang_core::Transaction;
use satang_core::keywords::{BALANCE_BEGIN_KEYWORDS, BALANCE_END_KEYWORDS};

use crate::header::HeaderInfo;
use crate::scan;

/// Extract account number, holder name and statement period from header
/// text. KBank account numbers group as XXX-X-XXXXX-X.
pub fn extract_header(text: &str) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    info.account_number = scan::capture1(text, r"(\d{3}-\d-\d{5}-\d)");

    if let Some((start, end)) = scan::capture2(
        text,
        r"(?:Period|รอบระหว่างวันที่)\s+(\d{2}/\d{2}/\d{4})\s*-\s*(\d{2}/\d{2}/\d{4})",
    ) {
        info.period_start = scan::parse_dmy_full(&start);
        info.period_end = scan::parse_dmy_full(&end);
    }

    info.account_name = extract_name(text);
    info.currency = Some("THB".to_string());
    info
}

/// Holder name. The English label and honorific often run together in
/// extracted text ("AccountMR. SOMCHAI ..."); Thai honorifics are
/// normalized to the English prefix.
fn extract_name(text: &str) -> Option<String> {
    if let Some((prefix, name)) =
        scan::capture2(text, r"Account\s*(MR\.|MS\.|MRS\.)\s*(.+?)(?:\s+Reference|$)")
    {
        return Some(format!("{prefix} {name}").trim().to_string());
    }

    if let Some((honorific, name)) =
        scan::capture2(text, r"ชื่อบัญชี\s+(นาย|นาง|น\.ส\.)\s+(.+?)(?:\s+เลขที่|$)")
    {
        let prefix = match honorific.as_str() {
            "นาย" => "MR.",
            "นาง" => "MRS.",
            "น.ส." => "MS.",
            other => other,
        };
        return Some(format!("{prefix} {name}").trim().to_string());
    }

    scan::capture1(text, r"Account Name\s*:\s*(.+?)(?:\n|Account)")
        .map(|name| name.trim().to_string())
}

/// Opening/closing balances from the bilingual begin/end balance labels,
/// each followed by a trailing amount.
pub fn extract_balances(text: &str) -> (Option<Decimal>, Option<Decimal>) {
    (
        balance_after_any(text, BALANCE_BEGIN_KEYWORDS),
        balance_after_any(text, BALANCE_END_KEYWORDS),
    )
}

fn balance_after_any(text: &str, keywords: &[&str]) -> Option<Decimal> {
    keywords.iter().find_map(|kw| {
        let pattern = format!(r"{}\s+([\d,]+\.\d{{2}})", regex::escape(kw));
        scan::capture1(text, &pattern).and_then(|amount| scan::parse_amount(&amount))
    })
}

/// Parse one KBank transaction line; `None` means the line is not a
/// transaction (wrong shape, or a balance-total row).
pub fn parse_line(line: &str) -> Option<Transaction> {
    let date_token = scan::capture1(line, r"^(\d{2}-\d{2}-\d{2})\s+")?;

    // Beginning/Ending Balance rows are header totals, not transactions.
    if scan::contains_any(line, BALANCE_BEGIN_KEYWORDS)
        || scan::contains_any(line, BALANCE_END_KEYWORDS)
    {
        return None;
    }

    let date = scan::parse_dmy_short(&date_token, '-')?;

    let time = scan::capture1(line, r"^\d{2}-\d{2}-\d{2}\s+(\d{2}:\d{2})\s+")
        .and_then(|t| scan::parse_clock(&t));

    let amounts = scan::find_amounts(line);
    if amounts.is_empty() {
        return None;
    }

    // Description sits between the date/time tokens and the first amount.
    let description = if time.is_some() {
        scan::capture1(line, r"^\d{2}-\d{2}-\d{2}\s+\d{2}:\d{2}\s+(.+?)\d[\d,]*\.\d{2}")
    } else {
        scan::capture1(line, r"^\d{2}-\d{2}-\d{2}\s+(.+?)\d[\d,]*\.\d{2}")
    }
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
            // Heuristic fallback: with no keyword hit, read the first
            // amount as a debit. Known source of misclassification.
            withdrawal = Some(amounts[0]);
        }
    } else {
        balance = amounts[0];
    }

    let channel = scan::find_channel(line);
    let reference = scan::capture1(line, r"(?i)(?:Ref\.|Reference|REF)\s*:?\s*(\S+)");

    Some(Transaction {
        date,
        time,
        description,
        channel,
        withdrawal,
        deposit,
        balance,
        reference,
        check_number: None,
    })
}
