//! End-to-end pipeline: extracted page text -> statements -> consolidated
//! accounts, across issuers and languages.

use chrono::NaiveDate;
use satang_core::{Bank, Language};
use satang_ingest::parse_document;
use satang_ledger::{consolidate, validate_transaction_continuity};

fn kbank_en_pages() -> Vec<String> {
    vec!["\
KASIKORNBANK
Account Number 123-4-56789-0
Period 01/11/2025 - 15/11/2025
01-11-25 Beginning Balance 58,400.00
01-11-25 10:30 Transfer Withdrawal 8,400.00 50,000.00 K PLUS REF123456
05-11-25 09:00 Transfer Deposit 2,000.00 52,000.00 K PLUS
15-11-25 Ending Balance 52,000.00
"
    .to_string()]
}

// Same account and period as the English document, Thai labels. The
// transaction rows are identical: descriptions are bilingual on real
// statements regardless of the statement language.
fn kbank_th_pages() -> Vec<String> {
    vec!["\
KASIKORNBANK
เลขที่บัญชี 123-4-56789-0
รอบระหว่างวันที่ 01/11/2025 - 15/11/2025
ยอดยกมา 58,400.00
01-11-25 10:30 Transfer Withdrawal 8,400.00 50,000.00 K PLUS REF123456
05-11-25 09:00 Transfer Deposit 2,000.00 52,000.00 K PLUS
ยอดยกไป 52,000.00
ยอดรวมถอน 8,400.00 ยอดรวมฝาก 2,000.00
"
    .to_string()]
}

// Follow-on period sharing its first day with the end of the November
// document, so the two periods touch and continuity is comparable.
fn kbank_followup_pages() -> Vec<String> {
    vec!["\
KASIKORNBANK
Account Number 123-4-56789-0
Period 15/11/2025 - 30/11/2025
Beginning Balance 52,000.00
20-11-25 13:45 Bill Payment 1,000.00 51,000.00 K PLUS
30-11-25 Ending Balance 51,000.00
"
    .to_string()]
}

fn bbl_pages() -> Vec<String> {
    vec!["\
Bangkok Bank
0369 KUMPHAWAPI BRANCH
Name MR NUTCHANON X Account No. 369-4-58959-3
Currency THB
Statement Period 01/11/2025 - 06/11/2025
01/11/25 B/F 831,099.60
01/11/25 TRF TO OTH BK 48,755.00 782,344.60 mPhone
04/11/25 CASH DEP NBK 10,000.00 792,344.60 BR0369 KUMPHAWAPI
"
    .to_string()]
}

#[test]
fn test_language_duplicates_collapse_to_preferred() {
    let en = parse_document(&kbank_en_pages(), "kbank-nov-en.txt");
    let th = parse_document(&kbank_th_pages(), "kbank-nov-th.txt");
    assert_eq!(en.language, Language::En);
    assert_eq!(th.language, Language::Th);
    assert_eq!(en.account_number, th.account_number);

    let (accounts, issues) = consolidate(&[th, en], Language::En);
    assert_eq!(accounts.len(), 1);
    assert!(issues.is_empty());

    // Same period twice: only the preferred-language statement survives.
    let account = &accounts[0];
    assert_eq!(account.statements.len(), 1);
    assert_eq!(account.statements[0].language, Language::En);
    assert_eq!(account.transactions.len(), 2);
}

#[test]
fn test_consecutive_periods_validate_and_merge() {
    let first = parse_document(&kbank_en_pages(), "kbank-nov-a.txt");
    let second = parse_document(&kbank_followup_pages(), "kbank-nov-b.txt");

    let (accounts, issues) = consolidate(&[second, first], Language::En);
    assert_eq!(accounts.len(), 1);
    // 52,000.00 closing carries into the next period's opening.
    assert!(issues.is_empty());

    let account = &accounts[0];
    assert_eq!(account.statements.len(), 2);
    assert_eq!(
        account.statements[0].period_start,
        NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
    );
    assert_eq!(account.transactions.len(), 3);
    assert!(validate_transaction_continuity(&account.transactions[..2]));
}

#[test]
fn test_mixed_banks_stay_separate_accounts() {
    let kbank = parse_document(&kbank_en_pages(), "kbank.txt");
    let bbl = parse_document(&bbl_pages(), "bbl.txt");
    assert_eq!(kbank.bank, Bank::Kbank);
    assert_eq!(bbl.bank, Bank::Bbl);

    let (accounts, _) = consolidate(&[kbank, bbl], Language::En);
    assert_eq!(accounts.len(), 2);
    // BTreeMap grouping: accounts come back ordered by account number.
    assert_eq!(accounts[0].account_number, "123-4-56789-0");
    assert_eq!(accounts[1].account_number, "369-4-58959-3");
    assert_eq!(accounts[1].account_name.as_deref(), Some("MR NUTCHANON X"));
}

#[test]
fn test_pipeline_is_idempotent() {
    let batch = vec![
        parse_document(&kbank_en_pages(), "a.txt"),
        parse_document(&kbank_th_pages(), "b.txt"),
        parse_document(&kbank_followup_pages(), "c.txt"),
        parse_document(&bbl_pages(), "d.txt"),
    ];

    let (first_accounts, first_issues) = consolidate(&batch, Language::En);
    let (second_accounts, second_issues) = consolidate(&batch, Language::En);
    assert_eq!(first_accounts, second_accounts);
    assert_eq!(first_issues, second_issues);
}
