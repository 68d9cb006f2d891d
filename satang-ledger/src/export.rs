//! Export writers: consolidated accounts as JSON or per-account CSV,
//! over any `io::Write`.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use satang_core::Account;

/// Write the consolidated accounts as pretty-printed JSON. Decimal fields
/// serialize as strings, so amounts cross the text boundary unrounded.
pub fn write_json<W: Write>(writer: W, accounts: &[Account]) -> Result<()> {
    serde_json::to_writer_pretty(writer, accounts)?;
    Ok(())
}

/// Write one account's merged transaction history as CSV.
pub fn write_account_csv<W: Write>(writer: W, account: &Account) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Date",
        "Time",
        "Description",
        "Channel",
        "Check Number",
        "Withdrawal",
        "Deposit",
        "Balance",
        "Reference",
    ])?;

    for txn in &account.transactions {
        wtr.write_record([
            txn.date.to_string(),
            txn.time.map(|t| t.to_string()).unwrap_or_default(),
            txn.description.clone(),
            txn.channel.clone().unwrap_or_default(),
            txn.check_number.clone().unwrap_or_default(),
            txn.withdrawal.map(|a| a.to_string()).unwrap_or_default(),
            txn.deposit.map(|a| a.to_string()).unwrap_or_default(),
            txn.balance.to_string(),
            txn.reference.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write one `<digits>.csv` per account into `dir` (account number with
/// its separators stripped), creating the directory first.
pub fn export_csv_dir(dir: impl AsRef<Path>, accounts: &[Account]) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for account in accounts {
        let filename = format!("{}.csv", account.account_number.replace('-', ""));
        let path = dir.join(filename);
        let file = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_account_csv(file, account)?;
    }

    Ok(())
}
