use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use satang_core::{Language, Statement};
use satang_ingest::parse_document;
use satang_ledger::{consolidate, export_csv_dir, group_by_account, validate_balance_continuity, write_json};

#[derive(Parser, Debug)]
#[command(name = "satang", version, about = "Thai bank statement parser and consolidator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse extracted-text statement document(s) and print JSON
    Parse {
        /// Path to a .txt document or a directory of them
        path: PathBuf,

        /// Print a per-statement summary to stderr
        #[arg(long, short)]
        verbose: bool,
    },

    /// Parse, consolidate by account, and export
    Export {
        /// Path to a .txt document or a directory of them
        path: PathBuf,

        /// Output file (json) or directory (csv)
        output: PathBuf,

        #[arg(long, short, value_enum, default_value = "json")]
        format: Format,

        /// Preferred language when statements cover the same period twice
        #[arg(long, short, value_enum, default_value = "en")]
        language: Lang,

        #[arg(long, short)]
        verbose: bool,
    },

    /// Check balance continuity across statements, per account
    Validate {
        /// Path to a .txt document or a directory of them
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Lang {
    En,
    Th,
}

impl From<Lang> for Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Language::En,
            Lang::Th => Language::Th,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { path, verbose } => cmd_parse(&path, verbose),
        Command::Export { path, output, format, language, verbose } => {
            cmd_export(&path, &output, format, language.into(), verbose)
        }
        Command::Validate { path } => cmd_validate(&path),
    }
}

/// Read one extracted-text document. Pages are separated by form feed,
/// the pdftotext convention; decryption and text extraction happen
/// upstream of this tool.
fn load_document(path: &Path) -> Result<Statement> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let pages: Vec<String> = text.split('\u{0C}').map(str::to_string).collect();
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement")
        .to_string();
    Ok(parse_document(&pages, &source))
}

/// Load a file, or every .txt in a directory. Unreadable documents in a
/// batch are skipped and tallied on stderr rather than aborting the run.
fn load_batch(path: &Path) -> Result<Vec<Statement>> {
    if path.is_file() {
        return Ok(vec![load_document(path)?]);
    }
    if !path.is_dir() {
        bail!("{} is not a file or directory", path.display());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("reading {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();

    let mut statements = Vec::new();
    let mut skipped = 0usize;
    for file in files {
        match load_document(&file) {
            Ok(stmt) => statements.push(stmt),
            Err(err) => {
                skipped += 1;
                eprintln!("skipping {}: {err:#}", file.display());
            }
        }
    }

    if skipped > 0 {
        eprintln!("{skipped} document(s) skipped");
    }
    if statements.is_empty() {
        bail!("no parseable .txt documents in {}", path.display());
    }
    Ok(statements)
}

fn cmd_parse(path: &Path, verbose: bool) -> Result<()> {
    if path.is_file() {
        let stmt = load_document(path)?;
        println!("{}", serde_json::to_string_pretty(&stmt)?);
        if verbose {
            print_summary(std::slice::from_ref(&stmt));
        }
        return Ok(());
    }

    let statements = load_batch(path)?;
    println!("{}", serde_json::to_string_pretty(&statements)?);
    if verbose {
        print_summary(&statements);
    }
    Ok(())
}

fn print_summary(statements: &[Statement]) {
    eprintln!("\n--- Summary ---");
    for stmt in statements {
        eprintln!(
            "  {} ({}/{}): {} transactions, {} to {}",
            stmt.account_number,
            stmt.bank,
            stmt.language,
            stmt.transactions.len(),
            stmt.period_start,
            stmt.period_end,
        );
    }
}

fn cmd_export(
    path: &Path,
    output: &Path,
    format: Format,
    preferred: Language,
    verbose: bool,
) -> Result<()> {
    let statements = load_batch(path)?;
    if verbose {
        eprintln!("parsed {} statement(s)", statements.len());
    }

    let (accounts, issues) = consolidate(&statements, preferred);
    if verbose {
        eprintln!("consolidated into {} account(s)", accounts.len());
        for account in &accounts {
            eprintln!(
                "  {}: {} transactions",
                account.account_number,
                account.transactions.len()
            );
        }
    }
    for issue in &issues {
        eprintln!(
            "balance mismatch in {}: expected opening {}, got {}",
            issue.statement.source, issue.expected_opening, issue.actual_opening,
        );
    }

    match format {
        Format::Json => {
            let file = fs::File::create(output)
                .with_context(|| format!("creating {}", output.display()))?;
            write_json(file, &accounts)?;
            eprintln!("exported to {}", output.display());
        }
        Format::Csv => {
            export_csv_dir(output, &accounts)?;
            eprintln!("exported CSVs to {}/", output.display());
        }
    }

    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let statements = load_batch(path)?;
    let mut all_valid = true;

    for (account_number, mut group) in group_by_account(&statements) {
        group.sort_by_key(|s| s.period_start);

        let issues = validate_balance_continuity(&group);
        if issues.is_empty() {
            println!("[OK] {}: {} statements validated", account_number, group.len());
        } else {
            all_valid = false;
            eprintln!("[FAIL] {}: {} issue(s) found", account_number, issues.len());
            for issue in &issues {
                eprintln!(
                    "  - {}: expected opening {}, got {}",
                    issue.statement.source, issue.expected_opening, issue.actual_opening,
                );
            }
        }
    }

    if !all_valid {
        std::process::exit(1);
    }
    Ok(())
}
