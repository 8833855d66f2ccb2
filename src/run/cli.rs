use anyhow::Result;

use crate::db::Database;
use crate::ledger::daterange::RangePreset;
use crate::ledger::stats::PeriodStats;
use crate::ui::util::format_cents;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db),
        "accounts" => cli_accounts(db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("platasync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("PlataSync — local-only personal finance tracker");
    println!();
    println!("Usage: platasync [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary [preset]              Print income/expense summary for a range");
    println!("                                Presets: today, yesterday, 7d, 30d, month, last-month");
    println!("  accounts                      List all accounts with balances");
    println!("  export [path]                 Export transactions to CSV");
    println!("    --range <preset>            Range to export (default: all)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn parse_preset(arg: &str) -> Result<RangePreset> {
    RangePreset::parse(arg)
        .ok_or_else(|| anyhow::anyhow!("Unknown range preset: {arg}. Try one of: today, yesterday, 7d, 30d, month, last-month"))
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let preset = match args.first() {
        Some(arg) => parse_preset(arg)?,
        None => RangePreset::ThisMonth,
    };
    let range = preset.resolve(today);

    let txns = db.get_transactions(None, None, None, None, None, Some(&range))?;
    let stats = PeriodStats::compute(&txns);

    println!("Summary for {preset} ({range})");
    println!();
    println!("  Income:    {:>14}", format_cents(stats.income_cents));
    println!("  Expenses:  {:>14}", format_cents(stats.expense_cents));
    println!("  Net:       {:>14}", format_cents(stats.net_cents()));
    println!();
    println!("  {} transactions", txns.len());
    Ok(())
}

fn cli_accounts(db: &mut Database) -> Result<()> {
    let accounts = db.get_accounts()?;
    if accounts.is_empty() {
        println!("No accounts. Launch the TUI and create one with :account <name>");
        return Ok(());
    }

    let mut total = 0_i64;
    println!("{:<24} {:>14}   {}", "Account", "Balance", "Last used");
    for account in &accounts {
        total += account.balance_cents;
        println!(
            "{:<24} {:>14}   {}",
            account.name,
            format_cents(account.balance_cents),
            account.last_used_at.get(..10).unwrap_or(""),
        );
    }
    println!();
    println!("{:<24} {:>14}", "Total", format_cents(total));
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let mut range = None;
    let mut path: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--range" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--range requires a preset"))?;
                let today = chrono::Local::now().date_naive();
                range = Some(parse_preset(value)?.resolve(today));
                i += 2;
            }
            other => {
                path = Some(crate::run::shellexpand(other));
                i += 1;
            }
        }
    }

    let path = path.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/platasync-export.csv")
    });

    let count = db.export_to_csv(&path, range.as_ref())?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {path}");
    }
    Ok(())
}
