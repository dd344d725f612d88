use anyhow::{Context, Result};
use std::env;
use std::io;
use std::path::Path;

use wallet_match::{
    normalize_with_stats, reconcile, render_table, write_csv, write_json, MatchFilter, MatchReport,
};

const USAGE: &str = "\
Usage:
  wallet-match <system_file> <wallet_file> [--filter STATUS] [--json | --csv]
    (--json and --csv are mutually exclusive)
  wallet-match ui <system_file> <wallet_file>

STATUS: ALL | MATCHED | SYSTEM_ONLY | WALLET_ONLY | FREQUENCY_MISMATCH

Input files hold numbers separated by newlines, tabs or commas.
Anything that isn't a number is silently ignored.";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "ui" {
        // Interactive mode
        run_ui_mode(&args[2..])?;
    } else {
        run_report(&args[1..])?;
    }

    Ok(())
}

/// Load both input files, reconcile and build the report.
fn load_and_match(system_path: &str, wallet_path: &str) -> Result<MatchReport> {
    let system_text = std::fs::read_to_string(Path::new(system_path))
        .with_context(|| format!("Failed to read system file: {}", system_path))?;
    let wallet_text = std::fs::read_to_string(Path::new(wallet_path))
        .with_context(|| format!("Failed to read wallet file: {}", wallet_path))?;

    let (system_values, system_parse) = normalize_with_stats(&system_text);
    let (wallet_values, wallet_parse) = normalize_with_stats(&wallet_text);

    let results = reconcile(&system_values, &wallet_values);
    Ok(MatchReport::new(results, system_parse, wallet_parse))
}

/// Parsed report-mode command line.
#[derive(Debug)]
struct ReportOptions {
    files: Vec<String>,
    filter: MatchFilter,
    as_json: bool,
    as_csv: bool,
    help: bool,
}

fn parse_report_args(args: &[String]) -> Result<ReportOptions> {
    let mut opts = ReportOptions {
        files: Vec::new(),
        filter: MatchFilter::All,
        as_json: false,
        as_csv: false,
        help: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => opts.as_json = true,
            "--csv" => opts.as_csv = true,
            "--filter" => {
                i += 1;
                let name = args.get(i).map(String::as_str).unwrap_or("");
                opts.filter = MatchFilter::parse(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown status: {}\n\n{}", name, USAGE))?;
            }
            "--help" | "-h" => opts.help = true,
            other => opts.files.push(other.to_string()),
        }
        i += 1;
    }

    if opts.as_json && opts.as_csv {
        anyhow::bail!("--json and --csv are mutually exclusive\n\n{}", USAGE);
    }

    Ok(opts)
}

fn run_report(args: &[String]) -> Result<()> {
    let opts = parse_report_args(args)?;

    if opts.help {
        println!("{}", USAGE);
        return Ok(());
    }

    if opts.files.len() != 2 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let filter = opts.filter;
    let report = load_and_match(&opts.files[0], &opts.files[1])?;

    // Machine-readable exports go straight to stdout, nothing else
    if opts.as_json {
        write_json(&report, io::stdout().lock())?;
        println!();
        return Ok(());
    }
    if opts.as_csv {
        write_csv(&report, io::stdout().lock())?;
        return Ok(());
    }

    println!("⚖️  Wallet Match - System vs Wallet Reconciliation");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "\n📂 System: {} values parsed ({} tokens ignored)",
        report.system_parse.accepted, report.system_parse.rejected
    );
    println!(
        "📂 Wallet: {} values parsed ({} tokens ignored)",
        report.wallet_parse.accepted, report.wallet_parse.rejected
    );

    println!("\n🔍 {}", report.summary_line());

    if filter != MatchFilter::All {
        println!("   Showing: {}", filter.label());
    }

    println!();
    print!("{}", render_table(&report.filtered(filter)));

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if report.summary.differences_count == 0 && !report.results.is_empty() {
        println!("✅ All values reconcile");
    } else {
        println!("✓ Differences found: {}", report.summary.differences_count);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(args: &[String]) -> Result<()> {
    if args.len() != 2 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    println!("🖥️  Loading Wallet Match UI...\n");

    let report = load_and_match(&args[0], &args[1])?;
    println!("✓ {} result rows\n", report.results.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = wallet_match::ui::App::new(report);
    wallet_match::ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_args: &[String]) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
