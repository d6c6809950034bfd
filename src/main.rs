//! scenario-results CLI
//!
//! Inspect calculation results, check market data requirements and
//! re-express monetary results from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Print a results batch
//! scenario-results results --input batch.json
//!
//! # Same, with monetary values converted to EUR, as JSON
//! scenario-results results --input batch.json --currency EUR --rates rates.json --format json
//!
//! # Which volatilities do these currency pairs need?
//! scenario-results requirements --lookup lookup.json --pairs EUR/USD,GBP/USD
//!
//! # Convert a jump-to-default breakdown
//! scenario-results convert --input jtd.json --to EUR --rates rates.json
//!
//! # Generate a random batch for testing
//! scenario-results generate --rows 10 --columns 3
//! ```

use scenario_results::calc::results::Results;
use scenario_results::core::currency::{CurrencyCode, CurrencyPair, FxRateTable};
use scenario_results::io::input::{
    load_json, BatchFile, BreakdownInput, LookupFile, RatesFile,
};
use scenario_results::market::lookup::FxOptionLookup;
use scenario_results::money::convertible::FxConvertible;
use scenario_results::simulation::scenario::{generate_random_results, ScenarioConfig};
use std::collections::BTreeSet;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"scenario-results — scenario calculation results, market data lookups and FX re-expression

USAGE:
    scenario-results <COMMAND> [OPTIONS]

COMMANDS:
    results        Print a results batch
    requirements   List the volatilities needed for a set of currency pairs
    convert        Re-express a jump-to-default breakdown in another currency
    generate       Generate a random results batch (for testing)
    help           Show this message

OPTIONS (results):
    --input <FILE>      Path to JSON results batch
    --format <FORMAT>   Output format: text (default) or json
    --currency <CCY>    Convert monetary values to this currency (needs --rates)
    --rates <FILE>      Path to JSON FX rates file

OPTIONS (requirements):
    --lookup <FILE>     Path to JSON lookup configuration
    --pairs <LIST>      Comma-separated currency pairs, e.g. EUR/USD,GBP/USD

OPTIONS (convert):
    --input <FILE>      Path to JSON breakdown
    --to <CCY>          Target currency
    --rates <FILE>      Path to JSON FX rates file

OPTIONS (generate):
    --rows <N>            Number of targets (default: 10)
    --columns <N>         Number of columns (default: 3)
    --failure-rate <R>    Share of failed cells, 0 to 1 (default: 0.1)
    --output <FILE>       Write to file instead of stdout

Set RUST_LOG=debug for diagnostic logging."#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Parse `--flag value` pairs, rejecting any flag not in `allowed`.
fn parse_options(args: &[String], allowed: &[&str]) -> Vec<(String, String)> {
    let mut options = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) {
            fail(format!("unknown option: {}", flag));
        }
        i += 1;
        let value = args
            .get(i)
            .cloned()
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        options.push((flag.to_string(), value));
        i += 1;
    }
    options
}

fn option<'a>(options: &'a [(String, String)], flag: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(f, _)| f == flag)
        .map(|(_, v)| v.as_str())
}

fn required<'a>(options: &'a [(String, String)], flag: &str) -> &'a str {
    option(options, flag).unwrap_or_else(|| fail(format!("{} is required", flag)))
}

fn load_rates(path: &str) -> FxRateTable {
    load_json::<RatesFile>(path)
        .and_then(RatesFile::decode)
        .unwrap_or_else(|e| fail(e))
}

fn load_results(path: &str) -> Results {
    load_json::<BatchFile>(path)
        .and_then(BatchFile::decode)
        .unwrap_or_else(|e| fail(e))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e))
}

fn cmd_results(args: &[String]) {
    let options = parse_options(args, &["--input", "--format", "--currency", "--rates"]);
    let mut results = load_results(required(&options, "--input"));

    if let Some(ccy) = option(&options, "--currency") {
        let rates = load_rates(required(&options, "--rates"));
        results = results.converted_to(&CurrencyCode::new(ccy), &rates);
    } else if let Some(path) = option(&options, "--rates") {
        let rates = load_rates(path);
        results = results.in_reporting_currency(&rates);
    }

    match option(&options, "--format").unwrap_or("text") {
        "json" => {
            let file = BatchFile::encode(&results).unwrap_or_else(|e| fail(e));
            println!("{}", to_json(&file));
        }
        "text" => print!("{}", results),
        other => fail(format!("--format must be 'text' or 'json', got '{}'", other)),
    }
}

fn cmd_requirements(args: &[String]) {
    let options = parse_options(args, &["--lookup", "--pairs"]);
    let lookup = load_json::<LookupFile>(required(&options, "--lookup"))
        .and_then(LookupFile::decode)
        .unwrap_or_else(|e| fail(e));

    let pairs: BTreeSet<CurrencyPair> = required(&options, "--pairs")
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().unwrap_or_else(|e| fail(e)))
        .collect();

    match lookup.requirements(&pairs) {
        Ok(requirements) => {
            println!("Currency pairs: {}", pairs.len());
            println!("Required volatilities:");
            for id in requirements.value_requirements() {
                println!("  {}", id);
            }
        }
        Err(e) => {
            eprintln!("Known pairs:");
            for pair in lookup.volatility_currency_pairs() {
                eprintln!("  {}", pair);
            }
            fail(e);
        }
    }
}

fn cmd_convert(args: &[String]) {
    let options = parse_options(args, &["--input", "--to", "--rates"]);
    let breakdown = load_json::<BreakdownInput>(required(&options, "--input"))
        .and_then(BreakdownInput::decode)
        .unwrap_or_else(|e| fail(e));
    let rates = load_rates(required(&options, "--rates"));
    let target = CurrencyCode::new(required(&options, "--to"));

    let converted = breakdown
        .converted_to(&target, &rates)
        .unwrap_or_else(|e| fail(e));
    println!("{}", to_json(&BreakdownInput::encode(&converted)));
}

fn cmd_generate(args: &[String]) {
    let options = parse_options(args, &["--rows", "--columns", "--failure-rate", "--output"]);

    let parse_count = |flag: &str, default: usize| -> usize {
        option(&options, flag)
            .map(|s| {
                s.parse()
                    .unwrap_or_else(|_| fail(format!("{} requires a number", flag)))
            })
            .unwrap_or(default)
    };
    let rows = parse_count("--rows", 10);
    let columns = parse_count("--columns", 3);
    let failure_rate: f64 = option(&options, "--failure-rate")
        .map(|s| {
            s.parse()
                .unwrap_or_else(|_| fail("--failure-rate requires a number"))
        })
        .unwrap_or(0.1);

    let config = ScenarioConfig {
        row_count: rows,
        columns: ScenarioConfig::standard_columns(columns),
        failure_rate,
        ..Default::default()
    };
    let results = generate_random_results(&config).unwrap_or_else(|e| fail(e));
    let file = BatchFile::encode(&results).unwrap_or_else(|e| fail(e));
    let json = to_json(&file);

    if let Some(path) = option(&options, "--output") {
        fs::write(path, &json).unwrap_or_else(|e| fail(format!("writing '{}': {}", path, e)));
        eprintln!(
            "Generated {} rows × {} columns ({} failures) → {}",
            results.row_count(),
            results.column_count(),
            results.failure_count(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "results" => cmd_results(rest),
        "requirements" => cmd_requirements(rest),
        "convert" => cmd_convert(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
