//! prefmatch CLI — driving adapter for the prefmatch engine.
//!
//! Subcommands:
//! - `eval <matchers.json> <prefs.json> [--trace] [--now <time>]` — evaluate
//!   matchers against a preference snapshot
//! - `check <matchers.json>` — report conditions and paths that can never match
//! - `encode <matchers.json>` — print the compact string form
//! - `decode <encoded>` — print the matchers in a compact string as JSON

use std::process;

use chrono::{DateTime, Utc};
use log::debug;
use prefmatch::{
    decode_condition_matchers, encode_condition_matchers, match_conditions_with_trace, parse_time,
    resolve_path, strip_path_prefixes, Condition, ConditionMatcherMap, PathError, PrefSnapshot,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "eval" => cmd_eval(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "encode" => cmd_encode(&args[2..]),
        "decode" => cmd_decode(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_eval(args: &[String]) -> Result<(), String> {
    let [matchers_path, prefs_path, rest @ ..] = args else {
        return Err("eval requires a matchers file and a prefs file".into());
    };
    let options = parse_eval_options(rest)?;

    let matchers = load_matchers(matchers_path)?;
    let prefs = load_prefs(prefs_path)?;
    debug!(
        "evaluating {} condition(s) at {}",
        matchers.len(),
        options.now.to_rfc3339()
    );

    let trace = match_conditions_with_trace(&prefs, &matchers, options.now);
    if options.trace {
        for step in &trace.steps {
            println!("{step}");
        }
    }
    println!("{}", verdict(trace.matched));

    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    let [matchers_path] = args else {
        return Err("check requires a matchers file path".into());
    };

    let matchers = load_matchers(matchers_path)?;
    let problems = check_matchers(&matchers);
    if problems.is_empty() {
        println!("Matchers valid ({} condition(s))", matchers.len());
        return Ok(());
    }

    for problem in &problems {
        println!("{problem}");
    }
    Err(format!("{} problem(s) found", problems.len()))
}

fn cmd_encode(args: &[String]) -> Result<(), String> {
    let [matchers_path] = args else {
        return Err("encode requires a matchers file path".into());
    };

    let matchers = load_matchers(matchers_path)?;
    println!("{}", encode_condition_matchers(&matchers));
    Ok(())
}

fn cmd_decode(args: &[String]) -> Result<(), String> {
    let [encoded] = args else {
        return Err("decode requires an encoded string".into());
    };

    let matchers = decode_condition_matchers(encoded);
    if matchers.is_empty() && !encoded.is_empty() {
        return Err(format!("\"{encoded}\" is not a valid encoding"));
    }
    let json = serde_json::to_string_pretty(&matchers.to_configs())
        .map_err(|e| format!("JSON encode error: {e}"))?;
    println!("{json}");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Checks
// ═══════════════════════════════════════════════════════════════════════════════

/// Problems that make a pair unable to ever match, one line per problem.
///
/// Paths are checked for shape only: a snapshot with no prefs fails every
/// well-formed path with `UnknownRoot`.
fn check_matchers(matchers: &ConditionMatcherMap) -> Vec<String> {
    let empty = PrefSnapshot::default();
    let mut problems = Vec::new();

    for (pref_path, condition) in matchers.iter() {
        if let Err(
            e @ (PathError::Empty
            | PathError::EmptySegment { .. }
            | PathError::TooManySegments { .. }),
        ) = resolve_path(&empty, strip_path_prefixes(pref_path))
        {
            problems.push(format!("\"{pref_path}\": {e}"));
        }

        if let Err(e) = Condition::parse(condition).validate() {
            problems.push(format!("\"{pref_path}\": {e}"));
        }
    }

    problems
}

fn verdict(matched: bool) -> &'static str {
    if matched {
        "eligible"
    } else {
        "not eligible"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File loading
// ═══════════════════════════════════════════════════════════════════════════════

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))
}

fn load_matchers(path: &str) -> Result<ConditionMatcherMap, String> {
    ConditionMatcherMap::from_json(&read_file(path)?).map_err(|e| format!("\"{path}\": {e}"))
}

fn load_prefs(path: &str) -> Result<PrefSnapshot, String> {
    PrefSnapshot::from_json(&read_file(path)?).map_err(|e| format!("\"{path}\": {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct EvalOptions {
    trace: bool,
    now: DateTime<Utc>,
}

fn parse_eval_options(args: &[String]) -> Result<EvalOptions, String> {
    let mut options = EvalOptions {
        trace: false,
        now: Utc::now(),
    };
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--trace" => options.trace = true,
            "--now" => {
                i += 1;
                let value = args.get(i).ok_or("--now requires a time")?;
                options.now =
                    parse_time(value).ok_or_else(|| format!("invalid time \"{value}\""))?;
            }
            other => return Err(format!("unexpected argument \"{other}\"")),
        }
        i += 1;
    }

    Ok(options)
}

fn print_usage() {
    eprintln!(
        "Usage: prefmatch <command> [options]

Commands:
  eval <matchers.json> <prefs.json> [--trace] [--now <time>]
                                 Evaluate matchers against a prefs snapshot
  check <matchers.json>          Report conditions that can never match
  encode <matchers.json>         Print the compact string form
  decode <encoded>               Print a compact string as JSON
  help                           Show this help

Set RUST_LOG=debug to see why individual conditions fail."
    );
}
