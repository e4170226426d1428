//! Wildcard CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use wildcard_engine::{ConsistencyScope, Expander};
use wildcard_runtime::{Repl, WildcardStore};

/// CLI configuration parsed from arguments.
struct CliConfig {
    template: Option<String>,
    wildcards_dir: PathBuf,
    instances: usize,
    seed: Option<u64>,
    across_batch: bool,
    show_help: bool,
    show_version: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            template: None,
            wildcards_dir: PathBuf::from("wildcards"),
            instances: 1,
            seed: None,
            across_batch: false,
            show_help: false,
            show_version: false,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch-consistency" => config.across_batch = true,
            "-n" | "--instances" => {
                i += 1;
                if i >= args.len() {
                    return Err("--instances requires a value".into());
                }
                config.instances = args[i]
                    .parse()
                    .map_err(|_| format!("invalid --instances value: {}", args[i]))?;
            }
            "-s" | "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("--seed requires a value".into());
                }
                config.seed = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --seed value: {}", args[i]))?,
                );
            }
            "-w" | "--wildcards" => {
                i += 1;
                if i >= args.len() {
                    return Err("--wildcards requires a directory".into());
                }
                config.wildcards_dir = PathBuf::from(&args[i]);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            template => config.template = Some(template.to_string()),
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("wildcard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let scope = if config.across_batch {
        ConsistencyScope::AcrossBatch
    } else {
        ConsistencyScope::PerInstance
    };
    let store = WildcardStore::new(config.wildcards_dir);

    // One-shot expansion when a template is given; interactive otherwise.
    if let Some(template) = config.template {
        let expander = Expander::new(&store);
        let batch = expander.expand(&template, config.instances, scope, config.seed)?;

        let mut any_failed = false;
        for (i, outcome) in batch.instances.iter().enumerate() {
            match outcome {
                Ok(resolved) => println!("{}", resolved.text),
                Err(e) => {
                    any_failed = true;
                    eprintln!("\x1b[31minstance {}: {e}\x1b[0m", i + 1);
                }
            }
        }
        if any_failed && batch.successes().count() == 0 {
            return Err("every instance failed to resolve".into());
        }
        return Ok(());
    }

    let mut repl = Repl::new(store)?
        .with_count(config.instances)
        .with_scope(scope)
        .with_seed(config.seed);
    repl.run()?;
    Ok(())
}

fn print_help() {
    println!("wildcard - prompt template expansion");
    println!();
    println!("Usage: wildcard [OPTIONS] [TEMPLATE]");
    println!();
    println!("With a TEMPLATE argument, expands it and prints one line per");
    println!("instance; without one, starts the interactive REPL.");
    println!();
    println!("Options:");
    println!("  -n, --instances <N>      instances to generate (default 1)");
    println!("  -s, --seed <N>           fix the base seed for reproducible output");
    println!("  -b, --batch-consistency  share consistency tags across the batch");
    println!("  -w, --wildcards <DIR>    wildcards directory (default ./wildcards)");
    println!("  -h, --help               show this help");
    println!("  -V, --version            show version");
    println!();
    println!("Template grammar:");
    println!("  {{name}} or [name]   random candidate from <dir>/name.json");
    println!("  [a|b|c]            uniform choice among literal options");
    println!("  [1:name]           consistent: tag 1 shares one value per scope");
    println!("  [name:3]           resolve name three times, space-joined");
    println!("  \\[ \\] \\{{ \\}} \\| \\:  literal delimiters");
}
