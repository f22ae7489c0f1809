use std::{env, fs, path::Path, process::ExitCode, time::Instant};

use assembler::{
    errors::errors::{ErrorTip, FrontendError},
    preprocessor::{preprocessor::PreprocessorConfig, reader::FsReader},
    process_file, render_excerpt,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn usage(program_name: &str) {
    eprintln!("Usage: {} FILE [OUT-FILE] [-v]", program_name);
    eprintln!("\tFILE:     Source code to assemble");
    eprintln!("\tOUT-FILE: Destination for the assembled bytecode");
    eprintln!("\t-v:       Trace lexing and preprocessing, print the unit tree");
}

#[derive(Debug, PartialEq)]
struct Args {
    file: String,
    out_file: Option<String>,
    verbose: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let verbose = args.iter().any(|arg| arg == "-v" || arg == "--verbose");
    let files: Vec<&String> = args.iter().filter(|arg| !arg.starts_with('-')).collect();

    match files.as_slice() {
        [file] => Some(Args {
            file: file.to_string(),
            out_file: None,
            verbose,
        }),
        [file, out_file] => Some(Args {
            file: file.to_string(),
            out_file: Some(out_file.to_string()),
            verbose,
        }),
        _ => None,
    }
}

fn init_tracing(verbose: bool) {
    if !verbose && env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("assembler=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("assembler");

    let Some(Args {
        file,
        out_file,
        verbose,
    }) = parse_args(args.get(1..).unwrap_or_default())
    else {
        usage(program_name);
        return ExitCode::FAILURE;
    };

    init_tracing(verbose);

    let start = Instant::now();
    let reader = FsReader::new();

    match process_file(&file, &reader, PreprocessorConfig::default()) {
        Ok(units) => {
            if verbose {
                for unit in &units {
                    println!("{}", unit);
                }
            }
            // bytecode emission is not part of the front end yet
            if let Some(out_file) = &out_file {
                tracing::debug!(out_file = %out_file, "no bytecode written");
            }
            tracing::info!(units = units.len(), elapsed = ?start.elapsed(), "preprocessed");
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error);
            ExitCode::from(error.exit_code().clamp(1, 255) as u8)
        }
    }
}

fn display_error(error: &FrontendError) {
    /*
        Error: INVALID_NUMBER_LITERAL (Invalid number: `12a`, ...)
        -> main.asm
           |
        20 | push.byte 12a
           | ----------^
    */

    let (name, tip, position) = match error {
        FrontendError::MissingSource(_) => {
            eprintln!("Error: {}", error);
            return;
        }
        FrontendError::Lex(error) => (error.get_error_name(), error.get_tip(), error.get_position()),
        FrontendError::Preprocess(error) => {
            eprintln!("{}", error);
            let root = error.root_cause();
            match root.lexer_error() {
                Some(lex) => (lex.get_error_name(), lex.get_tip(), lex.get_position()),
                None => (root.get_error_name(), root.get_tip(), root.get_position()),
            }
        }
    };

    if let ErrorTip::None = tip {
        eprintln!("Error: {}", name);
    } else {
        eprintln!("Error: {} ({})", name, tip);
    }
    eprintln!("-> {}", position);

    let excerpt = fs::read_to_string(Path::new(position.file.as_str()))
        .ok()
        .and_then(|source| render_excerpt(&source, position));
    if let Some(excerpt) = excerpt {
        eprintln!("{}", excerpt);
    }
}
