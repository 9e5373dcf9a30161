//! Thin CLI driver: argument parsing, source loading, logging setup,
//! and exit-code mapping. Contains no interpreter semantics of its
//! own — everything interesting happens in [`gibberish_vm`].

use std::io::{self, Read};
use std::process::ExitCode;

use gibberish_vm::VmError;

const EXIT_OK: u8 = 0;
const EXIT_USAGE: u8 = 2;
const EXIT_FILE_ERROR: u8 = 3;
const EXIT_RUNTIME_ERROR: u8 = 1;

struct Args {
    trace: bool,
    source_path: String,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    match argv {
        [trace, path] if trace == "-trace" => {
            Ok(Args { trace: true, source_path: path.clone() })
        }
        [path] => Ok(Args { trace: false, source_path: path.clone() }),
        _ => Err("usage: gibberish [-trace] <filename> | -".to_string()),
    }
}

fn load_source(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let source = match load_source(&args.source_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("could not open '{}': {err}", args.source_path);
            return ExitCode::from(EXIT_FILE_ERROR);
        }
    };

    let stdin = io::stdin();
    let result = gibberish_vm::run(&source, stdin.lock(), io::stdout(), args.trace);

    match result {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(VmError::Quit) => ExitCode::from(EXIT_OK),
        Err(err) => {
            eprintln!("{}: {err}", err.category());
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_flag_must_come_first() {
        let args = parse_args(&["-trace".to_string(), "prog.gib".to_string()]).unwrap();
        assert!(args.trace);
        assert_eq!(args.source_path, "prog.gib");
    }

    #[test]
    fn single_positional_is_untraced() {
        let args = parse_args(&["prog.gib".to_string()]).unwrap();
        assert!(!args.trace);
    }

    #[test]
    fn missing_filename_is_a_usage_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn trace_flag_out_of_position_is_a_usage_error() {
        assert!(parse_args(&["prog.gib".to_string(), "-trace".to_string()]).is_err());
    }
}
