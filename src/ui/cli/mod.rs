// Wed Jan 15 2026 - Alex

pub mod args;
pub mod handler;

pub use args::Args;
pub use handler::CommandHandler;

use crate::extractor::ExtractError;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

pub fn parse_args() -> Result<Args, ExtractError> {
    if std::env::args_os().len() <= 1 {
        Args::command().print_help()?;
        std::process::exit(0);
    }

    Args::try_parse().map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => invalid_parameters(&e),
    })
}

/// First line of a clap error, which names the offending argument.
fn invalid_parameters(error: &clap::Error) -> ExtractError {
    let text = error.to_string();
    let line = text.lines().next().unwrap_or("malformed arguments");
    ExtractError::InvalidParameters(line.trim_start_matches("error: ").to_string())
}

pub fn run() -> anyhow::Result<()> {
    let args = parse_args()?;
    let handler = CommandHandler::new();
    handler.execute(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_names_argument() {
        let error = Args::try_parse_from(["header-reconstructor", "_FOO", "types.json", "--bogus"]).unwrap_err();
        let ExtractError::InvalidParameters(message) = invalid_parameters(&error) else {
            panic!("expected invalid parameters");
        };

        assert!(message.contains("--bogus"));
        assert!(!message.contains('\n'));
    }
}
