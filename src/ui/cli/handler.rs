// Wed Jan 15 2026 - Alex

use super::args::Args;
use crate::config::Config;
use crate::extractor::{ExtractError, Extractor};
use crate::symbol::JsonGraphReader;

pub struct CommandHandler {
    reader: JsonGraphReader,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            reader: JsonGraphReader::new(),
        }
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args)?;

        args.validate().map_err(ExtractError::InvalidParameters)?;
        let config = self.build_config(&args)?;
        log::debug!("expansion: {}, symbol: {}", config.reconstructor.expansion, config.symbol_name);

        let summary = Extractor::new(config).run(&self.reader)?;
        log::info!("image architecture: {}", summary.architecture);
        Ok(())
    }

    fn build_config(&self, args: &Args) -> Result<Config, ExtractError> {
        let base = match &args.config {
            Some(path) => Config::load(path).map_err(ExtractError::InvalidParameters)?,
            None => Config::default(),
        };
        Ok(args.apply(base))
    }

    fn setup_logging(&self, args: &Args) -> anyhow::Result<()> {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Warn,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()?;

        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_second_logger_install_fails() {
        let args = Args::try_parse_from(["header-reconstructor", "_FOO", "types.json", "--log-level", "debug"]).unwrap();
        let handler = CommandHandler::new();

        let _ = handler.setup_logging(&args);
        assert!(handler.setup_logging(&args).is_err());
    }
}
