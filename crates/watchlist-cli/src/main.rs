use watchlist_core::{config, logging};

mod cli;

use crate::cli::{Cli, ErrorChannel};

fn main() {
    let cli = Cli::parse_args();

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            logging::init_logging_stderr();
            let channel = ErrorChannel::from_env(config::ErrorFormat::Auto);
            channel.report(&err.context("Error loading configuration"));
            std::process::exit(channel.exit_code());
        }
    };

    // Initialize logging as early as the config allows.
    logging::init(cfg.log_file.as_deref());
    tracing::debug!("loaded config: {:?}", cfg);

    let channel = ErrorChannel::from_env(cfg.error_format);
    if let Err(err) = cli.run(&cfg) {
        channel.report(&err);
        std::process::exit(channel.exit_code());
    }
}
