use wtpgen::cli::commands::{CliArgs, Commands};
use wtpgen::cli::handlers::{handle_config, handle_fingerprint, handle_policy, handle_resolve};
use wtpgen::util::logging::{init_logging, level_from_flags, LoggingConfig};
use wtpgen::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let log_level = init_logging_from_args(&args);

    debug!("wtpgen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Resolve(resolve_args) => handle_resolve(resolve_args, log_level).await,
        Commands::Fingerprint(fingerprint_args) => {
            handle_fingerprint(fingerprint_args, log_level).await
        }
        Commands::Policy(policy_args) => handle_policy(policy_args, log_level),
        Commands::Config(config_args) => handle_config(config_args, log_level),
    };

    std::process::exit(exit_code);
}

/// Flags override `WTPGEN_LOG_LEVEL`; `WTPGEN_LOG_JSON` still selects the
/// output format. Returns the level in effect.
fn init_logging_from_args(args: &CliArgs) -> Level {
    let env_config = LoggingConfig::from_env();
    let level = level_from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        env_config.level,
    );
    init_logging(LoggingConfig {
        level,
        ..env_config
    });
    level
}
