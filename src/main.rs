use clap::Parser;
use finreport::args::{Args, Command};
use finreport::rates::CbrRates;
use finreport::{commands, logging, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    let _stderr = logging::init_stderr(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load(args.common().home()).await?;

    // From here on the per-module log files receive events as well.
    let _logs = logging::init(args.common().log_level(), &config.log_dir())?;
    debug!("Using the finreport home {}", config.root().display());

    let _: () = match args.command() {
        Command::Spending(spending_args) => {
            commands::spending(config.report_writer(), spending_args)
                .await?
                .print()
        }

        Command::Convert(convert_args) => {
            let source = CbrRates::new(config.rates_url().clone());
            commands::convert(source, convert_args).await?.print()
        }

        Command::Rates(rates_args) => {
            let source = CbrRates::new(config.rates_url().clone());
            commands::rates(config.user_settings().await, source, rates_args)
                .await?
                .print()
        }
    };
    Ok(())
}
