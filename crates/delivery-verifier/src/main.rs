use clap::Parser;
use delivery_verifier::{
    Cli,
    commands::{
        report_usage,
        run,
    },
    console::Console,
};
use std::process::ExitCode;
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut console = Console::stdout();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return ExitCode::from(report_usage(&err, &mut console)),
    };

    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, host = %cli.broker.host, "Starting");

    ExitCode::from(run(&cli, &mut console).await)
}

/// Logs go to stderr; stdout carries only the result lines.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
