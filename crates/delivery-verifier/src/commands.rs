//! Command handlers and the exit-code contract
//!
//! Every handler prints its own result lines and returns whether the command
//! passed. Errors are reserved for things that went wrong talking to the
//! broker; a failed verification is a normal `Ok(false)`.

use crate::{
    cli::{
        Cli,
        Commands,
    },
    console::{
        Console,
        Status,
    },
    poll::PollPolicy,
    verify::{
        CountVerdict,
        EmptyVerdict,
        FETCH_LIMIT,
        MessageVerdict,
        verify_count,
        verify_empty,
        verify_message,
    },
};
use anyhow::Result;
use broker_mgmt_client::{
    AckMode,
    Broker,
};
use clap::error::ErrorKind;
use std::io::{
    self,
    Write,
};
use tracing::error;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Run the parsed command line and return the process exit code
pub async fn run<W: Write>(cli: &Cli, console: &mut Console<W>) -> u8 {
    let code = match dispatch(cli, console).await {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILURE,
        Err(err) => {
            error!(error = ?err, "Command failed");
            if let Err(io_err) = report_error(&err, console) {
                error!(error = %io_err, "Failed to write error report");
            }
            EXIT_FAILURE
        }
    };
    if let Err(io_err) = console.flush() {
        error!(error = %io_err, "Failed to flush output");
    }
    code
}

/// Print a command-line parse failure and return the exit code for it
///
/// Usage errors go to the console like every other result line; only an
/// explicit `--help` or `--version` exits successfully.
pub fn report_usage<W: Write>(err: &clap::Error, console: &mut Console<W>) -> u8 {
    let rendered = err.render().to_string();
    if let Err(io_err) = console
        .line(rendered.trim_end())
        .and_then(|()| console.flush())
    {
        error!(error = %io_err, "Failed to write usage");
    }
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    }
}

async fn dispatch<W: Write>(cli: &Cli, console: &mut Console<W>) -> Result<bool> {
    let broker = cli.broker.broker()?;
    let policy = cli.poll.policy();
    execute(&cli.command, &broker, &policy, console).await
}

/// Dispatch one command against the broker
pub async fn execute<W: Write>(
    command: &Commands,
    broker: &Broker,
    policy: &PollPolicy,
    console: &mut Console<W>,
) -> Result<bool> {
    match command {
        Commands::Setup => setup(broker, console).await,
        Commands::Verify { expected } => verify(broker, *expected, policy, console).await,
        Commands::VerifyMessage { content } => {
            verify_content(broker, content, policy, console).await
        }
        Commands::VerifyEmpty => verify_drained(broker, policy, console).await,
        Commands::Count => count(broker, console).await,
        Commands::List => list(broker, console).await,
        Commands::Purge => purge(broker, console).await,
        Commands::Cleanup => cleanup(broker, console).await,
        Commands::Check => check(broker, console).await,
    }
}

/// Print the final `ERROR:` lines for a command that could not complete
pub fn report_error<W: Write>(err: &anyhow::Error, console: &mut Console<W>) -> io::Result<()> {
    if is_connectivity(err) {
        console.status(
            Status::Error,
            format!("Cannot connect to RabbitMQ Management API: {err}"),
        )?;
        console.line("Make sure RabbitMQ is running with the management plugin enabled.")
    } else {
        console.status(Status::Error, err.to_string())
    }
}

fn is_connectivity(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<broker_mgmt_client::Error>()
            .is_some_and(broker_mgmt_client::Error::is_connectivity)
    })
}

async fn setup<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    let topology = broker.topology();

    console.line("Cleaning up any existing test resources...")?;
    broker.delete_queue().await?;
    broker.delete_exchange().await?;

    // The binding needs both ends in place.
    console.line(format!("Declaring exchange: {}", topology.exchange))?;
    broker.declare_exchange().await?;

    console.line(format!("Declaring queue: {}", topology.queue))?;
    broker.declare_queue().await?;

    console.line("Binding queue to exchange")?;
    broker.bind().await?;

    console.line("Setup complete!")?;
    Ok(true)
}

async fn verify<W: Write>(
    broker: &Broker,
    expected: i64,
    policy: &PollPolicy,
    console: &mut Console<W>,
) -> Result<bool> {
    let verdict = verify_count(broker, expected, policy).await?;
    match &verdict {
        CountVerdict::Reached { count, expected } => {
            console.status(
                Status::Ok,
                format!("Found {count} messages (expected at least {expected})"),
            )?;
        }
        CountVerdict::QueueMissing => console.status(Status::Error, "Queue not found")?,
        CountVerdict::Short {
            count, expected, ..
        } => {
            console.status(
                Status::Fail,
                format!("Found {count} messages (expected at least {expected})"),
            )?;
        }
    }
    Ok(verdict.passed())
}

async fn verify_content<W: Write>(
    broker: &Broker,
    content: &str,
    policy: &PollPolicy,
    console: &mut Console<W>,
) -> Result<bool> {
    let verdict = verify_message(broker, content, policy).await?;
    match &verdict {
        MessageVerdict::Found => {
            console.status(Status::Ok, format!("Found message: {content}"))?;
        }
        MessageVerdict::Missing { observed } => {
            console.status(Status::Fail, format!("Message not found: {content}"))?;
            console.line(format!("Messages in queue ({}):", observed.len()))?;
            for payload in observed {
                console.line(format!("  - {payload}"))?;
            }
        }
    }
    Ok(verdict.passed())
}

async fn verify_drained<W: Write>(
    broker: &Broker,
    policy: &PollPolicy,
    console: &mut Console<W>,
) -> Result<bool> {
    let verdict = verify_empty(broker, policy).await?;
    match &verdict {
        EmptyVerdict::Empty => console.status(Status::Ok, "Queue is empty")?,
        EmptyVerdict::QueueMissing => console.status(Status::Error, "Queue not found")?,
        EmptyVerdict::NotEmpty { count } => {
            console.status(Status::Fail, format!("Expected 0 messages, found {count}"))?;
        }
    }
    Ok(verdict.passed())
}

async fn count<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    match broker.queue_depth().await? {
        Some(count) => {
            console.line(format!("Messages in queue: {count}"))?;
            Ok(true)
        }
        None => {
            console.line("Queue not found")?;
            Ok(false)
        }
    }
}

async fn list<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    let messages = broker
        .get_messages(FETCH_LIMIT, AckMode::AckRequeueTrue)
        .await?;

    console.line(format!("Messages in queue ({}):", messages.len()))?;
    for (index, message) in messages.iter().enumerate() {
        console.line(format!(
            "  [{}] routing_key={}",
            index + 1,
            message.routing_key
        ))?;
        console.line(format!("       payload={}", message.payload))?;
        let properties = &message.properties;
        if let Some(content_type) = properties
            .content_type
            .as_deref()
            .filter(|content_type| !content_type.is_empty())
        {
            console.line(format!("       content_type={content_type}"))?;
        }
        if let Some(delivery_mode) = properties.delivery_mode.filter(|mode| *mode != 0) {
            console.line(format!("       delivery_mode={delivery_mode}"))?;
        }
    }
    Ok(true)
}

async fn purge<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    console.line(format!("Purging queue: {}", broker.topology().queue))?;
    broker.purge().await?;
    console.line("Queue purged!")?;
    Ok(true)
}

async fn cleanup<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    let topology = broker.topology();

    console.line(format!("Deleting queue: {}", topology.queue))?;
    broker.delete_queue().await?;

    console.line(format!("Deleting exchange: {}", topology.exchange))?;
    broker.delete_exchange().await?;

    console.line("Cleanup complete!")?;
    Ok(true)
}

async fn check<W: Write>(broker: &Broker, console: &mut Console<W>) -> Result<bool> {
    // An empty object counts as no answer at all.
    let overview = broker
        .client()
        .overview()
        .await?
        .filter(|overview| !overview.is_empty());
    match overview {
        Some(overview) => {
            console.line("RabbitMQ Management API is accessible")?;
            console.line(format!(
                "RabbitMQ version: {}",
                overview.rabbitmq_version.as_deref().unwrap_or("unknown")
            ))?;
            Ok(true)
        }
        None => {
            console.status(Status::Error, "Cannot connect to RabbitMQ Management API")?;
            Ok(false)
        }
    }
}
