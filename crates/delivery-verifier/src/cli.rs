use crate::args::{
    BrokerArgs,
    PollArgs,
};
use clap::{
    ArgAction,
    Parser,
    Subcommand,
};

const AFTER_HELP: &str = "Examples:\n  \
verify-messages setup                      # Create exchange and queue\n  \
verify-messages verify 3                   # Wait for at least 3 messages\n  \
verify-messages verify-message 'payload'   # Wait for an exact payload, then drain\n  \
verify-messages count                      # Print the queue depth\n  \
verify-messages cleanup                    # Remove test exchange and queue";

#[derive(Debug, Parser)]
#[command(
    name = "verify-messages",
    version,
    about = "Verify that published messages reach a RabbitMQ queue, using the management API",
    arg_required_else_help = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub broker: BrokerArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Log to stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Recreate the test exchange and queue and bind them
    #[command(name = "setup")]
    Setup,

    /// Wait until the queue holds at least N messages
    #[command(name = "verify")]
    Verify {
        #[arg(value_name = "N", allow_negative_numbers = true)]
        expected: i64,
    },

    /// Wait for a message with exactly this payload, then drain the queue
    #[command(name = "verify-message")]
    VerifyMessage {
        #[arg(value_name = "CONTENT", allow_hyphen_values = true)]
        content: String,
    },

    /// Wait until the queue is empty
    #[command(name = "verify-empty")]
    VerifyEmpty,

    /// Print the number of messages in the queue
    #[command(name = "count")]
    Count,

    /// Print the messages in the queue without consuming them
    #[command(name = "list")]
    List,

    /// Drop every message from the queue
    #[command(name = "purge")]
    Purge,

    /// Remove the test exchange and queue
    #[command(name = "cleanup")]
    Cleanup,

    /// Check that the management API is reachable
    #[command(name = "check")]
    Check,
}
