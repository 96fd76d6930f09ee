use crate::poll::{
    DEFAULT_MAX_ATTEMPTS,
    PollPolicy,
};
use broker_mgmt_client::{
    Broker,
    Credentials,
    ManagementClient,
    ManagementConfig,
    Result,
    Topology,
    config::{
        DEFAULT_HOST,
        DEFAULT_PORT,
        DEFAULT_VHOST,
    },
    topology::{
        DEFAULT_EXCHANGE,
        DEFAULT_QUEUE,
    },
};
use clap::Args;
use std::time::Duration;

/// Where the broker is and which test resources to use
#[derive(Debug, Clone, Args)]
pub struct BrokerArgs {
    /// Management API host
    #[arg(long, env = "RABBITMQ_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Management API port (the management plugin, not AMQP)
    #[arg(long, env = "RABBITMQ_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    #[arg(long, env = "RABBITMQ_USER", default_value = "guest", global = true)]
    pub user: String,

    #[arg(
        long,
        env = "RABBITMQ_PASS",
        default_value = "guest",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub password: String,

    #[arg(long, env = "RABBITMQ_VHOST", default_value = DEFAULT_VHOST, global = true)]
    pub vhost: String,

    /// Per-request timeout in seconds
    #[arg(
        long = "timeout-secs",
        env = "RABBITMQ_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_secs: u64,

    /// Fanout exchange the system under test publishes to
    #[arg(long, env = "VERIFY_EXCHANGE", default_value = DEFAULT_EXCHANGE, global = true)]
    pub exchange: String,

    /// Queue bound to the exchange
    #[arg(long, env = "VERIFY_QUEUE", default_value = DEFAULT_QUEUE, global = true)]
    pub queue: String,
}

impl BrokerArgs {
    pub fn config(&self) -> Result<ManagementConfig> {
        let config = ManagementConfig::new(&self.host, self.port)
            .with_credentials(Credentials::new(&self.user, &self.password)?)
            .with_vhost(&self.vhost)
            .with_request_timeout(Duration::from_secs(self.timeout_secs));
        config.validate()?;
        Ok(config)
    }

    pub fn topology(&self) -> Topology {
        Topology::new(&self.exchange, &self.queue)
    }

    pub fn broker(&self) -> Result<Broker> {
        Broker::new(ManagementClient::new(self.config()?)?, self.topology())
    }
}

/// Retry cadence of the verification commands
#[derive(Debug, Clone, Args)]
pub struct PollArgs {
    /// Observations before a verification gives up
    #[arg(
        long = "max-retries",
        env = "VERIFY_MAX_RETRIES",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..),
        global = true
    )]
    pub max_retries: u32,

    /// Pause between observations in milliseconds
    #[arg(
        long = "retry-delay-ms",
        env = "VERIFY_RETRY_DELAY_MS",
        default_value_t = 200,
        global = true
    )]
    pub retry_delay_ms: u64,
}

impl PollArgs {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }
}
