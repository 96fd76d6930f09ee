//! Client for the RabbitMQ HTTP management API
//!
//! Only the handful of endpoints needed to stand up a throwaway exchange/queue
//! pair, inspect it, and tear it down again are covered. Nothing here speaks
//! AMQP itself.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod topology;
pub mod types;

pub use auth::Credentials;
pub use client::ManagementClient;
pub use config::ManagementConfig;
pub use error::{
    Error,
    Result,
};
pub use topology::{
    Broker,
    Topology,
};
pub use types::{
    AckMode,
    Message,
    MessageProperties,
    Overview,
    QueueInfo,
};
