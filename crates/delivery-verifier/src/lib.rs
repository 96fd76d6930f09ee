//! Delivery checks for integration tests of message publishers
//!
//! The checks read a RabbitMQ queue through the management API and poll until
//! the expected state shows up, since the publisher under test delivers
//! asynchronously.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod args;
pub mod cli;
pub mod commands;
pub mod console;
pub mod poll;
pub mod verify;

#[cfg(test)]
mod test_utils;

pub use cli::{
    Cli,
    Commands,
};
pub use poll::PollPolicy;
