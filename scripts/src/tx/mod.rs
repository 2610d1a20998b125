//! Talking to the network once the contracts are live: account queries & manager calls

pub mod client;
pub mod sender;

pub use client::{AccountState, NearRpcClient};
pub use sender::{send_create_task, send_register_agent, validate_cadence, TaskRequest};
