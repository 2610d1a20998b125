//! Account creation & contract deployment through the near CLI

pub mod near;
pub mod plan;

pub use near::{FunctionCall, InitCall, NearCli};
pub use plan::{DeployStep, DeploymentPlan};
