use std::str::FromStr;

use cron::Schedule;
use json::JsonValue;
use tracing::info;

use crate::{
    constants::{
        AGENT_REGISTRATION_DEPOSIT, SAMPLE_TASK_AMOUNT, SAMPLE_TASK_CADENCE, SAMPLE_TASK_FUNCTION,
        SAMPLE_TASK_GAS,
    },
    deploy::{FunctionCall, NearCli},
    errors::ScriptError,
    utils::CommandRunner,
};

/// A task to schedule on the manager contract
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    /// Account the manager calls
    pub contract_id: String,
    pub function_id: String,
    /// Cron expression, seconds first
    pub cadence: String,
    pub recurring: bool,
    /// yoctoNEAR attached to each execution
    pub deposit: u128,
    /// Gas attached to each execution
    pub gas: u64,
    /// NEAR funding every future execution
    pub total_deposit: String,
}

impl TaskRequest {
    /// Recurring hourly increment of the counter contract
    pub fn sample(counter: &str) -> Self {
        TaskRequest {
            contract_id: counter.to_string(),
            function_id: SAMPLE_TASK_FUNCTION.to_string(),
            cadence: SAMPLE_TASK_CADENCE.to_string(),
            recurring: true,
            deposit: 0,
            gas: SAMPLE_TASK_GAS,
            total_deposit: SAMPLE_TASK_AMOUNT.to_string(),
        }
    }
}

/// Checks that `cadence` parses as a cron expression (6 or 7 fields, seconds first)
pub fn validate_cadence(cadence: &str) -> Result<(), ScriptError> {
    Schedule::from_str(cadence)
        .map(|_| ())
        .map_err(|e| ScriptError::Configuration(format!("invalid cadence {:?}: {}", cadence, e)))
}

/// Register `agent` on the manager, paying rewards out to `payable`
pub fn send_register_agent(
    near: &NearCli,
    runner: &mut dyn CommandRunner,
    manager: &str,
    agent: &str,
    payable: &str,
) -> Result<(), ScriptError> {
    let mut args = JsonValue::new_object();
    args["payable_account_id"] = payable.into();

    let call = FunctionCall {
        contract: manager.to_string(),
        method: "register_agent".to_string(),
        args,
        signer: agent.to_string(),
        amount: Some(AGENT_REGISTRATION_DEPOSIT.to_string()),
        gas: None,
    };
    runner.run(&format!("register agent {}", agent), near.call(&call))?;
    info!("Agent {} registered on {}", agent, manager);

    Ok(())
}

/// Create a task on the manager, owned by `owner`
pub fn send_create_task(
    near: &NearCli,
    runner: &mut dyn CommandRunner,
    manager: &str,
    owner: &str,
    task: &TaskRequest,
) -> Result<(), ScriptError> {
    validate_cadence(&task.cadence)?;

    let mut args = JsonValue::new_object();
    args["contract_id"] = task.contract_id.as_str().into();
    args["function_id"] = task.function_id.as_str().into();
    args["cadence"] = task.cadence.as_str().into();
    args["recurring"] = task.recurring.into();
    // u128 balances travel as strings
    args["deposit"] = task.deposit.to_string().into();
    args["gas"] = task.gas.into();

    let call = FunctionCall {
        contract: manager.to_string(),
        method: "create_task".to_string(),
        args,
        signer: owner.to_string(),
        amount: Some(task.total_deposit.clone()),
        gas: None,
    };
    runner.run(
        &format!("create task {}.{}", task.contract_id, task.function_id),
        near.call(&call),
    )?;
    info!(
        "Task {} on {} created, cadence {}",
        task.function_id, task.contract_id, task.cadence
    );

    Ok(())
}
