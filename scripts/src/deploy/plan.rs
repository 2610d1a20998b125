use std::{fmt, process::Command};

use json::JsonValue;
use tracing::info;

use crate::{
    accounts::{AccountIds, Role},
    config::DeployConfig,
    constants::{COUNTER_WASM, CROSS_CONTRACT_WASM, INIT_FUNCTION, MANAGER_WASM},
    deploy::near::{InitCall, NearCli},
    errors::ScriptError,
    utils::CommandRunner,
};

/// One external command of a deployment
#[derive(Debug, Clone, PartialEq)]
pub enum DeployStep {
    /// Create a sub-account of the base account
    CreateAccount { role: Role, account: String },
    /// Deploy an artifact of the output dir to an account
    Deploy {
        role: Role,
        account: String,
        artifact: &'static str,
        init: Option<InitCall>,
    },
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStep::CreateAccount { account, .. } => write!(f, "create account {}", account),
            DeployStep::Deploy {
                account, artifact, ..
            } => write!(f, "deploy {} to {}", artifact, account),
        }
    }
}

/// The ordered list of commands deploying the contracts
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    near: NearCli,
    master: String,
    initial_balance: Option<String>,
    steps: Vec<DeployStep>,
}

impl DeploymentPlan {
    /// Create every role account, then deploy the manager, the counter & the cross contract
    pub fn standard(config: &DeployConfig, accounts: &AccountIds) -> Self {
        let mut steps: Vec<DeployStep> = accounts
            .iter()
            .map(|(role, account)| DeployStep::CreateAccount {
                role,
                account: account.to_string(),
            })
            .collect();

        steps.push(DeployStep::Deploy {
            role: Role::Cron,
            account: accounts.get(Role::Cron).to_string(),
            artifact: MANAGER_WASM,
            init: Some(InitCall::new(INIT_FUNCTION, JsonValue::new_object())),
        });
        steps.push(DeployStep::Deploy {
            role: Role::Counter,
            account: accounts.get(Role::Counter).to_string(),
            artifact: COUNTER_WASM,
            init: None,
        });

        let mut cross_contract_args = JsonValue::new_object();
        cross_contract_args["cron"] = accounts.get(Role::Cron).into();
        steps.push(DeployStep::Deploy {
            role: Role::Crud,
            account: accounts.get(Role::Crud).to_string(),
            artifact: CROSS_CONTRACT_WASM,
            init: Some(InitCall::new(INIT_FUNCTION, cross_contract_args)),
        });

        DeploymentPlan {
            near: NearCli::new(config, accounts),
            master: accounts.base().to_string(),
            initial_balance: config.initial_balance.clone(),
            steps,
        }
    }

    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }

    /// Accounts the plan creates
    pub fn accounts_to_create(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            DeployStep::CreateAccount { account, .. } => Some(account.as_str()),
            DeployStep::Deploy { .. } => None,
        })
    }

    /// The command carrying out `step`
    pub fn command_for(&self, step: &DeployStep) -> Command {
        match step {
            DeployStep::CreateAccount { account, .. } => {
                self.near
                    .create_account(account, &self.master, self.initial_balance.as_deref())
            }
            DeployStep::Deploy {
                account,
                artifact,
                init,
                ..
            } => self
                .near
                .deploy(&self.near.artifact_path(artifact), account, init.as_ref()),
        }
    }

    /// Run the steps in order, stopping at the first failure.
    /// Returns the label of every completed step.
    pub fn execute(&self, runner: &mut dyn CommandRunner) -> Result<Vec<String>, ScriptError> {
        let mut completed = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let label = step.to_string();
            info!("[{}/{}] {}", index + 1, self.steps.len(), label);
            runner.run(&label, self.command_for(step))?;
            completed.push(label);
        }

        Ok(completed)
    }
}
