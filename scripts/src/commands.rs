use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    accounts::{AccountIds, Role},
    build::WasmBuilder,
    cli::{DeployArgs, SeedArgs},
    config::{BuildConfig, DeployConfig},
    constants::DEPLOYED_FILE,
    deploy::{DeployStep, DeploymentPlan, NearCli},
    errors::ScriptError,
    output_writer::{write_output_file, OutputKeys},
    tx::{send_create_task, send_register_agent, AccountState, NearRpcClient, TaskRequest},
    utils::CommandRunner,
};

/// Build the contracts and copy the artifacts into the output dir
pub fn build_contracts(
    config: BuildConfig,
    runner: &mut dyn CommandRunner,
) -> Result<Vec<PathBuf>, ScriptError> {
    info!("Building contracts...");
    let artifacts = WasmBuilder::new(config).build(runner)?;
    info!("Built with success, {} artifacts", artifacts.len());

    Ok(artifacts)
}

/// Create the role accounts & deploy the contracts to them
pub async fn deploy_contracts(
    config: &DeployConfig,
    args: &DeployArgs,
    runner: &mut dyn CommandRunner,
) -> Result<(), ScriptError> {
    let accounts = AccountIds::derive(&config.base_account())?;
    let plan = DeploymentPlan::standard(config, &accounts);

    if args.preflight {
        let rpc = NearRpcClient::new(config.rpc_url());
        preflight(&rpc, &plan).await?;
    }

    info!(
        "Deploying contracts on {} from {}...",
        config.network.as_str(),
        accounts.base()
    );
    plan.execute(runner)?;

    if runner.executes() {
        record_deployment(&config.out_dir.join(DEPLOYED_FILE), &plan)?;
    }
    info!("Deployed with success");

    Ok(())
}

/// The build step, then the deployment step. A failed build deploys nothing
pub async fn build_and_deploy(
    build_config: BuildConfig,
    deploy_config: &DeployConfig,
    args: &DeployArgs,
    runner: &mut dyn CommandRunner,
) -> Result<(), ScriptError> {
    build_contracts(build_config, runner)?;
    deploy_contracts(deploy_config, args, runner).await
}

/// Fails if any account the plan creates already exists
pub async fn preflight(rpc: &NearRpcClient, plan: &DeploymentPlan) -> Result<(), ScriptError> {
    info!("Checking accounts against {}", rpc.url());
    for account in plan.accounts_to_create() {
        if let AccountState::Exists { .. } = rpc.view_account(account).await? {
            return Err(ScriptError::AccountExists(account.to_string()));
        }
    }

    Ok(())
}

/// Write what got deployed where
pub fn record_deployment(file_path: &Path, plan: &DeploymentPlan) -> Result<(), ScriptError> {
    if let Some(dir) = file_path.parent() {
        fs::create_dir_all(dir).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    for step in plan.steps() {
        if let DeployStep::Deploy {
            role,
            account,
            artifact,
            init,
        } = step
        {
            let key = role.prefix();
            write_output_file(file_path, OutputKeys::Account { key }, account)?;
            write_output_file(file_path, OutputKeys::Deployment { key }, artifact)?;
            if let Some(init) = init {
                write_output_file(file_path, OutputKeys::Init { key }, &init.function)?;
            }
        }
    }
    info!("Deployment recorded in {}", file_path.display());

    Ok(())
}

/// The derived accounts as `KEY=value` lines
pub fn account_lines(config: &DeployConfig) -> Result<Vec<String>, ScriptError> {
    let accounts = AccountIds::derive(&config.base_account())?;
    let mut lines = vec![
        format!("NEAR_ENV={}", config.network.as_str()),
        format!("FACTORY={}", config.factory()),
    ];
    lines.extend(
        accounts
            .env_vars()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value)),
    );

    Ok(lines)
}

/// Query the on-chain state of every derived account
pub async fn account_status(config: &DeployConfig) -> Result<Vec<(String, AccountState)>, ScriptError> {
    let accounts = AccountIds::derive(&config.base_account())?;
    let rpc = NearRpcClient::new(config.rpc_url());

    let mut states = Vec::new();
    for account in std::iter::once(accounts.base()).chain(accounts.iter().map(|(_, id)| id)) {
        let state = rpc.view_account(account).await?;
        states.push((account.to_string(), state));
    }

    Ok(states)
}

/// Register the agent account & create the sample task on the manager
pub fn seed_contracts(
    config: &DeployConfig,
    args: &SeedArgs,
    runner: &mut dyn CommandRunner,
) -> Result<(), ScriptError> {
    let accounts = AccountIds::derive(&config.base_account())?;
    let near = NearCli::new(config, &accounts);
    let manager = accounts.get(Role::Cron);

    if args.skip_agent {
        warn!("Skipping agent registration");
    } else {
        let agent = accounts.get(Role::Agent);
        send_register_agent(&near, runner, manager, agent, agent)?;
    }

    if args.skip_task {
        warn!("Skipping task creation");
    } else {
        let task = TaskRequest {
            cadence: args.cadence.clone(),
            total_deposit: args.task_amount.clone(),
            ..TaskRequest::sample(accounts.get(Role::Counter))
        };
        send_create_task(&near, runner, manager, accounts.get(Role::User), &task)?;
    }

    Ok(())
}
