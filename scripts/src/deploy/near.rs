use std::{
    path::{Path, PathBuf},
    process::Command,
};

use json::JsonValue;

use crate::{accounts::AccountIds, config::DeployConfig};

/// Initialization entry point invoked right after a deployment
#[derive(Debug, Clone, PartialEq)]
pub struct InitCall {
    pub function: String,
    pub args: JsonValue,
}

impl InitCall {
    pub fn new(function: &str, args: JsonValue) -> Self {
        InitCall {
            function: function.to_string(),
            args,
        }
    }
}

/// A contract call signed by one of the accounts
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub contract: String,
    pub method: String,
    pub args: JsonValue,
    pub signer: String,
    /// NEAR attached to the call
    pub amount: Option<String>,
    pub gas: Option<u64>,
}

/// Builds the near CLI invocations, all sharing the network & account environment
#[derive(Debug, Clone)]
pub struct NearCli {
    bin: String,
    artifacts_dir: PathBuf,
    envs: Vec<(&'static str, String)>,
}

impl NearCli {
    pub fn new(config: &DeployConfig, accounts: &AccountIds) -> Self {
        let mut envs = vec![
            ("NEAR_ENV", config.network.as_str().to_string()),
            ("FACTORY", config.factory().to_string()),
        ];
        envs.extend(accounts.env_vars());

        NearCli {
            bin: config.near_bin.clone(),
            artifacts_dir: config.out_dir.clone(),
            envs,
        }
    }

    /// Path of an artifact in the output dir
    pub fn artifact_path(&self, artifact: &str) -> PathBuf {
        self.artifacts_dir.join(artifact)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.envs(self.envs.iter().map(|(key, value)| (*key, value)));
        cmd
    }

    /// `near create-account <account> --masterAccount <master>`
    pub fn create_account(
        &self,
        account: &str,
        master: &str,
        initial_balance: Option<&str>,
    ) -> Command {
        let mut cmd = self.command();
        cmd.args(["create-account", account, "--masterAccount", master]);
        if let Some(balance) = initial_balance {
            cmd.args(["--initialBalance", balance]);
        }
        cmd
    }

    /// `near deploy --wasmFile <wasm> --accountId <account>`, with the init call if any
    pub fn deploy(&self, wasm_file: &Path, account: &str, init: Option<&InitCall>) -> Command {
        let mut cmd = self.command();
        cmd.arg("deploy");
        cmd.arg("--wasmFile");
        cmd.arg(wasm_file);
        cmd.args(["--accountId", account]);
        if let Some(init) = init {
            cmd.args(["--initFunction", init.function.as_str()]);
            cmd.arg("--initArgs");
            cmd.arg(init.args.dump());
        }
        cmd
    }

    /// `near call <contract> <method> <args> --accountId <signer>`
    pub fn call(&self, call: &FunctionCall) -> Command {
        let mut cmd = self.command();
        cmd.args(["call", call.contract.as_str(), call.method.as_str()]);
        cmd.arg(call.args.dump());
        cmd.args(["--accountId", call.signer.as_str()]);
        if let Some(amount) = &call.amount {
            cmd.args(["--amount", amount.as_str()]);
        }
        if let Some(gas) = call.gas {
            cmd.arg("--gas");
            cmd.arg(gas.to_string());
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;

    fn near_cli() -> NearCli {
        let config = DeployConfig::new(Network::Testnet);
        let accounts = AccountIds::derive(&config.base_account()).unwrap();
        NearCli::new(&config, &accounts)
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    fn env(cmd: &Command, key: &str) -> Option<String> {
        cmd.get_envs()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v)
            .map(|v| v.to_string_lossy().into_owned())
    }

    #[test]
    fn create_account_uses_master() {
        let near = near_cli();
        let cmd = near.create_account("cron.croncat.testnet", "croncat.testnet", None);

        assert_eq!(cmd.get_program(), "near");
        assert_eq!(
            args(&cmd),
            ["create-account", "cron.croncat.testnet", "--masterAccount", "croncat.testnet"]
        );

        let cmd = near.create_account("cron.croncat.testnet", "croncat.testnet", Some("5"));
        assert!(args(&cmd).ends_with(&["--initialBalance".to_string(), "5".to_string()]));
    }

    #[test]
    fn commands_carry_network_environment() {
        let cmd = near_cli().create_account("user.croncat.testnet", "croncat.testnet", None);

        assert_eq!(env(&cmd, "NEAR_ENV").as_deref(), Some("testnet"));
        assert_eq!(env(&cmd, "FACTORY").as_deref(), Some("testnet"));
        assert_eq!(env(&cmd, "NEAR_ACCT").as_deref(), Some("croncat.testnet"));
        assert_eq!(
            env(&cmd, "AGENT_ACCOUNT_ID").as_deref(),
            Some("agent.croncat.testnet")
        );
    }

    #[test]
    fn deploy_with_init_args() {
        let near = near_cli();
        let mut init_args = JsonValue::new_object();
        init_args["cron"] = "cron.croncat.testnet".into();
        let init = InitCall::new("new", init_args);

        let cmd = near.deploy(
            &near.artifact_path("cross_contract.wasm"),
            "crud.croncat.testnet",
            Some(&init),
        );
        assert_eq!(
            args(&cmd),
            [
                "deploy",
                "--wasmFile",
                "res/cross_contract.wasm",
                "--accountId",
                "crud.croncat.testnet",
                "--initFunction",
                "new",
                "--initArgs",
                r#"{"cron":"cron.croncat.testnet"}"#,
            ]
        );
    }

    #[test]
    fn deploy_without_init() {
        let near = near_cli();
        let cmd = near.deploy(
            &near.artifact_path("rust_counter_tutorial.wasm"),
            "counter.croncat.testnet",
            None,
        );
        assert_eq!(args(&cmd).len(), 5);
    }

    #[test]
    fn call_with_deposit_and_gas() {
        let call = FunctionCall {
            contract: "cron.croncat.testnet".into(),
            method: "register_agent".into(),
            args: JsonValue::new_object(),
            signer: "agent.croncat.testnet".into(),
            amount: Some("0.00226".into()),
            gas: Some(30_000_000_000_000),
        };

        assert_eq!(
            args(&near_cli().call(&call)),
            [
                "call",
                "cron.croncat.testnet",
                "register_agent",
                "{}",
                "--accountId",
                "agent.croncat.testnet",
                "--amount",
                "0.00226",
                "--gas",
                "30000000000000",
            ]
        );
    }
}
