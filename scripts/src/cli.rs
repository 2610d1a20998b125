//! Definitions of CLI arguments and commands for the build & deploy scripts

use std::path::PathBuf;

use clap::{builder::FalseyValueParser, Args, Parser, Subcommand};
use tracing::info;

use crate::{
    commands::{
        account_lines, account_status, build_and_deploy, build_contracts, deploy_contracts,
        seed_contracts,
    },
    config::{BuildConfig, DeployConfig, Network},
    constants::{
        DEFAULT_CARGO_BIN, DEFAULT_NEAR_BIN, DEFAULT_OUT_DIR, SAMPLE_TASK_AMOUNT,
        SAMPLE_TASK_CADENCE,
    },
    errors::ScriptError,
    tx::AccountState,
    utils::{CommandRunner, DryRunRunner, SystemRunner},
};

/// Scripts for building & deploying the croncat contracts
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where the contracts get deployed
#[derive(Args)]
pub struct NetworkArgs {
    /// Network to deploy to
    #[arg(long, env = "NEAR_ENV", value_enum, default_value_t = Network::Testnet, global = true)]
    pub network: Network,

    /// Namespace of top-level accounts, derived from the network when unset
    #[arg(long, env = "FACTORY", global = true)]
    pub factory: Option<String>,

    /// Base account, master of every role account. Defaults to `croncat.<factory>`
    #[arg(long, env = "NEAR_ACCT", global = true)]
    pub account: Option<String>,

    /// Balance given to each created account
    #[arg(long, global = true)]
    pub initial_balance: Option<String>,

    /// near CLI binary
    #[arg(long, env = "NEAR_BIN", default_value = DEFAULT_NEAR_BIN, global = true)]
    pub near_bin: String,

    /// JSON-RPC endpoint, the network's public one when unset
    #[arg(long, env = "NEAR_RPC_URL", global = true)]
    pub rpc_url: Option<String>,
}

/// How the contracts get built
#[derive(Args)]
pub struct BuildArgs {
    /// Root of the contracts workspace
    #[arg(long, default_value = ".", global = true)]
    pub contracts_dir: PathBuf,

    /// Directory the artifacts are copied into & deployed from
    #[arg(long, default_value = DEFAULT_OUT_DIR, global = true)]
    pub out_dir: PathBuf,

    /// Strip symbol names from the artifacts
    #[arg(long, env = "STRIP", value_parser = FalseyValueParser::new(), global = true)]
    pub strip: bool,

    /// cargo binary
    #[arg(long, env = "CARGO", default_value = DEFAULT_CARGO_BIN, global = true)]
    pub cargo_bin: String,
}

impl NetworkArgs {
    pub fn deploy_config(&self, out_dir: PathBuf) -> DeployConfig {
        let mut config = DeployConfig::new(self.network)
            .with_factory(self.factory.clone())
            .with_base_account(self.account.clone())
            .with_rpc_url(self.rpc_url.clone());
        config.near_bin = self.near_bin.clone();
        config.out_dir = out_dir;
        config.initial_balance = self.initial_balance.clone();
        config
    }
}

impl BuildArgs {
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            contracts_dir: self.contracts_dir.clone(),
            out_dir: self.out_dir.clone(),
            strip: self.strip,
            cargo_bin: self.cargo_bin.clone(),
        }
    }
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Build the contracts & copy the artifacts into the output dir
    Build {
        /// Print the commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Create the role accounts & deploy the contracts
    Deploy(DeployArgs),
    /// Build, then deploy
    All(DeployArgs),
    /// Print the derived accounts
    Accounts,
    /// Query the on-chain state of the derived accounts
    Status,
    /// Register the agent & create a sample task on the manager
    Seed(SeedArgs),
}

/// Deploy the contracts
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Fail before running anything if an account to create already exists
    #[arg(long)]
    pub preflight: bool,
}

/// Seed the deployed manager
#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Don't register the agent account
    #[arg(long)]
    pub skip_agent: bool,

    /// Don't create the sample task
    #[arg(long)]
    pub skip_task: bool,

    /// Cadence of the sample task
    #[arg(long, default_value = SAMPLE_TASK_CADENCE)]
    pub cadence: String,

    /// NEAR funding the sample task
    #[arg(long, default_value = SAMPLE_TASK_AMOUNT)]
    pub task_amount: String,
}

/// Picks the runner, dry runs never touch the host
fn runner(dry_run: bool) -> Box<dyn CommandRunner> {
    if dry_run {
        Box::new(DryRunRunner::default())
    } else {
        Box::new(SystemRunner)
    }
}

impl Cli {
    /// Run the command
    pub async fn run(self) -> Result<(), ScriptError> {
        let build_config = self.build.build_config();
        let deploy_config = self.network.deploy_config(self.build.out_dir.clone());

        match self.command {
            Command::Build { dry_run } => {
                build_contracts(build_config, runner(dry_run).as_mut())?;
                Ok(())
            }
            Command::Deploy(args) => {
                let mut runner = runner(args.dry_run);
                deploy_contracts(&deploy_config, &args, runner.as_mut()).await
            }
            Command::All(args) => {
                let mut runner = runner(args.dry_run);
                build_and_deploy(build_config, &deploy_config, &args, runner.as_mut()).await
            }
            Command::Accounts => {
                for line in account_lines(&deploy_config)? {
                    println!("{}", line);
                }
                Ok(())
            }
            Command::Status => {
                info!("Querying {}", deploy_config.rpc_url());
                for (account, state) in account_status(&deploy_config).await? {
                    match state {
                        AccountState::Exists { amount } => {
                            println!("{}: exists, {} yoctoNEAR", account, amount)
                        }
                        AccountState::Missing => println!("{}: missing", account),
                    }
                }
                Ok(())
            }
            Command::Seed(args) => {
                info!("Seeding the manager...");
                seed_contracts(&deploy_config, &args, runner(args.dry_run).as_mut())
            }
        }
    }
}
