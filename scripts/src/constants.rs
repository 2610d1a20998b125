//! Constants used in the build & deploy scripts

/// The target triple for the WASM build target
pub const WASM_TARGET_TRIPLE: &str = "wasm32-unknown-unknown";

/// Linker flag stripping symbol names from the release artifacts
pub const STRIP_RUSTFLAGS: &str = "-C link-arg=-s";

/// Default directory the compiled artifacts are copied into
pub const DEFAULT_OUT_DIR: &str = "res";

/// Name of the file recording what got deployed where, inside the output dir
pub const DEPLOYED_FILE: &str = "deployed.json";

/// Sub-account used as the base account when none is given, suffixed with the factory
pub const DEFAULT_ACCOUNT_NAME: &str = "croncat";

/// Default NEAR CLI binary
pub const DEFAULT_NEAR_BIN: &str = "near";

/// Default cargo binary
pub const DEFAULT_CARGO_BIN: &str = "cargo";

/// Manager (cron) contract artifact
pub const MANAGER_WASM: &str = "manager.wasm";

/// Counter contract artifact
pub const COUNTER_WASM: &str = "rust_counter_tutorial.wasm";

/// Cross contract demo artifact
pub const CROSS_CONTRACT_WASM: &str = "cross_contract.wasm";

/// Init function exposed by the manager and cross contract
pub const INIT_FUNCTION: &str = "new";

/// Deposit covering the storage of one agent record on the manager, in NEAR
pub const AGENT_REGISTRATION_DEPOSIT: &str = "0.00226";

/// Sample task: method called on the counter contract
pub const SAMPLE_TASK_FUNCTION: &str = "increment";

/// Sample task: hourly, seconds first
pub const SAMPLE_TASK_CADENCE: &str = "0 0 */1 * * *";

/// Sample task: gas attached to each execution
pub const SAMPLE_TASK_GAS: u64 = 2_400_000_000_000;

/// Sample task: total balance funding the task, in NEAR
pub const SAMPLE_TASK_AMOUNT: &str = "1";
