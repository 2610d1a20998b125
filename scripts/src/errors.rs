//! Definitions of errors that can occur during the execution of the build & deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the build & deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Invalid or inconsistent configuration, caught before any command runs
    Configuration(String),
    /// An external command could not be spawned or exited with a failure status
    CommandFailed(String),
    /// Error collecting or copying the compiled artifacts
    ArtifactCopy(String),
    /// An account that should be created already exists on the network
    AccountExists(String),
    /// Error talking to the network RPC endpoint
    Rpc(String),
    /// Error when reading or writing the output file
    JsonOutputError(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::CommandFailed(s) => write!(f, "command failed: {}", s),
            ScriptError::ArtifactCopy(s) => write!(f, "error copying artifacts: {}", s),
            ScriptError::AccountExists(s) => {
                write!(f, "account {} already exists on the network", s)
            }
            ScriptError::Rpc(s) => write!(f, "error querying rpc: {}", s),
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
        }
    }
}

impl Error for ScriptError {}
