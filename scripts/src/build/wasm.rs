use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{info, warn};

use crate::{
    config::BuildConfig, constants::WASM_TARGET_TRIPLE, errors::ScriptError,
    utils::CommandRunner,
};

/// Builds every contract of the contracts workspace to WASM and collects the artifacts
pub struct WasmBuilder {
    config: BuildConfig,
}

impl WasmBuilder {
    pub fn new(config: BuildConfig) -> Self {
        WasmBuilder { config }
    }

    /// Full build, returning the artifacts copied into the output dir
    pub fn build(&self, runner: &mut dyn CommandRunner) -> Result<Vec<PathBuf>, ScriptError> {
        fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| ScriptError::ArtifactCopy(e.to_string()))?;

        runner.run("build contracts", self.build_command())?;

        if !runner.executes() {
            warn!("Dry run, skipping the artifacts copy");
            return Ok(Vec::new());
        }
        self.copy_artifacts()
    }

    /// The compiler invocation
    pub fn build_command(&self) -> Command {
        let mut build_cmd = Command::new(&self.config.cargo_bin);
        // Set the working directory to the workspace root
        build_cmd.current_dir(&self.config.contracts_dir);
        build_cmd.arg("build");
        // Every contract of the workspace
        build_cmd.arg("--all");
        build_cmd.arg("--target");
        build_cmd.arg(WASM_TARGET_TRIPLE);
        build_cmd.arg("--release");
        // Strip symbol names unless asked to keep them
        build_cmd.env("RUSTFLAGS", self.config.rustflags());

        build_cmd
    }

    /// Where cargo leaves the release artifacts
    pub fn release_dir(&self) -> PathBuf {
        self.config
            .contracts_dir
            .join("target")
            .join(WASM_TARGET_TRIPLE)
            .join("release")
    }

    /// Copy every wasm file of the release dir into the output dir
    pub fn copy_artifacts(&self) -> Result<Vec<PathBuf>, ScriptError> {
        fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| ScriptError::ArtifactCopy(e.to_string()))?;

        let release_dir = self.release_dir();
        let mut artifacts = find_wasm_files(&release_dir)?;
        if artifacts.is_empty() {
            return Err(ScriptError::ArtifactCopy(format!(
                "no wasm file found in {}",
                release_dir.display()
            )));
        }
        artifacts.sort();

        let mut copied = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            // `find_wasm_files` only returns files, which always have a name
            let Some(file_name) = artifact.file_name() else {
                continue;
            };
            let destination = self.config.out_dir.join(file_name);
            fs::copy(&artifact, &destination)
                .map_err(|e| ScriptError::ArtifactCopy(format!("{}: {}", artifact.display(), e)))?;
            info!("Copied {} to {}", artifact.display(), destination.display());
            copied.push(destination);
        }

        Ok(copied)
    }
}

/// Lists the `.wasm` files directly inside `dir`
fn find_wasm_files(dir: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactCopy(format!("{}: {}", dir.display(), e)))?;

    Ok(entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && path.extension().is_some_and(|ext| ext == "wasm")).then_some(path)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use tempfile::tempdir;

    use super::*;
    use crate::utils::DryRunRunner;

    fn builder(contracts_dir: &Path, out_dir: &Path, strip: bool) -> WasmBuilder {
        WasmBuilder::new(BuildConfig {
            contracts_dir: contracts_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            strip,
            ..BuildConfig::default()
        })
    }

    fn rustflags(cmd: &Command) -> Option<&OsStr> {
        cmd.get_envs()
            .find(|(key, _)| *key == "RUSTFLAGS")
            .and_then(|(_, value)| value)
    }

    #[test]
    fn build_command_targets_wasm_release() {
        let dir = tempdir().unwrap();
        let cmd = builder(dir.path(), &dir.path().join("res"), false).build_command();

        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args,
            ["build", "--all", "--target", "wasm32-unknown-unknown", "--release"]
        );
        assert_eq!(cmd.get_current_dir(), Some(dir.path()));
    }

    #[test]
    fn strips_symbols_only_when_asked() {
        let dir = tempdir().unwrap();

        let kept = builder(dir.path(), dir.path(), false).build_command();
        assert_eq!(rustflags(&kept), Some(OsStr::new("")));

        let stripped = builder(dir.path(), dir.path(), true).build_command();
        assert_eq!(rustflags(&stripped), Some(OsStr::new("-C link-arg=-s")));
    }

    #[test]
    fn copies_only_wasm_files() {
        let contracts = tempdir().unwrap();
        let out = contracts.path().join("res");
        let builder = builder(contracts.path(), &out, false);

        let release = builder.release_dir();
        fs::create_dir_all(&release).unwrap();
        fs::write(release.join("manager.wasm"), b"\0asm").unwrap();
        fs::write(release.join("cross_contract.wasm"), b"\0asm").unwrap();
        fs::write(release.join("manager.d"), b"deps").unwrap();

        let copied = builder.copy_artifacts().unwrap();
        assert_eq!(
            copied,
            vec![out.join("cross_contract.wasm"), out.join("manager.wasm")]
        );
        assert!(!out.join("manager.d").exists());

        // Running it again over an existing output dir is fine
        assert_eq!(builder.copy_artifacts().unwrap().len(), 2);
    }

    #[test]
    fn missing_artifacts_is_an_error() {
        let contracts = tempdir().unwrap();
        let builder = builder(contracts.path(), &contracts.path().join("res"), false);
        fs::create_dir_all(builder.release_dir()).unwrap();

        assert!(matches!(
            builder.copy_artifacts(),
            Err(ScriptError::ArtifactCopy(_))
        ));
    }

    #[test]
    fn dry_run_creates_out_dir_and_skips_copy() {
        let contracts = tempdir().unwrap();
        let out = contracts.path().join("res");
        let mut runner = DryRunRunner::default();

        let copied = builder(contracts.path(), &out, false)
            .build(&mut runner)
            .unwrap();

        assert!(copied.is_empty());
        assert!(out.is_dir());
        assert_eq!(
            runner.commands,
            vec!["cargo build --all --target wasm32-unknown-unknown --release"]
        );
    }
}
