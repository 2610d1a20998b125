use std::{fs, path::Path};

use json::JsonValue;

use crate::errors::ScriptError;

/// A recorded value of `deployed.json`, keyed by role
pub enum OutputKeys {
    /// Account a role got deployed to
    Account { key: &'static str },
    /// Artifact deployed for a role
    Deployment { key: &'static str },
    /// Init function called after the deployment
    Init { key: &'static str },
}

impl OutputKeys {
    fn path(&self) -> (&'static str, &'static str) {
        match self {
            OutputKeys::Account { key } => (*key, "account"),
            OutputKeys::Deployment { key } => (*key, "deploy"),
            OutputKeys::Init { key } => (*key, "init"),
        }
    }
}

/// Read a recorded value
pub fn read_output_file(file_path: &Path, key: OutputKeys) -> Result<String, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(String::from(
            "Deployment file not found",
        )));
    }

    // Parse its json content into objects
    let parsed_json = get_json_from_file(file_path)?;
    let (key, field) = key.path();

    parsed_json[key][field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ScriptError::JsonOutputError(format!("no {} recorded for {}", field, key)))
}

/// Writes the given value for a deployed role, keeping every other key of the file
pub fn write_output_file(file_path: &Path, key: OutputKeys, value: &str) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    // Parse its json content into objects
    let mut parsed_json = get_json_from_file(file_path)?;

    // Update the right key
    let (key, field) = key.path();
    parsed_json[key][field] = JsonValue::String(value.to_string());

    // Write the updated json back to the file
    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
