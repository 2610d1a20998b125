//! Account identifiers derived from the base account

use crate::errors::ScriptError;

/// Shortest valid NEAR account id
const MIN_ACCOUNT_ID_LEN: usize = 2;
/// Longest valid NEAR account id
const MAX_ACCOUNT_ID_LEN: usize = 64;

/// The role each derived account plays in the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Hosts the manager contract
    Cron,
    /// Hosts the counter contract, target of the sample task
    Counter,
    /// Executes tasks on behalf of the manager
    Agent,
    /// Owns tasks
    User,
    /// Hosts the cross contract demo
    Crud,
}

impl Role {
    /// All the roles, in creation order
    pub const ALL: [Role; 5] = [Role::Cron, Role::Counter, Role::Agent, Role::User, Role::Crud];

    pub fn prefix(&self) -> &'static str {
        match self {
            Role::Cron => "cron",
            Role::Counter => "counter",
            Role::Agent => "agent",
            Role::User => "user",
            Role::Crud => "crud",
        }
    }

    /// Environment variable exposing the account to child processes
    pub fn env_var(&self) -> &'static str {
        match self {
            Role::Cron => "CRON_ACCOUNT_ID",
            Role::Counter => "COUNTER_ACCOUNT_ID",
            Role::Agent => "AGENT_ACCOUNT_ID",
            Role::User => "USER_ACCOUNT_ID",
            Role::Crud => "CRUD_ACCOUNT_ID",
        }
    }
}

/// The base account and the five accounts derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIds {
    base: String,
    ids: [String; 5],
}

impl AccountIds {
    /// Derive `<prefix>.<base>` for every role
    pub fn derive(base: &str) -> Result<Self, ScriptError> {
        validate_account_id(base)?;

        let ids = Role::ALL.map(|role| format!("{}.{}", role.prefix(), base));
        for id in &ids {
            validate_account_id(id)?;
        }

        Ok(AccountIds {
            base: base.to_string(),
            ids,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, role: Role) -> &str {
        &self.ids[role as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// `NEAR_ACCT` plus one `*_ACCOUNT_ID` variable per role
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![("NEAR_ACCT", self.base.clone())];
        vars.extend(self.iter().map(|(role, id)| (role.env_var(), id.to_string())));
        vars
    }
}

/// Checks an account id against the NEAR naming rules
pub fn validate_account_id(id: &str) -> Result<(), ScriptError> {
    if id.len() < MIN_ACCOUNT_ID_LEN || id.len() > MAX_ACCOUNT_ID_LEN {
        return Err(ScriptError::Configuration(format!(
            "account id {:?} must be between {} and {} characters",
            id, MIN_ACCOUNT_ID_LEN, MAX_ACCOUNT_ID_LEN
        )));
    }

    let is_separator = |c: char| matches!(c, '-' | '_' | '.');
    let mut previous_separator = true;
    for c in id.chars() {
        if is_separator(c) {
            if previous_separator {
                return Err(ScriptError::Configuration(format!(
                    "account id {:?} has a misplaced separator",
                    id
                )));
            }
            previous_separator = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            previous_separator = false;
        } else {
            return Err(ScriptError::Configuration(format!(
                "account id {:?} contains invalid character {:?}",
                id, c
            )));
        }
    }

    if previous_separator {
        return Err(ScriptError::Configuration(format!(
            "account id {:?} ends with a separator",
            id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn derived_ids_are_prefix_dot_base() {
        let accounts = AccountIds::derive("croncat.testnet").unwrap();

        assert_eq!(accounts.get(Role::Cron), "cron.croncat.testnet");
        assert_eq!(accounts.get(Role::Counter), "counter.croncat.testnet");
        assert_eq!(accounts.get(Role::Agent), "agent.croncat.testnet");
        assert_eq!(accounts.get(Role::User), "user.croncat.testnet");
        assert_eq!(accounts.get(Role::Crud), "crud.croncat.testnet");
        for (role, id) in accounts.iter() {
            assert_eq!(id, format!("{}.{}", role.prefix(), accounts.base()));
        }
    }

    #[test]
    fn derived_ids_are_distinct() {
        let accounts = AccountIds::derive("someone.testnet").unwrap();
        let unique: HashSet<&str> = accounts.iter().map(|(_, id)| id).collect();
        assert_eq!(unique.len(), Role::ALL.len());
    }

    #[test]
    fn env_vars_cover_every_role() {
        let accounts = AccountIds::derive("me.testnet").unwrap();
        let vars = accounts.env_vars();

        assert_eq!(vars[0], ("NEAR_ACCT", "me.testnet".to_string()));
        assert!(vars.contains(&("CRON_ACCOUNT_ID", "cron.me.testnet".to_string())));
        assert!(vars.contains(&("CRUD_ACCOUNT_ID", "crud.me.testnet".to_string())));
        assert_eq!(vars.len(), 6);
    }

    #[test]
    fn rejects_invalid_base_accounts() {
        for bad in ["", "a", "Upper.testnet", "double..dot", ".leading", "trailing-", "sp ace"] {
            assert!(
                matches!(validate_account_id(bad), Err(ScriptError::Configuration(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_account_id("a_b-c.d0").is_ok());
    }

    #[test]
    fn rejects_base_too_long_once_prefixed() {
        // 60 characters is a fine base, but `counter.` pushes it over the limit
        let base = format!("{}.testnet", "a".repeat(52));
        assert!(validate_account_id(&base).is_ok());
        assert!(AccountIds::derive(&base).is_err());
    }
}
