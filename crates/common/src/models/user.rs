//! Session user

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level of the current user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    /// Unlocks agent sample listings in the feed and quick-add on the form
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }

    /// Parse a persisted role flag. Anything unrecognised is a plain user.
    pub fn from_flag(value: &str) -> Self {
        match value.trim() {
            "agent" => Role::Agent,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_flag_roundtrip() {
        assert_eq!(Role::from_flag(Role::Agent.as_str()), Role::Agent);
        assert_eq!(Role::from_flag("user"), Role::User);
        assert_eq!(Role::from_flag("admin"), Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
    }
}
