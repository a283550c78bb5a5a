use serde::{Deserialize, Serialize};
use std::fmt;

/// Database every test run connects to
pub const DATABASE: &str = "testdb";

/// Environment variables read into the record, keyed by record field
pub const ENV_VARIABLES: [(&str, &str); 4] = [
    ("account", "ACCOUNT"),
    ("user", "USER"),
    ("password", "PASSWORD"),
    ("schema", "SCHEMA"),
];

/// Connection settings handed to the test suite
///
/// Unset variables become empty strings; a missing credential is the test
/// suite's problem to report, not ours.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    pub account: String,
    pub user: String,
    pub password: String,
    pub schema: String,
    pub database: String,
}

impl ConnectionParameters {
    /// Read the record from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the record through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let [account, user, password, schema] =
            ENV_VARIABLES.map(|(_, variable)| lookup(variable).unwrap_or_default());

        Self {
            account,
            user,
            password,
            schema,
            database: DATABASE.to_string(),
        }
    }

    /// All five entries in rendering order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("account", self.account.as_str()),
            ("user", self.user.as_str()),
            ("password", self.password.as_str()),
            ("schema", self.schema.as_str()),
            ("database", self.database.as_str()),
        ]
    }

    /// Names of the variables that were empty when the record was read
    pub fn missing_variables(&self) -> Vec<&'static str> {
        ENV_VARIABLES
            .iter()
            .zip(self.entries())
            .filter(|(_, (_, value))| value.is_empty())
            .map(|((_, variable), _)| *variable)
            .collect()
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .field("database", &self.database)
            .finish()
    }
}
