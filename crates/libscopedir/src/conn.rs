use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use tracing::{debug, error};

use crate::error::ScopeDirError;

/// Anchored grammar for `scheme:subprotocol://host:port/databaseName`.
/// Host allows word characters and dots, the port is digits only, and the
/// database name is word characters; anything else is rejected outright.
static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+):(\w+)://([\w.]+):(\d+)/(\w+)$").expect("connection string pattern")
});

/// Parsed form of a JDBC-style connection string.
///
/// Parsing is all-or-nothing: a string either matches the full
/// `scheme:subprotocol://host:port/databaseName` shape or fails with
/// [`ScopeDirError::Format`]. There is no lenient mode and no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdbcUrl {
    /// Leading scheme, e.g. `jdbc`.
    scheme: String,
    /// Driver subprotocol, e.g. `postgresql`.
    subprotocol: String,
    /// Host name or address.
    host: String,
    /// Port, kept textual as it appears in the string.
    port: String,
    /// Database name.
    database: String,
}

impl JdbcUrl {
    /// The leading scheme, e.g. `jdbc`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The driver subprotocol, e.g. `postgresql`.
    pub fn subprotocol(&self) -> &str {
        &self.subprotocol
    }

    /// The host component.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port component, as written (digits only).
    pub fn port(&self) -> &str {
        &self.port
    }

    /// The database name.
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl FromStr for JdbcUrl {
    type Err = ScopeDirError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some(groups) = PATTERN.captures(input) else {
            error!("Invalid connection string: {input}");
            return Err(ScopeDirError::Format {
                input: input.to_string(),
            });
        };

        let url = Self {
            scheme: groups[1].to_string(),
            subprotocol: groups[2].to_string(),
            host: groups[3].to_string(),
            port: groups[4].to_string(),
            database: groups[5].to_string(),
        };
        debug!(
            "Parsed connection string: scheme={} subprotocol={} host={} port={} database={}",
            url.scheme, url.subprotocol, url.host, url.port, url.database
        );
        Ok(url)
    }
}
