//! `gpsync version`: binary version plus the formats and endpoint it speaks.

use serde::Serialize;

use crate::error::Result;
use crate::remote::DEFAULT_BASE_URL;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    profile: &'static str,
    ledger_schema: i32,
    api: &'static str,
}

impl VersionInfo {
    const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            profile: if cfg!(debug_assertions) { "dev" } else { "release" },
            ledger_schema: CURRENT_SCHEMA_VERSION,
            api: DEFAULT_BASE_URL,
        }
    }

    fn line(&self) -> String {
        format!(
            "gpsync version {} ({}), ledger schema v{}",
            self.version, self.profile, self.ledger_schema
        )
    }
}

/// Print version details, as one JSON object when `json` is set.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let info = VersionInfo::current();
    if json {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{}", info.line());
    }
    Ok(())
}
