use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::LarchConfig;

/// JSON schema for `larch.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(LarchConfig)
}

/// [`json_schema`] rendered as pretty-printed JSON.
pub fn json_schema_string() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json_schema())
}
