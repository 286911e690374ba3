use super::Error;

pub const MISMATCHED_CLOSE: &str = "mismatched close tag";
pub const INVALID_PARAMETER: &str = "invalid parameter";
pub const INVALID_PATH: &str = "invalid path";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const MISSING_PARTIAL: &str = "missing partial";

/// Return an [`Error`] explaining that a write to the output buffer failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build("write failure").with_help("failed to write render output, are you low on memory?")
}

/// Return an [`Error`] explaining that the given data could not be
/// serialized for rendering.
pub fn error_serialize() -> Error {
    Error::build("unserializable data")
        .with_help("context data must serialize to a `serde_json::Value`")
}
