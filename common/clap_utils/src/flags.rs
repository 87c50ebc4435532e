//! CLI flags used across the code base can be located here.

pub const SPEC_FLAG: &str = "spec";
pub const SPEC_CONFIG_FLAG: &str = "spec-config";
pub const TESTNET_DIR_FLAG: &str = "testnet-dir";
pub const LOG_FORMAT_FLAG: &str = "log-format";
pub const DEBUG_LEVEL_FLAG: &str = "debug-level";
