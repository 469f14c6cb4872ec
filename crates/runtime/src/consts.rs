//! Well-known paths shared with collaborators.

/// The configuration file the config-loading collaborator resolves,
/// relative to the project root.
pub const CONFIG_FILE_PATH: &str = "tandem.config.json";

/// Where client build output lands, relative to the project root.
pub const DEV_CLIENT_DIR: &str = ".tandem/client";

/// Where server build output lands, relative to the project root.
pub const DEV_SERVER_DIR: &str = ".tandem/server";
