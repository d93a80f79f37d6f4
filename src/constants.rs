// src/constants.rs

/// Action name reserved for the root command.
pub const ROOT_ACTION_NAME: &str = "root";

/// Name given to the root command when the configuration omits `name`.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Extension used for command partials when the settings leave it unset.
pub const DEFAULT_PARTIALS_EXTENSION: &str = "sh";

/// Key that pulls another YAML file into the configuration.
pub const IMPORT_KEYWORD: &str = "import";

/// Settings file names looked up in the working directory, in order.
pub const SETTINGS_FILENAMES: [&str; 2] = ["bashly-settings.yml", "settings.yml"];

/// Name of the directory (under the user config dir) holding a fallback settings file.
pub const USER_CONFIG_DIRNAME: &str = "bashgen";

/// Environment variable pointing at an explicit settings file.
pub const SETTINGS_PATH_ENV: &str = "BASHLY_SETTINGS_PATH";

/// Placeholder in `config_path` replaced by the resolved `source_dir`.
pub const SOURCE_DIR_PLACEHOLDER: &str = "%{source_dir}";

/// Literal value stored for boolean (presence-only) flags.
pub const FLAG_PRESENT: &str = "true";

/// Exit code reported for every validation failure.
pub const VALIDATION_EXIT_CODE: i32 = 2;
