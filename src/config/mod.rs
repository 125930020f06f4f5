//! Config module.
//! Provides configuration types, default paths, XML loading, validation and
//! output-folder preparation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, OnError};
pub use validate::{prepare_output_dirs, validate_and_normalize};
pub use xml::{load_config_from_xml, load_config_from_xml_path};

/// Output layout, relative to the working directory unless overridden.
pub const RESULT_DIR_DEFAULT: &str = "Result";
pub const TARGET_DIR_NAME: &str = "Target Folder";
pub const DETAIL_DIR_NAME: &str = "Detail";
pub const DETAILS_FILE_NAME: &str = "Details.csv";
pub const PERFORMANCE_DIR_NAME: &str = "Performance";
pub const PERFORMANCE_FILE_NAME: &str = "Performance.csv";
pub const LOG_DIR_NAME: &str = "Log Data";
pub const LOG_FILE_NAME: &str = "Log Data.log";
