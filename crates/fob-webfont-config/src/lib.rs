//! Configuration for the fob webfont plugin.
//!
//! [`WebfontOptions`] is the user-facing option set. Construction-time checks
//! live in [`validation`]; options-file handling lives in [`loading`] and
//! [`discovery`].

pub mod discovery;
pub mod error;
pub mod loading;
pub mod options;
pub mod validation;

pub use discovery::{ConfigDiscovery, CONFIG_FILE_NAMES};
pub use error::{ConfigError, Result};
pub use loading::{is_data_file, load_options_file};
pub use options::{
    Destination, FilesPattern, FontFormat, TemplateKind, WebfontOptions, BUILTIN_TEMPLATES,
};
pub use validation::{validate, validate_fs, ConfigValidator, FsValidator, SchemaValidator};
