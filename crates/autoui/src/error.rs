//! # AutoUI Error Types
//!
//! Fatal problems abort a build and surface as [`AutoUiError`]. Non-fatal
//! problems are logged and collected as [`Diagnostic`]s in the pass reports.

use std::path::PathBuf;

use autoui_widgets::WidgetId;
use thiserror::Error;

/// Invalid structural metadata on a view-model type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A collection property names no selected-index companion.
    #[error("collection property {type_name}.{member} has no selected-index companion")]
    MissingSelectedIndex {
        /// Declaring type.
        type_name: &'static str,
        /// Offending member.
        member: &'static str,
    },

    /// A layout group is neither horizontal nor vertical.
    #[error("layout group {type_name}.{member} uses unsupported variant {variant}")]
    UnsupportedLayoutGroup {
        /// Declaring type.
        type_name: &'static str,
        /// Offending member.
        member: &'static str,
        /// The variant found.
        variant: &'static str,
    },

    /// A marker sits on a member of the wrong kind or type.
    #[error("{marker} marker on {type_name}.{member} requires {expected}")]
    MarkerMismatch {
        /// Declaring type.
        type_name: &'static str,
        /// Offending member.
        member: &'static str,
        /// Marker name.
        marker: &'static str,
        /// What the marker needs.
        expected: &'static str,
    },

    /// A layout group contains its own type.
    #[error("layout group {type_name}.{member} nests {type_name} inside itself")]
    RecursiveLayoutGroup {
        /// Declaring type.
        type_name: &'static str,
        /// Offending member.
        member: &'static str,
    },
}

/// Unreadable or invalid registry configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML did not match the expected schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors returned by AutoUI operations.
#[derive(Error, Debug)]
pub enum AutoUiError {
    /// Invalid view-model metadata (fatal, aborts the build).
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Invalid registry configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A widget carries no binding of the requested kind.
    #[error("widget {widget} has no {expected} binding")]
    NotBound {
        /// Widget addressed.
        widget: WidgetId,
        /// Binding kind looked for.
        expected: &'static str,
    },

    /// A binding's view model or member could not be reached.
    #[error("cannot resolve {key}")]
    Unresolved {
        /// Binding key that failed.
        key: String,
    },
}

/// Result type for AutoUI operations.
pub type AutoUiResult<T> = Result<T, AutoUiError>;

/// Non-fatal problem found during a pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A property editor or dependency could not be found.
    #[error("missing collaborator for {member}: {what}")]
    MissingCollaborator {
        /// Member affected.
        member: String,
        /// What was missing.
        what: String,
    },

    /// A record's view model resolved to nothing.
    #[error("view model for {key} is null; widget left hidden")]
    NullViewModel {
        /// Binding key of the skipped record.
        key: String,
    },

    /// A change-handler dependency cannot raise the notification.
    #[error("{sender} cannot notify handler {handler}")]
    UnsupportedSender {
        /// Dependency type.
        sender: &'static str,
        /// Handler method.
        handler: String,
    },
}
