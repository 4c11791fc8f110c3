//! Error types for application setup and runs.

use parade_argv::SpecError;

use crate::config::ConfigError;

/// Errors raised while declaring and building an application.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A command was declared without an action.
    #[error("command '{0}' was declared without an action")]
    MissingAction(String),

    /// Two commands were registered as the default.
    #[error("a default command is already registered")]
    DuplicateDefault,

    /// An invalid argument spec, duplicate name, or dangling alias.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Errors surfaced by [`App::execute`](crate::App::execute).
///
/// [`App::run`](crate::App::run) catches these, formats them to the error
/// sink, and exits with a non-zero status instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The argument vector did not resolve.
    #[error(transparent)]
    Parse(#[from] parade_argv::Error),

    /// A configuration file failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The routed command has no registered action.
    #[error("command '{0}' has no action")]
    MissingAction(String),

    /// A hook or command action failed.
    #[error(transparent)]
    Action(anyhow::Error),
}
