//! Error types for argument parsing and resolution.

/// Errors raised while resolving an argument vector against the declared
/// command and parameter tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No command token was found and no default command is registered.
    #[error("You did not specify a command and there is no default command.")]
    NoDefaultCommand,

    /// A positional token matched no known command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A dash-prefixed token matched no global or command-local parameter.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A parameter or command is missing one or more required arguments.
    #[error("Parameter {0} is missing one or more arguments.")]
    MissingArgument(String),

    /// A parameter or command was supplied with more arguments than it takes.
    #[error("Parameter {0} has one or more extra arguments.")]
    ExtraArgument(String),

    /// A bound argument value failed its validation matchers.
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Errors raised while declaring argument specifications or building the
/// command and parameter tables.
///
/// These surface at declaration time, before any argument vector is parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// An optional named argument was declared before a required one.
    #[error("optional argument '{0}' must not precede required arguments")]
    OptionalBeforeRequired(String),

    /// A remainder argument was declared in a non-final position.
    #[error("remainder argument '{0}' must be declared last")]
    RemainderNotLast(String),

    /// The same argument name was declared twice in one specification.
    #[error("duplicate argument name: {0}")]
    DuplicateArgName(String),

    /// A name or alias collides with an existing entry in its table.
    #[error("duplicate name in table: {0}")]
    DuplicateName(String),

    /// An alias was registered for a name that is not in the table.
    #[error("alias '{alias}' points to unknown name '{target}'")]
    UnknownAliasTarget {
        /// The alias being registered.
        alias: String,
        /// The name it should have resolved to.
        target: String,
    },
}
