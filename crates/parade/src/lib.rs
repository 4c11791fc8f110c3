//! parade: a command-line application framework.
//!
//! A host program declares named commands, flags, and options; parade parses
//! the raw argument vector into a routed invocation with validated, typed
//! arguments and runs the selected command's action. The parsing and
//! resolution core lives in [`parade-argv`](parade_argv) and is re-exported
//! here.
//!
//! # Example
//!
//! ```rust
//! use parade::{App, ArgDef, ArgSpec, CommandDef, Flag, Opt};
//!
//! let mut app = App::builder("greeter")
//!     .without_config()
//!     .command(
//!         CommandDef::new("greet")
//!             .describe("Greet someone")
//!             .option(Opt::new(
//!                 "name",
//!                 ArgSpec::named([ArgDef::new("who")])?,
//!             ))
//!             .action(|inv| {
//!                 let who = inv
//!                     .param("name")
//!                     .and_then(|p| p.args().get("who"))
//!                     .unwrap_or("world");
//!                 Ok(inv.out().puts(format!("Hello, {who}!"))?)
//!             }),
//!     )
//!     .build()?;
//!
//! let status = app.run(["greet", "--name", "Ada"]);
//! assert_eq!(status, 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # What the framework adds on top of the core
//!
//! - **[`App`] + [`AppBuilder`]**: an explicit application object; no
//!   process-wide singletons. The builder collects declarations and
//!   resolves aliases in a second phase, failing loudly on dangling ones.
//! - **Built-ins**: `--debug`/`-d` and `--verbose`/`-v` global flags and a
//!   `help` command (default command when nothing else claims that role).
//! - **[`Invocation`]**: the explicit scope handed to actions and
//!   activation callbacks; named arguments, parameters, config, and output
//!   are reached through typed lookups.
//! - **[`Output`]**: swappable output/error sinks with write-time color
//!   filtering.
//! - **[`ConfigFactory`]**: YAML/JSON/INI configuration merged across
//!   search paths, consulted after parsing.
//! - **[`Hooks`]**: pre/post init and execute call-outs.
//!
//! Two error surfaces exist on purpose: [`App::run`] formats errors to the
//! error sink and returns a process exit status, while [`App::execute`]
//! propagates a typed [`RunError`] for embedding and tests.

mod app;
mod builder;
mod config;
mod error;
mod help;
mod hooks;
mod invocation;
mod output;

pub use app::App;
pub use builder::{AppBuilder, CommandDef, Flag, Opt};
pub use config::{ConfigError, ConfigFactory, ConfigMap, LoadedConfig};
pub use error::{RunError, SetupError};
pub use hooks::Hooks;
pub use invocation::Invocation;
pub use output::{CaptureBuffer, Output};

// The parsing core, re-exported for direct use and embedding.
pub use parade_argv::{
    resolve, ArgDef, ArgSpec, Arguments, Command, CommandId, CommandTable, Error, Matcher,
    ParamId, ParamKind, ParamTable, Parameter, Resolution, SpecError, Token, TokenKind,
    TokenStream, DEFAULT_COMMAND,
};
