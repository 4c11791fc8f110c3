//! Argument-vector parsing and command resolution for parade.
//!
//! `parade-argv` is the core of the parade framework: it turns a flat list
//! of command-line strings into a selected command, a set of active global
//! and command-scoped parameters, and the positional arguments bound to
//! each. It is designed to work with any application shell (or none, for
//! embedding in tests and tools).
//!
//! # Features
//!
//! - **Token expansion**: combined short flags (`-dv` → `-d -v`, repeats
//!   collapsed) and `=`-attached values (`--path=/tmp` → `--path /tmp`)
//! - **Command routing**: first matching token wins, with an optional
//!   `__default` command for bare invocations and `--` as the end-of-flags
//!   marker
//! - **Two-tier parameters**: global parameters usable anywhere, plus each
//!   command's own table, with transparent aliases in both
//! - **Argument binding**: fixed, ranged, and unbounded arities; named,
//!   optional, and remainder arguments; per-argument value matchers
//! - **Typed errors**: every way a vector can fail to resolve has its own
//!   [`Error`] variant
//!
//! # Resolution pipeline
//!
//! ```rust
//! use parade_argv::{resolve, ArgSpec, Command, CommandTable, Parameter, ParamTable, TokenStream};
//!
//! let mut globals = ParamTable::new();
//! globals.add(Parameter::flag("debug").aliased("d"))?;
//!
//! let mut commands = CommandTable::new();
//! let mut greet = Command::new("greet", ArgSpec::at_least(0));
//! greet.add_param(Parameter::option("name", ArgSpec::exact(1)))?;
//! commands.add(greet)?;
//!
//! let tokens = TokenStream::new(["-d", "greet", "--name", "Ada"]);
//! let resolution = resolve(tokens, &mut globals, &mut commands)?;
//!
//! assert_eq!(resolution.globals.len(), 1);
//! let greet = commands.by_id(resolution.command);
//! assert_eq!(greet.params().get("name").unwrap().args().at(0), Some("Ada"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The resolver fills binders but never runs user callbacks; the shell
//! activates matched parameters afterwards, in match order, globals first.

mod arguments;
mod command;
mod error;
mod parameter;
mod resolve;
mod tokens;

pub use arguments::{ArgDef, ArgSpec, Arguments, Matcher};
pub use command::{Command, CommandId, CommandTable, ParamId, ParamTable, DEFAULT_COMMAND};
pub use error::{Error, SpecError};
pub use parameter::{ParamKind, Parameter};
pub use resolve::{resolve, Resolution};
pub use tokens::{Token, TokenKind, TokenStream};
