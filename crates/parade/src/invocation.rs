//! The scope a command action executes in.
//!
//! An [`Invocation`] is the explicit replacement for dynamic delegation:
//! instead of named arguments and parameters appearing as ambient methods,
//! actions look everything up through typed accessors, and
//! [`visible_names`](Invocation::visible_names) enumerates exactly what is
//! reachable.

use std::io;

use parade_argv::{Arguments, Command, CommandId, Parameter};

use crate::app::App;
use crate::config::ConfigMap;
use crate::help;
use crate::output::Output;

/// A read view over the application for one routed command.
pub struct Invocation<'a> {
    app: &'a App,
    command: CommandId,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(app: &'a App, command: CommandId) -> Self {
        Self { app, command }
    }

    /// The routed command.
    pub fn command(&self) -> &Command {
        self.app.commands().by_id(self.command)
    }

    /// The command's own bound arguments.
    pub fn args(&self) -> &Arguments {
        self.command().args()
    }

    /// The first value bound to one of the command's named arguments.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args().get(name)
    }

    /// All values bound to one of the command's named arguments.
    pub fn arg_all(&self, name: &str) -> Option<&[String]> {
        self.args().get_all(name)
    }

    /// Looks a parameter up by name or alias: global scope first, then the
    /// routed command's own table.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.app
            .globals()
            .get(name)
            .or_else(|| self.command().params().get(name))
    }

    /// Whether a parameter was supplied on the command line.
    pub fn is_active(&self, name: &str) -> bool {
        self.param(name).is_some_and(Parameter::is_active)
    }

    /// Every name an action can reach: the command's named arguments merged
    /// with its own and the global parameter names. Sorted, deduplicated.
    pub fn visible_names(&self) -> Vec<&str> {
        let command = self.command();
        let mut names: Vec<&str> = command
            .args()
            .spec()
            .names()
            .iter()
            .map(|def| def.name())
            .chain(command.params().iter().map(Parameter::name))
            .chain(self.app.globals().iter().map(Parameter::name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The merged configuration loaded for this run.
    pub fn config(&self) -> &ConfigMap {
        self.app.config()
    }

    /// The regular output sink.
    pub fn out(&self) -> &Output {
        self.app.out()
    }

    /// The error output sink.
    pub fn err(&self) -> &Output {
        self.app.err()
    }

    /// Whether the built-in debug flag is active.
    pub fn debug_enabled(&self) -> bool {
        self.app.debug_enabled()
    }

    /// Whether the built-in verbose flag is active.
    pub fn verbose_enabled(&self) -> bool {
        self.app.verbose_enabled()
    }

    /// Writes a message to the regular sink when the debug flag is active.
    pub fn debug(&self, message: impl AsRef<str>) -> io::Result<()> {
        if self.debug_enabled() {
            self.out().puts(message)?;
        }
        Ok(())
    }

    /// Writes a message to the regular sink when the verbose flag is active.
    pub fn verbose(&self, message: impl AsRef<str>) -> io::Result<()> {
        if self.verbose_enabled() {
            self.out().puts(message)?;
        }
        Ok(())
    }

    /// The application help screen, optionally led by a notice line.
    pub fn help_screen(&self, info: Option<&str>) -> String {
        help::application_help(self.app, info)
    }

    /// The help text for one command, if it exists.
    pub fn command_help(&self, name: &str) -> Option<String> {
        self.app
            .commands()
            .get(name)
            .map(|command| help::command_usage(command, true))
    }
}
