//! The application object: tables, settings, and the run sequence.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use console::style;
use parade_argv::{
    resolve, Command, CommandTable, Error, ParamTable, Parameter, Resolution, TokenStream,
};
use tracing::debug;

use crate::builder::AppBuilder;
use crate::config::{ConfigFactory, ConfigMap};
use crate::error::RunError;
use crate::help;
use crate::hooks::{Hooks, RunHook};
use crate::invocation::Invocation;
use crate::output::Output;

/// Application-wide settings collected by the builder.
pub(crate) struct Settings {
    pub(crate) name: String,
    pub(crate) banner: Option<String>,
    pub(crate) colors: bool,
    pub(crate) autohelp: bool,
    pub(crate) help_as_default: bool,
    pub(crate) config_file: Option<String>,
    pub(crate) config_paths: Vec<PathBuf>,
}

impl Settings {
    pub(crate) fn new(name: String) -> Self {
        let config_file = Some(format!("{name}.yml"));
        Self {
            name,
            banner: None,
            colors: true,
            autohelp: true,
            help_as_default: true,
            config_file,
            config_paths: default_config_paths(),
        }
    }
}

/// System directory, home directory, working directory; later entries win
/// when configs merge.
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    #[cfg(windows)]
    if let Some(profile) = std::env::var_os("ALLUSERSPROFILE") {
        paths.push(PathBuf::from(profile));
    }
    #[cfg(not(windows))]
    paths.push(PathBuf::from("/etc"));
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home));
    }
    paths.push(PathBuf::from("."));
    paths
}

/// A command-line application: global parameters, a command table, and the
/// machinery to route an argument vector and run the selected command.
///
/// # Single-threaded design
///
/// An application parses one argument vector, runs one action, and writes
/// its output; everything uses `&mut self` on one thread. Concurrent `run`
/// calls on a shared instance are unsupported; callers wanting them must
/// serialize access themselves.
pub struct App {
    pub(crate) settings: Settings,
    pub(crate) globals: ParamTable,
    pub(crate) commands: CommandTable,
    pub(crate) actions: HashMap<String, RunHook>,
    pub(crate) param_hooks: HashMap<String, RunHook>,
    pub(crate) hooks: Hooks,
    pub(crate) out: Output,
    pub(crate) err: Output,
    pub(crate) config: ConfigMap,
    pub(crate) config_files: Vec<PathBuf>,
    pub(crate) debug: Rc<Cell<bool>>,
    pub(crate) verbose: Rc<Cell<bool>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.settings.name)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates a builder for an application with the given name.
    pub fn builder(name: impl Into<String>) -> AppBuilder {
        AppBuilder::new(name)
    }

    /// The application name.
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// The usage banner (default: `Usage: <name>`).
    pub fn banner(&self) -> String {
        self.settings
            .banner
            .clone()
            .unwrap_or_else(|| format!("Usage: {}", self.settings.name))
    }

    /// The global parameter table.
    pub fn globals(&self) -> &ParamTable {
        &self.globals
    }

    /// The command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Looks up a global parameter by name or alias.
    pub fn global_param(&self, name: &str) -> Option<&Parameter> {
        self.globals.get(name)
    }

    /// Looks up a command by name or alias.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// The configuration merged during the last run.
    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// The configuration files that contributed, in merge order.
    pub fn config_files(&self) -> &[PathBuf] {
        &self.config_files
    }

    /// The regular output sink.
    pub fn out(&self) -> &Output {
        &self.out
    }

    /// The error output sink.
    pub fn err(&self) -> &Output {
        &self.err
    }

    /// Whether the built-in debug flag was activated in the last run.
    pub fn debug_enabled(&self) -> bool {
        self.debug.get()
    }

    /// Whether the built-in verbose flag was activated in the last run.
    pub fn verbose_enabled(&self) -> bool {
        self.verbose.get()
    }

    /// Runs the application, formatting any error to the error sink.
    ///
    /// Returns the process exit status: 0 on success, 1 on error. With
    /// autohelp enabled an unknown command renders the help screen instead
    /// of the plain error.
    pub fn run<I, S>(&mut self, argv: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.execute(argv) {
            Ok(()) => 0,
            Err(RunError::Parse(Error::UnknownCommand(ref name)))
                if self.settings.autohelp && self.commands.id_of("help").is_some() =>
            {
                let info = format!(
                    "The command \"{name}\" is undefined. The following commands are available:"
                );
                let screen = help::application_help(self, Some(&info));
                let _ = self.out.puts(screen);
                1
            }
            Err(err) => {
                self.report_error(&err);
                1
            }
        }
    }

    /// Runs the application, propagating errors unformatted.
    ///
    /// This is the embedding-friendly twin of [`run`](Self::run): the
    /// resolved command's action executes and every failure comes back as a
    /// typed [`RunError`].
    pub fn execute<I, S>(&mut self, argv: I) -> Result<(), RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reset();

        let tokens = TokenStream::new(argv);
        let resolution = resolve(tokens, &mut self.globals, &mut self.commands)?;
        self.load_config()?;

        if let Some(hook) = self.hooks.pre_execute.clone() {
            hook(&Invocation::new(self, resolution.command)).map_err(RunError::Action)?;
        }

        self.activate_params(&resolution)?;

        let command = self.commands.by_id(resolution.command);
        command.args().check_complete()?;
        let name = command.name().to_string();
        debug!(command = %name, "running command action");

        let action = self
            .actions
            .get(&name)
            .cloned()
            .ok_or_else(|| RunError::MissingAction(name.clone()))?;
        action(&Invocation::new(self, resolution.command)).map_err(RunError::Action)?;

        if let Some(hook) = self.hooks.post_execute.clone() {
            hook(&Invocation::new(self, resolution.command)).map_err(RunError::Action)?;
        }
        Ok(())
    }

    /// The activation pass: globals first, then command-locals, in match
    /// order. Each option's completeness is checked before its callback
    /// runs, so callbacks only observe validated arguments.
    fn activate_params(&mut self, resolution: &Resolution) -> Result<(), RunError> {
        for &id in &resolution.globals {
            {
                let param = self.globals.by_id(id);
                if param.is_option() {
                    param.args().check_complete()?;
                }
            }
            self.globals.by_id_mut(id).activate();
            let key = self.globals.by_id(id).name().to_string();
            self.run_param_hook(&key, resolution)?;
        }

        let command_name = self.commands.by_id(resolution.command).name().to_string();
        for &id in &resolution.locals {
            {
                let param = self.commands.by_id(resolution.command).params().by_id(id);
                if param.is_option() {
                    param.args().check_complete()?;
                }
            }
            let command = self.commands.by_id_mut(resolution.command);
            command.params_mut().by_id_mut(id).activate();
            let param_name = command.params().by_id(id).name().to_string();
            self.run_param_hook(&format!("{command_name}.{param_name}"), resolution)?;
        }
        Ok(())
    }

    fn run_param_hook(&self, key: &str, resolution: &Resolution) -> Result<(), RunError> {
        if let Some(hook) = self.param_hooks.get(key).cloned() {
            hook(&Invocation::new(self, resolution.command)).map_err(RunError::Action)?;
        }
        Ok(())
    }

    fn load_config(&mut self) -> Result<(), RunError> {
        let Some(file) = self.settings.config_file.clone() else {
            return Ok(());
        };
        let loaded = ConfigFactory::load(&file, &self.settings.config_paths)?;
        self.config = loaded.values;
        self.config_files = loaded.files;
        Ok(())
    }

    /// Clears every trace of the previous run so repeated runs start fresh.
    fn reset(&mut self) {
        self.globals.reset_all();
        self.commands.reset_all();
        self.debug.set(false);
        self.verbose.set(false);
        self.config.clear();
        self.config_files.clear();
    }

    fn report_error(&self, err: &RunError) {
        let heading = style("Error:").red();
        let _ = self.err.puts(format!("{heading}\n    {err}"));
        if self.debug.get() {
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                let _ = self.err.puts(format!("     at {cause}"));
                source = cause.source();
            }
        }
    }
}
