//! AppBuilder and the declaration-time command/parameter types.
//!
//! The builder collects declarations first and assembles the tables in
//! [`AppBuilder::build`]: aliases are resolved in a second phase once every
//! target exists, so an alias may be declared before the thing it points
//! to, and a dangling alias fails the build instead of surfacing mid-parse.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use parade_argv::{ArgSpec, Command, CommandTable, ParamTable, Parameter, DEFAULT_COMMAND};

use crate::app::{App, Settings};
use crate::config::ConfigMap;
use crate::error::SetupError;
use crate::hooks::{Hooks, RunHook};
use crate::invocation::Invocation;
use crate::output::Output;

/// A flag declaration: a parameter that takes no arguments.
pub struct Flag {
    name: String,
    aliases: Vec<String>,
    hook: Option<RunHook>,
}

impl Flag {
    /// Declares a flag with the given primary name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            hook: None,
        }
    }

    /// Adds an alternate name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Registers a callback invoked when the flag is activated.
    pub fn on_activate(
        mut self,
        hook: impl Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.hook = Some(Rc::new(hook));
        self
    }
}

/// An option declaration: a parameter that takes arguments per its spec.
pub struct Opt {
    name: String,
    aliases: Vec<String>,
    spec: ArgSpec,
    hook: Option<RunHook>,
}

impl Opt {
    /// Declares an option with the given name and argument spec.
    pub fn new(name: impl Into<String>, spec: impl Into<ArgSpec>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            spec: spec.into(),
            hook: None,
        }
    }

    /// Adds an alternate name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Registers a callback invoked when the option is activated.
    pub fn on_activate(
        mut self,
        hook: impl Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.hook = Some(Rc::new(hook));
        self
    }
}

enum ParamDecl {
    Flag(Flag),
    Opt(Opt),
}

/// A command declaration: name, argument spec, own parameters, action.
pub struct CommandDef {
    name: String,
    description: Option<String>,
    aliases: Vec<String>,
    spec: ArgSpec,
    params: Vec<ParamDecl>,
    action: Option<RunHook>,
}

impl CommandDef {
    /// Declares a command. Without [`args`](Self::args) it accepts any
    /// number of positional arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            spec: ArgSpec::at_least(0),
            params: Vec::new(),
            action: None,
        }
    }

    /// Sets the description shown on help screens.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an alternate name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the spec for the command's own positional arguments.
    pub fn args(mut self, spec: impl Into<ArgSpec>) -> Self {
        self.spec = spec.into();
        self
    }

    /// Adds a command-scoped flag.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.params.push(ParamDecl::Flag(flag));
        self
    }

    /// Adds a command-scoped option.
    pub fn option(mut self, opt: Opt) -> Self {
        self.params.push(ParamDecl::Opt(opt));
        self
    }

    /// Sets the code to run when this command is routed. Required.
    pub fn action(
        mut self,
        action: impl Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.action = Some(Rc::new(action));
        self
    }
}

/// Builder for constructing an [`App`].
///
/// # Example
///
/// ```rust
/// use parade::{App, CommandDef, Flag};
///
/// let app = App::builder("demo")
///     .global_flag(Flag::new("force").aliased("f"))
///     .command(
///         CommandDef::new("touch")
///             .describe("Do very little")
///             .action(|inv| Ok(inv.out().puts("touched")?)),
///     )
///     .build()?;
/// # Ok::<(), parade::SetupError>(())
/// ```
pub struct AppBuilder {
    settings: Settings,
    globals: Vec<ParamDecl>,
    global_aliases: Vec<(String, String)>,
    commands: Vec<CommandDef>,
    command_aliases: Vec<(String, String)>,
    default_def: Option<CommandDef>,
    default_name: Option<String>,
    hooks: Hooks,
    out: Option<Output>,
    err: Option<Output>,
}

impl AppBuilder {
    /// Creates a builder for an application with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            settings: Settings::new(name.into()),
            globals: Vec::new(),
            global_aliases: Vec::new(),
            commands: Vec::new(),
            command_aliases: Vec::new(),
            default_def: None,
            default_name: None,
            hooks: Hooks::new(),
            out: None,
            err: None,
        }
    }

    /// Overrides the usage banner (default: `Usage: <name>`).
    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.settings.banner = Some(banner.into());
        self
    }

    /// Enables or disables colored output (default: enabled, subject to
    /// terminal support).
    pub fn colors(mut self, colors: bool) -> Self {
        self.settings.colors = colors;
        self
    }

    /// Whether an unknown command shows the help screen instead of a plain
    /// error (default: enabled).
    pub fn autohelp(mut self, autohelp: bool) -> Self {
        self.settings.autohelp = autohelp;
        self
    }

    /// Whether the built-in help command becomes the default command when
    /// no other default is registered (default: enabled).
    pub fn help_as_default(mut self, help_as_default: bool) -> Self {
        self.settings.help_as_default = help_as_default;
        self
    }

    /// Sets the configuration file name searched for in the config paths
    /// (default: `<name>.yml`).
    pub fn config_file(mut self, file: impl Into<String>) -> Self {
        self.settings.config_file = Some(file.into());
        self
    }

    /// Disables configuration loading entirely.
    pub fn without_config(mut self) -> Self {
        self.settings.config_file = None;
        self
    }

    /// Appends a configuration search path. Later paths win on merge.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.config_paths.push(path.into());
        self
    }

    /// Drops the platform default configuration search paths.
    pub fn clear_config_paths(mut self) -> Self {
        self.settings.config_paths.clear();
        self
    }

    /// Replaces the regular output sink.
    pub fn output(mut self, output: Output) -> Self {
        self.out = Some(output);
        self
    }

    /// Replaces the error output sink.
    pub fn error_output(mut self, output: Output) -> Self {
        self.err = Some(output);
        self
    }

    /// Registers a global flag, usable with any command.
    pub fn global_flag(mut self, flag: Flag) -> Self {
        self.globals.push(ParamDecl::Flag(flag));
        self
    }

    /// Registers a global option, usable with any command.
    pub fn global_option(mut self, opt: Opt) -> Self {
        self.globals.push(ParamDecl::Opt(opt));
        self
    }

    /// Registers an alias for a global parameter, which may be declared
    /// before its target.
    pub fn global_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.global_aliases.push((alias.into(), target.into()));
        self
    }

    /// Registers a command.
    pub fn command(mut self, def: CommandDef) -> Self {
        self.commands.push(def);
        self
    }

    /// Registers an alias for a command, which may be declared before its
    /// target.
    pub fn command_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.command_aliases.push((alias.into(), target.into()));
        self
    }

    /// Makes an existing command the default for bare invocations.
    pub fn default(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    /// Registers a command and makes it the default for bare invocations.
    pub fn default_command(mut self, def: CommandDef) -> Self {
        self.default_def = Some(def);
        self
    }

    /// Replaces the hook set.
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Assembles the application: builds the tables, registers the
    /// built-ins, and resolves all aliases, failing loudly on dangling ones.
    pub fn build(self) -> Result<App, SetupError> {
        if let Some(hook) = &self.hooks.pre_init {
            hook();
        }

        let debug = Rc::new(Cell::new(false));
        let verbose = Rc::new(Cell::new(false));
        let mut globals = ParamTable::new();
        let mut commands = CommandTable::new();
        let mut actions: HashMap<String, RunHook> = HashMap::new();
        let mut param_hooks: HashMap<String, RunHook> = HashMap::new();

        for decl in self.globals {
            add_param(&mut globals, decl, None, &mut param_hooks)?;
        }

        for def in self.commands {
            add_command(&mut commands, def, &mut actions, &mut param_hooks)?;
        }
        if let Some(def) = self.default_def {
            let name = def.name.clone();
            add_command(&mut commands, def, &mut actions, &mut param_hooks)?;
            if name != DEFAULT_COMMAND {
                commands.alias(DEFAULT_COMMAND, &name)?;
            }
        }

        register_builtin_flags(&mut globals, &mut param_hooks, &debug, &verbose)?;
        register_help_command(&mut commands, &mut actions)?;

        for (alias, target) in self.global_aliases {
            globals.alias(alias, &target)?;
        }
        for (alias, target) in self.command_aliases {
            commands.alias(alias, &target)?;
        }
        if let Some(name) = self.default_name {
            if commands.has_default() {
                return Err(SetupError::DuplicateDefault);
            }
            commands.alias(DEFAULT_COMMAND, &name)?;
        }
        if self.settings.help_as_default
            && !commands.has_default()
            && commands.id_of("help").is_some()
        {
            commands.alias(DEFAULT_COMMAND, "help")?;
        }

        let colors = self.settings.colors;
        let app = App {
            settings: self.settings,
            globals,
            commands,
            actions,
            param_hooks,
            hooks: self.hooks.clone(),
            out: self.out.unwrap_or_else(|| Output::stdout(colors)),
            err: self.err.unwrap_or_else(|| Output::stderr(colors)),
            config: ConfigMap::new(),
            config_files: Vec::new(),
            debug,
            verbose,
        };

        if let Some(hook) = &self.hooks.post_init {
            hook();
        }
        Ok(app)
    }
}

fn add_param(
    table: &mut ParamTable,
    decl: ParamDecl,
    command: Option<&str>,
    param_hooks: &mut HashMap<String, RunHook>,
) -> Result<(), SetupError> {
    let (name, aliases, hook, mut param) = match decl {
        ParamDecl::Flag(Flag {
            name,
            aliases,
            hook,
        }) => {
            let param = Parameter::flag(name.clone());
            (name, aliases, hook, param)
        }
        ParamDecl::Opt(Opt {
            name,
            aliases,
            spec,
            hook,
        }) => {
            let param = Parameter::option(name.clone(), spec);
            (name, aliases, hook, param)
        }
    };
    for alias in aliases {
        param = param.aliased(alias);
    }
    table.add(param)?;
    if let Some(hook) = hook {
        let key = match command {
            Some(command) => format!("{command}.{name}"),
            None => name,
        };
        param_hooks.insert(key, hook);
    }
    Ok(())
}

fn add_command(
    commands: &mut CommandTable,
    def: CommandDef,
    actions: &mut HashMap<String, RunHook>,
    param_hooks: &mut HashMap<String, RunHook>,
) -> Result<(), SetupError> {
    let CommandDef {
        name,
        description,
        aliases,
        spec,
        params,
        action,
    } = def;
    let action = action.ok_or_else(|| SetupError::MissingAction(name.clone()))?;

    let mut command = Command::new(name.clone(), spec);
    if let Some(description) = description {
        command = command.describe(description);
    }
    for alias in aliases {
        command = command.aliased(alias);
    }
    for decl in params {
        add_param(command.params_mut(), decl, Some(&name), param_hooks)?;
    }
    actions.insert(name, action);
    commands.add(command)?;
    Ok(())
}

fn register_builtin_flags(
    globals: &mut ParamTable,
    param_hooks: &mut HashMap<String, RunHook>,
    debug: &Rc<Cell<bool>>,
    verbose: &Rc<Cell<bool>>,
) -> Result<(), SetupError> {
    if globals.id_of("debug").is_none() {
        let mut flag = Parameter::flag("debug");
        if globals.id_of("d").is_none() {
            flag = flag.aliased("d");
        }
        globals.add(flag)?;
        let debug = debug.clone();
        param_hooks.insert(
            "debug".to_string(),
            Rc::new(move |_inv| {
                debug.set(true);
                Ok(())
            }),
        );
    }
    if globals.id_of("verbose").is_none() {
        let mut flag = Parameter::flag("verbose");
        if globals.id_of("v").is_none() {
            flag = flag.aliased("v");
        }
        globals.add(flag)?;
        let verbose = verbose.clone();
        param_hooks.insert(
            "verbose".to_string(),
            Rc::new(move |_inv| {
                verbose.set(true);
                Ok(())
            }),
        );
    }
    Ok(())
}

fn register_help_command(
    commands: &mut CommandTable,
    actions: &mut HashMap<String, RunHook>,
) -> Result<(), SetupError> {
    if commands.id_of("help").is_some() {
        return Ok(());
    }
    let help = Command::new("help", 0usize..=1)
        .describe("Show help for the application or a single command");
    commands.add(help)?;
    actions.insert(
        "help".to_string(),
        Rc::new(|inv| {
            let screen = match inv.args().at(0) {
                Some(name) => match inv.command_help(name) {
                    Some(text) => text,
                    None => inv.help_screen(Some(&format!(
                        "The command \"{name}\" is undefined. The following commands are available:"
                    ))),
                },
                None => inv.help_screen(None),
            };
            inv.out().puts(screen)?;
            Ok(())
        }),
    );
    Ok(())
}
