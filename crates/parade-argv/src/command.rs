//! Commands and the name/alias tables for commands and parameters.
//!
//! Both tables are arena-backed: the entries live in a `Vec` and a string
//! index maps every name *and* every alias to the same entry, so activating
//! a parameter through an alias is indistinguishable from using its primary
//! name. Aliases are resolved eagerly when registered; the application
//! builder performs its two-phase resolution before anything is parsed.

use std::collections::HashMap;

use crate::arguments::{ArgSpec, Arguments};
use crate::error::SpecError;
use crate::parameter::Parameter;

/// The reserved name of the command that runs when no command token is
/// present in the argument vector.
pub const DEFAULT_COMMAND: &str = "__default";

/// Stable handle to a parameter within its owning table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub(crate) usize);

/// Stable handle to a command within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

/// A table of parameters in one scope (global, or one command's own).
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    params: Vec<Parameter>,
    index: HashMap<String, ParamId>,
}

impl ParamTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, indexing its name and all declared aliases.
    pub fn add(&mut self, param: Parameter) -> Result<ParamId, SpecError> {
        let id = ParamId(self.params.len());
        self.insert_key(param.name().to_string(), id)?;
        for alias in param.aliases() {
            self.insert_key(alias.clone(), id)?;
        }
        self.params.push(param);
        Ok(id)
    }

    /// Registers an alias for an existing parameter.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<(), SpecError> {
        let alias = alias.into();
        let id = self
            .index
            .get(target)
            .copied()
            .ok_or_else(|| SpecError::UnknownAliasTarget {
                alias: alias.clone(),
                target: target.to_string(),
            })?;
        self.insert_key(alias.clone(), id)?;
        self.params[id.0].push_alias(alias);
        Ok(())
    }

    fn insert_key(&mut self, key: String, id: ParamId) -> Result<(), SpecError> {
        if self.index.contains_key(&key) {
            return Err(SpecError::DuplicateName(key));
        }
        self.index.insert(key, id);
        Ok(())
    }

    /// Looks a parameter up by name or alias.
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.id_of(key).map(|id| &self.params[id.0])
    }

    /// The handle for a name or alias.
    pub fn id_of(&self, key: &str) -> Option<ParamId> {
        self.index.get(key).copied()
    }

    /// The parameter behind a handle.
    pub fn by_id(&self, id: ParamId) -> &Parameter {
        &self.params[id.0]
    }

    /// Mutable access to the parameter behind a handle, for activation and
    /// argument binding.
    pub fn by_id_mut(&mut self, id: ParamId) -> &mut Parameter {
        &mut self.params[id.0]
    }

    /// Iterates over the distinct parameters (not one entry per alias).
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// The number of distinct parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the table holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Deactivates every parameter and clears its bound arguments.
    pub fn reset_all(&mut self) {
        for param in &mut self.params {
            param.reset();
        }
    }
}

/// A named, invokable unit owning its own parameter table and binder.
///
/// The command's action lives in the application shell; the core holds the
/// data the resolver needs.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    description: Option<String>,
    aliases: Vec<String>,
    params: ParamTable,
    args: Arguments,
}

impl Command {
    /// Creates a command with the given argument spec for its own
    /// positional arguments.
    pub fn new(name: impl Into<String>, spec: impl Into<ArgSpec>) -> Self {
        let name = name.into();
        let args = Arguments::new(name.clone(), spec.into());
        Self {
            name,
            description: None,
            aliases: Vec::new(),
            params: ParamTable::new(),
            args,
        }
    }

    /// Sets the description shown on help screens.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an alternate name, builder style.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Registers a parameter in this command's own scope.
    pub fn add_param(&mut self, param: Parameter) -> Result<ParamId, SpecError> {
        self.params.add(param)
    }

    /// The command's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All alternate names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub(crate) fn push_alias(&mut self, alias: String) {
        self.aliases.push(alias);
    }

    /// The command's own parameter table.
    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// Mutable access to the command's own parameter table.
    pub fn params_mut(&mut self) -> &mut ParamTable {
        &mut self.params
    }

    /// The command's own positional-argument binder.
    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub(crate) fn args_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }

    /// Resets the command's binder and every owned parameter.
    pub fn reset(&mut self) {
        self.args.reset();
        self.params.reset_all();
    }
}

/// The table of every invokable command, indexed by name and alias.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<Command>,
    index: HashMap<String, CommandId>,
}

impl CommandTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command, indexing its name and all declared aliases.
    pub fn add(&mut self, command: Command) -> Result<CommandId, SpecError> {
        let id = CommandId(self.commands.len());
        self.insert_key(command.name().to_string(), id)?;
        for alias in command.aliases() {
            self.insert_key(alias.clone(), id)?;
        }
        self.commands.push(command);
        Ok(id)
    }

    /// Registers an alias for an existing command. Aliasing
    /// [`DEFAULT_COMMAND`] to a command makes it the default.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<(), SpecError> {
        let alias = alias.into();
        let id = self
            .index
            .get(target)
            .copied()
            .ok_or_else(|| SpecError::UnknownAliasTarget {
                alias: alias.clone(),
                target: target.to_string(),
            })?;
        self.insert_key(alias.clone(), id)?;
        if alias != DEFAULT_COMMAND {
            self.commands[id.0].push_alias(alias);
        }
        Ok(())
    }

    fn insert_key(&mut self, key: String, id: CommandId) -> Result<(), SpecError> {
        if self.index.contains_key(&key) {
            return Err(SpecError::DuplicateName(key));
        }
        self.index.insert(key, id);
        Ok(())
    }

    /// Looks a command up by name or alias.
    pub fn get(&self, key: &str) -> Option<&Command> {
        self.id_of(key).map(|id| &self.commands[id.0])
    }

    /// The handle for a name or alias.
    pub fn id_of(&self, key: &str) -> Option<CommandId> {
        self.index.get(key).copied()
    }

    /// The command behind a handle.
    pub fn by_id(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Mutable access to the command behind a handle.
    pub fn by_id_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.commands[id.0]
    }

    /// Whether a default command is registered.
    pub fn has_default(&self) -> bool {
        self.index.contains_key(DEFAULT_COMMAND)
    }

    /// Iterates over the distinct commands.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// The number of distinct commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the table holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resets every command's binder and parameters.
    pub fn reset_all(&mut self) {
        for command in &mut self.commands {
            command.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_same_parameter() {
        let mut table = ParamTable::new();
        let id = table.add(Parameter::flag("debug").aliased("d")).unwrap();
        assert_eq!(table.id_of("debug"), Some(id));
        assert_eq!(table.id_of("d"), Some(id));

        table.alias("dbg", "d").unwrap();
        assert_eq!(table.id_of("dbg"), Some(id));
        assert_eq!(table.by_id(id).aliases(), ["d", "dbg"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut table = ParamTable::new();
        table.add(Parameter::flag("debug")).unwrap();
        let err = table.add(Parameter::flag("verbose").aliased("debug"));
        assert!(matches!(err, Err(SpecError::DuplicateName(_))));
    }

    #[test]
    fn dangling_alias_fails_loudly() {
        let mut table = ParamTable::new();
        let err = table.alias("d", "debug").unwrap_err();
        assert!(matches!(err, SpecError::UnknownAliasTarget { .. }));
    }

    #[test]
    fn default_command_via_alias() {
        let mut table = CommandTable::new();
        let id = table.add(Command::new("help", 0usize..=1)).unwrap();
        assert!(!table.has_default());
        table.alias(DEFAULT_COMMAND, "help").unwrap();
        assert!(table.has_default());
        assert_eq!(table.id_of(DEFAULT_COMMAND), Some(id));
        // __default is a routing key, not a user-visible alias.
        assert!(table.by_id(id).aliases().is_empty());
    }

    #[test]
    fn command_owns_its_parameters() {
        let mut command = Command::new("greet", ArgSpec::at_least(0)).describe("Say hello");
        command
            .add_param(Parameter::option("name", ArgSpec::exact(1)))
            .unwrap();
        assert!(command.params().get("name").is_some());
        assert_eq!(command.description(), Some("Say hello"));

        command.args_mut().append("pos").unwrap();
        command.params_mut().by_id_mut(ParamId(0)).activate();
        command.reset();
        assert!(command.args().is_empty());
        assert!(!command.params().get("name").unwrap().is_active());
    }
}
