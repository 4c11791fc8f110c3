//! Parameters: the named, aliasable command-line switches.
//!
//! A [`Parameter`] is either a flag (never takes arguments) or an option
//! (delegates to its [`Arguments`] binder). Activation state lives here;
//! activation *callbacks* are owned by the application shell so that
//! resolution stays side-effect free.

use crate::arguments::{ArgSpec, Arguments};

/// Distinguishes flags from options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Takes no arguments.
    Flag,
    /// Takes arguments per its binder spec.
    Option,
}

/// A named command-line switch, activated when supplied by the user.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    aliases: Vec<String>,
    kind: ParamKind,
    active: bool,
    args: Arguments,
}

impl Parameter {
    /// Creates a flag: a parameter whose binder is fixed at zero arguments.
    pub fn flag(name: impl Into<String>) -> Self {
        let name = name.into();
        let args = Arguments::new(name.clone(), ArgSpec::none());
        Self {
            name,
            aliases: Vec::new(),
            kind: ParamKind::Flag,
            active: false,
            args,
        }
    }

    /// Creates an option with the given argument spec.
    pub fn option(name: impl Into<String>, spec: impl Into<ArgSpec>) -> Self {
        let name = name.into();
        let args = Arguments::new(name.clone(), spec.into());
        Self {
            name,
            aliases: Vec::new(),
            kind: ParamKind::Option,
            active: false,
            args,
        }
    }

    /// Adds an alternate name, builder style.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All alternate names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub(crate) fn push_alias(&mut self, alias: String) {
        self.aliases.push(alias);
    }

    /// Flag or option.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Whether this parameter takes arguments.
    pub fn is_option(&self) -> bool {
        self.kind == ParamKind::Option
    }

    /// Whether the user supplied this parameter on the command line.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks this parameter as supplied.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// The bound arguments.
    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub(crate) fn args_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }

    /// Deactivates the parameter and clears its bound arguments.
    pub fn reset(&mut self) {
        self.active = false;
        self.args.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn flags_reject_arguments() {
        let mut flag = Parameter::flag("debug").aliased("d");
        assert_eq!(flag.kind(), ParamKind::Flag);
        assert!(!flag.is_option());
        assert!(flag.args().is_full());
        assert!(!flag.args().has_room());
        assert!(matches!(
            flag.args_mut().append("x"),
            Err(Error::ExtraArgument(_))
        ));
        assert_eq!(flag.aliases(), ["d"]);
    }

    #[test]
    fn activation_and_reset() {
        let mut opt = Parameter::option("level", ArgSpec::exact(1));
        assert!(!opt.is_active());
        opt.args_mut().append("3").unwrap();
        opt.activate();
        assert!(opt.is_active());
        assert_eq!(opt.args().at(0), Some("3"));

        opt.reset();
        assert!(!opt.is_active());
        assert!(opt.args().is_empty());
    }

    #[test]
    fn option_from_count_sugar() {
        let opt = Parameter::option("paths", 2usize);
        assert!(opt.is_option());
        assert_eq!(opt.args().spec().min(), 2);
        assert_eq!(opt.args().spec().max(), Some(2));
    }
}
