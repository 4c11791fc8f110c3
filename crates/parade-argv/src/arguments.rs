//! Argument arity specifications and the runtime binder.
//!
//! Every parameter that takes values, and every command, owns an
//! [`Arguments`] binder built from an [`ArgSpec`]. The binder accumulates
//! supplied argument strings during resolution and decides fullness and
//! overflow; named specifications additionally bind values to argument names
//! and validate them against [`Matcher`]s.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Error, SpecError};

/// A value validator attached to a named argument slot.
///
/// Matchers within one slot combine with logical OR: a value is accepted if
/// any one of them matches.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The value must equal this string exactly.
    Literal(String),
    /// The value must match this pattern (anchored over the whole value).
    Pattern(Regex),
    /// Letters and digits only.
    Alphanumeric,
    /// An optionally signed decimal number, e.g. `-3` or `2.5`.
    Float,
    /// Letters only.
    Letters,
    /// An optionally signed integer.
    Numeric,
}

impl Matcher {
    /// Checks a single value against this matcher.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Literal(s) => value == s,
            Matcher::Pattern(re) => match re.find(value) {
                Some(m) => m.start() == 0 && m.end() == value.len(),
                None => false,
            },
            Matcher::Alphanumeric => {
                !value.is_empty() && value.chars().all(|c| c.is_alphanumeric())
            }
            Matcher::Float => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                match digits.split_once('.') {
                    Some((int, frac)) => {
                        !int.is_empty()
                            && !frac.is_empty()
                            && int.chars().all(|c| c.is_ascii_digit())
                            && frac.chars().all(|c| c.is_ascii_digit())
                    }
                    None => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
                }
            }
            Matcher::Letters => !value.is_empty() && value.chars().all(|c| c.is_alphabetic()),
            Matcher::Numeric => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            }
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::Literal(value.to_string())
    }
}

impl From<Regex> for Matcher {
    fn from(value: Regex) -> Self {
        Matcher::Pattern(value)
    }
}

/// A single named argument slot in an [`ArgSpec`].
#[derive(Debug, Clone)]
pub struct ArgDef {
    name: String,
    matchers: Vec<Matcher>,
    optional: bool,
    remainder: bool,
}

impl ArgDef {
    /// Declares a required named argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matchers: Vec::new(),
            optional: false,
            remainder: false,
        }
    }

    /// Marks this argument as optional. Optional arguments count toward the
    /// maximum argument count but not the minimum.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks this argument as the remainder: it consumes every trailing
    /// supplied value as a growing list bound to this one name. Must be the
    /// last declared argument.
    pub fn remainder(mut self) -> Self {
        self.remainder = true;
        self
    }

    /// Adds a value matcher to this argument. Matchers combine with OR.
    pub fn matching(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matchers.push(matcher.into());
        self
    }

    /// The argument's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this argument is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether this argument consumes all trailing values.
    pub fn is_remainder(&self) -> bool {
        self.remainder
    }
}

impl From<&str> for ArgDef {
    fn from(name: &str) -> Self {
        ArgDef::new(name)
    }
}

/// The allowed range of argument counts for a parameter or command, with
/// optional argument names and per-name validators.
#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    min: usize,
    max: Option<usize>,
    names: Vec<ArgDef>,
}

impl ArgSpec {
    /// No arguments at all. This is the spec of every flag.
    pub fn none() -> Self {
        Self {
            min: 0,
            max: Some(0),
            names: Vec::new(),
        }
    }

    /// Exactly `count` required arguments.
    pub fn exact(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
            names: Vec::new(),
        }
    }

    /// `count` required arguments plus an unlimited number of optional ones.
    pub fn at_least(count: usize) -> Self {
        Self {
            min: count,
            max: None,
            names: Vec::new(),
        }
    }

    /// Between `min` and `max` arguments; `None` means unbounded.
    pub fn range(min: usize, max: Option<usize>) -> Self {
        Self {
            min,
            max,
            names: Vec::new(),
        }
    }

    /// Named arguments. The minimum count is the number of non-optional
    /// names; a remainder flag on the last name makes the maximum unbounded.
    ///
    /// Fails when an optional name precedes a required one, when a remainder
    /// name is not last, or when a name repeats.
    pub fn named(defs: impl IntoIterator<Item = ArgDef>) -> Result<Self, SpecError> {
        let names: Vec<ArgDef> = defs.into_iter().collect();

        let mut seen_optional = false;
        for (i, def) in names.iter().enumerate() {
            if def.remainder && i + 1 != names.len() {
                return Err(SpecError::RemainderNotLast(def.name.clone()));
            }
            if def.optional {
                seen_optional = true;
            } else if seen_optional && !def.remainder {
                return Err(SpecError::OptionalBeforeRequired(
                    names[i - 1].name.clone(),
                ));
            }
            if names[..i].iter().any(|d| d.name == def.name) {
                return Err(SpecError::DuplicateArgName(def.name.clone()));
            }
        }

        let min = names.iter().filter(|d| !d.optional).count();
        let max = match names.last() {
            Some(last) if last.remainder => None,
            _ => Some(names.len()),
        };

        Ok(Self { min, max, names })
    }

    /// The minimum number of required arguments.
    pub fn min(&self) -> usize {
        self.min
    }

    /// The maximum number of arguments, `None` meaning unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// The declared argument names, empty for purely counted specs.
    pub fn names(&self) -> &[ArgDef] {
        &self.names
    }

    /// Whether this spec declares named arguments.
    pub fn is_named(&self) -> bool {
        !self.names.is_empty()
    }
}

impl From<usize> for ArgSpec {
    /// A positive count means that many required arguments; zero means no
    /// required arguments but an unlimited number of optional ones.
    fn from(count: usize) -> Self {
        if count == 0 {
            ArgSpec::at_least(0)
        } else {
            ArgSpec::exact(count)
        }
    }
}

impl From<std::ops::RangeInclusive<usize>> for ArgSpec {
    fn from(range: std::ops::RangeInclusive<usize>) -> Self {
        ArgSpec::range(*range.start(), Some(*range.end()))
    }
}

impl From<std::ops::RangeFrom<usize>> for ArgSpec {
    fn from(range: std::ops::RangeFrom<usize>) -> Self {
        ArgSpec::at_least(range.start)
    }
}

/// The runtime binder: accumulates supplied argument strings for one
/// parameter or command and exposes them by position and by name.
#[derive(Debug, Clone)]
pub struct Arguments {
    owner: String,
    spec: ArgSpec,
    named: HashMap<String, Vec<String>>,
    values: Vec<String>,
}

impl Arguments {
    /// Creates an empty binder for the named owner with the given spec.
    pub fn new(owner: impl Into<String>, spec: ArgSpec) -> Self {
        Self {
            owner: owner.into(),
            spec,
            named: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// The spec this binder was built from.
    pub fn spec(&self) -> &ArgSpec {
        &self.spec
    }

    /// Appends a supplied value.
    ///
    /// Fails with [`Error::ExtraArgument`] when the binder is already at its
    /// maximum and has no unbounded tail. Otherwise the value is bound to the
    /// next unconsumed named slot (a remainder slot grows a list), or pushed
    /// onto the positional list when no names are declared.
    pub fn append(&mut self, value: impl Into<String>) -> Result<(), Error> {
        if !self.has_room() {
            return Err(Error::ExtraArgument(self.owner.clone()));
        }
        self.push_value(value.into());
        Ok(())
    }

    /// Binds a value without the room check. The resolver consumes tokens
    /// only while `has_room()` holds, so the check would be redundant there.
    pub(crate) fn push_value(&mut self, value: String) {
        let index = self.values.len();
        let names = &self.spec.names;
        if !names.is_empty() {
            let def = if index < names.len() {
                Some(&names[index])
            } else {
                names.last().filter(|d| d.remainder)
            };
            if let Some(def) = def {
                self.named
                    .entry(def.name.clone())
                    .or_default()
                    .push(value.clone());
            }
        }
        self.values.push(value);
    }

    /// Whether all required arguments have been supplied.
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.spec.min
    }

    /// Whether this binder can take more arguments.
    pub fn has_room(&self) -> bool {
        match self.spec.max {
            None => true,
            Some(max) => self.values.len() < max,
        }
    }

    /// Checks completeness and validates bound values.
    ///
    /// Fails with [`Error::MissingArgument`] when required arguments are
    /// absent, then with [`Error::UnexpectedArgument`] for the first bound
    /// value (including every element of a remainder list) that matches none
    /// of its slot's matchers.
    pub fn check_complete(&self) -> Result<(), Error> {
        if !self.is_full() {
            return Err(Error::MissingArgument(self.owner.clone()));
        }
        for def in &self.spec.names {
            if def.matchers.is_empty() {
                continue;
            }
            if let Some(values) = self.named.get(&def.name) {
                for value in values {
                    if !def.matchers.iter().any(|m| m.matches(value)) {
                        return Err(Error::UnexpectedArgument(value.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    /// The first value bound to a named argument.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values bound to a named argument; more than one only for a
    /// remainder slot.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.named.get(name).map(Vec::as_slice)
    }

    /// The value at a position, in append order.
    pub fn at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// All bound values in append order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values have been bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clears all bound values without touching the spec.
    pub fn reset(&mut self) {
        self.named.clear();
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binder(spec: ArgSpec) -> Arguments {
        Arguments::new("dummy", spec)
    }

    #[test]
    fn exact_count_enforces_fullness_and_overflow() {
        let mut args = binder(ArgSpec::exact(2));
        assert!(!args.is_full());
        assert!(args.has_room());
        args.append("one").unwrap();
        assert!(args.check_complete().is_err());
        args.append("two").unwrap();
        assert!(args.is_full());
        assert!(!args.has_room());
        assert_eq!(
            args.append("three"),
            Err(Error::ExtraArgument("dummy".into()))
        );
        assert_eq!(args.values(), ["one", "two"]);
    }

    #[test]
    fn at_least_allows_unlimited_optionals() {
        let mut args = binder(ArgSpec::at_least(1));
        assert!(!args.is_full());
        assert!(matches!(
            args.check_complete(),
            Err(Error::MissingArgument(_))
        ));
        args.append("one").unwrap();
        assert!(args.is_full());
        assert!(args.has_room());
        args.append("two").unwrap();
        args.append("three").unwrap();
        assert!(args.has_room());
    }

    #[test]
    fn zero_means_no_required_unlimited_optional() {
        let spec: ArgSpec = 0.into();
        let mut args = binder(spec);
        assert!(args.is_full());
        assert!(args.has_room());
        args.append("extra").unwrap();
        assert_eq!(args.values(), ["extra"]);
    }

    #[test]
    fn positive_int_converts_to_exact() {
        let spec: ArgSpec = 3.into();
        assert_eq!(spec.min(), 3);
        assert_eq!(spec.max(), Some(3));
    }

    #[test]
    fn range_conversions() {
        let spec: ArgSpec = (1..=3).into();
        assert_eq!(spec.min(), 1);
        assert_eq!(spec.max(), Some(3));

        let spec: ArgSpec = (2..).into();
        assert_eq!(spec.min(), 2);
        assert_eq!(spec.max(), None);
    }

    #[test]
    fn named_arguments_bind_in_order() {
        let spec = ArgSpec::named([ArgDef::new("first"), ArgDef::new("second")]).unwrap();
        assert_eq!(spec.min(), 2);
        assert_eq!(spec.max(), Some(2));

        let mut args = binder(spec);
        args.append("one").unwrap();
        args.append("two").unwrap();
        assert_eq!(args.get("first"), Some("one"));
        assert_eq!(args.get("second"), Some("two"));
        assert_eq!(args.at(1), Some("two"));
        assert_eq!(args.get("third"), None);
    }

    #[test]
    fn optional_named_argument_counts_toward_max_only() {
        let spec =
            ArgSpec::named([ArgDef::new("required"), ArgDef::new("extra").optional()]).unwrap();
        assert_eq!(spec.min(), 1);
        assert_eq!(spec.max(), Some(2));

        let mut args = binder(spec);
        args.append("one").unwrap();
        assert!(args.is_full());
        assert!(args.has_room());
        args.append("two").unwrap();
        assert!(!args.has_room());
        assert_eq!(args.get("required"), Some("one"));
        assert_eq!(args.get("extra"), Some("two"));
    }

    #[test]
    fn remainder_collects_trailing_values() {
        let spec = ArgSpec::named([
            ArgDef::new("required"),
            ArgDef::new("rest").optional().remainder(),
        ])
        .unwrap();
        assert_eq!(spec.min(), 1);
        assert_eq!(spec.max(), None);

        let mut args = binder(spec);
        args.append("one").unwrap();
        assert!(args.is_full());
        assert!(args.check_complete().is_ok());
        args.append("two").unwrap();
        args.append("three").unwrap();
        assert!(args.has_room());
        assert_eq!(args.get("required"), Some("one"));
        assert_eq!(
            args.get_all("rest").unwrap(),
            ["two".to_string(), "three".to_string()]
        );
    }

    #[test]
    fn required_remainder_counts_toward_min() {
        let spec = ArgSpec::named([ArgDef::new("files").remainder()]).unwrap();
        assert_eq!(spec.min(), 1);
        assert_eq!(spec.max(), None);
    }

    #[test]
    fn named_spec_rejects_bad_orderings() {
        let err = ArgSpec::named([ArgDef::new("a").optional(), ArgDef::new("b")]).unwrap_err();
        assert!(matches!(err, SpecError::OptionalBeforeRequired(_)));

        let err =
            ArgSpec::named([ArgDef::new("a").remainder(), ArgDef::new("b")]).unwrap_err();
        assert!(matches!(err, SpecError::RemainderNotLast(_)));

        let err = ArgSpec::named([ArgDef::new("a"), ArgDef::new("a")]).unwrap_err();
        assert!(matches!(err, SpecError::DuplicateArgName(_)));
    }

    #[test]
    fn matchers_combine_with_or() {
        let spec = ArgSpec::named([ArgDef::new("arg")
            .matching("fixed")
            .matching(Regex::new("^ab+c$").unwrap())
            .matching(Matcher::Numeric)])
        .unwrap();

        for ok in ["fixed", "abbbc", "42", "-7"] {
            let mut args = binder(spec.clone());
            args.append(ok).unwrap();
            assert!(args.check_complete().is_ok(), "expected {ok} to pass");
        }

        let mut args = binder(spec);
        args.append("nope").unwrap();
        assert_eq!(
            args.check_complete(),
            Err(Error::UnexpectedArgument("nope".into()))
        );
    }

    #[test]
    fn remainder_values_are_each_validated() {
        let spec = ArgSpec::named([ArgDef::new("nums")
            .optional()
            .remainder()
            .matching(Matcher::Numeric)])
        .unwrap();
        let mut args = binder(spec);
        args.append("1").unwrap();
        args.append("two").unwrap();
        assert_eq!(
            args.check_complete(),
            Err(Error::UnexpectedArgument("two".into()))
        );
    }

    #[test]
    fn pattern_matcher_covers_whole_value() {
        let matcher = Matcher::Pattern(Regex::new("b+").unwrap());
        assert!(matcher.matches("bbb"));
        assert!(!matcher.matches("abc"));
    }

    #[test]
    fn named_matchers() {
        assert!(Matcher::Alphanumeric.matches("abc123"));
        assert!(!Matcher::Alphanumeric.matches("a-b"));
        assert!(Matcher::Letters.matches("abc"));
        assert!(!Matcher::Letters.matches("abc1"));
        assert!(Matcher::Numeric.matches("-12"));
        assert!(!Matcher::Numeric.matches("1.2"));
        assert!(Matcher::Float.matches("1.25"));
        assert!(Matcher::Float.matches("-3"));
        assert!(!Matcher::Float.matches("1."));
        assert!(!Matcher::Float.matches("x"));
    }

    #[test]
    fn reset_clears_values_but_not_spec() {
        let spec = ArgSpec::named([ArgDef::new("who")]).unwrap();
        let mut args = binder(spec);
        args.append("Ada").unwrap();
        args.reset();
        assert!(args.is_empty());
        assert_eq!(args.get("who"), None);
        assert_eq!(args.spec().min(), 1);
    }

    #[test]
    fn flags_take_nothing() {
        let mut args = binder(ArgSpec::none());
        assert!(args.is_full());
        assert!(!args.has_room());
        assert!(matches!(args.append("x"), Err(Error::ExtraArgument(_))));
    }
}
