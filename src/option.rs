use std::fmt::{Debug, Display, Formatter};

use tracing::trace;

use crate::error::{ConversionError, RegistrationError};
use crate::sink::{Bind, Marker, Sink};
use crate::util::{OptionValidator, Util};
use crate::value::Validator;

pub(crate) const HELP: &str = "help";
pub(crate) const VERSION: &str = "version";

/// How many arguments an option consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Takes no argument; matching the option sets it.
    Boolean,
    /// Takes one argument per appearance, the last one wins.
    Single,
    /// Takes one argument per appearance and keeps all of them.
    Multiple,
}

/// The `OptionSpec` represents a single registered option.
///
/// Each option owns the [`Sink`] that writes into the bound variable, so an
/// [`Options`] registry borrows every variable it was given until it is dropped.
///
/// # Examples
///
/// Create a required integer option `--count, -c <int>`
/// ```
/// use optbind::OptionSpec;
/// let mut count = 0i32;
/// let spec = OptionSpec::builder(&mut count)
///     .name("count")
///     .abbrev('c')
///     .desc("Number of repetitions")
///     .required(true)
///     .build()
///     .unwrap();
/// assert!(spec.is_required());
/// ```
pub struct OptionSpec<'a> {
    name: String,
    abbrev: Option<char>,
    description: String,
    placeholder: &'static str,
    default_text: Option<String>,
    group: Option<String>,
    kind: Kind,
    anonymous: bool,
    required: bool,
    reserved: bool,
    found: bool,
    validator: Option<Validator>,
    sink: Box<dyn Sink + 'a>,
}

/// A builder struct for [`OptionSpec`].
pub struct OptionBuilder<'a> {
    sink: Box<dyn Sink + 'a>,
    name: Option<String>,
    abbrev: Option<char>,
    description: Option<String>,
    group: Option<String>,
    pattern: Option<String>,
    anonymous: bool,
    required: bool,
}

impl<'a> OptionBuilder<'a> {
    /// Build an [`OptionSpec`] with configured values.
    ///
    /// # Error
    ///
    /// Returns an error if:
    /// - the name is missing, blank, or contains whitespace or control characters.
    /// - the abbreviation is not a printable ASCII character other than `-`.
    /// - a boolean option is flagged anonymous or required.
    /// - the description is blank.
    /// - a pattern is given for an option that is not string valued, the
    ///   pattern does not compile, or it rejects the variable's current value.
    ///
    /// Checks that involve other options happen in [`Options::add_option`].
    pub fn build(self) -> Result<OptionSpec<'a>, RegistrationError> {
        let raw_name = self.name.unwrap_or_default();
        let name = OptionValidator::validate_name(&raw_name)?;

        if let Some(abbrev) = self.abbrev {
            OptionValidator::validate_abbrev(abbrev)?;
        }

        let kind = self.sink.kind();
        if kind == Kind::Boolean && (self.anonymous || self.required) {
            return Err(RegistrationError::IllegalBooleanShape(name));
        }

        let description = self.description.unwrap_or_default();
        if description.is_empty() {
            return Err(RegistrationError::EmptyDescription(name));
        }

        let value_kind = self.sink.value_kind();
        let validator = match self.pattern.as_deref().filter(|p| !p.is_empty()) {
            Some(pattern) => {
                if kind == Kind::Boolean || !value_kind.accepts_pattern() {
                    return Err(RegistrationError::InvalidPattern {
                        name,
                        reason: "patterns are only allowed for string-valued options".to_string(),
                    });
                }
                let validator = Validator::anchored(pattern).map_err(|e| {
                    RegistrationError::InvalidPattern { name: name.clone(), reason: e.to_string() }
                })?;
                if let Some(current) = self.sink.current_text() {
                    if !validator.accepts(current) {
                        return Err(RegistrationError::DefaultMismatch(name));
                    }
                }
                Some(validator)
            }
            None if kind == Kind::Boolean => None,
            None => value_kind.validator(),
        };

        let (placeholder, default_text) = match kind {
            Kind::Boolean => ("", None),
            Kind::Single if self.required => (value_kind.placeholder(), None),
            Kind::Single => (value_kind.placeholder(), self.sink.default_text()),
            Kind::Multiple => (value_kind.placeholder(), None),
        };

        Ok(OptionSpec {
            name,
            abbrev: self.abbrev,
            description,
            placeholder,
            default_text: default_text.filter(|d| !d.is_empty()),
            group: self.group,
            kind,
            anonymous: self.anonymous,
            required: self.required,
            reserved: false,
            found: false,
            validator,
            sink: self.sink,
        })
    }

    /// Set the long option name. Surrounding hyphens and whitespace are dropped.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Set the single character short name.
    pub fn abbrev(mut self, abbrev: char) -> Self {
        self.abbrev = Some(abbrev);
        self
    }

    /// Set the description of the option.
    pub fn desc(mut self, description: &str) -> Self {
        self.description = Some(description.trim().to_owned());
        self
    }

    /// Whether the option absorbs free-standing arguments.
    ///
    /// Anonymous options are filled in registration order; a multi-valued
    /// anonymous option takes everything that is left.
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Whether the option is required to be passed to the command line.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Restrict a string option to arguments matching the regular expression
    /// `pattern` in full.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_owned());
        self
    }

    /// Put the option in a mutually exclusive group.
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.trim().to_owned());
        self
    }
}

impl<'a> OptionSpec<'a> {
    /// Create an [`OptionBuilder`] for an option writing into `binding`.
    pub fn builder<B: Bind<'a>>(binding: B) -> OptionBuilder<'a> {
        OptionBuilder {
            sink: binding.into_sink(),
            name: None,
            abbrev: None,
            description: None,
            group: None,
            pattern: None,
            anonymous: false,
            required: false,
        }
    }

    fn reserved(name: &str, abbrev: Option<char>, description: &str) -> OptionSpec<'a> {
        OptionSpec {
            name: name.to_owned(),
            abbrev,
            description: description.to_owned(),
            placeholder: "",
            default_text: None,
            group: None,
            kind: Kind::Boolean,
            anonymous: false,
            required: false,
            reserved: true,
            found: false,
            validator: None,
            sink: Box::new(Marker),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_abbrev(&self) -> Option<char> {
        self.abbrev
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// The value tag shown in help, e.g. `<int>`. Empty for boolean options.
    pub fn get_placeholder(&self) -> &str {
        self.placeholder
    }

    /// The pre-rendered default value, if the help should show one.
    pub fn get_default(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    pub fn get_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn get_kind(&self) -> Kind {
        self.kind
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option is one of the automatically added `help`/`version`.
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Whether the option was matched during the last parse.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Whether this option can absorb the next free-standing argument.
    pub fn has_anonymous_slot(&self) -> bool {
        self.anonymous && (self.kind == Kind::Multiple || !self.found)
    }

    pub(crate) fn accepts(&self, token: &str) -> bool {
        self.validator.as_ref().map_or(true, |v| v.accepts(token))
    }

    pub(crate) fn assign(&mut self, token: &str) -> Result<(), ConversionError> {
        self.sink.assign(token)
    }

    pub(crate) fn set_found(&mut self) {
        self.found = true;
    }

    fn reset(&mut self) {
        self.found = false;
        self.sink.reset();
    }
}

impl Debug for OptionSpec<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("abbrev", &self.abbrev)
            .field("kind", &self.kind)
            .field("anonymous", &self.anonymous)
            .field("required", &self.required)
            .field("found", &self.found)
            .finish()
    }
}

impl Display for OptionSpec<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "--{}", self.name)?;
        if let Some(abbrev) = self.abbrev {
            write!(f, ", -{}", abbrev)?;
        }
        Ok(())
    }
}

/// The `Options` is the ordered registry of [`OptionSpec`]s for one parser.
///
/// # Examples
///
/// Basic usage
/// ```
/// use optbind::{OptionSpec, Options};
///
/// let mut verbose = false;
/// let mut output = String::new();
/// let mut files: Vec<String> = Vec::new();
///
/// let mut options = Options::new();
/// options.add(&mut verbose, "verbose", 'V', "Print more").unwrap();
/// options.add_long(&mut output, "output", "Output filename").unwrap();
/// options.add_option(OptionSpec::builder(&mut files)
///                     .name("files")
///                     .desc("Input files")
///                     .anonymous(true)
///                     .build().unwrap()).unwrap();
///
/// assert_eq!(options.find_by_name("--output"), Some(1));
/// assert_eq!(options.find_by_abbrev('V'), Some(0));
/// ```
#[derive(Default)]
pub struct Options<'a> {
    specs: Vec<OptionSpec<'a>>,
}

impl<'a> Options<'a> {
    /// Create an empty `Options` registry.
    pub fn new() -> Options<'a> {
        Options { specs: Vec::new() }
    }

    /// Register an [`OptionSpec`].
    ///
    /// # Error
    ///
    /// Fails if the name is `help` or `version`, if the name or abbreviation
    /// is already taken, or if an anonymous option follows a multi-valued
    /// anonymous option.
    pub fn add_option(&mut self, spec: OptionSpec<'a>) -> Result<(), RegistrationError> {
        if spec.name == HELP || spec.name == VERSION {
            return Err(RegistrationError::ReservedName(spec.name));
        }
        if self.find_by_name(&spec.name).is_some() {
            return Err(RegistrationError::DuplicateName(spec.name));
        }
        if let Some(abbrev) = spec.abbrev {
            if self.user_specs().any(|s| s.abbrev == Some(abbrev)) {
                return Err(RegistrationError::DuplicateAbbrev(abbrev));
            }
        }
        if spec.anonymous
            && self.user_specs().any(|s| s.anonymous && s.kind == Kind::Multiple)
        {
            return Err(RegistrationError::AnonymousSlotExhausted(spec.name));
        }

        trace!(name = %spec.name, kind = ?spec.kind, "registered option");
        self.specs.push(spec);
        Ok(())
    }

    /// A convenient way to register an option with a short name.
    ///
    /// Also see [`Self::add_option`], [`Self::add_long`], [`Self::add_required`],
    /// [`Self::add_anonymous`]
    pub fn add<B: Bind<'a>>(
        &mut self,
        binding: B,
        name: &str,
        abbrev: char,
        description: &str,
    ) -> Result<(), RegistrationError> {
        let spec = OptionSpec::builder(binding)
            .name(name)
            .abbrev(abbrev)
            .desc(description)
            .build()?;
        self.add_option(spec)
    }

    /// A convenient way to register an option without a short name.
    ///
    /// Also see [`Self::add_option`], [`Self::add`], [`Self::add_required`],
    /// [`Self::add_anonymous`]
    pub fn add_long<B: Bind<'a>>(
        &mut self,
        binding: B,
        name: &str,
        description: &str,
    ) -> Result<(), RegistrationError> {
        let spec = OptionSpec::builder(binding).name(name).desc(description).build()?;
        self.add_option(spec)
    }

    /// A convenient way to register a required option with a short name.
    ///
    /// Also see [`Self::add_option`], [`Self::add`], [`Self::add_long`],
    /// [`Self::add_anonymous`]
    pub fn add_required<B: Bind<'a>>(
        &mut self,
        binding: B,
        name: &str,
        abbrev: char,
        description: &str,
    ) -> Result<(), RegistrationError> {
        let spec = OptionSpec::builder(binding)
            .name(name)
            .abbrev(abbrev)
            .desc(description)
            .required(true)
            .build()?;
        self.add_option(spec)
    }

    /// A convenient way to register an anonymous option with a short name.
    ///
    /// Also see [`Self::add_option`], [`Self::add`], [`Self::add_long`],
    /// [`Self::add_required`]
    pub fn add_anonymous<B: Bind<'a>>(
        &mut self,
        binding: B,
        name: &str,
        abbrev: char,
        description: &str,
    ) -> Result<(), RegistrationError> {
        let spec = OptionSpec::builder(binding)
            .name(name)
            .abbrev(abbrev)
            .desc(description)
            .anonymous(true)
            .build()?;
        self.add_option(spec)
    }

    /// Find an option by long name; surrounding hyphens and whitespace are ignored.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let key = Util::trim_name(name);
        self.specs.iter().position(|s| s.name == key)
    }

    pub fn find_by_abbrev(&self, abbrev: char) -> Option<usize> {
        self.specs.iter().position(|s| s.abbrev == Some(abbrev))
    }

    /// Check if the option `name` was matched during the last parse.
    pub fn found(&self, name: &str) -> bool {
        self.find_by_name(name).is_some_and(|i| self.specs[i].found)
    }

    pub fn get_options(&self) -> &[OptionSpec<'a>] {
        &self.specs
    }

    pub fn get_option(&self, name: &str) -> Option<&OptionSpec<'a>> {
        self.find_by_name(name).map(|i| &self.specs[i])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Forget the outcome of the previous parse: clear every `found` flag,
    /// put single-valued and boolean variables back to the value they were
    /// bound with, and empty multi-valued variables.
    ///
    /// Parsing calls this first, so one registry can be parsed repeatedly.
    pub fn reset(&mut self) {
        self.specs.iter_mut().for_each(|s| s.reset());
    }

    /// Append the `help` and `version` switches.
    ///
    /// Each takes its usual short letter only when no user option claims it.
    /// Switches left over from an earlier parse are replaced, so the call is
    /// idempotent and the switches always come last.
    pub(crate) fn inject_reserved(&mut self) {
        self.specs.retain(|s| !s.reserved);
        let claimed = |c: char| self.specs.iter().any(|s| s.abbrev == Some(c));
        let help_abbrev = Some('h').filter(|&c| !claimed(c));
        let version_abbrev = Some('v').filter(|&c| !claimed(c));
        self.specs.push(OptionSpec::reserved(HELP, help_abbrev, "Show usage information"));
        self.specs.push(OptionSpec::reserved(VERSION, version_abbrev, "Show version information"));
    }

    pub(crate) fn spec_mut(&mut self, index: usize) -> &mut OptionSpec<'a> {
        &mut self.specs[index]
    }

    /// The first anonymous option, in registration order, that can still
    /// take a free-standing argument.
    pub(crate) fn next_anonymous(&self) -> Option<usize> {
        self.specs.iter().position(|s| s.has_anonymous_slot())
    }

    /// Another option that shares `index`'s exclusive group and was already matched.
    pub(crate) fn group_conflict(&self, index: usize) -> Option<usize> {
        let group = self.specs[index].group.as_deref()?;
        self.specs
            .iter()
            .enumerate()
            .position(|(i, s)| i != index && s.found && s.group.as_deref() == Some(group))
    }

    fn user_specs(&self) -> impl Iterator<Item = &OptionSpec<'a>> {
        self.specs.iter().filter(|s| !s.reserved)
    }
}

impl Debug for Options<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.specs.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use crate::error::RegistrationError;
    use crate::option::{Kind, OptionSpec, Options};

    #[test]
    fn test_builder_derives_shape() {
        let mut flag = false;
        let mut count = 5u32;
        let mut names: Vec<String> = vec!["stale".to_string()];

        let spec = OptionSpec::builder(&mut flag).name("--flag").desc("A flag").build().unwrap();
        assert_eq!(spec.get_name(), "flag");
        assert_eq!(spec.get_kind(), Kind::Boolean);
        assert_eq!(spec.get_placeholder(), "");
        assert_eq!(spec.get_default(), None);

        let spec = OptionSpec::builder(&mut count).name("count").desc("Count").build().unwrap();
        assert_eq!(spec.get_kind(), Kind::Single);
        assert_eq!(spec.get_placeholder(), "<uint>");
        assert_eq!(spec.get_default(), Some("5"));

        let spec = OptionSpec::builder(&mut names).name("names").desc("Names").build().unwrap();
        assert_eq!(spec.get_kind(), Kind::Multiple);
        assert_eq!(spec.get_placeholder(), "<arg>");
        assert_eq!(spec.get_default(), None);
        drop(spec);
        assert!(names.is_empty());
    }

    #[test]
    fn test_required_hides_default() {
        let mut count = 5i32;
        let spec = OptionSpec::builder(&mut count)
            .name("count")
            .desc("Count")
            .required(true)
            .build()
            .unwrap();
        assert_eq!(spec.get_default(), None);
    }

    #[test]
    fn test_builder_errors() {
        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).desc("x").build().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidName(_)));

        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).name("a b").desc("x").build().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidName(_)));

        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).name("f").abbrev('-').desc("x").build().unwrap_err();
        assert_eq!(err, RegistrationError::InvalidAbbrev('-'));

        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).name("f").desc("x").anonymous(true).build().unwrap_err();
        assert_eq!(err, RegistrationError::IllegalBooleanShape("f".to_string()));

        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).name("f").desc("x").required(true).build().unwrap_err();
        assert_eq!(err, RegistrationError::IllegalBooleanShape("f".to_string()));

        let mut flag = false;
        let err = OptionSpec::builder(&mut flag).name("f").desc("  ").build().unwrap_err();
        assert_eq!(err, RegistrationError::EmptyDescription("f".to_string()));
    }

    #[test]
    fn test_pattern_rules() {
        let mut number = 0i32;
        let err = OptionSpec::builder(&mut number).name("n").desc("x").pattern("1.*").build().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPattern { .. }));

        let mut text = String::new();
        let err = OptionSpec::builder(&mut text).name("t").desc("x").pattern("*").build().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPattern { .. }));

        let mut text = "Fubar".to_string();
        let err = OptionSpec::builder(&mut text).name("t").desc("x").pattern("fu.*").build().unwrap_err();
        assert_eq!(err, RegistrationError::DefaultMismatch("t".to_string()));

        let mut text = "Hello".to_string();
        let spec = OptionSpec::builder(&mut text).name("t").desc("x").pattern("He.*").build().unwrap();
        assert!(spec.accepts("Hellfire"));
        assert!(!spec.accepts("Grinch"));
    }

    #[test]
    fn test_duplicates() {
        let (mut a, mut b, mut c) = (false, false, false);
        let mut options = Options::new();
        options.add(&mut a, "alpha", 'a', "Alpha").unwrap();
        assert_eq!(
            options.add(&mut b, "--alpha", 'b', "Bravo"),
            Err(RegistrationError::DuplicateName("alpha".to_string()))
        );
        assert_eq!(
            options.add(&mut c, "charlie", 'a', "Charlie"),
            Err(RegistrationError::DuplicateAbbrev('a'))
        );
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_reserved_names() {
        let mut a = false;
        let mut options = Options::new();
        assert_eq!(
            options.add_long(&mut a, "help", "Mine"),
            Err(RegistrationError::ReservedName("help".to_string()))
        );
    }

    #[test]
    fn test_anonymous_slot_exhausted() {
        let mut rest: Vec<i32> = Vec::new();
        let mut last = 0i32;
        let mut plain = 0i32;
        let mut options = Options::new();
        options.add_anonymous(&mut rest, "rest", 'r', "Rest").unwrap();
        options.add(&mut plain, "plain", 'p', "Not anonymous").unwrap();
        assert_eq!(
            options.add_anonymous(&mut last, "last", 'l', "Last"),
            Err(RegistrationError::AnonymousSlotExhausted("last".to_string()))
        );
    }

    #[test]
    fn test_lookup() {
        let (mut a, mut b) = (false, 0i64);
        let mut options = Options::new();
        options.add(&mut a, "alpha", 'a', "Alpha").unwrap();
        options.add_long(&mut b, "bravo", "Bravo").unwrap();
        assert_eq!(options.find_by_name("alpha"), Some(0));
        assert_eq!(options.find_by_name(" --bravo "), Some(1));
        assert_eq!(options.find_by_name("charlie"), None);
        assert_eq!(options.find_by_abbrev('a'), Some(0));
        assert_eq!(options.find_by_abbrev('b'), None);
    }

    #[test]
    fn test_inject_reserved_is_idempotent() {
        let (mut a, mut h) = (false, false);
        let mut options = Options::new();
        options.add(&mut a, "alpha", 'a', "Alpha").unwrap();
        options.add(&mut h, "hidden", 'h', "Hidden").unwrap();

        options.inject_reserved();
        options.inject_reserved();

        assert_eq!(options.len(), 4);
        let help = options.get_option("help").unwrap();
        assert!(help.is_reserved());
        assert_eq!(help.get_abbrev(), None);
        assert_eq!(options.get_option("version").unwrap().get_abbrev(), Some('v'));
        assert_eq!(options.find_by_abbrev('h'), Some(1));
    }

    #[test]
    fn test_user_abbrev_after_injection() {
        let (mut a, mut v) = (false, false);
        let mut options = Options::new();
        options.add(&mut a, "alpha", 'a', "Alpha").unwrap();
        options.inject_reserved();
        assert_eq!(options.get_option("version").unwrap().get_abbrev(), Some('v'));

        options.add(&mut v, "verbose", 'v', "Verbose").unwrap();
        options.inject_reserved();
        assert_eq!(options.get_option("version").unwrap().get_abbrev(), None);
        assert_eq!(options.get_options().last().unwrap().get_name(), "version");
    }

    #[test]
    fn test_group_conflict() {
        let (mut x, mut y, mut z) = (false, false, false);
        let mut options = Options::new();
        for (var, name) in [(&mut x, "xml"), (&mut y, "yaml")] {
            options
                .add_option(OptionSpec::builder(var).name(name).desc("Format").group("format").build().unwrap())
                .unwrap();
        }
        options.add_long(&mut z, "zip", "Compress").unwrap();

        assert_eq!(options.group_conflict(1), None);
        options.spec_mut(0).set_found();
        options.spec_mut(2).set_found();
        assert_eq!(options.group_conflict(1), Some(0));
        assert_eq!(options.group_conflict(2), None);
    }
}
