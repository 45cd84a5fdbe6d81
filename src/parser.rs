use std::env;
use std::io::{stderr, stdout, IsTerminal, Write};
use std::process::exit;

use tracing::{debug, trace};

use crate::config::{Colour, ParserConfig};
use crate::error::{ConfigError, ParseError};
use crate::format::HelpFormatter;
use crate::option::{Kind, Options, HELP, VERSION};
use crate::scan::{ParseState, Token};

/// What the caller should do after a successful parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The bound variables are populated; carry on.
    Proceed,
    /// Help or version text was written; the program should stop.
    Stopped,
}

/// The parser trait to parse command line arguments.
pub trait Parser {
    /// Parse arguments from `env::args()` with provided `options`, writing
    /// help or version text to stdout.
    ///
    /// # Error
    ///
    /// If the arguments retrieved from `env::args()` don't meet the requirement of `options`,
    /// [`ParseError`] is returned.
    ///
    /// Also see [`Self::parse_args`], [`Self::parse_or_exit`]
    fn parse(&mut self, options: &mut Options<'_>) -> Result<Outcome, ParseError>;

    /// Parse arguments from `env::args()` with provided `options`.
    ///
    /// Returns only when the program should proceed. After help or version
    /// was shown the process exits with status 0; on error the message and
    /// the help are printed to stderr and the process exits with status 1.
    ///
    /// Also see [`Self::parse_args`], [`Self::parse`]
    fn parse_or_exit(&mut self, options: &mut Options<'_>);

    /// Parse `arguments` (without the program name) with provided `options`,
    /// writing help or version text to `out`.
    ///
    /// # Error
    ///
    /// If the `arguments` don't meet the requirement of `options`,
    /// [`ParseError`] is returned.
    ///
    /// Also see [`Self::parse_or_exit`], [`Self::parse`]
    fn parse_args<T: ToString, W: Write>(
        &mut self,
        options: &mut Options<'_>,
        arguments: &[T],
        out: &mut W,
    ) -> Result<Outcome, ParseError>;
}

/// The default implementation of [`Parser`] trait.
///
/// # Examples
///
/// ```
/// use optbind::{DefaultParser, Options, Outcome, Parser};
///
/// let mut count = 1u32;
/// let mut loud = false;
/// let mut names: Vec<String> = Vec::new();
///
/// let mut parser = DefaultParser::builder("greet", "Says hello.")
///     .version("1.0")
///     .build()
///     .unwrap();
///
/// let mut options = Options::new();
/// options.add(&mut count, "count", 'c', "Number of greetings").unwrap();
/// options.add(&mut loud, "loud", 'l', "Shout").unwrap();
/// options.add_anonymous(&mut names, "names", 'n', "People to greet").unwrap();
///
/// let mut out = Vec::new();
/// let outcome = parser.parse_args(&mut options, &["--loud", "-c", "3", "--", "Ann", "Bob"], &mut out);
/// assert_eq!(outcome.unwrap(), Outcome::Proceed);
/// drop(options);
///
/// assert_eq!(count, 3);
/// assert!(loud);
/// assert_eq!(names, ["Ann", "Bob"]);
/// ```
pub struct DefaultParser {
    config: ParserConfig,
}

/// A builder struct to create [`DefaultParser`].
pub struct ParserBuilder {
    app: String,
    description: String,
    version: String,
    extra: String,
    auto_help: bool,
    colour: Colour,
}

impl ParserBuilder {
    /// Build the parser.
    ///
    /// # Error
    ///
    /// Fails if the application name or description is blank.
    pub fn build(self) -> Result<DefaultParser, ConfigError> {
        let config = ParserConfig::new(
            &self.app,
            &self.version,
            &self.description,
            &self.extra,
            self.auto_help,
            self.colour,
        )?;
        Ok(DefaultParser { config })
    }

    /// Set the version shown after the application name.
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Set the free text printed after the option table.
    pub fn extra(mut self, extra: &str) -> Self {
        self.extra = extra.to_string();
        self
    }

    /// Set whether an empty command line shows the help instead of parsing.
    pub fn auto_help(mut self, auto_help: bool) -> Self {
        self.auto_help = auto_help;
        self
    }

    /// Set whether the help text is coloured.
    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}

impl DefaultParser {
    /// Get the builder to config parser.
    pub fn builder(app: &str, description: &str) -> ParserBuilder {
        ParserBuilder {
            app: app.to_string(),
            description: description.to_string(),
            version: String::new(),
            extra: String::new(),
            auto_help: false,
            colour: Colour::default(),
        }
    }

    pub fn get_config(&self) -> &ParserConfig {
        &self.config
    }

    /// Create the [`HelpFormatter`] for this parser, colouring according to
    /// the configuration when the output `is_terminal`.
    pub fn formatter(&self, is_terminal: bool) -> HelpFormatter {
        let mut formatter = HelpFormatter::new(&self.config);
        formatter.set_colour(self.config.get_colour().resolve(is_terminal));
        formatter
    }

    fn run<W: Write>(
        &self,
        options: &mut Options<'_>,
        arguments: Vec<String>,
        out: &mut W,
        formatter: &HelpFormatter,
    ) -> Result<Outcome, ParseError> {
        options.inject_reserved();
        options.reset();

        debug!(app = %self.config.get_app(), tokens = arguments.len(), "parsing command line");

        if self.config.is_auto_help() && arguments.is_empty() {
            formatter.print_help(out, options)?;
            return Ok(Outcome::Stopped);
        }

        let mut state = ParseState::new(arguments);
        while let Some(token) = state.current() {
            match token {
                Token::Escape => {
                    trace!("escaping remaining arguments");
                    state.escape();
                    state.advance();
                }
                Token::Value(value) => self.handle_value(options, &mut state, value)?,
                Token::Long(token) => self.handle_long_option(options, &mut state, token)?,
                Token::Bundle => state.expand_current(),
                Token::Short(abbrev) => self.handle_short_option(options, &mut state, abbrev)?,
            }
        }

        self.check_required_options(options)?;

        if options.found(HELP) {
            debug!("help requested");
            formatter.print_help(out, options)?;
            return Ok(Outcome::Stopped);
        }
        if options.found(VERSION) {
            debug!("version requested");
            formatter.print_version(out)?;
            return Ok(Outcome::Stopped);
        }

        debug!("command line accepted");
        Ok(Outcome::Proceed)
    }

    fn check_required_options(&self, options: &Options<'_>) -> Result<(), ParseError> {
        match options.get_options().iter().find(|o| o.is_required() && !o.is_found()) {
            Some(missing) => Err(ParseError::MissingRequired(missing.get_name().to_string())),
            None => Ok(()),
        }
    }

    /// Mark option `index` as matched and make it the open option.
    fn handle_option(
        &self,
        options: &mut Options<'_>,
        state: &mut ParseState,
        index: usize,
    ) -> Result<(), ParseError> {
        if let Some(other) = options.group_conflict(index) {
            return Err(ParseError::MutuallyExclusive {
                first: options.get_options()[other].get_name().to_string(),
                second: options.get_options()[index].get_name().to_string(),
            });
        }

        let spec = options.spec_mut(index);
        trace!(option = %spec.get_name(), "matched option");
        spec.set_found();
        if spec.get_kind() == Kind::Boolean {
            if let Err(reason) = spec.assign("") {
                return Err(ParseError::InvalidValue {
                    option: spec.get_name().to_string(),
                    token: String::new(),
                    reason,
                });
            }
        }
        state.set_open(Some(index));
        Ok(())
    }

    fn handle_value(
        &self,
        options: &mut Options<'_>,
        state: &mut ParseState,
        token: String,
    ) -> Result<(), ParseError> {
        let index = match state.open() {
            Some(index) => index,
            None => {
                let index = options
                    .next_anonymous()
                    .ok_or_else(|| ParseError::UnclaimedArgument(token.clone()))?;
                self.handle_option(options, state, index)?;
                index
            }
        };

        let spec = options.spec_mut(index);
        if !spec.accepts(&token) {
            return Err(ParseError::PatternMismatch {
                option: spec.get_name().to_string(),
                token,
            });
        }
        if let Err(reason) = spec.assign(&token) {
            return Err(ParseError::InvalidValue {
                option: spec.get_name().to_string(),
                token,
                reason,
            });
        }
        trace!(option = %spec.get_name(), value = %token, "assigned argument");

        // A switch stays open until it has swallowed one argument, so a
        // value right after a boolean option is absorbed by it.
        if spec.get_kind() != Kind::Multiple {
            state.set_open(None);
        }
        state.advance();
        Ok(())
    }

    fn handle_long_option(
        &self,
        options: &mut Options<'_>,
        state: &mut ParseState,
        token: String,
    ) -> Result<(), ParseError> {
        // `--x=value` is not split: the name must be at least two characters.
        if let Some(pos) = token.find('=').filter(|&pos| pos >= 4) {
            state.split_current(pos);
            return Ok(());
        }

        let index = options
            .find_by_name(&token[2..])
            .ok_or(ParseError::UnknownOption(token))?;
        self.handle_option(options, state, index)?;
        state.advance();
        Ok(())
    }

    fn handle_short_option(
        &self,
        options: &mut Options<'_>,
        state: &mut ParseState,
        abbrev: Option<char>,
    ) -> Result<(), ParseError> {
        let index = match abbrev {
            Some(c) => options
                .find_by_abbrev(c)
                .ok_or_else(|| ParseError::UnknownOption(format!("-{}", c)))?,
            None => return Err(ParseError::UnknownOption("-".to_string())),
        };
        self.handle_option(options, state, index)?;
        state.advance();
        Ok(())
    }
}

impl Parser for DefaultParser {
    fn parse(&mut self, options: &mut Options<'_>) -> Result<Outcome, ParseError> {
        let arguments: Vec<String> = env::args().skip(1).collect();
        let mut out = stdout();
        let formatter = self.formatter(out.is_terminal());
        self.run(options, arguments, &mut out, &formatter)
    }

    fn parse_or_exit(&mut self, options: &mut Options<'_>) {
        match self.parse(options) {
            Ok(Outcome::Proceed) => {}
            Ok(Outcome::Stopped) => exit(0),
            Err(err) => {
                let mut err_out = stderr();
                let formatter = self.formatter(err_out.is_terminal());
                let _ = writeln!(err_out, "{}", err);
                let _ = formatter.print_help(&mut err_out, options);
                exit(1);
            }
        }
    }

    fn parse_args<T: ToString, W: Write>(
        &mut self,
        options: &mut Options<'_>,
        arguments: &[T],
        out: &mut W,
    ) -> Result<Outcome, ParseError> {
        let arguments = arguments.iter().map(|a| a.to_string()).collect();
        let formatter = self.formatter(false);
        self.run(options, arguments, out, &formatter)
    }
}
