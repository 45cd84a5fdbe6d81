//! # The optbind Library
//!
//! The optbind library parses command line options straight into program
//! variables. Each option is registered with a mutable borrow of the
//! variable it fills, so there is no lookup step after parsing: once the
//! [`Options`] registry is dropped the variables hold the parsed values.
//!
//! optbind supports:
//!
//! - GNU like long options, for example `--count 3` or `--count=3`
//! - POSIX like short options, for example `-c 3`
//! - Bundled short switches, for example `-xvf`
//! - Anonymous (positional) options, filled in registration order
//! - Multi-valued options bound to a `Vec`
//! - Required options, string patterns, enumerations and exclusive groups
//! - Automatic `--help` and `--version`
//!
//! A typical help message displayed by optbind looks like this:
//!
//! ```txt
//!
//! greet 1.0
//!
//! Says hello.
//!
//! Options:
//!     --count, -c <uint>       = Number of greetings (default 1)
//!     --loud, -l               = Shout
//!     [--names, -n] <arg> ...  = People to greet
//!     --help, -h               = Show usage information
//!     --version, -v            = Show version information
//!
//! ```
//!
//! # Examples
//!
//! ```
//! use optbind::{DefaultParser, Options, Outcome, ParseError, Parser};
//!
//! let mut count = 1u32;
//! let mut loud = false;
//! let mut names: Vec<String> = Vec::new();
//!
//! let mut parser = DefaultParser::builder("greet", "Says hello.")
//!     .version("1.0")
//!     .build()
//!     .unwrap();
//!
//! let mut options = Options::new();
//! options.add(&mut count, "count", 'c', "Number of greetings").unwrap();
//! options.add(&mut loud, "loud", 'l', "Shout").unwrap();
//! options.add_anonymous(&mut names, "names", 'n', "People to greet").unwrap();
//!
//! let mut out = Vec::new();
//! let result = parser.parse_args(&mut options, &["--colour"], &mut out);
//! assert!(matches!(result, Err(ParseError::UnknownOption(_))));
//!
//! // Every parse starts from a clean registry.
//! let result = parser.parse_args(&mut options, &["Ann", "Bob", "--count=2"], &mut out);
//! assert!(matches!(result, Ok(Outcome::Proceed)));
//! drop(options);
//!
//! assert_eq!(count, 2);
//! assert!(!loud);
//! assert_eq!(names, ["Ann", "Bob"]);
//! ```
//!
//! A program would normally let the parser read `std::env::args()` and exit
//! on `--help`, `--version` or bad input:
//!
//! ```no_run
//! use optbind::{Colour, DefaultParser, Options, Parser};
//!
//! let mut level = 0u8;
//! let mut parser = DefaultParser::builder("tool", "Does things.")
//!     .colour(Colour::Auto)
//!     .build()
//!     .unwrap();
//! let mut options = Options::new();
//! options.add(&mut level, "level", 'L', "Verbosity level").unwrap();
//! parser.parse_or_exit(&mut options);
//! drop(options);
//! println!("level={}", level);
//! ```

pub use config::{Colour, ParserConfig};
pub use error::{ConfigError, ConversionError, ParseError, RegistrationError};
pub use format::HelpFormatter;
pub use option::{Kind, OptionBuilder, OptionSpec, Options};
pub use parser::{DefaultParser, Outcome, Parser, ParserBuilder};
pub use sink::{Bind, Sink};
pub use value::{Enumerated, Validator, Value, ValueKind};

mod config;
mod error;
mod format;
mod option;
mod parser;
mod scan;
mod sink;
mod util;
mod value;
