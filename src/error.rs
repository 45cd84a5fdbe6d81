use std::io;

use thiserror::Error;

/// Error raised while registering an option.
///
/// These are programmer errors: the option table is wrong, not the user's input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The long name is blank or contains whitespace or control characters.
    #[error("invalid long option: \"{0}\"")]
    InvalidName(String),

    /// Another option already uses this long name.
    #[error("duplicate long option: \"--{0}\"")]
    DuplicateName(String),

    /// The long name is one of the automatically provided `help` or `version`.
    #[error("reserved long option: \"--{0}\"")]
    ReservedName(String),

    /// The abbreviation is not a printable, non-hyphen ASCII character.
    #[error("invalid short option: \"-{0}\"")]
    InvalidAbbrev(char),

    /// Another option already uses this abbreviation.
    #[error("duplicate short option: \"-{0}\"")]
    DuplicateAbbrev(char),

    /// A boolean option was flagged as anonymous or required.
    #[error("boolean options can't be anonymous or required: \"--{0}\"")]
    IllegalBooleanShape(String),

    /// A multi-valued anonymous option already absorbs every free argument.
    #[error("all anonymous arguments are already accounted for: \"--{0}\"")]
    AnonymousSlotExhausted(String),

    /// The option has no description.
    #[error("missing option description: \"--{0}\"")]
    EmptyDescription(String),

    /// The pattern was given for a non-string option, or does not compile.
    #[error("invalid pattern for \"--{name}\": {reason}")]
    InvalidPattern { name: String, reason: String },

    /// The bound variable's current value is rejected by the option's pattern.
    #[error("default value does not match pattern: \"--{0}\"")]
    DefaultMismatch(String),
}

/// Error raised while scanning the command line.
///
/// These describe bad user input; the caller usually prints the message
/// followed by the help text and exits with a non-zero status.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A free-standing argument has no anonymous option left to absorb it.
    #[error("argument not associated with an option: \"{0}\"")]
    UnclaimedArgument(String),

    /// No option matches this `--name` or `-x` token.
    #[error("unknown option: \"{0}\"")]
    UnknownOption(String),

    /// The argument is rejected by the option's validator.
    #[error("invalid argument for \"--{option}\": \"{token}\"")]
    PatternMismatch { option: String, token: String },

    /// The argument passed validation but could not be converted.
    #[error("invalid argument for \"--{option}\": \"{token}\" ({reason})")]
    InvalidValue {
        option: String,
        token: String,
        reason: ConversionError,
    },

    /// Two options from the same exclusive group were given.
    #[error("options are mutually exclusive: \"--{first}\", \"--{second}\"")]
    MutuallyExclusive { first: String, second: String },

    /// A required option never appeared.
    #[error("required option not found: \"--{0}\"")]
    MissingRequired(String),

    /// The help or version text could not be written.
    #[error("unable to write output: {0}")]
    Output(#[from] io::Error),
}

/// Failure to turn an argument string into the bound variable's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    pub fn of(target: &str, token: &str) -> ConversionError {
        ConversionError(format!("cannot convert \"{}\" to {}", token, target))
    }
}

/// Error raised when the parser configuration is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no application name was supplied")]
    EmptyAppName,

    #[error("no application description was supplied")]
    EmptyDescription,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages_carry_the_offender() {
        let err = ParseError::UnknownOption("--frobnicate".to_string());
        assert_eq!(err.to_string(), "unknown option: \"--frobnicate\"");

        let err = ParseError::MissingRequired("count".to_string());
        assert_eq!(err.to_string(), "required option not found: \"--count\"");

        let err = RegistrationError::DuplicateAbbrev('x');
        assert_eq!(err.to_string(), "duplicate short option: \"-x\"");
    }

    #[test]
    fn test_invalid_value_includes_reason() {
        let err = ParseError::InvalidValue {
            option: "level".to_string(),
            token: "300".to_string(),
            reason: ConversionError::of("u8", "300"),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument for \"--level\": \"300\" (cannot convert \"300\" to u8)"
        );
    }
}
