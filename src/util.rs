use crate::error::RegistrationError;

pub struct Util;

impl Util {
    /// Strip surrounding whitespace and hyphens, so `"--count"`, `"count"`
    /// and `" -count "` all name the same option.
    pub fn trim_name(name: &str) -> &str {
        name.trim_matches(|c: char| c.is_ascii_whitespace() || c == '-')
    }
}

pub struct OptionValidator;

impl OptionValidator {
    /// Validate and normalise a long option name.
    pub fn validate_name(name: &str) -> Result<String, RegistrationError> {
        let trimmed = Util::trim_name(name);
        if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(RegistrationError::InvalidName(name.to_string()));
        }
        Ok(trimmed.to_string())
    }

    pub fn validate_abbrev(abbrev: char) -> Result<(), RegistrationError> {
        if !abbrev.is_ascii_graphic() || abbrev == '-' {
            return Err(RegistrationError::InvalidAbbrev(abbrev));
        }
        Ok(())
    }
}
