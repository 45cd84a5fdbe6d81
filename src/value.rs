use std::any::type_name;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConversionError;

static SIGNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("static regex must compile"));
static UNSIGNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d+$").expect("static regex must compile"));
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([Ee][+-]?\d+)?$").expect("static regex must compile")
});

/// The closed set of value domains an option argument can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Signed,
    Unsigned,
    Float,
    Text,
    Enumeration(&'static [&'static str]),
    Custom,
}

impl ValueKind {
    /// The tag shown after the option name in the help table.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ValueKind::Signed => "<int>",
            ValueKind::Unsigned => "<uint>",
            ValueKind::Float => "<real>",
            _ => "<arg>",
        }
    }

    /// Only string-valued options may carry a user pattern.
    pub fn accepts_pattern(&self) -> bool {
        matches!(self, ValueKind::Text)
    }

    pub(crate) fn validator(&self) -> Option<Validator> {
        match self {
            ValueKind::Signed => Some(Validator::Pattern(SIGNED_RE.clone())),
            ValueKind::Unsigned => Some(Validator::Pattern(UNSIGNED_RE.clone())),
            ValueKind::Float => Some(Validator::Pattern(FLOAT_RE.clone())),
            ValueKind::Enumeration(names) => Some(Validator::Names(names)),
            ValueKind::Text | ValueKind::Custom => None,
        }
    }
}

/// Predicate applied to a raw argument before it reaches the sink.
#[derive(Debug, Clone)]
pub enum Validator {
    Pattern(Regex),
    Names(&'static [&'static str]),
}

impl Validator {
    /// Compile a user pattern so that it has to match the whole argument.
    pub fn anchored(pattern: &str) -> Result<Validator, regex::Error> {
        Regex::new(&format!("^(?:{})$", pattern)).map(Validator::Pattern)
    }

    pub fn accepts(&self, token: &str) -> bool {
        match self {
            Validator::Pattern(re) => re.is_match(token),
            Validator::Names(names) => names.contains(&token),
        }
    }
}

/// A scalar type that an option argument can be converted into.
///
/// Implemented for the integer and floating point primitives, [`String`],
/// [`PathBuf`] and every [`Enumerated`] type. Other types can implement it
/// directly; they are shown as `<arg>` and are not validated beyond
/// [`Value::from_token`]. Binding a single variable also needs `Clone`, so
/// that each parse can start from the bound value.
pub trait Value: Sized {
    fn kind() -> ValueKind {
        ValueKind::Custom
    }

    fn from_token(token: &str) -> Result<Self, ConversionError>;

    /// Text shown as `(default ...)` in the help table, `None` to omit it.
    fn default_text(&self) -> Option<String> {
        None
    }

    /// The value as a string, for checking a default against a pattern.
    fn as_text(&self) -> Option<&str> {
        None
    }
}

macro_rules! impl_numeric_value {
    ($kind:expr, $zero:expr, $($t:ty),*) => {
        $(
            impl Value for $t {
                fn kind() -> ValueKind {
                    $kind
                }

                fn from_token(token: &str) -> Result<Self, ConversionError> {
                    token
                        .parse::<$t>()
                        .map_err(|_| ConversionError::of(type_name::<$t>(), token))
                }

                fn default_text(&self) -> Option<String> {
                    if *self == $zero {
                        None
                    } else {
                        Some(self.to_string())
                    }
                }
            }
        )*
    };
}

impl_numeric_value!(ValueKind::Signed, 0, i8, i16, i32, i64, i128, isize);
impl_numeric_value!(ValueKind::Unsigned, 0, u8, u16, u32, u64, u128, usize);
impl_numeric_value!(ValueKind::Float, 0.0, f32, f64);

impl Value for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        Ok(token.to_string())
    }

    fn default_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!("{:?}", self))
        }
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Value for PathBuf {
    fn from_token(token: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(token))
    }

    fn default_text(&self) -> Option<String> {
        if self.as_os_str().is_empty() {
            None
        } else {
            Some(format!("{:?}", self.display().to_string()))
        }
    }
}

/// An enumeration selectable by name on the command line.
///
/// # Examples
///
/// ```
/// use optbind::Enumerated;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl Enumerated for Level {
///     const NAMES: &'static [&'static str] = &["low", "high"];
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "low" => Some(Level::Low),
///             "high" => Some(Level::High),
///             _ => None,
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         Self::NAMES[*self as usize]
///     }
/// }
/// ```
pub trait Enumerated: Sized {
    const NAMES: &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;

    fn name(&self) -> &'static str;
}

impl<T: Enumerated> Value for T {
    fn kind() -> ValueKind {
        ValueKind::Enumeration(T::NAMES)
    }

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        T::from_name(token)
            .ok_or_else(|| ConversionError(format!("invalid enumeration value: \"{}\"", token)))
    }

    // Enumerations always show their default, even the first enumerator.
    fn default_text(&self) -> Option<String> {
        Some(self.name().to_string())
    }
}
