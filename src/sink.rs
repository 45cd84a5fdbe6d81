//! Assignment targets for option arguments.
//!
//! The parser never sees the caller's variable types. Each registered option
//! owns a [`Sink`] that converts a raw argument and stores it, and the [`Bind`]
//! trait produces the right sink from a mutable borrow of the variable.

use crate::error::ConversionError;
use crate::option::Kind;
use crate::value::{Value, ValueKind};

/// The per-option target that receives converted arguments.
///
/// Implement this for custom behavior (counting flags, collecting into a set,
/// ...) and register it through a `Box<dyn Sink>`.
pub trait Sink {
    /// How many arguments the option consumes.
    fn kind(&self) -> Kind;

    /// The domain arguments are converted to.
    fn value_kind(&self) -> ValueKind {
        ValueKind::Custom
    }

    /// Convert `token` and assign or accumulate it.
    ///
    /// Boolean sinks are called with an empty token when their option is
    /// matched, and ignore whatever token they receive.
    fn assign(&mut self, token: &str) -> Result<(), ConversionError>;

    /// Called before every parse, so that repeated parses start clean.
    fn reset(&mut self) {}

    fn default_text(&self) -> Option<String> {
        None
    }

    /// The current value, when the sink holds a string.
    fn current_text(&self) -> Option<&str> {
        None
    }
}

/// Something that can be bound to an option.
///
/// Implemented for `&mut bool` (a boolean switch), `&mut T` where
/// `T: Value + Clone`, `&mut Vec<T>` where `T: Value`, and for boxed custom
/// sinks. Switches and scalars go back to their bound value on every reset;
/// sequences start empty.
pub trait Bind<'a> {
    fn into_sink(self) -> Box<dyn Sink + 'a>;
}

/// A boolean target. Remembers the value it was bound with so that every
/// parse starts from it.
struct Switch<'a> {
    target: &'a mut bool,
    initial: bool,
}

impl Sink for Switch<'_> {
    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn assign(&mut self, _token: &str) -> Result<(), ConversionError> {
        *self.target = true;
        Ok(())
    }

    fn reset(&mut self) {
        *self.target = self.initial;
    }
}

struct Scalar<'a, T> {
    target: &'a mut T,
    initial: T,
}

impl<T: Value + Clone> Sink for Scalar<'_, T> {
    fn kind(&self) -> Kind {
        Kind::Single
    }

    fn value_kind(&self) -> ValueKind {
        T::kind()
    }

    fn assign(&mut self, token: &str) -> Result<(), ConversionError> {
        *self.target = T::from_token(token)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.target.clone_from(&self.initial);
    }

    fn default_text(&self) -> Option<String> {
        self.target.default_text()
    }

    fn current_text(&self) -> Option<&str> {
        self.target.as_text()
    }
}

struct Sequence<'a, T>(&'a mut Vec<T>);

impl<T: Value> Sink for Sequence<'_, T> {
    fn kind(&self) -> Kind {
        Kind::Multiple
    }

    fn value_kind(&self) -> ValueKind {
        T::kind()
    }

    fn assign(&mut self, token: &str) -> Result<(), ConversionError> {
        self.0.push(T::from_token(token)?);
        Ok(())
    }

    fn reset(&mut self) {
        self.0.clear();
    }
}

/// Stands in for the automatically added `help` and `version` switches,
/// whose only state is the option's `found` flag.
pub(crate) struct Marker;

impl Sink for Marker {
    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn assign(&mut self, _token: &str) -> Result<(), ConversionError> {
        Ok(())
    }
}

impl<'a> Bind<'a> for &'a mut bool {
    fn into_sink(self) -> Box<dyn Sink + 'a> {
        let initial = *self;
        Box::new(Switch { target: self, initial })
    }
}

impl<'a, T: Value + Clone + 'a> Bind<'a> for &'a mut T {
    fn into_sink(self) -> Box<dyn Sink + 'a> {
        let initial = self.clone();
        Box::new(Scalar { target: self, initial })
    }
}

impl<'a, T: Value + 'a> Bind<'a> for &'a mut Vec<T> {
    fn into_sink(self) -> Box<dyn Sink + 'a> {
        self.clear();
        Box::new(Sequence(self))
    }
}

impl<'a> Bind<'a> for Box<dyn Sink + 'a> {
    fn into_sink(self) -> Box<dyn Sink + 'a> {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_switch_ignores_payload() {
        let mut flag = false;
        {
            let mut sink = (&mut flag).into_sink();
            assert_eq!(sink.kind(), Kind::Boolean);
            sink.assign("leftover").unwrap();
        }
        assert!(flag);
    }

    #[test]
    fn test_scalar_last_write_wins() {
        let mut level = 3i32;
        {
            let mut sink = (&mut level).into_sink();
            assert_eq!(sink.kind(), Kind::Single);
            assert_eq!(sink.default_text(), Some("3".to_string()));
            sink.assign("5").unwrap();
            sink.assign("-8").unwrap();
            assert!(sink.assign("x").is_err());
        }
        assert_eq!(level, -8);
    }

    #[test]
    fn test_reset_restores_bound_value() {
        let (mut flag, mut level, mut name) = (false, 3i32, "Hello".to_string());
        {
            let mut switch = (&mut flag).into_sink();
            let mut scalar = (&mut level).into_sink();
            let mut text = (&mut name).into_sink();
            switch.assign("").unwrap();
            scalar.assign("9").unwrap();
            text.assign("Goodbye").unwrap();
            switch.reset();
            scalar.reset();
            text.reset();
        }
        assert!(!flag);
        assert_eq!(level, 3);
        assert_eq!(name, "Hello");
    }

    #[test]
    fn test_sequence_accumulates_and_resets() {
        let mut values = vec![1u32, 2];
        {
            let mut sink = (&mut values).into_sink();
            assert_eq!(sink.kind(), Kind::Multiple);
            sink.assign("7").unwrap();
            sink.assign("9").unwrap();
        }
        assert_eq!(values, vec![7, 9]);
        {
            let mut sink = (&mut values).into_sink();
            sink.assign("4").unwrap();
            sink.reset();
            sink.assign("5").unwrap();
        }
        assert_eq!(values, vec![5]);
    }

    #[test]
    fn test_text_sink_exposes_current_value() {
        let mut name = "Hello".to_string();
        let sink = (&mut name).into_sink();
        assert_eq!(sink.current_text(), Some("Hello"));
        assert_eq!(sink.value_kind(), ValueKind::Text);
    }
}
