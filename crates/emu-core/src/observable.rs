//! Read-only inspection of pacing and machine state.
//!
//! Debuggers and title bars query state by path. Queries never change it.

use std::fmt;
use std::time::Duration;

/// A dynamically-typed value returned by a state query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U32(u32),
    U64(u64),
    F64(f64),
    /// A span of wall-clock time.
    Duration(Duration),
    String(String),
    /// Absent optional value (e.g., no pause reason recorded).
    None,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v:.3}"),
            Value::Duration(d) => write!(f, "{:.3}ms", d.as_secs_f64() * 1000.0),
            Value::String(v) => write!(f, "{v}"),
            Value::None => write!(f, "-"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a property by dotted path, e.g. `speed.selected` or
    /// `timer.armed`. Returns `None` for unknown paths.
    fn query(&self, path: &str) -> Option<Value>;

    /// Every path accepted by [`Observable::query`].
    fn query_paths(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(Value::from(Duration::from_millis(20)).to_string(), "20.000ms");
        assert_eq!(Value::from(Some("menu active")).to_string(), "menu active");
        assert_eq!(Value::from(None::<&str>).to_string(), "-");
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
