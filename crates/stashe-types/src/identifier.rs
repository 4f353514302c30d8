use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-wide source of automatic identifiers. Starts at 0.
static NEXT_AUTO_ID: AtomicI64 = AtomicI64::new(0);

/// Names the data segment owned by one cache instance.
///
/// Two instances with equal identifiers share a segment. `Number(1)` and
/// `Name("1")` are different identifiers.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier, including every automatically assigned one.
    Number(i64),
    /// Caller-chosen textual identifier.
    Name(String),
}

impl Identifier {
    /// Allocate the next automatic identifier.
    ///
    /// Monotonic for the lifetime of the process; never hands out the same
    /// number twice.
    pub fn next_auto() -> Self {
        Self::Number(NEXT_AUTO_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the number if this is a numeric identifier.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Name(_) => None,
        }
    }

    /// Returns the name if this is a textual identifier.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Name(s) => Some(s),
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "Identifier({n})"),
            Self::Name(s) => write!(f, "Identifier({s:?})"),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// Integers parse as [`Identifier::Number`], anything else as a name.
impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Name(s.to_owned()),
        })
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for Identifier {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::Name(s.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ids_are_monotonic() {
        let a = Identifier::next_auto().as_number().unwrap();
        let b = Identifier::next_auto().as_number().unwrap();
        assert!(b > a);
        assert!(a >= 0);
    }

    #[test]
    fn number_and_name_are_distinct() {
        assert_ne!(Identifier::from(1), Identifier::from("1"));
    }

    #[test]
    fn parse_prefers_numbers() {
        assert_eq!("999".parse::<Identifier>().unwrap(), Identifier::Number(999));
        assert_eq!(
            "foo".parse::<Identifier>().unwrap(),
            Identifier::Name("foo".into())
        );
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(Identifier::from(3).to_string(), "3");
        assert_eq!(Identifier::from("users").to_string(), "users");
        assert_eq!(format!("{:?}", Identifier::from("x")), "Identifier(\"x\")");
    }

    #[test]
    fn serde_is_untagged() {
        let json = serde_json::to_string(&Identifier::from(7)).unwrap();
        assert_eq!(json, "7");
        let json = serde_json::to_string(&Identifier::from("seven")).unwrap();
        assert_eq!(json, "\"seven\"");

        let back: Identifier = serde_json::from_str("\"seven\"").unwrap();
        assert_eq!(back, Identifier::from("seven"));
    }
}
