use std::fmt;

use stashe_types::Key;

/// Suffix appended to every user key before it is stored.
const SAFE_SUFFIX: char = ' ';

/// A user key in its stored form.
///
/// Obtained only through [`SafeKey::from_key`], so raw user strings and
/// stored keys cannot be mixed up.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafeKey(String);

impl SafeKey {
    /// Transform a user key into its stored form.
    pub fn from_key(key: &Key) -> Self {
        let mut s = String::with_capacity(key.as_str().len() + 1);
        s.push_str(key.as_str());
        s.push(SAFE_SUFFIX);
        Self(s)
    }

    /// Recover the user key. Exactly one trailing suffix is removed.
    pub fn to_key(&self) -> Key {
        Key::from(self.0.strip_suffix(SAFE_SUFFIX).unwrap_or(&self.0))
    }

    /// The stored form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SafeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SafeKey({:?})", self.0)
    }
}

impl From<&Key> for SafeKey {
    fn from(key: &Key) -> Self {
        Self::from_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_form_differs_from_user_form() {
        let safe = SafeKey::from_key(&Key::from("keys"));
        assert_eq!(safe.as_str(), "keys ");
        assert_ne!(safe.as_str(), "keys");
    }

    #[test]
    fn reverses_exactly_one_suffix() {
        for raw in ["foo", "", "trailing ", "two  ", " lead"] {
            let key = Key::from(raw);
            assert_eq!(SafeKey::from_key(&key).to_key(), key, "key {raw:?}");
        }
    }

    #[test]
    fn numeric_and_string_keys_share_a_slot() {
        assert_eq!(SafeKey::from_key(&Key::from(5)), SafeKey::from_key(&Key::from("5")));
    }
}
