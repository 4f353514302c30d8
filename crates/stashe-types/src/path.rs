use std::fmt;

use crate::error::TypeError;
use crate::key::Key;

/// An ordered, non-empty sequence of keys addressing a nested value.
///
/// Every key but the last names an intermediate node; the last names the
/// slot that is read, written, or removed. A path of one key addresses a
/// top-level slot.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    /// A path of exactly one key.
    pub fn single(key: impl Into<Key>) -> Self {
        Self {
            keys: vec![key.into()],
        }
    }

    /// A path starting at `first`, followed by `rest`.
    pub fn new<I>(first: impl Into<Key>, rest: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let mut keys = vec![first.into()];
        keys.extend(rest.into_iter().map(Into::into));
        Self { keys }
    }

    /// Parse a dotted path such as `users.alice.name`.
    ///
    /// Keys containing a literal `.` cannot be expressed this way; build the
    /// path from keys instead.
    pub fn parse_dotted(input: &str) -> Result<Self, TypeError> {
        if input.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        let mut keys = Vec::new();
        for part in input.split('.') {
            if part.is_empty() {
                return Err(TypeError::EmptySegment {
                    input: input.to_owned(),
                });
            }
            keys.push(Key::from(part));
        }
        Ok(Self { keys })
    }

    /// Append a key to the end of the path.
    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: impl Into<Key>) -> Self {
        let mut next = self.clone();
        next.push(key);
        next
    }

    /// All keys, in order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys. Always at least 1.
    pub fn depth(&self) -> usize {
        self.keys.len()
    }

    /// `true` if the path addresses a top-level slot.
    pub fn is_single(&self) -> bool {
        self.keys.len() == 1
    }

    /// The final key and the intermediate keys leading to it.
    pub fn split_last(&self) -> (&Key, &[Key]) {
        match self.keys.split_last() {
            Some(parts) => parts,
            None => unreachable!("Path is never empty"),
        }
    }

    /// The first key.
    pub fn first(&self) -> &Key {
        &self.keys[0]
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(key.as_str())?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Key>> for Path {
    type Error = TypeError;

    fn try_from(keys: Vec<Key>) -> Result<Self, Self::Error> {
        if keys.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        Ok(Self { keys })
    }
}

impl From<Key> for Path {
    fn from(key: Key) -> Self {
        Self::single(key)
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Self::single(key)
    }
}

/// Build a [`Path`] from one or more keys.
///
/// ```
/// use stashe_types::path;
///
/// let p = path!["users", 42, "name"];
/// assert_eq!(p.to_string(), "users.42.name");
/// ```
#[macro_export]
macro_rules! path {
    ($first:expr $(, $rest:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut p = $crate::Path::single($first);
        $( p.push($rest); )*
        p
    }};
}
