use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::cycle::{Ancestors, FormatGuard};
use crate::node::Node;

/// A stored callable. Invoked with no arguments.
pub type Callable = Rc<dyn Fn() -> Value>;

/// Anything that can be stored under a key.
///
/// Composite variants (`List`, `Node`, `Function`, `Opaque`) are reference
/// counted. Cloning a `Value` shares the underlying data, so a composite
/// that is stored and later mutated through another handle shows the
/// mutation on the next read.
#[derive(Clone)]
pub enum Value {
    /// Explicitly stored "no value". Distinct from a key that was never set.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Rc<RefCell<Vec<Value>>>),
    /// A nested map. Deep paths descend through these.
    Node(Node),
    Function(Callable),
    /// Any other caller-owned object, held by reference.
    Opaque(Rc<dyn Any>),
}

impl Value {
    /// A shared list holding `items`.
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    /// Wrap a closure as a stored callable.
    pub fn function(f: impl Fn() -> Value + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    /// Store an arbitrary object by reference.
    pub fn opaque<T: Any>(object: T) -> Self {
        Self::Opaque(Rc::new(object))
    }

    /// Truthiness used by path traversal.
    ///
    /// `Undefined`, `Null`, `false`, `0`, `-0`, `NaN` and `""` are falsy.
    /// Every other value, including empty lists and empty nodes, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Node(_) | Self::Function(_) | Self::Opaque(_) => true,
        }
    }

    /// `true` for `Null` and `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<RefCell<Vec<Value>>>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Borrow an opaque object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Invoke a stored callable. `None` if this is not a function.
    pub fn call(&self) -> Option<Value> {
        match self {
            Self::Function(f) => Some(f()),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Node(_) => "node",
            Self::Function(_) => "function",
            Self::Opaque(_) => "opaque",
        }
    }

    /// JSON rendering of this value.
    ///
    /// Returns `None` for values JSON cannot carry (`Undefined`, functions,
    /// opaque objects). Inside a list those become `null`; inside a node the
    /// entry is left out. Non-finite numbers render as `null`, and so does
    /// a list or node reached again from inside itself.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.to_json_within(&mut Ancestors::default())
    }

    pub(crate) fn to_json_within(&self, ancestors: &mut Ancestors) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        match self {
            Self::Undefined | Self::Function(_) | Self::Opaque(_) => None,
            Self::Null => Some(Json::Null),
            Self::Bool(b) => Some(Json::Bool(*b)),
            Self::Number(n) => Some(
                serde_json::Number::from_f64(*n)
                    .map(Json::Number)
                    .unwrap_or(Json::Null),
            ),
            Self::String(s) => Some(Json::String(s.clone())),
            Self::List(items) => {
                if !ancestors.enter(Rc::as_ptr(items).cast()) {
                    return Some(Json::Null);
                }
                let array = items
                    .borrow()
                    .iter()
                    .map(|v| v.to_json_within(ancestors).unwrap_or(Json::Null))
                    .collect();
                ancestors.leave();
                Some(Json::Array(array))
            }
            Self::Node(node) => Some(
                node.to_json_within(ancestors)
                    .map_or(Json::Null, Json::Object),
            ),
        }
    }
}

impl PartialEq for Value {
    /// Scalars compare by value (`NaN` is never equal to itself), lists
    /// elementwise, and every other composite by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Node(a), Self::Node(b)) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Self::Opaque(a), Self::Opaque(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                let Some(_guard) = FormatGuard::enter(Rc::as_ptr(items).cast()) else {
                    return f.write_str("[..]");
                };
                f.debug_list().entries(items.borrow().iter()).finish()
            }
            Self::Node(node) => fmt::Debug::fmt(node, f),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .unwrap_or(serde_json::Value::Null)
            .serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::list(items)
    }
}

/// `None` becomes [`Value::Null`].
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// JSON objects become nodes, so they can be walked by deep paths.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::list(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Node(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}
