//! The value model: everything an `Eval` call can produce.

pub mod environment;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use environment::Environment;

use crate::ast::{BlockStatement, Identifier};

#[derive(Debug)]
pub struct FunctionObject {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Environment,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Environment { .. }")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltIn {
    pub name: &'static str,
    pub func: fn(&[Object]) -> Object,
}

impl PartialEq for BuiltIn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Rc<RefCell<Vec<Object>>>),
    Map(Rc<RefCell<HashMap<MapKey, (Object, Object)>>>),
    Function(Rc<FunctionObject>),
    BuiltIn(BuiltIn),
    ReturnValue(Box<Object>),
    Error(String),
}

impl Object {
    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn map(pairs: HashMap<MapKey, (Object, Object)>) -> Self {
        Object::Map(Rc::new(RefCell::new(pairs)))
    }

    /// The `Type()` tag used in error messages and `inspect()` dispatch.
    pub fn object_type(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Map(_) => "MAP",
            Object::Function(_) => "FUNCTION",
            Object::BuiltIn(_) => "BUILTIN",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
        }
    }

    /// A human-readable rendering used by `print`, the REPL, and the file
    /// runner's final output line.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::String(value) => value.clone(),
            Object::Null => "null".to_string(),
            Object::Array(elements) => {
                let rendered: Vec<String> =
                    elements.borrow().iter().map(Object::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Object::Map(pairs) => {
                let rendered: Vec<String> = pairs
                    .borrow()
                    .values()
                    .map(|(key, value)| format!("{}: {}", key.inspect(), value.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Object::Function(function) => {
                let params: Vec<String> =
                    function.parameters.iter().map(|p| p.value.clone()).collect();
                format!("func({}) {{ .. }}", params.join(", "))
            }
            Object::BuiltIn(builtin) => format!("builtin function: {}", builtin.name),
            Object::ReturnValue(inner) => inner.inspect(),
            Object::Error(message) => format!("Error: {message}"),
        }
    }

    /// `true` for every value except the `NULL` and `FALSE` singletons.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Computes this value's hash key for map storage, if it is hashable
    /// (`Integer`, `Boolean`, and `String` only).
    pub fn map_key(&self) -> Option<MapKey> {
        match self {
            Object::Integer(value) => Some(MapKey::new(KeyKind::Integer, *value as u64)),
            Object::Boolean(value) => {
                Some(MapKey::new(KeyKind::Boolean, if *value { 1 } else { 0 }))
            }
            Object::String(value) => Some(MapKey::new(KeyKind::String, fnv1a_64(value.as_bytes()))),
            _ => None,
        }
    }
}

/// Reference-identity equality for shared values, value equality for plain
/// ones. `Integer`/`Boolean`/`String`/`Null` carry their data inline, so
/// value equality and identity equality coincide for them.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Map(a), Object::Map(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::BuiltIn(a), Object::BuiltIn(b)) => a == b,
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

/// Kept distinct from `Object::object_type()` strings so key comparisons
/// don't allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Integer,
    Boolean,
    String,
}

/// Collisions between distinct strings that hash to the same `u64` are not
/// resolved: acceptable for this language, not safe against adversarial
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapKey {
    pub kind: KeyKind,
    pub value: u64,
}

impl MapKey {
    pub fn new(kind: KeyKind, value: u64) -> Self {
        Self { kind, value }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_hash_to_the_same_map_key() {
        let a = Object::String("hello".to_string());
        let b = Object::String("hello".to_string());
        assert_eq!(a.map_key(), b.map_key());
    }

    #[test]
    fn integers_and_booleans_are_hashable() {
        assert!(Object::Integer(5).map_key().is_some());
        assert!(Object::Boolean(true).map_key().is_some());
    }

    #[test]
    fn functions_are_not_hashable() {
        let function = Object::Function(Rc::new(FunctionObject {
            parameters: vec![],
            body: BlockStatement {
                token: crate::token::Token::new(crate::token::TokenType::LBrace, "{"),
                statements: vec![],
            },
            env: Environment::new(),
        }));
        assert_eq!(function.map_key(), None);
    }

    #[test]
    fn null_and_false_are_falsy_everything_else_is_truthy() {
        assert!(!Object::Null.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(Object::Integer(0).is_truthy());
    }

    #[test]
    fn inspects_an_error_with_its_prefix() {
        assert_eq!(Object::Error("boom".to_string()).inspect(), "Error: boom");
    }
}
