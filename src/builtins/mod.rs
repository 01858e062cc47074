//! The built-in function registry.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::object::{BuiltIn, Object};

static REGISTRY: Lazy<HashMap<&'static str, BuiltIn>> = Lazy::new(|| {
    let entries: [BuiltIn; 9] = [
        BuiltIn { name: "length", func: length },
        BuiltIn { name: "firstElement", func: first_element },
        BuiltIn { name: "lastElement", func: last_element },
        BuiltIn { name: "push", func: push },
        BuiltIn { name: "removeLast", func: remove_last },
        BuiltIn { name: "removeAt", func: remove_at },
        BuiltIn { name: "copy", func: copy },
        BuiltIn { name: "print", func: print },
        BuiltIn { name: "range", func: range },
    ];
    entries.into_iter().map(|b| (b.name, b)).collect()
});

/// Looks up a built-in by name, the fallback the evaluator uses once an
/// identifier isn't found in the environment chain.
pub fn lookup(name: &str) -> Option<Object> {
    REGISTRY.get(name).map(|b| Object::BuiltIn(*b))
}

fn wrong_arity(name: &str, expected: &str, got: usize) -> Object {
    Object::Error(format!(
        "Wrong number of arguments for '{name}'. Expected {expected}, got {got}"
    ))
}

fn unsupported(name: &str, got: &Object) -> Object {
    Object::Error(format!(
        "Argument to '{name}' not supported, got {}",
        got.object_type()
    ))
}

fn length(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("length", "1", args.len());
    }
    match &args[0] {
        Object::String(value) => Object::Integer(value.len() as i64),
        Object::Array(elements) => Object::Integer(elements.borrow().len() as i64),
        other => unsupported("length", other),
    }
}

fn first_element(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("firstElement", "1", args.len());
    }
    match &args[0] {
        Object::Array(elements) => elements.borrow().first().cloned().unwrap_or(Object::Null),
        other => unsupported("firstElement", other),
    }
}

fn last_element(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("lastElement", "1", args.len());
    }
    match &args[0] {
        Object::Array(elements) => elements.borrow().last().cloned().unwrap_or(Object::Null),
        other => unsupported("lastElement", other),
    }
}

fn push(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity("push", "2", args.len());
    }
    match &args[0] {
        Object::Array(elements) => {
            elements.borrow_mut().push(args[1].clone());
            args[0].clone()
        }
        other => unsupported("push", other),
    }
}

fn remove_last(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("removeLast", "1", args.len());
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.borrow_mut().pop().is_none() {
                return Object::Error("Cannot removeLast from empty array".to_string());
            }
            args[0].clone()
        }
        other => unsupported("removeLast", other),
    }
}

fn remove_at(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity("removeAt", "2", args.len());
    }
    let (Object::Array(elements), Object::Integer(index)) = (&args[0], &args[1]) else {
        return unsupported("removeAt", &args[0]);
    };
    let mut elements = elements.borrow_mut();
    let len = elements.len() as i64;
    if *index < 0 || *index >= len {
        return Object::Error(format!(
            "Index out of range. Received {index}. should be between 0 and {}",
            len - 1
        ));
    }
    elements.remove(*index as usize);
    drop(elements);
    args[0].clone()
}

fn copy(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("copy", "1", args.len());
    }
    match &args[0] {
        Object::Array(elements) => Object::array(elements.borrow().clone()),
        other => unsupported("copy", other),
    }
}

fn print(args: &[Object]) -> Object {
    for arg in args {
        println!("{}", arg.inspect());
    }
    Object::Null
}

fn range(args: &[Object]) -> Object {
    let (start, end) = match args {
        [Object::Integer(end)] => (0, *end),
        [Object::Integer(start), Object::Integer(end)] => (*start, *end),
        [other] => return unsupported("range", other),
        [first, _] => return unsupported("range", first),
        _ => return wrong_arity("range", "1 or 2", args.len()),
    };

    Object::array((start..=end).map(Object::Integer).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_reports_string_byte_length() {
        assert_eq!(length(&[Object::String("Hello World".to_string())]), Object::Integer(11));
    }

    #[test]
    fn length_rejects_unsupported_types() {
        assert_eq!(
            length(&[Object::Integer(1)]),
            Object::Error("Argument to 'length' not supported, got INTEGER".to_string())
        );
    }

    #[test]
    fn push_mutates_the_shared_array() {
        let array = Object::array(vec![Object::Integer(1)]);
        let result = push(&[array.clone(), Object::Integer(2)]);
        assert_eq!(result.inspect(), "[1, 2]");
        assert_eq!(array.inspect(), "[1, 2]");
    }

    #[test]
    fn remove_last_errors_on_empty_array() {
        let array = Object::array(vec![]);
        let result = remove_last(&[array]);
        assert_eq!(result, Object::Error("Cannot removeLast from empty array".to_string()));
    }

    #[test]
    fn remove_at_bounds_checks() {
        let array = Object::array(vec![Object::Integer(1)]);
        let result = remove_at(&[array, Object::Integer(5)]);
        assert!(matches!(result, Object::Error(_)));
    }

    #[test]
    fn range_is_inclusive_of_the_end() {
        let result = range(&[Object::Integer(1), Object::Integer(3)]);
        assert_eq!(result.inspect(), "[1, 2, 3]");
    }

    #[test]
    fn range_with_one_argument_starts_at_zero() {
        let result = range(&[Object::Integer(2)]);
        assert_eq!(result.inspect(), "[0, 1, 2]");
    }
}
