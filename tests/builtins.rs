//! Built-in function contracts, exercised through full source programs
//! rather than calling the Rust functions directly.

use simpl::object::{Environment, Object};
use simpl::EvalOutcome;

fn eval(input: &str) -> Object {
    let env = Environment::new();
    match simpl::eval_source(input, &env) {
        EvalOutcome::Value(value) => value,
        EvalOutcome::ParseErrors(errors) => panic!("parser errors for {input:?}: {errors:?}"),
    }
}

#[test]
fn first_and_last_element_on_empty_array_return_null() {
    assert_eq!(eval("firstElement([])"), Object::Null);
    assert_eq!(eval("lastElement([])"), Object::Null);
}

#[test]
fn first_and_last_element_on_populated_array() {
    assert_eq!(eval("firstElement([1, 2, 3])"), Object::Integer(1));
    assert_eq!(eval("lastElement([1, 2, 3])"), Object::Integer(3));
}

#[test]
fn push_mutates_the_array_bound_to_a_name() {
    assert_eq!(eval("const array a = [1, 2]; push(a, 3); a").inspect(), "[1, 2, 3]");
}

#[test]
fn remove_last_mutates_and_returns_the_array() {
    assert_eq!(eval("const array a = [1, 2, 3]; removeLast(a); a").inspect(), "[1, 2]");
}

#[test]
fn remove_last_on_an_empty_array_errors() {
    assert_eq!(
        eval("const array a = []; removeLast(a)"),
        Object::Error("Cannot removeLast from empty array".to_string())
    );
}

#[test]
fn remove_at_out_of_range_errors() {
    let result = eval("const array a = [1, 2]; removeAt(a, 5)");
    assert!(matches!(result, Object::Error(_)));
}

#[test]
fn copy_produces_an_independently_mutable_array() {
    assert_eq!(
        eval("const array a = [1, 2]; const array b = copy(a); push(b, 3); a").inspect(),
        "[1, 2]"
    );
}

#[test]
fn range_is_inclusive_with_one_or_two_arguments() {
    assert_eq!(eval("range(3)").inspect(), "[0, 1, 2, 3]");
    assert_eq!(eval("range(2, 4)").inspect(), "[2, 3, 4]");
}

#[test]
fn print_returns_null_and_accepts_any_arity() {
    assert_eq!(eval("print()"), Object::Null);
    assert_eq!(eval(r#"print(1, "two", true)"#), Object::Null);
}
