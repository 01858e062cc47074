//! The tree-walking evaluator: `eval(node, env) -> Object`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{BlockStatement, Expression, MapLiteral, Program, Statement};
use crate::builtins;
use crate::object::{Environment, FunctionObject, Object};

/// Evaluates a whole program: folds over its statements, unwrapping a
/// top-level `ReturnValue` exactly once and short-circuiting on `Error`.
pub fn eval_program(program: &Program, env: &Environment) -> Object {
    let mut result = Object::Null;
    for statement in &program.statements {
        result = eval_statement(statement, env);
        match result {
            Object::ReturnValue(inner) => return *inner,
            Object::Error(_) => return result,
            _ => {}
        }
    }
    result
}

/// Evaluates a block without unwrapping `ReturnValue`; the wrapper is kept
/// so the nearest function boundary (or `eval_program`) can unwrap it
/// exactly once.
fn eval_block_statement(block: &BlockStatement, env: &Environment) -> Object {
    let mut result = Object::Null;
    for statement in &block.statements {
        result = eval_statement(statement, env);
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: &Environment) -> Object {
    match statement {
        Statement::Const(s) => {
            let value = eval_expression(&s.value, env);
            if value.is_error() {
                return value;
            }
            match env.set(&s.name.value, value) {
                Ok(value) => value,
                Err(message) => Object::Error(message),
            }
        }
        Statement::Var(s) => {
            let value = eval_expression(&s.value, env);
            if value.is_error() {
                return value;
            }
            match env.set(&s.name.value, value) {
                Ok(_) => env.get(&s.name.value).unwrap_or(Object::Null),
                Err(message) => Object::Error(message),
            }
        }
        Statement::Return(s) => {
            let value = eval_expression(&s.return_value, env);
            if value.is_error() {
                return value;
            }
            Object::ReturnValue(Box::new(value))
        }
        Statement::For(s) => loop {
            let condition = eval_expression(&s.condition, env);
            if condition.is_error() {
                return condition;
            }
            if !condition.is_truthy() {
                return Object::Null;
            }
            let result = eval_block_statement(&s.body, env);
            if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
                return result;
            }
        },
        Statement::Expression(s) => eval_expression(&s.expression, env),
        Statement::Block(block) => eval_block_statement(block, env),
    }
}

fn eval_expression(expression: &Expression, env: &Environment) -> Object {
    match expression {
        Expression::IntegerLiteral(lit) => Object::Integer(lit.value),
        Expression::StringLiteral(lit) => Object::String(lit.value.clone()),
        Expression::Boolean(lit) => Object::Boolean(lit.value),
        Expression::Identifier(ident) => env
            .get(&ident.value)
            .or_else(|| builtins::lookup(&ident.value))
            .unwrap_or_else(|| Object::Error(format!("Identifier not found: {}", ident.value))),
        Expression::Prefix(expr) => {
            let right = eval_expression(&expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&expr.operator, right)
        }
        Expression::Infix(expr) => {
            let left = eval_expression(&expr.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&expr.operator, left, right)
        }
        Expression::If(expr) => {
            let condition = eval_expression(&expr.condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block_statement(&expr.consequence, env)
            } else if let Some(alternative) = &expr.alternative {
                eval_block_statement(alternative, env)
            } else {
                Object::Null
            }
        }
        Expression::FunctionLiteral(fl) => Object::Function(Rc::new(FunctionObject {
            parameters: fl.parameters.clone(),
            body: fl.body.clone(),
            env: env.clone(),
        })),
        Expression::Call(expr) => {
            let function = eval_expression(&expr.function, env);
            if function.is_error() {
                return function;
            }
            match eval_expression_list(&expr.arguments, env) {
                Ok(args) => apply_function(function, args),
                Err(error) => error,
            }
        }
        Expression::ArrayLiteral(al) => match eval_expression_list(&al.elements, env) {
            Ok(elements) => Object::array(elements),
            Err(error) => error,
        },
        Expression::Index(expr) => {
            let left = eval_expression(&expr.left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(&expr.index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::MapLiteral(ml) => eval_map_literal(ml, env),
    }
}

/// Evaluates a comma-separated expression list left-to-right; a single
/// error anywhere in the list short-circuits the rest of it.
fn eval_expression_list(expressions: &[Expression], env: &Environment) -> Result<Vec<Object>, Object> {
    let mut evaluated = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let value = eval_expression(expression, env);
        if value.is_error() {
            return Err(value);
        }
        evaluated.push(value);
    }
    Ok(evaluated)
}

fn apply_function(function: Object, args: Vec<Object>) -> Object {
    match function {
        Object::Function(function) => {
            let call_env = function.env.enclosed();
            for (parameter, argument) in function.parameters.iter().zip(args) {
                // Fresh scope: every parameter name is new here, so `set`
                // always creates rather than rejects a type change.
                let _ = call_env.set(&parameter.value, argument);
            }
            unwrap_return_value(eval_block_statement(&function.body, &call_env))
        }
        Object::BuiltIn(builtin) => (builtin.func)(&args),
        other => Object::Error(format!("Not a function: {}", other.object_type())),
    }
}

fn unwrap_return_value(object: Object) -> Object {
    match object {
        Object::ReturnValue(inner) => *inner,
        other => other,
    }
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => eval_not_operator(right),
        "-" => eval_minus_prefix_operator(right),
        _ => Object::Error(format!("Unknown operator: {operator}{}", right.object_type())),
    }
}

fn eval_not_operator(right: Object) -> Object {
    match right {
        Object::Boolean(true) => Object::Boolean(false),
        Object::Boolean(false) => Object::Boolean(true),
        Object::Null => Object::Boolean(true),
        _ => Object::Boolean(false),
    }
}

fn eval_minus_prefix_operator(right: Object) -> Object {
    match right {
        Object::Integer(value) => Object::Integer(-value),
        other => Object::Error(format!("Unknown operator: -{}", other.object_type())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) if operator == "&&" || operator == "||" => {
            Object::Boolean(if operator == "&&" { *l && *r } else { *l || *r })
        }
        _ if operator == "==" || operator == "!=" => {
            let equal = left == right;
            Object::Boolean(if operator == "==" { equal } else { !equal })
        }
        _ if left.object_type() != right.object_type() => Object::Error(format!(
            "Type mismatch: {} {operator} {}",
            left.object_type(),
            right.object_type()
        )),
        _ => Object::Error(format!(
            "Unknown operator: {} {operator} {}",
            left.object_type(),
            right.object_type()
        )),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Object::Error("Division by zero".to_string())
            } else {
                Object::Integer(left / right)
            }
        }
        "%" => {
            if right == 0 {
                Object::Error("Division by zero".to_string())
            } else {
                Object::Integer(left % right)
            }
        }
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "<=" => Object::Boolean(left <= right),
        ">=" => Object::Boolean(left >= right),
        _ => Object::Error(format!("Unknown operator: INTEGER {operator} INTEGER")),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::String(format!("{left}{right}")),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => Object::Error(format!("Unknown operator: STRING {operator} STRING")),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => {
            let elements = elements.borrow();
            if *i >= 0 && (*i as usize) < elements.len() {
                elements[*i as usize].clone()
            } else {
                Object::Null
            }
        }
        (Object::Map(pairs), key) => match key.map_key() {
            Some(map_key) => pairs
                .borrow()
                .get(&map_key)
                .map(|(_, value)| value.clone())
                .unwrap_or(Object::Null),
            None => Object::Error(format!("Unsupported as map key: {}", key.object_type())),
        },
        _ => Object::Error(format!("Index operator not supported: {}", left.object_type())),
    }
}

fn eval_map_literal(literal: &MapLiteral, env: &Environment) -> Object {
    let mut pairs = HashMap::new();
    for (key_expr, value_expr) in &literal.pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let Some(map_key) = key.map_key() else {
            return Object::Error(format!("Unusable as a map key: {}", key.object_type()));
        };

        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }

        pairs.insert(map_key, (key, value));
    }
    Object::map(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval(input: &str) -> Object {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
        eval_program(&program, &Environment::new())
    }

    #[test]
    fn evaluates_arithmetic_with_let_bindings() {
        assert_eq!(eval("const int a = 5; const int b = a; const int c = a + b + 5; c"), Object::Integer(15));
    }

    #[test]
    fn return_unwinds_through_nested_blocks_once() {
        assert_eq!(
            eval("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
            Object::Integer(10)
        );
    }

    #[test]
    fn map_literal_with_mixed_key_types() {
        let result = eval(
            r#"const string two = "two"; { "one": 1, two: 2, "thr" + "ee": 3, 4: 4, true: 5, false: 6 }[4]"#,
        );
        assert_eq!(result, Object::Integer(4));
    }

    #[test]
    fn for_loop_rebinds_the_outer_binding() {
        assert_eq!(
            eval("var int i = 0; for (i < 10) { var int i = i + 1; }; i;"),
            Object::Integer(10)
        );
    }

    #[test]
    fn length_builtin_errors_on_unsupported_type() {
        assert_eq!(
            eval("length(1)"),
            Object::Error("Argument to 'length' not supported, got INTEGER".to_string())
        );
    }

    #[test]
    fn function_as_map_key_is_unsupported() {
        assert_eq!(
            eval(r#"{"name": "Simpl"}[func(x) { x }]"#),
            Object::Error("Unsupported as map key: FUNCTION".to_string())
        );
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let result = eval(
            "const fn adder = func(x) { func(y) { x + y } }; const fn add2 = adder(2); add2(3)",
        );
        assert_eq!(result, Object::Integer(5));
    }

    #[test]
    fn closures_are_independent_across_calls() {
        let result = eval(
            "const fn adder = func(x) { func(y) { x + y } }; const fn add2 = adder(2); add2(3); add2(4)",
        );
        assert_eq!(result, Object::Integer(6));
    }

    #[test]
    fn error_short_circuits_the_enclosing_block() {
        assert_eq!(
            eval("const int a = 5 + true; a + 1"),
            Object::Error("Type mismatch: INTEGER + BOOLEAN".to_string())
        );
    }

    #[test]
    fn identifier_not_found_is_reported_by_name() {
        assert_eq!(eval("foobar"), Object::Error("Identifier not found: foobar".to_string()));
    }

    #[test]
    fn true_singletons_compare_equal_across_evaluations() {
        assert_eq!(eval("true"), eval("true"));
    }
}
