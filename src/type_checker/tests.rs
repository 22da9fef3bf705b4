use std::rc::Rc;

use super::{
    declarations::{DeclId, DeclarationKind, Declarations},
    reactor::Reactor,
    registry::{Signature, SignatureRegistry},
    scope::{ScopeKind, ScopeTable},
    type_checker::{type_check, TypeChecker},
    typed_ast::{Attribute, Attributes, Value},
};
use crate::{
    ast::{
        ast::{NodeId, Program, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Span,
};

fn analyse(source: &str) -> (Program, TypeChecker, Vec<Error>) {
    let tokens = tokenize(source.to_string(), Some("test.si".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.si".to_string()));
    let program = program.unwrap();
    let (checker, errors) = type_check(&program);
    (program, checker, errors)
}

fn errors_of(source: &str) -> Vec<ErrorImpl> {
    let (_, _, errors) = analyse(source);
    errors.into_iter().map(|error| error.kind().clone()).collect()
}

fn assert_ok(source: &str) {
    let errors = errors_of(source);
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
}

fn assert_single(source: &str, matches: impl Fn(&ErrorImpl) -> bool) {
    let errors = errors_of(source);
    assert_eq!(errors.len(), 1, "expected one error for {:?}: {:?}", source, errors);
    assert!(matches(&errors[0]), "unexpected error for {:?}: {:?}", source, errors[0]);
}

// Tables

#[test]
fn test_scope_lookup_walks_to_root() {
    let mut declarations = Declarations::new();
    let outer = declarations.add("x", DeclarationKind::Variable, None, Span::null());
    let inner = declarations.add("x", DeclarationKind::Variable, None, Span::null());

    let mut scopes = ScopeTable::new();
    let root = scopes.root();
    let block = scopes.push(root, ScopeKind::Block);
    scopes.declare(root, "x", outer);

    let found = scopes.lookup(block, "x").unwrap();
    assert_eq!(found.declaration, outer);
    assert_eq!(found.scope, root);

    scopes.declare(block, "x", inner);
    assert_eq!(scopes.lookup(block, "x").unwrap().declaration, inner);
    assert_eq!(scopes.lookup(root, "x").unwrap().declaration, outer);
    assert!(scopes.lookup(block, "y").is_none());
}

#[test]
fn test_enclosing_function_stops_at_classes() {
    let mut scopes = ScopeTable::new();
    let root = scopes.root();
    let function = DeclId::from_raw(3);
    let class = DeclId::from_raw(4);

    let body = scopes.push(root, ScopeKind::Function(function));
    let nested = scopes.push(body, ScopeKind::Block);
    let class_body = scopes.push(nested, ScopeKind::Class(class));

    assert_eq!(scopes.enclosing_function(nested), Some(function));
    assert_eq!(scopes.enclosing_function(class_body), None);
    assert_eq!(scopes.enclosing_function(root), None);
}

#[test]
fn test_find_member_prefers_fields() {
    let mut declarations = Declarations::new();
    let method = declarations.add(
        "size",
        DeclarationKind::Function(Default::default()),
        None,
        Span::null(),
    );
    let field = declarations.add("size", DeclarationKind::Field, None, Span::null());
    let other = declarations.add("other", DeclarationKind::Field, None, Span::null());

    let members = [method, field, other];
    assert_eq!(declarations.find_member(&members, "size"), Some(field));
    assert_eq!(declarations.find_member(&members, "other"), Some(other));
    assert_eq!(declarations.find_member(&members, "missing"), None);
}

#[test]
fn test_registry_keeps_latest_and_first_order() {
    let mut scopes = ScopeTable::new();
    let root = scopes.root();
    let class_body = scopes.push(root, ScopeKind::Class(DeclId::from_raw(9)));

    let mut registry = SignatureRegistry::new();
    let int = Signature::new(root, "sum", vec!["Int".to_string(), "Int".to_string()]);
    let float = Signature::new(root, "sum", vec!["Float".to_string(), "Float".to_string()]);
    let method = Signature::new(class_body, "sum", vec!["Int".to_string(), "Int".to_string()]);

    assert_eq!(registry.register(int.clone(), DeclId::from_raw(1)), None);
    assert_eq!(registry.register(float, DeclId::from_raw(2)), None);
    assert_eq!(registry.register(method, DeclId::from_raw(4)), None);
    assert_eq!(
        registry.register(int.clone(), DeclId::from_raw(3)),
        Some(DeclId::from_raw(1))
    );

    assert_eq!(registry.get(&int), Some(DeclId::from_raw(3)));
    assert_eq!(
        registry.overloads("sum", &[root]),
        vec![DeclId::from_raw(3), DeclId::from_raw(2)]
    );
    assert_eq!(
        registry.overloads("sum", &[class_body, root]),
        vec![DeclId::from_raw(4), DeclId::from_raw(3), DeclId::from_raw(2)]
    );
    assert!(registry.overloads("sum", &[]).is_empty());
    assert!(registry.overloads("product", &[root]).is_empty());
    assert_eq!(registry.len(), 3);
    assert_eq!(int.to_string(), "sum [Int, Int]");
}

#[test]
fn test_attributes_are_write_once() {
    let mut attributes = Attributes::new();
    let attribute = Attribute::type_of(NodeId::from_raw(1));

    assert!(attributes.set(attribute, Value::Type(Type::Int)));
    assert!(!attributes.set(attribute, Value::Type(Type::Float)));
    assert!(!attributes.fail(attribute));
    assert_eq!(attributes.ty(&attribute), Some(&Type::Int));

    let failed = Attribute::returns(NodeId::from_raw(2));
    assert!(attributes.fail(failed));
    assert!(attributes.is_failed(&failed));
    assert!(attributes.is_known(&failed));
    assert!(!attributes.is_set(&failed));
    assert_eq!(attributes.flag(&failed), None);
}

// Reactor

#[test]
fn test_reactor_fires_rules_in_dependency_order() {
    let mut reactor: Reactor<()> = Reactor::new();
    let a = Attribute::type_of(NodeId::from_raw(1));
    let b = Attribute::type_of(NodeId::from_raw(2));
    let c = Attribute::type_of(NodeId::from_raw(3));

    reactor.rule(vec![b], vec![c], NodeId::from_raw(3), &Span::null(), |ctx| {
        let ty = ctx.ty(0);
        ctx.set_output(0, Value::Type(Type::array(ty)));
    });
    reactor.rule(vec![a], vec![b], NodeId::from_raw(2), &Span::null(), |ctx| {
        let ty = ctx.ty(0);
        ctx.set_output(0, Value::Type(Type::array(ty)));
    });
    reactor.set(a, Value::Type(Type::Int));

    reactor.resolve(&());

    assert!(reactor.errors().is_empty());
    assert_eq!(
        reactor.attributes().ty(&c),
        Some(&Type::array(Type::array(Type::Int)))
    );
}

#[test]
fn test_reactor_propagates_failures_silently() {
    let mut reactor: Reactor<()> = Reactor::new();
    let a = Attribute::type_of(NodeId::from_raw(1));
    let b = Attribute::type_of(NodeId::from_raw(2));

    reactor.rule(vec![a], vec![b], NodeId::from_raw(2), &Span::null(), |_| {
        panic!("rule with a failed input must not run");
    });
    reactor.fail(a);

    reactor.resolve(&());

    assert!(reactor.errors().is_empty());
    assert!(reactor.attributes().is_failed(&b));
}

#[test]
fn test_reactor_continuations() {
    let mut reactor: Reactor<()> = Reactor::new();
    let a = Attribute::type_of(NodeId::from_raw(1));
    let b = Attribute::type_of(NodeId::from_raw(2));
    let c = Attribute::type_of(NodeId::from_raw(3));

    reactor.rule(vec![], vec![c], NodeId::from_raw(3), &Span::null(), move |ctx| {
        ctx.then(vec![b], vec![c], |ctx| {
            let ty = ctx.ty(0);
            ctx.set_output(0, Value::Type(ty));
        });
    });
    reactor.rule(vec![a], vec![b], NodeId::from_raw(2), &Span::null(), |ctx| {
        ctx.set_output(0, Value::Type(Type::String));
    });
    reactor.set(a, Value::Type(Type::Int));

    reactor.resolve(&());

    assert_eq!(reactor.attributes().ty(&c), Some(&Type::String));
}

#[test]
fn test_reactor_reports_missing_inputs() {
    let mut reactor: Reactor<()> = Reactor::new();
    let missing = Attribute::type_of(NodeId::from_raw(1));
    let output = Attribute::type_of(NodeId::from_raw(2));

    reactor.rule(vec![missing], vec![output], NodeId::from_raw(2), &Span::null(), |_| {});
    reactor.resolve(&());

    let errors = reactor.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].kind(),
        ErrorImpl::UnresolvedAttribute { attribute } if attribute == "type of node 1"
    ));
    assert!(reactor.attributes().is_failed(&output));
}

#[test]
fn test_reactor_reports_cycles_once() {
    let mut reactor: Reactor<()> = Reactor::new();
    let a = Attribute::type_of(NodeId::from_raw(1));
    let b = Attribute::type_of(NodeId::from_raw(2));

    reactor.rule(vec![a], vec![b], NodeId::from_raw(2), &Span::null(), |_| {});
    reactor.rule(vec![b], vec![a], NodeId::from_raw(1), &Span::null(), |_| {});
    reactor.resolve(&());

    let errors = reactor.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].kind(), ErrorImpl::CyclicDependency { .. }));
    assert!(reactor.attributes().is_failed(&a));
    assert!(reactor.attributes().is_failed(&b));
}

#[test]
fn test_rule_error_fails_outputs() {
    let mut reactor: Reactor<()> = Reactor::new();
    let output = Attribute::type_of(NodeId::from_raw(1));
    let dependent = Attribute::type_of(NodeId::from_raw(2));

    reactor.rule(vec![], vec![output], NodeId::from_raw(1), &Span::null(), |ctx| {
        ctx.error(ErrorImpl::NonIntegerIndex, NodeId::from_raw(1), &Span::null());
    });
    reactor.rule(vec![output], vec![dependent], NodeId::from_raw(2), &Span::null(), |ctx| {
        ctx.set_output(0, Value::Type(Type::Int));
    });
    reactor.resolve(&());

    assert_eq!(reactor.errors().len(), 1);
    assert!(reactor.attributes().is_failed(&dependent));
}

// Analysis

#[test]
fn test_literals_and_unary() {
    for source in [
        "return 42",
        "return 42.0",
        "return \"hello\"",
        "return (42)",
        "return [1, 2, 3]",
        "return true",
        "return null",
        "return !!true",
    ] {
        assert_ok(source);
    }

    assert_single("return !1", |e| matches!(e, ErrorImpl::InvalidNegation { .. }));
}

#[test]
fn test_expression_types() {
    let (program, checker, errors) = analyse("var x: Float = 1 + 2.0 var s: String = \"a\" + 1");
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::VarDecl(x) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(checker.type_of(x.assigned_value.id()), Some(&Type::Float));
    assert_eq!(checker.type_of(x.id), Some(&Type::Float));

    let Stmt::VarDecl(s) = &program.body[1] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(checker.type_of(s.assigned_value.id()), Some(&Type::String));
}

#[test]
fn test_arithmetic() {
    for source in [
        "return 1 + 2",
        "return 3 % 2.0",
        "return 2.0 / 3",
        "var x: Int[] = [1, 2] var y: Int[] = [3, 4] return x * y",
        "var x: Int[] = [1, 2] var y: Int = 3 return x - y",
        "return 1 + \"a\"",
        "return \"a\" + true",
    ] {
        assert_ok(source);
    }

    assert_single("return 2 + true", |e| {
        matches!(e, ErrorImpl::InvalidArithmetic { operation, left, right }
            if operation == "add" && left == "Int" && right == "Bool")
    });
    assert_single(
        "var x: Int[] = [1, 2] var y: String[] = [] return x - y",
        |e| matches!(e, ErrorImpl::InvalidArithmetic { right, .. } if right == "String[]"),
    );
    assert_single("return 1 + [1, 2]", |e| {
        matches!(e, ErrorImpl::InvalidArithmetic { left, right, .. }
            if left == "Int" && right == "Int[]")
    });
    assert_single("var a: Int[] = [1, 2] var b: Int[] = 1 + a", |e| {
        matches!(e, ErrorImpl::InvalidArithmetic { .. })
    });
}

#[test]
fn test_logic_and_comparison() {
    for source in [
        "return true && false",
        "return 1 < 2.5",
        "return 1 == 1.0",
        "return \"hi\" != null",
        "return [1] == [1]",
    ] {
        assert_ok(source);
    }

    assert_single("return false || 1", |e| {
        matches!(e, ErrorImpl::NonBooleanLogic { type_ } if type_ == "Int")
    });
    assert_single("return true == 1", |e| {
        matches!(e, ErrorImpl::IncomparableTypes { left, right } if left == "Bool" && right == "Int")
    });
    assert_single("return \"a\" < 1", |e| {
        matches!(e, ErrorImpl::NonNumericComparison { type_ } if type_ == "String")
    });
}

#[test]
fn test_variables() {
    assert_ok("var x: Int = 1 return x");
    assert_ok("var x: Float = 1 x = 2");
    assert_ok("var x: String = \"0\" return x = \"S\"");

    assert_single("var x: Int = true", |e| {
        matches!(e, ErrorImpl::IncompatibleInitializer { variable, expected, received }
            if variable == "x" && expected == "Int" && received == "Bool")
    });
    assert_single("return x + 1", |e| {
        matches!(e, ErrorImpl::UnresolvedName { name } if name == "x")
    });
    assert_single("return x + 1 var x: Int = 2", |e| {
        matches!(e, ErrorImpl::UsedBeforeDeclaration { name } if name == "x")
    });
    assert_single("var x: Int = 1 x = 1.5", |e| {
        matches!(e, ErrorImpl::IncompatibleLvalue)
    });
}

#[test]
fn test_block_scoping() {
    assert_ok(
        "var x: Int = 1 \
         { print(\"\" + x) var x: String = \"a\" print(x) } \
         print(\"\" + x)",
    );
}

#[test]
fn test_reference_resolves_to_nearest_declaration() {
    let (program, checker, errors) = analyse("var x: Int = 1 { var x: String = \"a\" print(x) }");
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::Block(block) = &program.body[1] else {
        panic!("expected a block");
    };
    let Stmt::VarDecl(inner) = &block.body[0] else {
        panic!("expected a variable declaration");
    };
    let Stmt::Expression(print) = &block.body[1] else {
        panic!("expected an expression statement");
    };
    let crate::ast::ast::Expr::Call(call) = &print.expression else {
        panic!("expected a call");
    };

    let argument = call.arguments[0].id();
    assert_eq!(checker.declaration_of(argument), checker.declared_by(inner.id));
    assert_eq!(checker.scope_of(argument), checker.scope_of(block.id));
}

#[test]
fn test_functions() {
    assert_ok("fun add(a: Int, b: Int): Int { return a + b } return add(4, 7)");
    assert_ok("var r: Int = twice(2) fun twice(a: Int): Int { return a * 2 }");
    assert_ok("fun fact(n: Int): Int { if n <= 1 return 1 else return n * fact(n - 1) }");
    assert_ok("fun f() { return }");

    assert_single("fun f(): Int { return }", |e| matches!(e, ErrorImpl::ReturnWithoutValue));
    assert_single("fun f() { return 1 }", |e| matches!(e, ErrorImpl::ReturnWithValueInVoid));
    assert_single("fun f(): String { return 1 }", |e| {
        matches!(e, ErrorImpl::IncompatibleReturn { expected, received }
            if expected == "String" && received == "Int")
    });
}

#[test]
fn test_call_errors() {
    assert_single("fun f(a: Int) {} f(1, 2)", |e| {
        matches!(e, ErrorImpl::WrongArity { expected: 1, received: 2 })
    });
    assert_single("fun f(a: Int) {} f(\"a\")", |e| {
        matches!(e, ErrorImpl::IncompatibleArgument { index: 0, expected, received }
            if expected == "Int" && received == "String")
    });
    assert_single("var x: Int = 1 x()", |e| matches!(e, ErrorImpl::NotCallable { .. }));
}

#[test]
fn test_unconditional_return() {
    let (program, checker, errors) =
        analyse("fun f(): Int { if true return 1 else return 2 } return f()");
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::FnDecl(function) = &program.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(checker.returns(function.body.id), Some(true));

    assert_single("fun f(): Int { if true return 1 } return f()", |e| {
        matches!(e, ErrorImpl::MissingReturn)
    });
    assert_single("fun f(): Int { while true return 1 }", |e| {
        matches!(e, ErrorImpl::MissingReturn)
    });
}

#[test]
fn test_conditions() {
    assert_ok("var i: Int = 0 while i < 3 { print(\"\" + i) i = i + 1 }");
    assert_single("if 1 return 1", |e| {
        matches!(e, ErrorImpl::NonBooleanCondition { statement, type_ }
            if statement == "If" && type_ == "Int")
    });
    assert_single("while 1 return 1", |e| {
        matches!(e, ErrorImpl::NonBooleanCondition { statement, .. } if statement == "While")
    });
}

#[test]
fn test_arrays_and_structs() {
    for source in [
        "return [1][0]",
        "return [1, 2].length",
        "var array: Int[] = null return array[0]",
        "var x: Int[] = [] x[0] = 3",
        "struct P { var x: Int var y: Int } return $P(1, 2).y",
        "struct P { var x: Int var y: Int } var p: P = $P(1, 2) p.y = 42",
        "struct P { var x: Int var y: Int } var p: P = null return p.y",
    ] {
        assert_ok(source);
    }

    assert_single("return [1][true]", |e| matches!(e, ErrorImpl::NonIntegerIndex));
    assert_single("return [1].size", |e| matches!(e, ErrorImpl::NonLengthArrayMember { .. }));
    assert_single("var x: Int = 1 return x[0]", |e| {
        matches!(e, ErrorImpl::NonArrayIndexed { type_ } if type_ == "Int")
    });
    assert_single("struct P { var x: Int } return $P(1).z", |e| {
        matches!(e, ErrorImpl::MissingField { field, owner, .. } if field == "z" && owner == "P")
    });
    assert_single("struct P { var x: Int } return $P(true)", |e| {
        matches!(e, ErrorImpl::IncompatibleArgument { index: 0, .. })
    });
    assert_single("var x: Int = 1 return $x", |e| matches!(e, ErrorImpl::NotAStruct { .. }));
}

#[test]
fn test_struct_declared_after_use() {
    let (program, checker, errors) = analyse("var p: P = $P(1) struct P { var x: Int }");
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::StructDecl(structure) = &program.body[1] else {
        panic!("expected a struct declaration");
    };
    let Some(Type::Struct(nominal)) = checker.declared_type(structure.id) else {
        panic!("expected a struct type");
    };
    assert_eq!(&*nominal.name, "P");
    assert_eq!(checker.type_of(structure.id), Some(&Type::Type));
}

#[test]
fn test_type_annotations() {
    assert_ok("struct S {} var t: Type = S return \"\" + t");
    assert_single("var x: Foo = 1", |e| {
        matches!(e, ErrorImpl::UnresolvedType { name } if name == "Foo")
    });
    assert_single("var y: Int = 1 var x: y = 1", |e| {
        matches!(e, ErrorImpl::NotATypeDeclaration { name, .. } if name == "y")
    });
}

#[test]
fn test_literal_inference() {
    assert_ok("var array: Int[] = []");
    assert_ok("var set: String{} = {}");
    assert_ok("fun use_array(array: Int[]) {} use_array([])");

    assert_single("return []", |e| matches!(e, ErrorImpl::UninferableLiteral { .. }));
    assert_single("var x: Int = []", |e| matches!(e, ErrorImpl::UninferableLiteral { .. }));
    assert_single("fun f() {} return [f()]", |e| {
        matches!(e, ErrorImpl::VoidLiteralElement { .. })
    });
}

#[test]
fn test_sets() {
    for source in [
        "var x: Float{} = {1.0, 5, 4.2} return x",
        "var x: Int{} = {1, 5, 4} return addSetInt(x, 6)",
        "var x: String{} = {\"a\"} return containsSetString(x, \"b\")",
        "var x: Int{} = {} return addSetInt(x, 7)",
        "return addSetInt({2, 3}, 7)",
    ] {
        assert_ok(source);
    }

    assert_single("var x: String{} = {\"1\", \"5\", 4.2} return x", |e| {
        matches!(e, ErrorImpl::NoCommonSupertype { literal } if literal == "set")
    });
    assert_single("var x: Int{} = {} return addSetString(x, \"7\")", |e| {
        matches!(e, ErrorImpl::IncompatibleArgument { index: 0, .. })
    });
}

#[test]
fn test_templates() {
    assert_ok("template <T: Type> fun add(a: T, b: T): T { return a + b }");
    assert_ok("template <T: Type> fun first(a: T[]): T { return a[0] } var x: Int = first<Int>([1, 2])");

    assert_single(
        "template <T: Type> fun id(a: T): T { return a } var x: String = id<Int>(1)",
        |e| matches!(e, ErrorImpl::IncompatibleInitializer { received, .. } if received == "Int"),
    );
    assert_single(
        "template <T: Type> fun id(a: T): T { return a } id<Int>(\"a\")",
        |e| matches!(e, ErrorImpl::IncompatibleArgument { expected, .. } if expected == "Int"),
    );
    assert_single(
        "template <T: Type> fun id(a: T): T { return a } id<Int, Float>(1)",
        |e| matches!(e, ErrorImpl::WrongTypeArgumentCount { expected: 1, received: 2 }),
    );
    assert_single("fun f(a: Int) {} f<Int>(1)", |e| {
        matches!(e, ErrorImpl::NotATemplate { .. })
    });
}

#[test]
fn test_overload_selection() {
    let (program, checker, errors) = analyse(
        "fun sum(a: Int, b: Int): Int { return a + b } \
         fun sum(a: String, b: String): String { return a + b } \
         var s: String = sum(\"a\", \"b\")",
    );
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::VarDecl(var) = &program.body[2] else {
        panic!("expected a variable declaration");
    };
    let selected = checker.declaration_of(var.assigned_value.id());
    assert_eq!(selected, checker.declared_by(program.body[1].id()));
    assert_eq!(checker.type_of(var.assigned_value.id()), Some(&Type::String));

    assert_single(
        "fun sum(a: Int, b: Int): Int { return a + b } \
         fun sum(a: Int, b: Int, c: Int): Int { return a + b + c } \
         sum(1, \"a\")",
        |e| matches!(e, ErrorImpl::NoMatchingOverload { .. }),
    );
}

#[test]
fn test_shadowing_function_is_called_through_its_own_signature() {
    let (program, checker, errors) = analyse(
        "fun f(a: Int): String { return \"outer\" } \
         fun g(): Int { fun f(a: Float): Int { return 1 } var r: Int = f(1) return r }",
    );
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::FnDecl(g) = &program.body[1] else {
        panic!("expected a function declaration");
    };
    let Stmt::VarDecl(r) = &g.body.body[1] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(
        checker.declaration_of(r.assigned_value.id()),
        checker.declared_by(g.body.body[0].id())
    );
}

#[test]
fn test_methods_are_selected_from_the_receiver_class() {
    assert_ok(
        "class A { fun get(x: Float): Int { return 1 } } \
         class B { fun get(x: Int): String { return \"b\" } } \
         var a: A = create A() var r: Int = a$get(1)",
    );

    let (program, checker, errors) = analyse(
        "class A { fun get(x: Int): Int { return 1 } } \
         class B { fun get(x: Int): Int { return 2 } } \
         var a: A = create A() var r: Int = a$get(1)",
    );
    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::ClassDecl(a) = &program.body[0] else {
        panic!("expected a class declaration");
    };
    let Stmt::VarDecl(r) = &program.body[3] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(
        checker.declaration_of(r.assigned_value.id()),
        checker.declared_by(a.body.body[0].id())
    );
}

#[test]
fn test_inherited_overloads() {
    assert_ok(
        "class A { fun get(x: Int): Int { return 1 } } \
         class B from A { fun get(x: String): String { return x } } \
         var b: B = create B() var i: Int = b$get(1) var s: String = b$get(\"s\")",
    );
}

#[test]
fn test_invalid_targets() {
    assert_single("fun f(): Int { return 1 } f() = 2", |e| {
        matches!(e, ErrorImpl::NonLvalue)
    });
    assert_single("struct S { var a: Int } var s: S = create S()", |e| {
        matches!(e, ErrorImpl::NotAClass { name } if name == "S")
    });
    assert_single("var x: Int = 1 x$foo()", |e| {
        matches!(e, ErrorImpl::InvalidClassElementTarget { type_ } if type_ == "Int")
    });
}

#[test]
fn test_lowercase_void_alias() {
    assert_ok("fun f(): void { print(\"a\") } f()");
    assert_single("fun f(): void { return 1 }", |e| {
        matches!(e, ErrorImpl::ReturnWithValueInVoid)
    });
}

#[test]
fn test_errors_are_sorted_by_position() {
    let (_, _, errors) = analyse("var a: Int = b var c: Int = true var d: Bool = 1");
    assert_eq!(errors.len(), 3);
    assert!(errors
        .windows(2)
        .all(|pair| pair[0].get_position().0 <= pair[1].get_position().0));
    assert!(matches!(errors[0].kind(), ErrorImpl::UnresolvedName { .. }));
}

#[test]
fn test_every_expression_is_typed() {
    let (_, checker, errors) = analyse("var x: Int = (1 + 2) * 3 x = x - 1");
    assert!(errors.is_empty(), "{:?}", errors);
    assert!(checker.attributes().len() > checker.declarations().len());
}
