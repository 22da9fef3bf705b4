//! End-to-end tests running source text through tokenizing, parsing and
//! semantic analysis.

use std::rc::Rc;

use sigh::{
    ast::{
        ast::{Expr, Program, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    type_checker::type_checker::{type_check, TypeChecker},
};

fn analyse(source: &str) -> (Program, TypeChecker, Vec<Error>) {
    let tokens = tokenize(source.to_string(), Some("main.si".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("main.si".to_string()));
    let program = program.unwrap();
    let (checker, errors) = type_check(&program);
    (program, checker, errors)
}

fn success(source: &str) -> (Program, TypeChecker) {
    let (program, checker, errors) = analyse(source);
    assert!(
        errors.is_empty(),
        "expected success, got:\n{}",
        errors
            .iter()
            .map(|error| render_error(error, source))
            .collect::<String>()
    );
    (program, checker)
}

fn failure(source: &str) -> Vec<ErrorImpl> {
    let (_, _, errors) = analyse(source);
    assert!(!errors.is_empty(), "expected errors for:\n{}", source);
    errors.into_iter().map(|error| error.kind().clone()).collect()
}

/// Expression of the `index`th top-level statement, which must be a
/// variable declaration or an expression statement.
fn top_level_expr(program: &Program, index: usize) -> &Expr {
    match &program.body[index] {
        Stmt::VarDecl(var) => &var.assigned_value,
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("statement {} has no expression: {:?}", index, other),
    }
}

const COURSE: &str = "
pub class Course {
    var name: String
    var hours: Int
    fun get_hours(): Int {
        return hours
    }
}
";

const DOG: &str = "
pub class Dog {
    var name: String
    var age: Int
    fun get_age(): Int {
        return age
    }
    fun get_name(): String {
        return name
    }
    fun set_age(new_age: Int) {
        age = new_age
    }
    fun set_name(dog_name: String) {
        name = dog_name
    }
}
var perro: Dog = create Dog()
";

const OPERATION: &str = "
pub class Operation {
    fun multiplicar(a: Int, b: Int): Int {
        return a * b
    }
    fun multiplicar(a: Int, b: Int, c: Int): Int {
        return a * b * c
    }
    fun multiplicar(a: Int, b: Int, c: Int, d: Int): Int {
        return a * b * c * d
    }
}
var op: Operation = create Operation()
";

const SUMAR: &str = "
pub class Operation {
    fun sumar(a: Int, b: Int): Int {
        return a + b
    }
    fun sumar(a: Float, b: Float): Float {
        return a + b
    }
    fun sumar(a: String, b: String): String {
        return a + \" \" + b
    }
}
var op: Operation = create Operation()
";

#[test]
fn test_shadowing_resolves_to_nearest_declaration() {
    let (program, checker) = success(
        "var x: Int = 1
         { print(\"\" + x) var x: Int = 2 print(\"\" + x) }
         print(\"\" + x)",
    );

    let outer = checker.declared_by(program.body[0].id());
    let Stmt::Block(block) = &program.body[1] else {
        panic!("expected a block");
    };
    let inner = checker.declared_by(block.body[1].id());
    assert_ne!(outer, inner);

    let reference = |stmt: &Stmt| -> Option<_> {
        let Stmt::Expression(stmt) = stmt else {
            panic!("expected an expression statement");
        };
        let Expr::Call(call) = &stmt.expression else {
            panic!("expected a call");
        };
        let Expr::Binary(concat) = &call.arguments[0] else {
            panic!("expected a concatenation");
        };
        checker.declaration_of(concat.right.id())
    };

    assert_eq!(reference(&block.body[0]), outer);
    assert_eq!(reference(&block.body[2]), inner);
    assert_eq!(reference(&program.body[2]), outer);
}

#[test]
fn test_forward_references() {
    let errors = failure("return x + 1 var x: Int = 2");
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ErrorImpl::UsedBeforeDeclaration { name } if name == "x"));

    success("var y: Int = double(2) fun double(a: Int): Int { return a * 2 }");
}

#[test]
fn test_return_completeness() {
    success("fun f(): Int { if (true) return 1 else return 2 } return f()");

    let errors = failure("fun f(): Int { if (true) return 1 } return f()");
    assert_eq!(errors, vec![ErrorImpl::MissingReturn]);
}

#[test]
fn test_overload_selection_by_arity() {
    let declarations = "pub fun sum(a: Int, b: Int): Int { return a + b }
                        pub fun sum(a: Int, b: Int, c: Int): Int { return a + b + c }";

    success(&format!("{} var two: Int = sum(1, 2) var three: Int = sum(1, 2, 3)", declarations));

    let errors = failure(&format!("{} sum(1, 2, 3, 4, 5)", declarations));
    assert!(matches!(
        errors[0],
        ErrorImpl::NoMatchingOverload { received: 5, .. }
    ));
}

#[test]
fn test_method_overloads_by_arity() {
    let source = format!(
        "{}op$multiplicar(2, 3)\nop$multiplicar(2, 3, 4)\nvar result: Int = op$multiplicar(2, 3, 4, 5)\n",
        OPERATION
    );
    success(&source);

    failure(&format!("{}op$multiplicar(2, 3, 4.0, 5.5)\n", OPERATION));
    failure(&format!("{}var total: Int = op$multiply(2, 3, 4, 5, \"6\")\n", OPERATION));
    failure(&format!("{}var total: Int = op$multiply(2, 3, 4, 5, 6)\n", OPERATION));
}

#[test]
fn test_overload_selection_by_type() {
    let source = format!(
        "{}op$sumar(2, 3)\nop$sumar(2.4, 5.1)\nvar result: String = op$sumar(\"Salut\", \"Bonjour\")\n",
        SUMAR
    );
    let (program, checker) = success(&source);

    let Stmt::ClassDecl(class) = &program.body[0] else {
        panic!("expected a class declaration");
    };
    let bodies = class
        .body
        .body
        .iter()
        .map(|stmt| checker.declared_by(stmt.id()))
        .collect::<Vec<_>>();

    for (statement, body) in [(2, 0), (3, 1), (4, 2)] {
        let call = top_level_expr(&program, statement);
        assert_eq!(checker.declaration_of(call.id()), bodies[body]);
    }
    assert_eq!(
        checker.type_of(top_level_expr(&program, 3).id()),
        Some(&Type::Float)
    );

    let errors = failure(&format!("{}var total: Int = op$sumar(2, \"6\")", SUMAR));
    assert!(matches!(errors[0], ErrorImpl::NoMatchingOverload { .. }));
}

#[test]
fn test_struct_field_access() {
    let (program, checker) = success("struct P { var x: Int; var y: Int } var y: Int = $P(1, 2).y");
    assert_eq!(checker.type_of(top_level_expr(&program, 1).id()), Some(&Type::Int));

    success("struct P { var x: Int; var y: Int } var p: P = $P(1, 2); p.y = 42; return p.y");
    success("struct P { var x: Int; var y: Int } var p: P = null; p.y = 42");
}

#[test]
fn test_class_objects() {
    success(&format!("{}var curso: Course = create Course()\n", COURSE));

    let errors = failure(&format!("{}var curso: Course = create Course(10)\n", COURSE));
    assert!(matches!(errors[0], ErrorImpl::WrongArity { expected: 0, received: 1 }));
}

#[test]
fn test_class_attribute_and_method_access() {
    let (program, checker) = success(&format!(
        "{}var course: Course = create Course()\nvar h: Int = course$hours\nvar g: Int = course$get_hours()\ncourse$name = \"Lang&Translators\"\n",
        COURSE
    ));
    assert_eq!(checker.type_of(top_level_expr(&program, 2).id()), Some(&Type::Int));
    assert_eq!(checker.type_of(top_level_expr(&program, 3).id()), Some(&Type::Int));

    let errors = failure(&format!(
        "{}var curso: Course = create Course()\nvar horas: Int = curso.hours\n",
        COURSE
    ));
    assert!(matches!(errors[0], ErrorImpl::InvalidFieldTarget { .. }));

    let errors = failure(&format!(
        "{}var curso2: Course = create Course()\ncurso2$hours = \"ML\"\n",
        COURSE
    ));
    assert_eq!(errors, vec![ErrorImpl::IncompatibleLvalue]);
}

#[test]
fn test_class_method_return_type() {
    let source = "
pub class Course {
    var hours: Int
    fun get_hours(): String {
        return hours
    }
}
";
    let errors = failure(source);
    assert!(matches!(&errors[0], ErrorImpl::IncompatibleReturn { expected, received }
        if expected == "String" && received == "Int"));
}

#[test]
fn test_private_method_is_checked() {
    let source = "
pub class Dog {
    var age: Int = 5
    pvt fun get_age(): String {
        return age
    }
}
";
    let errors = failure(source);
    assert!(matches!(errors[0], ErrorImpl::IncompatibleReturn { .. }));
}

#[test]
fn test_class_methods() {
    success(&format!(
        "{}perro$set_age(9)\nperro$set_name(\"Clifford\")\nvar nombre: String = perro$get_name()\nvar edad: Int = perro$get_age()\n",
        DOG
    ));

    failure(&format!("{}var edad: String = perro$get_age()\n", DOG));
    failure(&format!("{}perro$set_name(9)\n", DOG));

    let errors = failure(&format!("{}perro$set_color(0)\n", DOG));
    assert!(matches!(&errors[0], ErrorImpl::MissingField { field, .. } if field == "set_color"));
}

#[test]
fn test_inheritance() {
    let (program, checker) = success(
        "
pub class Animal {
    var age: Int
    fun get_age(): Int {
        return 5
    }
}
var ani: Animal = create Animal()
ani$age = 8
pub class Dog from Animal {
    var name: String
}
var perro: Dog = create Dog()
perro$age = 9
var edad: Int = perro$get_age()
perro$name = \"Pluto\"
",
    );

    let Stmt::Expression(stmt) = &program.body[5] else {
        panic!("expected an expression statement");
    };
    let Expr::Assignment(assignment) = &stmt.expression else {
        panic!("expected an assignment");
    };
    assert_eq!(checker.type_of(assignment.assignee.id()), Some(&Type::Int));
}

#[test]
fn test_double_inheritance() {
    success(
        "
pub class Person {
    var name: String
    var age: Int
    fun get_age(): Int {
        return 55
    }
}
var p: Person = create Person()
pub class Professor {
    var course: String
}
pub class FrenchTeacher from Professor, Person {
    var num_years: Int
}
var teacher: Professor = create Professor()
var proFR: FrenchTeacher = create FrenchTeacher()
var age: Int = proFR$get_age()
proFR$name = \"Nick\"
proFR$age = 39
proFR$course = \"Francais\"
",
    );
}

#[test]
fn test_inheritance_is_one_way() {
    let errors = failure(
        "
pub class Vehicule {
    var brand: String
    fun get_brand(): String {
        return brand
    }
}
pub class Car from Vehicule {
    var modelName: String
    var year: Int
}
var veh: Vehicule = create Vehicule()
var carro: Car = create Car()
carro$modelName = \"Grand Vitara AZ\"
carro$brand = \"Chevrolet\"
veh$modelName = \"Mercedes\"
",
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ErrorImpl::MissingField { field, owner, .. }
        if field == "modelName" && owner == "Vehicule"));
}

#[test]
fn test_undefined_superclasses() {
    let errors = failure(
        "pub class FrenchTeacher from Teacher, Person {}
         var prof: FrenchTeacher = create Teacher()",
    );
    assert!(errors
        .iter()
        .any(|error| matches!(error, ErrorImpl::UnresolvedName { name } if name == "Person")));
    assert!(errors
        .iter()
        .any(|error| matches!(error, ErrorImpl::UnresolvedName { name } if name == "Teacher")));
}

#[test]
fn test_superclass_must_be_a_class() {
    let errors = failure("struct S {} class C from S {}");
    assert!(matches!(&errors[0], ErrorImpl::InvalidSuperclass { name, .. } if name == "S"));
}

#[test]
fn test_nested_declarations() {
    success("pvt class Example {}");
    success("pub class Example { pvt fun duplicateNumber(x: Int): Int { return x * 2 } }");
    success("pub class Example { pvt class SubExample { print(\"Salut, Bonjour\") } }");
    success("pub fun main() { pub fun sum(a: Int, b: Int): Int { return a + b } sum(2, 5) }");
    success("pub fun test2(tab: Int[]): Int { return tab[0] }");
}

#[test]
fn test_empty_literal_inference() {
    let (program, checker) = success("var a: Int[] = []");
    assert_eq!(
        checker.type_of(top_level_expr(&program, 0).id()),
        Some(&Type::array(Type::Int))
    );

    let (program, checker) = success("fun f(a: Int[]) {} f([])");
    let Expr::Call(call) = top_level_expr(&program, 1) else {
        panic!("expected a call");
    };
    assert_eq!(
        checker.type_of(call.arguments[0].id()),
        Some(&Type::array(Type::Int))
    );
}

#[test]
fn test_sets() {
    success("var x: Int{} = {1, 5, 4}; return addSetInt(x, 6)");
    success("var x: Float{} = {1.0, 5, 4.2}; return containsSetFloat(x, 6.88)");
    success("var x: Int{} = {}; return addSetInt(x, 7)");
    failure("var x: Int{} = {}; return addSetString(x, \"7\")");
}

#[test]
fn test_templates() {
    success("template <T: Type> fun add(a: T, b: T): T { return a + b }");
    success(
        "template <T: Type, U: Type> fun pick(a: T, b: U): T { return a }
         var x: Float = pick<Float, Int>(2.5, 5)",
    );
}

#[test]
fn test_errors_render_with_position() {
    let source = "var a: Int = 1\nvar b: Int = true\n";
    let (_, _, errors) = analyse(source);
    assert_eq!(errors.len(), 1);

    let rendered = render_error(&errors[0], source);
    assert!(rendered.contains("-> main.si"));
    assert!(rendered.contains("2 | var b: Int = true"));
}

#[test]
fn test_syntax_error_stops_parsing() {
    let tokens = tokenize("var x: Int = ".to_string(), Some("main.si".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("main.si".to_string()));
    assert!(program.is_err());
}
