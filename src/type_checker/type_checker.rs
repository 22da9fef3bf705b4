use std::rc::Rc;

use tracing::{debug, info_span};

use crate::{
    ast::{
        ast::{Expr, NodeId, Program, Stmt},
        expressions::{
            ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr,
            ClassConstructorExpr, ClassElementExpr, FieldExpr, IndexExpr, ParenExpr, PrefixExpr,
            SetLiteralExpr, StructConstructorExpr, SymbolExpr, TemplateCallExpr,
        },
        statements::{
            BlockStmt, ClassDeclStmt, FieldDeclStmt, FnDeclStmt, IfStmt, Parameter, ReturnStmt,
            StructDeclStmt, TemplateDeclStmt, VarDeclStmt, WhileStmt,
        },
        types::{common_supertype, NominalType, TemplateType, Type, TypeNode},
    },
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    builtins::declare_builtins,
    declarations::{
        ClassData, DeclId, Declaration, DeclarationKind, Declarations, FunctionData, StructData,
        TemplateData,
    },
    reactor::{Reactor, RuleContext},
    registry::{Signature, SignatureRegistry},
    scope::{ScopeId, ScopeKind, ScopeTable},
    typed_ast::{Attribute, Attributes, Value},
};

/// Tables shared by the walker and the deferred rules.
#[derive(Debug, Default)]
pub struct SemanticContext {
    pub scopes: ScopeTable,
    pub declarations: Declarations,
    pub signatures: SignatureRegistry,
}

/// Where the expression being walked gets its expected type from, used to
/// type empty array and set literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InferenceContext {
    None,
    Variable(DeclId),
    Argument { callee: NodeId, index: usize },
}

pub struct TypeChecker {
    context: SemanticContext,
    reactor: Reactor<SemanticContext>,
    current_scope: ScopeId,
    inference: InferenceContext,
}

/// Analyses `program`, returning the decorated result and every error
/// found, ordered by source position.
pub fn type_check(program: &Program) -> (TypeChecker, Vec<Error>) {
    let _span = info_span!("type_check").entered();

    let mut checker = TypeChecker::new();
    checker.type_check_program(program);

    debug!(
        rules = checker.reactor.pending(),
        declarations = checker.context.declarations.len(),
        scopes = checker.context.scopes.len(),
        "walk finished"
    );

    checker.reactor.resolve(&checker.context);

    let mut errors = checker.reactor.take_errors();
    errors.sort_by_key(|error| error.get_position().0);

    (checker, errors)
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        let mut context = SemanticContext::default();
        let mut reactor = Reactor::new();
        declare_builtins(&mut context, &mut reactor);

        let current_scope = context.scopes.root();
        TypeChecker {
            context,
            reactor,
            current_scope,
            inference: InferenceContext::None,
        }
    }

    // Queries

    /// Type of an expression, or of the declaration a node introduces.
    pub fn type_of(&self, node: NodeId) -> Option<&Type> {
        let attributes = self.reactor.attributes();
        attributes.ty(&Attribute::type_of(node)).or_else(|| {
            self.context
                .declarations
                .for_node(node)
                .and_then(|declaration| attributes.ty(&Attribute::type_of(declaration)))
        })
    }

    /// Declaration a reference resolved to, or the one a call selected.
    pub fn declaration_of(&self, node: NodeId) -> Option<DeclId> {
        self.reactor.attributes().decl(&Attribute::decl(node))
    }

    /// Declaration introduced by a declaration node.
    pub fn declared_by(&self, node: NodeId) -> Option<DeclId> {
        self.context.declarations.for_node(node)
    }

    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.reactor.attributes().scope(&Attribute::scope(node))
    }

    pub fn returns(&self, node: NodeId) -> Option<bool> {
        self.reactor.attributes().flag(&Attribute::returns(node))
    }

    /// Type introduced by a struct, class or template parameter node.
    pub fn declared_type(&self, node: NodeId) -> Option<&Type> {
        let declaration = self.context.declarations.for_node(node)?;
        self.reactor.attributes().ty(&Attribute::declared(declaration))
    }

    /// Type denoted by a type annotation node.
    pub fn value_of(&self, node: NodeId) -> Option<&Type> {
        self.reactor.attributes().ty(&Attribute::value(node))
    }

    pub fn declaration_type(&self, declaration: DeclId) -> Option<&Type> {
        self.reactor.attributes().ty(&Attribute::type_of(declaration))
    }

    pub fn declaration(&self, declaration: DeclId) -> &Declaration {
        self.context.declarations.get(declaration)
    }

    pub fn declarations(&self) -> &Declarations {
        &self.context.declarations
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.context.scopes
    }

    pub fn signatures(&self) -> &SignatureRegistry {
        &self.context.signatures
    }

    pub fn attributes(&self) -> &Attributes {
        self.reactor.attributes()
    }

    // Walk helpers

    fn with_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.current_scope, scope);
        let result = f(self);
        self.current_scope = saved;
        result
    }

    fn declare(&mut self, name: &str, declaration: DeclId) {
        self.context
            .scopes
            .declare(self.current_scope, name, declaration);
    }

    fn new_declaration(
        &mut self,
        name: &str,
        kind: DeclarationKind,
        node: NodeId,
        span: &Span,
    ) -> DeclId {
        self.context
            .declarations
            .add(name, kind, Some(node), span.clone())
    }

    fn nominal(&self, declaration: DeclId) -> NominalType {
        NominalType {
            declaration,
            name: Rc::from(self.context.declarations.get(declaration).name.as_str()),
        }
    }

    /// Copies one type attribute into another once it is known.
    fn copy_type(&mut self, from: Attribute, to: Attribute, node: NodeId, span: &Span) {
        self.reactor.rule(vec![from], vec![to], node, span, |ctx| {
            let ty = ctx.ty(0);
            ctx.set_output(0, Value::Type(ty));
        });
    }

    fn type_check_program(&mut self, program: &Program) {
        let root = self.context.scopes.root();
        self.reactor
            .set(Attribute::scope(program.id), Value::Scope(root));

        for stmt in &program.body {
            self.type_check_stmt(stmt);
        }
    }

    // Types

    /// Registers the rules computing the type an annotation denotes.
    pub fn type_check_type(&mut self, node: &TypeNode) {
        match node {
            TypeNode::Symbol(symbol) => {
                let scope = self.current_scope;
                let name = symbol.name.clone();
                let id = symbol.id;
                let span = symbol.span.clone();

                self.reactor
                    .rule(vec![], vec![Attribute::value(id)], id, &symbol.span, move |ctx| {
                        let context = ctx.context;
                        let Some(found) = context.scopes.lookup(scope, &name) else {
                            ctx.error(ErrorImpl::UnresolvedType { name }, id, &span);
                            return;
                        };

                        let declaration = context.declarations.get(found.declaration);
                        if !declaration.is_type_declaration() {
                            ctx.error(
                                ErrorImpl::NotATypeDeclaration {
                                    name,
                                    kind: declaration.kind.describe().to_string(),
                                },
                                id,
                                &span,
                            );
                            return;
                        }

                        ctx.then(
                            vec![Attribute::declared(found.declaration)],
                            vec![Attribute::value(id)],
                            |ctx| {
                                let ty = ctx.ty(0);
                                ctx.set_output(0, Value::Type(ty));
                            },
                        );
                    });
            }
            TypeNode::Array(array) => {
                self.type_check_type(&array.underlying);
                self.reactor.rule(
                    vec![Attribute::value(array.underlying.id())],
                    vec![Attribute::value(array.id)],
                    array.id,
                    &array.span,
                    |ctx| {
                        let component = ctx.ty(0);
                        ctx.set_output(0, Value::Type(Type::array(component)));
                    },
                );
            }
            TypeNode::Set(set) => {
                self.type_check_type(&set.underlying);
                self.reactor.rule(
                    vec![Attribute::value(set.underlying.id())],
                    vec![Attribute::value(set.id)],
                    set.id,
                    &set.span,
                    |ctx| {
                        let component = ctx.ty(0);
                        ctx.set_output(0, Value::Type(Type::set(component)));
                    },
                );
            }
        }
    }

    // Statements

    pub fn type_check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.type_check_block(block, None),
            Stmt::VarDecl(var) => self.type_check_var_decl(var),
            Stmt::FieldDecl(field) => {
                self.type_check_field_decl(field, true);
            }
            Stmt::FnDecl(function) => self.type_check_fn_decl(function),
            Stmt::StructDecl(structure) => self.type_check_struct_decl(structure),
            Stmt::ClassDecl(class) => self.type_check_class_decl(class),
            Stmt::TemplateDecl(template) => self.type_check_template_decl(template),
            Stmt::If(stmt) => self.type_check_if(stmt),
            Stmt::While(stmt) => self.type_check_while(stmt),
            Stmt::Return(stmt) => self.type_check_return(stmt),
            Stmt::Expression(stmt) => self.type_check_expr(&stmt.expression),
        }
    }

    /// Walks a block. Function and class bodies pass the scope they share
    /// with their declaration; plain blocks open their own.
    pub fn type_check_block(&mut self, block: &BlockStmt, shared: Option<ScopeId>) {
        let scope = match shared {
            Some(scope) => scope,
            None => self
                .context
                .scopes
                .push(self.current_scope, ScopeKind::Block),
        };
        self.reactor
            .set(Attribute::scope(block.id), Value::Scope(scope));

        self.with_scope(scope, |checker| {
            for stmt in block.iter() {
                checker.type_check_stmt(stmt);
            }
        });

        let containers = block
            .iter()
            .filter(|stmt| stmt.is_return_container())
            .map(|stmt| Attribute::returns(stmt.id()))
            .collect::<Vec<_>>();

        if containers.is_empty() {
            self.reactor
                .set(Attribute::returns(block.id), Value::Bool(false));
            return;
        }

        self.reactor.rule(
            containers,
            vec![Attribute::returns(block.id)],
            block.id,
            &block.span,
            |ctx| {
                let returns = (0..ctx.input_count()).all(|i| ctx.flag(i));
                ctx.set_output(0, Value::Bool(returns));
            },
        );
    }

    fn type_check_var_decl(&mut self, var: &VarDeclStmt) {
        self.type_check_type(&var.explicit_type);
        let declaration =
            self.new_declaration(&var.identifier, DeclarationKind::Variable, var.id, &var.span);

        self.with_inference(InferenceContext::Variable(declaration), |checker| {
            checker.type_check_expr(&var.assigned_value)
        });
        self.declare(&var.identifier, declaration);

        self.copy_type(
            Attribute::value(var.explicit_type.id()),
            Attribute::type_of(declaration),
            var.id,
            &var.span,
        );

        let value = var.assigned_value.id();
        let value_span = var.assigned_value.span().clone();
        let variable = var.identifier.clone();

        self.reactor.rule(
            vec![Attribute::type_of(declaration), Attribute::type_of(value)],
            vec![],
            var.id,
            &var.span,
            move |ctx| {
                let expected = ctx.ty(0);
                let received = ctx.ty(1);
                if !received.is_assignable_to(&expected) {
                    ctx.report(
                        ErrorImpl::IncompatibleInitializer {
                            variable,
                            expected: expected.to_string(),
                            received: received.to_string(),
                        },
                        value,
                        &value_span,
                    );
                }
            },
        );
    }

    /// Declares a field. Struct fields are only reachable through their
    /// struct, so they are not bound in any scope.
    fn type_check_field_decl(&mut self, field: &FieldDeclStmt, bind: bool) -> DeclId {
        self.type_check_type(&field.explicit_type);
        let declaration =
            self.new_declaration(&field.identifier, DeclarationKind::Field, field.id, &field.span);
        if bind {
            self.declare(&field.identifier, declaration);
        }

        self.copy_type(
            Attribute::value(field.explicit_type.id()),
            Attribute::type_of(declaration),
            field.id,
            &field.span,
        );

        declaration
    }

    fn type_check_parameters(&mut self, parameters: &[Parameter]) -> Vec<DeclId> {
        parameters
            .iter()
            .map(|parameter| {
                self.type_check_type(&parameter.type_);
                let declaration = self.new_declaration(
                    &parameter.name,
                    DeclarationKind::Parameter,
                    parameter.id,
                    &parameter.span,
                );
                self.declare(&parameter.name, declaration);

                self.copy_type(
                    Attribute::value(parameter.type_.id()),
                    Attribute::type_of(declaration),
                    parameter.id,
                    &parameter.span,
                );

                declaration
            })
            .collect()
    }

    /// A function or template whose declared return type is not `Void` must
    /// return on every path.
    fn check_missing_return(
        &mut self,
        body: &BlockStmt,
        return_type: &TypeNode,
        node: NodeId,
        span: &Span,
    ) {
        let span_owned = span.clone();
        self.reactor.rule(
            vec![Attribute::returns(body.id), Attribute::value(return_type.id())],
            vec![],
            node,
            span,
            move |ctx| {
                let returns = ctx.flag(0);
                let return_type = ctx.ty(1);
                if !returns && return_type != Type::Void {
                    ctx.report(ErrorImpl::MissingReturn, node, &span_owned);
                }
            },
        );
    }

    fn type_check_fn_decl(&mut self, function: &FnDeclStmt) {
        let declaration = self.new_declaration(
            &function.identifier,
            DeclarationKind::Function(FunctionData {
                visibility: function.visibility,
                parameters: vec![],
                return_type: Some(function.return_type.id()),
            }),
            function.id,
            &function.span,
        );
        self.declare(&function.identifier, declaration);

        let signature = Signature::new(
            self.current_scope,
            &function.identifier,
            function
                .parameters
                .iter()
                .map(|parameter| parameter.type_.to_string())
                .collect(),
        );
        self.context.signatures.register(signature, declaration);

        let scope = self
            .context
            .scopes
            .push(self.current_scope, ScopeKind::Function(declaration));
        self.context.declarations.get_mut(declaration).body_scope = Some(scope);
        self.reactor
            .set(Attribute::scope(function.id), Value::Scope(scope));

        let parameters = self.with_scope(scope, |checker| {
            let parameters = checker.type_check_parameters(&function.parameters);
            checker.type_check_type(&function.return_type);
            parameters
        });

        if let DeclarationKind::Function(data) =
            &mut self.context.declarations.get_mut(declaration).kind
        {
            data.parameters = parameters;
        }

        let mut inputs = vec![Attribute::value(function.return_type.id())];
        inputs.extend(
            function
                .parameters
                .iter()
                .map(|parameter| Attribute::value(parameter.type_.id())),
        );

        self.reactor.rule(
            inputs,
            vec![Attribute::type_of(declaration)],
            function.id,
            &function.span,
            |ctx| {
                let return_type = ctx.ty(0);
                let parameters = (1..ctx.input_count()).map(|i| ctx.ty(i)).collect();
                ctx.set_output(0, Value::Type(Type::function(return_type, parameters)));
            },
        );

        self.type_check_block(&function.body, Some(scope));
        self.check_missing_return(
            &function.body,
            &function.return_type,
            function.id,
            &function.span,
        );
    }

    fn type_check_struct_decl(&mut self, structure: &StructDeclStmt) {
        let declaration = self.new_declaration(
            &structure.identifier,
            DeclarationKind::Struct(StructData::default()),
            structure.id,
            &structure.span,
        );
        self.declare(&structure.identifier, declaration);

        self.reactor
            .set(Attribute::type_of(declaration), Value::Type(Type::Type));
        let declared = Type::Struct(self.nominal(declaration));
        self.reactor
            .set(Attribute::declared(declaration), Value::Type(declared));

        let fields = structure
            .fields
            .iter()
            .map(|field| self.type_check_field_decl(field, false))
            .collect();

        if let DeclarationKind::Struct(data) =
            &mut self.context.declarations.get_mut(declaration).kind
        {
            data.fields = fields;
        }
    }

    /// Resolves the `from` list of a class. Superclasses must be declared
    /// before the class that extends them.
    fn resolve_superclasses(&mut self, class: &ClassDeclStmt) -> Vec<DeclId> {
        let mut superclasses = vec![];

        for superclass in &class.superclasses {
            match self.context.scopes.lookup(self.current_scope, &superclass.name) {
                None => self.reactor.report(
                    ErrorImpl::UnresolvedName {
                        name: superclass.name.clone(),
                    },
                    class.id,
                    &superclass.span,
                ),
                Some(found) => {
                    let declaration = self.context.declarations.get(found.declaration);
                    if declaration.class_data().is_some() {
                        superclasses.push(found.declaration);
                    } else {
                        let kind = declaration.kind.describe().to_string();
                        self.reactor.report(
                            ErrorImpl::InvalidSuperclass {
                                name: superclass.name.clone(),
                                kind,
                            },
                            class.id,
                            &superclass.span,
                        );
                    }
                }
            }
        }

        superclasses
    }

    fn type_check_class_decl(&mut self, class: &ClassDeclStmt) {
        let original = self.new_declaration(
            &class.identifier,
            DeclarationKind::Class(ClassData {
                visibility: class.visibility,
                ..ClassData::default()
            }),
            class.id,
            &class.span,
        );
        self.declare(&class.identifier, original);

        let superclasses = self.resolve_superclasses(class);

        // With superclasses, a flattened class replaces the original both in
        // scope and as the declaration of the node.
        let effective = if class.superclasses.is_empty() {
            original
        } else {
            let flattened = self.new_declaration(
                &class.identifier,
                DeclarationKind::Class(ClassData {
                    visibility: class.visibility,
                    superclasses: superclasses.clone(),
                    original: Some(original),
                    ..ClassData::default()
                }),
                class.id,
                &class.span,
            );
            self.declare(&class.identifier, flattened);
            flattened
        };

        let declared = Type::Class(self.nominal(effective));
        for declaration in [original, effective] {
            self.reactor
                .set(Attribute::type_of(declaration), Value::Type(Type::Type));
            self.reactor
                .set(Attribute::declared(declaration), Value::Type(declared.clone()));
        }

        let scope = self
            .context
            .scopes
            .push(self.current_scope, ScopeKind::Class(effective));
        self.context.declarations.get_mut(original).body_scope = Some(scope);
        self.context.declarations.get_mut(effective).body_scope = Some(scope);
        self.reactor
            .set(Attribute::scope(class.id), Value::Scope(scope));

        self.type_check_block(&class.body, Some(scope));

        let own_members = class
            .body
            .iter()
            .filter(|stmt| {
                matches!(
                    stmt,
                    Stmt::VarDecl(_) | Stmt::FieldDecl(_) | Stmt::FnDecl(_) | Stmt::TemplateDecl(_)
                )
            })
            .filter_map(|stmt| self.context.declarations.for_node(stmt.id()))
            .collect::<Vec<_>>();

        let mut members = own_members.clone();
        for superclass in &superclasses {
            if let Some(data) = self.context.declarations.get(*superclass).class_data() {
                members.extend(data.own_members.iter().copied());
            }
        }

        if let DeclarationKind::Class(data) = &mut self.context.declarations.get_mut(original).kind {
            data.own_members = own_members.clone();
            data.members = own_members.clone();
        }
        if let DeclarationKind::Class(data) = &mut self.context.declarations.get_mut(effective).kind
        {
            data.own_members = own_members;
            data.members = members;
        }
    }

    fn type_check_template_decl(&mut self, template: &TemplateDeclStmt) {
        let declaration = self.new_declaration(
            &template.identifier,
            DeclarationKind::TemplateFunction(TemplateData {
                return_type: Some(template.return_type.id()),
                ..TemplateData::default()
            }),
            template.id,
            &template.span,
        );
        self.declare(&template.identifier, declaration);

        let scope = self
            .context
            .scopes
            .push(self.current_scope, ScopeKind::Function(declaration));
        self.context.declarations.get_mut(declaration).body_scope = Some(scope);
        self.reactor
            .set(Attribute::scope(template.id), Value::Scope(scope));

        let (type_parameters, parameters) = self.with_scope(scope, |checker| {
            let type_parameters = template
                .type_parameters
                .iter()
                .map(|type_parameter| {
                    checker.type_check_type(&type_parameter.bound);
                    let parameter = checker.new_declaration(
                        &type_parameter.name,
                        DeclarationKind::TemplateParameter,
                        type_parameter.id,
                        &type_parameter.span,
                    );
                    checker.declare(&type_parameter.name, parameter);

                    let placeholder = Type::Placeholder(checker.nominal(parameter));
                    checker
                        .reactor
                        .set(Attribute::type_of(parameter), Value::Type(Type::Type));
                    checker
                        .reactor
                        .set(Attribute::declared(parameter), Value::Type(placeholder));

                    parameter
                })
                .collect::<Vec<_>>();

            let parameters = checker.type_check_parameters(&template.parameters);
            checker.type_check_type(&template.return_type);
            (type_parameters, parameters)
        });

        let mut inputs = vec![Attribute::value(template.return_type.id())];
        inputs.extend(type_parameters.iter().map(|parameter| Attribute::declared(*parameter)));
        inputs.extend(
            template
                .parameters
                .iter()
                .map(|parameter| Attribute::value(parameter.type_.id())),
        );

        let type_parameter_count = type_parameters.len();
        if let DeclarationKind::TemplateFunction(data) =
            &mut self.context.declarations.get_mut(declaration).kind
        {
            data.type_parameters = type_parameters;
            data.parameters = parameters;
        }

        self.reactor.rule(
            inputs,
            vec![Attribute::type_of(declaration)],
            template.id,
            &template.span,
            move |ctx| {
                let return_type = ctx.ty(0);
                let parameters = (1..ctx.input_count()).map(|i| ctx.ty(i)).collect();
                ctx.set_output(
                    0,
                    Value::Type(Type::Template(TemplateType {
                        return_type: Box::new(return_type),
                        type_parameter_count,
                        parameters,
                    })),
                );
            },
        );

        self.type_check_block(&template.body, Some(scope));
        self.check_missing_return(
            &template.body,
            &template.return_type,
            template.id,
            &template.span,
        );
    }

    fn check_condition(&mut self, condition: &Expr, statement: &'static str) {
        self.type_check_expr(condition);

        let node = condition.id();
        let span = condition.span().clone();
        self.reactor
            .rule(vec![Attribute::type_of(node)], vec![], node, condition.span(), move |ctx| {
                let ty = ctx.ty(0);
                if ty != Type::Bool && !ty.is_placeholder() {
                    ctx.report(
                        ErrorImpl::NonBooleanCondition {
                            statement: statement.to_string(),
                            type_: ty.to_string(),
                        },
                        node,
                        &span,
                    );
                }
            });
    }

    fn type_check_if(&mut self, stmt: &IfStmt) {
        self.check_condition(&stmt.condition, "If");
        self.type_check_stmt(&stmt.then_body);
        if let Some(else_body) = &stmt.else_body {
            self.type_check_stmt(else_body);
        }

        match &stmt.else_body {
            Some(else_body)
                if stmt.then_body.is_return_container() && else_body.is_return_container() =>
            {
                self.reactor.rule(
                    vec![
                        Attribute::returns(stmt.then_body.id()),
                        Attribute::returns(else_body.id()),
                    ],
                    vec![Attribute::returns(stmt.id)],
                    stmt.id,
                    &stmt.span,
                    |ctx| {
                        let returns = ctx.flag(0) && ctx.flag(1);
                        ctx.set_output(0, Value::Bool(returns));
                    },
                );
            }
            _ => self
                .reactor
                .set(Attribute::returns(stmt.id), Value::Bool(false)),
        }
    }

    fn type_check_while(&mut self, stmt: &WhileStmt) {
        self.check_condition(&stmt.condition, "While");
        self.type_check_stmt(&stmt.body);
    }

    fn type_check_return(&mut self, stmt: &ReturnStmt) {
        self.reactor
            .set(Attribute::returns(stmt.id), Value::Bool(true));

        if let Some(value) = &stmt.value {
            self.type_check_expr(value);
        }

        let Some(function) = self.context.scopes.enclosing_function(self.current_scope) else {
            return;
        };
        let Some(return_type) = self.context.declarations.get(function).return_type_node() else {
            return;
        };

        let node = stmt.id;
        let span = stmt.span.clone();

        match &stmt.value {
            None => {
                self.reactor.rule(
                    vec![Attribute::value(return_type)],
                    vec![],
                    node,
                    &stmt.span,
                    move |ctx| {
                        if ctx.ty(0) != Type::Void {
                            ctx.report(ErrorImpl::ReturnWithoutValue, node, &span);
                        }
                    },
                );
            }
            Some(value) => {
                let value_node = value.id();
                let value_span = value.span().clone();
                self.reactor.rule(
                    vec![Attribute::value(return_type), Attribute::type_of(value_node)],
                    vec![],
                    node,
                    &stmt.span,
                    move |ctx| {
                        let expected = ctx.ty(0);
                        let received = ctx.ty(1);
                        if expected == Type::Void {
                            ctx.report(ErrorImpl::ReturnWithValueInVoid, node, &span);
                        } else if !received.is_assignable_to(&expected) {
                            ctx.report(
                                ErrorImpl::IncompatibleReturn {
                                    expected: expected.to_string(),
                                    received: received.to_string(),
                                },
                                value_node,
                                &value_span,
                            );
                        }
                    },
                );
            }
        }
    }

    // Expressions

    fn with_inference<T>(
        &mut self,
        inference: InferenceContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.inference, inference);
        let result = f(self);
        self.inference = saved;
        result
    }

    pub fn type_check_expr(&mut self, expr: &Expr) {
        // The inference context only applies to the expression it was set
        // for, never to its subexpressions.
        let inference = std::mem::replace(&mut self.inference, InferenceContext::None);

        match expr {
            Expr::Int(int) => self
                .reactor
                .set(Attribute::type_of(int.id), Value::Type(Type::Int)),
            Expr::Float(float) => self
                .reactor
                .set(Attribute::type_of(float.id), Value::Type(Type::Float)),
            Expr::String(string) => self
                .reactor
                .set(Attribute::type_of(string.id), Value::Type(Type::String)),
            Expr::Symbol(symbol) => self.type_check_reference(symbol),
            Expr::Paren(paren) => self.type_check_paren(paren),
            Expr::ArrayLiteral(array) => self.type_check_array_literal(array, inference),
            Expr::SetLiteral(set) => self.type_check_set_literal(set, inference),
            Expr::Prefix(prefix) => self.type_check_prefix(prefix),
            Expr::Binary(binary) => self.type_check_binary(binary),
            Expr::Assignment(assignment) => self.type_check_assignment(assignment),
            Expr::Call(call) => self.type_check_call(call),
            Expr::TemplateCall(call) => self.type_check_template_call(call),
            Expr::Index(index) => self.type_check_index(index),
            Expr::Field(field) => self.type_check_field(field),
            Expr::ClassElement(element) => self.type_check_class_element(element),
            Expr::StructConstructor(constructor) => self.type_check_struct_constructor(constructor),
            Expr::ClassConstructor(constructor) => self.type_check_class_constructor(constructor),
        }

        self.inference = inference;
    }

    /// Resolves a name.
    ///
    /// Names already bound when the reference is walked resolve at once.
    /// Anything else is looked up again once every scope is populated:
    /// functions and types may be used before their declaration, variables
    /// may not.
    fn type_check_reference(&mut self, symbol: &SymbolExpr) {
        let id = symbol.id;

        if let Some(found) = self.context.scopes.lookup(self.current_scope, &symbol.value) {
            self.reactor
                .set(Attribute::decl(id), Value::Decl(found.declaration));
            self.reactor
                .set(Attribute::scope(id), Value::Scope(found.scope));
            self.copy_type(
                Attribute::type_of(found.declaration),
                Attribute::type_of(id),
                id,
                &symbol.span,
            );
            return;
        }

        let scope = self.current_scope;
        let name = symbol.value.clone();
        let span = symbol.span.clone();

        self.reactor.rule(
            vec![],
            vec![
                Attribute::decl(id),
                Attribute::scope(id),
                Attribute::type_of(id),
            ],
            id,
            &symbol.span,
            move |ctx| {
                let context = ctx.context;
                let Some(found) = context.scopes.lookup(scope, &name) else {
                    ctx.error(ErrorImpl::UnresolvedName { name }, id, &span);
                    return;
                };

                ctx.set_output(0, Value::Decl(found.declaration));
                ctx.set_output(1, Value::Scope(found.scope));

                if matches!(
                    context.declarations.get(found.declaration).kind,
                    DeclarationKind::Variable
                ) {
                    ctx.error_for(
                        ErrorImpl::UsedBeforeDeclaration { name },
                        id,
                        &span,
                        &[Attribute::type_of(id)],
                    );
                    return;
                }

                ctx.then(
                    vec![Attribute::type_of(found.declaration)],
                    vec![Attribute::type_of(id)],
                    |ctx| {
                        let ty = ctx.ty(0);
                        ctx.set_output(0, Value::Type(ty));
                    },
                );
            },
        );
    }

    fn type_check_paren(&mut self, paren: &ParenExpr) {
        self.type_check_expr(&paren.expression);
        self.copy_type(
            Attribute::type_of(paren.expression.id()),
            Attribute::type_of(paren.id),
            paren.id,
            &paren.span,
        );
    }

    fn type_check_array_literal(&mut self, array: &ArrayLiteralExpr, inference: InferenceContext) {
        self.type_check_literal(array.id, &array.span, &array.elements, "array", inference);
    }

    fn type_check_set_literal(&mut self, set: &SetLiteralExpr, inference: InferenceContext) {
        self.type_check_literal(set.id, &set.span, &set.elements, "set", inference);
    }

    fn type_check_literal(
        &mut self,
        id: NodeId,
        span: &Span,
        elements: &[Expr],
        literal: &'static str,
        inference: InferenceContext,
    ) {
        let wrap = move |component: Type| match literal {
            "set" => Type::set(component),
            _ => Type::array(component),
        };
        let fits = move |ty: &Type| match literal {
            "set" => matches!(ty, Type::Set(_)),
            _ => matches!(ty, Type::Array(_)),
        };
        let span_owned = span.clone();

        if elements.is_empty() {
            match inference {
                InferenceContext::None => self.reactor.report(
                    ErrorImpl::UninferableLiteral {
                        literal: literal.to_string(),
                    },
                    id,
                    span,
                ),
                InferenceContext::Variable(declaration) => {
                    self.reactor.rule(
                        vec![Attribute::type_of(declaration)],
                        vec![Attribute::type_of(id)],
                        id,
                        span,
                        move |ctx| {
                            let expected = ctx.ty(0);
                            if fits(&expected) {
                                ctx.set_output(0, Value::Type(expected));
                            } else {
                                ctx.error(
                                    ErrorImpl::UninferableLiteral {
                                        literal: literal.to_string(),
                                    },
                                    id,
                                    &span_owned,
                                );
                            }
                        },
                    );
                }
                InferenceContext::Argument { callee, index } => {
                    self.reactor.rule(
                        vec![Attribute::type_of(callee)],
                        vec![Attribute::type_of(id)],
                        id,
                        span,
                        move |ctx| {
                            let parameter = match ctx.ty(0) {
                                Type::Function(function) => function.parameters.get(index).cloned(),
                                Type::Template(template) => {
                                    template.value_parameters().get(index).cloned()
                                }
                                _ => None,
                            };

                            match parameter {
                                Some(parameter) if fits(&parameter) => {
                                    ctx.set_output(0, Value::Type(parameter))
                                }
                                _ => ctx.error(
                                    ErrorImpl::UninferableLiteral {
                                        literal: literal.to_string(),
                                    },
                                    id,
                                    &span_owned,
                                ),
                            }
                        },
                    );
                }
            }

            if inference == InferenceContext::None {
                self.reactor.fail(Attribute::type_of(id));
            }
            return;
        }

        for element in elements {
            self.type_check_expr(element);
        }

        let element_nodes = elements
            .iter()
            .map(|element| (element.id(), element.span().clone()))
            .collect::<Vec<_>>();

        self.reactor.rule(
            elements
                .iter()
                .map(|element| Attribute::type_of(element.id()))
                .collect(),
            vec![Attribute::type_of(id)],
            id,
            span,
            move |ctx| {
                let mut supertype: Option<Type> = None;

                for (i, (element, element_span)) in element_nodes.iter().enumerate() {
                    let ty = ctx.ty(i);
                    if ty == Type::Void {
                        ctx.report(
                            ErrorImpl::VoidLiteralElement {
                                literal: literal.to_string(),
                            },
                            *element,
                            element_span,
                        );
                        continue;
                    }

                    supertype = match supertype {
                        None => Some(ty),
                        Some(current) => match common_supertype(&current, &ty) {
                            Some(common) => Some(common),
                            None => {
                                ctx.error(
                                    ErrorImpl::NoCommonSupertype {
                                        literal: literal.to_string(),
                                    },
                                    id,
                                    &span_owned,
                                );
                                return;
                            }
                        },
                    };
                }

                match supertype {
                    Some(component) => ctx.set_output(0, Value::Type(wrap(component))),
                    None => ctx.fail_all(),
                }
            },
        );
    }

    fn type_check_prefix(&mut self, prefix: &PrefixExpr) {
        self.type_check_expr(&prefix.right_expr);
        self.reactor
            .set(Attribute::type_of(prefix.id), Value::Type(Type::Bool));

        let node = prefix.id;
        let span = prefix.span.clone();
        self.reactor.rule(
            vec![Attribute::type_of(prefix.right_expr.id())],
            vec![],
            node,
            &prefix.span,
            move |ctx| {
                let ty = ctx.ty(0);
                if ty != Type::Bool && !ty.is_placeholder() {
                    ctx.report(
                        ErrorImpl::InvalidNegation {
                            type_: ty.to_string(),
                        },
                        node,
                        &span,
                    );
                }
            },
        );
    }

    fn type_check_binary(&mut self, binary: &BinaryExpr) {
        self.type_check_expr(&binary.left);
        self.type_check_expr(&binary.right);

        let operator = binary.operator;
        let node = binary.id;
        let span = binary.span.clone();
        let operands = vec![
            Attribute::type_of(binary.left.id()),
            Attribute::type_of(binary.right.id()),
        ];

        if operator.is_arithmetic() {
            self.reactor.rule(
                operands,
                vec![Attribute::type_of(node)],
                node,
                &binary.span,
                move |ctx| {
                    let left = ctx.ty(0);
                    let right = ctx.ty(1);
                    match arithmetic_result(operator, &left, &right) {
                        Some(result) => ctx.set_output(0, Value::Type(result)),
                        None => ctx.error(
                            ErrorImpl::InvalidArithmetic {
                                operation: operator.verb().to_string(),
                                left: left.to_string(),
                                right: right.to_string(),
                            },
                            node,
                            &span,
                        ),
                    }
                },
            );
            return;
        }

        self.reactor
            .set(Attribute::type_of(node), Value::Type(Type::Bool));

        if operator.is_equality() {
            self.reactor
                .rule(operands, vec![], node, &binary.span, move |ctx| {
                    let left = ctx.ty(0);
                    let right = ctx.ty(1);
                    if !left.is_comparable_to(&right) {
                        ctx.report(
                            ErrorImpl::IncomparableTypes {
                                left: left.to_string(),
                                right: right.to_string(),
                            },
                            node,
                            &span,
                        );
                    }
                });
            return;
        }

        let sides = [
            (binary.left.id(), binary.left.span().clone()),
            (binary.right.id(), binary.right.span().clone()),
        ];
        let logic = operator.is_logic();

        self.reactor
            .rule(operands, vec![], node, &binary.span, move |ctx| {
                for (i, (side, side_span)) in sides.iter().enumerate() {
                    let ty = ctx.ty(i);
                    if ty.is_placeholder() {
                        continue;
                    }
                    if logic && ty != Type::Bool {
                        ctx.report(
                            ErrorImpl::NonBooleanLogic {
                                type_: ty.to_string(),
                            },
                            *side,
                            side_span,
                        );
                    } else if !logic && !ty.is_numeric() {
                        ctx.report(
                            ErrorImpl::NonNumericComparison {
                                type_: ty.to_string(),
                            },
                            *side,
                            side_span,
                        );
                    }
                }
            });
    }

    fn type_check_assignment(&mut self, assignment: &AssignmentExpr) {
        self.type_check_expr(&assignment.assignee);
        self.type_check_expr(&assignment.value);

        let node = assignment.id;
        let span = assignment.span.clone();
        let assignee = assignment.assignee.id();
        let assignee_span = assignment.assignee.span().clone();
        let is_lvalue = assignment.assignee.is_lvalue();

        self.reactor.rule(
            vec![
                Attribute::type_of(assignee),
                Attribute::type_of(assignment.value.id()),
            ],
            vec![Attribute::type_of(node)],
            node,
            &assignment.span,
            move |ctx| {
                let left = ctx.ty(0);
                let right = ctx.ty(1);
                ctx.set_output(0, Value::Type(left.clone()));

                if !is_lvalue {
                    ctx.report(ErrorImpl::NonLvalue, assignee, &assignee_span);
                } else if !right.is_assignable_to(&left) {
                    ctx.report(ErrorImpl::IncompatibleLvalue, node, &span);
                }
            },
        );
    }

    fn type_check_index(&mut self, index: &IndexExpr) {
        self.type_check_expr(&index.array);
        self.type_check_expr(&index.index);

        let node = index.id;
        let span = index.span.clone();
        let index_node = index.index.id();
        let index_span = index.index.span().clone();

        self.reactor.rule(
            vec![
                Attribute::type_of(index.array.id()),
                Attribute::type_of(index_node),
            ],
            vec![Attribute::type_of(node)],
            node,
            &index.span,
            move |ctx| {
                let array = ctx.ty(0);
                let index = ctx.ty(1);

                if index != Type::Int && !index.is_placeholder() {
                    ctx.report(ErrorImpl::NonIntegerIndex, index_node, &index_span);
                }

                match array {
                    Type::Array(component) => ctx.set_output(0, Value::Type(*component)),
                    placeholder @ Type::Placeholder(_) => {
                        ctx.set_output(0, Value::Type(placeholder))
                    }
                    other => ctx.error(
                        ErrorImpl::NonArrayIndexed {
                            type_: other.to_string(),
                        },
                        node,
                        &span,
                    ),
                }
            },
        );
    }

    fn type_check_field(&mut self, field: &FieldExpr) {
        self.type_check_expr(&field.stem);

        let node = field.id;
        let span = field.span.clone();
        let name = field.field.clone();

        self.reactor.rule(
            vec![Attribute::type_of(field.stem.id())],
            vec![Attribute::type_of(node)],
            node,
            &field.span,
            move |ctx| match ctx.ty(0) {
                Type::Array(_) => array_length(ctx, &name, "field", node, &span),
                Type::Struct(structure) => {
                    let context = ctx.context;
                    let fields = context
                        .declarations
                        .get(structure.declaration)
                        .struct_data()
                        .map(|data| data.fields.clone())
                        .unwrap_or_default();

                    match context.declarations.find_member(&fields, &name) {
                        Some(member) => copy_member_type(ctx, member, node),
                        None => ctx.error(
                            ErrorImpl::MissingField {
                                field: name,
                                owner_kind: "struct".to_string(),
                                owner: structure.name.to_string(),
                            },
                            node,
                            &span,
                        ),
                    }
                }
                other => ctx.error(
                    ErrorImpl::InvalidFieldTarget {
                        type_: other.to_string(),
                    },
                    node,
                    &span,
                ),
            },
        );
    }

    fn type_check_class_element(&mut self, element: &ClassElementExpr) {
        self.type_check_expr(&element.stem);

        let node = element.id;
        let span = element.span.clone();
        let name = element.element.clone();

        self.reactor.rule(
            vec![Attribute::type_of(element.stem.id())],
            vec![Attribute::type_of(node)],
            node,
            &element.span,
            move |ctx| match ctx.ty(0) {
                Type::Array(_) => array_length(ctx, &name, "attribute", node, &span),
                Type::Class(class) => {
                    let context = ctx.context;
                    let members = context
                        .declarations
                        .get(class.declaration)
                        .class_data()
                        .map(|data| data.members.clone())
                        .unwrap_or_default();

                    match context.declarations.find_member(&members, &name) {
                        Some(member) => copy_member_type(ctx, member, node),
                        None => ctx.error(
                            ErrorImpl::MissingField {
                                field: name,
                                owner_kind: "class".to_string(),
                                owner: class.name.to_string(),
                            },
                            node,
                            &span,
                        ),
                    }
                }
                other => ctx.error(
                    ErrorImpl::InvalidClassElementTarget {
                        type_: other.to_string(),
                    },
                    node,
                    &span,
                ),
            },
        );
    }

    fn type_check_struct_constructor(&mut self, constructor: &StructConstructorExpr) {
        self.type_check_reference(&constructor.reference);

        let node = constructor.id;
        let span = constructor.span.clone();
        let name = constructor.reference.value.clone();

        self.reactor.rule(
            vec![Attribute::decl(constructor.reference.id)],
            vec![Attribute::type_of(node)],
            node,
            &constructor.span,
            move |ctx| {
                let declaration = ctx.decl(0);
                let context = ctx.context;
                let Some(data) = context.declarations.get(declaration).struct_data() else {
                    ctx.error(ErrorImpl::NotAStruct { name }, node, &span);
                    return;
                };

                let mut inputs = vec![Attribute::declared(declaration)];
                inputs.extend(data.fields.iter().map(|field| Attribute::type_of(*field)));

                ctx.then(inputs, vec![Attribute::type_of(node)], |ctx| {
                    let structure = ctx.ty(0);
                    let fields = (1..ctx.input_count()).map(|i| ctx.ty(i)).collect();
                    ctx.set_output(0, Value::Type(Type::function(structure, fields)));
                });
            },
        );
    }

    fn type_check_class_constructor(&mut self, constructor: &ClassConstructorExpr) {
        self.type_check_reference(&constructor.reference);

        let node = constructor.id;
        let span = constructor.span.clone();
        let name = constructor.reference.value.clone();

        self.reactor.rule(
            vec![Attribute::decl(constructor.reference.id)],
            vec![Attribute::type_of(node)],
            node,
            &constructor.span,
            move |ctx| {
                let declaration = ctx.decl(0);
                if ctx.context.declarations.get(declaration).class_data().is_none() {
                    ctx.error(ErrorImpl::NotAClass { name }, node, &span);
                    return;
                }

                ctx.then(
                    vec![Attribute::declared(declaration)],
                    vec![Attribute::type_of(node)],
                    |ctx| {
                        let class = ctx.ty(0);
                        ctx.set_output(0, Value::Type(Type::function(class, vec![])));
                    },
                );
            },
        );
    }

    fn type_check_arguments(&mut self, callee: NodeId, arguments: &[Expr]) {
        for (index, argument) in arguments.iter().enumerate() {
            self.with_inference(InferenceContext::Argument { callee, index }, |checker| {
                checker.type_check_expr(argument)
            });
        }
    }

    /// Checks a call.
    ///
    /// The overloads a call may select from are the functions sharing the
    /// callee's name in the scope its name resolved in, or in the bodies of
    /// the class it is an element of. A callee with at most one such
    /// signature is checked argument by argument against its own type.
    /// Otherwise the first overload whose parameter types equal the argument
    /// types is selected, else the first one accepting them.
    fn type_check_call(&mut self, call: &CallExpr) {
        self.type_check_expr(&call.callee);
        self.type_check_arguments(call.callee.id(), &call.arguments);

        let node = call.id;
        let span = call.span.clone();
        let callee = call.callee.id();
        let callee_text = call.callee.to_string();
        let callee_name = call.callee.callee_name().map(str::to_string);
        let site = OverloadSite::of(&call.callee);
        let arguments = call
            .arguments
            .iter()
            .map(|argument| (argument.id(), argument.span().clone()))
            .collect::<Vec<_>>();
        let argument_count = arguments.len();

        let mut inputs = vec![Attribute::type_of(callee)];
        inputs.extend(
            call.arguments
                .iter()
                .map(|argument| Attribute::type_of(argument.id())),
        );
        inputs.extend(site.map(OverloadSite::attribute));

        self.reactor.rule(
            inputs,
            vec![Attribute::type_of(node)],
            node,
            &call.span,
            move |ctx| {
                let Type::Function(function) = ctx.ty(0) else {
                    ctx.error(ErrorImpl::NotCallable { callee: callee_text }, node, &span);
                    return;
                };
                let argument_types = (1..=argument_count).map(|i| ctx.ty(i)).collect::<Vec<_>>();

                let scopes = match site {
                    Some(OverloadSite::Scope(_)) => vec![ctx.scope(argument_count + 1)],
                    Some(OverloadSite::Class(_)) => match ctx.ty(argument_count + 1) {
                        Type::Class(class) => class_scopes(ctx.context, class.declaration),
                        _ => vec![],
                    },
                    None => vec![],
                };
                let overloads = callee_name
                    .as_deref()
                    .map(|name| ctx.context.signatures.overloads(name, &scopes))
                    .unwrap_or_default();

                if function.parameters.len() == argument_types.len() && overloads.len() <= 1 {
                    ctx.set_output(0, Value::Type(*function.return_type));
                    if let Some(Value::Decl(declaration)) =
                        ctx.attribute(&Attribute::decl(callee)).cloned()
                    {
                        ctx.set(Attribute::decl(node), Value::Decl(declaration));
                    }

                    for (index, ((argument, argument_span), (received, expected))) in arguments
                        .iter()
                        .zip(argument_types.iter().zip(function.parameters.iter()))
                        .enumerate()
                    {
                        if !received.is_assignable_to(expected) {
                            ctx.report(
                                ErrorImpl::IncompatibleArgument {
                                    index,
                                    expected: expected.to_string(),
                                    received: received.to_string(),
                                },
                                *argument,
                                argument_span,
                            );
                        }
                    }
                    return;
                }

                if overloads.len() <= 1 {
                    ctx.error(
                        ErrorImpl::WrongArity {
                            expected: function.parameters.len(),
                            received: argument_types.len(),
                        },
                        node,
                        &span,
                    );
                    return;
                }

                let expected_arity = function.parameters.len();
                ctx.then(
                    overloads.iter().map(|overload| Attribute::type_of(*overload)).collect(),
                    vec![Attribute::type_of(node)],
                    move |ctx| {
                        let candidates = overloads
                            .iter()
                            .enumerate()
                            .filter_map(|(i, overload)| match ctx.ty(i) {
                                Type::Function(function)
                                    if function.parameters.len() == argument_types.len() =>
                                {
                                    Some((*overload, function))
                                }
                                _ => None,
                            })
                            .collect::<Vec<_>>();

                        let exact = candidates
                            .iter()
                            .find(|(_, function)| function.parameters == argument_types);
                        let selected = exact.or_else(|| {
                            candidates.iter().find(|(_, function)| {
                                argument_types
                                    .iter()
                                    .zip(function.parameters.iter())
                                    .all(|(received, expected)| received.is_assignable_to(expected))
                            })
                        });

                        match selected {
                            Some((overload, function)) => {
                                debug!(%node, %overload, "selected overload");
                                let return_type = (*function.return_type).clone();
                                let overload = *overload;
                                ctx.set_output(0, Value::Type(return_type));
                                ctx.set(Attribute::decl(node), Value::Decl(overload));
                            }
                            None => ctx.error(
                                ErrorImpl::NoMatchingOverload {
                                    expected: expected_arity,
                                    received: argument_types.len(),
                                },
                                node,
                                &span,
                            ),
                        }
                    },
                );
            },
        );
    }

    /// Checks a template call against the template's signature with the
    /// explicit type arguments substituted for its placeholders. The body
    /// is not instantiated.
    fn type_check_template_call(&mut self, call: &TemplateCallExpr) {
        self.type_check_expr(&call.callee);
        for type_argument in &call.type_arguments {
            self.type_check_type(type_argument);
        }
        self.type_check_arguments(call.callee.id(), &call.arguments);

        let node = call.id;
        let span = call.span.clone();
        let callee_text = call.callee.to_string();
        let type_argument_count = call.type_arguments.len();
        let arguments = call
            .arguments
            .iter()
            .map(|argument| (argument.id(), argument.span().clone()))
            .collect::<Vec<_>>();

        let mut inputs = vec![Attribute::type_of(call.callee.id())];
        inputs.extend(
            call.type_arguments
                .iter()
                .map(|type_argument| Attribute::value(type_argument.id())),
        );
        inputs.extend(
            call.arguments
                .iter()
                .map(|argument| Attribute::type_of(argument.id())),
        );

        self.reactor.rule(
            inputs,
            vec![Attribute::type_of(node)],
            node,
            &call.span,
            move |ctx| {
                let Type::Template(template) = ctx.ty(0) else {
                    ctx.error(ErrorImpl::NotATemplate { callee: callee_text }, node, &span);
                    return;
                };

                if template.value_parameters().len() != arguments.len() {
                    ctx.error(
                        ErrorImpl::WrongArity {
                            expected: template.value_parameters().len(),
                            received: arguments.len(),
                        },
                        node,
                        &span,
                    );
                    return;
                }
                if template.type_parameter_count != type_argument_count {
                    ctx.error(
                        ErrorImpl::WrongTypeArgumentCount {
                            expected: template.type_parameter_count,
                            received: type_argument_count,
                        },
                        node,
                        &span,
                    );
                    return;
                }

                let bindings = template
                    .placeholders()
                    .iter()
                    .enumerate()
                    .filter_map(|(i, placeholder)| match placeholder {
                        Type::Placeholder(nominal) => Some((nominal.declaration, ctx.ty(1 + i))),
                        _ => None,
                    })
                    .collect::<Vec<_>>();

                let first_argument = 1 + type_argument_count;
                for (index, ((argument, argument_span), parameter)) in arguments
                    .iter()
                    .zip(template.value_parameters().iter())
                    .enumerate()
                {
                    let expected = parameter.substitute(&bindings);
                    let received = ctx.ty(first_argument + index);
                    if !received.is_assignable_to(&expected) {
                        ctx.report(
                            ErrorImpl::IncompatibleArgument {
                                index,
                                expected: expected.to_string(),
                                received: received.to_string(),
                            },
                            *argument,
                            argument_span,
                        );
                    }
                }

                let return_type = template.return_type.substitute(&bindings);
                ctx.set_output(0, Value::Type(return_type));
            },
        );
    }
}

/// `length` is the only member of an array.
fn array_length(
    ctx: &mut RuleContext<'_, SemanticContext>,
    name: &str,
    member: &str,
    node: NodeId,
    span: &Span,
) {
    if name == "length" {
        ctx.set_output(0, Value::Type(Type::Int));
    } else {
        ctx.error(
            ErrorImpl::NonLengthArrayMember {
                member: member.to_string(),
            },
            node,
            span,
        );
    }
}

/// Where the overloads of a call are declared.
#[derive(Debug, Clone, Copy)]
enum OverloadSite {
    /// A plain name, looked up in the scope it resolved in.
    Scope(NodeId),
    /// A class element, looked up in the bodies of the stem's class.
    Class(NodeId),
}

impl OverloadSite {
    fn of(callee: &Expr) -> Option<OverloadSite> {
        match callee {
            Expr::Symbol(symbol) => Some(OverloadSite::Scope(symbol.id)),
            Expr::Paren(paren) => OverloadSite::of(&paren.expression),
            Expr::ClassElement(element) => Some(OverloadSite::Class(element.stem.id())),
            _ => None,
        }
    }

    fn attribute(self) -> Attribute {
        match self {
            OverloadSite::Scope(symbol) => Attribute::scope(symbol),
            OverloadSite::Class(stem) => Attribute::type_of(stem),
        }
    }
}

/// Body scopes of `class` and of its direct superclasses.
fn class_scopes(context: &SemanticContext, class: DeclId) -> Vec<ScopeId> {
    let superclasses = context
        .declarations
        .get(class)
        .class_data()
        .map(|data| data.superclasses.as_slice())
        .unwrap_or_default();

    std::iter::once(class)
        .chain(superclasses.iter().copied())
        .filter_map(|declaration| context.declarations.get(declaration).body_scope)
        .collect()
}

fn copy_member_type(ctx: &mut RuleContext<'_, SemanticContext>, member: DeclId, node: NodeId) {
    ctx.set(Attribute::decl(node), Value::Decl(member));
    ctx.then(
        vec![Attribute::type_of(member)],
        vec![Attribute::type_of(node)],
        |ctx| {
            let ty = ctx.ty(0);
            ctx.set_output(0, Value::Type(ty));
        },
    );
}

fn numeric_component(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Int | Type::Float => Some(ty),
        Type::Array(component) if component.is_numeric() => Some(component),
        _ => None,
    }
}

/// Result type of an arithmetic operator, if the operands support it.
///
/// Adding a string to anything concatenates. Numbers widen to `Float` when
/// either side is a `Float`. A numeric array on the left combines
/// element-wise with a number or another numeric array.
fn arithmetic_result(operator: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    if operator == BinaryOperator::Add && (*left == Type::String || *right == Type::String) {
        return Some(Type::String);
    }

    if left.is_placeholder() {
        return Some(right.clone());
    }
    if right.is_placeholder() {
        return Some(left.clone());
    }

    // Only an array on the left combines with an array on the right.
    let left_component = numeric_component(left)?;
    let right_component = match left {
        Type::Array(_) => numeric_component(right)?,
        _ if right.is_numeric() => right,
        _ => return None,
    };
    let component = if *left_component == Type::Float || *right_component == Type::Float {
        Type::Float
    } else {
        Type::Int
    };

    if matches!(left, Type::Array(_)) {
        Some(Type::array(component))
    } else {
        Some(component)
    }
}
