//! Arena of every declaration introduced during one analysis run.
//!
//! Declarations are addressed by [`DeclId`]. User declarations remember the
//! tree node that introduced them; built-ins and synthesized class
//! declarations do not have one of their own.

use std::collections::HashMap;

use crate::{
    ast::{ast::NodeId, statements::Visibility},
    Span, MK_ID,
};

use super::scope::ScopeId;

MK_ID!(DeclId);

#[derive(Debug, Clone, Default)]
pub struct FunctionData {
    pub visibility: Option<Visibility>,
    pub parameters: Vec<DeclId>,
    /// Annotation node holding the declared return type.
    pub return_type: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct StructData {
    pub fields: Vec<DeclId>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassData {
    pub visibility: Option<Visibility>,
    /// Members declared directly in the class body, in statement order.
    pub own_members: Vec<DeclId>,
    /// Own members followed by the own members of each direct superclass.
    pub members: Vec<DeclId>,
    pub superclasses: Vec<DeclId>,
    /// For a flattened class, the declaration written in the source.
    pub original: Option<DeclId>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub type_parameters: Vec<DeclId>,
    pub parameters: Vec<DeclId>,
    pub return_type: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Variable,
    Field,
    Parameter,
    Function(FunctionData),
    Struct(StructData),
    Class(ClassData),
    TemplateFunction(TemplateData),
    TemplateParameter,
    BuiltinType,
    BuiltinVariable,
    BuiltinFunction,
    /// The `pub`/`pvt` visibility markers.
    Modifier,
}

impl DeclarationKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DeclarationKind::Variable | DeclarationKind::BuiltinVariable => "variable",
            DeclarationKind::Field => "field",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::Function(_) | DeclarationKind::BuiltinFunction => "function",
            DeclarationKind::Struct(_) => "struct",
            DeclarationKind::Class(_) => "class",
            DeclarationKind::TemplateFunction(_) => "template",
            DeclarationKind::TemplateParameter => "template type parameter",
            DeclarationKind::BuiltinType => "type",
            DeclarationKind::Modifier => "modifier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclarationKind,
    pub node: Option<NodeId>,
    pub span: Span,
    /// Scope the declaration's body executes in, for functions and classes.
    pub body_scope: Option<ScopeId>,
}

impl Declaration {
    /// Whether the name denotes a type when used in an annotation.
    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::BuiltinType
                | DeclarationKind::Struct(_)
                | DeclarationKind::Class(_)
                | DeclarationKind::TemplateParameter
                | DeclarationKind::Modifier
        )
    }

    /// Annotation node of the declared return type of a function or template.
    pub fn return_type_node(&self) -> Option<NodeId> {
        match &self.kind {
            DeclarationKind::Function(data) => data.return_type,
            DeclarationKind::TemplateFunction(data) => data.return_type,
            _ => None,
        }
    }

    pub fn struct_data(&self) -> Option<&StructData> {
        match &self.kind {
            DeclarationKind::Struct(data) => Some(data),
            _ => None,
        }
    }

    pub fn class_data(&self) -> Option<&ClassData> {
        match &self.kind {
            DeclarationKind::Class(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Declarations {
    items: Vec<Declaration>,
    by_node: HashMap<NodeId, DeclId>,
}

impl Declarations {
    pub fn new() -> Self {
        Declarations::default()
    }

    /// Adds a declaration. When `node` is given it becomes the declaration
    /// that node reports, replacing any earlier one.
    pub fn add(
        &mut self,
        name: &str,
        kind: DeclarationKind,
        node: Option<NodeId>,
        span: Span,
    ) -> DeclId {
        let id = DeclId::from_raw(self.items.len() as u32);
        self.items.push(Declaration {
            id,
            name: name.to_string(),
            kind,
            node,
            span,
            body_scope: None,
        });

        if let Some(node) = node {
            self.by_node.insert(node, id);
        }

        id
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.items[id.index()]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.items[id.index()]
    }

    pub fn for_node(&self, node: NodeId) -> Option<DeclId> {
        self.by_node.get(&node).copied()
    }

    /// Declaration among `members` named `name`.
    ///
    /// Fields and variables take precedence over functions, which take
    /// precedence over templates. Among members of the same rank the first
    /// one listed wins.
    pub fn find_member(&self, members: &[DeclId], name: &str) -> Option<DeclId> {
        let rank = |declaration: &Declaration| match declaration.kind {
            DeclarationKind::Field | DeclarationKind::Variable => 0,
            DeclarationKind::Function(_) => 1,
            DeclarationKind::TemplateFunction(_) => 2,
            _ => 3,
        };

        members
            .iter()
            .map(|member| self.get(*member))
            .filter(|declaration| declaration.name == name)
            .min_by_key(|declaration| rank(declaration))
            .map(|declaration| declaration.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
