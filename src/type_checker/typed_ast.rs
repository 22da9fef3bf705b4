//! Attributes decorating the syntax tree.
//!
//! The tree itself stays immutable. Everything the analysis learns about it
//! is stored as write-once attributes keyed by the node or declaration they
//! describe.

use std::{collections::HashMap, fmt::Display};

use tracing::warn;

use crate::ast::{ast::NodeId, types::Type};

use super::{declarations::DeclId, scope::ScopeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Node(NodeId),
    Decl(DeclId),
}

impl From<NodeId> for Owner {
    fn from(node: NodeId) -> Self {
        Owner::Node(node)
    }
}

impl From<DeclId> for Owner {
    fn from(declaration: DeclId) -> Self {
        Owner::Decl(declaration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Type of an expression or declaration.
    Type,
    /// Type introduced by a type declaration.
    Declared,
    /// Declaration a reference resolved to.
    Decl,
    /// Scope a reference was bound in, or the scope a node opens.
    Scope,
    /// Whether a statement always returns.
    Returns,
    /// Type denoted by a type annotation.
    Value,
}

impl AttributeKind {
    fn name(&self) -> &'static str {
        match self {
            AttributeKind::Type => "type",
            AttributeKind::Declared => "declared",
            AttributeKind::Decl => "decl",
            AttributeKind::Scope => "scope",
            AttributeKind::Returns => "returns",
            AttributeKind::Value => "value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub owner: Owner,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn new(owner: impl Into<Owner>, kind: AttributeKind) -> Self {
        Attribute {
            owner: owner.into(),
            kind,
        }
    }

    pub fn type_of(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Type)
    }

    pub fn declared(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Declared)
    }

    pub fn decl(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Decl)
    }

    pub fn scope(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Scope)
    }

    pub fn returns(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Returns)
    }

    pub fn value(owner: impl Into<Owner>) -> Self {
        Attribute::new(owner, AttributeKind::Value)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Owner::Node(node) => write!(f, "{} of node {}", self.kind.name(), node),
            Owner::Decl(declaration) => {
                write!(f, "{} of declaration {}", self.kind.name(), declaration)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Type(Type),
    Bool(bool),
    Decl(DeclId),
    Scope(ScopeId),
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Set(Value),
    Failed,
}

/// Write-once attribute table.
///
/// A slot is either unknown, set to a value, or failed because the value
/// could not be computed.
#[derive(Debug, Default)]
pub struct Attributes {
    slots: HashMap<Attribute, Slot>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Stores `value`. Returns false, leaving the slot untouched, when the
    /// slot was already set or failed.
    pub fn set(&mut self, attribute: Attribute, value: Value) -> bool {
        if let Some(existing) = self.slots.get(&attribute) {
            warn!(%attribute, ?existing, ?value, "attribute written twice");
            return false;
        }
        self.slots.insert(attribute, Slot::Set(value));
        true
    }

    /// Marks an unknown slot as failed.
    pub fn fail(&mut self, attribute: Attribute) -> bool {
        if self.slots.contains_key(&attribute) {
            return false;
        }
        self.slots.insert(attribute, Slot::Failed);
        true
    }

    pub fn get(&self, attribute: &Attribute) -> Option<&Value> {
        match self.slots.get(attribute) {
            Some(Slot::Set(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_set(&self, attribute: &Attribute) -> bool {
        matches!(self.slots.get(attribute), Some(Slot::Set(_)))
    }

    pub fn is_failed(&self, attribute: &Attribute) -> bool {
        matches!(self.slots.get(attribute), Some(Slot::Failed))
    }

    /// Set or failed.
    pub fn is_known(&self, attribute: &Attribute) -> bool {
        self.slots.contains_key(attribute)
    }

    pub fn ty(&self, attribute: &Attribute) -> Option<&Type> {
        match self.get(attribute) {
            Some(Value::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    pub fn flag(&self, attribute: &Attribute) -> Option<bool> {
        match self.get(attribute) {
            Some(Value::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    pub fn decl(&self, attribute: &Attribute) -> Option<DeclId> {
        match self.get(attribute) {
            Some(Value::Decl(declaration)) => Some(*declaration),
            _ => None,
        }
    }

    pub fn scope(&self, attribute: &Attribute) -> Option<ScopeId> {
        match self.get(attribute) {
            Some(Value::Scope(scope)) => Some(*scope),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
