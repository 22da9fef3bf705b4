//! Lexical scopes.
//!
//! Scopes live in one table for the whole run and link to their parent, so
//! rules deferred to the resolution phase can still look names up from the
//! scope they were registered in.

use std::collections::HashMap;

use tracing::trace;

use crate::MK_ID;

use super::declarations::DeclId;

MK_ID!(ScopeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Block,
    /// Parameters and locals of a function or template.
    Function(DeclId),
    Class(DeclId),
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    declarations: HashMap<String, DeclId>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.declarations.get(name).copied()
    }
}

/// A successful lookup: the declaration and the scope that binds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationContext {
    pub declaration: DeclId,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        ScopeTable::new()
    }
}

impl ScopeTable {
    /// Creates the table with its root scope.
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![Scope {
                id: ScopeId::from_raw(0),
                parent: None,
                kind: ScopeKind::Root,
                declarations: HashMap::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::from_raw(0)
    }

    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            kind,
            declarations: HashMap::new(),
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// Binds `name` in `scope`. Redeclaring a name in the same scope
    /// replaces the binding; inner scopes shadow outer ones.
    pub fn declare(&mut self, scope: ScopeId, name: &str, declaration: DeclId) {
        trace!(%scope, name, %declaration, "declare");
        self.scopes[scope.index()]
            .declarations
            .insert(name.to_string(), declaration);
    }

    /// Nearest binding of `name`, walking from `scope` to the root.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DeclarationContext> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = self.get(id);
            if let Some(declaration) = scope.get(name) {
                return Some(DeclarationContext {
                    declaration,
                    scope: id,
                });
            }
            current = scope.parent;
        }

        None
    }

    /// The function or template whose body `scope` belongs to.
    ///
    /// The search stops at class bodies: a statement directly inside a
    /// class is not part of any function.
    pub fn enclosing_function(&self, scope: ScopeId) -> Option<DeclId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = self.get(id);
            match scope.kind {
                ScopeKind::Function(declaration) => return Some(declaration),
                ScopeKind::Class(_) | ScopeKind::Root => return None,
                ScopeKind::Block => current = scope.parent,
            }
        }

        None
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
