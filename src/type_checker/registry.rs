//! Function signatures known to the program.
//!
//! Every named function is registered under the scope it is declared in,
//! its name and the textual list of its parameter annotations. Functions
//! sharing all three are one entry, and the last one registered wins.

use std::{collections::HashMap, fmt::Display};

use tracing::debug;

use super::{declarations::DeclId, scope::ScopeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub scope: ScopeId,
    pub name: String,
    pub parameters: Vec<String>,
}

impl Signature {
    pub fn new(scope: ScopeId, name: &str, parameters: Vec<String>) -> Self {
        Signature {
            scope,
            name: name.to_string(),
            parameters,
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.parameters.join(", "))
    }
}

#[derive(Debug, Default)]
pub struct SignatureRegistry {
    entries: HashMap<Signature, DeclId>,
    order: Vec<Signature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        SignatureRegistry::default()
    }

    /// Registers `declaration` under `signature`, returning the declaration
    /// it replaced, if any.
    pub fn register(&mut self, signature: Signature, declaration: DeclId) -> Option<DeclId> {
        let previous = self.entries.insert(signature.clone(), declaration);

        match previous {
            Some(previous) => {
                debug!(%signature, %previous, %declaration, "signature redeclared, keeping the latest");
            }
            None => self.order.push(signature),
        }

        previous
    }

    pub fn get(&self, signature: &Signature) -> Option<DeclId> {
        self.entries.get(signature).copied()
    }

    /// Declarations registered under `name` in any of `scopes`, grouped by
    /// scope in the order given, then in first-registration order.
    pub fn overloads(&self, name: &str, scopes: &[ScopeId]) -> Vec<DeclId> {
        scopes
            .iter()
            .flat_map(|scope| {
                self.order
                    .iter()
                    .filter(move |signature| signature.scope == *scope && signature.name == name)
            })
            .filter_map(|signature| self.get(signature))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
