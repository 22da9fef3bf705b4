//! Dependency-driven attribute resolution.
//!
//! The analysis walks the tree once, in document order, but the facts it
//! needs do not follow document order: a function may be called before it
//! is declared, a struct field's type depends on an annotation that names
//! a type declared further down. The walker therefore publishes what it
//! knows immediately with [`Reactor::set`] and describes everything else as
//! a [`Rule`]: a computation over a list of input attributes producing a
//! list of output attributes. [`Reactor::resolve`] then runs the rules to a
//! fixed point.
//!
//! A rule whose input failed is dropped and its outputs fail in turn, so a
//! single unresolved name yields a single error instead of a cascade.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    ast::{ast::NodeId, types::Type},
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    declarations::DeclId,
    scope::ScopeId,
    typed_ast::{Attribute, Attributes, Value},
};

type Compute<C> = Box<dyn FnOnce(&mut RuleContext<'_, C>)>;

pub struct Rule<C> {
    inputs: Vec<Attribute>,
    outputs: Vec<Attribute>,
    node: NodeId,
    span: Span,
    compute: Compute<C>,
}

impl<C> std::fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("node", &self.node)
            .finish()
    }
}

/// What a running rule sees: its inputs, the shared analysis context and
/// the means to publish outputs or report errors.
pub struct RuleContext<'a, C> {
    pub context: &'a C,
    attributes: &'a mut Attributes,
    errors: &'a mut Vec<Error>,
    continuations: &'a mut Vec<Rule<C>>,
    inputs: &'a [Attribute],
    outputs: &'a [Attribute],
    node: NodeId,
    span: &'a Span,
}

impl<'a, C> RuleContext<'a, C> {
    pub fn get(&self, input: usize) -> &Value {
        match self.attributes.get(&self.inputs[input]) {
            Some(value) => value,
            None => unreachable!("rule ran before input {} was set", self.inputs[input]),
        }
    }

    pub fn ty(&self, input: usize) -> Type {
        match self.get(input) {
            Value::Type(ty) => ty.clone(),
            other => unreachable!("input {} is not a type: {:?}", self.inputs[input], other),
        }
    }

    pub fn flag(&self, input: usize) -> bool {
        match self.get(input) {
            Value::Bool(flag) => *flag,
            other => unreachable!("input {} is not a flag: {:?}", self.inputs[input], other),
        }
    }

    pub fn decl(&self, input: usize) -> DeclId {
        match self.get(input) {
            Value::Decl(declaration) => *declaration,
            other => unreachable!(
                "input {} is not a declaration: {:?}",
                self.inputs[input], other
            ),
        }
    }

    pub fn scope(&self, input: usize) -> ScopeId {
        match self.get(input) {
            Value::Scope(scope) => *scope,
            other => unreachable!("input {} is not a scope: {:?}", self.inputs[input], other),
        }
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Reads any attribute, set or not.
    pub fn attribute(&self, attribute: &Attribute) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn set(&mut self, attribute: Attribute, value: Value) {
        self.attributes.set(attribute, value);
    }

    pub fn set_output(&mut self, output: usize, value: Value) {
        let attribute = self.outputs[output];
        self.attributes.set(attribute, value);
    }

    /// Records an error without failing anything.
    pub fn report(&mut self, kind: ErrorImpl, node: NodeId, span: &Span) {
        self.errors.push(Error::at_node(kind, span.clone(), node));
    }

    /// Records an error and fails every output not set yet.
    pub fn error(&mut self, kind: ErrorImpl, node: NodeId, span: &Span) {
        self.report(kind, node, span);
        self.fail_all();
    }

    /// Records an error and fails the given attributes.
    pub fn error_for(&mut self, kind: ErrorImpl, node: NodeId, span: &Span, failed: &[Attribute]) {
        self.report(kind, node, span);
        for attribute in failed {
            self.attributes.fail(*attribute);
        }
    }

    /// Fails every output not set yet, without reporting.
    pub fn fail_all(&mut self) {
        for output in self.outputs {
            self.attributes.fail(*output);
        }
    }

    /// Chains a rule whose inputs only became known while this one ran.
    pub fn then(
        &mut self,
        inputs: Vec<Attribute>,
        outputs: Vec<Attribute>,
        compute: impl FnOnce(&mut RuleContext<'_, C>) + 'static,
    ) {
        self.continuations.push(Rule {
            inputs,
            outputs,
            node: self.node,
            span: self.span.clone(),
            compute: Box::new(compute),
        });
    }
}

pub struct Reactor<C> {
    attributes: Attributes,
    rules: Vec<Rule<C>>,
    errors: Vec<Error>,
    resolving: bool,
}

impl<C> Default for Reactor<C> {
    fn default() -> Self {
        Reactor::new()
    }
}

impl<C> Reactor<C> {
    pub fn new() -> Self {
        Reactor {
            attributes: Attributes::new(),
            rules: vec![],
            errors: vec![],
            resolving: false,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn set(&mut self, attribute: Attribute, value: Value) {
        self.attributes.set(attribute, value);
    }

    pub fn fail(&mut self, attribute: Attribute) {
        self.attributes.fail(attribute);
    }

    /// Records an error found while walking, outside of any rule.
    pub fn report(&mut self, kind: ErrorImpl, node: NodeId, span: &Span) {
        self.errors.push(Error::at_node(kind, span.clone(), node));
    }

    pub fn rule(
        &mut self,
        inputs: Vec<Attribute>,
        outputs: Vec<Attribute>,
        node: NodeId,
        span: &Span,
        compute: impl FnOnce(&mut RuleContext<'_, C>) + 'static,
    ) {
        debug_assert!(!self.resolving, "rule registered after resolution started");
        self.rules.push(Rule {
            inputs,
            outputs,
            node,
            span: span.clone(),
            compute: Box::new(compute),
        });
    }

    pub fn pending(&self) -> usize {
        self.rules.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    /// Runs every rule whose inputs are available until nothing changes.
    ///
    /// Rules still waiting at the fixed point report the attributes they
    /// were waiting on, and their outputs fail.
    pub fn resolve(&mut self, context: &C) {
        self.resolving = true;
        let mut pending = std::mem::take(&mut self.rules);
        debug!(rules = pending.len(), "resolving attributes");

        let mut fired = 0usize;
        let mut passes = 0usize;

        loop {
            passes += 1;
            let mut progressed = false;
            let mut waiting = Vec::with_capacity(pending.len());

            for rule in pending.drain(..) {
                if rule.inputs.iter().any(|input| self.attributes.is_failed(input)) {
                    trace!(node = %rule.node, "dropping rule with a failed input");
                    for output in &rule.outputs {
                        self.attributes.fail(*output);
                    }
                    progressed = true;
                } else if rule.inputs.iter().all(|input| self.attributes.is_set(input)) {
                    trace!(node = %rule.node, inputs = rule.inputs.len(), "firing rule");
                    self.fire(rule, context, &mut waiting);
                    fired += 1;
                    progressed = true;
                } else {
                    waiting.push(rule);
                }
            }

            pending = waiting;
            if !progressed || pending.is_empty() {
                break;
            }
        }

        debug!(fired, passes, stuck = pending.len(), "resolution finished");

        if !pending.is_empty() {
            self.report_stuck(&pending);
        }
    }

    fn fire(&mut self, rule: Rule<C>, context: &C, continuations: &mut Vec<Rule<C>>) {
        let Rule {
            inputs,
            outputs,
            node,
            span,
            compute,
        } = rule;

        let mut rule_context = RuleContext {
            context,
            attributes: &mut self.attributes,
            errors: &mut self.errors,
            continuations,
            inputs: &inputs,
            outputs: &outputs,
            node,
            span: &span,
        };

        compute(&mut rule_context);
    }

    fn report_stuck(&mut self, pending: &[Rule<C>]) {
        let producible = pending
            .iter()
            .flat_map(|rule| rule.outputs.iter().copied())
            .collect::<HashSet<_>>();

        let mut reported = HashSet::new();
        for rule in pending {
            for input in &rule.inputs {
                if !self.attributes.is_known(input)
                    && !producible.contains(input)
                    && reported.insert(*input)
                {
                    self.report(
                        ErrorImpl::UnresolvedAttribute {
                            attribute: input.to_string(),
                        },
                        rule.node,
                        &rule.span,
                    );
                }
            }
        }

        if reported.is_empty() {
            let rule = &pending[0];
            let attribute = rule
                .inputs
                .iter()
                .find(|input| !self.attributes.is_known(input))
                .map(|input| input.to_string())
                .unwrap_or_default();
            self.report(
                ErrorImpl::CyclicDependency { attribute },
                rule.node,
                &rule.span,
            );
        }

        for rule in pending {
            for output in &rule.outputs {
                self.attributes.fail(*output);
            }
        }
    }
}
