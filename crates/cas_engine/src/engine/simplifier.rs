//! Simplifier struct definition, construction, and configuration.
//!
//! The `Simplifier` is the entry point for the rewrite engine. It holds the
//! registered rules indexed by target node kind plus the set of rules the
//! caller disabled.

use crate::rule::Rule;
use crate::step::Step;
use cas_ast::{Expr, TargetKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::transform::Rewriter;

pub struct Simplifier {
    pub(super) rules: HashMap<TargetKind, Vec<Arc<dyn Rule>>>,
    pub(super) global_rules: Vec<Arc<dyn Rule>>,
    pub(super) disabled_rules: HashSet<String>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    /// Create a new Simplifier without rules registered.
    ///
    /// Usually you want `Simplifier::with_default_rules()` instead.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            global_rules: Vec::new(),
            disabled_rules: HashSet::new(),
        }
    }

    /// Create a Simplifier with all default rules registered.
    ///
    /// # Example
    ///
    /// ```
    /// use cas_ast::Expr;
    /// use cas_engine::Simplifier;
    ///
    /// let s = Simplifier::with_default_rules();
    /// let result = s.simplify(&(Expr::int(2) + 2));
    /// assert_eq!(result, Expr::int(4));
    /// ```
    pub fn with_default_rules() -> Self {
        let mut s = Self::new();
        s.register_default_rules();
        s
    }

    pub fn disable_rule(&mut self, rule_name: &str) {
        self.disabled_rules.insert(rule_name.to_string());
    }

    pub fn enable_rule(&mut self, rule_name: &str) {
        self.disabled_rules.remove(rule_name);
    }

    pub fn register_default_rules(&mut self) {
        use crate::rules::*;

        // Folding first so every later group sees numbers collapsed
        arithmetic::register(self);
        algebra::register(self);
        exponents::register(self);
        logarithms::register(self);
        trigonometry::register(self);
        fractions::register(self);

        // Statements and sets only ever see already-normalized operands
        relations::register(self);
        boolean::register(self);
        sets::register(self);

        #[cfg(debug_assertions)]
        self.assert_unique_rule_names();
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        let rule_rc: Arc<dyn Rule> = rule.into();
        let priority = rule_rc.priority();

        if let Some(targets) = rule_rc.target_types() {
            for target in targets.iter() {
                let vec = self.rules.entry(target).or_default();
                // Higher priority first; equal priority keeps insertion order
                let pos = vec
                    .iter()
                    .position(|r| r.priority() < priority)
                    .unwrap_or(vec.len());
                vec.insert(pos, rule_rc.clone());
            }
        } else {
            let pos = self
                .global_rules
                .iter()
                .position(|r| r.priority() < priority)
                .unwrap_or(self.global_rules.len());
            self.global_rules.insert(pos, rule_rc);
        }
    }

    pub fn get_all_rule_names(&self) -> Vec<String> {
        let names: HashSet<&str> = self
            .global_rules
            .iter()
            .chain(self.rules.values().flatten())
            .map(|r| r.name())
            .collect();
        let mut sorted: Vec<String> = names.into_iter().map(str::to_string).collect();
        sorted.sort();
        sorted
    }

    /// Panics if two distinct rule instances share a name (debug builds only).
    /// A rule targeting several kinds sits in several buckets as the same Arc.
    #[cfg(debug_assertions)]
    #[allow(clippy::panic)] // Intentional: debug-only invariant enforcement
    pub fn assert_unique_rule_names(&self) {
        let mut name_to_first_arc: HashMap<&str, *const ()> = HashMap::new();
        for rule in self.global_rules.iter().chain(self.rules.values().flatten()) {
            let name = rule.name();
            let ptr = Arc::as_ptr(rule).cast::<()>();
            match name_to_first_arc.get(name) {
                Some(&existing) if !std::ptr::eq(ptr, existing) => panic!(
                    "Duplicate rule name detected: '{}'. Each rule must have a unique name.",
                    name
                ),
                Some(_) => {}
                None => {
                    name_to_first_arc.insert(name, ptr);
                }
            }
        }
    }

    /// Rewrite `expr` to a fixed point.
    pub fn simplify(&self, expr: &Expr) -> Expr {
        Rewriter::new(self, false).run(expr).0
    }

    /// Like [`Simplifier::simplify`], also returning every rule application.
    pub fn simplify_with_steps(&self, expr: &Expr) -> (Expr, Vec<Step>) {
        Rewriter::new(self, true).run(expr)
    }

    /// Rules that may fire on a node of `kind`, most urgent first.
    pub(super) fn candidates(&self, kind: TargetKind) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules
            .get(&kind)
            .into_iter()
            .flatten()
            .chain(self.global_rules.iter())
            .filter(|r| !self.disabled_rules.contains(r.name()))
    }
}
