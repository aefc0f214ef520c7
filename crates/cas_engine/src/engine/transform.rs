//! Rewrite engine core: the bottom-up pass and the fixed-point driver.
//!
//! A pass walks the tree with [`Expr::replace`], which rebuilds a parent only
//! when one of its children changed. At every node the first applicable rule
//! fires, then the rules are retried on the result until none applies. Passes
//! repeat until one returns its input by identity.

use super::simplifier::Simplifier;
use crate::step::Step;
use cas_ast::{settings, Expr, TargetKind};

use tracing::{debug, warn};

/// Rewrites allowed at a single node within one pass. Anything still firing
/// after this many is left for the next pass.
const MAX_LOCAL_REWRITES: usize = 32;

pub(super) struct Rewriter<'a> {
    simplifier: &'a Simplifier,
    steps: Option<Vec<Step>>,
}

impl<'a> Rewriter<'a> {
    pub(super) fn new(simplifier: &'a Simplifier, collect_steps: bool) -> Self {
        Self {
            simplifier,
            steps: collect_steps.then(Vec::new),
        }
    }

    pub(super) fn run(mut self, expr: &Expr) -> (Expr, Vec<Step>) {
        let max_passes = settings::current().max_simplify_iterations;
        let mut current = expr.clone();

        for pass in 0..max_passes {
            let next = current.replace(|node| self.rewrite_node(node));
            if next.ptr_eq(&current) || next == current {
                debug!(passes = pass + 1, "simplify reached a fixed point");
                return (current, self.steps.unwrap_or_default());
            }
            current = next;
        }

        warn!(
            max_passes,
            expr = %current,
            "simplify hit the pass cap before reaching a fixed point"
        );
        (current, self.steps.unwrap_or_default())
    }

    fn rewrite_node(&mut self, node: &Expr) -> Expr {
        let simplifier = self.simplifier;
        let mut current = node.clone();
        'rewrites: for _ in 0..MAX_LOCAL_REWRITES {
            for rule in simplifier.candidates(TargetKind::from_expr(&current)) {
                let Some(rewrite) = rule.apply(&current) else {
                    continue;
                };
                if rewrite.new_expr == current {
                    continue;
                }
                debug!(
                    rule = rule.name(),
                    before = %current,
                    after = %rewrite.new_expr,
                    "rule fired"
                );
                if let Some(steps) = self.steps.as_mut() {
                    steps.push(Step::new(
                        &rewrite.description,
                        rule.name(),
                        current.clone(),
                        rewrite.new_expr.clone(),
                    ));
                }
                current = rewrite.new_expr;
                continue 'rewrites;
            }
            break;
        }
        current
    }
}
