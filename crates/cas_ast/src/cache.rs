//! Process-wide memoization caches.
//!
//! Each cache is created on first use and never invalidated. Lookups take the
//! read lock; a miss drops it, takes the write lock and checks again before
//! inserting, so concurrent first callers never populate an entry twice.
//! A poisoned lock is recovered rather than propagated: every cached value is
//! written in a single assignment and cannot be observed half-built.

use crate::builtin::Constant;
use crate::expression::Expr;
use crate::number::Number;
use crate::Domain;
use num_bigint::BigInt;
use num_traits::One;
use rustc_hash::FxHashMap;
use std::sync::{LazyLock, PoisonError, RwLock};
use tracing::trace;

/// Largest `n` for which `n!` is computed exactly.
pub const MAX_FACTORIAL: u32 = 2000;

static FACTORIALS: LazyLock<RwLock<Vec<BigInt>>> =
    LazyLock::new(|| RwLock::new(vec![BigInt::one()]));

static CONSTANTS: LazyLock<RwLock<FxHashMap<(Constant, u32), Number>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

static SPECIAL_SETS: LazyLock<RwLock<FxHashMap<Domain, Expr>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// `n!`, extending the shared table as needed.
pub fn factorial(n: u32) -> BigInt {
    let idx = n.min(MAX_FACTORIAL) as usize;
    {
        let table = FACTORIALS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(v) = table.get(idx) {
            return v.clone();
        }
    }
    let mut table = FACTORIALS.write().unwrap_or_else(PoisonError::into_inner);
    if table.len() <= idx {
        trace!(from = table.len(), to = idx, "extending factorial table");
    }
    while table.len() <= idx {
        let k = table.len();
        let next = &table[k - 1] * BigInt::from(k);
        table.push(next);
    }
    table[idx].clone()
}

/// Value of a named constant at the given decimal precision.
pub fn constant(c: Constant, precision: u32) -> Number {
    let key = (c, precision.min(17));
    {
        let map = CONSTANTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(v) = map.get(&key) {
            return v.clone();
        }
    }
    let mut map = CONSTANTS.write().unwrap_or_else(PoisonError::into_inner);
    map.entry(key)
        .or_insert_with(|| Number::float(c.value_f64()))
        .clone()
}

/// The singleton special set for a domain (`Reals`, `Integers`, ...).
pub fn special_set(domain: Domain) -> Expr {
    {
        let map = SPECIAL_SETS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(v) = map.get(&domain) {
            return v.clone();
        }
    }
    let mut map = SPECIAL_SETS.write().unwrap_or_else(PoisonError::into_inner);
    map.entry(domain)
        .or_insert_with(|| Expr::new_special_set(domain))
        .clone()
}
