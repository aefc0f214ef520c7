//! Thread-scoped numeric and solver settings.
//!
//! Settings are never mutated globally. A caller installs a modified copy for
//! the duration of a scope and the returned guard restores the previous value
//! on drop, so nested solves may tighten or loosen tolerances locally:
//!
//! ```
//! use cas_ast::settings::{self, Settings};
//!
//! let _guard = Settings::scoped(|s| s.zero_error_tolerance = 1e-7);
//! assert_eq!(settings::current().zero_error_tolerance, 1e-7);
//! ```

use std::cell::RefCell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search grid for the numeric root finder.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewtonSettings {
    /// Lower-left corner of the complex search rectangle (re, im)
    pub from: (f64, f64),
    /// Upper-right corner of the complex search rectangle (re, im)
    pub to: (f64, f64),
    /// Number of starting points along the real and imaginary axes
    pub step_count: (u32, u32),
    /// Newton iterations per starting point
    pub iterations: u32,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            from: (-10.0, -10.0),
            to: (10.0, 10.0),
            step_count: (10, 10),
            iterations: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    pub allow_newton_fallback: bool,
    /// Continued-fraction budget when turning a float into a rational
    pub float_to_rational_iterations: u32,
    /// Largest numerator/denominator a float may be rationalized into
    pub max_rational_component: f64,
    /// Absolute distance under which a float counts as exactly zero
    pub zero_error_tolerance: f64,
    /// Tolerance for Newton convergence and numeric comparisons
    pub precision_error_common: f64,
    /// Significant digits kept for real values. Values >= 17 leave f64 untouched.
    pub decimal_precision: u32,
    /// Turn floats into rationals whenever the continued fraction is short
    pub downcasting_enabled: bool,
    pub newton: NewtonSettings,
    /// Cap on the number of terms produced by polynomial expansion
    pub max_expansion_terms: usize,
    /// Fixed-point pass cap for the simplifier
    pub max_simplify_iterations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_newton_fallback: true,
            float_to_rational_iterations: 15,
            max_rational_component: 1e6,
            zero_error_tolerance: 1e-15,
            precision_error_common: 1e-6,
            decimal_precision: 100,
            downcasting_enabled: true,
            newton: NewtonSettings::default(),
            max_expansion_terms: 2000,
            max_simplify_iterations: 64,
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<Settings> = RefCell::new(Settings::default());
}

/// Snapshot of the settings active on this thread.
pub fn current() -> Settings {
    ACTIVE.with(|s| *s.borrow())
}

/// Run `f` against the active settings without copying them out.
pub fn with<R>(f: impl FnOnce(&Settings) -> R) -> R {
    ACTIVE.with(|s| f(&s.borrow()))
}

impl Settings {
    /// Install `self` as the active settings until the guard drops.
    pub fn install(self) -> SettingsGuard {
        let previous = ACTIVE.with(|s| std::mem::replace(&mut *s.borrow_mut(), self));
        SettingsGuard { previous }
    }

    /// Install a modified copy of the currently active settings.
    pub fn scoped(edit: impl FnOnce(&mut Settings)) -> SettingsGuard {
        let mut next = current();
        edit(&mut next);
        next.install()
    }
}

/// RAII guard restoring the settings that were active before a scope began.
///
/// Guards must be dropped in reverse order of creation; nesting them as
/// ordinary locals does exactly that.
#[must_use = "settings revert as soon as the guard is dropped"]
pub struct SettingsGuard {
    previous: Settings,
}

impl Drop for SettingsGuard {
    fn drop(&mut self) {
        ACTIVE.with(|s| *s.borrow_mut() = self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_restores_previous_value() {
        let before = current();
        {
            let _g = Settings::scoped(|s| s.float_to_rational_iterations = 20);
            assert_eq!(current().float_to_rational_iterations, 20);
            {
                let _inner = Settings::scoped(|s| s.allow_newton_fallback = false);
                assert!(!current().allow_newton_fallback);
                assert_eq!(current().float_to_rational_iterations, 20);
            }
            assert!(current().allow_newton_fallback);
        }
        assert_eq!(current(), before);
    }

    #[test]
    fn settings_are_thread_local() {
        let _g = Settings::scoped(|s| s.decimal_precision = 5);
        let other = std::thread::spawn(|| current().decimal_precision)
            .join()
            .unwrap();
        assert_eq!(other, 100);
        assert_eq!(current().decimal_precision, 5);
    }
}
