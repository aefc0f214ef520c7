use crate::number::Number;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Soft value type of a node. An evaluated result outside the node's codomain
/// becomes NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Domain {
    Boolean,
    Integer,
    Rational,
    Real,
    Complex,
    Any,
}

impl Domain {
    /// The five domains that have a special-set representation.
    pub const SPECIAL: [Domain; 5] = [
        Domain::Boolean,
        Domain::Integer,
        Domain::Rational,
        Domain::Real,
        Domain::Complex,
    ];

    /// Whether a numeric value belongs to this domain.
    pub fn admits(self, n: &Number) -> bool {
        if n.is_nan() {
            return matches!(self, Domain::Any);
        }
        match self {
            Domain::Boolean => false,
            Domain::Integer => n.is_integer(),
            Domain::Rational => n.is_rational(),
            Domain::Real => n.is_real(),
            Domain::Complex | Domain::Any => true,
        }
    }

    pub fn admits_boolean(self) -> bool {
        matches!(self, Domain::Boolean | Domain::Any)
    }

    /// Display name of the special set for this domain.
    pub fn set_name(self) -> &'static str {
        match self {
            Domain::Boolean => "BB",
            Domain::Integer => "ZZ",
            Domain::Rational => "QQ",
            Domain::Real => "RR",
            Domain::Complex => "CC",
            Domain::Any => "Any",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.set_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_tower_admission() {
        let half = Number::rational(1, 2);
        assert!(!Domain::Integer.admits(&half));
        assert!(Domain::Rational.admits(&half));
        assert!(Domain::Real.admits(&half));
        assert!(!Domain::Real.admits(&Number::i()));
        assert!(Domain::Complex.admits(&Number::i()));
        assert!(!Domain::Boolean.admits(&Number::one()));
    }
}
