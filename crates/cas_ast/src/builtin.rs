//! Builtin single-argument functions and named constants.
//!
//! Functions are identified by a closed enum so rules and the inverter can
//! match on them exhaustively instead of comparing names.

use crate::number::Number;
use std::fmt;

/// Single-argument functions that have a dedicated node kind.
///
/// # Ordering
///
/// Variants are grouped:
/// - Trig: sin, cos, tan, cotan, sec, csc
/// - Inverse trig: arcsin, arccos, arctan, arccotan, arcsec, arccsc
/// - Other: abs, signum, factorial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Func {
    Sin = 0,
    Cos,
    Tan,
    Cotan,
    Sec,
    Csc,

    Arcsin,
    Arccos,
    Arctan,
    Arccotan,
    Arcsec,
    Arccsc,

    Abs,
    Signum,
    Factorial,
}

impl Func {
    pub const ALL: [Func; 15] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Cotan,
        Func::Sec,
        Func::Csc,
        Func::Arcsin,
        Func::Arccos,
        Func::Arctan,
        Func::Arccotan,
        Func::Arcsec,
        Func::Arccsc,
        Func::Abs,
        Func::Signum,
        Func::Factorial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cotan => "cotan",
            Func::Sec => "sec",
            Func::Csc => "csc",
            Func::Arcsin => "arcsin",
            Func::Arccos => "arccos",
            Func::Arctan => "arctan",
            Func::Arccotan => "arccotan",
            Func::Arcsec => "arcsec",
            Func::Arccsc => "arccsc",
            Func::Abs => "abs",
            Func::Signum => "sgn",
            Func::Factorial => "factorial",
        }
    }

    pub fn from_name(name: &str) -> Option<Func> {
        Func::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn is_trig(self) -> bool {
        matches!(
            self,
            Func::Sin | Func::Cos | Func::Tan | Func::Cotan | Func::Sec | Func::Csc
        )
    }

    pub fn is_inverse_trig(self) -> bool {
        matches!(
            self,
            Func::Arcsin
                | Func::Arccos
                | Func::Arctan
                | Func::Arccotan
                | Func::Arcsec
                | Func::Arccsc
        )
    }

    /// Evaluate on a number.
    pub fn apply(self, x: &Number) -> Number {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Cotan => x.cotan(),
            Func::Sec => x.sec(),
            Func::Csc => x.csc(),
            Func::Arcsin => x.arcsin(),
            Func::Arccos => x.arccos(),
            Func::Arctan => x.arctan(),
            Func::Arccotan => x.arccotan(),
            Func::Arcsec => x.arcsec(),
            Func::Arccsc => x.arccsc(),
            Func::Abs => x.abs(),
            Func::Signum => x.signum(),
            Func::Factorial => x.factorial(),
        }
    }

    /// Whether `apply` can turn an exact input into an exact output.
    pub fn preserves_exactness(self) -> bool {
        matches!(self, Func::Abs | Func::Signum | Func::Factorial)
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named mathematical constants. They are stored in trees as variables
/// (`pi`, `e`) and only become numbers under full evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn from_name(name: &str) -> Option<Constant> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    pub fn value_f64(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for f in Func::ALL {
            assert_eq!(Func::from_name(f.name()), Some(f));
        }
        assert_eq!(Constant::from_name("pi"), Some(Constant::Pi));
        assert_eq!(Constant::from_name("x"), None);
    }
}
