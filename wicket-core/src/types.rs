use std::fmt;
use std::str::FromStr;

/// Column (variable) index.
pub type Col = usize;
/// Row (linear form) index.
pub type Row = usize;

/// Classification of a constraint position `0..n+m` (columns first, then rows).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConstraintType {
    /// `x ≥ 0` (column) or `a·x ≥ 0` (row).
    LowerBound,
    /// No condition.
    Free,
    /// One half of a lifted circuit column; behaves as a lower bound.
    DoubleBounded,
    /// `x = 0` (column) or `a·x = 0` (row).
    Equality,
}

/// Sign condition of an input column.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum VarSign {
    #[default]
    Free,
    NonNegative,
    NonPositive,
    /// Both signs, enumerated as circuits.
    Circuit,
}

impl VarSign {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(VarSign::Free),
            1 => Some(VarSign::NonNegative),
            -1 => Some(VarSign::NonPositive),
            2 => Some(VarSign::Circuit),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            VarSign::Free => 0,
            VarSign::NonNegative => 1,
            VarSign::NonPositive => -1,
            VarSign::Circuit => 2,
        }
    }
}

/// Relation of an input row against zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Relation {
    /// `a·x ≥ 0`.
    Greater,
    /// `a·x ≤ 0`.
    Less,
    /// `a·x = 0`.
    #[default]
    Equal,
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Greater => ">",
            Relation::Less => "<",
            Relation::Equal => "=",
        }
    }
}

impl FromStr for Relation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" | ">=" => Ok(Relation::Greater),
            "<" | "<=" => Ok(Relation::Less),
            "=" | "==" => Ok(Relation::Equal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_symbols_parse() {
        assert_eq!(">=".parse::<Relation>(), Ok(Relation::Greater));
        assert_eq!("<".parse::<Relation>(), Ok(Relation::Less));
        assert_eq!("=".parse::<Relation>(), Ok(Relation::Equal));
        assert!("!".parse::<Relation>().is_err());
    }

    #[test]
    fn sign_codes_are_stable() {
        for sign in [VarSign::Free, VarSign::NonNegative, VarSign::NonPositive, VarSign::Circuit] {
            assert_eq!(VarSign::from_code(sign.code()), Some(sign));
        }
        assert_eq!(VarSign::from_code(3), None);
    }
}
