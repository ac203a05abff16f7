// src/son/types.rs
//! The type lattice attached to every graph node.
//!
//! The skeleton is fixed: `Bot` and `Top` bracket everything, `Ctrl` marks
//! control flow, `Tuple` types multi-valued nodes (Start, If) and the
//! integer sub-lattice is `IntTop` above all integer constants above
//! `IntBot`. `meet` is the greatest lower bound; `compute` implementations
//! must stay monotone over it so the peephole fixed-point terminates.
use std::fmt;

/// The integer sub-lattice: `Top` ⊐ every constant ⊐ `Bot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Int {
    Top,
    Bot,
    Constant(i64),
}

impl Int {
    #[must_use]
    pub const fn meet(self, other: Self) -> Self {
        match (self, other) {
            // Bot wins
            (Self::Bot, _) | (_, Self::Bot) => Self::Bot,
            // Top loses
            (Self::Top, x) | (x, Self::Top) => x,
            (Self::Constant(a), Self::Constant(b)) => {
                if a == b { Self::Constant(a) } else { Self::Bot }
            }
        }
    }

    #[must_use]
    pub const fn is_constant(self) -> bool {
        matches!(self, Self::Constant(_))
    }

    #[must_use]
    pub const fn value(self) -> Option<i64> {
        match self {
            Self::Constant(v) => Some(v),
            _ => None,
        }
    }
}

/// A lattice value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Bottom (⊥): all values, nothing is known.
    Bot,
    /// Top (⊤): no value yet; identity element of `meet`.
    Top,
    /// A control-flow token.
    Ctrl,
    /// One element per slot of a multi-valued node.
    Tuple(Vec<Type>),
    Int(Int),
}

impl Type {
    pub const ZERO: Self = Self::Int(Int::Constant(0));

    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Int(Int::Constant(value))
    }

    /// The `(Ctrl, Ctrl)` tuple produced by an If.
    #[must_use]
    pub fn if_both() -> Self {
        Self::Tuple(vec![Self::Ctrl, Self::Ctrl])
    }

    /// Greatest lower bound. Commutative and associative; `Bot` absorbs,
    /// `Top` is the identity, and mixing unrelated families collapses to
    /// `Bot`.
    #[must_use]
    pub fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            _ if self == other => self.clone(),
            (Self::Top, x) | (x, Self::Top) => x.clone(),
            (Self::Bot, _) | (_, Self::Bot) => Self::Bot,
            (Self::Int(a), Self::Int(b)) => Self::Int(a.meet(*b)),
            (Self::Tuple(a), Self::Tuple(b)) if a.len() == b.len() => {
                Self::Tuple(a.iter().zip(b).map(|(x, y)| x.meet(y)).collect())
            }
            _ => Self::Bot,
        }
    }

    /// True when the value identifies a single lattice element. `Top` counts
    /// as constant; `IntTop` and `IntBot` do not.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        match self {
            Self::Top => true,
            Self::Int(i) => i.is_constant(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<Int> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The integer value, for integer constants only.
    #[must_use]
    pub const fn value(&self) -> Option<i64> {
        match self {
            Self::Int(i) => i.value(),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot => write!(f, "Bot"),
            Self::Top => write!(f, "Top"),
            Self::Ctrl => write!(f, "Ctrl"),
            Self::Int(Int::Top) => write!(f, "IntTop"),
            Self::Int(Int::Bot) => write!(f, "IntBot"),
            Self::Int(Int::Constant(v)) => write!(f, "{v}"),
            Self::Tuple(types) => {
                write!(f, "[")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, "]")
            }
        }
    }
}
