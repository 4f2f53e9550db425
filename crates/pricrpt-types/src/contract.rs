//! Futures contract month codes.

use serde::{Deserialize, Serialize};

/// One of the twelve canonical futures month letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonthCode {
    /// January.
    F,
    /// February.
    G,
    /// March.
    H,
    /// April.
    J,
    /// May.
    K,
    /// June.
    M,
    /// July.
    N,
    /// August.
    Q,
    /// September.
    U,
    /// October.
    V,
    /// November.
    X,
    /// December.
    Z,
}

impl MonthCode {
    /// Parses a month letter (uppercase only).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'H' => Some(Self::H),
            'J' => Some(Self::J),
            'K' => Some(Self::K),
            'M' => Some(Self::M),
            'N' => Some(Self::N),
            'Q' => Some(Self::Q),
            'U' => Some(Self::U),
            'V' => Some(Self::V),
            'X' => Some(Self::X),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }

    /// Returns the code for a month number (1-12).
    #[must_use]
    pub const fn from_month(month: u32) -> Option<Self> {
        match month {
            1 => Some(Self::F),
            2 => Some(Self::G),
            3 => Some(Self::H),
            4 => Some(Self::J),
            5 => Some(Self::K),
            6 => Some(Self::M),
            7 => Some(Self::N),
            8 => Some(Self::Q),
            9 => Some(Self::U),
            10 => Some(Self::V),
            11 => Some(Self::X),
            12 => Some(Self::Z),
            _ => None,
        }
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        match self {
            Self::F => 1,
            Self::G => 2,
            Self::H => 3,
            Self::J => 4,
            Self::K => 5,
            Self::M => 6,
            Self::N => 7,
            Self::Q => 8,
            Self::U => 9,
            Self::V => 10,
            Self::X => 11,
            Self::Z => 12,
        }
    }

    /// Returns the month letter.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
            Self::J => 'J',
            Self::K => 'K',
            Self::M => 'M',
            Self::N => 'N',
            Self::Q => 'Q',
            Self::U => 'U',
            Self::V => 'V',
            Self::X => 'X',
            Self::Z => 'Z',
        }
    }
}

impl std::fmt::Display for MonthCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
