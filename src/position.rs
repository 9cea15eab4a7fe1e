//! Pane position parsing.
//!
//! A pane's place in a tab is addressed by a three-level triple:
//! `column/row/column-in-row`. Omitted trailing components default to 1, so
//! `"2"` means `2/1/1` and `"2/3"` means `2/3/1`.

use std::fmt;

use crate::error::{Result, TermweaveError};

/// A normalized `(column, row, slot)` pane address.
///
/// `slot` is the column-in-row component. All components are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub column: u32,
    pub row: u32,
    pub slot: u32,
}

impl Position {
    pub fn new(column: u32, row: u32, slot: u32) -> Self {
        Self { column, row, slot }
    }

    /// Parse a position string into its normalized triple.
    ///
    /// # Examples
    ///
    /// ```
    /// use termweave::position::Position;
    ///
    /// assert_eq!(Position::parse("2").unwrap(), Position::new(2, 1, 1));
    /// assert_eq!(Position::parse("2/3").unwrap(), Position::new(2, 3, 1));
    /// assert_eq!(Position::parse("2/3/4").unwrap(), Position::new(2, 3, 4));
    /// assert!(Position::parse("a/b").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TermweaveError::InvalidPosition`] for anything other than
    /// 1-3 `/`-separated positive integers.
    pub fn parse(position: &str) -> Result<Self> {
        let invalid = || TermweaveError::InvalidPosition(position.to_string());

        let parts: Vec<&str> = position.split('/').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut components = [1u32; 3];
        for (i, part) in parts.iter().enumerate() {
            let n: u32 = part.trim().parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            components[i] = n;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.column, self.row, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_defaults_row_and_slot() {
        assert_eq!(Position::parse("2").unwrap(), Position::new(2, 1, 1));
    }

    #[test]
    fn two_tokens_default_slot() {
        assert_eq!(Position::parse("2/3").unwrap(), Position::new(2, 3, 1));
    }

    #[test]
    fn three_tokens() {
        assert_eq!(Position::parse("2/3/4").unwrap(), Position::new(2, 3, 4));
    }

    #[test]
    fn empty_string_fails() {
        assert!(matches!(
            Position::parse(""),
            Err(TermweaveError::InvalidPosition(_))
        ));
    }

    #[test]
    fn non_integer_tokens_fail() {
        assert!(Position::parse("a/b").is_err());
        assert!(Position::parse("1/x").is_err());
    }

    #[test]
    fn too_many_tokens_fail() {
        assert!(Position::parse("1/2/3/4").is_err());
    }

    #[test]
    fn zero_component_fails() {
        assert!(Position::parse("0/1").is_err());
    }

    #[test]
    fn display_round_trips() {
        let p = Position::parse("2/3").unwrap();
        assert_eq!(p.to_string(), "2/3/1");
        assert_eq!(Position::parse(&p.to_string()).unwrap(), p);
    }
}
