//! Human-readable tile addresses: row letter followed by 1-based column,
//! e.g. `(0, 1)` is `B1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Coord;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn from_coord(coord: Coord) -> Self {
        Self(format!("{}{}", row_letter(coord.y), coord.x + 1))
    }

    /// Wraps arbitrary text without validating it. Use [`Address::coord`]
    /// to find out whether it names a cell.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn coord(&self) -> Option<Coord> {
        parse(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Coord> for Address {
    fn from(coord: Coord) -> Self {
        Address::from_coord(coord)
    }
}

fn row_letter(y: usize) -> char {
    char::from(b'A'.saturating_add(y.min(25) as u8))
}

/// Parses `<letters><digits>`; anything else yields `None`.
pub fn parse(text: &str) -> Option<Coord> {
    let split = text.find(|c: char| !c.is_ascii_uppercase())?;
    let (letters, digits) = text.split_at(split);
    if letters.len() != 1 || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let column: usize = digits.parse().ok()?;
    if column == 0 {
        return None;
    }
    let y = (letters.as_bytes()[0] - b'A') as usize;
    Some(Coord::new(column - 1, y))
}

/// Street-corner form, e.g. `B St & 3rd`.
pub fn street_address(coord: Coord) -> String {
    let column = coord.x + 1;
    format!("{} St & {}{}", row_letter(coord.y), column, ordinal_suffix(column))
}

fn ordinal_suffix(n: usize) -> &'static str {
    match (n % 10, n % 100) {
        (1, tens) if tens != 11 => "st",
        (2, tens) if tens != 12 => "nd",
        (3, tens) if tens != 13 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_row_letter_and_column() {
        assert_eq!(Address::from_coord(Coord::new(0, 0)).as_str(), "A1");
        assert_eq!(Address::from_coord(Coord::new(2, 1)).as_str(), "B3");
        assert_eq!(Address::from_coord(Coord::new(19, 19)).as_str(), "T20");
    }

    #[test]
    fn parses_back_to_coord() {
        assert_eq!(parse("B3"), Some(Coord::new(2, 1)));
        assert_eq!(parse("T20"), Some(Coord::new(19, 19)));
        assert_eq!(Address::raw("C12").coord(), Some(Coord::new(11, 2)));
    }

    #[test]
    fn malformed_addresses_are_none() {
        for bad in ["", "A", "12", "A0", "a1", "AB1", "A1x", "A-1", "1A", "A 1"] {
            assert_eq!(parse(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn street_address_uses_english_ordinals() {
        assert_eq!(street_address(Coord::new(0, 0)), "A St & 1st");
        assert_eq!(street_address(Coord::new(1, 1)), "B St & 2nd");
        assert_eq!(street_address(Coord::new(2, 2)), "C St & 3rd");
        assert_eq!(street_address(Coord::new(3, 0)), "A St & 4th");
        assert_eq!(street_address(Coord::new(10, 0)), "A St & 11th");
        assert_eq!(street_address(Coord::new(11, 0)), "A St & 12th");
        assert_eq!(street_address(Coord::new(12, 0)), "A St & 13th");
        assert_eq!(street_address(Coord::new(20, 0)), "A St & 21st");
        assert_eq!(street_address(Coord::new(21, 0)), "A St & 22nd");
    }
}
