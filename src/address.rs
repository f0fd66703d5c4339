// the (column, row) <-> "A1"-style label codec

use std::fmt;

/// an address that failed to parse or fell outside a table's bounds
#[derive(Debug, PartialEq, Clone)]
pub enum AddressError {
    /// identifier does not match `[A-Z]+[0-9]+` once the optional `cell-`
    /// prefix and reserved-variable names are ruled out
    Syntax(String),
    /// column or row exceeded the table's bounds
    OutOfRange { column: usize, row: usize },
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Syntax(s) => {
                write!(f, "'{s}' is not a valid cell address, expected e.g. A4")
            }
            AddressError::OutOfRange { column, row } => write!(
                f,
                "address {}{} is out of range",
                column_label(*column),
                row
            ),
        }
    }
}

impl std::error::Error for AddressError {}

/// bijective base-26 conversion: `A`=0, `Z`=25, `AA`=26, ...
pub fn column_label(mut n: usize) -> String {
    let mut result = Vec::new();
    loop {
        let remainder = n % 26;
        result.push((b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result.iter().rev().collect()
}

/// inverse of [`column_label`]
pub fn column_number(label: &str) -> usize {
    let mut r: i64 = 0;
    for c in label.chars() {
        r = r * 26 + (c as i64 - 'A' as i64 + 1);
    }
    (r - 1) as usize
}

/// strip an optional `cell-` prefix, match `[A-Z]+[0-9]+`, decode, and bound
/// against `max_column`/`max_row`.
///
/// Argument order is `(text, max_column, max_row)`: the column label is
/// bounded by `max_column`, the row integer by `max_row`.
pub fn parse_cell_id(
    text: &str,
    max_column: usize,
    max_row: usize,
) -> Result<(usize, usize), AddressError> {
    let text = text.strip_prefix("cell-").unwrap_or(text);

    let split_at = text.find(|c: char| !c.is_ascii_uppercase());
    let (label, digits) = match split_at {
        Some(idx) if idx > 0 => text.split_at(idx),
        _ => return Err(AddressError::Syntax(text.to_string())),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AddressError::Syntax(text.to_string()));
    }

    let row: usize = digits
        .parse()
        .map_err(|_| AddressError::Syntax(text.to_string()))?;
    let column = column_number(label);

    if row > max_row || column > max_column {
        return Err(AddressError::OutOfRange { column, row });
    }
    Ok((column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_label_round_trip() {
        for n in 0..100_000usize {
            assert_eq!(column_number(&column_label(n)), n);
        }
    }

    #[test]
    fn known_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
    }

    #[test]
    fn parses_cell_prefix_and_bounds() {
        assert_eq!(parse_cell_id("cell-A4", 9, 9), Ok((0, 4)));
        assert_eq!(parse_cell_id("A4", 9, 9), Ok((0, 4)));
        assert!(matches!(
            parse_cell_id("A99", 9, 9),
            Err(AddressError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_cell_id("4A", 9, 9),
            Err(AddressError::Syntax(_))
        ));
    }

    #[test]
    fn column_bound_checked_independently_of_row() {
        // AA (column 26) exceeds max_column=9 even though the row is in range
        assert!(matches!(
            parse_cell_id("AA1", 9, 9),
            Err(AddressError::OutOfRange { .. })
        ));
    }
}
