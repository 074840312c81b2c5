use serde::{Deserialize, Serialize};

/// Zero-based line and character column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Byte offset of character `column` in `line`, clamped to the line end.
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset() {
        assert_eq!(byte_offset("abc", 1), 1);
        assert_eq!(byte_offset("éa", 1), 2);
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(byte_offset("", 0), 0);
    }

    #[test]
    fn test_ordering() {
        assert!(Position::new(1, 0) > Position::new(0, 9));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }
}
