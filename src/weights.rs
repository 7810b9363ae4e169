//! Pattern weight table.
//!
//! Maps every 3x3 pattern code (see [`crate::patterns`]) to an empirical
//! move-quality weight. The table is loaded once at startup from a text file
//! of `<code> <weight>` records, one per line, and is read-only afterwards.
//! Engines share it through an `Rc`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::PATTERN_CODES;

/// Errors raised while loading or querying a weight table.
#[derive(Debug, Error)]
pub enum WeightError {
    #[error("failed to read weights: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: pattern code {code} is outside the pattern code space")]
    CodeOutOfRange { line: usize, code: u64 },

    #[error("line {line}: invalid weight {weight}")]
    InvalidWeight { line: usize, weight: f64 },

    /// A pattern code with no entry was looked up. The table is expected to
    /// cover the whole code space, so this means the data file is incomplete.
    #[error("no weight for pattern code {0}")]
    MissingPattern(u32),
}

/// Immutable mapping from pattern code to weight.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: Vec<Option<f64>>,
    len: usize,
}

impl WeightTable {
    /// A table giving every pattern the same weight.
    pub fn uniform(weight: f64) -> Self {
        Self {
            weights: vec![Some(weight); PATTERN_CODES],
            len: PATTERN_CODES,
        }
    }

    /// Build a table from `(code, weight)` pairs. Later pairs override
    /// earlier ones for the same code.
    pub fn from_entries<I>(entries: I) -> Result<Self, WeightError>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut table = Self {
            weights: vec![None; PATTERN_CODES],
            len: 0,
        };
        for (i, (code, weight)) in entries.into_iter().enumerate() {
            table.insert(i + 1, code as u64, weight)?;
        }
        Ok(table)
    }

    /// Load a table from a weights file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WeightError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse `<code> <weight>` records until end of input.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, WeightError> {
        let mut table = Self {
            weights: vec![None; PATTERN_CODES],
            len: 0,
        };

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let [code, weight] = fields[..] else {
                return Err(WeightError::Parse {
                    line: lineno,
                    message: format!("expected 2 fields, got {}", fields.len()),
                });
            };
            let code: u64 = code.parse().map_err(|_| WeightError::Parse {
                line: lineno,
                message: format!("invalid pattern code '{code}'"),
            })?;
            let weight: f64 = weight.parse().map_err(|_| WeightError::Parse {
                line: lineno,
                message: format!("invalid weight '{weight}'"),
            })?;
            table.insert(lineno, code, weight)?;
        }

        Ok(table)
    }

    fn insert(&mut self, line: usize, code: u64, weight: f64) -> Result<(), WeightError> {
        if code >= PATTERN_CODES as u64 {
            return Err(WeightError::CodeOutOfRange { line, code });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(WeightError::InvalidWeight { line, weight });
        }
        let slot = &mut self.weights[code as usize];
        if slot.is_none() {
            self.len += 1;
        }
        *slot = Some(weight);
        Ok(())
    }

    /// Weight of a pattern code.
    #[inline]
    pub fn lookup(&self, code: u32) -> Result<f64, WeightError> {
        self.weights
            .get(code as usize)
            .copied()
            .flatten()
            .ok_or(WeightError::MissingPattern(code))
    }

    /// Number of codes with an entry.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every pattern code has an entry.
    pub fn is_complete(&self) -> bool {
        self.len == PATTERN_CODES
    }
}

impl FromStr for WeightTable {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_roundtrip() {
        let table: WeightTable = "42 0.75\n".parse().unwrap();
        assert_eq!(table.lookup(42).unwrap(), 0.75);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_pattern() {
        let table: WeightTable = "0 1.0\n".parse().unwrap();
        assert!(matches!(table.lookup(7), Err(WeightError::MissingPattern(7))));
        assert!(!table.is_complete());
    }

    #[test]
    fn test_zero_weight_is_not_missing() {
        let table: WeightTable = "5 0\n".parse().unwrap();
        assert_eq!(table.lookup(5).unwrap(), 0.0);
    }

    #[test]
    fn test_blank_lines_and_duplicates() {
        let table: WeightTable = "1 2.0\n\n   \n1 3.5\n2 1e-3\n".parse().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(1).unwrap(), 3.5);
        assert_eq!(table.lookup(2).unwrap(), 0.001);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = "1 2.0\n2 abc\n".parse::<WeightTable>().unwrap_err();
        assert!(matches!(err, WeightError::Parse { line: 2, .. }), "{err}");

        let err = "1 2.0 3.0\n".parse::<WeightTable>().unwrap_err();
        assert!(matches!(err, WeightError::Parse { line: 1, .. }), "{err}");

        let err = "65536 1.0\n".parse::<WeightTable>().unwrap_err();
        assert!(matches!(err, WeightError::CodeOutOfRange { line: 1, code: 65536 }));

        let err = "\n3 -1.0\n".parse::<WeightTable>().unwrap_err();
        assert!(matches!(err, WeightError::InvalidWeight { line: 2, .. }));
    }

    #[test]
    fn test_uniform_is_complete() {
        let table = WeightTable::uniform(1.0);
        assert!(table.is_complete());
        assert_eq!(table.lookup((PATTERN_CODES - 1) as u32).unwrap(), 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0.5").unwrap();
        writeln!(file, "42 0.75").unwrap();
        let table = WeightTable::load(file.path()).unwrap();
        assert_eq!(table.lookup(42).unwrap(), 0.75);
        assert_eq!(table.lookup(0).unwrap(), 0.5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = WeightTable::load("/nonexistent/weights.txt").unwrap_err();
        assert!(matches!(err, WeightError::Io(_)));
    }
}
