//! Server version parsing and comparison.

use std::cmp::Ordering;
use std::fmt;

/// Dotted server version, e.g. `10.9`, `2025.1.0.12345` or
/// `25.1-SNAPSHOT`. Anything after the first `-` is a qualifier and is
/// ignored for comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    name: String,
    parts: Vec<u64>,
}

impl Version {
    pub fn parse(value: &str) -> Self {
        let base = value.split('-').next().unwrap_or_default();
        let parts = base
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect();
        Self {
            name: value.to_string(),
            parts,
        }
    }

    /// True when this version is greater than or equal to `min`.
    /// Missing segments compare as zero, so `10.9` equals `10.9.0`.
    pub fn satisfies_min_requirement(&self, min: &Version) -> bool {
        self.compare_parts(min) != Ordering::Less
    }

    fn compare_parts(&self, other: &Version) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
