//! Character-class set table.
//!
//! Classes are stored as normalised lists of inclusive character ranges and
//! interned, so equal classes written in different ways (`[a-cb]`, `[abc]`)
//! share one index. `CharClass` and `CharClassComplement` instructions refer
//! to classes by that index.

use indexmap::IndexSet;

/// An inclusive character range.
pub type CharRange = (char, char);

#[derive(Debug, Default)]
pub struct CharClassTable {
    sets: IndexSet<Vec<CharRange>>,
}

impl CharClassTable {
    pub fn new() -> Self {
        Self {
            sets: IndexSet::new(),
        }
    }

    /// Interns the class made of `ranges` and returns its index.
    ///
    /// Reversed ranges are swapped; overlapping and adjacent ranges are
    /// merged before lookup.
    pub fn insert(&mut self, ranges: impl IntoIterator<Item = CharRange>) -> usize {
        let (index, _) = self.sets.insert_full(normalize(ranges));
        index
    }

    pub fn get(&self, index: usize) -> Option<&[CharRange]> {
        self.sets.get_index(index).map(Vec::as_slice)
    }

    /// Tests whether `c` belongs to the class at `index`.
    pub fn contains(&self, index: usize, c: char) -> bool {
        self.get(index)
            .is_some_and(|ranges| ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

fn normalize(ranges: impl IntoIterator<Item = CharRange>) -> Vec<CharRange> {
    let mut v: Vec<CharRange> = ranges
        .into_iter()
        .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
        .collect();
    v.sort_unstable();
    let mut out: Vec<CharRange> = Vec::with_capacity(v.len());
    for (lo, hi) in v {
        match out.last_mut() {
            Some(last) if (lo as u32) <= (last.1 as u32).saturating_add(1) => {
                if hi > last.1 {
                    last.1 = hi;
                }
            }
            _ => out.push((lo, hi)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_classes_share_an_index() {
        let mut t = CharClassTable::new();
        let a = t.insert([('a', 'c'), ('b', 'b')]);
        let b = t.insert([('a', 'a'), ('b', 'b'), ('c', 'c')]);
        assert_eq!(a, b);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(a), Some(&[('a', 'c')][..]));
    }

    #[test]
    fn distinct_classes_get_distinct_indices() {
        let mut t = CharClassTable::new();
        let digits = t.insert([('0', '9')]);
        let letters = t.insert([('a', 'z'), ('A', 'Z')]);
        assert_ne!(digits, letters);
        assert_eq!(t.get(letters), Some(&[('A', 'Z'), ('a', 'z')][..]));
    }

    #[test]
    fn reversed_ranges_are_swapped() {
        let mut t = CharClassTable::new();
        let i = t.insert([('z', 'x')]);
        assert_eq!(t.get(i), Some(&[('x', 'z')][..]));
    }

    #[test]
    fn membership() {
        let mut t = CharClassTable::new();
        let i = t.insert([('0', '9'), ('_', '_')]);
        assert!(t.contains(i, '5'));
        assert!(t.contains(i, '_'));
        assert!(!t.contains(i, 'a'));
        assert!(!t.contains(i + 1, '5'));
    }
}
