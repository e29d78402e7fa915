//! Private Use Area allocation for shaping-needed clusters.

use std::collections::HashMap;

use thiserror::Error;

/// First synthetic codepoint handed out.
pub const PUA_FIRST: u32 = 0xE000;

/// Last usable synthetic codepoint (inclusive); 6,400 slots in total.
pub const PUA_LAST: u32 = 0xF8FF;

/// Errors produced by [`PuaAllocator`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuaError {
    /// Every slot in the Private Use Area range is taken.
    #[error("PUA capacity exceeded: more than {} distinct clusters", PUA_LAST - PUA_FIRST + 1)]
    CapacityExceeded,
}

/// Append-only bijective mapping from cluster text to PUA codepoints.
///
/// One allocator owns the mapping for a language's entire corpus and
/// lives for exactly one compilation run; it is passed by reference to
/// whoever needs the table (the rasterizer, the map writer). Allocation
/// order is first-encounter order over the caller's corpus scan, which
/// makes the table deterministic for a fixed corpus and scan order.
#[derive(Debug, Default)]
pub struct PuaAllocator {
    by_text: HashMap<String, char>,
    // (codepoint, cluster text) in allocation order.
    entries: Vec<(char, String)>,
}

impl PuaAllocator {
    /// Empty allocator; the next interned cluster gets U+E000.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator seeded from a previously persisted mapping, so re-runs
    /// against a grown or reordered corpus never reassign an existing
    /// cluster to a different codepoint.
    ///
    /// Entries must be the exact (codepoint, text) pairs written by a
    /// prior run; pairs outside the PUA range or with duplicate text
    /// are skipped with a warning. New allocations continue after the
    /// highest seeded codepoint.
    pub fn with_entries(seed: impl IntoIterator<Item = (char, String)>) -> Self {
        let mut alloc = Self::new();
        for (cp, text) in seed {
            let code = cp as u32;
            if !(PUA_FIRST..=PUA_LAST).contains(&code) {
                log::warn!("ignoring seed entry U+{code:04X} outside the PUA range");
                continue;
            }
            if alloc.by_text.contains_key(&text) {
                log::warn!("ignoring duplicate seed entry for cluster {text:?}");
                continue;
            }
            alloc.by_text.insert(text.clone(), cp);
            alloc.entries.push((cp, text));
        }
        // Keep allocation order = codepoint order for seeded tables.
        alloc.entries.sort_by_key(|(cp, _)| *cp as u32);
        alloc
    }

    /// Return the codepoint for `cluster_text`, minting the next free
    /// one on first encounter.
    ///
    /// Injective by construction: distinct texts get distinct
    /// codepoints, and repeated calls with the same text always return
    /// the same codepoint within one run.
    pub fn intern(&mut self, cluster_text: &str) -> Result<char, PuaError> {
        if let Some(&cp) = self.by_text.get(cluster_text) {
            return Ok(cp);
        }
        let next = self
            .entries
            .last()
            .map(|(cp, _)| *cp as u32 + 1)
            .unwrap_or(PUA_FIRST);
        if next > PUA_LAST {
            return Err(PuaError::CapacityExceeded);
        }
        // All of E000..=F8FF are valid scalars.
        let cp = char::from_u32(next).ok_or(PuaError::CapacityExceeded)?;
        self.by_text.insert(cluster_text.to_string(), cp);
        self.entries.push((cp, cluster_text.to_string()));
        log::debug!("allocated U+{next:04X} for cluster {cluster_text:?}");
        Ok(cp)
    }

    /// Look up an existing assignment without allocating.
    pub fn get(&self, cluster_text: &str) -> Option<char> {
        self.by_text.get(cluster_text).copied()
    }

    /// Reverse lookup: the cluster text a codepoint was assigned to.
    pub fn text_for(&self, codepoint: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(cp, _)| *cp == codepoint)
            .map(|(_, text)| text.as_str())
    }

    /// All assignments in allocation (= codepoint) order.
    pub fn entries(&self) -> &[(char, String)] {
        &self.entries
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_encounter_order_starting_at_e000() {
        let mut alloc = PuaAllocator::new();
        assert_eq!(alloc.intern("क्ष").unwrap(), '\u{E000}');
        assert_eq!(alloc.intern("त्र").unwrap(), '\u{E001}');
        assert_eq!(alloc.intern("ज्ञ").unwrap(), '\u{E002}');
    }

    #[test]
    fn repeated_interning_is_stable() {
        let mut alloc = PuaAllocator::new();
        let a = alloc.intern("क्ष").unwrap();
        let b = alloc.intern("त्र").unwrap();
        assert_eq!(alloc.intern("क्ष").unwrap(), a);
        assert_eq!(alloc.intern("त्र").unwrap(), b);
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn injective_over_many_clusters() {
        let mut alloc = PuaAllocator::new();
        let mut seen = std::collections::HashSet::new();
        for i in 0..100 {
            let cp = alloc.intern(&format!("cluster-{i}")).unwrap();
            assert!(seen.insert(cp), "codepoint reused");
            assert!((PUA_FIRST..=PUA_LAST).contains(&(cp as u32)));
        }
        // Range property: strictly first-encounter, no gaps.
        assert_eq!(
            alloc.entries().last().map(|(cp, _)| *cp as u32),
            Some(PUA_FIRST + 99)
        );
    }

    #[test]
    fn capacity_exceeded_past_last_slot() {
        // Seed with the final slot taken, so the next mint must fail.
        let seed = vec![(char::from_u32(PUA_LAST).unwrap(), "last".to_string())];
        let mut alloc = PuaAllocator::with_entries(seed);
        assert_eq!(alloc.intern("last").unwrap() as u32, PUA_LAST);
        assert_eq!(alloc.intern("overflow"), Err(PuaError::CapacityExceeded));
    }

    #[test]
    fn seeded_entries_are_preserved() {
        let seed = vec![
            ('\u{E000}', "क्ष".to_string()),
            ('\u{E001}', "त्र".to_string()),
        ];
        let mut alloc = PuaAllocator::with_entries(seed);
        // Existing clusters keep their slots even when encountered in a
        // different order.
        assert_eq!(alloc.intern("त्र").unwrap(), '\u{E001}');
        assert_eq!(alloc.intern("क्ष").unwrap(), '\u{E000}');
        // New clusters continue after the seed.
        assert_eq!(alloc.intern("द्ध").unwrap(), '\u{E002}');
    }

    #[test]
    fn seed_entries_outside_range_are_skipped() {
        let seed = vec![('A', "bogus".to_string()), ('\u{E005}', "ok".to_string())];
        let alloc = PuaAllocator::with_entries(seed);
        assert_eq!(alloc.len(), 1);
        assert_eq!(alloc.get("ok"), Some('\u{E005}'));
        assert_eq!(alloc.get("bogus"), None);
    }
}
