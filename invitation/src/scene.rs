use std::fmt;
use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

/// A one-based scene number. Only a [`SceneCount`] hands these out, so an
/// index obtained from it is always inside `[1, N]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneIndex(NonZeroU8);

impl SceneIndex {
    pub const FIRST: SceneIndex = SceneIndex(NonZeroU8::MIN);

    pub fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based slot, for indicator arrays and cursor stepping.
    pub fn slot(self) -> usize {
        usize::from(self.0.get()) - 1
    }
}

impl fmt::Display for SceneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneCount(NonZeroU8);

impl SceneCount {
    pub fn new(count: u8) -> Option<Self> {
        NonZeroU8::new(count).map(Self)
    }

    /// Like [`SceneCount::new`], but a zero count becomes a single scene.
    pub fn at_least_one(count: u8) -> Self {
        Self(NonZeroU8::new(count).unwrap_or(NonZeroU8::MIN))
    }

    pub fn get(self) -> u8 {
        self.0.get()
    }

    pub fn len(self) -> usize {
        usize::from(self.0.get())
    }

    pub fn last(self) -> SceneIndex {
        SceneIndex(self.0)
    }

    /// The scene numbered `number`, if it exists.
    pub fn index(self, number: u8) -> Option<SceneIndex> {
        let n = NonZeroU8::new(number)?;
        (n <= self.0).then_some(SceneIndex(n))
    }

    pub fn from_slot(self, slot: usize) -> Option<SceneIndex> {
        u8::try_from(slot + 1).ok().and_then(|n| self.index(n))
    }

    pub fn contains(self, index: SceneIndex) -> bool {
        index.0 <= self.0
    }

    pub fn iter(self) -> impl Iterator<Item = SceneIndex> {
        (1..=self.0.get()).filter_map(NonZeroU8::new).map(SceneIndex)
    }
}

/// Presentation flag handed to the renderer for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneVisual {
    Inactive,
    Active,
    Exiting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_rejects_zero_and_out_of_range_numbers() {
        assert!(SceneCount::new(0).is_none());
        assert_eq!(SceneCount::at_least_one(0).get(), 1);
        let count = SceneCount::new(13).expect("non-zero");
        assert!(count.index(0).is_none());
        assert!(count.index(14).is_none());
        assert_eq!(count.index(13), Some(count.last()));
    }

    #[test]
    fn slots_are_zero_based() {
        let count = SceneCount::new(3).expect("non-zero");
        assert_eq!(SceneIndex::FIRST.slot(), 0);
        assert_eq!(count.from_slot(2).map(SceneIndex::get), Some(3));
        assert_eq!(count.from_slot(3), None);
        assert_eq!(count.iter().map(SceneIndex::get).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn contains_checks_against_this_count() {
        let big = SceneCount::new(20).expect("non-zero");
        let small = SceneCount::new(5).expect("non-zero");
        let fifteen = big.index(15).expect("in range");
        assert!(big.contains(fifteen));
        assert!(!small.contains(fifteen));
    }
}
