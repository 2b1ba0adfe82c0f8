use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandChange {
    pub item: usize,
    pub expanded: bool,
}

/// A single-select toggle group: at most one item is expanded at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandGroup {
    len: usize,
    expanded: Option<usize>,
}

impl ExpandGroup {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            expanded: None,
        }
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Toggles `item`, collapsing whichever other item was open.
    pub fn toggle(&mut self, item: usize) -> Vec<ExpandChange> {
        if item >= self.len {
            return Vec::new();
        }
        match self.expanded {
            Some(open) if open == item => {
                self.expanded = None;
                vec![ExpandChange {
                    item,
                    expanded: false,
                }]
            }
            previous => {
                self.expanded = Some(item);
                previous
                    .map(|other| ExpandChange {
                        item: other,
                        expanded: false,
                    })
                    .into_iter()
                    .chain([ExpandChange {
                        item,
                        expanded: true,
                    }])
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_one_closes_the_other() {
        let mut group = ExpandGroup::new(3);
        assert_eq!(
            group.toggle(0),
            vec![ExpandChange {
                item: 0,
                expanded: true
            }]
        );
        assert_eq!(
            group.toggle(2),
            vec![
                ExpandChange {
                    item: 0,
                    expanded: false
                },
                ExpandChange {
                    item: 2,
                    expanded: true
                }
            ]
        );
        assert_eq!(group.expanded(), Some(2));
    }

    #[test]
    fn toggling_the_open_item_collapses_it() {
        let mut group = ExpandGroup::new(2);
        group.toggle(1);
        group.toggle(1);
        assert_eq!(group.expanded(), None);
    }

    #[test]
    fn unknown_item_is_ignored() {
        let mut group = ExpandGroup::new(2);
        assert!(group.toggle(5).is_empty());
    }
}
