use std::collections::BTreeMap;

/// Values keyed by the event index they took effect at.
#[derive(Debug, Clone)]
pub struct History<T: PartialEq>(BTreeMap<u32, T>);

impl<T: PartialEq> History<T> {
    pub fn new() -> History<T> {
        History(BTreeMap::new())
    }

    /// The value in force at `index`: the latest one inserted at or before it.
    pub fn get(&self, index: u32) -> Option<&T> {
        self.0.range(..=index).next_back().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<&T> {
        self.0.values().next()
    }

    pub fn insert(&mut self, index: u32, value: T) -> Option<T> {
        self.0.insert(index, value)
    }

    /// Drops entries that repeat the value before them, e.g. a tactical shift that swaps players
    /// but keeps the formation.
    pub fn dedup(&mut self) {
        let mut prev = None;
        let mut remove = Vec::new();
        for (k, v) in &self.0 {
            if Some(v) == prev {
                remove.push(*k);
            } else {
                prev = Some(v)
            }
        }
        for k in remove {
            self.0.remove(&k);
        }
    }
}

impl<T: PartialEq> Default for History<T> {
    fn default() -> History<T> {
        History::new()
    }
}

#[cfg(test)]
mod tests {
    use super::History;
    use maplit::btreemap;

    #[test]
    fn test_get() {
        let history = History(btreemap! {
            1 => 3421,
            1200 => 4231,
            2900 => 352,
        });
        assert_eq!(history.get(0), None);
        assert_eq!(history.get(1), Some(&3421));
        assert_eq!(history.get(1199), Some(&3421));
        assert_eq!(history.get(1200), Some(&4231));
        assert_eq!(history.get(2899), Some(&4231));
        assert_eq!(history.get(2900), Some(&352));
        assert_eq!(history.get(4000), Some(&352));
        assert_eq!(history.first(), Some(&3421));
    }

    #[test]
    fn test_dedup() {
        let mut history = History(btreemap! {
            1 => 3421,
            800 => 3421,
            1200 => 4231,
            1300 => 4231,
            2900 => 352,
        });
        history.dedup();
        assert_eq!(
            history.0,
            btreemap! {
                1 => 3421,
                1200 => 4231,
                2900 => 352,
            }
        );
    }
}
