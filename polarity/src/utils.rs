use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;

/// Assigns dense ids to keys in order of first appearance.
#[derive(Debug, Clone)]
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    pub fn get_id<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            let key = key.to_owned();
            self.keys.push(key.clone());
            self.ids.insert(key, id);
            id
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

impl<K> Default for Indexer<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a text into whitespace-separated tokens.
#[inline(always)]
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexer_first_appearance() {
        let mut indexer = Indexer::<String>::new();
        assert_eq!(0, indexer.get_id("b"));
        assert_eq!(1, indexer.get_id("a"));
        assert_eq!(0, indexer.get_id("b"));
        assert_eq!(vec!["b".to_string(), "a".to_string()], indexer.into_keys());
    }
}
