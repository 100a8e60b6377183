
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::hash::Hash;

/// Result of joining a patient key against an external reference dataset
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReferenceHit {
    /// whether the key matched any reference row
    pub matched: bool,
    /// opaque annotation payload carried from the reference row (INFO string)
    pub info: Option<String>
}

impl ReferenceHit {
    pub fn miss() -> ReferenceHit {
        ReferenceHit { matched: false, info: None }
    }

    pub fn hit(info: Option<String>) -> ReferenceHit {
        ReferenceHit { matched: true, info }
    }
}

/// Two-phase "distinct-then-broadcast" join: the reference lookup runs once per
/// DISTINCT key rather than once per patient row, bounding reference scan cost to
/// O(distinct keys). Rows with no key are handed back the provided default.
///
/// The lookup closure is invoked exactly once per distinct key, in first-seen order.
/// # Arguments
/// * `row_keys` - per-row optional join keys, one entry per patient row
/// * `default` - value broadcast to rows without a key
/// * `lookup` - resolves one distinct key against the reference dataset
pub fn distinct_then_broadcast<K, V, F>(row_keys: &[Option<K>], default: V, mut lookup: F) -> Vec<V>
where
    K: Clone + Eq + Hash,
    V: Clone,
    F: FnMut(&K) -> V
{
    // phase 1: project the distinct key set and resolve each key once
    let mut resolved: HashMap<K, V> = Default::default();
    for key in row_keys.iter().flatten() {
        if !resolved.contains_key(key) {
            let value = lookup(key);
            resolved.insert(key.clone(), value);
        }
    }

    // phase 2: broadcast the per-key results back to every original row
    row_keys.iter()
        .map(|key| match key {
            Some(k) => resolved.get(k).cloned().unwrap_or_else(|| default.clone()),
            None => default.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_lookup_called_once_per_distinct_key() {
        let keys: Vec<Option<&str>> = vec![Some("a"), Some("b"), Some("a"), None, Some("b"), Some("a")];
        let calls: RefCell<Vec<String>> = RefCell::new(vec![]);
        let result = distinct_then_broadcast(&keys, 0usize, |k| {
            calls.borrow_mut().push(k.to_string());
            k.len() + calls.borrow().len()
        });
        assert_eq!(calls.borrow().as_slice(), &["a".to_string(), "b".to_string()]);
        // broadcast equals the per-key result for every original row
        assert_eq!(result, vec![2, 3, 2, 0, 3, 2]);
    }

    #[test]
    fn test_equivalence_to_naive_join() {
        // property: the two-phase join matches joining each row's key directly
        let reference = |k: &u32| -> ReferenceHit {
            if k % 2 == 0 {
                ReferenceHit::hit(Some(format!("payload_{k}")))
            } else {
                ReferenceHit::miss()
            }
        };
        let keys: Vec<Option<u32>> = vec![Some(2), Some(3), Some(2), Some(8), None, Some(3)];
        let broadcast = distinct_then_broadcast(&keys, ReferenceHit::miss(), reference);
        let naive: Vec<ReferenceHit> = keys.iter()
            .map(|k| k.as_ref().map(reference).unwrap_or_else(ReferenceHit::miss))
            .collect();
        assert_eq!(broadcast, naive);
    }
}
