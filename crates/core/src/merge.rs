//! Reconciling a finished session back into the master list.

use std::collections::HashMap;

use crate::model::{SessionResult, Word, WordKey};

/// Merge the updated fail counters of `result` into `master`.
///
/// See [`merge_updates`].
#[must_use]
pub fn merge_session_result(master: &[Word], result: &SessionResult) -> Vec<Word> {
    merge_updates(master, result.final_working_set())
}

/// Replace every master entry whose `(source, target)` matches an update.
///
/// The returned list keeps master order and length. Updates without a master
/// counterpart are dropped. If an identity appears more than once in `updates`,
/// the first occurrence wins.
#[must_use]
pub fn merge_updates(master: &[Word], updates: &[Word]) -> Vec<Word> {
    if updates.is_empty() {
        return master.to_vec();
    }

    let mut by_key: HashMap<WordKey, &Word> = HashMap::with_capacity(updates.len());
    for update in updates {
        by_key.entry(update.key()).or_insert(update);
    }

    master
        .iter()
        .map(|word| {
            by_key
                .get(&word.key())
                .map_or_else(|| word.clone(), |updated| (*updated).clone())
        })
        .collect()
}
