//! Key-level synchronization between two translation files.

use std::collections::HashSet;

use crate::translation::TranslationFile;
use crate::types::ValueSlot;

/// Copies the `slot` values of `source` into `dest`.
///
/// Keys are visited in `source` order. A blank value never overwrites
/// anything; with `remove_obsolete` it deletes the key from `dest`
/// instead, and every `dest` key unknown to `source` is dropped as well.
pub fn sync_from(
    source: &TranslationFile,
    dest: &mut TranslationFile,
    slot: ValueSlot,
    remove_obsolete: bool,
) {
    for key in source.keys() {
        match source.unit_value(key, slot) {
            Some(value) if !value.is_empty() => dest.set_value(key, slot, value),
            _ if remove_obsolete => {
                if dest.remove(key) {
                    tracing::debug!(%key, "Removing key with empty value");
                }
            }
            _ => {}
        }
    }

    if !remove_obsolete {
        return;
    }

    let known: HashSet<&str> = source.keys().collect();
    let obsolete: Vec<String> =
        dest.keys().filter(|key| !known.contains(key)).map(str::to_string).collect();
    for key in obsolete {
        tracing::debug!(
            %key,
            path = %dest.path().display(),
            "Language key is not present in the source. Removing it."
        );
        dest.remove(&key);
    }
}
