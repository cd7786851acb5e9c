//! Equipment resolver: abstract item source → concrete item id.

use rand::seq::SliceRandom;
use rand::Rng;

use super::entry::{ItemSource, LootEntry};
use crate::tables::EquipmentCatalog;

/// Pick a concrete item id for `entry`.
///
/// Returns `None` for unknown or empty categories and for entries with no
/// item source. Borrowed from the entry or the catalog, no allocation beyond
/// the candidate union for multi-tag entries.
pub fn resolve_concrete_item_id<'a, R: Rng + ?Sized>(
    entry: &'a LootEntry,
    catalog: &'a EquipmentCatalog,
    rng: &mut R,
) -> Option<&'a str> {
    match &entry.source {
        ItemSource::Items(ids) => ids.choose(rng).map(String::as_str),
        ItemSource::EquipmentTypes(tags) => {
            let mut candidates: Vec<&str> = Vec::new();
            for tag in tags {
                let Some(pool) = catalog.pool(tag) else {
                    tracing::debug!(tag = tag.as_str(), "equipment type has no mapped pool");
                    continue;
                };
                for id in pool {
                    if !candidates.contains(&id.as_str()) {
                        candidates.push(id);
                    }
                }
            }
            candidates.choose(rng).copied()
        }
        ItemSource::ItemType(tag) => match catalog.pool(tag) {
            Some(pool) => pool.choose(rng).map(String::as_str),
            None => {
                tracing::debug!(tag = tag.as_str(), "item type has no mapped pool");
                None
            }
        },
        ItemSource::None => None,
    }
}
