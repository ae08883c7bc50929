//! Zone listing and zone-ownership reduction.
//!
//! The `zone_auth` listing is flat: top-level zones and their sub-zones
//! arrive interleaved, across every DNS view. [`reduce_zones`] collapses the
//! listing into one canonical entry per top-level zone, keyed by parent-zone
//! resolution, ordered case-insensitively by name.

use std::collections::HashMap;

use crate::error::Result;
use crate::paging::{PageFetcher, PageQuery, fetch_all_as};
use crate::types::{Zone, ZoneAuthEntry};

/// Fields requested from the `zone_auth` listing.
const ZONE_RETURN_FIELDS: &str = "network_view,view,dns_fqdn,parent";

/// Retrieve the full authoritative zone listing across all views.
///
/// Failure here is fatal to the run: with no zones there is no further work.
pub async fn fetch_zones<F>(fetcher: &F) -> Result<Vec<ZoneAuthEntry>>
where
    F: PageFetcher + ?Sized,
{
    fetch_all_as(fetcher, "zone_auth", &PageQuery::new(ZONE_RETURN_FIELDS)).await
}

/// Insertion-ordered `zone name -> Zone` mapping.
///
/// Keys are exact zone names; the case-insensitive comparison only decides
/// the final ordering. Exactly one entry exists per distinct key.
#[derive(Debug, Default)]
pub struct ZoneTable {
    entries: Vec<(String, Zone)>,
    index: HashMap<String, usize>,
}

impl ZoneTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of zones in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no zones.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `zone` under `name` unless the key is already present.
    ///
    /// Returns whether an insert happened. An existing entry is never
    /// touched: first-seen metadata wins.
    pub fn insert_if_absent(&mut self, name: String, zone: Zone) -> bool {
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, zone));
        true
    }

    /// Look up a zone by exact name.
    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Zones in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Zone)> {
        self.entries.iter().map(|(name, zone)| (name.as_str(), zone))
    }

    /// Zones in table order, with mutable access to each zone.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Zone)> {
        self.entries
            .iter_mut()
            .map(|(name, zone)| (name.as_str(), zone))
    }

    /// Reorder by case-insensitive zone name.
    ///
    /// The sort is stable, so keys that compare equal case-insensitively
    /// keep their first-seen relative order.
    fn sort_case_insensitive(&mut self) {
        self.entries
            .sort_by_cached_key(|(name, _)| name.to_lowercase());
        for (i, (name, _)) in self.entries.iter().enumerate() {
            self.index.insert(name.clone(), i);
        }
    }
}

/// Collapse the raw zone listing into one canonical entry per top-level zone.
///
/// The key of each raw entry is its `parent` when set, otherwise its own
/// `dns_fqdn` — sub-zones fold into the zone that owns them. The first entry
/// seen for a key donates the view and network view; later entries mapping
/// to the same key change nothing.
pub fn reduce_zones(entries: impl IntoIterator<Item = ZoneAuthEntry>) -> ZoneTable {
    let mut table = ZoneTable::new();
    for entry in entries {
        let key = if entry.parent.is_empty() {
            entry.dns_fqdn
        } else {
            entry.parent
        };
        table.insert_if_absent(key, Zone::new(entry.view, entry.network_view));
    }
    table.sort_case_insensitive();
    table
}
