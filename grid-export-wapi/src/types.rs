use serde::Deserialize;

// ============ Raw zone listing ============

/// One row of the authoritative zone listing (`zone_auth`).
///
/// Sub-zones carry the owning top-level zone in `parent`; top-level zones
/// have an empty `parent`. The grid omits `parent` entirely for some zone
/// kinds, which deserializes to the same empty string.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneAuthEntry {
    /// Fully qualified zone name.
    pub dns_fqdn: String,
    /// Name of the owning top-level zone, empty for top-level zones.
    #[serde(default)]
    pub parent: String,
    /// DNS view the zone lives in.
    pub view: String,
    /// Network view the zone lives in.
    pub network_view: String,
}

// ============ Normalized records ============

/// Record kinds collected by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// IPv4 address record.
    A,
    /// Canonical name (alias) record.
    Cname,
}

impl RecordKind {
    /// WAPI object type used in `allrecords` filters.
    pub(crate) fn wapi_type(self) -> &'static str {
        match self {
            Self::A => "record:a",
            Self::Cname => "record:cname",
        }
    }

    /// Uppercase name as emitted in the report.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized resource record.
///
/// `value` is the A record's address or the CNAME record's canonical target;
/// the two are told apart by `kind`, never by field shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Which record type this row came from.
    pub kind: RecordKind,
    /// Record name as returned by the grid.
    pub name: String,
    /// Address (A) or canonical target (CNAME).
    pub value: String,
}

// ============ Canonical zones ============

/// Metadata and collected records for one top-level zone.
///
/// Created once by the zone reduction with an empty record list, appended to
/// by record collection, read-only during report emission.
#[derive(Debug, Clone)]
pub struct Zone {
    /// DNS view the zone was first seen in.
    pub view: String,
    /// Network view the zone was first seen in.
    pub network_view: String,
    /// Collected records, in append order.
    pub records: Vec<ResourceRecord>,
}

impl Zone {
    /// A zone shell with no records yet.
    pub fn new(view: impl Into<String>, network_view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            network_view: network_view.into(),
            records: Vec::new(),
        }
    }
}
