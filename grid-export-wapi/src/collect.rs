//! Per-zone record collection.
//!
//! Each canonical zone gets two paginated `allrecords` fetches — A records,
//! then CNAME records — scoped by the zone name and its view. Results are
//! normalized into [`ResourceRecord`]s and appended in fetch order. A failed
//! fetch leaves that zone's list partial and the run moves on; nothing here
//! aborts the whole export.

use log::{error, info, warn};
use serde::Deserialize;

use crate::error::WapiError;
use crate::paging::{PageFetcher, PageQuery, fetch_all_as};
use crate::types::{RecordKind, ResourceRecord, Zone};
use crate::zones::ZoneTable;

/// Raw A-record row: the address sits at the top level of the row.
#[derive(Debug, Deserialize)]
struct RawARecord {
    name: String,
    address: String,
}

/// Raw CNAME row: the canonical target is nested under `record`.
#[derive(Debug, Deserialize)]
struct RawCnameRecord {
    name: String,
    record: CnameTarget,
}

#[derive(Debug, Deserialize)]
struct CnameTarget {
    canonical: String,
}

/// A record-type fetch that failed; the zone's record list stays partial.
#[derive(Debug)]
pub struct FetchFailure {
    /// Zone the fetch was scoped to.
    pub zone: String,
    /// Record kind that could not be fetched.
    pub kind: RecordKind,
    /// What went wrong.
    pub error: WapiError,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records for zone {} failed: {}",
            self.kind, self.zone, self.error
        )
    }
}

fn record_query(zone_name: &str, view: &str, kind: RecordKind) -> PageQuery {
    let fields = match kind {
        RecordKind::A => "type,name,address",
        RecordKind::Cname => "type,name,record",
    };
    PageQuery::new(fields)
        .filter("zone", zone_name)
        .filter("view", view)
        .filter("type", kind.wapi_type())
}

/// Fetch A and CNAME records for one zone and append them in fetch order.
///
/// The two fetches are independent: a failure on one is returned as a
/// [`FetchFailure`] and the other is still attempted.
pub async fn collect_zone_records<F>(
    fetcher: &F,
    zone_name: &str,
    zone: &mut Zone,
) -> Vec<FetchFailure>
where
    F: PageFetcher + ?Sized,
{
    let mut failures = Vec::new();

    let a_query = record_query(zone_name, &zone.view, RecordKind::A);
    match fetch_all_as::<RawARecord, F>(fetcher, "allrecords", &a_query).await {
        Ok(rows) => zone.records.extend(rows.into_iter().map(|row| ResourceRecord {
            kind: RecordKind::A,
            name: row.name,
            value: row.address,
        })),
        Err(error) => failures.push(FetchFailure {
            zone: zone_name.to_string(),
            kind: RecordKind::A,
            error,
        }),
    }

    let cname_query = record_query(zone_name, &zone.view, RecordKind::Cname);
    match fetch_all_as::<RawCnameRecord, F>(fetcher, "allrecords", &cname_query).await {
        Ok(rows) => zone.records.extend(rows.into_iter().map(|row| ResourceRecord {
            kind: RecordKind::Cname,
            name: row.name,
            value: row.record.canonical,
        })),
        Err(error) => failures.push(FetchFailure {
            zone: zone_name.to_string(),
            kind: RecordKind::Cname,
            error,
        }),
    }

    failures
}

/// Walk every zone in table order, appending whatever can be fetched.
///
/// Failures are logged against their zone and returned; one zone's failure
/// never prevents the next zone (or the other record kind) from being
/// collected.
pub async fn collect_all<F>(fetcher: &F, zones: &mut ZoneTable) -> Vec<FetchFailure>
where
    F: PageFetcher + ?Sized,
{
    let total = zones.len();
    let mut failures = Vec::new();

    for (i, (name, zone)) in zones.iter_mut().enumerate() {
        info!("[{}/{total}] zone {name}", i + 1);
        let zone_failures = collect_zone_records(fetcher, name, zone).await;
        for failure in &zone_failures {
            if failure.error.is_expected() {
                warn!("{failure}");
            } else {
                error!("{failure}");
            }
        }
        failures.extend(zone_failures);
    }

    failures
}
