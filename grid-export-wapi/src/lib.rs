//! # grid-export-wapi
//!
//! Infoblox NIOS WAPI client for one-shot zone and record extraction:
//! an authenticated cookie session, cursor-following pagination, the
//! zone-ownership reduction, per-zone A/CNAME collection and CSV emission.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grid_export_wapi::{
//!     SessionConfig, WapiSession, collect_all, fetch_zones, reduce_zones, save_report,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig {
//!         host: "gm.lab".to_string(),
//!         wapi_version: "2.12.2".to_string(),
//!         username: "admin".to_string(),
//!         password: "secret".to_string(),
//!         max_results: 1000,
//!         insecure_tls: false,
//!     };
//!
//!     // 1. Authenticate; the session cookie backs every later request
//!     let session = WapiSession::login(&config).await?;
//!
//!     // 2. List and reduce the authoritative zones (fatal on failure)
//!     let raw = fetch_zones(&session).await?;
//!     let mut zones = reduce_zones(raw);
//!
//!     // 3. Collect A and CNAME records; per-zone failures don't abort
//!     let failures = collect_all(&session, &mut zones).await;
//!     for failure in &failures {
//!         eprintln!("{failure}");
//!     }
//!
//!     // 4. Emit whatever was collected
//!     session.logout().await.ok();
//!     save_report(std::path::Path::new("zones.csv"), &zones)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, WapiError>`](WapiError). Failure kinds
//! stay distinct: [`WapiError::AuthFailed`] is fatal,
//! [`WapiError::Network`]/[`WapiError::Timeout`] are transport failures
//! scoped to one fetch, [`WapiError::Api`] carries the grid's own reason
//! text, and [`WapiError::Logout`] never outranks collected data. Nothing is
//! retried.
//!
//! ## Testing
//!
//! Pagination and everything above it run through the [`PageFetcher`] trait,
//! so the whole pipeline can be driven by scripted in-memory pages — no grid
//! required.

mod collect;
mod error;
mod paging;
mod report;
mod session;
mod types;
mod zones;

// Re-export error types
pub use error::{Result, WapiError};

// Re-export the pagination seam
pub use paging::{Page, PageFetcher, PageQuery, fetch_all, fetch_all_as};

// Re-export the session
pub use session::{SessionConfig, WapiSession};

// Re-export domain types
pub use types::{RecordKind, ResourceRecord, Zone, ZoneAuthEntry};

// Re-export the reduction and collection passes
pub use collect::{FetchFailure, collect_all, collect_zone_records};
pub use zones::{ZoneTable, fetch_zones, reduce_zones};

// Re-export report emission
pub use report::{save_report, write_report};
