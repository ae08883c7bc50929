use thiserror::Error;

/// Unified error type for all WAPI operations.
///
/// Each variant carries the WAPI object (`grid`, `zone_auth`, `allrecords`,
/// `logout`) the failing request was addressed to, plus variant-specific
/// context.
///
/// Three failure families are kept distinct on purpose:
///
/// - [`Network`](Self::Network) / [`Timeout`](Self::Timeout) — transport-level
///   failures (connection refused, TLS, exceeded timeout).
/// - [`HttpStatus`](Self::HttpStatus) — a non-success status whose body did
///   not carry a WAPI error payload.
/// - [`Api`](Self::Api) — an application-level error payload from the grid,
///   carrying the server's reason text.
///
/// No variant is retried; the fetch that produced it simply fails.
#[derive(Error, Debug)]
pub enum WapiError {
    /// The login probe was rejected. Fatal: nothing can be fetched.
    #[error("authentication failed for {user}@{host} (HTTP {status})")]
    AuthFailed {
        /// Grid Master the login was attempted against.
        host: String,
        /// Username presented via basic auth.
        user: String,
        /// HTTP status of the rejected probe.
        status: u16,
    },

    /// A network-level error (DNS resolution, connection refused, TLS).
    #[error("network error on {object}: {detail}")]
    Network {
        /// WAPI object the request addressed.
        object: String,
        /// Error details.
        detail: String,
    },

    /// The request exceeded the configured connect/read timeouts.
    #[error("request timeout on {object}: {detail}")]
    Timeout {
        /// WAPI object the request addressed.
        object: String,
        /// Error details.
        detail: String,
    },

    /// Non-success HTTP status with no WAPI error payload in the body.
    #[error("HTTP {status} on {object}")]
    HttpStatus {
        /// WAPI object the request addressed.
        object: String,
        /// The status code returned.
        status: u16,
    },

    /// The grid returned an application-level error payload.
    #[error("WAPI error on {object}: {text}")]
    Api {
        /// WAPI object the request addressed.
        object: String,
        /// Reason text from the error payload.
        text: String,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("parse error on {object}: {detail}")]
    Parse {
        /// WAPI object the request addressed.
        object: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Session logout was rejected. Non-fatal: collected data is unaffected.
    #[error("logout failed (HTTP {status})")]
    Logout {
        /// The status code returned.
        status: u16,
    },
}

impl WapiError {
    /// Whether this is expected operational noise (server-reported errors,
    /// failed logout), used for log level selection.
    ///
    /// `true` should log at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Logout { .. })
    }
}

/// Convenience type alias for `Result<T, WapiError>`.
pub type Result<T> = std::result::Result<T, WapiError>;
