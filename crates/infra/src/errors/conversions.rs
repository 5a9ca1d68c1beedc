//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use sheetsync_domain::SheetSyncError;
use tokio_postgres::Error as PgError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SheetSyncError);

impl From<InfraError> for SheetSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SheetSyncError> for InfraError {
    fn from(value: SheetSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSheetSyncError {
    fn into_sheetsync(self) -> SheetSyncError;
}

/* -------------------------------------------------------------------------- */
/* tokio_postgres::Error → SheetSyncError */
/* -------------------------------------------------------------------------- */

impl IntoSheetSyncError for PgError {
    fn into_sheetsync(self) -> SheetSyncError {
        if let Some(db) = self.as_db_error() {
            return SheetSyncError::Database(format!(
                "{} (SQLSTATE {})",
                db.message(),
                db.code().code()
            ));
        }

        if self.is_closed() {
            return SheetSyncError::Database("database connection closed".into());
        }

        SheetSyncError::Database(self.to_string())
    }
}

impl From<PgError> for InfraError {
    fn from(value: PgError) -> Self {
        InfraError(value.into_sheetsync())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SheetSyncError */
/* -------------------------------------------------------------------------- */

impl IntoSheetSyncError for HttpError {
    fn into_sheetsync(self) -> SheetSyncError {
        if self.is_timeout() {
            return SheetSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SheetSyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return SheetSyncError::InvalidInput(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => SheetSyncError::NotFound(message),
                429 | 500..=599 => SheetSyncError::api("http", Some(code), None, message),
                400..=499 => SheetSyncError::InvalidInput(message),
                _ => SheetSyncError::Network(message),
            };
        }

        SheetSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_sheetsync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: StatusCode) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(status)).mount(&server).await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let mapped: SheetSyncError =
            InfraError::from(status_error(StatusCode::NOT_FOUND).await).into();
        match mapped {
            SheetSyncError::NotFound(msg) => assert!(msg.contains("404")),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    /// Validates that server errors keep their status for retry classification.
    ///
    /// Assertions:
    /// - HTTP 503 becomes an `Api` error carrying status 503.
    /// - The mapped error reports itself as a server error.
    #[tokio::test]
    async fn http_status_503_maps_to_server_error() {
        let mapped: SheetSyncError =
            InfraError::from(status_error(StatusCode::SERVICE_UNAVAILABLE).await).into();
        assert!(mapped.is_server_error());
        assert!(matches!(mapped, SheetSyncError::Api { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn http_status_400_maps_to_invalid_input() {
        let mapped: SheetSyncError =
            InfraError::from(status_error(StatusCode::BAD_REQUEST).await).into();
        assert!(matches!(mapped, SheetSyncError::InvalidInput(_)));
    }

    #[test]
    fn domain_error_round_trips_through_newtype() {
        let original = SheetSyncError::Config("missing token".into());
        let back: SheetSyncError = InfraError::from(original.clone()).into();
        assert_eq!(back, original);
    }
}
