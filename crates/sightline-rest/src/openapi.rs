//! OpenAPI documentation configuration.

use crate::controllers::{ComponentHealth, HealthResponse, ReadinessResponse};
use sightline_core::ErrorResponse;
use sightline_service::ProfileResponse;
use utoipa::OpenApi;

/// OpenAPI documentation for the Sightline API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sightline API",
        version = "1.0.0",
        description = "Profile lookup with cached reads and deduplicated view counts",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::profile_controller::get_profile,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProfileResponse,
            ErrorResponse,
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "profiles", description = "Profile lookup endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_profile_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/profiles/{identity}"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
