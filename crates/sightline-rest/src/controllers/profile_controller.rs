//! Profile lookup controller.

use crate::{
    extractors::ViewerOrigin,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use sightline_core::{ProfileId, SightlineResult};
use sightline_service::{FindProfileOptions, ProfileLookupService, ProfileResponse};
use tracing::debug;
use utoipa::IntoParams;

/// Query parameters for a profile lookup.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    /// Record a view and return the resulting count.
    #[serde(default)]
    pub increment_view: bool,
    /// Skip the cache read.
    #[serde(default)]
    pub bypass_cache: bool,
    /// Identity of the viewing profile.
    #[serde(default)]
    pub viewer: Option<String>,
}

impl ProfileQuery {
    fn into_options(self, origin: ViewerOrigin) -> SightlineResult<FindProfileOptions> {
        let viewer = self
            .viewer
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(ProfileId::parse)
            .transpose()?;

        Ok(FindProfileOptions {
            increment_view: self.increment_view,
            viewer,
            viewer_origin: origin.into_inner(),
            bypass_cache: self.bypass_cache,
        })
    }
}

/// Creates the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:identity", get(get_profile))
}

/// Get a profile by identity.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{identity}",
    tag = "profiles",
    params(
        ("identity" = String, Path, description = "Profile identity"),
        ProfileQuery
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 400, description = "Invalid identity", body = sightline_core::ErrorResponse),
        (status = 404, description = "Profile not found", body = sightline_core::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = sightline_core::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Query(query): Query<ProfileQuery>,
    origin: ViewerOrigin,
) -> ApiResult<ProfileResponse> {
    debug!("Get profile request: {}", identity);

    let identity = ProfileId::parse(&identity)?;
    let options = query.into_options(origin)?;

    let response = state.profile_service.find(&identity, options).await?;
    ok(response)
}
