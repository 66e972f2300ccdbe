//! Version information endpoint handler.

use crate::{models::VersionResponse, services::metrics::build_info};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Version information endpoint
///
/// Commit and build time fall back to `"unknown"` when the binary was built
/// outside a git checkout.
#[api_v2_operation(
    summary = "Version Information Endpoint",
    description = "Returns the current API version, commit hash, and build time.",
    tags("Version")
)]
pub async fn version() -> Result<web::Json<VersionResponse>, Error> {
    let (version, commit, build_time) = build_info();

    Ok(web::Json(VersionResponse {
        version: version.to_string(),
        commit: commit.to_string(),
        build_time: build_time.to_string(),
    }))
}
