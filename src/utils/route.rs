//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label used for requests that matched no registered resource
pub const UNMATCHED_ROUTE: &str = "/unmatched";

/// Route pattern of a request, e.g. `/api/v1/weather/{id}/`.
///
/// Uses the matched resource pattern rather than the raw path so that ids
/// and unknown paths do not create unbounded metric label values.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
