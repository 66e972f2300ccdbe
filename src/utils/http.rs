//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers consulted for the client address, most specific first
const CLIENT_IP_HEADERS: [&str; 4] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP",
    "X-Cluster-Client-IP",
];

/// Extract client IP address from request headers
///
/// `X-Forwarded-For` may carry a chain; the first hop is the client.
/// Falls back to the peer address, then to `"unknown"`.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    for header_name in CLIENT_IP_HEADERS {
        let first_hop = req
            .headers()
            .get(header_name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        if let Some(ip) = first_hop {
            return ip.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
