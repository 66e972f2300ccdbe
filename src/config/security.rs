//! Security headers configuration.

use std::env;

/// Configuration for security headers middleware
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub xss_protection: bool,
    pub referrer_policy: String,
}

const DEFAULT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const ONE_YEAR_SECONDS: u32 = 31_536_000;

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: DEFAULT_CSP.to_string(),
            hsts_enabled: true,
            hsts_max_age: ONE_YEAR_SECONDS,
            frame_options: "DENY".to_string(),
            content_type_options: true,
            xss_protection: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env::var("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env::var("HSTS_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hsts_max_age),
            frame_options: env::var("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", defaults.content_type_options),
            xss_protection: env_flag("X_XSS_PROTECTION", defaults.xss_protection),
            referrer_policy: env::var("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
        }
    }
}
