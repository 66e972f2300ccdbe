//! Security headers middleware implementation.

use crate::config::SecurityHeadersConfig;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};
use tracing::warn;

/// Security headers middleware factory
///
/// Header values are rendered once from the configuration and stamped onto
/// every response, error responses included.
pub struct SecurityHeaders {
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeaders {
    /// Create a new security headers middleware with the given configuration
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            headers: Rc::new(render_headers(&config)),
        }
    }
}

/// Turn the configuration into concrete response headers.
///
/// Values that are not valid header text are skipped with a warning.
pub fn render_headers(config: &SecurityHeadersConfig) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = Vec::new();

    if config.content_type_options {
        headers.push((
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ));
    }

    if config.xss_protection {
        headers.push((
            HeaderName::from_static("x-xss-protection"),
            HeaderValue::from_static("1; mode=block"),
        ));
    }

    let mut configurable = vec![
        ("x-frame-options", config.frame_options.clone()),
        ("referrer-policy", config.referrer_policy.clone()),
    ];
    if config.csp_enabled {
        configurable.push(("content-security-policy", config.csp_directives.clone()));
    }
    if config.hsts_enabled {
        configurable.push((
            "strict-transport-security",
            format!("max-age={}", config.hsts_max_age),
        ));
    }

    for (name, value) in configurable {
        match HeaderValue::from_str(&value) {
            Ok(value) => headers.push((HeaderName::from_static(name), value)),
            Err(_) => {
                warn!(header = name, value = %value, "Skipping invalid security header value")
            }
        }
    }

    headers
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            headers: Rc::clone(&self.headers),
        }))
    }
}

/// The actual security headers middleware service
pub struct SecurityHeadersMiddleware<S> {
    service: S,
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        let headers = Rc::clone(&self.headers);

        Box::pin(async move {
            let mut res = fut.await?;
            let response_headers = res.headers_mut();
            for (name, value) in headers.iter() {
                response_headers.insert(name.clone(), value.clone());
            }
            Ok(res)
        })
    }
}
