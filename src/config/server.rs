//! HTTP server binding configuration.

use std::{env, path::Path};

const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";
const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Where the HTTP server listens
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// `BIND_ADDRESS` wins; otherwise containers bind all interfaces and
    /// local runs bind loopback only.
    pub fn from_env() -> Self {
        let container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            Path::new("/.dockerenv").exists(),
        );
        Self {
            bind_address: detect_bind_address(container, env::var("BIND_ADDRESS").ok().as_deref()),
        }
    }
}

pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

pub fn detect_bind_address(in_container: bool, bind_override: Option<&str>) -> String {
    if let Some(bind) = bind_override.filter(|b| !b.trim().is_empty()) {
        return bind.to_string();
    }
    if in_container {
        CONTAINER_BIND_ADDRESS.to_string()
    } else {
        LOCAL_BIND_ADDRESS.to_string()
    }
}
