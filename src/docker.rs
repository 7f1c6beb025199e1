use anyhow::{Context, Result};
use bollard::query_parameters::{
    ListContainersOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::{API_DEFAULT_VERSION, Docker};
use std::future::Future;
use tracing::info;

use crate::model::ContainerRecord;

const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";
// same request timeout bollard applies to its default connections
const ENGINE_TIMEOUT_SECS: u64 = 120;

/// Stateless request/response access to the container engine.
///
/// Implementations are shared read-only across background tasks, so every
/// call must be independent of the others.
pub trait RuntimeGateway: Send + Sync + 'static {
    /// Lists every container, stopped ones included.
    fn enumerate(&self) -> impl Future<Output = Result<Vec<ContainerRecord>>> + Send;

    fn start(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Graceful stop using the engine's default grace period.
    fn stop(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct DockerGateway {
    docker: Docker,
    endpoint: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Endpoint {
    Socket(String),
    Http(String),
}

impl DockerGateway {
    pub async fn connect(host: Option<&str>) -> Result<Self> {
        let host = host.map(str::trim).filter(|host| !host.is_empty());
        let (docker, endpoint) = match host {
            Some(host) => (connect_to_host(host)?, host.to_string()),
            None => {
                let docker = Docker::connect_with_defaults()
                    .context("failed to configure Docker client from environment")?;
                let endpoint = std::env::var("DOCKER_HOST")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SOCKET.to_string());
                (docker, endpoint)
            }
        };

        let version = docker
            .ping()
            .await
            .with_context(|| format!("Docker engine at {endpoint} is unreachable"))?;
        info!("connected to Docker engine at {endpoint} (ping: {version})");

        Ok(Self { docker, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RuntimeGateway for DockerGateway {
    async fn enumerate(&self) -> Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .context("failed to list containers")?;

        Ok(containers
            .into_iter()
            .map(|container| {
                record_from_parts(
                    container.id,
                    container.image,
                    container.status,
                    container.state.map(|state| state.to_string()),
                )
            })
            .collect())
    }

    async fn start(&self, id: &str) -> Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await
            .with_context(|| format!("failed to start container {id}"))
    }

    async fn stop(&self, id: &str) -> Result<()> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await
            .with_context(|| format!("failed to stop container {id}"))
    }
}

fn record_from_parts(
    id: Option<String>,
    image: Option<String>,
    status: Option<String>,
    state: Option<String>,
) -> ContainerRecord {
    ContainerRecord::new(
        id.as_deref().unwrap_or_default(),
        image.unwrap_or_default(),
        status.unwrap_or_default(),
        state.unwrap_or_default(),
    )
}

fn connect_to_host(host: &str) -> Result<Docker> {
    match parse_endpoint(host)? {
        Endpoint::Socket(path) => {
            Docker::connect_with_socket(&path, ENGINE_TIMEOUT_SECS, API_DEFAULT_VERSION)
                .with_context(|| format!("failed to configure Docker socket client for {path}"))
        }
        Endpoint::Http(address) => {
            Docker::connect_with_http(&address, ENGINE_TIMEOUT_SECS, API_DEFAULT_VERSION)
                .with_context(|| format!("failed to configure Docker HTTP client for {address}"))
        }
    }
}

fn parse_endpoint(host: &str) -> Result<Endpoint> {
    let host = host.trim();
    if let Some(path) = host.strip_prefix("unix://") {
        if path.is_empty() {
            anyhow::bail!("Docker host '{host}' has an empty socket path");
        }
        return Ok(Endpoint::Socket(path.to_string()));
    }
    if host.starts_with('/') {
        return Ok(Endpoint::Socket(host.to_string()));
    }
    if host.starts_with("tcp://") || host.starts_with("http://") {
        return Ok(Endpoint::Http(host.to_string()));
    }

    anyhow::bail!("unsupported Docker host '{host}' (expected unix://, tcp:// or http://)")
}

#[cfg(test)]
mod tests {
    use super::{Endpoint, parse_endpoint, record_from_parts};

    #[test]
    fn summary_fields_map_to_record() {
        let record = record_from_parts(
            Some("0123456789abcdef0123456789abcdef01234567".to_string()),
            Some("postgres:16".to_string()),
            Some("Exited (0) 5 seconds ago".to_string()),
            Some("exited".to_string()),
        );

        assert_eq!(record.id, "0123456789ab");
        assert_eq!(record.image, "postgres:16");
        assert_eq!(record.status_text, "Exited (0) 5 seconds ago");
        assert_eq!(record.state_tag, "exited");
    }

    #[test]
    fn missing_summary_fields_become_empty() {
        let record = record_from_parts(None, None, None, None);
        assert_eq!(record.id, "");
        assert_eq!(record.image, "");
        assert_eq!(record.status_text, "");
        assert_eq!(record.state_tag, "");
    }

    #[test]
    fn unix_hosts_map_to_socket_paths() {
        assert_eq!(
            parse_endpoint("unix:///var/run/docker.sock").ok(),
            Some(Endpoint::Socket("/var/run/docker.sock".to_string()))
        );
        assert_eq!(
            parse_endpoint("/run/user/1000/podman/podman.sock").ok(),
            Some(Endpoint::Socket(
                "/run/user/1000/podman/podman.sock".to_string()
            ))
        );
    }

    #[test]
    fn tcp_and_http_hosts_map_to_http() {
        assert_eq!(
            parse_endpoint("tcp://10.0.0.5:2375").ok(),
            Some(Endpoint::Http("tcp://10.0.0.5:2375".to_string()))
        );
        assert_eq!(
            parse_endpoint(" http://localhost:2375 ").ok(),
            Some(Endpoint::Http("http://localhost:2375".to_string()))
        );
    }

    #[test]
    fn unknown_schemes_are_rejected() {
        let error = parse_endpoint("ssh://docker@example.com").unwrap_err();
        assert!(error.to_string().contains("unsupported Docker host"));
        assert!(parse_endpoint("unix://").is_err());
    }
}
