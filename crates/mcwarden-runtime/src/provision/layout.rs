//! On-disk layout of a Paper server with Geyser/Floodgate for Bedrock clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mcwarden_core::{ArtifactFetcher, ProvisionError, SERVER_JAR, ServerProperties, ServerProvisioner};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::store::{BANS_FILE, OPS_FILE};

/// Paper build downloaded when no `server.jar` is present.
pub const PAPER_JAR_URL: &str =
    "https://api.papermc.io/v2/projects/paper/versions/1.20.4/builds/497/downloads/paper-1.20.4-497.jar";

const GEYSER_URL: &str =
    "https://download.geysermc.org/v2/projects/geyser/versions/latest/builds/latest/downloads/spigot";
const FLOODGATE_URL: &str =
    "https://download.geysermc.org/v2/projects/floodgate/versions/latest/builds/latest/downloads/spigot";

const PLUGINS_DIR: &str = "plugins";
const GEYSER_DATA_DIR: &str = "Geyser-Spigot";

/// An optional plugin jar placed in `plugins/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginArtifact {
    pub file_name: String,
    pub url: String,
}

impl PluginArtifact {
    pub fn new(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            url: url.into(),
        }
    }
}

/// Geyser and Floodgate, letting Bedrock clients join the Java server.
pub fn bedrock_bridge_plugins() -> Vec<PluginArtifact> {
    vec![
        PluginArtifact::new("Geyser-Spigot.jar", GEYSER_URL),
        PluginArtifact::new("floodgate-spigot.jar", FLOODGATE_URL),
    ]
}

/// Prepares a server directory so the server can start unattended.
pub struct ServerLayout {
    server_dir: PathBuf,
    jar_url: String,
    plugins: Vec<PluginArtifact>,
    properties: ServerProperties,
    fetcher: Arc<dyn ArtifactFetcher>,
}

impl ServerLayout {
    pub fn new(server_dir: impl Into<PathBuf>, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self {
            server_dir: server_dir.into(),
            jar_url: PAPER_JAR_URL.to_string(),
            plugins: bedrock_bridge_plugins(),
            properties: ServerProperties::default(),
            fetcher,
        }
    }

    #[must_use]
    pub fn with_jar_url(mut self, url: impl Into<String>) -> Self {
        self.jar_url = url.into();
        self
    }

    #[must_use]
    pub fn with_plugins(mut self, plugins: Vec<PluginArtifact>) -> Self {
        self.plugins = plugins;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: ServerProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    pub fn jar_path(&self) -> PathBuf {
        self.server_dir.join(SERVER_JAR)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.server_dir.join(PLUGINS_DIR)
    }

    pub const fn properties(&self) -> &ServerProperties {
        &self.properties
    }

    fn io_error(path: &Path, source: std::io::Error) -> ProvisionError {
        ProvisionError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    async fn ensure_dir(path: &Path) -> Result<(), ProvisionError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| Self::io_error(path, e))
    }

    async fn write_file(path: &Path, content: &str) -> Result<(), ProvisionError> {
        fs::write(path, content)
            .await
            .map_err(|e| Self::io_error(path, e))
    }

    async fn ensure_server_jar(&self) -> Result<(), ProvisionError> {
        let jar = self.jar_path();
        if exists(&jar).await {
            debug!(path = %jar.display(), "Server jar present");
            return Ok(());
        }

        info!(url = %self.jar_url, "Downloading server jar");
        self.fetcher
            .fetch(&self.jar_url, &jar)
            .await
            .map_err(|source| ProvisionError::Fetch {
                artifact: SERVER_JAR.to_string(),
                source,
            })?;
        Ok(())
    }

    async fn ensure_plugins(&self) {
        let plugins_dir = self.plugins_dir();
        for plugin in &self.plugins {
            let path = plugins_dir.join(&plugin.file_name);
            if exists(&path).await {
                continue;
            }

            info!(plugin = %plugin.file_name, "Downloading plugin");
            if let Err(e) = self.fetcher.fetch(&plugin.url, &path).await {
                warn!(
                    plugin = %plugin.file_name,
                    error = %e,
                    "Plugin download failed, server will run without it"
                );
            }
        }
    }

    async fn write_config(&self) -> Result<(), ProvisionError> {
        Self::write_file(
            &self.server_dir.join("server.properties"),
            &self.properties.render(),
        )
        .await?;
        Self::write_file(&self.server_dir.join("eula.txt"), "eula=true\n").await?;

        let geyser_dir = self.plugins_dir().join(GEYSER_DATA_DIR);
        Self::ensure_dir(&geyser_dir).await?;
        Self::write_file(
            &geyser_dir.join("config.yml"),
            &geyser_config(&self.properties),
        )
        .await?;

        for list in [OPS_FILE, BANS_FILE] {
            let path = self.server_dir.join(list);
            if !exists(&path).await {
                Self::write_file(&path, "[]").await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ServerProvisioner for ServerLayout {
    async fn provision(&self) -> Result<(), ProvisionError> {
        info!(dir = %self.server_dir.display(), "Preparing server directory");

        Self::ensure_dir(&self.server_dir).await?;
        Self::ensure_dir(&self.plugins_dir()).await?;

        self.ensure_server_jar().await?;
        self.ensure_plugins().await;
        self.write_config().await?;

        info!("Server directory ready");
        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

fn geyser_config(properties: &ServerProperties) -> String {
    format!(
        r#"# Geyser Configuration File
bedrock:
  address: 0.0.0.0
  port: {bedrock_port}
  clone-remote-port: false
  motd1: "{motd}"
  motd2: "Java & Bedrock"
  server-name: "{motd}"
  compression-level: 6
  enable-proxy-protocol: false
  proxy-protocol-whitelisted-ips: []

remote:
  address: 127.0.0.1
  port: {server_port}
  auth-type: {auth_type}
  allow-password-authentication: true
  use-proxy-protocol: false
  forward-hostname: false

floodgate:
  key-file: key.pem
  username-prefix: "."
  replace-spaces: true

userdata-folder: userdata
cache-images: 0
allow-custom-skulls: true
allow-third-party-capes: true
allow-third-party-ears: false
allow-third-party-deadmau5ears: false
show-cooldown: title
default-locale: en_us
cache-chunked-loading: true
log-player-ip-addresses: true
config-version: 4
"#,
        bedrock_port = properties.bedrock_port,
        server_port = properties.server_port,
        motd = properties.motd.replace('"', "'"),
        auth_type = if properties.online_mode { "online" } else { "offline" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcwarden_core::FetchError;
    use std::sync::Mutex;

    /// Writes the URL into the destination, failing for listed URLs.
    #[derive(Default)]
    struct FakeFetcher {
        fail: Vec<String>,
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ArtifactFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
            self.fetched.lock().expect("lock").push(url.to_string());
            if self.fail.iter().any(|f| f == url) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                });
            }
            std::fs::write(dest, url).map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })?;
            Ok(url.len() as u64)
        }
    }

    #[tokio::test]
    async fn provisions_empty_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let server_dir = dir.path().join("server");
        let fetcher = Arc::new(FakeFetcher::default());
        let layout = ServerLayout::new(&server_dir, fetcher.clone());

        layout.provision().await.expect("provision");

        assert!(server_dir.join("server.jar").exists());
        assert!(server_dir.join("plugins/Geyser-Spigot.jar").exists());
        assert!(server_dir.join("plugins/floodgate-spigot.jar").exists());
        assert_eq!(
            std::fs::read_to_string(server_dir.join("eula.txt")).expect("eula"),
            "eula=true\n"
        );
        assert_eq!(
            std::fs::read_to_string(server_dir.join("ops.json")).expect("ops"),
            "[]"
        );
        let geyser = std::fs::read_to_string(server_dir.join("plugins/Geyser-Spigot/config.yml"))
            .expect("geyser config");
        assert!(geyser.contains("port: 19132"));
        assert!(geyser.contains("auth-type: offline"));
        assert_eq!(fetcher.fetched.lock().expect("lock").len(), 3);
    }

    #[tokio::test]
    async fn second_run_downloads_nothing_and_keeps_lists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = Arc::new(FakeFetcher::default());
        let layout = ServerLayout::new(dir.path(), fetcher.clone());
        layout.provision().await.expect("first provision");

        std::fs::write(dir.path().join("ops.json"), r#"[{"uuid":"a","name":"a"}]"#)
            .expect("edit ops");
        layout.provision().await.expect("second provision");

        assert_eq!(fetcher.fetched.lock().expect("lock").len(), 3);
        let ops = std::fs::read_to_string(dir.path().join("ops.json")).expect("ops");
        assert!(ops.contains("\"a\""));
    }

    #[tokio::test]
    async fn plugin_failure_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = Arc::new(FakeFetcher {
            fail: vec![GEYSER_URL.to_string()],
            ..FakeFetcher::default()
        });
        let layout = ServerLayout::new(dir.path(), fetcher);

        layout.provision().await.expect("provision");
        assert!(!dir.path().join("plugins/Geyser-Spigot.jar").exists());
        assert!(dir.path().join("plugins/floodgate-spigot.jar").exists());
    }

    #[tokio::test]
    async fn jar_failure_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = Arc::new(FakeFetcher {
            fail: vec![PAPER_JAR_URL.to_string()],
            ..FakeFetcher::default()
        });
        let layout = ServerLayout::new(dir.path(), fetcher);

        let err = layout.provision().await.unwrap_err();
        assert!(matches!(err, ProvisionError::Fetch { ref artifact, .. } if artifact == "server.jar"));
    }

    #[test]
    fn geyser_config_follows_properties() {
        let properties = ServerProperties {
            server_port: 25570,
            bedrock_port: 19140,
            online_mode: true,
            ..ServerProperties::default()
        };
        let config = geyser_config(&properties);
        assert!(config.contains("port: 19140"));
        assert!(config.contains("port: 25570"));
        assert!(config.contains("auth-type: online"));
    }
}
