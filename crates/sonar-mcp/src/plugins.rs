//! Reconciles the local analyzer plugin directory against the server.
//!
//! Downloads are written to a temporary file in the target directory and
//! renamed into place, so a crash mid-download never leaves a truncated
//! jar that a later run would mistake for a complete one.

use sonar_serverapi::{ServerApi, ServerApiError};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Languages each analyzer plugin enables, keyed by the plugin jar's
/// filename prefix.
const SUPPORTED_LANGUAGES_BY_PLUGIN: &[(&str, &[&str])] = &[
    ("sonar-kotlin-plugin", &["kotlin"]),
    ("sonar-java-plugin", &["java"]),
    (
        "sonar-iac-plugin",
        &[
            "cloudformation",
            "kubernetes",
            "terraform",
            "azureresourcemanager",
            "ansible",
            "docker",
        ],
    ),
    ("sonar-python-plugin", &["py", "ipynb"]),
    ("sonar-ruby-plugin", &["ruby"]),
    ("sonar-java-symbolic-execution-plugin", &[]),
    ("sonar-go-plugin", &["go"]),
    ("sonar-javascript-plugin", &["js", "ts", "jsp"]),
    ("sonar-text-plugin", &["secrets"]),
    ("sonar-php-plugin", &["php"]),
    ("sonar-xml-plugin", &["xml"]),
    ("sonar-html-plugin", &["web", "css"]),
];

#[derive(Debug, Error)]
pub enum PluginSyncError {
    #[error(transparent)]
    Api(#[from] ServerApiError),

    #[error("Unable to create plugins directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to download plugin '{key}': HTTP status {code}")]
    DownloadFailed { key: String, code: u16 },

    #[error("Error writing plugin '{key}' to {path}: {source}")]
    Write {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error during cleanup of unknown plugins: {0}")]
    Cleanup(std::io::Error),
}

/// Result of a synchronization pass.
#[derive(Debug)]
pub struct SynchronizedAnalyzers {
    pub plugin_paths: Vec<PathBuf>,
    pub enabled_languages: BTreeSet<String>,
}

pub struct PluginsSynchronizer {
    server_api: Arc<ServerApi>,
    plugins_path: PathBuf,
}

impl PluginsSynchronizer {
    pub fn new(server_api: Arc<ServerApi>, storage_path: &std::path::Path) -> Self {
        Self {
            server_api,
            plugins_path: storage_path.join("plugins"),
        }
    }

    pub async fn synchronize(&self) -> Result<SynchronizedAnalyzers, PluginSyncError> {
        let installed = self.server_api.plugins_api().get_installed().await?;
        let server_plugins = installed.plugins;

        fs::create_dir_all(&self.plugins_path)
            .await
            .map_err(|source| PluginSyncError::CreateDirectory {
                path: self.plugins_path.clone(),
                source,
            })?;

        for plugin in &server_plugins {
            let Some(filename) = plugin.filename.as_deref() else {
                continue;
            };
            let local_path = self.plugins_path.join(filename);
            if plugin.sonarlint_supported && !local_path.exists() {
                self.download_plugin(&plugin.key, &local_path).await?;
            }
        }

        self.cleanup_unknown_plugins(&server_plugins).await?;

        Ok(self.list_local_plugins(&server_plugins))
    }

    async fn download_plugin(
        &self,
        key: &str,
        local_path: &std::path::Path,
    ) -> Result<(), PluginSyncError> {
        let response = self.server_api.plugins_api().download_plugin(key).await?;
        if !response.is_successful() {
            return Err(PluginSyncError::DownloadFailed {
                key: key.to_string(),
                code: response.code(),
            });
        }
        let temp_path = local_path.with_extension("jar.part");
        let write = async {
            fs::write(&temp_path, response.into_body()).await?;
            fs::rename(&temp_path, local_path).await
        };
        write.await.map_err(|source| PluginSyncError::Write {
            key: key.to_string(),
            path: local_path.to_path_buf(),
            source,
        })?;
        info!(plugin = key, path = %local_path.display(), "downloaded analyzer plugin");
        Ok(())
    }

    async fn cleanup_unknown_plugins(
        &self,
        server_plugins: &[sonar_serverapi::api::plugins::InstalledPlugin],
    ) -> Result<(), PluginSyncError> {
        let server_filenames: HashSet<&str> = server_plugins
            .iter()
            .filter_map(|plugin| plugin.filename.as_deref())
            .collect();

        let mut entries = fs::read_dir(&self.plugins_path)
            .await
            .map_err(PluginSyncError::Cleanup)?;
        while let Some(entry) = entries.next_entry().await.map_err(PluginSyncError::Cleanup)? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.ends_with(".jar") && !server_filenames.contains(name) {
                fs::remove_file(entry.path())
                    .await
                    .map_err(PluginSyncError::Cleanup)?;
                info!(path = %entry.path().display(), "removed unknown plugin file");
            }
        }
        Ok(())
    }

    fn list_local_plugins(
        &self,
        server_plugins: &[sonar_serverapi::api::plugins::InstalledPlugin],
    ) -> SynchronizedAnalyzers {
        let mut plugin_paths = Vec::new();
        let mut enabled_languages = BTreeSet::new();
        for plugin in server_plugins {
            let Some(filename) = plugin.filename.as_deref() else {
                continue;
            };
            let local_path = self.plugins_path.join(filename);
            if plugin.sonarlint_supported && local_path.exists() {
                plugin_paths.push(local_path);
                enabled_languages.extend(languages_for(filename).iter().map(|l| l.to_string()));
            }
        }
        info!(
            plugins = plugin_paths.len(),
            languages = ?enabled_languages,
            "synchronized analyzer plugins"
        );
        SynchronizedAnalyzers {
            plugin_paths,
            enabled_languages,
        }
    }
}

fn languages_for(filename: &str) -> &'static [&'static str] {
    SUPPORTED_LANGUAGES_BY_PLUGIN
        .iter()
        .find(|(prefix, _)| filename.starts_with(prefix))
        .map(|(_, languages)| *languages)
        .unwrap_or(&[])
}
