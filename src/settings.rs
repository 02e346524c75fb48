use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Batching and layer-lifetime tunables for a render queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Instance count at which a mesh entry is flagged for instanced
    /// submission.
    #[serde(default = "QueueSettings::default_instancing_threshold")]
    pub instancing_threshold: usize,
    /// Consecutive lightweight clears without repopulation before a layer
    /// is dropped.
    #[serde(default = "QueueSettings::default_layer_idle_limit")]
    pub layer_idle_limit: u32,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            instancing_threshold: Self::default_instancing_threshold(),
            layer_idle_limit: Self::default_layer_idle_limit(),
        }
    }
}

impl QueueSettings {
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<QueueSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded queue settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default queue settings.",
                        path, err
                    );
                    QueueSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Queue settings file {:?} not found. Using default settings.",
                    path
                );
                QueueSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default queue settings.",
                    path, err
                );
                QueueSettings::default()
            }
        }
    }

    pub(crate) fn validate(mut self) -> Self {
        if self.instancing_threshold == 0 {
            warn!("Instancing threshold must be greater than zero. Using default value.");
            self.instancing_threshold = Self::default_instancing_threshold();
        }

        if self.layer_idle_limit == 0 {
            warn!("Layer idle limit must be greater than zero. Using default value.");
            self.layer_idle_limit = Self::default_layer_idle_limit();
        }

        self
    }

    const fn default_instancing_threshold() -> usize {
        32
    }

    const fn default_layer_idle_limit() -> u32 {
        100
    }
}
