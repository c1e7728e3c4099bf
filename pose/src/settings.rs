use {
    crate::error::SettingsError,
    std::path::{Path, PathBuf},
};

/// Selects which components the consumer reads for one reference frame.
///
/// Extraction itself always computes full poses and velocities; these
/// flags only decide whether the pass for this frame runs at all.
/// Each flag is kept separately for the encoder that consumes the poses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct SpaceSettings {
    #[serde(default)]
    pub translations: bool,

    #[serde(default)]
    pub rotations: bool,

    #[serde(default)]
    pub linear_velocity: bool,
}

impl SpaceSettings {
    pub fn any(&self) -> bool {
        self.translations || self.rotations || self.linear_velocity
    }
}

/// Selects which reference frames pose extraction must update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct PoseSettings {
    #[serde(default = "default_model_space")]
    pub model_space: SpaceSettings,

    #[serde(default)]
    pub local_space: SpaceSettings,
}

impl Default for PoseSettings {
    fn default() -> Self {
        PoseSettings {
            model_space: default_model_space(),
            local_space: SpaceSettings::default(),
        }
    }
}

impl PoseSettings {
    pub fn uses_model_space(&self) -> bool {
        self.model_space.any()
    }

    pub fn uses_local_space(&self) -> bool {
        self.local_space.any()
    }

    pub fn from_ron_str(source: &str) -> Result<Self, SettingsError> {
        Ok(ron::de::from_str(source)?)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let file =
            std::fs::File::open(path).map_err(|source| SettingsError::Io {
                path: PathBuf::from(path),
                source,
            })?;
        Ok(ron::de::from_reader(file)?)
    }
}

fn default_model_space() -> SpaceSettings {
    SpaceSettings {
        translations: true,
        rotations: true,
        linear_velocity: false,
    }
}
