use serde::Deserialize;

use swarmviz_common::Versioned;
use swarmviz_engine::{ChartConfig, HeatmapConfig, SceneConfig};

/// Current version
pub const CVERSION: usize = 1;

/// Configuration for the CLI tool: surface sizes and scaling of the different views.
///
/// ```hcl
/// version = 1
///
/// scene {
///   width = 1200
///   mode  = "world"
/// }
/// ```
///
#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: usize,
    /// Projection view
    #[serde(default)]
    pub scene: SceneConfig,
    /// State heatmap
    #[serde(default)]
    pub heatmap: HeatmapConfig,
    /// Battery timeline chart
    #[serde(default)]
    pub timeline: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: CVERSION,
            scene: SceneConfig::default(),
            heatmap: HeatmapConfig::default(),
            timeline: ChartConfig::default(),
        }
    }
}

impl Versioned for Config {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use swarmviz_common::{ConfigError, ConfigFile};
    use swarmviz_engine::ScaleMode;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();

        assert_eq!(CVERSION, cfg.version());
        assert_eq!(ScaleMode::Frame, cfg.scene.mode);
        assert_eq!(900., cfg.heatmap.width);
        assert_eq!(400., cfg.timeline.height);
    }

    #[test]
    fn test_config_partial_blocks() {
        let data = r##"
version = 1

scene {
  width = 1200
  mode = "world"
}
"##;
        let cfg = ConfigFile::<Config>::decode(data).unwrap();

        assert_eq!(1200., cfg.scene.width);
        assert_eq!(600., cfg.scene.height);
        assert_eq!(ScaleMode::World, cfg.scene.mode);
        assert_eq!(100., cfg.scene.world_max);
        assert_eq!(HeatmapConfig::default(), cfg.heatmap);
    }

    #[test]
    fn test_config_bad_version() {
        let err = ConfigFile::<Config>::decode("version = 2\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::BadFileVersion(2, 1))
        ));
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = 1\ntimeline {{\n  width = 640\n}}").unwrap();

        let cfg = ConfigFile::<Config>::load(Some(file.path())).unwrap();
        assert_eq!(640., cfg.inner().timeline.width);
        assert!(cfg.source().is_some());
    }
}
