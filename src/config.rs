//! Explorer configuration.
//!
//! Every tunable constant (window size, camera steps, scene layout, progress
//! animation) lives in one `ExplorerConfig` that round-trips through TOML.
//! Each section is `#[serde(default)]`, so a partial file only overrides the
//! keys it names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Seed for simulated preview bytes and timestamps. Entropy when absent.
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub azimuth_step: f32,
    pub elevation_step: f32,
    pub zoom_step: f32,
    pub drag_sensitivity: f32,
    pub idle_step: f32,
    pub idle_period_ms: u64,
    pub fov_deg: f32,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub max_cubes: usize,
    pub spiral_base: f32,
    pub spiral_step: f32,
    pub spiral_angle: f32,
    pub depth_offset: f32,
    pub cube_scale: f32,
    pub row_height: f64,
    pub indent: f64,
    pub progress_start: f64,
    pub progress_step: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "Charon - Digital Forensics Tool".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth_step: 5.0,
            elevation_step: 5.0,
            zoom_step: 1.0,
            drag_sensitivity: 0.5,
            idle_step: 0.2,
            idle_period_ms: 50,
            fov_deg: 45.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_cubes: 20,
            spiral_base: 1.0,
            spiral_step: 0.2,
            spiral_angle: 0.5,
            depth_offset: 0.5,
            cube_scale: 0.1,
            row_height: 25.0,
            indent: 15.0,
            progress_start: 0.45,
            progress_step: 0.001,
        }
    }
}

impl CameraConfig {
    pub fn idle_period(&self) -> Duration {
        Duration::from_millis(self.idle_period_ms.max(1))
    }
}

impl ExplorerConfig {
    /// Serialize as pretty TOML. Fails for seeds beyond the TOML integer
    /// range (`i64::MAX`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default path
    /// is tried and a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

/// `$XDG_CONFIG_HOME/charon/config.toml`, falling back to `~/.config`.
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("charon").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_constants() {
        let c = ExplorerConfig::default();
        assert_eq!(c.window.width, 1200);
        assert_eq!(c.window.height, 800);
        assert!((c.camera.idle_step - 0.2).abs() < f32::EPSILON);
        assert_eq!(c.camera.idle_period(), Duration::from_millis(50));
        assert_eq!(c.scene.max_cubes, 20);
        assert!((c.scene.progress_start - 0.45).abs() < f64::EPSILON);
        assert!(c.seed.is_none());
    }

    #[test]
    fn toml_roundtrip() {
        let mut base = ExplorerConfig::default();
        base.seed = Some(42);
        base.camera.fov_deg = 60.0;
        let parsed = ExplorerConfig::from_toml(&base.to_toml().unwrap()).expect("roundtrip parse failed");
        assert_eq!(parsed.seed, Some(42));
        assert!((parsed.camera.fov_deg - 60.0).abs() < f32::EPSILON);
        assert_eq!(parsed.window.title, base.window.title);
    }

    #[test]
    fn seed_beyond_toml_integer_range_fails_to_serialize() {
        let mut c = ExplorerConfig::default();
        c.seed = Some(u64::MAX);
        assert!(c.to_toml().is_err());
        c.seed = Some(i64::MAX as u64);
        assert!(c.to_toml().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let partial = r#"
[camera]
zoom_step = 2.5

[scene]
max_cubes = 5
"#;
        let c = ExplorerConfig::from_toml(partial).expect("partial parse failed");
        assert!((c.camera.zoom_step - 2.5).abs() < f32::EPSILON);
        assert_eq!(c.scene.max_cubes, 5);
        assert!((c.camera.azimuth_step - 5.0).abs() < f32::EPSILON);
        assert_eq!(c.window.width, 1200);
    }

    #[test]
    fn invalid_toml_is_error() {
        assert!(ExplorerConfig::from_toml("window = [[ nope").is_err());
    }

    #[test]
    fn zero_idle_period_is_floored() {
        let mut c = CameraConfig::default();
        c.idle_period_ms = 0;
        assert_eq!(c.idle_period(), Duration::from_millis(1));
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 7\n[window]\nwidth = 640").unwrap();
        let c = ExplorerConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.window.width, 640);
        assert_eq!(c.window.height, 800);
    }

    #[test]
    fn load_missing_explicit_file_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = ExplorerConfig::load(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scene\nmax_cubes = ").unwrap();
        assert!(ExplorerConfig::load(Some(file.path())).is_err());
    }
}
