//! Host configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use rescuear_core::speech::VoiceSettings;
use rescuear_tracking::domain::options::{PlaneDetection, TrackingOptions};

use crate::error::AppError;

const DEFAULT_MODEL_PATH: &str = "Male.usdz";
const DEFAULT_SENSOR_FPS: u32 = 60;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format {other:?}; expected json or pretty")),
        }
    }
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Procedure YAML; the built-in CPR procedure when unset.
    pub procedure_path: Option<PathBuf>,
    /// 3D model asset.
    pub model_path: PathBuf,
    /// Plane detection requested from the sensor.
    pub tracking: TrackingOptions,
    /// Narration voice.
    pub voice: VoiceSettings,
    /// Simulated sensor frame rate.
    pub sensor_fps: u32,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            procedure_path: None,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            tracking: TrackingOptions::default(),
            voice: VoiceSettings::default(),
            sensor_fps: DEFAULT_SENSOR_FPS,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.procedure_path = var("RESCUEAR_PROCEDURE_PATH").map(PathBuf::from);
        if let Some(path) = var("RESCUEAR_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(value) = var("RESCUEAR_PLANE_DETECTION") {
            config.tracking.plane_detection = value
                .parse::<PlaneDetection>()
                .map_err(|e| AppError::Config(format!("RESCUEAR_PLANE_DETECTION: {e}")))?;
        }
        if let Some(language) = var("RESCUEAR_SPEECH_LANGUAGE") {
            config.voice.language = language.trim().to_owned();
        }
        if let Some(value) = var("RESCUEAR_SPEECH_RATE") {
            let rate: f32 = value.trim().parse().map_err(|e| {
                AppError::Config(format!("RESCUEAR_SPEECH_RATE must be a number: {e}"))
            })?;
            if !(0.0..=1.0).contains(&rate) {
                return Err(AppError::Config(format!(
                    "RESCUEAR_SPEECH_RATE must be within [0.0, 1.0], got {rate}"
                )));
            }
            config.voice.rate = rate;
        }
        if let Some(value) = var("RESCUEAR_SENSOR_FPS") {
            let fps: u32 = value.trim().parse().map_err(|e| {
                AppError::Config(format!("RESCUEAR_SENSOR_FPS must be a positive integer: {e}"))
            })?;
            if fps == 0 {
                return Err(AppError::Config(
                    "RESCUEAR_SENSOR_FPS must be a positive integer".into(),
                ));
            }
            config.sensor_fps = fps;
        }
        if let Some(value) = var("RESCUEAR_LOG_FORMAT") {
            config.log_format = value
                .parse()
                .map_err(|e| AppError::Config(format!("RESCUEAR_LOG_FORMAT: {e}")))?;
        }

        Ok(config)
    }
}
