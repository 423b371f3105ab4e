use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::inference::preprocess::PreprocessOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub image: ImageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub size: Vec<u32>,
    pub resize_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            image: ImageConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/stroke_detection.onnx".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size: vec![224, 224],
            resize_filter: "triangle".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => format!("{}/../config/app.yaml", manifest_dir),
            Err(_) => "config/app.yaml".to_string(),
        };

        match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                let config: AppConfig = serde_yaml::from_str(&config_str)?;
                Ok(config)
            }
            Err(_) => {
                log::warn!("Config file {} not found, using defaults", config_path);
                Ok(Self::default())
            }
        }
    }

    pub fn to_preprocess_options(&self) -> PreprocessOptions {
        let (width, height) = match self.image.size.as_slice() {
            [w, h, ..] => (*w, *h),
            [s] => (*s, *s),
            [] => (224, 224),
        };

        let filter = match filter_from_name(&self.image.resize_filter) {
            Some(filter) => filter,
            None => {
                log::warn!(
                    "Unknown resize filter '{}', falling back to triangle",
                    self.image.resize_filter
                );
                FilterType::Triangle
            }
        };

        PreprocessOptions {
            width,
            height,
            filter,
        }
    }
}

pub fn filter_from_name(name: &str) -> Option<FilterType> {
    match name {
        "nearest" => Some(FilterType::Nearest),
        "triangle" => Some(FilterType::Triangle),
        "catmull-rom" => Some(FilterType::CatmullRom),
        "gaussian" => Some(FilterType::Gaussian),
        "lanczos3" => Some(FilterType::Lanczos3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_model_contract() {
        let config = AppConfig::default();
        let options = config.to_preprocess_options();
        assert_eq!(options.width, 224);
        assert_eq!(options.height, 224);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("image:\n  resize_filter: lanczos3\n").unwrap();
        assert_eq!(config.image.resize_filter, "lanczos3");
        assert_eq!(config.image.size, vec![224, 224]);
        assert_eq!(config.model.path, "models/stroke_detection.onnx");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn unknown_filter_falls_back_to_triangle() {
        let mut config = AppConfig::default();
        config.image.resize_filter = "bicubic".to_string();
        let options = config.to_preprocess_options();
        assert_eq!(options.filter, FilterType::Triangle);
    }

    #[test]
    fn known_filter_names_resolve() {
        assert_eq!(filter_from_name("nearest"), Some(FilterType::Nearest));
        assert_eq!(filter_from_name("lanczos3"), Some(FilterType::Lanczos3));
        assert_eq!(filter_from_name("box"), None);
    }
}
