use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::paths;
use crate::units::MeasurementUnit;

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub measurement: MeasurementConfig,
    pub tracking: TrackingConfig,
    pub markers: MarkerConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Unit selected when a tracking session starts
    pub default_unit: MeasurementUnit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    /// Latency of the hit-test capability request
    pub hit_test_delay_ms: u64,
    /// When false the capability is never granted
    pub hit_test_available: bool,
    /// Surface hits farther than this (meters) count as no hit
    pub max_hit_distance: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            hit_test_delay_ms: 750,
            hit_test_available: true,
            max_hit_distance: 8.0,
        }
    }
}

/// Marker sizes in meters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
    pub point_radius: f32,
    pub line_radius: f32,
    pub reticle_inner_radius: f32,
    pub reticle_outer_radius: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            point_radius: 0.02,
            line_radius: 0.004,
            reticle_inner_radius: 0.04,
            reticle_outer_radius: 0.05,
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(load_config());
    }
}

pub fn load_config() -> AppConfig {
    let path = paths::config_file();
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    warn!("Failed to parse config: {}, using defaults", e);
                    return AppConfig::default();
                }
            },
            Err(e) => {
                warn!("Failed to read config: {}, using defaults", e);
                return AppConfig::default();
            }
        }
    }

    let config = AppConfig::default();
    save_config(&config);
    config
}

pub fn save_config(config: &AppConfig) {
    let path = paths::config_file();
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent);
    }
    match toml::to_string_pretty(config) {
        Ok(contents) => {
            if let Err(e) = fs::write(&path, contents) {
                error!("Failed to write config: {}", e);
            } else {
                info!("Saved config to {:?}", path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}
