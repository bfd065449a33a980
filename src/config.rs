//! Tuning constants and the serde-loadable configuration record.
//!
//! The level-of-detail cutoffs and the edge margin are presentation constants.
//! They are configurable, but the defaults reproduce the classic look.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default node radius in scene units.
pub const RADIUS: f32 = 30.0;

/// Default node border (pen) width.
pub const NODE_BORDER_WIDTH: f32 = 1.0;

/// Width used by self-loops and by edges given an invalid width.
pub const DEFAULT_EDGE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub default_radius: f32,
    /// Extra gap between a node border and the visible end of an edge.
    pub edge_margin: f32,
    /// Self-loop control points sit this many radii away from the node.
    pub self_loop_reach: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            default_radius: RADIUS,
            edge_margin: 1.0,
            self_loop_reach: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Below this level of detail nodes collapse to a filled box and edges vanish.
    pub lod_simplified: f32,
    /// Above this level of detail labels and pixmaps are drawn.
    pub lod_decorations: f32,
    /// Scale of the clip outline used for pie slices.
    pub pie_inset: f32,
    /// Segments used when sampling curves for hit testing.
    pub hit_samples: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lod_simplified: 0.1,
            lod_decorations: 0.4,
            pie_inset: 0.85,
            hit_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Padding added around the items bounds to form the scene rect.
    pub scene_margin: f32,
    /// Padding the minimap keeps around the scene rect.
    pub minimap_margin: f32,
    /// Minimap edge length in pixels.
    pub minimap_size: f32,
    /// Wheel delta that doubles the zoom.
    pub wheel_step: f32,
    /// Pixel margin kept by `fit_in_view`.
    pub fit_margin: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scene_margin: 30.0,
            minimap_margin: 20.0,
            minimap_size: 200.0,
            wheel_step: 240.0,
            fit_margin: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub geometry: GeometryConfig,
    pub render: RenderConfig,
    pub view: ViewConfig,
}

impl SceneConfig {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
