//! ReplayConfig - Config Loader output
//!
//! Describes how a recorded sample stream maps onto a video and which HUD is drawn on top.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Complete replay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReplayConfig {
    /// Video window
    #[serde(default)]
    pub video: VideoConfig,

    /// Data stream settings
    #[serde(default)]
    #[validate(nested)]
    pub data: DataConfig,

    /// HUD selection
    #[serde(default)]
    #[validate(nested)]
    pub hud: HudConfig,

    /// BOOSTER mode parameters
    #[serde(default)]
    #[validate(nested)]
    pub booster: BoosterConfig,

    /// SWINGBOAT mode parameters
    #[serde(default)]
    pub swingboat: SwingboatConfig,

    /// Orientation widget settings
    #[serde(default)]
    pub orientation: OrientationConfig,

    /// Output display density
    #[serde(default)]
    #[validate(nested)]
    pub display: DisplayConfig,

    /// Trailing G-force graph
    #[serde(default)]
    #[validate(nested)]
    pub graph: GraphConfig,
}

/// Video window, in milliseconds on the video clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// First millisecond of the video that carries data
    #[serde(default)]
    pub startoff: u64,

    /// Last millisecond of the video that carries data (0 = until the end)
    #[serde(default)]
    pub endoff: u64,
}

impl VideoConfig {
    /// End offset as an option, `None` when unset
    pub fn end(&self) -> Option<u64> {
        (self.endoff > 0).then_some(self.endoff)
    }
}

/// Data stream settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DataConfig {
    /// Offset of the IMU clock against the video clock (ms)
    #[serde(default)]
    pub startoff: u64,

    /// Mounting orientation of the IMU
    #[serde(default)]
    pub imu_orientation: QuatConfig,

    /// Low-pass coefficient for pressure (0 or 1 = off)
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub pressure_coeff: f64,
}

/// Quaternion as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatConfig {
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl QuatConfig {
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.w == 0.0 && self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Scalar-first array, with an all-zero quaternion read as identity
    pub fn to_wxyz(&self) -> [f64; 4] {
        if self.is_zero() {
            [1.0, 0.0, 0.0, 0.0]
        } else {
            [self.w, self.x, self.y, self.z]
        }
    }
}

impl Default for QuatConfig {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// HUD selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct HudConfig {
    /// Which strategy draws the overlay
    #[serde(default)]
    pub mode: HudMode,

    /// Altitude of the ground reference (m above sea level)
    #[serde(default)]
    pub altitude_ground: f64,
}

/// HUD mode tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HudMode {
    #[default]
    Normal,
    Booster,
    Swingboat,
}

impl HudMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Booster => "booster",
            Self::Swingboat => "swingboat",
        }
    }
}

impl std::fmt::Display for HudMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BOOSTER mode parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BoosterConfig {
    /// Arm radius (m)
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub radius: f64,
}

/// SWINGBOAT mode parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingboatConfig {
    /// Where in the gondola the sensor was mounted
    #[serde(default)]
    pub position: SwingboatPosition,
}

/// Mount position inside a swing-ride gondola
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingboatPosition {
    #[default]
    Back,
    Middle,
    Front,
}

/// Orientation widget settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationConfig {
    #[serde(default)]
    pub mode: OrientationMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    #[default]
    Normal,
}

/// Output display density
///
/// `dpi` scales device-independent geometry, `spi` scales text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct DisplayConfig {
    #[serde(default = "default_density")]
    #[validate(range(exclusive_min = 0.0))]
    pub dpi: f64,

    #[serde(default = "default_density")]
    #[validate(range(exclusive_min = 0.0))]
    pub spi: f64,
}

fn default_density() -> f64 {
    141.21
}

impl DisplayConfig {
    /// Density-independent pixels to device pixels
    pub fn dp2px(&self, dp: f64) -> f64 {
        dp * self.dpi / 160.0
    }

    /// Scale-independent pixels to device pixels
    pub fn sp2px(&self, sp: f64) -> f64 {
        sp * self.spi / 160.0
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dpi: default_density(),
            spi: default_density(),
        }
    }
}

/// Trailing G-force graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    /// Visible time window (µs)
    #[serde(default = "default_graph_window")]
    #[validate(range(min = 1))]
    pub window_us: u64,

    /// G value at the top edge of the graph
    #[serde(default = "default_max_g")]
    #[validate(range(exclusive_min = 0.0))]
    pub max_g: f64,

    /// G value where the colour gradient reaches full red
    #[serde(default = "default_redline_g")]
    #[validate(range(exclusive_min = 0.0))]
    pub redline_g: f64,
}

fn default_graph_window() -> u64 {
    10_000_000
}

fn default_max_g() -> f64 {
    3.0
}

fn default_redline_g() -> f64 {
    5.0
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            window_us: default_graph_window(),
            max_g: default_max_g(),
            redline_g: default_redline_g(),
        }
    }
}
