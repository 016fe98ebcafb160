//! Wall and server configuration
//!
//! `WallConfig` is what the presentation layer sends on Initialize. It is
//! validated once and then immutable for the lifetime of a session.
//! `ServerConfig` is read from the environment (and `.env`) by the binaries.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WallError};

/// Width of a half brick in modules (a module is a quarter brick).
pub const HALF_BRICK: u32 = 2;

/// Default arm reach: 800 mm over a 220 mm brick, in modules.
pub const DEFAULT_STRIDE_WIDTH: u32 = 14;

/// Default arm reach: 1300 mm over a 65.5 mm course, in courses.
pub const DEFAULT_STRIDE_HEIGHT: u32 = 19;

/// Largest accepted wall width, in half bricks.
pub const MAX_WIDTH: u32 = 500;

/// Largest accepted wall height, in courses.
pub const MAX_HEIGHT: u32 = 500;

// =============================================================================
// BOND / MODE
// =============================================================================

/// Masonry bond governing brick widths and course offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bond {
    Stretcher,
    Flemish,
    English,
    Wildverband,
}

impl Bond {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bond::Stretcher => "stretcher",
            Bond::Flemish => "flemish",
            Bond::English => "english",
            Bond::Wildverband => "wildverband",
        }
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bond {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stretcher" => Ok(Bond::Stretcher),
            "flemish" => Ok(Bond::Flemish),
            "english" => Ok(Bond::English),
            "wildverband" | "wild" => Ok(Bond::Wildverband),
            _ => Err(WallError::invalid_config(
                "bond",
                s,
                "expected one of stretcher, flemish, english, wildverband",
            )),
        }
    }
}

/// How the wall is divided into strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    LeftToRight,
    OptimalStrides,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::LeftToRight => "left-to-right",
            BuildMode::OptimalStrides => "optimal-strides",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left-to-right" => Ok(BuildMode::LeftToRight),
            "optimal-strides" => Ok(BuildMode::OptimalStrides),
            _ => Err(WallError::invalid_config(
                "mode",
                s,
                "expected left-to-right or optimal-strides",
            )),
        }
    }
}

// =============================================================================
// WALL CONFIG
// =============================================================================

/// Validated wall configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallConfig {
    /// Wall width in half bricks
    pub width: u32,
    /// Number of courses
    pub height: u32,
    pub bond: Bond,
    pub mode: BuildMode,
}

impl WallConfig {
    /// Validate raw request values.
    ///
    /// Dimensions arrive signed so that zero and negative values are reported
    /// as `InvalidConfig` instead of failing deserialization.
    pub fn new(width: i64, height: i64, bond: &str, mode: &str) -> Result<Self> {
        let width = positive_dimension("width", width, MAX_WIDTH)?;
        let height = positive_dimension("height", height, MAX_HEIGHT)?;
        Ok(Self {
            width,
            height,
            bond: bond.parse()?,
            mode: mode.parse()?,
        })
    }

    /// Width of every course in modules.
    pub fn course_span(&self) -> u32 {
        self.width * HALF_BRICK
    }

    /// Seed for the randomized bonds, stable for identical input.
    pub fn seed(&self) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(self.bond.as_str().as_bytes());
        let digest = hasher.finalize();
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(seed)
    }
}

fn positive_dimension(field: &str, value: i64, max: u32) -> Result<u32> {
    if value < 1 {
        return Err(WallError::invalid_config(field, value, "must be positive"));
    }
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| WallError::invalid_config(field, value, format!("must not exceed {max}")))
}

/// Maximum stride footprint a builder can cover without repositioning.
///
/// Both sides are non-zero; the only constructors are `new` and `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReachEnvelope {
    width: u32,
    height: u32,
}

impl ReachEnvelope {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 {
            return Err(WallError::invalid_config("stride_width", width, "must be positive"));
        }
        if height == 0 {
            return Err(WallError::invalid_config("stride_height", height, "must be positive"));
        }
        Ok(Self { width, height })
    }

    /// Maximum stride width in modules
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Maximum stride height in courses
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for ReachEnvelope {
    fn default() -> Self {
        Self {
            width: DEFAULT_STRIDE_WIDTH,
            height: DEFAULT_STRIDE_HEIGHT,
        }
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub reach: ReachEnvelope,
    /// Built presentation assets, served at `/` when set
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Create from environment variables, loading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("WALL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", 8000u16)?;
        let reach = ReachEnvelope::new(
            env_or("WALL_STRIDE_WIDTH", DEFAULT_STRIDE_WIDTH)?,
            env_or("WALL_STRIDE_HEIGHT", DEFAULT_STRIDE_HEIGHT)?,
        )?;
        let static_dir = std::env::var("WALL_STATIC_DIR").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            reach,
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            reach: ReachEnvelope::default(),
            static_dir: None,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}
