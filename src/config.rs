use std::path::Path;

use crate::foundation::error::{GraphicsError, GraphicsResult};

/// Environment override for [`GraphicsConfig::verify_main_thread`] (`0`/`1`/`true`/`false`).
pub const ENV_VERIFY_MAIN_THREAD: &str = "RETAINED_CANVAS_VERIFY_MAIN_THREAD";
/// Environment override for [`GraphicsConfig::max_fbo_dimension`].
pub const ENV_MAX_FBO_DIMENSION: &str = "RETAINED_CANVAS_MAX_FBO_DIMENSION";

/// Graphics configuration, read once when a [`GraphicsContext`](crate::GraphicsContext) is
/// created.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphicsConfig {
    /// Reject render-context operations from threads other than the owner.
    ///
    /// Defaults to `true`.
    pub verify_main_thread: bool,
    /// Largest accepted framebuffer width/height in pixels.
    ///
    /// Defaults to 8192; values above `u16::MAX` are rejected.
    pub max_fbo_dimension: u32,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            verify_main_thread: true,
            max_fbo_dimension: 8192,
        }
    }
}

impl GraphicsConfig {
    /// Defaults, overridden by `RETAINED_CANVAS_*` environment variables when set.
    pub fn from_env() -> GraphicsResult<Self> {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var(ENV_VERIFY_MAIN_THREAD) {
            cfg.verify_main_thread = parse_flag(ENV_VERIFY_MAIN_THREAD, &v)?;
        }
        if let Ok(v) = std::env::var(ENV_MAX_FBO_DIMENSION) {
            cfg.max_fbo_dimension = v.trim().parse::<u32>().map_err(|e| {
                GraphicsError::validation(format!("{ENV_MAX_FBO_DIMENSION}='{v}': {e}"))
            })?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> GraphicsResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| GraphicsError::validation(format!("invalid graphics config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphicsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| match e {
            GraphicsError::Validation(msg) => {
                GraphicsError::validation(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> GraphicsResult<()> {
        if self.max_fbo_dimension == 0 {
            return Err(GraphicsError::validation("max_fbo_dimension must be > 0"));
        }
        if self.max_fbo_dimension > u32::from(u16::MAX) {
            return Err(GraphicsError::validation(format!(
                "max_fbo_dimension must be <= {}",
                u16::MAX
            )));
        }
        Ok(())
    }
}

fn parse_flag(name: &str, v: &str) -> GraphicsResult<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GraphicsError::validation(format!(
            "{name}: expected a boolean, got '{v}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
