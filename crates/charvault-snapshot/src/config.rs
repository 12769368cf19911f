//! Review display configuration.

use crate::preview::PreviewLimits;
use serde::{Deserialize, Serialize};

/// Configuration for the snapshot review view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Rows shown before a section collapses.
    pub max_preview_lines: usize,

    /// Characters shown before a section collapses.
    pub max_preview_chars: usize,

    /// Whether unchanged sections are listed too.
    pub show_unchanged: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let limits = PreviewLimits::default();
        Self {
            max_preview_lines: limits.max_lines,
            max_preview_chars: limits.max_chars,
            show_unchanged: false,
        }
    }
}

impl ReviewConfig {
    pub fn preview_limits(&self) -> PreviewLimits {
        PreviewLimits {
            max_lines: self.max_preview_lines,
            max_chars: self.max_preview_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ReviewConfig = serde_json::from_str(r#"{"show_unchanged": true}"#).unwrap();
        assert!(config.show_unchanged);
        assert_eq!(config.preview_limits(), PreviewLimits::default());
    }
}
