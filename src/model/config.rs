use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::status::StageOrder;

/// Configuration from board.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub virtualization: VirtualizationConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
    /// Column order, left to right
    #[serde(default)]
    pub stages: StageOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualizationConfig {
    /// Columns with this many cards or fewer are rendered in full.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Extra cards rendered above and below the viewport
    #[serde(default = "default_overscan")]
    pub overscan: usize,
    /// Rows per card, including the gap below it
    #[serde(default = "default_card_height")]
    pub card_height: u16,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        VirtualizationConfig {
            threshold: default_threshold(),
            overscan: default_overscan(),
            card_height: default_card_height(),
        }
    }
}

fn default_threshold() -> usize {
    10
}

fn default_overscan() -> usize {
    3
}

fn default_card_height() -> u16 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pointer travel (in cells) before a press becomes a drag
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            activation_distance: default_activation_distance(),
        }
    }
}

fn default_activation_distance() -> f64 {
    3.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-stage accent colors keyed by stage (e.g. `offer = "#44FF88"`)
    #[serde(default)]
    pub stage_colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: BoardConfig = toml::from_str("[board]\nname = \"Search\"\n").unwrap();
        assert_eq!(config.board.name, "Search");
        assert_eq!(config.board.stages.stages(), &Status::ALL);
        assert_eq!(config.virtualization.threshold, 10);
        assert_eq!(config.virtualization.overscan, 3);
        assert_eq!(config.virtualization.card_height, 3);
        assert_eq!(config.drag.activation_distance, 3.0);
        assert!(!config.ui.show_key_hints);
    }

    #[test]
    fn custom_stage_order() {
        let text = r#"
[board]
name = "Search"
stages = ["applied", "interview", "offer"]

[virtualization]
overscan = 1
"#;
        let config: BoardConfig = toml::from_str(text).unwrap();
        assert_eq!(
            config.board.stages.stages(),
            &[Status::Applied, Status::Interview, Status::Offer]
        );
        assert_eq!(config.virtualization.overscan, 1);
        assert_eq!(config.virtualization.threshold, 10);
    }

    #[test]
    fn duplicate_stage_is_a_parse_error() {
        let text = "[board]\nname = \"x\"\nstages = [\"offer\", \"offer\"]\n";
        assert!(toml::from_str::<BoardConfig>(text).is_err());
    }
}
