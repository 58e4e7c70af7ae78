use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Status, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Background of the card slot a drag would drop into
    pub drop_target_bg: Color,
    /// Per-stage accent colors (column titles)
    pub stage_colors: HashMap<Status, Color>,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let purple = Color::Rgb(0xCC, 0x66, 0xFF);
        let blue = Color::Rgb(0x44, 0x88, 0xFF);
        let cyan = Color::Rgb(0x44, 0xDD, 0xFF);
        let yellow = Color::Rgb(0xFF, 0xD7, 0x00);
        let green = Color::Rgb(0x44, 0xFF, 0x88);
        let red = Color::Rgb(0xFF, 0x44, 0x44);

        let stage_colors = HashMap::from([
            (Status::Wishlist, purple),
            (Status::Applied, blue),
            (Status::Interview, cyan),
            (Status::Offer, yellow),
            (Status::Rejected, red),
            (Status::Accepted, green),
        ]);

        let mut tag_colors = HashMap::new();
        tag_colors.insert("remote".into(), cyan);
        tag_colors.insert("referral".into(), green);
        tag_colors.insert("urgent".into(), red);

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red,
            yellow,
            green,
            cyan,
            purple,
            blue,
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            drop_target_bg: Color::Rgb(0x1F, 0x2A, 0x4A),
            stage_colors,
            tag_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from board UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        // Apply color overrides from [ui.colors]
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::debug!(key, value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "drop_target_bg" => theme.drop_target_bg = color,
                _ => {}
            }
        }

        // [ui.stage_colors], keyed by stage name
        for (stage, value) in &ui.stage_colors {
            if let (Ok(status), Some(color)) = (stage.parse::<Status>(), parse_hex_color(value)) {
                theme.stage_colors.insert(status, color);
            }
        }

        // [ui.tag_colors]
        for (tag, value) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        theme
    }

    /// Get the accent color for a stage, falling back to bright text
    pub fn stage_color(&self, status: Status) -> Color {
        self.stage_colors
            .get(&status)
            .copied()
            .unwrap_or(self.text_bright)
    }

    /// Get the color for a tag, falling back to text color
    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.text)
    }
}
