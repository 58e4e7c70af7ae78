use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::{board_io, config_io};
use crate::model::{StageOrder, Status};

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"
# Columns, left to right. Any of:
# wishlist, applied, interview, offer, rejected, accepted
stages = [{stages}]

[virtualization]
# Columns with this many cards or fewer are always rendered in full
threshold = 10
# Extra cards rendered above and below the visible ones
overscan = 3
# Rows per card, including the gap below it
card_height = 3

[drag]
# Cells the mouse must travel before a press turns into a drag
activation_distance = 3.0

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = true
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# green = "#44FF88"
#
# [ui.stage_colors]
# offer = "#44FF88"
# rejected = "#FF4444"
"##;

/// Infer a board name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render board.toml for the given name and column order.
fn render_board_toml(name: &str, order: &StageOrder) -> String {
    let stages: Vec<String> = order
        .stages()
        .iter()
        .map(|s| format!("\"{}\"", s.key()))
        .collect();
    BOARD_TOML_TEMPLATE
        .replace("{name}", &name.replace('\\', "\\\\").replace('"', "\\\""))
        .replace("{stages}", &stages.join(", "))
}

fn parse_order(stages: &[String]) -> Result<Option<StageOrder>, Box<dyn std::error::Error>> {
    if stages.is_empty() {
        return Ok(None);
    }
    let stages = stages
        .iter()
        .map(|s| s.parse::<Status>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(StageOrder::new(stages)?))
}

/// Apply --name and --stages to an existing board.toml, keeping the rest
/// of the file as the user left it. Returns false if the file can't be
/// parsed and should be replaced instead.
fn update_existing(
    data_dir: &Path,
    name: Option<&str>,
    order: Option<&StageOrder>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (config, mut doc) = match config_io::read_config_doc(data_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!(error = %e, "replacing unreadable board.toml");
            return Ok(false);
        }
    };
    if let Some(name) = name {
        config_io::set_board_name(&mut doc, name);
    }
    if let Some(order) = order {
        config_io::set_stages(&mut doc, order);
    }
    config_io::write_config(data_dir, &doc)?;

    let shown_name = name.unwrap_or(&config.board.name);
    println!("Reinitialized jobtrack board: {}", shown_name);
    Ok(true)
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = super::start_dir()?;
    let data_dir = cwd.join(board_io::DATA_DIR);
    let order = parse_order(&args.stages)?;

    if data_dir.is_dir() {
        if !args.force {
            return Err(
                "jobtrack board already exists in ./jobtrack/ (use --force to reinitialize)".into(),
            );
        }
        if data_dir.join(board_io::CONFIG_FILE).exists()
            && update_existing(&data_dir, args.name.as_deref(), order.as_ref())?
        {
            return Ok(());
        }
    }

    // Check for parent board and warn
    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!(
            "Note: parent board found at {}/",
            parent_root.join(board_io::DATA_DIR).display()
        );
        eprintln!("Creating new board in ./jobtrack/");
    }

    let order = order.unwrap_or_default();
    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Job Search".to_string())
    });

    let toml_content = render_board_toml(&name, &order);
    board_io::init_board(&cwd, &toml_content, args.force)?;

    println!("Initialized jobtrack board: {}", name);
    let labels: Vec<&str> = order.stages().iter().map(|s| s.label()).collect();
    println!("  columns: {}", labels.join(" | "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoardConfig;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("job-search-2026"), "Job Search 2026");
        assert_eq!(infer_name("jobs"), "Jobs");
        assert_eq!(infer_name("my_next_role"), "My Next Role");
    }

    #[test]
    fn test_render_board_toml_parses() {
        let order = StageOrder::new(vec![Status::Applied, Status::Interview, Status::Offer]).unwrap();
        let text = render_board_toml("Autumn \"26\"", &order);
        assert!(text.contains("stages = [\"applied\", \"interview\", \"offer\"]"));
        let config: BoardConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.board.name, "Autumn \"26\"");
        assert_eq!(config.board.stages, order);
        assert_eq!(config.virtualization.threshold, 10);
        assert_eq!(config.drag.activation_distance, 3.0);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order(&[]).unwrap(), None);
        assert_eq!(
            parse_order(&["offer".into(), "Applied".into()]).unwrap(),
            Some(StageOrder::new(vec![Status::Offer, Status::Applied]).unwrap())
        );
        assert!(parse_order(&["offer".into(), "offer".into()]).is_err());
    }

    #[test]
    fn test_update_existing_keeps_other_settings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let order = StageOrder::default();
        let mut text = render_board_toml("Old", &order);
        text = text.replace("overscan = 3", "overscan = 7");
        let data_dir = board_io::init_board(tmp.path(), &text, false).unwrap();

        let new_order = StageOrder::new(vec![Status::Applied, Status::Offer]).unwrap();
        assert!(update_existing(&data_dir, Some("New"), Some(&new_order)).unwrap());

        let config = config_io::read_config(&data_dir).unwrap();
        assert_eq!(config.board.name, "New");
        assert_eq!(config.board.stages, new_order);
        assert_eq!(config.virtualization.overscan, 7);
    }

    #[test]
    fn test_update_existing_gives_up_on_broken_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let data_dir = tmp.path().join(board_io::DATA_DIR);
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join(board_io::CONFIG_FILE), "not toml [").unwrap();
        assert!(!update_existing(&data_dir, None, None).unwrap());
    }

    #[test]
    fn test_default_template_has_all_stages() {
        let config: BoardConfig =
            toml::from_str(&render_board_toml("x", &StageOrder::default())).unwrap();
        assert_eq!(config.board.stages.stages(), &Status::ALL);
    }
}
