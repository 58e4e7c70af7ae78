mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global override for board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::board::WindowConfig;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, BoardError};
use crate::io::config_io;
use crate::io::lock::{CLI_TIMEOUT, with_lock};
use crate::model::{Board, StageOrder, Status};
use crate::ops::application_ops::{self, ApplicationError, NewApplication};
use crate::ops::partition::{column_indices, column_position, partition};
use crate::ops::reorder::DropTarget;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for load_board_cwd()
    if let Some(ref dir) = cli.board_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        set_board_dir_override(abs);
    }

    match cli.command {
        None => Err("no command given (run `jt` without arguments for the board)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Window(args) => cmd_window(args, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Mv(args) => cmd_mv(args, json),
            Commands::Status(args) => cmd_status(args, json),
            Commands::Stages(args) => cmd_stages(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn set_board_dir_override(dir: PathBuf) {
    if let Ok(mut slot) = BOARD_DIR_OVERRIDE.lock() {
        slot.replace(dir);
    }
}

/// Directory to start board discovery from: the -C override or the cwd
pub(crate) fn start_dir() -> Result<PathBuf, BoardError> {
    let over = BOARD_DIR_OVERRIDE
        .lock()
        .ok()
        .and_then(|slot| slot.as_ref().cloned());
    match over {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(BoardError::IoError),
    }
}

fn load_board_cwd() -> Result<Board, BoardError> {
    let root = board_io::discover_board(&start_dir()?)?;
    board_io::load_board(&root)
}

/// Load the board, let `f` change it, and keep the board locked from before
/// the load until `f` returns. Returns the board as `f` left it.
fn update_board<T>(
    f: impl FnOnce(&mut Board) -> Result<T, Box<dyn Error>>,
) -> Result<(Board, T), Box<dyn Error>> {
    let root = board_io::discover_board(&start_dir()?)?;
    with_lock(&root.join(board_io::DATA_DIR), CLI_TIMEOUT, || {
        let mut board = board_io::load_board(&root)?;
        let out = f(&mut board)?;
        Ok((board, out))
    })
}

fn parse_status(s: &str) -> Result<Status, Box<dyn std::error::Error>> {
    Ok(s.parse::<Status>()?)
}

fn parse_stage_list(items: &[String]) -> Result<StageOrder, Box<dyn std::error::Error>> {
    let stages = items
        .iter()
        .map(|s| parse_status(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StageOrder::new(stages)?)
}

/// Resolve a user-typed ID to the stored one
fn canonical_id(board: &Board, id: &str) -> Result<String, ApplicationError> {
    application_ops::find(&board.applications, id)
        .map(|a| a.id.clone())
        .ok_or_else(|| ApplicationError::NotFound(id.to_string()))
}

fn save(board: &Board) -> Result<(), BoardError> {
    board_io::save_applications(&board.data_dir, &board.applications)?;
    Ok(())
}

fn print_move(board: &Board, id: &str, new_status: Option<Status>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (status, index) = column_position(&board.applications, id)
        .ok_or_else(|| ApplicationError::NotFound(id.to_string()))?;
    if json {
        let out = MoveJson {
            id: id.to_string(),
            status,
            index,
            new_status,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match new_status {
            Some(s) => println!("{} -> {} (position {})", id, s.label(), index),
            None => println!("{} -> position {} in {}", id, index, status.label()),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = load_board_cwd()?;
    let order: Vec<Status> = match &args.status {
        Some(s) => vec![parse_status(s)?],
        None => board.config.board.stages.stages().to_vec(),
    };
    let tag = args.tag.as_deref().map(|t| t.trim_start_matches('#'));

    let columns = partition(&board.applications, &order);

    if json {
        let out: Vec<ColumnJson> = columns
            .iter()
            .map(|(status, apps)| {
                let applications: Vec<ApplicationJson> = apps
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| tag.is_none_or(|t| a.tags.iter().any(|x| x == t)))
                    .map(|(i, a)| application_to_json(a, i))
                    .collect();
                ColumnJson {
                    status: *status,
                    label: status.label().to_string(),
                    count: applications.len(),
                    applications,
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut first = true;
    for (status, apps) in &columns {
        let shown: Vec<_> = apps
            .iter()
            .filter(|a| tag.is_none_or(|t| a.tags.iter().any(|x| x == t)))
            .collect();
        if tag.is_some() && shown.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;
        println!("{}", format_column_header(*status, shown.len()));
        for app in shown {
            println!("{}", format_application_line(app));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = load_board_cwd()?;
    let app = application_ops::find(&board.applications, &args.id)
        .ok_or_else(|| ApplicationError::NotFound(args.id.clone()))?;
    let (_, index) = column_position(&board.applications, &app.id)
        .ok_or_else(|| ApplicationError::NotFound(args.id.clone()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&application_to_json(app, index))?
        );
    } else {
        print!("{}", format_application_details(app, index));
    }
    Ok(())
}

fn cmd_window(args: WindowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Board config supplies defaults when there is a board; otherwise the
    // built-in defaults apply.
    let mut config = match load_board_cwd() {
        Ok(board) => WindowConfig::from_config(&board.config.virtualization),
        Err(BoardError::NotABoard) => WindowConfig::default(),
        Err(e) => return Err(e.into()),
    };
    if let Some(overscan) = args.overscan {
        config.overscan = overscan;
    }
    if let Some(size) = args.item_size {
        config.item_size = size;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    let window = config.window(args.scroll, args.viewport, args.count);
    if json {
        println!("{}", serde_json::to_string_pretty(&window_to_json(&window))?);
    } else {
        println!("{}", format_window(&window));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let new = NewApplication {
        company: args.company,
        role: args.role,
        status,
        location: args.location,
        url: args.url,
        tags: args.tags,
    };
    let (board, id) = update_board(|board| {
        let id = application_ops::add_application(&mut board.applications, new)?;
        save(board)?;
        Ok(id)
    })?;
    tracing::info!(%id, "added application");

    if json {
        let app = application_ops::find(&board.applications, &id)
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        let index = column_indices(&board.applications, app.status).len() - 1;
        println!("{}", serde_json::to_string_pretty(&application_to_json(app, index))?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_mv(args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let to = args.to.as_deref().map(parse_status).transpose()?;
    let (board, (id, new_status)) = update_board(|board| {
        let id = canonical_id(board, &args.id)?;
        let (current, _) = column_position(&board.applications, &id)
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        let column = to.unwrap_or(current);

        // Indices count the column without the moved card
        let others =
            column_indices(&board.applications, column).len() - usize::from(column == current);
        let index = if args.top {
            0
        } else {
            args.index.unwrap_or(others).min(others)
        };

        let target = DropTarget::new(column, index);
        let new_status = application_ops::move_application(&mut board.applications, &id, target)?;
        save(board)?;
        tracing::info!(%id, ?column, index, "moved application");
        Ok((id, new_status))
    })?;
    print_move(&board, &id, new_status, json)
}

fn cmd_status(args: StatusArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_status(&args.status)?;
    let (board, (id, changed)) = update_board(|board| {
        let id = canonical_id(board, &args.id)?;
        let changed = application_ops::set_status(&mut board.applications, &id, status)?;
        if changed {
            save(board)?;
            tracing::info!(%id, %status, "status changed");
        }
        Ok((id, changed))
    })?;
    print_move(&board, &id, changed.then_some(status), json)
}

fn cmd_stages(args: StagesArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let order = if args.stages.is_empty() {
        load_board_cwd()?.config.board.stages
    } else {
        let order = parse_stage_list(&args.stages)?;
        let data_dir = board_io::discover_board(&start_dir()?)?.join(board_io::DATA_DIR);
        with_lock(&data_dir, CLI_TIMEOUT, || {
            let (_, mut doc) = config_io::read_config_doc(&data_dir)?;
            config_io::set_stages(&mut doc, &order);
            config_io::write_config(&data_dir, &doc)
        })?;
        order
    };

    if json {
        let out = StagesJson {
            stages: order.stages().to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let keys: Vec<&str> = order.stages().iter().map(|s| s.key()).collect();
        println!("{}", keys.join(", "));
    }
    Ok(())
}
