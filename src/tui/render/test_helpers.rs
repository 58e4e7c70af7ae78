use std::path::{Path, PathBuf};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::board_io;
use crate::model::{Application, Board, BoardConfig, BoardInfo, StageOrder, Status};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app once at the standard test size and return the text.
///
/// Also records the board geometry, like a real frame would.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// An app that has been through one frame, so hit testing works.
pub fn app_rendered(board: Board) -> App {
    let mut app = App::new(board);
    render_app(&mut app);
    app
}

fn config() -> BoardConfig {
    BoardConfig {
        board: BoardInfo {
            name: "Test".into(),
            stages: StageOrder::new(vec![
                Status::Applied,
                Status::Interview,
                Status::Offer,
                Status::Rejected,
            ])
            .unwrap(),
        },
        virtualization: Default::default(),
        drag: Default::default(),
        ui: Default::default(),
    }
}

fn applications() -> Vec<Application> {
    let mut acme = Application::new("APP-001", "Acme", "Backend Engineer", Status::Applied);
    acme.tags = vec!["remote".into()];
    let globex = Application::new("APP-002", "Globex", "Data Engineer", Status::Applied);
    let hooli = Application::new("APP-003", "Hooli", "SRE", Status::Applied);
    let mut initech =
        Application::new("APP-004", "Initech", "Platform Engineer", Status::Interview);
    initech.location = Some("Austin".into());
    vec![acme, globex, hooli, initech]
}

/// Four columns (applied, interview, offer, rejected): three cards in
/// applied, one in interview. Not backed by files.
pub fn sample_board() -> Board {
    let root = PathBuf::from("/tmp/jobtrack-test");
    Board {
        data_dir: root.join(board_io::DATA_DIR),
        root,
        config: config(),
        applications: applications(),
    }
}

/// The sample board written to `dir` and loaded back.
pub fn sample_board_in(dir: &Path) -> Board {
    let data_dir = dir.join(board_io::DATA_DIR);
    if !data_dir.is_dir() {
        let text = toml::to_string(&config()).unwrap();
        board_io::init_board(dir, &text, false).unwrap();
        board_io::save_applications(&data_dir, &applications()).unwrap();
    }
    board_io::load_board(dir).unwrap()
}
