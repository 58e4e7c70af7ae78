use serde::Serialize;

use crate::board::VirtualWindow;
use crate::model::{Application, Status};
use crate::util::unicode::{display_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ApplicationJson {
    pub id: String,
    pub company: String,
    pub role: String,
    pub status: Status,
    /// Position within its column
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub status: Status,
    pub label: String,
    pub count: usize,
    pub applications: Vec<ApplicationJson>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub id: String,
    pub status: Status,
    pub index: usize,
    /// Set when the move changed the stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<Status>,
}

#[derive(Serialize)]
pub struct WindowJson {
    pub first_index: usize,
    /// Inclusive; absent for an empty column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_index: Option<usize>,
    pub len: usize,
    pub total_extent: f64,
    pub bypassed: bool,
}

#[derive(Serialize)]
pub struct StagesJson {
    pub stages: Vec<Status>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn application_to_json(app: &Application, index: usize) -> ApplicationJson {
    ApplicationJson {
        id: app.id.clone(),
        company: app.company.clone(),
        role: app.role.clone(),
        status: app.status,
        index,
        location: app.location.clone(),
        url: app.url.clone(),
        applied: app.applied.map(|d| d.to_string()),
        tags: app.tags.clone(),
        note: app.note.clone(),
    }
}

pub fn window_to_json(window: &VirtualWindow) -> WindowJson {
    WindowJson {
        first_index: window.first_index,
        last_index: (!window.is_empty()).then_some(window.last_index),
        len: window.len(),
        total_extent: window.total_extent,
        bypassed: window.bypassed,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Width of the company column in `jt list`
const COMPANY_WIDTH: usize = 20;

/// Format one application as a list line: `APP-001  Acme  Backend Engineer #remote`
pub fn format_application_line(app: &Application) -> String {
    let company = truncate_to_width(&app.company, COMPANY_WIDTH);
    let pad = COMPANY_WIDTH.saturating_sub(display_width(&company));
    let mut line = format!("  {}  {}{}  {}", app.id, company, " ".repeat(pad), app.role);
    for tag in &app.tags {
        line.push_str(" #");
        line.push_str(tag);
    }
    line
}

/// Format a column header: `Applied (3)`
pub fn format_column_header(status: Status, count: usize) -> String {
    format!("{} ({})", status.label(), count)
}

/// Format full application details for `jt show`
pub fn format_application_details(app: &Application, index: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  {} - {}\n", app.id, app.company, app.role));
    out.push_str(&format!("status: {} (#{} in column)\n", app.status.label(), index + 1));
    if let Some(location) = &app.location {
        out.push_str(&format!("location: {}\n", location));
    }
    if let Some(url) = &app.url {
        out.push_str(&format!("url: {}\n", url));
    }
    if let Some(applied) = app.applied {
        out.push_str(&format!("applied: {}\n", applied));
    }
    if !app.tags.is_empty() {
        let tags: Vec<String> = app.tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&format!("tags: {}\n", tags.join(" ")));
    }
    if let Some(note) = &app.note {
        out.push_str("note:\n");
        for line in note.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}

/// Format a virtual window for `jt window`
pub fn format_window(window: &VirtualWindow) -> String {
    if window.is_empty() {
        return "empty column".to_string();
    }
    format!(
        "render {}..={} ({} cards{}), total extent {}",
        window.first_index,
        window.last_index,
        window.len(),
        if window.bypassed { ", not virtualized" } else { "" },
        window.total_extent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    fn sample() -> Application {
        let mut app = Application::new("APP-007", "Acme", "Backend Engineer", Status::Interview);
        app.location = Some("Berlin".into());
        app.applied = NaiveDate::from_ymd_opt(2026, 3, 2);
        app.tags = vec!["remote".into(), "rust".into()];
        app.note = Some("Recruiter: Dana\nSecond round on Friday".into());
        app
    }

    #[test]
    fn list_line_pads_company() {
        assert_eq!(
            format_application_line(&sample()),
            "  APP-007  Acme                  Backend Engineer #remote #rust"
        );
    }

    #[test]
    fn details() {
        assert_snapshot!(format_application_details(&sample(), 1), @r"
        APP-007  Acme - Backend Engineer
        status: Interview (#2 in column)
        location: Berlin
        applied: 2026-03-02
        tags: #remote #rust
        note:
          Recruiter: Dana
          Second round on Friday
        ");
    }

    #[test]
    fn json_omits_empty_fields() {
        let app = Application::new("APP-001", "Acme", "SRE", Status::Applied);
        let json = serde_json::to_value(application_to_json(&app, 0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "APP-001",
                "company": "Acme",
                "role": "SRE",
                "status": "applied",
                "index": 0
            })
        );
    }

    #[test]
    fn window_text() {
        assert_eq!(format_window(&VirtualWindow::EMPTY), "empty column");
        let w = crate::board::compute_window(crate::board::WindowParams {
            scroll_offset: 0.0,
            viewport_size: 9.0,
            item_count: 4,
            item_size: 3.0,
            overscan: 1,
            threshold: 10,
        });
        assert_eq!(format_window(&w), "render 0..=3 (4 cards, not virtualized), total extent 12");
    }
}
