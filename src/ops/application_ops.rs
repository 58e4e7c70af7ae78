use chrono::Local;

use crate::model::{Application, Status};

use super::partition::column_indices;
use super::reorder::{self, DropTarget, ReorderError};

/// Error type for application operations
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application not found: {0}")]
    NotFound(String),
    #[error("duplicate application id: {0}")]
    DuplicateId(String),
    #[error("company and role cannot be empty")]
    MissingField,
}

impl From<ReorderError> for ApplicationError {
    fn from(e: ReorderError) -> Self {
        match e {
            ReorderError::NotFound(id) => ApplicationError::NotFound(id),
        }
    }
}

/// Fields for a new application
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub status: Option<Status>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub tags: Vec<String>,
}

/// Append a new application to the bottom of its column.
/// Returns the assigned ID.
pub fn add_application(
    applications: &mut Vec<Application>,
    new: NewApplication,
) -> Result<String, ApplicationError> {
    let company = new.company.trim();
    let role = new.role.trim();
    if company.is_empty() || role.is_empty() {
        return Err(ApplicationError::MissingField);
    }

    let id = format!("APP-{:03}", next_id_number(applications));
    let status = new.status.unwrap_or(Status::Applied);
    let mut app = Application::new(id.clone(), company, role, status);
    app.location = new.location;
    app.url = new.url;
    app.tags = new
        .tags
        .iter()
        .map(|t| t.trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if status != Status::Wishlist {
        app.applied = Some(Local::now().date_naive());
    }
    applications.push(app);
    Ok(id)
}

/// Move an application to `target`, applying the status change if the
/// column differs. Returns the new status when it changed.
pub fn move_application(
    applications: &mut Vec<Application>,
    id: &str,
    target: DropTarget,
) -> Result<Option<Status>, ApplicationError> {
    let result = reorder::reorder(applications, id, target)?;
    *applications = result.collection;
    Ok(result.new_status)
}

/// Set an application's status, placing it at the bottom of the new column.
/// No-op if the status is unchanged.
pub fn set_status(
    applications: &mut Vec<Application>,
    id: &str,
    status: Status,
) -> Result<bool, ApplicationError> {
    let (id, current) = find(applications, id)
        .map(|a| (a.id.clone(), a.status))
        .ok_or_else(|| ApplicationError::NotFound(id.to_string()))?;
    if current == status {
        return Ok(false);
    }
    let len = column_indices(applications, status).len();
    move_application(applications, &id, DropTarget::new(status, len))?;
    Ok(true)
}

/// IDs compare without regard to ASCII case: `app-001` is `APP-001`
fn id_key(id: &str) -> String {
    id.to_ascii_uppercase()
}

pub fn find<'a>(applications: &'a [Application], id: &str) -> Option<&'a Application> {
    let key = id_key(id);
    applications.iter().find(|a| id_key(&a.id) == key)
}

/// Check that no two applications share an ID, under the same comparison
/// [`find`] uses.
pub fn validate_unique_ids(applications: &[Application]) -> Result<(), ApplicationError> {
    let mut seen = std::collections::HashSet::new();
    for app in applications {
        if !seen.insert(id_key(&app.id)) {
            return Err(ApplicationError::DuplicateId(app.id.clone()));
        }
    }
    Ok(())
}

/// One past the highest `APP-NNN` number in use
fn next_id_number(applications: &[Application]) -> usize {
    applications
        .iter()
        .filter_map(|a| id_key(&a.id).strip_prefix("APP-")?.parse::<usize>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Application> {
        vec![
            Application::new("APP-001", "Acme", "Backend Engineer", Status::Applied),
            Application::new("APP-004", "Globex", "SRE", Status::Interview),
            Application::new("APP-002", "Initech", "Rust Developer", Status::Applied),
        ]
    }

    #[test]
    fn add_assigns_next_id_and_defaults() {
        let mut apps = sample();
        let id = add_application(
            &mut apps,
            NewApplication {
                company: "Hooli".into(),
                role: "Platform Engineer".into(),
                tags: vec!["#remote".into(), "".into()],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(id, "APP-005");
        let added = apps.last().unwrap();
        assert_eq!(added.status, Status::Applied);
        assert_eq!(added.tags, vec!["remote"]);
        assert!(added.applied.is_some());
    }

    #[test]
    fn add_to_wishlist_has_no_applied_date() {
        let mut apps = Vec::new();
        let id = add_application(
            &mut apps,
            NewApplication {
                company: "Acme".into(),
                role: "Engineer".into(),
                status: Some(Status::Wishlist),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(id, "APP-001");
        assert!(apps[0].applied.is_none());
    }

    #[test]
    fn add_requires_company_and_role() {
        let mut apps = Vec::new();
        let err = add_application(
            &mut apps,
            NewApplication {
                company: "  ".into(),
                role: "Engineer".into(),
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(ApplicationError::MissingField)));
        assert!(apps.is_empty());
    }

    #[test]
    fn set_status_moves_to_bottom_of_column() {
        let mut apps = sample();
        assert!(set_status(&mut apps, "APP-001", Status::Interview).unwrap());
        let order: Vec<&str> = apps.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["APP-004", "APP-001", "APP-002"]);
        assert_eq!(apps[1].status, Status::Interview);
        assert!(!set_status(&mut apps, "APP-001", Status::Interview).unwrap());
    }

    #[test]
    fn set_status_unknown_id() {
        let mut apps = sample();
        assert!(matches!(
            set_status(&mut apps, "APP-999", Status::Offer),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn find_is_case_insensitive() {
        let apps = sample();
        assert_eq!(find(&apps, "app-004").map(|a| a.company.as_str()), Some("Globex"));
    }

    #[test]
    fn duplicate_ids_detected() {
        let mut apps = sample();
        assert!(validate_unique_ids(&apps).is_ok());
        apps.push(Application::new("APP-002", "Dup", "Dup", Status::Offer));
        assert!(matches!(
            validate_unique_ids(&apps),
            Err(ApplicationError::DuplicateId(id)) if id == "APP-002"
        ));
    }

    #[test]
    fn ids_differing_only_in_case_collide() {
        let mut apps = sample();
        apps.push(Application::new("app-001", "Shadow", "Engineer", Status::Offer));
        assert!(matches!(
            validate_unique_ids(&apps),
            Err(ApplicationError::DuplicateId(id)) if id == "app-001"
        ));
    }

    #[test]
    fn lower_case_ids_count_toward_the_next_number() {
        let mut apps = sample();
        apps.push(Application::new("app-007", "Hooli", "SRE", Status::Applied));
        let new = NewApplication {
            company: "Umbrella".into(),
            role: "Engineer".into(),
            ..Default::default()
        };
        assert_eq!(add_application(&mut apps, new).unwrap(), "APP-008");
    }
}
