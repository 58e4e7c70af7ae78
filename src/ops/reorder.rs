use crate::model::{Application, Status};

use super::partition::{column_indices, column_position};

/// Error type for reorder operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("application not found: {0}")]
    NotFound(String),
}

/// Where a dragged card should land: a column and an index within it.
///
/// `index` counts the column's cards *without* the dragged card, so moving the
/// first of `[A, B, C]` to index 2 yields `[B, C, A]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub column: Status,
    pub index: usize,
}

impl DropTarget {
    pub fn new(column: Status, index: usize) -> Self {
        DropTarget { column, index }
    }
}

/// Result of a reorder: the new collection and, if the card changed
/// columns, the status that was applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordered {
    pub collection: Vec<Application>,
    pub new_status: Option<Status>,
}

/// Move `dragged_id` to `target`, producing a new collection.
///
/// The output has the same length and the same set of IDs as the input.
/// Columns only show their own subset of the flat collection, so the column
/// index is translated back into a flat position: the card is inserted right
/// before the `target.index`-th remaining card of the target column, right
/// after the column's last card when the index is past the end, or at its
/// old flat position when the target column is empty.
pub fn reorder(
    collection: &[Application],
    dragged_id: &str,
    target: DropTarget,
) -> Result<Reordered, ReorderError> {
    let from = collection
        .iter()
        .position(|a| a.id == dragged_id)
        .ok_or_else(|| ReorderError::NotFound(dragged_id.to_string()))?;

    // Already there: nothing moves
    if column_position(collection, dragged_id) == Some((target.column, target.index)) {
        return Ok(Reordered {
            collection: collection.to_vec(),
            new_status: None,
        });
    }

    let mut out = collection.to_vec();
    let mut record = out.remove(from);
    let new_status = (record.status != target.column).then_some(target.column);
    if let Some(status) = new_status {
        record.status = status;
    }

    let members = column_indices(&out, target.column);
    let insert_at = match members.get(target.index) {
        Some(&flat) => flat,
        None => members.last().map_or(from, |&last| last + 1),
    };
    out.insert(insert_at, record);

    Ok(Reordered {
        collection: out,
        new_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::partition::partition;

    fn app(id: &str, status: Status) -> Application {
        Application::new(id, format!("{} Corp", id), "Engineer", status)
    }

    fn ids(apps: &[Application]) -> Vec<&str> {
        apps.iter().map(|a| a.id.as_str()).collect()
    }

    fn column_ids(apps: &[Application], status: Status) -> Vec<String> {
        partition(apps, &Status::ALL)[&status]
            .iter()
            .map(|a| a.id.clone())
            .collect()
    }

    fn mixed() -> Vec<Application> {
        vec![
            app("A", Status::Applied),
            app("X", Status::Interview),
            app("B", Status::Applied),
            app("Y", Status::Interview),
            app("C", Status::Applied),
            app("O", Status::Offer),
        ]
    }

    #[test]
    fn move_first_to_end_of_same_column() {
        let apps = vec![
            app("A", Status::Applied),
            app("B", Status::Applied),
            app("C", Status::Applied),
        ];
        let result = reorder(&apps, "A", DropTarget::new(Status::Applied, 2)).unwrap();
        assert_eq!(ids(&result.collection), vec!["B", "C", "A"]);
        assert_eq!(result.new_status, None);
    }

    #[test]
    fn move_into_empty_column_changes_status() {
        let apps = vec![
            app("A", Status::Applied),
            app("B", Status::Applied),
            app("C", Status::Applied),
        ];
        let result = reorder(&apps, "B", DropTarget::new(Status::Interview, 0)).unwrap();
        assert_eq!(result.new_status, Some(Status::Interview));
        assert_eq!(column_ids(&result.collection, Status::Applied), vec!["A", "C"]);
        assert_eq!(column_ids(&result.collection, Status::Interview), vec!["B"]);
        // Empty target column: the card keeps its flat slot
        assert_eq!(ids(&result.collection), vec!["A", "B", "C"]);
        assert_eq!(result.collection[1].status, Status::Interview);
    }

    #[test]
    fn cross_column_insert_before_target_card() {
        let result = reorder(&mixed(), "C", DropTarget::new(Status::Interview, 1)).unwrap();
        assert_eq!(column_ids(&result.collection, Status::Interview), vec!["X", "C", "Y"]);
        assert_eq!(column_ids(&result.collection, Status::Applied), vec!["A", "B"]);
        assert_eq!(ids(&result.collection), vec!["A", "X", "B", "C", "Y", "O"]);
    }

    #[test]
    fn index_past_end_appends_after_last_member() {
        let result = reorder(&mixed(), "A", DropTarget::new(Status::Interview, 99)).unwrap();
        assert_eq!(column_ids(&result.collection, Status::Interview), vec!["X", "Y", "A"]);
        assert_eq!(ids(&result.collection), vec!["X", "B", "Y", "A", "C", "O"]);
    }

    #[test]
    fn move_up_within_interleaved_column() {
        let result = reorder(&mixed(), "C", DropTarget::new(Status::Applied, 0)).unwrap();
        assert_eq!(column_ids(&result.collection, Status::Applied), vec!["C", "A", "B"]);
        assert_eq!(column_ids(&result.collection, Status::Interview), vec!["X", "Y"]);
    }

    #[test]
    fn target_equal_to_origin_is_noop() {
        let apps = mixed();
        for (id, column, index) in [
            ("A", Status::Applied, 0),
            ("B", Status::Applied, 1),
            ("C", Status::Applied, 2),
            ("Y", Status::Interview, 1),
            ("O", Status::Offer, 0),
        ] {
            let once = reorder(&apps, id, DropTarget::new(column, index)).unwrap();
            assert_eq!(once.collection, apps, "moving {} onto itself", id);
            assert_eq!(once.new_status, None);
            let twice = reorder(&once.collection, id, DropTarget::new(column, index)).unwrap();
            assert_eq!(twice.collection, apps);
        }
    }

    #[test]
    fn repeating_a_move_is_stable() {
        let target = DropTarget::new(Status::Interview, 1);
        let once = reorder(&mixed(), "A", target).unwrap();
        let twice = reorder(&once.collection, "A", target).unwrap();
        assert_eq!(twice.collection, once.collection);
        assert_eq!(twice.new_status, None);
    }

    #[test]
    fn identities_and_length_preserved_for_every_target() {
        let apps = mixed();
        let mut expected: Vec<&str> = ids(&apps);
        expected.sort();
        for dragged in ["A", "X", "B", "Y", "C", "O"] {
            for column in Status::ALL {
                for index in 0..=apps.len() {
                    let result = reorder(&apps, dragged, DropTarget::new(column, index)).unwrap();
                    assert_eq!(result.collection.len(), apps.len());
                    let mut got = ids(&result.collection);
                    got.sort();
                    assert_eq!(got, expected);
                    let moved = result.collection.iter().find(|a| a.id == dragged).unwrap();
                    assert_eq!(moved.status, column);
                }
            }
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = reorder(&mixed(), "nope", DropTarget::new(Status::Applied, 0)).unwrap_err();
        assert_eq!(err, ReorderError::NotFound("nope".into()));
    }
}
