use indexmap::IndexMap;

use crate::model::{Application, Status};

/// Group applications into board columns.
///
/// One entry per stage in `order`, in that order, each holding the matching
/// applications in their collection order. Stages without applications get
/// an empty list; applications whose stage is not in `order` are left out.
pub fn partition<'a>(
    records: &'a [Application],
    order: &[Status],
) -> IndexMap<Status, Vec<&'a Application>> {
    let mut columns: IndexMap<Status, Vec<&Application>> =
        order.iter().map(|s| (*s, Vec::new())).collect();
    for record in records {
        if let Some(column) = columns.get_mut(&record.status) {
            column.push(record);
        }
    }
    columns
}

/// Flat collection indices of the applications in one column, top to bottom.
pub fn column_indices(records: &[Application], status: Status) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status == status)
        .map(|(i, _)| i)
        .collect()
}

/// Column and index within that column of the application with `id`.
pub fn column_position(records: &[Application], id: &str) -> Option<(Status, usize)> {
    let flat = records.iter().position(|r| r.id == id)?;
    let status = records[flat].status;
    let index = records[..flat]
        .iter()
        .filter(|r| r.status == status)
        .count();
    Some((status, index))
}

/// Number of applications per stage, in `order`
pub fn column_counts(records: &[Application], order: &[Status]) -> Vec<(Status, usize)> {
    partition(records, order)
        .into_iter()
        .map(|(status, apps)| (status, apps.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, status: Status) -> Application {
        Application::new(id, format!("{} Inc", id), "Engineer", status)
    }

    fn ids(list: &[&Application]) -> Vec<String> {
        list.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn groups_preserving_relative_order() {
        let records = vec![
            app("A", Status::Applied),
            app("X", Status::Interview),
            app("B", Status::Applied),
            app("Y", Status::Interview),
            app("C", Status::Applied),
        ];
        let columns = partition(&records, &Status::ALL);
        assert_eq!(columns.len(), 6);
        assert_eq!(ids(&columns[&Status::Applied]), vec!["A", "B", "C"]);
        assert_eq!(ids(&columns[&Status::Interview]), vec!["X", "Y"]);
        assert!(columns[&Status::Offer].is_empty());
    }

    #[test]
    fn keys_follow_stage_order() {
        let order = [Status::Offer, Status::Applied];
        let columns = partition(&[], &order);
        let keys: Vec<Status> = columns.keys().copied().collect();
        assert_eq!(keys, vec![Status::Offer, Status::Applied]);
        assert!(columns.values().all(|c| c.is_empty()));
    }

    #[test]
    fn stages_missing_from_order_are_hidden() {
        let records = vec![app("A", Status::Applied), app("R", Status::Rejected)];
        let columns = partition(&records, &[Status::Applied]);
        assert_eq!(columns.len(), 1);
        assert_eq!(ids(&columns[&Status::Applied]), vec!["A"]);
    }

    #[test]
    fn column_indices_and_position() {
        let records = vec![
            app("A", Status::Applied),
            app("X", Status::Interview),
            app("B", Status::Applied),
        ];
        assert_eq!(column_indices(&records, Status::Applied), vec![0, 2]);
        assert_eq!(column_indices(&records, Status::Offer), Vec::<usize>::new());
        assert_eq!(column_position(&records, "B"), Some((Status::Applied, 1)));
        assert_eq!(column_position(&records, "X"), Some((Status::Interview, 0)));
        assert_eq!(column_position(&records, "nope"), None);
    }

    #[test]
    fn counts_per_column() {
        let records = vec![app("A", Status::Applied), app("B", Status::Applied)];
        assert_eq!(
            column_counts(&records, &[Status::Applied, Status::Offer]),
            vec![(Status::Applied, 2), (Status::Offer, 0)]
        );
    }
}
