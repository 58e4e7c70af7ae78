//! Closest-corners collision resolution.
//!
//! Maps a pointer (or keyboard focus) position to the drop target it most
//! plausibly points at. Every candidate is scored by the distance from the
//! pointer to the nearest of its four corners; the lowest score wins and
//! ties go to the earlier candidate.

use crate::model::Status;

use super::geometry::{Point, Rect};

/// Something a card can be dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropId {
    /// Another card, by application ID
    Card(String),
    /// A column container (dropping appends to the column)
    Column(Status),
}

/// A drop target and its bounding box.
///
/// `rect` is `None` when the target has not been measured yet (e.g. before
/// the first render); such candidates are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: DropId,
    pub rect: Option<Rect>,
}

impl Candidate {
    pub fn new(id: DropId, rect: Option<Rect>) -> Self {
        Candidate { id, rect }
    }
}

/// Distance from `p` to the nearest corner of `rect`.
pub fn nearest_corner_distance(p: Point, rect: &Rect) -> f64 {
    rect.corners()
        .iter()
        .map(|c| p.distance(*c))
        .fold(f64::INFINITY, f64::min)
}

/// Resolve the drop target under `pointer`.
///
/// Returns `None` when the pointer is not inside any measured candidate.
/// Ties go to the candidate that comes first in `candidates`.
pub fn closest_corners<'a, I>(pointer: Point, candidates: I) -> Option<DropId>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let measured: Vec<(&DropId, Rect)> = candidates
        .into_iter()
        .filter_map(|c| c.rect.filter(|r| !r.is_empty()).map(|r| (&c.id, r)))
        .collect();

    if !measured.iter().any(|(_, rect)| rect.contains(pointer)) {
        return None;
    }

    let mut best: Option<(&DropId, f64)> = None;
    for (id, rect) in measured {
        let distance = nearest_corner_distance(pointer, &rect);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((id, distance)),
        }
    }
    best.map(|(id, _)| id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, rect: Rect) -> Candidate {
        Candidate::new(DropId::Card(id.into()), Some(rect))
    }

    #[test]
    fn picks_nearest_corner_not_nearest_center() {
        // A tall column and a small card whose center is closer to the
        // pointer, but whose corners are further away.
        let column = Candidate::new(
            DropId::Column(Status::Applied),
            Some(Rect::new(0.0, 0.0, 10.0, 100.0)),
        );
        let small = card("A", Rect::new(0.0, 4.0, 10.0, 12.0));
        let pointer = Point::new(1.0, 1.0);
        assert_eq!(
            closest_corners(pointer, [&column, &small]),
            Some(DropId::Column(Status::Applied))
        );
        let pointer = Point::new(9.0, 15.0);
        assert_eq!(
            closest_corners(pointer, [&column, &small]),
            Some(DropId::Card("A".into()))
        );
    }

    #[test]
    fn outside_every_candidate_is_none() {
        let a = card("A", Rect::new(0.0, 0.0, 10.0, 3.0));
        let b = card("B", Rect::new(0.0, 3.0, 10.0, 3.0));
        assert_eq!(closest_corners(Point::new(50.0, 50.0), [&a, &b]), None);
        assert_eq!(closest_corners(Point::new(0.0, 0.0), Vec::<&Candidate>::new()), None);
    }

    #[test]
    fn pointer_inside_one_may_resolve_to_a_neighbour() {
        // Inside A, but right on B's top-left corner
        let a = card("A", Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = card("B", Rect::new(5.0, 9.0, 10.0, 10.0));
        assert_eq!(
            closest_corners(Point::new(5.0, 8.9), [&a, &b]),
            Some(DropId::Card("B".into()))
        );
    }

    #[test]
    fn unmeasured_candidates_are_skipped() {
        let ghost = Candidate::new(DropId::Card("ghost".into()), None);
        let a = card("A", Rect::new(0.0, 0.0, 10.0, 3.0));
        assert_eq!(
            closest_corners(Point::new(0.5, 0.5), [&ghost, &a]),
            Some(DropId::Card("A".into()))
        );
        // Only the unmeasured one would contain the pointer
        assert_eq!(closest_corners(Point::new(40.0, 40.0), [&ghost, &a]), None);
    }

    #[test]
    fn ties_go_to_earlier_candidate() {
        // Stacked cards sharing an edge; the pointer sits exactly between
        // A's bottom corners and B's top corners.
        let a = card("A", Rect::new(0.0, 0.0, 10.0, 4.0));
        let b = card("B", Rect::new(0.0, 4.0, 10.0, 4.0));
        let p = Point::new(5.0, 3.0);
        assert_eq!(closest_corners(p, [&a, &b]), Some(DropId::Card("A".into())));
        let p = Point::new(5.0, 4.0);
        assert_eq!(closest_corners(p, [&a, &b]), Some(DropId::Card("A".into())));
        assert_eq!(closest_corners(p, [&b, &a]), Some(DropId::Card("B".into())));
    }

    #[test]
    fn strictly_closest_corner_always_wins() {
        let cards: Vec<Candidate> = (0..6)
            .map(|i| card(&format!("C{}", i), Rect::new(0.0, i as f64 * 3.0, 12.0, 3.0)))
            .collect();
        let mut y = 0.0;
        while y < 18.0 {
            let mut x = 0.0;
            while x < 12.0 {
                let p = Point::new(x, y);
                let scores: Vec<f64> = cards
                    .iter()
                    .map(|c| nearest_corner_distance(p, c.rect.as_ref().unwrap()))
                    .collect();
                let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
                let winners: Vec<usize> =
                    (0..scores.len()).filter(|&i| scores[i] == min).collect();
                if winners.len() == 1 {
                    assert_eq!(
                        closest_corners(p, &cards),
                        Some(cards[winners[0]].id.clone()),
                        "at ({}, {})",
                        x,
                        y
                    );
                }
                x += 1.5;
            }
            y += 0.75;
        }
    }
}
