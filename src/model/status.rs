use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pipeline stage of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

impl Status {
    /// All stages in default pipeline order
    pub const ALL: [Status; 6] = [
        Status::Wishlist,
        Status::Applied,
        Status::Interview,
        Status::Offer,
        Status::Rejected,
        Status::Accepted,
    ];

    /// The lowercase key used in files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            Status::Wishlist => "wishlist",
            Status::Applied => "applied",
            Status::Interview => "interview",
            Status::Offer => "offer",
            Status::Rejected => "rejected",
            Status::Accepted => "accepted",
        }
    }

    /// Column heading
    pub fn label(self) -> &'static str {
        match self {
            Status::Wishlist => "Wishlist",
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::Accepted => "Accepted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status \"{0}\" (expected one of: wishlist, applied, interview, offer, rejected, accepted)")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Status::ALL
            .into_iter()
            .find(|st| st.key() == lower)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Error type for stage order validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageOrderError {
    #[error("stage order cannot be empty")]
    Empty,
    #[error("stage \"{0}\" appears more than once")]
    Duplicate(Status),
}

/// Left-to-right column order of the board.
///
/// Always non-empty with distinct stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Status>", into = "Vec<Status>")]
pub struct StageOrder(Vec<Status>);

impl StageOrder {
    pub fn new(stages: Vec<Status>) -> Result<Self, StageOrderError> {
        if stages.is_empty() {
            return Err(StageOrderError::Empty);
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(StageOrderError::Duplicate(*stage));
            }
        }
        Ok(StageOrder(stages))
    }

    pub fn stages(&self) -> &[Status] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column index of a stage, if it is shown on the board
    pub fn position(&self, status: Status) -> Option<usize> {
        self.0.iter().position(|s| *s == status)
    }

    pub fn get(&self, idx: usize) -> Option<Status> {
        self.0.get(idx).copied()
    }
}

impl Default for StageOrder {
    fn default() -> Self {
        StageOrder(Status::ALL.to_vec())
    }
}

impl TryFrom<Vec<Status>> for StageOrder {
    type Error = StageOrderError;

    fn try_from(stages: Vec<Status>) -> Result<Self, Self::Error> {
        StageOrder::new(stages)
    }
}

impl From<StageOrder> for Vec<Status> {
    fn from(order: StageOrder) -> Self {
        order.0
    }
}
