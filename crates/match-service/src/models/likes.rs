use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A directed expression of interest from one user to another.
#[derive(Clone, Debug, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub from_user: Uuid,
    pub to_user: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of recording a like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    /// Both directions of the pair now exist.
    pub matched: bool,
    /// The like was already stored before this call.
    pub already_liked: bool,
}

impl LikeOutcome {
    /// True only for the call that completed the match, so repeated submissions
    /// celebrate once.
    pub fn is_new_match(&self) -> bool {
        self.matched && !self.already_liked
    }
}

/// A mutual like seen from one side of the pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub user_id: Uuid,
    pub matched_at: DateTime<Utc>,
}

/// Evaluates the rows returned by a pair query. Rows that do not belong to the
/// pair are ignored.
pub fn mutual_pair(rows: &[Like], user_a: Uuid, user_b: Uuid) -> bool {
    if user_a == user_b {
        return false;
    }
    let forward = rows
        .iter()
        .any(|like| like.from_user == user_a && like.to_user == user_b);
    let backward = rows
        .iter()
        .any(|like| like.from_user == user_b && like.to_user == user_a);
    forward && backward
}

/// Timestamp at which the pair became a match: the later of the two likes.
pub fn matched_at(rows: &[Like], user_a: Uuid, user_b: Uuid) -> Option<DateTime<Utc>> {
    let created = |from: Uuid, to: Uuid| {
        rows.iter()
            .filter(|like| like.from_user == from && like.to_user == to)
            .map(|like| like.created_at)
            .min()
    };
    match (created(user_a, user_b), created(user_b, user_a)) {
        (Some(forward), Some(backward)) => Some(forward.max(backward)),
        _ => None,
    }
}
