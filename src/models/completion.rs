// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route completion records and local progress state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted route status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    InProgress,
    Done,
}

/// Completion record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCompletion {
    pub status: RouteStatus,
    /// Last marker index the user completed
    pub step: i32,
    pub route_id: Uuid,
}

/// Where a route stands from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Done,
}

/// Per-route progress: the last completed marker and the one being approached.
///
/// `visited` is `None` until the first marker is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub visited: Option<usize>,
    pub visiting: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Self::not_started()
    }
}

impl Progress {
    pub fn not_started() -> Self {
        Self {
            visited: None,
            visiting: 0,
        }
    }

    /// Rebuild progress from a backend record, clamped to a route whose final
    /// marker index is `last`.
    ///
    /// A record written against a longer marker list (before a branch or edit)
    /// never yields indices past the end of the current one. An in-progress
    /// record never lands on the final marker, since reaching it is only
    /// possible through the DONE transition.
    pub fn from_record(record: Option<&RouteCompletion>, last: Option<usize>) -> Self {
        let (Some(record), Some(last)) = (record, last) else {
            return Self::not_started();
        };
        let step = usize::try_from(record.step).ok();

        match record.status {
            RouteStatus::Done => {
                let index = step.map_or(last, |s| s.min(last));
                Self {
                    visited: Some(index),
                    visiting: index,
                }
            }
            RouteStatus::InProgress => {
                let visited = match (step, last.checked_sub(1)) {
                    (Some(s), Some(max_visited)) => Some(s.min(max_visited)),
                    _ => None,
                };
                Self {
                    visited,
                    visiting: visited.map_or(0, |v| v + 1),
                }
            }
        }
    }

    /// Status of a route whose final marker index is `last`.
    pub fn status(&self, last: usize) -> ProgressStatus {
        match self.visited {
            None => ProgressStatus::NotStarted,
            Some(v) if v == last && self.visiting == last => ProgressStatus::Done,
            Some(_) => ProgressStatus::InProgress,
        }
    }

    /// `visited` as the backend's integer step, with -1 meaning "none".
    pub fn visited_index(&self) -> i64 {
        self.visited.map_or(-1, |v| v as i64)
    }
}
