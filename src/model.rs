use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::task_id::TaskId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank: high urgency first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Self::High),
            1 => Some(Self::Medium),
            2 => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Trim title and description; an empty description becomes None.
    pub fn normalize(&mut self) {
        let trimmed = self.title.trim();
        if trimmed.len() != self.title.len() {
            self.title = trimmed.to_string();
        }
        if let Some(desc) = &self.description {
            let trimmed = desc.trim();
            if trimmed.is_empty() {
                self.description = None;
            } else if trimmed.len() != desc.len() {
                self.description = Some(trimmed.to_string());
            }
        }
    }

    /// Conjunction of the two independent list filters. An absent
    /// predicate matches everything.
    pub fn matches(&self, date: Option<NaiveDate>, priority: Option<Priority>) -> bool {
        let match_date = date.is_none_or(|d| self.due_date == d);
        let match_priority = priority.is_none_or(|p| self.priority == p);
        match_date && match_priority
    }
}

/// Deterministic list order: due date ascending, then creation time, then id.
pub fn sort_for_listing(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}
