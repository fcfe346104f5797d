//! Pure projection of the task collection and active filter onto what a surface displays.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::{apply, filter_counts};
use crate::model::{Counts, Filter, Task, TaskId};

/// A user action, produced by a surface and dispatched to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(String),
    Toggle(TaskId),
    Edit(TaskId),
    Delete(TaskId),
    ClearCompleted,
    ClearAll,
    SelectFilter(Filter),
    FocusInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub stats: Counts,
    pub filters: Vec<FilterLabel>,
    pub body: ViewBody,
}

impl ViewModel {
    pub fn rows(&self) -> &[TaskRow] {
        match &self.body {
            ViewBody::Rows(rows) => rows,
            ViewBody::Empty(_) => &[],
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match &self.body {
            ViewBody::Empty(state) => Some(state),
            ViewBody::Rows(_) => None,
        }
    }

    pub fn active_filter(&self) -> Filter {
        self.filters
            .iter()
            .find(|label| label.active)
            .map(|label| label.filter)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterLabel {
    pub filter: Filter,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewBody {
    Empty(EmptyState),
    Rows(Vec<TaskRow>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: &'static str,
    pub message: &'static str,
}

impl EmptyState {
    pub fn for_filter(filter: Filter) -> Self {
        match filter {
            Filter::All => Self {
                icon: "📋",
                title: "No tasks yet!",
                message: "Add your first task above to get started.",
            },
            Filter::Active => Self {
                icon: "✅",
                title: "No active tasks!",
                message: "All tasks are completed. Great job!",
            },
            Filter::Completed => Self {
                icon: "📝",
                title: "No completed tasks!",
                message: "Complete some tasks to see them here.",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    /// Task text with control characters neutralized.
    pub text: String,
    pub completed: bool,
    /// Completed rows de-emphasize the edit affordance; editing still works.
    pub edit_muted: bool,
    pub created_at: DateTime<Utc>,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: neutralize_text(&task.text),
            completed: task.completed,
            edit_muted: task.completed,
            created_at: task.created_at,
        }
    }

    pub fn toggle_intent(&self) -> Intent {
        Intent::Toggle(self.id.clone())
    }

    pub fn edit_intent(&self) -> Intent {
        Intent::Edit(self.id.clone())
    }

    pub fn delete_intent(&self) -> Intent {
        Intent::Delete(self.id.clone())
    }
}

pub fn render(tasks: &[Task], filter: Filter) -> ViewModel {
    let stats = Counts::from_tasks(tasks);
    let filters = filter_counts(tasks)
        .into_iter()
        .map(|(candidate, count)| FilterLabel {
            filter: candidate,
            label: format!("{} ({})", candidate.title(), count),
            count,
            active: candidate == filter,
        })
        .collect();

    let visible = apply(tasks, filter);
    let body = if visible.is_empty() {
        ViewBody::Empty(EmptyState::for_filter(filter))
    } else {
        ViewBody::Rows(visible.into_iter().map(TaskRow::from_task).collect())
    };

    ViewModel {
        stats,
        filters,
        body,
    }
}

/// Render control characters as visible escapes so a terminal never interprets them.
pub fn neutralize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
    out
}
