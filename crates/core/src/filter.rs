use tracing::debug;

use crate::error::FilterError;
use crate::model::{Counts, Filter, Task};

/// Session-scoped active filter. Never persisted; a new session starts at [`Filter::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelector {
    current: Filter,
}

impl FilterSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Filter {
        self.current
    }

    pub fn select(&mut self, filter: Filter) {
        if self.current != filter {
            debug!(from = %self.current, to = %filter, "filter changed");
        }
        self.current = filter;
    }

    /// Select a filter by name; unknown names leave the selection untouched.
    pub fn set_filter(&mut self, name: &str) -> Result<Filter, FilterError> {
        let filter = name.parse::<Filter>()?;
        self.select(filter);
        Ok(filter)
    }
}

/// Order-preserving view of `tasks` under `filter`.
pub fn apply(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Count shown next to each filter control.
pub fn filter_counts(tasks: &[Task]) -> [(Filter, usize); 3] {
    let counts = Counts::from_tasks(tasks);
    Filter::ALL.map(|filter| (filter, counts.for_filter(filter)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn tasks() -> Vec<Task> {
        ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let mut task = Task::new(id.to_string(), format!("task {id}"), Utc::now());
                task.completed = idx % 2 == 1;
                task
            })
            .collect()
    }

    fn ids(view: Vec<&Task>) -> Vec<&str> {
        view.into_iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn apply_keeps_collection_order() {
        let tasks = tasks();
        assert_eq!(ids(apply(&tasks, Filter::All)), vec!["a", "b", "c", "d"]);
        assert_eq!(ids(apply(&tasks, Filter::Active)), vec!["a", "c"]);
        assert_eq!(ids(apply(&tasks, Filter::Completed)), vec!["b", "d"]);
    }

    #[test]
    fn set_filter_rejects_unknown_names() {
        let mut selector = FilterSelector::new();
        selector.set_filter("completed").unwrap();
        assert_eq!(
            selector.set_filter("archived"),
            Err(FilterError::Invalid("archived".into()))
        );
        assert_eq!(selector.current(), Filter::Completed);
    }

    #[test]
    fn filter_counts_cover_each_control() {
        let mut tasks = tasks();
        tasks[0].completed = true;
        assert_eq!(
            filter_counts(&tasks),
            [(Filter::All, 4), (Filter::Active, 1), (Filter::Completed, 3)]
        );
    }

    #[test]
    fn new_selector_starts_on_all() {
        assert_eq!(FilterSelector::new().current(), Filter::All);
    }
}
