//! Maps user intents onto the task store and filter, owning the modal interaction state.

use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{StorageError, StoreError};
use crate::filter::FilterSelector;
use crate::model::{Filter, TaskId};
use crate::notifier::Notifier;
use crate::storage::TaskStorage;
use crate::store::{EditOutcome, TaskStore};
use crate::view::{neutralize_text, render, Intent, ViewModel};

pub const MSG_EMPTY_TASK: &str = "Please enter a task!";
pub const MSG_ADDED: &str = "Task added successfully!";
pub const MSG_COMPLETED: &str = "Task completed! 🎉";
pub const MSG_REACTIVATED: &str = "Task marked as active";
pub const MSG_UPDATED: &str = "Task updated successfully!";
pub const MSG_DELETED: &str = "Task deleted successfully!";
pub const MSG_NOTHING_COMPLETED: &str = "No completed tasks to clear!";
pub const MSG_NOTHING_TO_CLEAR: &str = "No tasks to clear!";
pub const MSG_ALL_CLEARED: &str = "All tasks cleared!";
pub const MSG_LOAD_FAILED: &str = "Error loading saved tasks";
pub const MSG_SAVE_FAILED: &str = "Couldn't save tasks; changes are kept for this session";

/// A destructive action waiting on the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { id: TaskId, text: String },
    ClearCompleted { count: usize },
    ClearAll { count: usize },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Delete { text, .. } => {
                format!(
                    "Are you sure you want to delete \"{}\"?",
                    neutralize_text(text)
                )
            }
            PendingAction::ClearCompleted { count } => {
                format!("Delete {count} completed task{}?", plural(*count))
            }
            PendingAction::ClearAll { count } => {
                format!("Delete all {count} tasks? This cannot be undone!")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    Idle,
    AwaitingConfirmation(PendingAction),
    AwaitingEdit { id: TaskId, original: String },
}

/// What the surface should do with its add input after an intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub clear_input: bool,
    pub focus_input: bool,
}

impl Effects {
    fn focus() -> Self {
        Self {
            clear_input: false,
            focus_input: true,
        }
    }
}

pub struct Controller {
    store: TaskStore,
    filter: FilterSelector,
    notifier: Notifier,
    interaction: Interaction,
    view: ViewModel,
}

impl Controller {
    /// Load the persisted collection and render the first view.
    ///
    /// An unreadable or corrupt entry starts an empty list and raises an error notification.
    pub fn open(storage: TaskStorage) -> Self {
        let mut store = TaskStore::new(storage);
        let mut notifier = Notifier::new();
        match store.load() {
            Ok(count) => debug!(count, "task store ready"),
            Err(err) => {
                warn!(error = %err, "starting with an empty task list");
                notifier.error(MSG_LOAD_FAILED);
            }
        }
        let filter = FilterSelector::new();
        let view = render(store.tasks(), filter.current());
        Self {
            store,
            filter,
            notifier,
            interaction: Interaction::Idle,
            view,
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
    }

    pub fn dismiss_notification(&mut self) {
        self.notifier.dismiss();
    }

    /// Handle one intent. Intents arriving while a modal is open are dropped.
    pub fn dispatch(&mut self, intent: Intent) -> Effects {
        if self.interaction != Interaction::Idle {
            debug!(?intent, "ignoring intent while a modal is open");
            return Effects::default();
        }

        match intent {
            Intent::Submit(raw) => return self.submit(&raw),
            Intent::Toggle(id) => self.toggle(&id),
            Intent::Edit(id) => self.request_edit(id),
            Intent::Delete(id) => self.request_delete(id),
            Intent::ClearCompleted => self.request_clear_completed(),
            Intent::ClearAll => self.request_clear_all(),
            Intent::SelectFilter(filter) => {
                self.filter.select(filter);
                self.rerender();
            }
            Intent::FocusInput => return Effects::focus(),
        }
        Effects::default()
    }

    /// Answer the open confirmation. No-op unless one is pending.
    pub fn confirm(&mut self, accepted: bool) {
        let Interaction::AwaitingConfirmation(action) = std::mem::take(&mut self.interaction)
        else {
            return;
        };
        if !accepted {
            debug!(?action, "confirmation declined");
            return;
        }

        match action {
            PendingAction::Delete { id, .. } => match self.store.remove(&id) {
                Ok(Some(_)) => self.notifier.success(MSG_DELETED),
                Ok(None) => {}
                Err(err) => self.report(err),
            },
            PendingAction::ClearCompleted { .. } => match self.store.remove_completed() {
                Ok(0) => self.notifier.error(MSG_NOTHING_COMPLETED),
                Ok(removed) => self.notifier.success(format!(
                    "{removed} completed task{} cleared!",
                    plural(removed)
                )),
                Err(err) => self.report(err),
            },
            PendingAction::ClearAll { .. } => match self.store.remove_all() {
                Ok(outcome) if outcome.was_empty() => self.notifier.error(MSG_NOTHING_TO_CLEAR),
                Ok(_) => self.notifier.success(MSG_ALL_CLEARED),
                Err(err) => self.report(err),
            },
        }
        self.rerender();
    }

    /// Finish the open edit prompt. `None` or blank text cancels silently.
    pub fn finish_edit(&mut self, replacement: Option<&str>) {
        let Interaction::AwaitingEdit { id, .. } = std::mem::take(&mut self.interaction) else {
            return;
        };
        let Some(text) = replacement else {
            debug!(task_id = %id, "edit cancelled");
            return;
        };

        match self.store.edit(&id, text) {
            Ok(EditOutcome::Updated(_)) => {
                self.notifier.success(MSG_UPDATED);
                self.rerender();
            }
            Ok(EditOutcome::Unchanged) => {}
            Err(err) => {
                self.report(err);
                self.rerender();
            }
        }
    }

    fn submit(&mut self, raw: &str) -> Effects {
        match self.store.add(raw) {
            Ok(_) => {
                self.notifier.success(MSG_ADDED);
                self.rerender();
                Effects {
                    clear_input: true,
                    focus_input: true,
                }
            }
            Err(StoreError::Validation(err)) => {
                self.notifier.error(err.to_string());
                Effects::focus()
            }
            Err(StoreError::Storage(err)) => {
                // The task is in memory; keep the session consistent with it.
                self.report_storage(err);
                self.rerender();
                Effects {
                    clear_input: true,
                    focus_input: true,
                }
            }
        }
    }

    fn toggle(&mut self, id: &str) {
        match self.store.toggle(id) {
            Ok(Some(true)) => self.notifier.success(MSG_COMPLETED),
            Ok(Some(false)) => self.notifier.success(MSG_REACTIVATED),
            Ok(None) => return,
            Err(err) => self.report(err),
        }
        self.rerender();
    }

    fn request_edit(&mut self, id: TaskId) {
        let Some(task) = self.store.get(&id) else {
            return;
        };
        self.interaction = Interaction::AwaitingEdit {
            original: task.text.clone(),
            id,
        };
    }

    fn request_delete(&mut self, id: TaskId) {
        let Some(task) = self.store.get(&id) else {
            return;
        };
        self.interaction = Interaction::AwaitingConfirmation(PendingAction::Delete {
            text: task.text.clone(),
            id,
        });
    }

    fn request_clear_completed(&mut self) {
        let count = self.store.counts().completed;
        if count == 0 {
            self.notifier.error(MSG_NOTHING_COMPLETED);
            return;
        }
        self.interaction =
            Interaction::AwaitingConfirmation(PendingAction::ClearCompleted { count });
    }

    fn request_clear_all(&mut self) {
        let count = self.store.counts().total;
        if count == 0 {
            self.notifier.error(MSG_NOTHING_TO_CLEAR);
            return;
        }
        self.interaction = Interaction::AwaitingConfirmation(PendingAction::ClearAll { count });
    }

    fn report(&mut self, err: StoreError) {
        match err {
            StoreError::Validation(err) => self.notifier.error(err.to_string()),
            StoreError::Storage(err) => self.report_storage(err),
        }
    }

    fn report_storage(&mut self, err: StorageError) {
        warn!(error = %err, "task change not persisted");
        self.notifier.error(MSG_SAVE_FAILED);
    }

    fn rerender(&mut self) {
        self.view = render(self.store.tasks(), self.filter.current());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
