use std::time::Instant;

use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use crate::config::AppConfig;
use crate::core::{Controller, Effects, Intent, Interaction, TaskRow};

mod input;
mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

pub(crate) struct App {
    config: AppConfig,
    controller: Controller,
    focus: Focus,
    input: TextBuffer,
    edit: TextBuffer,
    confirm_choice: ConfirmChoice,
    selected: usize,
    table_state: TableState,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, controller: Controller) -> Self {
        let mut app = Self {
            config,
            controller,
            focus: Focus::Input,
            input: TextBuffer::new(),
            edit: TextBuffer::new(),
            confirm_choice: ConfirmChoice::No,
            selected: 0,
            table_state: TableState::default(),
            show_help: false,
            should_quit: false,
        };
        app.sync_selection();
        app
    }

    pub(crate) fn on_tick(&mut self) {
        self.controller.tick(Instant::now());
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn rows(&self) -> &[TaskRow] {
        self.controller.view().rows()
    }

    fn selected_row(&self) -> Option<&TaskRow> {
        self.rows().get(self.selected)
    }

    /// Send an intent to the controller and apply what it asks of the surface.
    fn dispatch(&mut self, intent: Intent) {
        let Effects {
            clear_input,
            focus_input,
        } = self.controller.dispatch(intent);
        if clear_input {
            self.input.clear();
        }
        if focus_input {
            self.focus = Focus::Input;
        }
        self.enter_modal();
        self.sync_selection();
    }

    /// Prime the prompt widgets for whichever modal the controller just opened.
    fn enter_modal(&mut self) {
        match self.controller.interaction() {
            Interaction::AwaitingEdit { original, .. } => {
                let original = original.clone();
                self.edit.set(original);
            }
            Interaction::AwaitingConfirmation(_) => {
                self.confirm_choice = ConfirmChoice::No;
            }
            Interaction::Idle => {}
        }
    }

    fn answer_confirmation(&mut self, accepted: bool) {
        self.controller.confirm(accepted);
        self.sync_selection();
    }

    fn finish_edit(&mut self, save: bool) {
        if save {
            let text = self.edit.as_str().to_string();
            self.controller.finish_edit(Some(&text));
        } else {
            self.controller.finish_edit(None);
        }
        self.edit.clear();
        self.sync_selection();
    }

    fn act_on_selected(&mut self, make: fn(&TaskRow) -> Intent) {
        if let Some(intent) = self.selected_row().map(make) {
            self.dispatch(intent);
        }
    }

    fn sync_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= len {
                self.selected = len - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.rows().is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.rows().is_empty() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = len - 1;
            self.table_state.select(Some(self.selected));
        }
    }
}
