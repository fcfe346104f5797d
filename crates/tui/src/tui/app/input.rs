use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{Filter, Intent, Interaction, TaskRow};

use super::{App, ConfirmChoice, Focus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListAction {
    Quit,
    FocusInput,
    ShowHelp,
    DismissNotification,
    Toggle,
    Edit,
    Delete,
    ClearCompleted,
    ClearAll,
    SelectFilter(Filter),
    NextFilter,
    PrevFilter,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

impl ListAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') | KeyCode::Char('i') => Some(Self::FocusInput),
            KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Esc => Some(Self::DismissNotification),
            KeyCode::Char(' ') => Some(Self::Toggle),
            KeyCode::Char('e') | KeyCode::Enter => Some(Self::Edit),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('C') => Some(Self::ClearCompleted),
            KeyCode::Char('X') => Some(Self::ClearAll),
            KeyCode::Char('1') => Some(Self::SelectFilter(Filter::All)),
            KeyCode::Char('2') => Some(Self::SelectFilter(Filter::Active)),
            KeyCode::Char('3') => Some(Self::SelectFilter(Filter::Completed)),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Self::NextFilter),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Self::PrevFilter),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home | KeyCode::Char('g') => Some(Self::SelectFirst),
            KeyCode::End | KeyCode::Char('G') => Some(Self::SelectLast),
            _ => None,
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Terminals report Ctrl+/ as either `/` or `_` with the control modifier.
fn is_focus_accelerator(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('/') | KeyCode::Char('_'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        if is_quit(&key) {
            self.should_quit = true;
            return;
        }
        if self.show_help {
            self.handle_help_mode(key);
            return;
        }

        match self.controller.interaction() {
            Interaction::AwaitingConfirmation(_) => self.handle_confirm_mode(key),
            Interaction::AwaitingEdit { .. } => self.handle_edit_mode(key),
            Interaction::Idle => {
                if is_focus_accelerator(&key) {
                    self.dispatch(Intent::FocusInput);
                    return;
                }
                match self.focus {
                    Focus::Input => self.handle_input_mode(key),
                    Focus::List => {
                        if let Some(action) = ListAction::from_event(&key) {
                            self.execute_list_action(action);
                        }
                    }
                }
            }
        }
    }

    fn execute_list_action(&mut self, action: ListAction) {
        match action {
            ListAction::Quit => self.should_quit = true,
            ListAction::FocusInput => self.dispatch(Intent::FocusInput),
            ListAction::ShowHelp => self.show_help = true,
            ListAction::DismissNotification => self.controller.dismiss_notification(),
            ListAction::Toggle => self.act_on_selected(TaskRow::toggle_intent),
            ListAction::Edit => self.act_on_selected(TaskRow::edit_intent),
            ListAction::Delete => self.act_on_selected(TaskRow::delete_intent),
            ListAction::ClearCompleted => self.dispatch(Intent::ClearCompleted),
            ListAction::ClearAll => self.dispatch(Intent::ClearAll),
            ListAction::SelectFilter(filter) => self.select_filter(filter),
            ListAction::NextFilter => self.select_filter(self.controller.filter().next()),
            ListAction::PrevFilter => self.select_filter(self.controller.filter().prev()),
            ListAction::SelectNext => self.select_next(),
            ListAction::SelectPrev => self.select_prev(),
            ListAction::SelectFirst => self.select_first(),
            ListAction::SelectLast => self.select_last(),
        }
    }

    fn select_filter(&mut self, filter: Filter) {
        if filter != self.controller.filter() {
            self.selected = 0;
        }
        self.dispatch(Intent::SelectFilter(filter));
    }

    fn handle_input_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = self.input.as_str().to_string();
                self.dispatch(Intent::Submit(text));
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::Down => self.focus = Focus::List,
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete_char(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert_char(c)
            }
            _ => {}
        }
    }

    fn handle_edit_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.finish_edit(true),
            KeyCode::Esc => self.finish_edit(false),
            KeyCode::Backspace => self.edit.backspace(),
            KeyCode::Delete => self.edit.delete_char(),
            KeyCode::Left => self.edit.move_left(),
            KeyCode::Right => self.edit.move_right(),
            KeyCode::Home => self.edit.move_home(),
            KeyCode::End => self.edit.move_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit.insert_char(c)
            }
            _ => {}
        }
    }

    fn handle_confirm_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.answer_confirmation(false)
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.answer_confirmation(true),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => {
                let accepted = self.confirm_choice == ConfirmChoice::Yes;
                self.answer_confirmation(accepted);
            }
            _ => {}
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            self.show_help = false;
        }
    }
}
