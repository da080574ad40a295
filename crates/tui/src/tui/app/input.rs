use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::core::{DialogInput, DialogView, FieldEdit, FilterMode};
use crate::tui::constants::{STATUS_BUSY, STATUS_HELP};
use crate::tui::helpers::contains;

use super::{App, Focus};

#[derive(Debug, Clone, Copy)]
pub(crate) enum ListAction {
    Quit,
    FocusInput,
    ShowHelp,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    ToggleDone,
    Rename,
    Delete,
    DeleteDone,
    DeleteAll,
    Filter(FilterMode),
    NextFilter,
    PrevFilter,
}

impl ListAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('i') | KeyCode::Char('a') => Some(Self::FocusInput),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Char(' ') => Some(Self::ToggleDone),
            KeyCode::Char('e') | KeyCode::Enter => Some(Self::Rename),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('D') => Some(Self::DeleteDone),
            KeyCode::Char('X') => Some(Self::DeleteAll),
            KeyCode::Char('1') => Some(Self::Filter(FilterMode::All)),
            KeyCode::Char('2') => Some(Self::Filter(FilterMode::Active)),
            KeyCode::Char('3') => Some(Self::Filter(FilterMode::Done)),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Self::NextFilter),
            KeyCode::BackTab | KeyCode::Left => Some(Self::PrevFilter),
            _ => None,
        }
    }

    /// Actions that open a dialog and therefore wait for the previous one.
    fn needs_dialog(self) -> bool {
        matches!(
            self,
            Self::Rename | Self::Delete | Self::DeleteDone | Self::DeleteAll
        )
    }
}

fn field_edit(key: &KeyEvent) -> Option<FieldEdit> {
    match key.code {
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            None
        }
        KeyCode::Char(c) => Some(FieldEdit::Insert(c)),
        KeyCode::Backspace => Some(FieldEdit::Backspace),
        KeyCode::Delete => Some(FieldEdit::Delete),
        KeyCode::Left => Some(FieldEdit::Left),
        KeyCode::Right => Some(FieldEdit::Right),
        KeyCode::Home => Some(FieldEdit::Home),
        KeyCode::End => Some(FieldEdit::End),
        _ => None,
    }
}

impl App {
    pub(crate) fn on_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if let Some(dialog) = self.controller.modal().current() {
            self.handle_dialog_key(key, &dialog);
            return Ok(());
        }

        if self.show_help {
            self.handle_help_key(key);
            return Ok(());
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::List => self.handle_list_key(key),
        }
        Ok(())
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let Some(hitboxes) = self.hitboxes else {
            return;
        };
        if !self.controller.modal().is_open() {
            return;
        }

        let input = if contains(hitboxes.primary, mouse.column, mouse.row) {
            DialogInput::Confirm
        } else if contains(hitboxes.secondary, mouse.column, mouse.row) {
            DialogInput::Cancel
        } else if !contains(hitboxes.popup, mouse.column, mouse.row) {
            DialogInput::OutsideClick
        } else {
            return;
        };
        self.controller.modal().dispatch(input);
    }

    fn handle_dialog_key(&mut self, key: KeyEvent, dialog: &DialogView) {
        let input = match key.code {
            KeyCode::Esc => Some(DialogInput::Escape),
            KeyCode::Enter => Some(DialogInput::Enter),
            _ if dialog.is_prompt() => field_edit(&key).map(DialogInput::Edit),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                Some(DialogInput::FocusNext)
            }
            KeyCode::Char('y') => Some(DialogInput::Confirm),
            KeyCode::Char('n') => Some(DialogInput::Cancel),
            _ => None,
        };

        if let Some(input) = input {
            self.controller.modal().dispatch(input);
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.show_help = false;
            self.status = None;
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.add_task(),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Down => self.focus_list(),
            _ => {
                if let Some(edit) = field_edit(&key) {
                    self.controller.edit_input(edit);
                }
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let Some(action) = ListAction::from_event(&key) else {
            return;
        };
        if action.needs_dialog() && self.in_flight {
            self.set_status_info(STATUS_BUSY);
            return;
        }
        self.execute_list_action(action);
    }

    fn execute_list_action(&mut self, action: ListAction) {
        match action {
            ListAction::Quit => self.should_quit = true,
            ListAction::FocusInput => self.focus_input(),
            ListAction::ShowHelp => {
                self.show_help = true;
                self.set_status_info(STATUS_HELP);
            }
            ListAction::SelectNext => self.select_next(),
            ListAction::SelectPrev => self.select_prev(),
            ListAction::SelectFirst => self.select_first(),
            ListAction::SelectLast => self.select_last(),
            ListAction::ToggleDone => self.toggle_selected(),
            ListAction::Rename => self.rename_selected(),
            ListAction::Delete => self.delete_selected(),
            ListAction::DeleteDone => self.delete_done(),
            ListAction::DeleteAll => self.delete_all(),
            ListAction::Filter(mode) => self.set_filter(mode),
            ListAction::NextFilter => {
                let mode = self.controller.filter().next();
                self.set_filter(mode);
            }
            ListAction::PrevFilter => {
                let mode = self.controller.filter().prev();
                self.set_filter(mode);
            }
        }
    }
}
