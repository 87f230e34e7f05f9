//! Application state and key handling

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::watch;
use wirepad_core::sync::{
    ClearConfirmation, EditActivity, SessionEvent, StatusPresenter, SyncSession,
};
use wirepad_core::{RoomId, SessionConfig};

/// Input mode for the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate; inbound updates apply.
    Browse,
    /// Keys type into the pad; inbound updates are held off.
    Edit,
}

/// Modal overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    None,
    /// Asking whether to really clear the room.
    ConfirmClear,
}

/// The clear modal already asked the user; the gate carries the answer
/// into the session.
struct Confirmed;

impl ClearConfirmation for Confirmed {
    fn confirm_clear(&mut self, _room: &RoomId) -> bool {
        true
    }
}

/// Application state
pub struct App {
    /// The sync session driving everything.
    pub session: SyncSession<EditActivity>,
    /// Shared edit-activity flag, flipped on mode changes.
    pub editing: EditActivity,
    /// Connection state projection for the header.
    pub status: StatusPresenter,
    /// Saved indicator feed.
    saved_rx: watch::Receiver<bool>,
    /// Local editable copy of the pad text.
    pub text: String,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Active modal overlay, if any.
    pub modal: Modal,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(config: SessionConfig) -> Self {
        let editing = EditActivity::new();
        let session = SyncSession::start(config, editing.clone());
        let status = StatusPresenter::new(session.subscribe_status());
        let saved_rx = session.subscribe_saved();

        Self {
            session,
            editing,
            status,
            saved_rx,
            text: String::new(),
            input_mode: InputMode::Browse,
            modal: Modal::None,
            should_quit: false,
        }
    }

    /// Whether the transient "Saved!" light is on.
    pub fn saved_shown(&self) -> bool {
        *self.saved_rx.borrow()
    }

    pub fn room_name(&self) -> &str {
        self.session.room().as_str()
    }

    /// Fold a session event into the display state.
    pub fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::BufferReplaced => {
                self.text = self.session.buffer().to_string();
            }
            // The header reads connection state from the presenter, and
            // discarded updates are invisible by design.
            SessionEvent::Online | SessionEvent::Offline | SessionEvent::RemoteDiscarded => {}
        }
    }

    pub fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.modal == Modal::ConfirmClear {
            self.handle_confirm_key(code);
            return;
        }

        // Save and clear work in both modes.
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('s') => {
                    self.session.save();
                    return;
                }
                KeyCode::Char('k') => {
                    self.modal = Modal::ConfirmClear;
                    return;
                }
                _ => {}
            }
        }

        match self.input_mode {
            InputMode::Browse => self.handle_browse_key(code),
            InputMode::Edit => self.handle_edit_key(code),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('i') | KeyCode::Enter => self.enter_edit_mode(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.leave_edit_mode(),
            KeyCode::Char(c) => {
                self.text.push(c);
                self.push_edit();
            }
            KeyCode::Enter => {
                self.text.push('\n');
                self.push_edit();
            }
            KeyCode::Backspace => {
                self.text.pop();
                self.push_edit();
            }
            KeyCode::Tab => {
                self.text.push_str("    ");
                self.push_edit();
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.modal = Modal::None;
                self.session.clear(&mut Confirmed);
                self.text.clear();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.modal = Modal::None;
            }
            _ => {}
        }
    }

    fn enter_edit_mode(&mut self) {
        self.input_mode = InputMode::Edit;
        self.editing.set_editing(true);
    }

    fn leave_edit_mode(&mut self) {
        self.input_mode = InputMode::Browse;
        self.editing.set_editing(false);
    }

    fn push_edit(&mut self) {
        self.session.note_local_edit(self.text.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wirepad_core::sync::EditAwareness;

    // Endpoint nothing listens on; these tests never need the channel.
    fn test_app() -> App {
        let endpoint = Url::parse("ws://127.0.0.1:9/ws/demo").unwrap();
        let config = SessionConfig::new(endpoint, RoomId::from_path("/demo"));
        App::new(config)
    }

    #[tokio::test]
    async fn test_typing_updates_pad_and_session() {
        let mut app = test_app();

        app.on_key(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Edit);
        assert!(app.editing.is_editing());

        app.on_key(KeyCode::Char('h'), KeyModifiers::NONE);
        app.on_key(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(app.text, "hi");
        assert_eq!(app.session.buffer(), "hi");

        app.on_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.session.buffer(), "h");
    }

    #[tokio::test]
    async fn test_esc_leaves_edit_mode() {
        let mut app = test_app();

        app.on_key(KeyCode::Char('i'), KeyModifiers::NONE);
        app.on_key(KeyCode::Esc, KeyModifiers::NONE);

        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(!app.editing.is_editing());
    }

    #[tokio::test]
    async fn test_clear_asks_before_wiping() {
        let mut app = test_app();

        app.on_key(KeyCode::Char('i'), KeyModifiers::NONE);
        app.on_key(KeyCode::Char('x'), KeyModifiers::NONE);

        app.on_key(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(app.modal, Modal::ConfirmClear);

        // Declining leaves the pad alone.
        app.on_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.modal, Modal::None);
        assert_eq!(app.text, "x");

        // Confirming wipes it.
        app.on_key(KeyCode::Char('k'), KeyModifiers::CONTROL);
        app.on_key(KeyCode::Char('y'), KeyModifiers::NONE);
        assert_eq!(app.text, "");
        assert_eq!(app.session.buffer(), "");
    }

    #[tokio::test]
    async fn test_remote_update_refreshes_pad() {
        let mut app = test_app();

        app.session.apply_remote("from afar".to_string());
        app.on_session_event(SessionEvent::BufferReplaced);

        assert_eq!(app.text, "from afar");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app();
        app.on_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);

        let mut app = test_app();
        app.on_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
