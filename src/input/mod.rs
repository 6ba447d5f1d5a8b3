use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, Focus, Panel};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        let _ = mouse_enabled;
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                match event::read() {
                    Ok(CtEvent::Key(k)) => {
                        if k.kind == KeyEventKind::Press
                            && tx.blocking_send(Event::Input(InputEvent::Key(k))).is_err()
                        {
                            break;
                        }
                    }
                    Ok(CtEvent::Mouse(m)) => {
                        if tx.blocking_send(Event::Input(InputEvent::Mouse(m))).is_err() {
                            break;
                        }
                    }
                    Ok(CtEvent::Resize(_, _)) => {
                        if tx.blocking_send(Event::Input(InputEvent::Resize)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => {}
                }
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::ListUp),
            MouseEventKind::ScrollDown => Some(Action::ListDown),
            _ => None,
        },
        InputEvent::Key(k) => match state.panel {
            Panel::Search => handle_search_panel(state, k),
            Panel::Video => handle_video_panel(k),
            Panel::Playlist => handle_playlist_panel(state, k),
            Panel::Help => handle_cards(k),
        },
    }
}

fn handle_search_panel(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    match state.search_focus {
        Focus::Input => handle_text_input(state, k),
        Focus::Cards => match k.code {
            KeyCode::Char('/') | KeyCode::Char('i') => Some(Action::FocusInput),
            KeyCode::Esc => Some(Action::FocusInput),
            _ => handle_cards(k),
        },
    }
}

fn handle_playlist_panel(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    match state.playlist_focus {
        Focus::Input => handle_text_input(state, k),
        Focus::Cards => match k.code {
            KeyCode::Char('/') | KeyCode::Char('i') => Some(Action::FocusInput),
            KeyCode::Esc => Some(Action::FocusInput),
            // Pager: change the visible page, not the playing item.
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PagePrev),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::PageNext),
            _ => handle_cards(k),
        },
    }
}

fn handle_video_panel(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextPanel),
        KeyCode::BackTab => Some(Action::PrevPanel),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearInput)
        }
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_text_input(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextPanel),
        KeyCode::BackTab => Some(Action::PrevPanel),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearInput)
        }
        KeyCode::Down => {
            let has_cards = match state.panel {
                Panel::Search => !state.search_items.is_empty(),
                Panel::Playlist => !state.navigator.cache().items().is_empty(),
                _ => false,
            };
            has_cards.then_some(Action::FocusList)
        }
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

/// Keys shared by every card-list context.
fn handle_cards(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextPanel),
        KeyCode::BackTab => Some(Action::PrevPanel),
        KeyCode::Char('1') => Some(Action::SetPanel(Panel::Search)),
        KeyCode::Char('2') => Some(Action::SetPanel(Panel::Video)),
        KeyCode::Char('3') => Some(Action::SetPanel(Panel::Playlist)),
        KeyCode::Char('4') | KeyCode::Char('?') | KeyCode::F(1) => {
            Some(Action::SetPanel(Panel::Help))
        }

        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('g') => Some(Action::GoTop),
        KeyCode::Char('G') => Some(Action::GoBottom),
        KeyCode::Enter => Some(Action::Activate),

        KeyCode::Char('n') => Some(Action::PlayNext),
        KeyCode::Char('p') => Some(Action::PlayPrev),

        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char(']') => Some(Action::SeekForward),
        KeyCode::Char('[') => Some(Action::SeekBack),

        KeyCode::Char('r') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Refresh),
        KeyCode::F(5) => Some(Action::Refresh),

        _ => None,
    }
}
