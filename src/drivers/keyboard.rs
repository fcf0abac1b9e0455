use crossterm::event::{Event, KeyCode, KeyEventKind};

/// Filters raw key events down to presses.
///
/// Release events are dropped everywhere. Held keys auto-repeat; repeated
/// `Esc` presses are collapsed into one so a held key does not keep
/// re-closing freshly opened floating elements.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(key) = evt else {
            return Some(evt);
        };
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                None
            }
            KeyEventKind::Repeat if key.code == KeyCode::Esc => None,
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if key.code == KeyCode::Esc {
                    // Terminals without release reporting never clear this,
                    // so only Windows-style consoles debounce.
                    if cfg!(windows) && self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
        }
    }
}
