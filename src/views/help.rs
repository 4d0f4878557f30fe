use super::{Update, View};
use crate::input::Event;
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, hint_line};
use crate::widgets::Viewport;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q, ctrl+c", "quit"),
            ("left, backspace", "back; at the root, cycle namespace and context scope"),
            ("space", "page down"),
            ("W P D S C K V O E", "jump to a resource kind"),
            ("n", "pick namespace"),
            ("x", "pick context"),
            (":", "browse every resource kind"),
            ("?", "this help"),
        ],
    ),
    (
        "Lists",
        &[
            ("j/k, up/down", "move"),
            ("g/G, home/end", "first / last"),
            ("ctrl+u/ctrl+d", "page up / down"),
            ("enter, l, right", "open"),
            ("/", "filter, esc clears"),
            ("f", "find: jump to the next letter typed"),
            ("s", "cycle sort mode"),
            ("c", "choose columns"),
            ("y d e o r", "yaml, describe, events, logs, related"),
        ],
    ),
    (
        "Detail",
        &[
            ("o", "logs"),
            ("d", "describe"),
            ("e", "events"),
            ("y", "yaml"),
            ("r", "related resources"),
        ],
    ),
    (
        "Logs",
        &[
            ("f", "follow new lines"),
            ("w", "wrap long lines"),
            ("t", "toggle previous container"),
            ("[ ]", "narrow / widen the since window"),
            ("/", "search, enter reports matches"),
        ],
    ),
    (
        "Pickers",
        &[
            ("type", "filter namespaces and contexts"),
            ("space", "toggle a column"),
            ("r", "revert column changes"),
            ("enter", "apply"),
            ("esc", "cancel"),
        ],
    ),
];

pub struct HelpView {
    viewport: Viewport,
}

impl HelpView {
    pub fn new() -> Self {
        let mut lines = Vec::new();
        for (title, bindings) in SECTIONS {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                title.to_string(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )));
            for (keys, action) in bindings.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {keys:<20}"), Style::default().fg(ACCENT)),
                    Span::raw(action.to_string()),
                ]));
            }
        }
        Self {
            viewport: Viewport::new(lines),
        }
    }
}

impl Default for HelpView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for HelpView {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if key.is_any(&["esc", "?"]) {
            return Update::pop();
        }
        self.viewport.handle_key(key);
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        Text::from(self.viewport.visible())
    }

    fn breadcrumb(&self) -> String {
        "help".to_string()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(
                format!("{}%", self.viewport.percent()),
                Style::default().fg(MUTED),
            )),
            hint_line(&[("j/k", "scroll"), ("esc", "close")]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.viewport.set_size(width, usize::from(height));
    }
}
