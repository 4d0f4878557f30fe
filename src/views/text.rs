use super::{Update, View};
use crate::input::Event;
use crate::model::ResourceItem;
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{MUTED, WARN, highlight_yaml_line, hint_line};
use crate::widgets::Viewport;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TextKind {
    Events,
    Yaml,
    Describe,
}

impl TextKind {
    fn title(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Yaml => "yaml",
            Self::Describe => "describe",
        }
    }
}

/// Read-only scrollable text for one item: yaml, describe output or events.
pub struct TextView {
    kind: Arc<dyn ResourceType>,
    item: ResourceItem,
    text_kind: TextKind,
    viewport: Viewport,
}

impl TextView {
    pub fn new(kind: Arc<dyn ResourceType>, item: ResourceItem, text_kind: TextKind) -> Self {
        let lines = match text_kind {
            TextKind::Yaml => kind.yaml(&item).lines().map(highlight_yaml_line).collect(),
            TextKind::Describe => kind
                .describe(&item)
                .lines()
                .map(|line| Line::from(line.to_string()))
                .collect(),
            TextKind::Events => event_lines(kind.events(&item)),
        };
        Self {
            kind,
            item,
            text_kind,
            viewport: Viewport::new(lines),
        }
    }
}

fn event_lines(events: Vec<String>) -> Vec<Line<'static>> {
    if events.is_empty() {
        return vec![Line::from(Span::styled(
            "No events found.",
            Style::default().fg(MUTED),
        ))];
    }
    events
        .into_iter()
        .map(|event| {
            if event.contains("Warning") {
                Line::from(Span::styled(event, Style::default().fg(WARN)))
            } else {
                Line::from(event)
            }
        })
        .collect()
}

impl View for TextView {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if key.is("esc") {
            return Update::pop();
        }
        self.viewport.handle_key(key);
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        Text::from(self.viewport.visible())
    }

    fn breadcrumb(&self) -> String {
        self.text_kind.title().to_string()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(
                format!(
                    "{} {} {} · {} lines · {}%",
                    self.text_kind.title(),
                    self.kind.tag(),
                    self.item.name,
                    self.viewport.line_count(),
                    self.viewport.percent()
                ),
                Style::default().fg(MUTED),
            )),
            hint_line(&[("j/k", "scroll"), ("g/G", "top/bottom"), ("esc", "back")]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.viewport.set_size(width, usize::from(height));
    }
}

#[cfg(test)]
mod tests {
    use super::{TextKind, TextView};
    use crate::input::Event;
    use crate::model::NamespaceScope;
    use crate::session::Session;
    use crate::ui::line_text;
    use crate::views::{Action, View};

    fn redis(session: &Session) -> (std::sync::Arc<dyn crate::resources::ResourceType>, crate::model::ResourceItem) {
        let kind = session.registry.primary();
        let item = kind
            .items(&NamespaceScope::All)
            .into_iter()
            .find(|item| item.name == "redis")
            .expect("redis");
        (kind, item)
    }

    #[test]
    fn yaml_view_scrolls_and_pops() {
        let session = Session::stub();
        let (kind, item) = redis(&session);
        let mut view = TextView::new(kind, item, TextKind::Yaml);
        view.set_size(80, 3);
        assert_eq!(view.breadcrumb(), "yaml");
        assert_eq!(view.render().lines.len(), 3);
        let first = line_text(&view.render().lines[0]);
        view.update(&Event::key("j"), &session);
        assert_ne!(line_text(&view.render().lines[0]), first);
        assert_eq!(view.update(&Event::key("esc"), &session).action, Action::Pop);
    }

    #[test]
    fn describe_names_the_item() {
        let session = Session::stub();
        let (kind, item) = redis(&session);
        let view = TextView::new(kind, item, TextKind::Describe);
        let text = view
            .render()
            .lines
            .iter()
            .map(line_text)
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("redis"));
        assert_eq!(view.breadcrumb(), "describe");
        let footer = line_text(&view.footer().lines[0]);
        assert!(footer.starts_with("describe Workload redis"), "{footer}");
    }
}
