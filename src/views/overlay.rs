use super::{Effect, Update, View};
use crate::input::{Event, Msg};
use crate::model::{ALL_NAMESPACES, PickerKind};
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, SELECTED, framed_box, hint_line};
use crate::widgets::FilterList;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

const BOX_WIDTH: usize = 48;

/// A centred namespace or context chooser. Picking emits `Selected` and pops;
/// the host applies the value.
pub struct OverlayPicker {
    kind: PickerKind,
    current: String,
    list: FilterList,
    width: u16,
    height: u16,
}

impl OverlayPicker {
    pub fn new(kind: PickerKind, items: Vec<String>, current: &str) -> Self {
        let mut values = items;
        if kind == PickerKind::Namespace && !values.iter().any(|value| value == ALL_NAMESPACES) {
            values.insert(0, ALL_NAMESPACES.to_string());
        }
        let mut list = FilterList::new(values);
        list.start_filter();
        if let Some(position) = list
            .visible()
            .iter()
            .position(|entry| list.value(entry.index) == Some(current))
        {
            list.select_visible(position);
        }
        Self {
            kind,
            current: current.to_string(),
            list,
            width: 80,
            height: 20,
        }
    }

    pub fn for_session(kind: PickerKind, session: &Session) -> Self {
        match kind {
            PickerKind::Namespace => Self::new(
                kind,
                session.registry.namespaces().to_vec(),
                &session.namespace.label(),
            ),
            PickerKind::Context => Self::new(
                kind,
                session.registry.contexts().to_vec(),
                &session.context,
            ),
        }
    }

    #[cfg(test)]
    pub fn filter(&self) -> &str {
        self.list.filter()
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.list
            .selected_index()
            .and_then(|index| self.list.value(index))
    }

    fn rows(&self) -> usize {
        usize::from(self.height).saturating_sub(4).clamp(1, 12)
    }
}

impl View for OverlayPicker {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        match key.as_str() {
            "esc" => return Update::pop(),
            "enter" => {
                let Some(value) = self.selected_value() else {
                    return Update::none();
                };
                return Update::pop().with_effect(Effect::Emit(Msg::Selected {
                    kind: self.kind,
                    value: value.to_string(),
                }));
            }
            "backspace" | "ctrl+h" => self.list.pop_char(),
            "up" | "down" | "pgup" | "pgdown" | "home" | "end" | "ctrl+u" | "ctrl+d" => {
                self.list.handle_key(key);
            }
            _ => {
                if let Some(rune) = key.rune() {
                    self.list.push_char(rune);
                }
            }
        }
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        let mut lines = vec![Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT)),
            Span::raw(format!("{}▏", self.list.filter())),
        ])];
        let cursor = self.list.cursor();
        let (start, _) = self.list.page_bounds();
        for (offset, entry) in self.list.page_entries().iter().enumerate() {
            let value = self.list.value(entry.index).unwrap_or_default().to_string();
            let marker = if value == self.current { "● " } else { "  " };
            let style = if start + offset == cursor {
                Style::default().bg(SELECTED).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::styled(value, style),
            ]));
        }
        if self.list.visible().is_empty() {
            lines.push(Line::from(Span::styled(
                "  no matches",
                Style::default().fg(MUTED),
            )));
        }
        Text::from(framed_box(
            self.kind.title(),
            lines,
            BOX_WIDTH,
            self.width,
            self.height,
        ))
    }

    fn breadcrumb(&self) -> String {
        self.kind.title().to_string()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(self.list.showing(), Style::default().fg(MUTED))),
            hint_line(&[("type", "filter"), ("enter", "select"), ("esc", "cancel")]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let rows = self.rows();
        self.list.set_per_page(rows);
    }

    fn suppress_global_keys(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::OverlayPicker;
    use crate::input::{Event, Msg};
    use crate::model::{ALL_NAMESPACES, PickerKind};
    use crate::session::Session;
    use crate::views::{Action, Effect, View};

    fn namespaces() -> Vec<String> {
        ["default", "payments", "monitoring", "kube-system"]
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn namespace_picker_offers_all_and_selects_current() {
        let picker = OverlayPicker::new(PickerKind::Namespace, namespaces(), "payments");
        assert_eq!(picker.selected_value(), Some("payments"));
        assert_eq!(picker.breadcrumb(), "namespaces");
        assert!(picker.suppress_global_keys());
        let contexts = OverlayPicker::new(PickerKind::Context, vec!["kind-dev".to_string()], "");
        assert_eq!(contexts.selected_value(), Some("kind-dev"));
        let with_all = OverlayPicker::new(PickerKind::Namespace, namespaces(), ALL_NAMESPACES);
        assert_eq!(with_all.selected_value(), Some(ALL_NAMESPACES));
    }

    #[test]
    fn typing_filters_and_enter_emits_selection() {
        let session = Session::stub();
        let mut picker = OverlayPicker::new(PickerKind::Namespace, namespaces(), "default");
        for key in ["m", "o", "n"] {
            picker.update(&Event::key(key), &session);
        }
        assert_eq!(picker.filter(), "mon");
        let update = picker.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::Pop);
        assert_eq!(
            update.effect,
            Some(Effect::Emit(Msg::Selected {
                kind: PickerKind::Namespace,
                value: "monitoring".to_string(),
            }))
        );
    }

    #[test]
    fn enter_without_matches_is_a_no_op() {
        let session = Session::stub();
        let mut picker = OverlayPicker::new(PickerKind::Namespace, namespaces(), "default");
        picker.update(&Event::key("z"), &session);
        picker.update(&Event::key("z"), &session);
        let update = picker.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::None);
        assert!(update.effect.is_none());
        picker.update(&Event::key("backspace"), &session);
        assert_eq!(picker.filter(), "z");
        assert_eq!(picker.update(&Event::key("esc"), &session).action, Action::Pop);
    }
}
