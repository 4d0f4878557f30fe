use super::table::{Cell, header_line, row_line};
use super::{ListView, TextKind, TextView, Update, View};
use crate::input::Event;
use crate::model::ResourceItem;
use crate::resources::relations::{RelatedKind, Relation, RelationEntry, entries_for};
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{MUTED, hint_line};
use crate::widgets::FilterList;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;

/// Relation categories of one item, each opening a list of related items.
pub struct RelatedView {
    kind: Arc<dyn ResourceType>,
    item: ResourceItem,
    entries: Vec<RelationEntry>,
    list: FilterList,
}

impl RelatedView {
    pub fn new(session: &Session, kind: Arc<dyn ResourceType>, item: ResourceItem) -> Self {
        let entries = entries_for(&session.registry, kind.as_ref(), &item);
        let list = FilterList::new(entries.iter().map(|entry| entry.label.clone()).collect());
        Self {
            kind,
            item,
            entries,
            list,
        }
    }

    #[cfg(test)]
    pub fn relations(&self) -> Vec<Relation> {
        self.entries.iter().map(|entry| entry.relation).collect()
    }

    fn selected(&self) -> Option<&RelationEntry> {
        self.list
            .selected_index()
            .and_then(|index| self.entries.get(index))
    }

    fn open(&self, session: &Session) -> Update {
        let Some(entry) = self.selected() else {
            return Update::none();
        };
        if entry.relation == Relation::Events {
            return Update::push(TextView::new(
                self.kind.clone(),
                self.item.clone(),
                TextKind::Events,
            ));
        }
        let related = RelatedKind::new(&session.registry, entry.relation, &self.item);
        Update::push(ListView::new(Arc::new(related), session))
    }
}

impl View for RelatedView {
    fn update(&mut self, event: &Event, session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        match key.as_str() {
            "esc" => Update::pop(),
            "enter" | "l" | "right" => self.open(session),
            _ => {
                self.list.handle_key(key);
                Update::none()
            }
        }
    }

    fn render(&self) -> Text<'static> {
        let mut lines = vec![header_line(&[
            ("RELATION".to_string(), 12),
            ("COUNT".to_string(), 5),
            ("DESCRIPTION".to_string(), 48),
        ])];
        let cursor = self.list.cursor();
        let (start, _) = self.list.page_bounds();
        for (offset, visible) in self.list.page_entries().iter().enumerate() {
            let Some(entry) = self.entries.get(visible.index) else {
                continue;
            };
            let count_style = if entry.count == 0 {
                Style::default().fg(MUTED)
            } else {
                Style::default().fg(Color::White)
            };
            let cells = vec![
                Cell::new(entry.label.clone(), 12),
                Cell::new(entry.count.to_string(), 5).styled(count_style),
                Cell::new(entry.description.clone(), 48).styled(Style::default().fg(MUTED)),
            ];
            lines.push(row_line(cells, start + offset == cursor));
        }
        Text::from(lines)
    }

    fn breadcrumb(&self) -> String {
        "related".to_string()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(
                format!("Related to {} · {}", self.item.name, self.list.showing()),
                Style::default().fg(MUTED),
            )),
            hint_line(&[("enter", "open"), ("j/k", "move"), ("esc", "back")]),
        ])
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.list
            .set_per_page(usize::from(height).saturating_sub(1).max(1));
    }

    fn next_breadcrumb(&self) -> Option<String> {
        self.selected().map(|entry| entry.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::RelatedView;
    use crate::input::Event;
    use crate::model::NamespaceScope;
    use crate::resources::relations::Relation;
    use crate::session::Session;
    use crate::views::{Action, View};

    fn related_for(session: &Session, kind: &str, prefix: &str) -> RelatedView {
        let kind = session.registry.by_name(kind).expect("kind");
        let item = kind
            .items(&NamespaceScope::All)
            .into_iter()
            .find(|item| item.name.starts_with(prefix))
            .expect("item");
        RelatedView::new(session, kind, item)
    }

    #[test]
    fn workload_relations_open_lists_and_events() {
        let session = Session::stub();
        let mut view = related_for(&session, "workloads", "api-gateway");
        assert_eq!(view.relations()[..2], [Relation::Events, Relation::Pods]);
        assert_eq!(view.breadcrumb(), "related");

        let events = view.update(&Event::key("enter"), &session);
        assert_eq!(events.next.map(|next| next.breadcrumb()), Some("events".to_string()));

        view.update(&Event::key("j"), &session);
        assert_eq!(view.next_breadcrumb(), Some("pods".to_string()));
        let update = view.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::Push);
        assert_eq!(update.next.map(|next| next.breadcrumb()), Some("pods".to_string()));
    }

    #[test]
    fn pods_relate_to_their_owner() {
        let session = Session::stub();
        let view = related_for(&session, "pods", "payments-api-");
        assert_eq!(view.relations(), vec![Relation::Owner, Relation::Events]);
    }
}
