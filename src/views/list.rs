use super::table::{Cell, header_line, row_line};
use super::{ColumnPicker, DetailView, Effect, Selection, Update, View, item_shortcut};
use crate::input::{Event, Key, Msg};
use crate::model::{ALL_NAMESPACES, NamespaceScope, PickerKind, ResourceItem, SortMode, TableColumn};
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, hint_line, status_style};
use crate::widgets::FilterList;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::collections::BTreeSet;
use std::sync::Arc;

const WIDE_LAYOUT: u16 = 120;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Mode {
    Browse,
    /// Root of the namespace/context scope: `enter` selects instead of opening.
    Scope(PickerKind),
}

pub struct ListView {
    kind: Arc<dyn ResourceType>,
    mode: Mode,
    namespace: NamespaceScope,
    current: String,
    items: Vec<ResourceItem>,
    list: FilterList,
    pool: Vec<TableColumn>,
    columns: Vec<TableColumn>,
    custom_columns: bool,
    sort_modes: Vec<SortMode>,
    sort_index: usize,
    find_armed: bool,
    width: u16,
}

impl ListView {
    pub fn new(kind: Arc<dyn ResourceType>, session: &Session) -> Self {
        let sort_modes = kind.sort_modes();
        let mut view = Self {
            pool: kind.columns(),
            kind,
            mode: Mode::Browse,
            namespace: session.namespace.clone(),
            current: String::new(),
            items: Vec::new(),
            list: FilterList::new(Vec::new()),
            columns: Vec::new(),
            custom_columns: false,
            sort_modes,
            sort_index: 0,
            find_armed: false,
            width: 80,
        };
        view.reload();
        view.refresh_columns(session);
        view
    }

    /// The root list shown while the namespace or context scope is active.
    pub fn scope_picker(picker: PickerKind, session: &Session) -> Self {
        let (kind, current) = match picker {
            PickerKind::Namespace => (session.registry.namespace_kind(), session.namespace.label()),
            PickerKind::Context => (session.registry.context_kind(), session.context.clone()),
        };
        let mut view = Self::new(kind, session);
        view.mode = Mode::Scope(picker);
        view.current = current;
        view.reload();
        if let Some(position) = view
            .list
            .visible()
            .iter()
            .position(|entry| view.items[entry.index].name == view.current)
        {
            view.list.select_visible(position);
        }
        view
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_modes
            .get(self.sort_index)
            .copied()
            .unwrap_or(SortMode::Name)
    }

    pub fn selected_item(&self) -> Option<&ResourceItem> {
        self.list
            .selected_index()
            .and_then(|index| self.items.get(index))
    }

    #[cfg(test)]
    pub fn visible_names(&self) -> Vec<&str> {
        self.list
            .visible()
            .iter()
            .map(|entry| self.items[entry.index].name.as_str())
            .collect()
    }

    #[cfg(test)]
    pub fn visible_column_ids(&self) -> Vec<&str> {
        self.display_columns()
            .iter()
            .map(|column| column.id.as_str())
            .collect()
    }

    fn reload(&mut self) {
        let mut items = self.kind.items(&self.namespace);
        self.kind.sort(&mut items, self.sort_mode());
        if self.mode == Mode::Scope(PickerKind::Namespace) {
            items.insert(
                0,
                ResourceItem {
                    name: ALL_NAMESPACES.to_string(),
                    status: "-".to_string(),
                    kind: self.kind.tag().to_string(),
                    ..ResourceItem::default()
                },
            );
        }
        let names = items.iter().map(|item| item.filter_value().to_string()).collect();
        self.items = items;
        self.list.set_values(names);
    }

    fn refresh_columns(&mut self, session: &Session) {
        let mut columns = session.columns.get(self.kind.name(), &self.pool);
        if self.shows_namespace_column() {
            columns.insert(0, TableColumn::new("namespace", "NAMESPACE", 14, true));
        }
        self.columns = columns;
        self.custom_columns = session.columns.is_custom(self.kind.name());
    }

    fn shows_namespace_column(&self) -> bool {
        self.namespace.is_all() && self.kind.namespaced() && self.mode == Mode::Browse
    }

    fn display_columns(&self) -> Vec<&TableColumn> {
        self.columns
            .iter()
            .filter(|column| !column.wide_only || self.width >= WIDE_LAYOUT)
            .collect()
    }

    fn cycle_sort(&mut self) {
        if self.sort_modes.is_empty() {
            return;
        }
        self.sort_index = (self.sort_index + 1) % self.sort_modes.len();
        let selected = self.selected_item().map(|item| item.name.clone());
        self.reload();
        if let Some(name) = selected {
            self.select_name(&name);
        }
    }

    fn select_name(&mut self, name: &str) {
        if let Some(position) = self
            .list
            .visible()
            .iter()
            .position(|entry| self.items[entry.index].name == name)
        {
            self.list.select_visible(position);
        }
    }

    fn column_picker(&self) -> ColumnPicker {
        let labels = self
            .items
            .iter()
            .flat_map(|item| item.labels.keys().cloned())
            .collect::<BTreeSet<_>>();
        let visible = self
            .columns
            .iter()
            .map(|column| column.id.clone())
            .collect::<Vec<_>>();
        ColumnPicker::new(
            self.kind.name(),
            self.pool.clone(),
            labels.into_iter().collect(),
            visible,
            self.shows_namespace_column(),
        )
    }

    fn handle_key(&mut self, key: &Key, session: &Session) -> Update {
        if self.list.is_filtering() {
            self.list.edit_key(key);
            return Update::none();
        }
        if self.find_armed {
            self.find_armed = false;
            if let Some(ch) = key.rune() {
                self.list.jump_to_initial(ch);
            }
            return Update::none();
        }

        match key.as_str() {
            "/" => {
                self.list.start_filter();
                return Update::none();
            }
            "f" => {
                self.find_armed = true;
                return Update::none();
            }
            "s" => {
                self.cycle_sort();
                return Update::none();
            }
            "c" => return Update::push(self.column_picker()),
            "esc" => {
                if self.list.is_filtered() {
                    self.list.clear_filter();
                    return Update::none();
                }
                return Update::pop();
            }
            "enter" | "l" | "right" => return self.open_selected(),
            _ => {}
        }

        if self.list.handle_key(key) {
            return Update::none();
        }
        if let (Some(rune), Some(selection)) = (key.rune(), self.selection())
            && let Some(update) = item_shortcut(rune, session, selection)
        {
            return update;
        }
        Update::none()
    }

    fn open_selected(&self) -> Update {
        let Some(item) = self.selected_item() else {
            return Update::none();
        };
        match self.mode {
            Mode::Browse => Update::push(DetailView::new(self.kind.clone(), item.clone())),
            Mode::Scope(kind) => Update::none().with_effect(Effect::Emit(Msg::Selected {
                kind,
                value: item.name.clone(),
            })),
        }
    }

    /// Stores the picked columns. Picking exactly the pool defaults clears
    /// the stored entry so the kind follows its defaults again.
    fn apply_picked(&mut self, visible_ids: &[String], session: &Session) {
        let defaults = self
            .pool
            .iter()
            .filter(|column| column.default)
            .map(|column| column.id.as_str())
            .collect::<Vec<_>>();
        if visible_ids.iter().map(String::as_str).eq(defaults.iter().copied()) {
            session.columns.reset(self.kind.name());
        } else {
            session.columns.set(self.kind.name(), visible_ids.to_vec());
        }
    }

    fn cells(&self, item: &ResourceItem, matches: &[usize], hint: bool) -> Vec<Cell> {
        let row = self.kind.row(item);
        self.display_columns()
            .into_iter()
            .map(|column| {
                let value = row.get(&column.id).cloned().unwrap_or_else(|| "-".to_string());
                let mut cell = Cell::new(value, column.width);
                match column.id.as_str() {
                    "name" => {
                        cell.matches = matches.to_vec();
                        cell.hint = hint.then_some(0);
                        if self.mode != Mode::Browse && item.name == self.current {
                            cell = cell.styled(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
                        }
                    }
                    "status" => cell = cell.styled(status_style(&item.status)),
                    "namespace" | "age" => cell = cell.styled(Style::default().fg(MUTED)),
                    _ => {}
                }
                cell
            })
            .collect()
    }
}

impl View for ListView {
    fn update(&mut self, event: &Event, session: &Session) -> Update {
        if self.namespace != session.namespace && self.mode == Mode::Browse {
            self.namespace = session.namespace.clone();
            self.reload();
        }
        let update = match event {
            Event::Key(key) => self.handle_key(key, session),
            Event::Msg(Msg::Picked {
                resource,
                visible_ids,
            }) if resource == self.kind.name() => {
                self.apply_picked(visible_ids, session);
                Update::none()
            }
            _ => Update::none(),
        };
        self.refresh_columns(session);
        update
    }

    fn render(&self) -> Text<'static> {
        let columns = self
            .display_columns()
            .into_iter()
            .map(|column| (column.name.clone(), column.width))
            .collect::<Vec<_>>();
        let mut lines = vec![header_line(&columns)];

        if self.list.visible().is_empty() {
            let message = if self.list.is_filtered() {
                format!("No items match \"{}\".", self.list.filter())
            } else {
                self.kind
                    .empty_message(&self.namespace)
                    .filter(|_| self.items.is_empty())
                    .unwrap_or_else(|| "No items.".to_string())
            };
            lines.push(Line::from(Span::styled(message, Style::default().fg(MUTED))));
            return Text::from(lines);
        }

        let (start, _) = self.list.page_bounds();
        let hints = self.list.initial_hints();
        for (offset, entry) in self.list.page_entries().iter().enumerate() {
            let item = &self.items[entry.index];
            let hint = self.find_armed && hints.get(offset).copied().unwrap_or(false);
            let selected = start + offset == self.list.cursor();
            lines.push(row_line(self.cells(item, &entry.positions, hint), selected));
        }
        Text::from(lines)
    }

    fn breadcrumb(&self) -> String {
        self.kind.name().to_string()
    }

    fn footer(&self) -> Text<'static> {
        let status = if self.list.is_filtering() {
            Line::from(vec![
                Span::styled("/", Style::default().fg(ACCENT)),
                Span::raw(format!("{}▏", self.list.filter())),
                Span::styled(
                    format!("  {}", self.list.showing()),
                    Style::default().fg(MUTED),
                ),
            ])
        } else if self.find_armed {
            Line::from(Span::styled(
                "find: press the first letter of a name",
                Style::default().fg(ACCENT),
            ))
        } else {
            let mut text = format!("{} · sort: {}", self.list.showing(), self.sort_mode().title());
            if self.list.is_filtered() {
                text.push_str(&format!(" · filter: {}", self.list.filter()));
            }
            if self.custom_columns {
                text.push_str(" · columns: custom");
            }
            Line::from(Span::styled(text, Style::default().fg(MUTED)))
        };

        let hints = match self.mode {
            Mode::Scope(_) => hint_line(&[
                ("enter", "select"),
                ("/", "filter"),
                ("y", "yaml"),
                ("←", "next scope"),
                ("esc", "back"),
            ]),
            Mode::Browse => hint_line(&[
                ("enter", "open"),
                ("/", "filter"),
                ("f", "find"),
                ("s", "sort"),
                ("c", "columns"),
                ("o", "logs"),
                ("r", "related"),
                ("?", "help"),
            ]),
        };
        Text::from(vec![status, hints])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.list
            .set_per_page(usize::from(height).saturating_sub(1).max(1));
    }

    fn suppress_global_keys(&self) -> bool {
        self.list.is_filtering() || self.find_armed
    }

    fn next_breadcrumb(&self) -> Option<String> {
        match self.mode {
            Mode::Browse => self.selected_item().map(|item| item.name.clone()),
            Mode::Scope(_) => None,
        }
    }

    fn selection(&self) -> Option<Selection> {
        self.selected_item().map(|item| Selection {
            kind: self.kind.clone(),
            item: item.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ListView;
    use crate::input::{Event, Msg};
    use crate::model::{NamespaceScope, PickerKind, SortMode};
    use crate::session::Session;
    use crate::ui::line_text;
    use crate::views::{Action, Effect, View};

    fn workloads(session: &Session) -> ListView {
        let mut view = ListView::new(session.registry.primary(), session);
        view.set_size(100, 20);
        view
    }

    fn press(view: &mut ListView, session: &Session, key: &str) -> Action {
        view.update(&Event::key(key), session).action
    }

    #[test]
    fn filter_mode_never_navigates() {
        let session = Session::stub();
        let mut view = workloads(&session);
        assert_eq!(press(&mut view, &session, "/"), Action::None);
        assert!(view.suppress_global_keys());
        for key in ["r", "e", "d", "down", "up", "l", "y"] {
            assert_eq!(press(&mut view, &session, key), Action::None);
        }
        assert_eq!(press(&mut view, &session, "enter"), Action::None);
        assert!(!view.suppress_global_keys());
        assert!(view.visible_names().is_empty());

        press(&mut view, &session, "/");
        assert_eq!(press(&mut view, &session, "esc"), Action::None);
        assert_eq!(view.visible_names().len(), 6);
    }

    #[test]
    fn enter_commits_filter_then_opens_detail() {
        let session = Session::stub();
        let mut view = workloads(&session);
        press(&mut view, &session, "/");
        for key in ["r", "e", "d"] {
            press(&mut view, &session, key);
        }
        assert_eq!(view.visible_names(), vec!["redis"]);
        assert_eq!(press(&mut view, &session, "enter"), Action::None);
        let update = view.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::Push);
        assert_eq!(update.next.map(|next| next.breadcrumb()), Some("redis".to_string()));
    }

    #[test]
    fn esc_clears_applied_filter_before_popping() {
        let session = Session::stub();
        let mut view = workloads(&session);
        press(&mut view, &session, "/");
        press(&mut view, &session, "g");
        press(&mut view, &session, "enter");
        assert_eq!(press(&mut view, &session, "esc"), Action::None);
        assert_eq!(press(&mut view, &session, "esc"), Action::Pop);
    }

    #[test]
    fn find_mode_jumps_to_first_letter() {
        let session = Session::stub();
        let mut view = workloads(&session);
        press(&mut view, &session, "f");
        assert!(view.suppress_global_keys());
        press(&mut view, &session, "R");
        assert!(!view.suppress_global_keys());
        assert_eq!(view.selected_item().map(|item| item.name.as_str()), Some("redis"));
    }

    #[test]
    fn sort_cycles_through_declared_modes() {
        let session = Session::stub();
        let mut view = workloads(&session);
        assert_eq!(view.sort_mode(), SortMode::Name);
        press(&mut view, &session, "s");
        press(&mut view, &session, "s");
        press(&mut view, &session, "s");
        press(&mut view, &session, "s");
        assert_eq!(view.sort_mode(), SortMode::Problem);
        assert_eq!(view.visible_names()[0], "web-frontend");
        assert!(line_text(&view.footer().lines[0]).contains("sort: problem"));
    }

    #[test]
    fn all_namespaces_prepends_namespace_column() {
        let session = Session::stub().with_namespace(NamespaceScope::All);
        let mut view = workloads(&session);
        assert_eq!(view.visible_column_ids()[0], "namespace");
        assert_eq!(view.visible_column_ids()[1], "name");
        view.set_size(140, 20);
        assert!(view.visible_column_ids().contains(&"images"));
    }

    #[test]
    fn picked_columns_update_the_store() {
        let session = Session::stub();
        let mut view = workloads(&session);
        let picked = Msg::Picked {
            resource: "workloads".to_string(),
            visible_ids: vec!["name".to_string(), "age".to_string()],
        };
        view.update(&Event::Msg(picked), &session);
        assert_eq!(view.visible_column_ids(), vec!["name", "age"]);
        assert!(session.columns.is_custom("workloads"));
        assert!(line_text(&view.footer().lines[0]).contains("columns: custom"));
    }

    #[test]
    fn picking_the_defaults_clears_the_custom_entry() {
        let session = Session::stub();
        let mut view = workloads(&session);
        view.set_size(140, 20);
        let defaults = view.visible_column_ids().iter().map(|id| id.to_string()).collect::<Vec<_>>();
        let custom = Msg::Picked {
            resource: "workloads".to_string(),
            visible_ids: vec!["name".to_string()],
        };
        view.update(&Event::Msg(custom), &session);
        assert!(session.columns.is_custom("workloads"));

        let picked = Msg::Picked {
            resource: "workloads".to_string(),
            visible_ids: defaults.clone(),
        };
        view.update(&Event::Msg(picked), &session);
        assert!(!session.columns.is_custom("workloads"));
        assert_eq!(view.visible_column_ids(), defaults);
        assert!(!line_text(&view.footer().lines[0]).contains("columns: custom"));
    }

    #[test]
    fn footer_and_empty_state() {
        let session = Session::stub().with_namespace(NamespaceScope::Named("empty".to_string()));
        let view = workloads(&session);
        let body = view.render();
        assert_eq!(line_text(&body.lines[1]), "No workloads in namespace empty.");
        assert!(line_text(&view.footer().lines[0]).starts_with("Showing 0-0 of 0"));
    }

    #[test]
    fn scope_picker_emits_selection() {
        let session = Session::stub();
        let mut view = ListView::scope_picker(PickerKind::Namespace, &session);
        view.set_size(100, 20);
        assert_eq!(view.breadcrumb(), "namespaces");
        assert_eq!(view.selected_item().map(|item| item.name.as_str()), Some("default"));
        assert_eq!(view.visible_names()[0], "(all)");
        let update = view.update(&crate::input::Event::key("enter"), &session);
        assert_eq!(update.action, Action::None);
        assert_eq!(
            update.effect,
            Some(Effect::Emit(Msg::Selected {
                kind: PickerKind::Namespace,
                value: "default".to_string(),
            }))
        );
    }

    #[test]
    fn shortcuts_act_on_the_selected_item() {
        let session = Session::stub();
        let mut view = workloads(&session);
        press(&mut view, &session, "f");
        press(&mut view, &session, "r");
        let selection = view.selection().expect("selection");
        assert_eq!(selection.item.name, "redis");
        assert_eq!(selection.kind.name(), "workloads");

        let update = view.update(&Event::key("y"), &session);
        assert_eq!(update.action, Action::Push);
        let yaml = update.next.expect("yaml view");
        assert!(line_text(&yaml.footer().lines[0]).contains("redis"));
        let update = view.update(&Event::key("r"), &session);
        assert_eq!(update.next.map(|next| next.breadcrumb()), Some("related".to_string()));

        let empty = Session::stub().with_namespace(NamespaceScope::Named("empty".to_string()));
        let mut view = workloads(&empty);
        assert!(view.selection().is_none());
        assert_eq!(press(&mut view, &empty, "y"), Action::None);
    }
}
