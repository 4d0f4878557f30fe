use super::table::{Cell, header_line, row_line};
use super::{LogsView, Update, View};
use crate::input::{Event, Key};
use crate::model::ResourceItem;
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{MUTED, hint_line, status_style};
use crate::widgets::FilterList;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;

/// Keys shared by both pickers; `None` means the selected row was opened.
fn picker_key(list: &mut FilterList, key: &Key) -> Option<Update> {
    if list.is_filtering() {
        list.edit_key(key);
        return Some(Update::none());
    }
    match key.as_str() {
        "esc" if list.is_filtered() => {
            list.clear_filter();
            Some(Update::none())
        }
        "esc" => Some(Update::pop()),
        "/" => {
            list.start_filter();
            Some(Update::none())
        }
        "enter" | "l" | "right" => None,
        _ => {
            list.handle_key(key);
            Some(Update::none())
        }
    }
}

fn picker_footer(list: &FilterList, noun: &str) -> Text<'static> {
    let status = if list.is_filtering() {
        format!("/{}▏  {}", list.filter(), list.showing())
    } else {
        format!("Pick a {noun} · {}", list.showing())
    };
    Text::from(vec![
        Line::from(Span::styled(status, Style::default().fg(MUTED))),
        hint_line(&[("enter", "logs"), ("/", "filter"), ("esc", "back")]),
    ])
}

/// Chooses which pod of a workload to read logs from.
pub struct PodPicker {
    pod_kind: Arc<dyn ResourceType>,
    pods: Vec<ResourceItem>,
    list: FilterList,
}

impl PodPicker {
    pub fn new(pod_kind: Arc<dyn ResourceType>, pods: Vec<ResourceItem>) -> Self {
        let list = FilterList::new(pods.iter().map(|pod| pod.name.clone()).collect());
        Self {
            pod_kind,
            pods,
            list,
        }
    }

    fn selected(&self) -> Option<&ResourceItem> {
        self.list.selected_index().and_then(|index| self.pods.get(index))
    }
}

impl View for PodPicker {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if let Some(update) = picker_key(&mut self.list, key) {
            return update;
        }
        let Some(pod) = self.selected().cloned() else {
            return Update::none();
        };
        let containers = self.pod_kind.containers(&pod);
        if containers.len() > 1 {
            return Update::replace(ContainerPicker::new(
                self.pod_kind.clone(),
                pod,
                containers,
            ));
        }
        let container = containers.into_iter().next();
        Update::replace(LogsView::new(self.pod_kind.clone(), pod, container))
    }

    fn render(&self) -> Text<'static> {
        let columns = [
            ("NAME".to_string(), 40),
            ("STATUS".to_string(), 18),
            ("READY".to_string(), 6),
            ("RESTARTS".to_string(), 8),
        ];
        let mut lines = vec![header_line(&columns)];
        let cursor = self.list.cursor();
        let (start, _) = self.list.page_bounds();
        for (offset, entry) in self.list.page_entries().iter().enumerate() {
            let Some(pod) = self.pods.get(entry.index) else {
                continue;
            };
            let mut name = Cell::new(pod.name.clone(), 40);
            name.matches = entry.positions.clone();
            let cells = vec![
                name,
                Cell::new(pod.status.clone(), 18).styled(status_style(&pod.status)),
                Cell::new(pod.ready.clone(), 6),
                Cell::new(pod.restarts.clone(), 8),
            ];
            lines.push(row_line(cells, start + offset == cursor));
        }
        Text::from(lines)
    }

    fn breadcrumb(&self) -> String {
        "pod".to_string()
    }

    fn footer(&self) -> Text<'static> {
        picker_footer(&self.list, "pod")
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.list
            .set_per_page(usize::from(height).saturating_sub(1).max(1));
    }

    fn suppress_global_keys(&self) -> bool {
        self.list.is_filtering()
    }

    fn next_breadcrumb(&self) -> Option<String> {
        self.selected().map(|pod| pod.name.clone())
    }
}

/// Chooses which container of an item to read logs from.
pub struct ContainerPicker {
    kind: Arc<dyn ResourceType>,
    item: ResourceItem,
    containers: Vec<String>,
    list: FilterList,
}

impl ContainerPicker {
    pub fn new(kind: Arc<dyn ResourceType>, item: ResourceItem, containers: Vec<String>) -> Self {
        let list = FilterList::new(containers.clone());
        Self {
            kind,
            item,
            containers,
            list,
        }
    }

    fn selected(&self) -> Option<&String> {
        self.list
            .selected_index()
            .and_then(|index| self.containers.get(index))
    }
}

impl View for ContainerPicker {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if let Some(update) = picker_key(&mut self.list, key) {
            return update;
        }
        match self.selected().cloned() {
            Some(container) => Update::replace(LogsView::new(
                self.kind.clone(),
                self.item.clone(),
                Some(container),
            )),
            None => Update::none(),
        }
    }

    fn render(&self) -> Text<'static> {
        let mut lines = vec![header_line(&[("CONTAINER".to_string(), 32)])];
        let cursor = self.list.cursor();
        let (start, _) = self.list.page_bounds();
        for (offset, entry) in self.list.page_entries().iter().enumerate() {
            let mut cell = Cell::new(self.containers[entry.index].clone(), 32);
            cell.matches = entry.positions.clone();
            lines.push(row_line(vec![cell], start + offset == cursor));
        }
        Text::from(lines)
    }

    fn breadcrumb(&self) -> String {
        "container".to_string()
    }

    fn footer(&self) -> Text<'static> {
        picker_footer(&self.list, "container")
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.list
            .set_per_page(usize::from(height).saturating_sub(1).max(1));
    }

    fn suppress_global_keys(&self) -> bool {
        self.list.is_filtering()
    }

    fn next_breadcrumb(&self) -> Option<String> {
        Some("logs".to_string())
    }
}
