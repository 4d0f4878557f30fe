use super::table::{Cell, header_line, row_line};
use super::{ListView, Update, View};
use crate::input::Event;
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, hint_line};
use crate::widgets::FilterList;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;

struct BrowserRow {
    kind: Arc<dyn ResourceType>,
    group: String,
    version: String,
    namespaced: bool,
    builtin: bool,
    key: String,
}

/// Every kind the registry knows, built-ins first, for jumping to kinds
/// that have no hotkey.
pub struct ResourceBrowser {
    rows: Vec<BrowserRow>,
    list: FilterList,
    find_armed: bool,
}

impl ResourceBrowser {
    pub fn new(session: &Session) -> Self {
        let registry = &session.registry;
        let mut rows = registry
            .all()
            .iter()
            .map(|kind| BrowserRow {
                kind: kind.clone(),
                group: kind.group().to_string(),
                version: kind.version().to_string(),
                namespaced: kind.namespaced(),
                builtin: kind.builtin(),
                key: kind.hotkey().map_or_else(|| "-".to_string(), String::from),
            })
            .collect::<Vec<_>>();
        rows.extend(registry.custom_resources().iter().map(|crd| BrowserRow {
            kind: registry.custom_kind(crd),
            group: crd.group.clone(),
            version: crd.version.clone(),
            namespaced: crd.namespaced,
            builtin: false,
            key: "-".to_string(),
        }));
        rows.sort_by(|left, right| {
            right
                .builtin
                .cmp(&left.builtin)
                .then_with(|| left.kind.name().cmp(right.kind.name()))
        });
        let list = FilterList::new(rows.iter().map(|row| row.kind.name().to_string()).collect());
        Self {
            rows,
            list,
            find_armed: false,
        }
    }

    #[cfg(test)]
    pub fn visible_names(&self) -> Vec<&str> {
        self.list
            .visible()
            .iter()
            .filter_map(|entry| self.list.value(entry.index))
            .collect()
    }

    fn selected(&self) -> Option<&BrowserRow> {
        self.list.selected_index().and_then(|index| self.rows.get(index))
    }

}

impl View for ResourceBrowser {
    fn update(&mut self, event: &Event, session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if self.list.is_filtering() {
            self.list.edit_key(key);
            return Update::none();
        }
        if self.find_armed {
            self.find_armed = false;
            if let Some(rune) = key.rune() {
                self.list.jump_to_initial(rune);
            }
            return Update::none();
        }
        match key.as_str() {
            "esc" if self.list.is_filtered() => self.list.clear_filter(),
            "esc" => return Update::pop(),
            "/" => self.list.start_filter(),
            "f" => self.find_armed = true,
            "enter" | "l" | "right" => {
                if let Some(row) = self.selected() {
                    return Update::push(ListView::new(row.kind.clone(), session));
                }
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        let mut lines = vec![header_line(&[
            ("KIND".to_string(), 26),
            ("GROUP".to_string(), 28),
            ("VERSION".to_string(), 8),
            ("SCOPE".to_string(), 10),
            ("SOURCE".to_string(), 9),
            ("KEY".to_string(), 3),
        ])];
        let cursor = self.list.cursor();
        let (start, _) = self.list.page_bounds();
        let hints = self.list.initial_hints();
        for (offset, entry) in self.list.page_entries().iter().enumerate() {
            let Some(row) = self.rows.get(entry.index) else {
                continue;
            };
            let mut name = Cell::new(row.kind.name().to_string(), 26);
            name.matches = entry.positions.clone();
            if self.find_armed {
                name.hint = hints.get(offset).copied().unwrap_or(false).then_some(0);
            }
            let group = if row.group.is_empty() { "core" } else { row.group.as_str() };
            let (source, source_color) = if row.builtin {
                ("built-in", Color::White)
            } else {
                ("crd", ACCENT)
            };
            let cells = vec![
                name,
                Cell::new(group, 28).styled(Style::default().fg(MUTED)),
                Cell::new(row.version.clone(), 8),
                Cell::new(if row.namespaced { "Namespaced" } else { "Cluster" }, 10),
                Cell::new(source, 9).styled(Style::default().fg(source_color)),
                Cell::new(row.key.clone(), 3).styled(Style::default().fg(ACCENT)),
            ];
            lines.push(row_line(cells, start + offset == cursor));
        }
        if self.list.visible().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("No kinds match \"{}\".", self.list.filter()),
                Style::default().fg(MUTED),
            )));
        }
        Text::from(lines)
    }

    fn breadcrumb(&self) -> String {
        "resources".to_string()
    }

    fn footer(&self) -> Text<'static> {
        let status = if self.list.is_filtering() {
            format!("/{}▏  {}", self.list.filter(), self.list.showing())
        } else if self.find_armed {
            "find: press a letter to jump".to_string()
        } else {
            self.list.showing()
        };
        Text::from(vec![
            Line::from(Span::styled(status, Style::default().fg(MUTED))),
            hint_line(&[
                ("enter", "open"),
                ("/", "filter"),
                ("f", "find"),
                ("esc", "back"),
            ]),
        ])
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.list
            .set_per_page(usize::from(height).saturating_sub(1).max(1));
    }

    fn suppress_global_keys(&self) -> bool {
        self.list.is_filtering() || self.find_armed
    }

    fn next_breadcrumb(&self) -> Option<String> {
        self.selected().map(|row| row.kind.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceBrowser;
    use crate::input::Event;
    use crate::session::Session;
    use crate::views::{Action, View};

    #[test]
    fn builtins_sort_before_crds() {
        let session = Session::stub();
        let browser = ResourceBrowser::new(&session);
        let names = browser.visible_names();
        let first_crd = names
            .iter()
            .position(|name| *name == "certificates")
            .expect("crd row");
        assert!(names[..first_crd].contains(&"pods"));
        assert!(!names[first_crd..].contains(&"pods"));
        let builtins = &names[..first_crd];
        let mut sorted = builtins.to_vec();
        sorted.sort_unstable();
        assert_eq!(builtins, sorted.as_slice());
    }

    #[test]
    fn find_and_enter_open_a_list() {
        let session = Session::stub();
        let mut browser = ResourceBrowser::new(&session);
        browser.set_size(100, 30);
        browser.update(&Event::key("f"), &session);
        assert!(browser.suppress_global_keys());
        browser.update(&Event::key("s"), &session);
        assert_eq!(browser.next_breadcrumb(), Some("secrets".to_string()));
        let update = browser.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::Push);
        assert_eq!(update.next.map(|view| view.breadcrumb()), Some("secrets".to_string()));
    }

    #[test]
    fn crd_rows_open_empty_lists() {
        let session = Session::stub();
        let mut browser = ResourceBrowser::new(&session);
        browser.update(&Event::key("/"), &session);
        for key in "certif".chars() {
            browser.update(&Event::key(&key.to_string()), &session);
        }
        browser.update(&Event::key("enter"), &session);
        assert_eq!(browser.visible_names(), vec!["certificates"]);
        let update = browser.update(&Event::key("enter"), &session);
        let list = update.next.expect("list view");
        assert_eq!(list.breadcrumb(), "certificates");
        assert_eq!(browser.update(&Event::key("esc"), &session).action, Action::None);
        assert_eq!(browser.update(&Event::key("esc"), &session).action, Action::Pop);
    }

    #[test]
    fn filter_prompt_pages_without_closing() {
        let session = Session::stub();
        let mut browser = ResourceBrowser::new(&session);
        browser.set_size(100, 4);
        browser.update(&Event::key("/"), &session);
        browser.update(&Event::key("s"), &session);
        let first = browser.next_breadcrumb();
        browser.update(&Event::key("pgdown"), &session);
        assert!(browser.suppress_global_keys());
        assert_ne!(browser.next_breadcrumb(), first);
        browser.update(&Event::key("pgup"), &session);
        assert_eq!(browser.next_breadcrumb(), first);
        assert_eq!(
            browser.update(&Event::key("enter"), &session).action,
            Action::None
        );
        assert!(!browser.suppress_global_keys());
    }
}
