use super::{Effect, Update, View};
use crate::input::{Event, Msg};
use crate::model::TableColumn;
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, SELECTED, framed_box, hint_line};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

const BOX_WIDTH: usize = 44;

#[derive(Debug, Clone, Eq, PartialEq)]
enum Row {
    Header(&'static str),
    Column {
        id: String,
        title: String,
        locked: bool,
    },
}

impl Row {
    fn selectable(&self) -> bool {
        matches!(self, Self::Column { locked: false, .. })
    }
}

/// Toggles which columns a kind's list shows. Committing emits `Picked` and
/// pops; the list applies it to the column store.
pub struct ColumnPicker {
    resource: String,
    rows: Vec<Row>,
    checked: Vec<String>,
    snapshot: Vec<String>,
    cursor: usize,
    offset: usize,
    width: u16,
    height: u16,
}

impl ColumnPicker {
    pub fn new(
        resource: &str,
        pool: Vec<TableColumn>,
        labels: Vec<String>,
        visible: Vec<String>,
        lock_namespace: bool,
    ) -> Self {
        let mut rows = vec![Row::Header("Columns")];
        if lock_namespace {
            rows.push(Row::Column {
                id: "namespace".to_string(),
                title: "NAMESPACE".to_string(),
                locked: true,
            });
        }
        for column in pool {
            rows.push(Row::Column {
                locked: column.id == "name",
                id: column.id,
                title: column.name,
            });
        }
        if !labels.is_empty() {
            rows.push(Row::Header("Labels"));
            for key in labels {
                rows.push(Row::Column {
                    id: format!("label:{key}"),
                    title: key,
                    locked: false,
                });
            }
        }
        let mut picker = Self {
            resource: resource.to_string(),
            rows,
            checked: visible.clone(),
            snapshot: visible,
            cursor: 0,
            offset: 0,
            width: 80,
            height: 20,
        };
        picker.cursor = picker.first_selectable().unwrap_or(0);
        picker
    }

    fn first_selectable(&self) -> Option<usize> {
        self.rows.iter().position(Row::selectable)
    }

    /// Rows that fit inside the frame borders.
    fn page_rows(&self) -> usize {
        usize::from(self.height).saturating_sub(2).max(1)
    }

    /// Scrolls the window so the cursor row stays on screen.
    fn follow_cursor(&mut self) {
        let rows = self.page_rows();
        if self.first_selectable() == Some(self.cursor) && self.cursor < rows {
            self.offset = 0;
        } else if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + rows {
            self.offset = self.cursor + 1 - rows;
        }
        self.offset = self.offset.min(self.rows.len().saturating_sub(rows));
    }

    fn move_cursor(&mut self, forward: bool) {
        let mut index = self.cursor;
        loop {
            index = if forward {
                index + 1
            } else {
                match index.checked_sub(1) {
                    Some(index) => index,
                    None => return,
                }
            };
            match self.rows.get(index) {
                Some(row) if row.selectable() => {
                    self.cursor = index;
                    self.follow_cursor();
                    return;
                }
                Some(_) => {}
                None => return,
            }
        }
    }

    fn is_checked(&self, row: &Row) -> bool {
        match row {
            Row::Header(_) => false,
            Row::Column { locked: true, .. } => true,
            Row::Column { id, .. } => self.checked.contains(id),
        }
    }

    fn toggle(&mut self) {
        let Some(Row::Column {
            id, locked: false, ..
        }) = self.rows.get(self.cursor)
        else {
            return;
        };
        if let Some(position) = self.checked.iter().position(|checked| checked == id) {
            self.checked.remove(position);
        } else {
            self.checked.push(id.clone());
        }
    }

    /// Checked ids in row order, without the namespace column.
    pub fn visible_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| self.is_checked(row))
            .filter_map(|row| match row {
                Row::Column { id, .. } if id != "namespace" => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[cfg(test)]
    pub fn cursor_id(&self) -> Option<&str> {
        match self.rows.get(self.cursor) {
            Some(Row::Column { id, .. }) => Some(id.as_str()),
            _ => None,
        }
    }
}

impl View for ColumnPicker {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if key.is_space() {
            self.toggle();
            return Update::none();
        }
        match key.as_str() {
            "esc" => return Update::pop(),
            "enter" => {
                return Update::pop().with_effect(Effect::Emit(Msg::Picked {
                    resource: self.resource.clone(),
                    visible_ids: self.visible_ids(),
                }));
            }
            "r" => self.checked = self.snapshot.clone(),
            "up" | "k" => self.move_cursor(false),
            "down" | "j" => self.move_cursor(true),
            _ => {}
        }
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        let lines = self
            .rows
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.page_rows())
            .map(|(index, row)| match row {
                Row::Header(title) => Line::from(Span::styled(
                    title.to_string(),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )),
                Row::Column { title, locked, .. } => {
                    let mark = if self.is_checked(row) { "[x]" } else { "[ ]" };
                    let mut style = if *locked {
                        Style::default().fg(MUTED)
                    } else {
                        Style::default()
                    };
                    if index == self.cursor {
                        style = style.bg(SELECTED).add_modifier(Modifier::BOLD);
                    }
                    let suffix = if *locked { " (locked)" } else { "" };
                    Line::from(Span::styled(format!(" {mark} {title}{suffix}"), style))
                }
            })
            .collect();
        Text::from(framed_box(
            &format!("columns: {}", self.resource),
            lines,
            BOX_WIDTH,
            self.width,
            self.height,
        ))
    }

    fn breadcrumb(&self) -> String {
        "columns".to_string()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(
                format!("{} columns selected", self.visible_ids().len()),
                Style::default().fg(MUTED),
            )),
            hint_line(&[
                ("space", "toggle"),
                ("enter", "apply"),
                ("r", "revert"),
                ("esc", "cancel"),
            ]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.follow_cursor();
    }

    fn suppress_global_keys(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnPicker;
    use crate::input::{Event, Msg};
    use crate::model::TableColumn;
    use crate::session::Session;
    use crate::ui::line_text;
    use crate::views::{Action, Effect, View};

    fn picker(lock_namespace: bool) -> ColumnPicker {
        let pool = vec![
            TableColumn::new("name", "NAME", 32, true),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("age", "AGE", 6, true),
            TableColumn::new("images", "IMAGES", 30, false),
        ];
        let mut visible = vec!["name".to_string(), "status".to_string(), "age".to_string()];
        if lock_namespace {
            visible.insert(0, "namespace".to_string());
        }
        ColumnPicker::new("workloads", pool, vec!["app".to_string()], visible, lock_namespace)
    }

    #[test]
    fn cursor_skips_headers_and_locked_rows() {
        let session = Session::stub();
        let mut picker = picker(true);
        assert_eq!(picker.cursor_id(), Some("status"));
        picker.update(&Event::key("up"), &session);
        assert_eq!(picker.cursor_id(), Some("status"));
        for _ in 0..3 {
            picker.update(&Event::key("down"), &session);
        }
        assert_eq!(picker.cursor_id(), Some("label:app"));
        picker.update(&Event::key("down"), &session);
        assert_eq!(picker.cursor_id(), Some("label:app"));
    }

    #[test]
    fn toggles_commit_in_pool_order() {
        let session = Session::stub();
        let mut picker = picker(true);
        picker.update(&Event::key("j"), &session);
        picker.update(&Event::key("j"), &session);
        picker.update(&Event::key(" "), &session);
        picker.update(&Event::key("k"), &session);
        picker.update(&Event::key(" "), &session);
        let update = picker.update(&Event::key("enter"), &session);
        assert_eq!(update.action, Action::Pop);
        assert_eq!(
            update.effect,
            Some(Effect::Emit(Msg::Picked {
                resource: "workloads".to_string(),
                visible_ids: vec!["name".to_string(), "status".to_string(), "images".to_string()],
            }))
        );
    }

    #[test]
    fn revert_restores_the_snapshot() {
        let session = Session::stub();
        let mut picker = picker(false);
        picker.update(&Event::key(" "), &session);
        assert_eq!(picker.visible_ids(), vec!["name", "age"]);
        picker.update(&Event::key("r"), &session);
        assert_eq!(picker.visible_ids(), vec!["name", "status", "age"]);
        assert!(picker.suppress_global_keys());
        assert_eq!(picker.update(&Event::key("esc"), &session).action, Action::Pop);
    }

    #[test]
    fn long_pools_scroll_with_the_cursor() {
        let session = Session::stub();
        let mut pool = vec![TableColumn::new("name", "NAME", 32, true)];
        for n in 1..8 {
            pool.push(TableColumn::new(&format!("col{n}"), &format!("COL{n}"), 8, false));
        }
        let labels = (0..6).map(|n| format!("l{n}")).collect();
        let mut picker = ColumnPicker::new("workloads", pool, labels, vec!["name".to_string()], false);
        picker.set_size(80, 8);
        for _ in 0..12 {
            picker.update(&Event::key("down"), &session);
        }
        assert_eq!(picker.cursor_id(), Some("label:l5"));
        let lines = picker.render().lines.iter().map(line_text).collect::<Vec<_>>();
        assert!(lines.len() <= 8);
        assert!(lines.iter().any(|line| line.contains("[ ] l5")));
        assert!(!lines.iter().any(|line| line.contains("COL1")));

        for _ in 0..12 {
            picker.update(&Event::key("up"), &session);
        }
        assert_eq!(picker.cursor_id(), Some("col1"));
        let lines = picker.render().lines.iter().map(line_text).collect::<Vec<_>>();
        assert!(lines.iter().any(|line| line.contains("Columns")));
        assert!(lines.iter().any(|line| line.contains("COL1")));
        assert!(!lines.iter().any(|line| line.contains("l5")));
    }
}
