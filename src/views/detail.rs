use super::{Selection, Update, View, item_shortcut};
use crate::input::Event;
use crate::model::{ContainerRow, DetailData, ResourceItem};
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::{ACCENT, MUTED, WARN, fit_width, hint_line, status_style};
use crate::widgets::Viewport;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;

const TWO_COLUMN_WIDTH: u16 = 120;

pub struct DetailView {
    kind: Arc<dyn ResourceType>,
    item: ResourceItem,
    data: DetailData,
    viewport: Viewport,
}

impl DetailView {
    pub fn new(kind: Arc<dyn ResourceType>, item: ResourceItem) -> Self {
        let data = kind.detail(&item);
        let mut view = Self {
            kind,
            item,
            data,
            viewport: Viewport::default(),
        };
        view.viewport.set_size(80, 20);
        view.rebuild();
        view
    }

    fn rebuild(&mut self) {
        let width = usize::from(self.viewport.width());
        let lines = if self.viewport.width() >= TWO_COLUMN_WIDTH {
            let half = width / 2;
            let left = self.left_column(half.saturating_sub(2));
            let right = self.right_column();
            side_by_side(left, right, half)
        } else {
            let mut lines = self.left_column(width);
            lines.push(Line::default());
            lines.extend(self.right_column());
            lines
        };
        self.viewport.set_lines(lines);
    }

    fn left_column(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(vec![
            Span::styled("Status  ", Style::default().fg(MUTED)),
            Span::styled(self.item.status.clone(), status_style(&self.item.status)),
            Span::raw("  "),
            Span::raw(self.data.summary.clone()),
        ])];
        if !self.data.containers.is_empty() {
            lines.push(Line::default());
            lines.push(section("Containers"));
            lines.extend(container_grid(&self.data.containers, width));
        }
        lines
    }

    fn right_column(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (title, entries) in [
            ("Conditions", &self.data.conditions),
            ("Events", &self.data.events),
            ("Labels", &self.data.labels),
        ] {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(section(title));
            if entries.is_empty() {
                lines.push(Line::from(Span::styled("  <none>", Style::default().fg(MUTED))));
            }
            for entry in entries {
                let style = if entry.contains("Warning") || entry.contains("=False") {
                    Style::default().fg(WARN)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!("  {entry}"), style)));
            }
        }
        lines
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

/// Column widths for the container grid; the reason column takes the slack.
pub fn grid_widths(rows: &[ContainerRow], width: usize) -> [usize; 5] {
    let longest = |get: fn(&ContainerRow) -> &str, header: &str| {
        rows.iter()
            .map(|row| get(row).chars().count())
            .chain([header.len()])
            .max()
            .unwrap_or(0)
    };
    let name = longest(|row| &row.name, "NAME").clamp(8, 24);
    let image = longest(|row| &row.image, "IMAGE").clamp(12, 40);
    let state = longest(|row| &row.state, "STATE").clamp(7, 12);
    let restarts = 8;
    let fixed = name + image + state + restarts + 4;
    let reason = width.saturating_sub(fixed).max(6);
    [name, image, state, restarts, reason]
}

fn container_grid(rows: &[ContainerRow], width: usize) -> Vec<Line<'static>> {
    let widths = grid_widths(rows, width);
    let header = ["NAME", "IMAGE", "STATE", "RESTARTS", "REASON"]
        .iter()
        .zip(widths)
        .map(|(title, width)| fit_width(title, width))
        .collect::<Vec<_>>()
        .join(" ");
    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default().fg(MUTED).add_modifier(Modifier::BOLD),
    ))];
    for row in rows {
        let cells = [&row.name, &row.image, &row.state, &row.restarts, &row.reason];
        let mut spans = Vec::new();
        for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            let style = match index {
                2 => status_style(cell),
                4 => status_style(cell),
                _ => Style::default(),
            };
            spans.push(Span::styled(fit_width(cell, width), style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn side_by_side(left: Vec<Line<'static>>, right: Vec<Line<'static>>, half: usize) -> Vec<Line<'static>> {
    let rows = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    (0..rows)
        .map(|_| {
            let mut spans = left.next().map(|line| line.spans).unwrap_or_default();
            let used = spans.iter().map(|span| span.width()).sum::<usize>();
            spans.push(Span::raw(" ".repeat(half.saturating_sub(used).max(1))));
            if let Some(line) = right.next() {
                spans.extend(line.spans);
            }
            Line::from(spans)
        })
        .collect()
}

impl View for DetailView {
    fn update(&mut self, event: &Event, session: &Session) -> Update {
        let Event::Key(key) = event else {
            return Update::none();
        };
        if key.is("esc") {
            return Update::pop();
        }
        if let Some(rune) = key.rune()
            && let Some(update) = self
                .selection()
                .and_then(|selection| item_shortcut(rune, session, selection))
        {
            return update;
        }
        self.viewport.handle_key(key);
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        Text::from(self.viewport.visible())
    }

    fn breadcrumb(&self) -> String {
        self.item.name.clone()
    }

    fn footer(&self) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(
                format!("{} {} · {}%", self.kind.tag(), self.item.name, self.viewport.percent()),
                Style::default().fg(MUTED),
            )),
            hint_line(&[
                ("o", "logs"),
                ("d", "describe"),
                ("e", "events"),
                ("y", "yaml"),
                ("r", "related"),
                ("esc", "back"),
            ]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.viewport.set_size(width, usize::from(height));
        self.rebuild();
    }

    fn next_breadcrumb(&self) -> Option<String> {
        Some("logs".to_string())
    }

    fn selection(&self) -> Option<Selection> {
        Some(Selection {
            kind: self.kind.clone(),
            item: self.item.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailView, grid_widths};
    use crate::input::Event;
    use crate::model::{ContainerRow, NamespaceScope};
    use crate::session::Session;
    use crate::ui::line_text;
    use crate::views::{Action, View};

    fn pod_detail(session: &Session, width: u16) -> DetailView {
        let pods = session.registry.by_name("pods").expect("pods");
        let item = pods
            .items(&NamespaceScope::All)
            .into_iter()
            .find(|item| item.name.starts_with("api-gateway-"))
            .expect("gateway pod");
        let mut view = DetailView::new(pods, item);
        view.set_size(width, 30);
        view
    }

    #[test]
    fn reason_column_absorbs_slack() {
        let rows = vec![ContainerRow {
            name: "web".to_string(),
            image: "nginx:1.27".to_string(),
            state: "Running".to_string(),
            restarts: "0".to_string(),
            reason: String::new(),
        }];
        let narrow = grid_widths(&rows, 60);
        let wide = grid_widths(&rows, 100);
        assert_eq!(narrow[..4], wide[..4]);
        assert_eq!(wide[4] - narrow[4], 40);
        assert_eq!(grid_widths(&rows, 10)[4], 6);
    }

    #[test]
    fn wide_terminals_use_two_columns() {
        let session = Session::stub();
        let narrow = pod_detail(&session, 80);
        let wide = pod_detail(&session, 140);
        let narrow_lines = narrow.render().lines.len();
        let wide_lines = wide.render().lines.len();
        assert!(wide_lines < narrow_lines);
        let first = line_text(&wide.render().lines[0]);
        assert!(first.contains("Status") && first.contains("Conditions"));
    }

    #[test]
    fn shortcuts_push_child_views() {
        let session = Session::stub();
        let mut view = pod_detail(&session, 100);
        for (key, crumb) in [("y", "yaml"), ("d", "describe"), ("e", "events"), ("r", "related")] {
            let update = view.update(&Event::key(key), &session);
            assert_eq!(update.action, Action::Push);
            assert_eq!(update.next.map(|next| next.breadcrumb()), Some(crumb.to_string()));
        }
        let logs = view.update(&Event::key("o"), &session);
        assert_eq!(logs.next.map(|next| next.breadcrumb()), Some("container".to_string()));
        assert_eq!(view.update(&Event::key("esc"), &session).action, Action::Pop);
        assert_eq!(view.next_breadcrumb(), Some("logs".to_string()));
    }
}
