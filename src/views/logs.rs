use super::{Effect, Update, View};
use crate::input::{Event, Key, Msg};
use crate::model::ResourceItem;
use crate::resources::{LogRequest, ResourceType};
use crate::session::Session;
use crate::ui::{ACCENT, ERROR, MUTED, WARN, hint_line};
use crate::widgets::{Viewport, match_positions};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const FOLLOW_INTERVAL: Duration = Duration::from_secs(1);

const SINCE_WINDOWS: [(&str, Option<u64>); 6] = [
    ("1m", Some(1)),
    ("5m", Some(5)),
    ("15m", Some(15)),
    ("1h", Some(60)),
    ("6h", Some(360)),
    ("all", None),
];

#[derive(Debug, Clone, Default, Eq, PartialEq)]
enum Search {
    #[default]
    Off,
    Typing(String),
    Applied { needle: String, matches: usize },
}

pub struct LogsView {
    kind: Arc<dyn ResourceType>,
    item: ResourceItem,
    container: Option<String>,
    raw: Vec<String>,
    viewport: Viewport,
    follow: bool,
    wrap: bool,
    previous: bool,
    since: usize,
    request_id: u64,
    seq: u64,
    search: Search,
}

impl LogsView {
    pub fn new(kind: Arc<dyn ResourceType>, item: ResourceItem, container: Option<String>) -> Self {
        let mut view = Self {
            kind,
            item,
            container,
            raw: Vec::new(),
            viewport: Viewport::new(Vec::new()),
            follow: false,
            wrap: false,
            previous: false,
            since: SINCE_WINDOWS.len() - 1,
            request_id: 0,
            seq: 0,
            search: Search::Off,
        };
        view.reload();
        view.viewport.goto_bottom();
        view
    }

    #[cfg(test)]
    pub fn is_following(&self) -> bool {
        self.follow
    }

    #[cfg(test)]
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn since_label(&self) -> &'static str {
        SINCE_WINDOWS[self.since].0
    }

    #[cfg(test)]
    pub fn line_count(&self) -> usize {
        self.raw.len()
    }

    #[cfg(test)]
    pub fn match_count(&self) -> Option<usize> {
        match &self.search {
            Search::Applied { matches, .. } => Some(*matches),
            _ => None,
        }
    }

    fn container_name(&self) -> String {
        self.container
            .clone()
            .or_else(|| self.kind.containers(&self.item).into_iter().next())
            .unwrap_or_else(|| self.item.name.clone())
    }

    fn reload(&mut self) {
        let request = LogRequest {
            container: self.container.clone(),
            previous: self.previous,
            since_minutes: SINCE_WINDOWS[self.since].1,
        };
        self.raw = self.kind.logs(&self.item, &request);
        self.refresh_search();
        self.relayout();
    }

    fn relayout(&mut self) {
        let needle = match &self.search {
            Search::Applied { needle, .. } => Some(needle.as_str()),
            _ => None,
        };
        let width = usize::from(self.viewport.width()).max(1);
        let mut lines = Vec::with_capacity(self.raw.len());
        for raw in &self.raw {
            if self.wrap {
                lines.extend(wrap_line(raw, width).iter().map(|part| log_line(part, needle)));
            } else {
                lines.push(log_line(raw, needle));
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("No logs in the last {}.", self.since_label()),
                Style::default().fg(MUTED),
            )));
        }
        let stick = self.follow || self.viewport.at_bottom();
        self.viewport.set_lines(lines);
        if stick {
            self.viewport.goto_bottom();
        }
    }

    fn refresh_search(&mut self) {
        if let Search::Applied { needle, .. } = &self.search {
            let needle = needle.clone();
            let matches = count_matches(&self.raw, &needle);
            self.search = Search::Applied { needle, matches };
        }
    }

    fn toggle_follow(&mut self) -> Update {
        self.follow = !self.follow;
        self.request_id += 1;
        debug!(follow = self.follow, request_id = self.request_id, "log follow toggled");
        if !self.follow {
            return Update::none();
        }
        self.viewport.goto_bottom();
        Update::none().with_effect(self.tick_effect())
    }

    fn tick_effect(&self) -> Effect {
        Effect::After {
            delay: FOLLOW_INTERVAL,
            msg: Msg::LogTick {
                request_id: self.request_id,
            },
        }
    }

    fn on_tick(&mut self, request_id: u64) -> Update {
        if !self.follow || request_id != self.request_id {
            return Update::none();
        }
        let container = self.container_name();
        if let Some(line) = self.kind.follow_line(&self.item, &container, self.seq) {
            self.seq += 1;
            self.raw.push(line);
            self.refresh_search();
            self.relayout();
        }
        self.viewport.goto_bottom();
        Update::none().with_effect(self.tick_effect())
    }

    fn search_key(&mut self, key: &Key) -> Update {
        let Search::Typing(buffer) = &mut self.search else {
            return Update::none();
        };
        if key.is("esc") {
            self.search = Search::Off;
            self.relayout();
        } else if key.is("enter") {
            let needle = std::mem::take(buffer);
            self.search = if needle.is_empty() {
                Search::Off
            } else {
                let matches = count_matches(&self.raw, &needle);
                Search::Applied { needle, matches }
            };
            self.relayout();
        } else if key.is_any(&["backspace", "ctrl+h"]) {
            buffer.pop();
        } else if let Some(rune) = key.rune() {
            buffer.push(rune);
        }
        Update::none()
    }
}

fn count_matches(lines: &[String], needle: &str) -> usize {
    lines
        .iter()
        .filter(|line| match_positions(line, needle).is_some())
        .count()
}

fn wrap_line(raw: &str, width: usize) -> Vec<String> {
    let chars = raw.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

fn log_line(raw: &str, needle: Option<&str>) -> Line<'static> {
    let base = if raw.contains(" ERROR ") || raw.contains(" FATAL ") {
        Style::default().fg(ERROR)
    } else if raw.contains(" WARN ") {
        Style::default().fg(WARN)
    } else {
        Style::default()
    };
    let Some(positions) = needle.and_then(|needle| match_positions(raw, needle)) else {
        return Line::from(Span::styled(raw.to_string(), base));
    };
    let hit = base.fg(ACCENT).add_modifier(Modifier::REVERSED);
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_hit = false;
    for (position, ch) in raw.chars().enumerate() {
        let is_hit = positions.contains(&position);
        if is_hit != run_hit && !run.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut run),
                if run_hit { hit } else { base },
            ));
        }
        run_hit = is_hit;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, if run_hit { hit } else { base }));
    }
    Line::from(spans)
}

impl View for LogsView {
    fn update(&mut self, event: &Event, _session: &Session) -> Update {
        let key = match event {
            Event::Msg(Msg::LogTick { request_id }) => return self.on_tick(*request_id),
            Event::Key(key) => key,
            _ => return Update::none(),
        };
        if matches!(self.search, Search::Typing(_)) {
            return self.search_key(key);
        }
        match key.as_str() {
            "esc" if matches!(self.search, Search::Applied { .. }) => {
                self.search = Search::Off;
                self.relayout();
            }
            "esc" => return Update::pop(),
            "f" => return self.toggle_follow(),
            "w" => {
                self.wrap = !self.wrap;
                self.relayout();
            }
            "t" => {
                self.previous = !self.previous;
                self.reload();
            }
            "[" => {
                self.since = (self.since + SINCE_WINDOWS.len() - 1) % SINCE_WINDOWS.len();
                self.reload();
            }
            "]" => {
                self.since = (self.since + 1) % SINCE_WINDOWS.len();
                self.reload();
            }
            "/" => self.search = Search::Typing(String::new()),
            _ => {
                if self.viewport.handle_key(key) && self.follow && !self.viewport.at_bottom() {
                    self.follow = false;
                    self.request_id += 1;
                }
            }
        }
        Update::none()
    }

    fn render(&self) -> Text<'static> {
        Text::from(self.viewport.visible())
    }

    fn breadcrumb(&self) -> String {
        "logs".to_string()
    }

    fn footer(&self) -> Text<'static> {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let mut status = format!(
            "{} [{}] · since {} · {} · follow {} · wrap {} · {}%",
            self.item.name,
            self.container_name(),
            self.since_label(),
            if self.previous { "previous" } else { "current" },
            on_off(self.follow),
            on_off(self.wrap),
            self.viewport.percent(),
        );
        let status = match &self.search {
            Search::Typing(buffer) => Line::from(vec![
                Span::styled("/", Style::default().fg(ACCENT)),
                Span::raw(format!("{buffer}▏")),
            ]),
            Search::Applied { needle, matches } => {
                status.push_str(&format!(" · \"{needle}\": {matches} matches"));
                Line::from(Span::styled(status, Style::default().fg(MUTED)))
            }
            Search::Off => Line::from(Span::styled(status, Style::default().fg(MUTED))),
        };
        Text::from(vec![
            status,
            hint_line(&[
                ("f", "follow"),
                ("w", "wrap"),
                ("t", "previous"),
                ("[ ]", "since"),
                ("/", "search"),
                ("esc", "back"),
            ]),
        ])
    }

    fn set_size(&mut self, width: u16, height: u16) {
        let rewrap = self.wrap && width != self.viewport.width();
        self.viewport.set_size(width, usize::from(height));
        if rewrap {
            self.relayout();
        }
    }

    fn suppress_global_keys(&self) -> bool {
        matches!(self.search, Search::Typing(_))
    }
}
