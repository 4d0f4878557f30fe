use crate::input::Key;
use ratatui::text::Line;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FilterState {
    Unfiltered,
    Filtering,
    Applied,
}

/// A visible entry: its index in the unfiltered values plus the matched
/// character positions, for highlighting.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FilterMatch {
    pub index: usize,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Paginator {
    pub per_page: usize,
    pub page: usize,
    pub total: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            page: 0,
            total: 0,
        }
    }

    pub fn pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.min(self.pages() - 1);
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = self.page.min(self.pages() - 1);
    }

    /// Follows a cursor so the page always contains it.
    pub fn follow(&mut self, cursor: usize) {
        self.page = (cursor / self.per_page).min(self.pages() - 1);
    }

    /// Half-open `[start, end)` range of the current page.
    pub fn bounds(&self) -> (usize, usize) {
        let start = (self.page * self.per_page).min(self.total);
        let end = (start + self.per_page).min(self.total);
        (start, end)
    }
}

/// A cursor list over plain string values with an optional substring filter.
#[derive(Debug, Clone)]
pub struct FilterList {
    values: Vec<String>,
    filter: String,
    state: FilterState,
    visible: Vec<FilterMatch>,
    cursor: usize,
    paginator: Paginator,
}

impl FilterList {
    pub fn new(values: Vec<String>) -> Self {
        let mut list = Self {
            values,
            filter: String::new(),
            state: FilterState::Unfiltered,
            visible: Vec::new(),
            cursor: 0,
            paginator: Paginator::new(10),
        };
        list.refilter();
        list
    }

    pub fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
        self.refilter();
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.paginator.set_per_page(per_page);
        self.paginator.follow(self.cursor);
    }

    #[cfg(test)]
    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn is_filtering(&self) -> bool {
        self.state == FilterState::Filtering
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn start_filter(&mut self) {
        self.state = FilterState::Filtering;
    }

    pub fn push_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.cursor = 0;
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.filter.pop().is_some() {
            self.cursor = 0;
            self.refilter();
        }
    }

    /// Stops editing and keeps the current results.
    pub fn commit(&mut self) {
        self.state = if self.filter.is_empty() {
            FilterState::Unfiltered
        } else {
            FilterState::Applied
        };
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.state = FilterState::Unfiltered;
        self.refilter();
    }

    pub fn visible(&self) -> &[FilterMatch] {
        &self.visible
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index into the unfiltered values of the entry under the cursor.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible.get(self.cursor).map(|entry| entry.index)
    }

    pub fn select_visible(&mut self, position: usize) {
        if self.visible.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = position.min(self.visible.len() - 1);
        }
        self.paginator.follow(self.cursor);
    }

    pub fn move_up(&mut self, n: usize) {
        self.select_visible(self.cursor.saturating_sub(n));
    }

    pub fn move_down(&mut self, n: usize) {
        self.select_visible(self.cursor.saturating_add(n));
    }

    /// Cursor keys, returning whether the key was consumed.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        match key.as_str() {
            "up" | "k" => self.move_up(1),
            "down" | "j" => self.move_down(1),
            "pgup" | "ctrl+u" => self.move_up(self.paginator.per_page),
            "pgdown" | "ctrl+d" => self.move_down(self.paginator.per_page),
            "home" | "g" => self.select_visible(0),
            "end" | "G" => self.select_visible(usize::MAX),
            _ => return false,
        }
        true
    }

    /// Keys while the filter prompt is open: editing plus cursor moves.
    pub fn edit_key(&mut self, key: &Key) {
        match key.as_str() {
            "esc" => self.clear_filter(),
            "enter" => self.commit(),
            "backspace" | "ctrl+h" => self.pop_char(),
            "up" => self.move_up(1),
            "down" => self.move_down(1),
            "pgup" => self.move_up(self.paginator.per_page),
            "pgdown" => self.move_down(self.paginator.per_page),
            _ => {
                if let Some(rune) = key.rune() {
                    self.push_char(rune);
                }
            }
        }
    }

    /// Moves to the first visible value starting with `letter`, ignoring case.
    pub fn jump_to_initial(&mut self, letter: char) -> bool {
        let letter = letter.to_ascii_lowercase();
        let position = self.visible.iter().position(|entry| {
            self.values[entry.index]
                .chars()
                .next()
                .is_some_and(|first| first.to_ascii_lowercase() == letter)
        });
        if let Some(position) = position {
            self.select_visible(position);
        }
        position.is_some()
    }

    /// One flag per row of the current page, set on the first row of each
    /// distinct initial.
    pub fn initial_hints(&self) -> Vec<bool> {
        let mut seen = HashSet::new();
        self.page_entries()
            .iter()
            .map(|entry| {
                self.values[entry.index]
                    .chars()
                    .next()
                    .is_some_and(|first| seen.insert(first.to_ascii_lowercase()))
            })
            .collect()
    }

    pub fn page_bounds(&self) -> (usize, usize) {
        self.paginator.bounds()
    }

    pub fn page_entries(&self) -> &[FilterMatch] {
        let (start, end) = self.page_bounds();
        &self.visible[start..end]
    }

    /// `Showing a-b of N`, suffixed with `[filtered]` when a filter is active.
    pub fn showing(&self) -> String {
        let (start, end) = self.page_bounds();
        let first = if end == 0 { 0 } else { start + 1 };
        let mut text = format!("Showing {first}-{end} of {}", self.visible.len());
        if self.is_filtered() {
            text.push_str(" [filtered]");
        }
        text
    }

    fn refilter(&mut self) {
        self.visible = self
            .values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match_positions(value, &self.filter).map(|positions| FilterMatch { index, positions })
            })
            .collect();
        self.paginator.set_total(self.visible.len());
        self.select_visible(self.cursor);
    }
}

/// Case-insensitive substring match; returns the char positions of the first hit.
pub fn match_positions(value: &str, needle: &str) -> Option<Vec<usize>> {
    if needle.is_empty() {
        return Some(Vec::new());
    }
    let hay = value.chars().collect::<Vec<_>>();
    let needle = needle.chars().collect::<Vec<_>>();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .find(|start| {
            needle
                .iter()
                .enumerate()
                .all(|(offset, ch)| chars_match(hay[start + offset], *ch))
        })
        .map(|start| (start..start + needle.len()).collect())
}

fn chars_match(left: char, right: char) -> bool {
    left == right || left.to_lowercase().eq(right.to_lowercase())
}

/// A scrollable window over pre-rendered lines.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    lines: Vec<Line<'static>>,
    offset: usize,
    width: u16,
    height: usize,
}

impl Viewport {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        Self {
            lines,
            offset: 0,
            width: 80,
            height: 20,
        }
    }

    pub fn set_size(&mut self, width: u16, height: usize) {
        self.width = width;
        self.height = height.max(1);
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_lines(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn handle_key(&mut self, key: &Key) -> bool {
        match key.as_str() {
            "up" | "k" => self.scroll_up(1),
            "down" | "j" => self.scroll_down(1),
            "pgup" | "ctrl+u" => self.scroll_up(self.height),
            "pgdown" | "ctrl+d" => self.scroll_down(self.height),
            "home" | "g" => self.goto_top(),
            "end" | "G" => self.goto_bottom(),
            _ => return false,
        }
        true
    }

    pub fn visible(&self) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .skip(self.offset)
            .take(self.height)
            .cloned()
            .collect()
    }

    pub fn percent(&self) -> usize {
        if self.max_offset() == 0 {
            100
        } else {
            self.offset * 100 / self.max_offset()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterList, FilterState, Paginator, Viewport, match_positions};
    use crate::input::Key;
    use ratatui::text::Line;

    fn names() -> Vec<String> {
        ["api-gateway", "web-frontend", "redis", "Ledger", "grafana"]
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        assert_eq!(match_positions("Ledger", "led"), Some(vec![0, 1, 2]));
        assert_eq!(match_positions("api-gateway", "GATE"), Some(vec![4, 5, 6, 7]));
        assert_eq!(match_positions("redis", "xyz"), None);
        assert_eq!(match_positions("redis", ""), Some(Vec::new()));
    }

    #[test]
    fn filter_lifecycle_tracks_state() {
        let mut list = FilterList::new(names());
        list.start_filter();
        assert!(list.is_filtering());
        list.push_char('e');
        list.push_char('d');
        assert_eq!(list.visible().len(), 2);
        list.commit();
        assert_eq!(list.state(), FilterState::Applied);
        assert_eq!(list.showing(), "Showing 1-2 of 2 [filtered]");
        list.clear_filter();
        assert_eq!(list.state(), FilterState::Unfiltered);
        assert_eq!(list.visible().len(), 5);
    }

    #[test]
    fn empty_commit_returns_to_unfiltered() {
        let mut list = FilterList::new(names());
        list.start_filter();
        list.commit();
        assert_eq!(list.state(), FilterState::Unfiltered);
    }

    #[test]
    fn cursor_clamps_when_filter_shrinks() {
        let mut list = FilterList::new(names());
        list.select_visible(4);
        list.push_char('r');
        assert_eq!(list.cursor(), 0);
        list.handle_key(&Key::new("G"));
        assert_eq!(list.selected_index(), Some(4));
        list.push_char('z');
        assert_eq!(list.selected_index(), None);
        assert_eq!(list.showing(), "Showing 0-0 of 0 [filtered]");
    }

    #[test]
    fn pages_follow_the_cursor() {
        let mut list = FilterList::new(names());
        list.set_per_page(2);
        assert_eq!(list.page_bounds(), (0, 2));
        list.handle_key(&Key::new("pgdown"));
        assert_eq!(list.cursor(), 2);
        assert_eq!(list.page_bounds(), (2, 4));
        list.handle_key(&Key::new("end"));
        assert_eq!(list.page_bounds(), (4, 5));
        assert_eq!(list.showing(), "Showing 5-5 of 5");
    }

    #[test]
    fn prompt_keys_edit_and_page() {
        let mut list = FilterList::new(names());
        list.set_per_page(2);
        list.start_filter();
        list.edit_key(&Key::new("e"));
        assert_eq!(list.filter(), "e");
        assert_eq!(list.visible().len(), 4);
        list.edit_key(&Key::new("pgdown"));
        assert_eq!(list.cursor(), 2);
        assert_eq!(list.page_bounds(), (2, 4));
        list.edit_key(&Key::new("pgup"));
        assert_eq!(list.cursor(), 0);
        list.edit_key(&Key::new("j"));
        assert_eq!(list.filter(), "ej");
        list.edit_key(&Key::new("backspace"));
        list.edit_key(&Key::new("enter"));
        assert_eq!(list.state(), FilterState::Applied);
    }

    #[test]
    fn initials_jump_and_hint_once_per_letter() {
        let mut list = FilterList::new(names());
        assert!(list.jump_to_initial('L'));
        assert_eq!(list.selected_index(), Some(3));
        assert!(!list.jump_to_initial('q'));
        assert_eq!(list.selected_index(), Some(3));
        let mut list = FilterList::new(vec![
            "redis".to_string(),
            "Registry".to_string(),
            "api".to_string(),
        ]);
        assert_eq!(list.initial_hints(), vec![true, false, true]);
        list.set_per_page(1);
        list.select_visible(1);
        assert_eq!(list.initial_hints(), vec![true]);
    }

    #[test]
    fn paginator_clamps_page_on_shrink() {
        let mut paginator = Paginator::new(3);
        paginator.set_total(10);
        paginator.follow(9);
        assert_eq!(paginator.page, 3);
        paginator.set_total(4);
        assert_eq!(paginator.page, 1);
        assert_eq!(paginator.bounds(), (3, 4));
    }

    #[test]
    fn viewport_scrolls_within_bounds() {
        let lines = (0..10).map(|n| Line::from(format!("line {n}"))).collect();
        let mut viewport = Viewport::new(lines);
        viewport.set_size(40, 4);
        viewport.handle_key(&Key::new("pgdown"));
        assert_eq!(viewport.offset(), 4);
        viewport.handle_key(&Key::new("end"));
        assert_eq!(viewport.offset(), 6);
        assert!(viewport.at_bottom());
        viewport.handle_key(&Key::new("down"));
        assert_eq!(viewport.offset(), 6);
        viewport.handle_key(&Key::new("home"));
        assert_eq!(viewport.visible().len(), 4);
        assert!(!viewport.handle_key(&Key::new("x")));
    }
}
