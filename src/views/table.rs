use crate::ui::{ACCENT, SELECTED, fit_width};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub width: usize,
    pub style: Style,
    /// Char positions drawn in the accent colour (filter matches).
    pub matches: Vec<usize>,
    /// Char position underlined as a find-mode hint.
    pub hint: Option<usize>,
}

impl Cell {
    pub fn new(text: impl Into<String>, width: usize) -> Self {
        Self {
            text: text.into(),
            width,
            style: Style::default().fg(Color::White),
            matches: Vec::new(),
            hint: None,
        }
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

pub fn header_line(columns: &[(String, usize)]) -> Line<'static> {
    let style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(columns.len() * 2);
    for (index, (name, width)) in columns.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(fit_width(name, *width), style));
    }
    Line::from(spans)
}

pub fn row_line(cells: Vec<Cell>, selected: bool) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, cell) in cells.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        spans.extend(cell_spans(cell));
    }
    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(SELECTED).add_modifier(Modifier::BOLD))
    } else {
        line
    }
}

fn cell_spans(cell: Cell) -> Vec<Span<'static>> {
    let text = fit_width(&cell.text, cell.width);
    if cell.matches.is_empty() && cell.hint.is_none() {
        return vec![Span::styled(text, cell.style)];
    }
    // Consecutive chars sharing a style collapse into one span.
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = cell.style;
    for (position, ch) in text.chars().enumerate() {
        let mut style = cell.style;
        if cell.matches.contains(&position) {
            style = style.fg(ACCENT).add_modifier(Modifier::BOLD);
        }
        if cell.hint == Some(position) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}
