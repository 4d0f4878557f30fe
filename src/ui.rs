use crate::app::App;
use crate::model::{Scope, StatusClass};
use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

pub const BG: Color = Color::Rgb(9, 15, 25);
pub const PANEL: Color = Color::Rgb(16, 27, 44);
pub const ACCENT: Color = Color::Rgb(52, 211, 153);
pub const MUTED: Color = Color::Rgb(140, 156, 178);
pub const WARN: Color = Color::Rgb(251, 191, 36);
pub const ERROR: Color = Color::Rgb(248, 113, 113);
pub const INFO: Color = Color::Rgb(96, 165, 250);
pub const SELECTED: Color = Color::Rgb(24, 36, 58);

/// Rows the composer keeps for itself: scope line, breadcrumb, banner, footer.
pub fn reserved_rows(banner: bool, footer_lines: usize) -> usize {
    2 + usize::from(banner) + footer_lines
}

pub fn render(frame: &mut Frame, app: &App) {
    let text = compose(app);
    let paragraph = Paragraph::new(text).style(Style::default().bg(BG).fg(Color::White));
    frame.render_widget(paragraph, frame.area());
}

pub fn compose(app: &App) -> Text<'static> {
    let header = vec![scope_line(app), breadcrumb_line(app)];
    let banner = (!app.error_msg().is_empty()).then(|| {
        Line::from(Span::styled(
            format!(" {} ", app.error_msg()),
            Style::default().fg(BG).bg(ERROR),
        ))
    });
    let body = app.top().render().lines;
    let footer = app.top().footer().lines;
    Text::from(fit_frame(header, banner, body, footer, app.height()))
}

fn scope_line(app: &App) -> Line<'static> {
    let session = app.session();
    let segment = |label: &str, value: String, active: bool| {
        let style = if active {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        vec![
            Span::styled(format!("{label}: "), style),
            Span::styled(value, style),
        ]
    };
    let mut spans = segment("Context", session.context.clone(), app.scope() == Scope::Context);
    spans.push(Span::raw("   "));
    spans.extend(segment(
        "Namespace",
        session.namespace.label(),
        app.scope() == Scope::Namespace,
    ));
    Line::from(spans)
}

fn breadcrumb_line(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("[{}]", app.root_tag()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.crumbs().join(" > "), Style::default().fg(Color::White)),
    ];
    if let Some(hint) = app.top().next_breadcrumb().filter(|hint| !hint.is_empty()) {
        spans.push(Span::styled(format!(" > {hint}"), Style::default().fg(MUTED)));
    }
    Line::from(spans)
}

/// Lays out one frame so that it is exactly `height` lines tall. A zero height
/// means the terminal has not reported a size yet, so nothing is clamped.
pub fn fit_frame(
    mut header: Vec<Line<'static>>,
    mut banner: Option<Line<'static>>,
    mut body: Vec<Line<'static>>,
    mut footer: Vec<Line<'static>>,
    height: u16,
) -> Vec<Line<'static>> {
    if height > 0 {
        let height = usize::from(height);
        let fixed = reserved_rows(banner.is_some(), footer.len()) - 2 + header.len();
        let body_rows = height.saturating_sub(fixed).max(1);
        body.truncate(body_rows);
        body.resize(body_rows, Line::default());

        // Tiny terminals: shed body, banner, top of footer, then header tail.
        let mut excess = (fixed + body.len()).saturating_sub(height);
        let cut = excess.min(body.len());
        body.truncate(body.len() - cut);
        excess -= cut;
        if excess > 0 && banner.take().is_some() {
            excess -= 1;
        }
        let cut = excess.min(footer.len());
        footer.drain(..cut);
        excess -= cut;
        header.truncate(header.len() - excess.min(header.len()));
    }

    let mut lines = header;
    lines.extend(banner);
    lines.extend(body);
    lines.extend(footer);
    lines
}

/// Plain text of a styled line.
#[cfg(test)]
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

pub fn compact_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }

    let mut out = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

/// Compacts then right-pads to exactly `width` characters.
pub fn fit_width(value: &str, width: usize) -> String {
    let compact = compact_text(value, width);
    let len = compact.chars().count();
    format!("{compact}{}", " ".repeat(width.saturating_sub(len)))
}

pub fn status_style(status: &str) -> Style {
    let color = match StatusClass::classify(status) {
        StatusClass::Failed => ERROR,
        StatusClass::Warning => WARN,
        StatusClass::Pending => INFO,
        StatusClass::Healthy => ACCENT,
        StatusClass::Suspended => MUTED,
        StatusClass::Other => Color::White,
    };
    Style::default().fg(color)
}

/// A `key description · key description` hint row.
pub fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (index, (key, description)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(MUTED)));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(ACCENT)));
        spans.push(Span::styled(
            format!(" {description}"),
            Style::default().fg(MUTED),
        ));
    }
    Line::from(spans)
}

/// Draws `lines` inside a box centred in a `width` x `height` area.
pub fn framed_box(
    title: &str,
    lines: Vec<Line<'static>>,
    box_width: usize,
    width: u16,
    height: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width.max(8));
    let box_width = box_width.clamp(8, width);
    let inner = box_width - 2;
    let left = " ".repeat((width - box_width) / 2);
    let border = Style::default().fg(ACCENT);

    let title = compact_text(&format!(" {title} "), inner);
    let mut framed = vec![Line::from(vec![
        Span::raw(left.clone()),
        Span::styled("┌", border),
        Span::styled(
            title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("─".repeat(inner - title.chars().count()), border),
        Span::styled("┐", border),
    ])];
    for line in lines {
        let used = line.width().min(inner);
        let mut spans = vec![Span::raw(left.clone()), Span::styled("│", border)];
        let mut budget = inner;
        for span in line.spans {
            if budget == 0 {
                break;
            }
            let content = compact_text(&span.content, budget);
            budget -= content.chars().count();
            spans.push(Span::styled(content, span.style.bg(PANEL)));
        }
        spans.push(Span::styled(
            " ".repeat(inner - used),
            Style::default().bg(PANEL),
        ));
        spans.push(Span::styled("│", border));
        framed.push(Line::from(spans));
    }
    framed.push(Line::from(vec![
        Span::raw(left),
        Span::styled(format!("└{}┘", "─".repeat(inner)), border),
    ]));

    let top = usize::from(height).saturating_sub(framed.len()) / 2;
    let mut out = vec![Line::default(); top];
    out.extend(framed);
    out
}

pub fn highlight_yaml_line(line: &str) -> Line<'static> {
    let indent_len = line
        .as_bytes()
        .iter()
        .take_while(|byte| **byte == b' ')
        .count();
    let (indent, trimmed) = line.split_at(indent_len);

    let mut spans = vec![Span::raw(indent.to_string())];
    if trimmed.is_empty() {
        return Line::from(spans);
    }
    if trimmed.starts_with('#') {
        spans.push(Span::styled(trimmed.to_string(), Style::default().fg(MUTED)));
        return Line::from(spans);
    }

    let content = match trimmed.strip_prefix("- ") {
        Some(rest) => {
            spans.push(Span::styled("- ", Style::default().fg(ACCENT)));
            rest
        }
        None => trimmed,
    };
    match split_yaml_key_value(content) {
        Some((key, value)) => {
            spans.push(Span::styled(
                key.to_string(),
                Style::default().fg(Color::Rgb(103, 232, 249)),
            ));
            spans.push(Span::styled(":", Style::default().fg(MUTED)));
            let value = value.trim();
            if !value.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    value.to_string(),
                    Style::default().fg(yaml_value_color(value)),
                ));
            }
        }
        None => spans.push(Span::styled(
            content.to_string(),
            Style::default().fg(yaml_value_color(content)),
        )),
    }
    Line::from(spans)
}

fn split_yaml_key_value(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    if key.is_empty() || key.contains(' ') || key.starts_with('"') {
        return None;
    }
    if !value.is_empty() && !value.starts_with(' ') {
        return None;
    }
    Some((key, value))
}

fn yaml_value_color(value: &str) -> Color {
    if value.starts_with('"') || value.starts_with('\'') {
        Color::Rgb(125, 211, 252)
    } else if matches!(value, "true" | "false" | "null" | "~") {
        WARN
    } else if value.parse::<f64>().is_ok() {
        Color::Rgb(251, 146, 60)
    } else {
        Color::Rgb(147, 197, 253)
    }
}

#[cfg(test)]
mod tests {
    use super::{compact_text, fit_frame, fit_width, framed_box, highlight_yaml_line, line_text};
    use ratatui::text::Line;

    fn lines(values: &[&str]) -> Vec<Line<'static>> {
        values.iter().map(|value| Line::from(value.to_string())).collect()
    }

    fn plain(frame: &[Line<'static>]) -> Vec<String> {
        frame.iter().map(line_text).collect()
    }

    #[test]
    fn frame_pads_body_and_pins_footer() {
        let frame = fit_frame(
            lines(&["scope", "crumbs"]),
            None,
            lines(&["a"]),
            lines(&["status", "keys"]),
            7,
        );
        assert_eq!(plain(&frame), vec!["scope", "crumbs", "a", "", "", "status", "keys"]);
    }

    #[test]
    fn frame_clamps_long_body() {
        let body = (0..20).map(|_| Line::from("row")).collect();
        let frame = fit_frame(
            lines(&["scope", "crumbs"]),
            Some(Line::from("oops")),
            body,
            lines(&["status"]),
            6,
        );
        assert_eq!(plain(&frame), vec!["scope", "crumbs", "oops", "row", "row", "status"]);
    }

    #[test]
    fn tiny_frames_still_match_height() {
        for height in 1..6 {
            let frame = fit_frame(
                lines(&["scope", "crumbs"]),
                Some(Line::from("oops")),
                lines(&["a", "b"]),
                lines(&["status", "keys"]),
                height,
            );
            assert_eq!(frame.len(), usize::from(height));
            assert_eq!(line_text(&frame[0]), "scope");
        }
    }

    #[test]
    fn zero_height_renders_everything() {
        let frame = fit_frame(lines(&["h"]), None, lines(&["a", "b", "c"]), lines(&["f"]), 0);
        assert_eq!(frame.len(), 5);
    }

    #[test]
    fn compact_text_truncates_with_ellipsis() {
        assert_eq!(compact_text("api-gateway", 20), "api-gateway");
        assert_eq!(compact_text("api-gateway", 5), "api-…");
        assert_eq!(compact_text("api-gateway", 1), "…");
        assert_eq!(compact_text("api-gateway", 0), "");
        assert_eq!(fit_width("ab", 4), "ab  ");
    }

    #[test]
    fn boxes_are_centred_and_framed() {
        let framed = framed_box("namespaces", lines(&["default"]), 20, 40, 9);
        let text = plain(&framed);
        assert_eq!(text.len(), 6);
        assert!(text[3].starts_with("          ┌ namespaces "));
        assert!(text[4].contains("│default"));
        assert!(text[5].ends_with("┘"));
    }

    #[test]
    fn yaml_keys_and_values_split() {
        let line = highlight_yaml_line("  replicas: 3");
        assert_eq!(line_text(&line), "  replicas: 3");
        assert_eq!(line.spans.len(), 5);
        let item = highlight_yaml_line("- name: web");
        assert_eq!(line_text(&item), "- name: web");
        let url = highlight_yaml_line("server: https://x");
        assert_eq!(line_text(&url), "server: https://x");
    }
}
