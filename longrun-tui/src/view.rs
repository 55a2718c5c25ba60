use crate::{styles, transcript::TranscriptLine};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use textwrap::wrap;

/// Everything the renderer needs, copied out of the actor.
pub struct ViewSnap<'a> {
    pub heading: &'a str,
    pub suggestions: &'a [String],
    pub docked: bool,
    pub input: &'a str,
    pub input_cursor: usize,
    pub input_enabled: bool,
    pub lines: Vec<TranscriptLine>,
    pub scroll: usize,
    pub status: &'static str,
    pub spinner: &'static str,
}

/// Render one frame. Returns `snap.scroll` clamped to what the transcript can show.
pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap<'_>) -> Result<usize> {
    let mut scroll = snap.scroll;
    term.draw(|frame| {
        let area = frame.area();
        scroll = if snap.docked {
            draw_docked(frame, area, snap)
        } else {
            draw_landing(frame, area, snap)
        };
    })?;
    Ok(scroll)
}

fn draw_landing(frame: &mut Frame, area: Rect, snap: &ViewSnap<'_>) -> usize {
    let suggestions_h = snap.suggestions.len() as u16 + 2;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(suggestions_h),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, layout[0]);

    let heading = Paragraph::new(Line::from(Span::styled(snap.heading, styles::heading())))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    frame.render_widget(heading, layout[1]);

    draw_input(frame, layout[2], snap);

    let items: Vec<ListItem> = snap
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" F{} ", i + 1), styles::key_hint()),
                Span::styled(s.clone(), styles::value()),
            ]))
        })
        .collect();
    let suggestions =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Suggestions "));
    frame.render_widget(suggestions, layout[3]);

    let scroll = draw_transcript(frame, layout[4], snap, " Notes ");
    draw_status(frame, layout[5], snap);
    scroll
}

fn draw_docked(frame: &mut Frame, area: Rect, snap: &ViewSnap<'_>) -> usize {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, layout[0]);
    let scroll = draw_transcript(frame, layout[1], snap, " Chat ");
    draw_input(frame, layout[2], snap);
    draw_status(frame, layout[3], snap);
    scroll
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Puresport ", styles::heading()),
        Span::styled("· For the Long Run", styles::dim()),
    ]));
    frame.render_widget(header, area);
}

fn draw_transcript(frame: &mut Frame, area: Rect, snap: &ViewSnap<'_>, title: &str) -> usize {
    if area.height < 3 {
        return snap.scroll;
    }
    let visible_h = area.height.saturating_sub(2) as usize;
    let content_width = area.width.saturating_sub(2) as usize;
    let wrapped = wrap_transcript(&snap.lines, content_width);
    let scroll = snap.scroll.min(max_scroll(wrapped.len(), visible_h));
    let (start, end) = visible_window(wrapped.len(), visible_h, scroll);

    let items: Vec<ListItem> = wrapped[start..end]
        .iter()
        .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
        .collect();

    let body = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, area);
    scroll
}

fn draw_input(frame: &mut Frame, area: Rect, snap: &ViewSnap<'_>) {
    let (title, style) = if snap.input_enabled {
        (" Message ", styles::value())
    } else {
        (" Message (waiting for reply) ", styles::dim())
    };
    let input_box = Paragraph::new(snap.input)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(Clear, area);
    frame.render_widget(input_box, area);

    if snap.input_enabled {
        frame.set_cursor_position(Position {
            x: area.x + 1 + visual_caret_col(snap.input, snap.input_cursor),
            y: area.y + 1,
        });
    }
}

fn draw_status(frame: &mut Frame, area: Rect, snap: &ViewSnap<'_>) {
    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(snap.spinner, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(snap.status, styles::system()),
        Span::styled("  Enter send · F1-F3 suggest · /help · Ctrl-C quit", styles::dim()),
    ]);
    let status =
        Paragraph::new(status_line).block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}

fn max_scroll(total: usize, visible: usize) -> usize {
    total.saturating_sub(visible)
}

/// Slice of `total` wrapped rows to show, `scroll` rows up from the bottom.
fn visible_window(total: usize, visible: usize, scroll: usize) -> (usize, usize) {
    let scroll = scroll.min(max_scroll(total, visible));
    let end = total - scroll;
    (end.saturating_sub(visible), end)
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor]) as u16
}

fn wrap_transcript(lines: &[TranscriptLine], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = entry.style;
        if entry.text.is_empty() {
            out.push((String::new(), style));
            continue;
        }

        for raw_line in entry.text.split('\n') {
            let segments = wrap(raw_line, effective_width);
            if segments.is_empty() {
                out.push((String::new(), style));
            } else {
                out.extend(segments.into_iter().map(|seg| (seg.into_owned(), style)));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn wraps_long_lines_and_keeps_blanks() {
        let lines = vec![
            TranscriptLine::new("How many runs per week", styles::bot_text()),
            TranscriptLine::blank(),
        ];
        let wrapped = wrap_transcript(&lines, 10);
        let texts: Vec<&str> = wrapped.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["How many", "runs per", "week", ""]);
        assert!(wrapped[..3].iter().all(|(_, s)| *s == styles::bot_text()));
    }

    #[test]
    fn window_follows_bottom_and_clamps_scroll() {
        assert_eq!(visible_window(10, 4, 0), (6, 10));
        assert_eq!(visible_window(10, 4, 2), (4, 8));
        assert_eq!(visible_window(10, 4, 50), (0, 4));
        assert_eq!(visible_window(2, 4, 3), (0, 2));
    }

    const NO_SUGGESTIONS: &[String] = &[];

    fn snap(lines: Vec<TranscriptLine>, scroll: usize) -> ViewSnap<'static> {
        ViewSnap {
            heading: "What are you looking to achieve?",
            suggestions: NO_SUGGESTIONS,
            docked: true,
            input: "",
            input_cursor: 0,
            input_enabled: true,
            lines,
            scroll,
            status: "Ready",
            spinner: " ",
        }
    }

    #[test]
    fn draw_clamps_scroll_to_the_transcript() {
        let mut term = Terminal::new(TestBackend::new(40, 20)).unwrap();

        let short = vec![TranscriptLine::new("hi", styles::user_text())];
        assert_eq!(draw(&mut term, &snap(short, 999)).unwrap(), 0);

        let long: Vec<TranscriptLine> = (0..50)
            .map(|i| TranscriptLine::new(format!("line {i}"), styles::bot_text()))
            .collect();
        let clamped = draw(&mut term, &snap(long.clone(), 999)).unwrap();
        assert!(clamped > 0 && clamped < 50, "clamped to {clamped}");
        // Already in range: unchanged, so one step down moves the view.
        assert_eq!(draw(&mut term, &snap(long.clone(), clamped)).unwrap(), clamped);
        assert_eq!(draw(&mut term, &snap(long, clamped - 1)).unwrap(), clamped - 1);
    }

    #[test]
    fn caret_uses_display_width() {
        assert_eq!(visual_caret_col("abc", 2), 2);
        assert_eq!(visual_caret_col("☕x", "☕".len()), 2);
    }
}
