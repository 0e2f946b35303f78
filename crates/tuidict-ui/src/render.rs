use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tuidict_core::session::{FOOTER_LINES, HEADER_LINES, Phase, SessionState};

pub const TOO_SMALL: &str = "too small to show content";
const ELLIPSIS: &str = "...";

/// Cut `text` to `width` chars, marking the cut with `...`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::AwaitingInput => "input",
        Phase::Searching => "searching",
        Phase::ReviewingResults => "results",
        Phase::ViewingDetail => "detail",
        Phase::Exited => "exited",
    }
}

fn help_lines(phase: Phase) -> [&'static str; 2] {
    match phase {
        Phase::AwaitingInput => ["Enter: search  Esc: quit", "Ctrl+C: exit"],
        Phase::Searching => ["q/Esc: cancel", "Ctrl+C: exit"],
        Phase::ReviewingResults => [
            "w/s Up/Down: move  x/Space/Enter: toggle  Tab: detail",
            "f/Ctrl+S: save  c: clear warning  q/Esc: skip",
        ],
        Phase::ViewingDetail => ["x/Space/Enter: toggle and return", "q/Esc/Tab: back"],
        Phase::Exited => ["", ""],
    }
}

/// Pure render of the session state; no terminal access beyond the frame
pub fn draw(f: &mut Frame<'_>, state: &SessionState, target: &str) {
    let area = f.area();
    let listing = matches!(state.phase, Phase::ReviewingResults | Phase::ViewingDetail);

    if listing && state.page().is_none() {
        f.render_widget(Paragraph::new(TOO_SMALL), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_LINES),
            Constraint::Min(0),
            Constraint::Length(FOOTER_LINES),
        ])
        .split(area);

    draw_header(f, chunks[0], state, target);
    match state.phase {
        Phase::AwaitingInput => draw_prompt_hint(f, chunks[1]),
        Phase::Searching => draw_searching(f, chunks[1], state),
        Phase::ReviewingResults => draw_list(f, chunks[1], state),
        Phase::ViewingDetail => draw_detail(f, chunks[1], state),
        Phase::Exited => {}
    }
    draw_footer(f, chunks[2], state);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, state: &SessionState, target: &str) {
    let width = area.width as usize;

    let title = Line::from(vec![
        Span::styled("tuidict", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  target: "),
        Span::styled(target.to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(phase_label(state.phase), Style::default().fg(Color::Cyan)),
    ]);

    let echo = match (&state.phase, &state.query) {
        (Phase::ReviewingResults | Phase::ViewingDetail, Some(query)) => {
            truncate(&format!("word: {}", query.canonical_key()), width)
        }
        _ => truncate(&format!("> {}", state.input.text()), width),
    };

    let warning = match (&state.fatal, &state.warning) {
        (Some(fatal), _) => Line::styled(truncate(fatal, width), Style::default().fg(Color::Red)),
        (None, Some(warning)) => Line::styled(truncate(warning, width), Style::default().fg(Color::Yellow)),
        (None, None) => Line::raw(""),
    };

    f.render_widget(Paragraph::new(vec![title, Line::raw(echo), warning]), area);

    if state.phase == Phase::AwaitingInput && area.height >= 2 {
        let x = area.x + 2 + state.input.cursor() as u16;
        if x < area.x + area.width {
            f.set_cursor_position((x, area.y + 1));
        }
    }
}

fn draw_prompt_hint(f: &mut Frame<'_>, area: Rect) {
    let hint = Paragraph::new(Line::styled(
        truncate("Type a word and press Enter", area.width as usize),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(hint, area);
}

fn draw_searching(f: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let text = format!("{} searching for {}", state.spinner_frame(), state.input.text().trim());
    f.render_widget(Paragraph::new(truncate(&text, area.width as usize)), area);
}

fn draw_list(f: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let (Some(definitions), Some(page)) = (&state.definitions, state.page()) else {
        return;
    };
    let width = area.width as usize;

    let lines: Vec<Line> = (page.start..page.end)
        .filter_map(|i| definitions.get(i).map(|text| (i, text)))
        .map(|(i, text)| {
            let marker = if i == state.cursor { ">" } else { " " };
            let check = if state.selected.contains(&i) { "[x]" } else { "[ ]" };
            let row = truncate(&format!("{marker} {check} {}. {text}", i + 1), width);

            let style = if i == state.cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if state.selected.contains(&i) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::styled(row, style)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_detail(f: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let Some(text) = state.current_definition() else {
        return;
    };
    let check = if state.selected.contains(&state.cursor) { "[x]" } else { "[ ]" };
    let heading = format!("{check} {}/{}", state.cursor + 1, state.definition_count());

    let body = Paragraph::new(vec![
        Line::styled(heading, Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(text.to_string()),
    ])
    .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let width = area.width as usize;

    let indicator = match (state.phase, state.page()) {
        (Phase::ReviewingResults | Phase::ViewingDetail, Some(page)) => format!(
            "page {}/{}  selected {}/{}",
            page.index + 1,
            page.count,
            state.selected.len(),
            state.definition_count()
        ),
        _ => String::new(),
    };
    let [first, second] = help_lines(state.phase);

    let lines = vec![
        Line::styled(truncate(&indicator, width), Style::default().fg(Color::Gray)),
        Line::styled(truncate(first, width), Style::default().fg(Color::DarkGray)),
        Line::styled(truncate(second, width), Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
