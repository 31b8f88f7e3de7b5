use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::core::app::App;
use crate::core::constants::THINKING_FRAME_MS;
use crate::core::message::Message;
use crate::core::text_wrapping::{TextWrapper, WrapConfig};
use crate::core::transcript::Transcript;

const USER_PREFIX: &str = "You: ";
const SOURCE_BULLET: &str = "  • ";

/// Header, transcript and input areas for a frame of the given size.
pub fn chat_areas(area: Rect, input_area_height: u16) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_area_height + 2), // +2 for borders
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Cycles "", ".", "..", "..." one step per [`THINKING_FRAME_MS`].
pub fn thinking_dots(elapsed: Duration) -> &'static str {
    const FRAMES: [&str; 4] = ["", ".", "..", "..."];
    let step = elapsed.as_millis() / THINKING_FRAME_MS;
    FRAMES[(step % FRAMES.len() as u128) as usize]
}

fn spinner_symbol(elapsed: Duration) -> &'static str {
    const SYMBOLS: [&str; 3] = ["○", "◐", "●"];
    let step = elapsed.as_millis() / (THINKING_FRAME_MS / 2);
    SYMBOLS[(step % SYMBOLS.len() as u128) as usize]
}

fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    width: usize,
    first_prefix: Option<Span<'static>>,
    style: Style,
) {
    let indent = first_prefix.as_ref().map(|p| p.width()).unwrap_or(0);
    let wrapped = TextWrapper::wrap_lines(text, &WrapConfig::new(width.saturating_sub(indent)));
    let mut first_prefix = first_prefix;
    for (i, segment) in wrapped.into_iter().enumerate() {
        let mut spans = Vec::with_capacity(2);
        if let Some(prefix) = first_prefix.take() {
            spans.push(prefix);
        } else if indent > 0 && i > 0 {
            spans.push(Span::raw(" ".repeat(indent)));
        }
        spans.push(Span::styled(segment, style));
        lines.push(Line::from(spans));
    }
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    width: usize,
    pending_elapsed: Duration,
) {
    if message.is_user() {
        let cyan = Style::default().fg(Color::Cyan);
        push_wrapped(
            lines,
            &message.text,
            width,
            Some(Span::styled(USER_PREFIX, cyan.add_modifier(Modifier::BOLD))),
            cyan,
        );
    } else if message.is_pending {
        lines.push(Line::from(vec![
            Span::styled(
                format!("Thinking{} ", thinking_dots(pending_elapsed)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ),
            Span::styled(spinner_symbol(pending_elapsed), Style::default().fg(Color::Yellow)),
        ]));
    } else {
        push_wrapped(lines, &message.text, width, None, Style::default());

        if let Some(sources) = message.visible_sources() {
            lines.push(Line::from(Span::styled(
                "Sources:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for source in sources {
                push_wrapped(
                    lines,
                    source,
                    width,
                    Some(Span::raw(SOURCE_BULLET)),
                    Style::default().fg(Color::Blue),
                );
            }
        }

        if let Some(latency_ms) = message.latency_ms {
            lines.push(Line::from(Span::styled(
                format!("{latency_ms} ms"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
}

/// Pre-wrapped transcript lines for a viewport `width` columns wide.
pub fn build_display_lines(
    transcript: &Transcript,
    width: u16,
    pending_elapsed: Duration,
) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for message in transcript.iter() {
        push_message_lines(&mut lines, message, width, pending_elapsed);
    }
    lines
}

fn pending_elapsed(app: &App, now: Instant) -> Duration {
    app.request
        .started_at()
        .map(|started| now.saturating_duration_since(started))
        .unwrap_or_default()
}

/// Largest useful scroll offset for a transcript area of `area` size.
pub fn max_scroll_offset(app: &App, area: Rect) -> u16 {
    let total = build_display_lines(&app.transcript, area.width, Duration::ZERO).len();
    let total = u16::try_from(total).unwrap_or(u16::MAX);
    total.saturating_sub(area.height)
}

fn input_title(app: &App) -> Line<'static> {
    if app.is_awaiting() {
        Line::from(Span::styled(
            " Thinking... ",
            Style::default().fg(Color::Yellow),
        ))
    } else if app.can_send() {
        Line::from(" Enter to send · Shift+Enter for new line ")
    } else {
        Line::from(Span::styled(
            " Send (type a question first) ",
            Style::default().fg(Color::DarkGray),
        ))
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let input_area_height = app.ui.input_area_height();
    let (header_area, transcript_area, input_area) = chat_areas(f.area(), input_area_height);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            app.ui.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  •  Ctrl+L reset  •  Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(header, header_area);

    let lines = build_display_lines(
        &app.transcript,
        transcript_area.width,
        pending_elapsed(app, Instant::now()),
    );
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(transcript_area.height);
    let scroll_offset = if app.ui.auto_scroll {
        max_offset
    } else {
        app.ui.scroll_offset.min(max_offset)
    };
    app.ui.scroll_offset = scroll_offset;

    f.render_widget(
        Paragraph::new(lines).scroll((scroll_offset, 0)),
        transcript_area,
    );

    let enabled = !app.is_awaiting();
    let border_style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .border_style(border_style)
        .title(input_title(app));
    f.render_widget(app.ui.textarea_with_block(block, enabled), input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn thinking_dots_cycle_every_half_second() {
        assert_eq!(thinking_dots(Duration::from_millis(0)), "");
        assert_eq!(thinking_dots(Duration::from_millis(499)), "");
        assert_eq!(thinking_dots(Duration::from_millis(500)), ".");
        assert_eq!(thinking_dots(Duration::from_millis(1000)), "..");
        assert_eq!(thinking_dots(Duration::from_millis(1500)), "...");
        assert_eq!(thinking_dots(Duration::from_millis(2000)), "");
    }

    #[test]
    fn completed_answer_shows_text_sources_then_latency() {
        let mut transcript = Transcript::new("hello");
        transcript.append(Message::user("What is RAG?"));
        transcript.append(Message::answered(
            "Retrieval-Augmented Generation",
            vec!["doc1".into()],
            120,
        ));

        let lines: Vec<String> = build_display_lines(&transcript, 80, Duration::ZERO)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(
            lines,
            vec![
                "hello",
                "",
                "You: What is RAG?",
                "",
                "Retrieval-Augmented Generation",
                "Sources:",
                "  • doc1",
                "120 ms",
                "",
            ]
        );
    }

    #[test]
    fn empty_sources_and_missing_latency_render_nothing_extra() {
        let mut transcript = Transcript::new("hello");
        transcript.append(Message::answered("plain", Vec::new(), 9));
        transcript.append(Message::assistant("failure text"));

        let lines: Vec<String> = build_display_lines(&transcript, 80, Duration::ZERO)
            .iter()
            .map(line_text)
            .collect();

        assert!(!lines.iter().any(|line| line == "Sources:"));
        assert_eq!(lines.iter().filter(|line| line.ends_with(" ms")).count(), 1);
    }

    #[test]
    fn pending_record_shows_indicator_instead_of_text() {
        let mut transcript = Transcript::new("hello");
        transcript.append(Message::pending());

        let lines: Vec<String> =
            build_display_lines(&transcript, 80, Duration::from_millis(1000))
                .iter()
                .map(line_text)
                .collect();

        assert!(lines[2].starts_with("Thinking.. "));
        assert!(!lines.iter().any(|line| line.contains("retrieving")));
    }

    #[test]
    fn user_continuation_lines_are_indented_under_prefix() {
        let mut transcript = Transcript::new("g");
        transcript.append(Message::user("alpha beta gamma"));

        let lines: Vec<String> = build_display_lines(&transcript, 15, Duration::ZERO)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(lines[2], "You: alpha beta");
        assert_eq!(lines[3], "     gamma");
    }

    #[test]
    fn frame_shows_title_greeting_and_placeholder() {
        let mut app = create_test_app();

        let screen = render_to_string(&mut app, 90, 12);

        assert!(screen.contains("AI Cloud Assistant"));
        assert!(screen.contains("Hi! Ask me a technical question."));
        assert!(screen.contains("Ask a technical question..."));
        assert!(screen.contains("Send (type a question first)"));
    }

    #[test]
    fn frame_while_awaiting_shows_thinking_affordance() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SubmitPrompt {
                text: "What is RAG?".into(),
            },
        );

        let screen = render_to_string(&mut app, 90, 12);

        assert!(screen.contains("You: What is RAG?"));
        assert!(screen.contains("Thinking..."));
    }

    #[test]
    fn auto_scroll_pins_view_to_newest_record() {
        let mut app = create_test_app();
        for i in 0..20 {
            app.transcript.append(Message::assistant(format!("line {i}")));
        }

        let screen = render_to_string(&mut app, 40, 10);

        assert!(screen.contains("line 19"));
        assert!(!screen.contains("Hi! Ask"));
        assert_eq!(
            app.ui.scroll_offset,
            max_scroll_offset(&app, chat_areas(Rect::new(0, 0, 40, 10), 1).1)
        );
    }
}
