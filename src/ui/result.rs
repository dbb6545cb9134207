use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::store::{Performance, StateStorage};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let (correct, answered) = app
        .result_progress()
        .map_or((0, 0), |p| (p.correct_count(), p.answers.len()));
    let accuracy = app.result_accuracy();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    frame.render_widget(
        Paragraph::new(app.active_category().name.as_str())
            .alignment(Alignment::Center)
            .fg(Color::DarkGray),
        chunks[0],
    );
    render_score_summary(frame, chunks[1], correct, answered, accuracy);
    render_answer_breakdown(frame, chunks[2], app);
    render_controls(frame, chunks[3], app.status_message());
}

fn get_grade_color(performance: Performance) -> Color {
    match performance {
        Performance::Excellent => Color::Green,
        Performance::Good => Color::Cyan,
        Performance::Fair => Color::Yellow,
        Performance::NeedsReview => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, correct: usize, answered: usize, accuracy: f64) {
    let performance = Performance::from_accuracy(accuracy);
    let grade_color = get_grade_color(performance);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{:.1}%", accuracy),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} correct  ·  {} incorrect  ·  {} answered",
                correct,
                answered - correct,
                answered
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            performance.message(),
            Style::default().fg(grade_color),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_answer_breakdown<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let category = app.active_category();
    let lines: Vec<Line> = app
        .result_progress()
        .map(|p| p.answers.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|answer| {
            let (symbol, color) = if answer.is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let preview = category
                .questions
                .get(answer.question_index)
                .map(|q| truncate_question(&q.text))
                .unwrap_or_default();

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", answer.question_index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(preview, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let mut lines = Vec::new();
    if let Some(message) = status {
        lines.push(Line::from(message.fg(Color::Yellow)));
    }
    lines.push(Line::from("j/k scroll  ·  r retake  ·  esc categories  ·  q quit".fg(Color::DarkGray)));
    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_question() {
        assert_eq!(truncate_question("short"), "short");
        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        let truncated = truncate_question(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
    }
}
