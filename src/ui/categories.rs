use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::store::{CategoryStatus, StateStorage};

pub fn render<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_category_list(frame, chunks[1], app);
    render_status(frame, chunks[2], app.status_message());
    render_controls(frame, chunks[3]);
}

fn render_header<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let review_total = app.manager().get_review_questions().len();
    let review_line = if review_total > 0 {
        Line::from(Span::styled(
            format!("{} question(s) to review", review_total),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("No mistakes to review".fg(Color::DarkGray))
    };

    let content = vec![
        Line::from(Span::styled(
            app.title().to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        review_line,
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_category_list<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let mut lines: Vec<Line> = Vec::with_capacity(app.categories().len() * 3);

    for (index, category) in app.categories().iter().enumerate() {
        let summary = app.category_summary(category);
        let is_selected = index == app.category_cursor();
        let name_style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if is_selected { ">" } else { " " };

        let status_color = match summary.status() {
            CategoryStatus::Completed => Color::Green,
            CategoryStatus::InProgress => Color::Yellow,
            CategoryStatus::NotStarted => Color::DarkGray,
        };

        let mut header = vec![
            Span::styled(format!(" {} ", marker), name_style),
            Span::styled(category.name.as_str(), name_style),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", summary.status().label()),
                Style::default().fg(status_color),
            ),
        ];
        if summary.needs_review() {
            header.push(Span::styled(
                format!("  needs review ({})", summary.review_count),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(header));

        let mut detail = format!(
            "     {} / {} answered",
            summary.total_answered, summary.total_questions
        );
        if summary.total_answered > 0 {
            detail.push_str(&format!("  ·  {:.1}% correct", summary.accuracy));
        }
        lines.push(Line::from(Span::styled(
            detail,
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        let widget = Paragraph::new(message)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter start  ·  r review  ·  x reset  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
