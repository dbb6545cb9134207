use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Answer, AppState, Question};
use crate::store::StateStorage;

pub fn render<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(question) = app.current_question() else {
        return;
    };
    let has_code = question.code.is_some();
    let chunks = create_layout(area, has_code);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], question);

    let body_chunk = match &question.code {
        Some(code) => {
            render_code_block(frame, chunks[2], code);
            chunks[3]
        }
        None => chunks[2],
    };

    match app.feedback() {
        Some(answer) => render_feedback(frame, body_chunk, question, answer),
        None => render_options(
            frame,
            body_chunk,
            question,
            app.option_cursor(),
            app.selected_options(),
        ),
    }

    let controls_chunk = if has_code { chunks[4] } else { chunks[3] };
    match app.status_message() {
        Some(message) => render_status(frame, controls_chunk, message),
        None => render_controls(frame, controls_chunk, app.feedback().is_some(), question.is_multiple()),
    }
}

fn create_layout(area: Rect, has_code: bool) -> std::rc::Rc<[Rect]> {
    if has_code {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .margin(2)
        .split(area)
    }
}

fn render_progress<S: StateStorage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let heading = match (app.state, app.current_review_item()) {
        (AppState::Review, Some(item)) => format!(
            "Review · {} · missed {}x",
            app.review_category_name(&item.category_id),
            item.error_count
        ),
        _ => app.active_category().name.clone(),
    };

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);
    frame.render_widget(Paragraph::new(heading).fg(Color::Cyan), chunks[0]);

    let progress = format!(
        "{}/{}",
        app.current_question_number(),
        app.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &Question) {
    let mut text = question.text.clone();
    if question.is_multiple() {
        text.push_str("  (select all that apply)");
    }
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_code_block(frame: &mut Frame, area: Rect, code: &str) {
    let code_lines: Vec<Line> = code
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Yellow))))
        .collect();

    let widget = Paragraph::new(code_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    cursor: usize,
    selected: &[usize],
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_selected = selected.contains(&index);
        let style = if is_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else if is_selected {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_cursor { ">" } else { " " };
        let check = match (question.is_multiple(), is_selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(*)",
            (false, false) => "( )",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{} ", check), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, question: &Question, answer: &Answer) {
    let (verdict, color) = if answer.is_correct {
        ("Correct!", Color::Green)
    } else {
        ("Incorrect", Color::Red)
    };

    let mut lines = vec![
        Line::from(Span::styled(verdict, Style::default().fg(color).bold())),
        Line::from(""),
    ];

    for (index, option) in question.options.iter().enumerate() {
        let is_correct = question.correct.contains(&index);
        let was_selected = answer.selected_options.contains(&index);
        let (symbol, style) = match (is_correct, was_selected) {
            (true, _) => ("+", Style::default().fg(Color::Green)),
            (false, true) => ("-", Style::default().fg(Color::Red)),
            (false, false) => (" ", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        question.explanation.as_str(),
        Style::default().fg(Color::Gray),
    )));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, message: &str) {
    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .fg(Color::Yellow);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool, multiple: bool) {
    let text = match (answered, multiple) {
        (true, _) => "enter next  ·  esc back  ·  q quit",
        (false, true) => "j/k navigate  ·  space toggle  ·  enter answer  ·  esc back  ·  q quit",
        (false, false) => "j/k navigate  ·  space select  ·  enter answer  ·  esc back  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
