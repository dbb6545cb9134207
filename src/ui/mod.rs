mod categories;
mod quiz;
mod result;
mod review;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::models::AppState;
use crate::store::StateStorage;

pub fn render<S: StateStorage>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Categories => categories::render(frame, area, app),
        AppState::Quiz | AppState::Review => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
        AppState::ReviewSummary => review::render(frame, area, app),
    }
}
