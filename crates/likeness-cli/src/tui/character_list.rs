use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::{App, Notice};

/// Render the character selection view.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Character table
            Constraint::Length(3), // Help / notice bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!(
        "Select a character    {} in the catalog",
        app.names.len()
    ))
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Character").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    // area.height - 2 for borders - 1 for header
    let viewport_height = (area.height.saturating_sub(3)) as usize;
    let visible_start = app.list_offset;
    let visible_end = (visible_start + viewport_height).min(app.names.len());

    let rows: Vec<Row> = app
        .names
        .iter()
        .enumerate()
        .skip(visible_start)
        .take(viewport_height)
        .map(|(i, name)| {
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(name.clone()),
            ])
            .style(style)
        })
        .collect();

    let title = if app.names.len() > viewport_height {
        format!(
            "Characters [{}-{} of {}]",
            visible_start + 1,
            visible_end,
            app.names.len()
        )
    } else {
        "Characters".to_string()
    };

    let table = Table::new(rows, [Constraint::Length(5), Constraint::Min(20)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help = match &app.notice {
        Some(Notice::Busy(message)) => {
            Paragraph::new(format!("  {message}")).style(Style::default().fg(Color::Cyan))
        }
        Some(Notice::Error(message)) => {
            Paragraph::new(format!("  {message}")).style(Style::default().fg(Color::Red))
        }
        None => Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Enter Reveal match  q Quit")
            .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(help.block(Block::default().borders(Borders::ALL)), area);
}
