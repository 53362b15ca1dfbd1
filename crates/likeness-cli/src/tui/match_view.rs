use likeness_images::ImageResolution;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::App;

/// Render the revealed match: query on the left, match on the right.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let Some(reveal) = app.reveal.as_ref() else {
        let msg = Paragraph::new("No match revealed").style(Style::default().fg(Color::Red));
        frame.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(7),    // Side-by-side columns
            Constraint::Length(3), // Similarity
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_character(
        frame,
        columns[0],
        &reveal.query_name,
        "You",
        &reveal.query_image,
    );
    render_character(
        frame,
        columns[1],
        &format!("Match : {}", reveal.result.match_name),
        "Your match",
        &reveal.match_image,
    );

    let similarity = Paragraph::new(format!(
        "  Cosine similarity {:.4}",
        reveal.result.similarity
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(similarity, chunks[1]);

    render_help(frame, chunks[2]);
}

fn render_character(
    frame: &mut Frame,
    area: Rect,
    heading: &str,
    title: &str,
    image: &ImageResolution,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {heading}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match image {
        ImageResolution::Found { resolver, image } => {
            lines.push(Line::from(format!("  {image}")));
            lines.push(Line::from(Span::styled(
                format!("  via {resolver}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        ImageResolution::Unavailable { failures } => {
            lines.push(Line::from(Span::styled(
                "  Image not available",
                Style::default().fg(Color::Yellow),
            )));
            for failure in failures {
                lines.push(Line::from(Span::styled(
                    format!("  {failure}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(panel, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  b Back  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
