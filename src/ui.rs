use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Screen, VenueAction};

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(3), // messages
            Constraint::Length(3), // footer
        ])
        .split(area);

    draw_header(frame, app, outer[0]);

    let body = outer[1].inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    match app.screen {
        Screen::Lookup => draw_lookup(frame, app, body),
        Screen::Venue => draw_venue(frame, app, body),
        Screen::Campaign => draw_campaign(frame, app, body),
    }

    draw_messages(frame, app, outer[2]);
    draw_footer(frame, app, outer[3]);
}

fn rounded(title: String, active: bool) -> Block<'static> {
    let border = if active { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "venue",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "trends",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ·  Business suite"),
    ];
    if let Some(busy) = app.busy() {
        spans.push(Span::styled(
            format!("  ⟳ {}…", busy.label()),
            Style::default().fg(Color::Cyan),
        ));
    }
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

fn draw_lookup(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(format!("{}_", app.url_input))
        .block(rounded(" Venue url ".to_string(), true));
    frame.render_widget(input, rows[0]);

    let help = Paragraph::new(format!(
        "Paste a venue page URL (for example {}abc123) or a bare venue id, then press Enter.",
        app.config.venue_url_prefix
    ))
    .style(Style::default().fg(Color::DarkGray))
    .wrap(Wrap { trim: true });
    frame.render_widget(help, rows[1].inner(Margin {
        horizontal: 1,
        vertical: 1,
    }));
}

fn draw_venue(frame: &mut Frame, app: &App, area: Rect) {
    let Some(venue) = app.venue.get() else {
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(cols[1]);

    // Photos
    let photos: Vec<ListItem> = venue
        .image_urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let mark = if app.selection.contains(i) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {:>2}  {url}", i + 1))
        })
        .collect();
    let mut photo_state = ListState::default();
    if !venue.image_urls.is_empty() {
        photo_state.select(Some(app.photo_cursor));
    }
    let photo_list = List::new(photos)
        .block(rounded(
            format!(
                " {} · {} photo(s), {} selected ",
                venue.title,
                venue.image_urls.len(),
                app.selection.len()
            ),
            app.focus == Focus::Photos,
        ))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(photo_list, cols[0], &mut photo_state);

    // Trends
    let trends: Vec<ListItem> = venue
        .trends
        .iter()
        .map(|t| ListItem::new(t.as_str()))
        .collect();
    let mut trend_state = ListState::default();
    if !venue.trends.is_empty() {
        trend_state.select(Some(app.trend_cursor));
    }
    let trend_list = List::new(trends)
        .block(rounded(" Trends ".to_string(), app.focus == Focus::Trends))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(trend_list, right[0], &mut trend_state);

    // Results
    let mut lines: Vec<Line> = app
        .results
        .groups()
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(g.trend().to_string(), Style::default().fg(Color::Green)),
                Span::raw(format!("  {} image(s)", g.images().len())),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::styled(
            "No results yet",
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !venue.tags.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("tags: {}", venue.tags.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let results = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(rounded(" Results ".to_string(), false));
    frame.render_widget(results, right[1]);
}

fn draw_campaign(frame: &mut Frame, app: &App, area: Rect) {
    let venue_title = app.venue.get().map(|v| v.title.as_str()).unwrap_or("");
    let trend = app.current_trend().unwrap_or("");
    let lines = vec![
        Line::from(vec![
            Span::styled("Venue   ", Style::default().fg(Color::DarkGray)),
            Span::raw(venue_title.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Trend   ", Style::default().fg(Color::DarkGray)),
            Span::raw(trend.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Budget  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("¥{}_", app.budget_input),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];
    let form = Paragraph::new(lines).block(rounded(" Generate campaign ".to_string(), true));
    frame.render_widget(form, area);
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match (&app.failure, &app.status) {
        (Some(err), _) => (format!("✗ {err}"), Color::Red),
        (None, Some(msg)) => (msg.clone(), Color::Green),
        (None, None) => (String::new(), Color::Reset),
    };
    let messages = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(
        messages,
        area.inner(Margin {
            horizontal: 2,
            vertical: 0,
        }),
    );
}

fn key_hint(key: &str, label: &str, disabled: bool) -> Vec<Span<'static>> {
    let key_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let label_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    vec![
        Span::styled(format!(" {key} "), key_style),
        Span::styled(format!("{label}   "), label_style),
    ]
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    match app.screen {
        Screen::Lookup => {
            spans.extend(key_hint("Enter", "find my venue", false));
            spans.extend(key_hint("Esc", "quit", false));
        }
        Screen::Venue => {
            spans.extend(key_hint("↑↓", "move", false));
            spans.extend(key_hint("Tab", "photos/trends", false));
            spans.extend(key_hint("Space", "select", false));
            for action in VenueAction::ALL {
                spans.extend(key_hint(action.key(), action.label(), action.is_disabled()));
            }
            spans.extend(key_hint("Esc", "back", false));
        }
        Screen::Campaign => {
            spans.extend(key_hint("0-9", "budget", false));
            spans.extend(key_hint("Enter", "submit", false));
            spans.extend(key_hint("Esc", "back", false));
        }
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(footer, area);
}
