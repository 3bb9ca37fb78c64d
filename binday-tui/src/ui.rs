use binday_core::{
    advisory::Severity,
    materials::bin_label,
    model::Stream,
    service::Countdown,
    setup::SetupStep,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let subtitle = app
        .session
        .property_id()
        .map_or_else(|| "no address selected".to_owned(), |id| format!("property {id}"));
    let header = Paragraph::new(format!("Bin Day – Wollongong collections ({subtitle})"))
        .block(Block::default().borders(Borders::ALL).title("Bin Day"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::Dashboard => draw_dashboard(frame, app, *content_area),
        Screen::Setup => draw_setup(frame, app, *content_area),
        Screen::Materials => draw_materials(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::Dashboard => {
            "r refresh · a change address · m which bin? · e export calendar · q quit"
        }
        Screen::Setup => "Type to filter · ↑/↓ move · Enter choose · Esc back · Ctrl-C quit",
        Screen::Materials => "Type to search · ↑/↓ move · Esc back · Ctrl-C quit",
    };

    let session_status = app.session.status().to_string();
    let message = if app.is_loading {
        Some("Loading…".to_owned())
    } else {
        app.error_message
            .clone()
            .or_else(|| app.notice.clone())
            .or_else(|| (!session_status.is_empty()).then_some(session_status))
    };
    let status_text = match message {
        Some(message) => format!("{message} · {nav_hint}"),
        None => nav_hint.to_owned(),
    };

    let status_style = if app.error_message.is_some() || app.session.status().is_problem() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else if app.notice.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // bin cards
            Constraint::Length(3), // weather
            Constraint::Length(3), // events
            Constraint::Min(0),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [cards_area, weather_area, events_area, _rest] = chunks else {
        return;
    };

    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(*cards_area);
    for (countdown, card_area) in app.session.countdowns().into_iter().zip(card_chunks.iter()) {
        draw_card(frame, countdown, *card_area);
    }

    let advisories = app.session.advisories();
    let (weather_text, weather_style) = if advisories.is_empty() {
        (
            "No weather concerns for the next collection.".to_owned(),
            Style::default(),
        )
    } else {
        let text = advisories
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" · ");
        let color = if advisories
            .iter()
            .any(|advisory| advisory.severity == Severity::Warning)
        {
            Color::LightRed
        } else {
            Color::LightBlue
        };
        (text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let weather = Paragraph::new(weather_text)
        .style(weather_style)
        .block(Block::default().borders(Borders::ALL).title("Weather"))
        .wrap(Wrap { trim: true });
    frame.render_widget(weather, *weather_area);

    let events_text = app
        .upcoming_event
        .as_ref()
        .map_or_else(|| "No council events in the next 30 days.".to_owned(), ToString::to_string);
    let events = Paragraph::new(events_text)
        .block(Block::default().borders(Borders::ALL).title("Council events"))
        .wrap(Wrap { trim: true });
    frame.render_widget(events, *events_area);
}

fn draw_card(frame: &mut Frame<'_>, countdown: Countdown, area: Rect) {
    let color = stream_color(countdown.stream);
    let (headline, detail) = match (countdown.date, countdown.days) {
        (Some(date), Some(days)) => (relative_day_label(days), date.format("%a %d %b").to_string()),
        _ => ("--".to_owned(), "No date available".to_owned()),
    };

    let text = vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ];
    let card = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(countdown.stream.label()),
    );
    frame.render_widget(card, area);
}

fn draw_setup(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter
            Constraint::Min(0),    // choices
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, results_area] = chunks else {
        return;
    };

    let step_name = match app.wizard.step() {
        SetupStep::Locality => "suburb",
        SetupStep::Street => "street",
        SetupStep::Property | SetupStep::Ready => "property",
    };

    let input = Paragraph::new(app.setup_query.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Select your {step_name} (type to filter)")),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let choices = app.setup_choices();
    let items = if choices.is_empty() {
        vec![ListItem::new("Nothing to choose from. Enter to retry, Esc to go back.")]
    } else {
        choices
            .iter()
            .map(|choice| ListItem::new(choice.name.clone()))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} options", choices.len())),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !choices.is_empty() {
        state.select(Some(app.setup_index));
    }
    frame.render_stateful_widget(list, *results_area, &mut state);
}

fn draw_materials(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Min(0),    // results + detail
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, body_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.materials_query.as_str())
        .block(Block::default().borders(Borders::ALL).title("Which bin? Search items"))
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(*body_area);
    let body = body_chunks.as_ref();
    let [list_area, detail_area] = body else {
        return;
    };

    let results = app.material_results();
    let items = if results.is_empty() {
        vec![ListItem::new("No matching items.")]
    } else {
        results
            .iter()
            .map(|material| ListItem::new(material.title.clone()))
            .collect()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Items"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !results.is_empty() {
        state.select(Some(app.materials_index));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);

    let detail = app.current_material().map_or_else(
        || vec![Line::from("Select an item to see where it goes.")],
        |material| {
            let mut lines = vec![
                Line::from(Span::styled(
                    material.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(bin_label(material.bin_type.as_deref())),
            ];
            if let Some(disposal) = &material.disposal {
                lines.push(Line::from(""));
                lines.push(Line::from(disposal.clone()));
            }
            if let Some(tip) = &material.tip {
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Tip: {tip}")));
            }
            lines
        },
    );
    let detail = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title("Disposal"))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, *detail_area);
}

fn stream_color(stream: Stream) -> Color {
    match stream {
        Stream::Organic => Color::Green,
        Stream::Recycling => Color::Yellow,
        Stream::Landfill => Color::Red,
    }
}

fn relative_day_label(days: i64) -> String {
    match days {
        0 => "TODAY".to_owned(),
        1 => "Tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        -1 => "yesterday".to_owned(),
        days => format!("{} days ago", days.abs()),
    }
}
