//! Terminal UI for Bin Day: next bin collections, weather advisories, and the "Which Bin?" guide.

mod app;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use binday_core::{
    calendar,
    clock::SystemClock,
    events::upcoming_event,
    materials::MaterialsGuide,
    paths,
    ports::PortError,
    service::{Session, SessionPorts, SessionState},
    settings::Settings,
    setup::SetupStep,
    store::JsonFileStore,
};
use binday_provider_wollongong::WollongongWastePort;
use binday_weather_openmeteo::OpenMeteoPort;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Screen};
use crate::input::Action;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to a file; the terminal belongs to the UI.
    let _log_guard = init_logging();

    let settings = Settings::load(&paths::settings_file()).context("loading settings")?;

    // HTTP + session setup
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.request_timeout())
        .build()?;

    let session = Session::new(SessionPorts {
        waste: Arc::new(WollongongWastePort::new(
            client.clone(),
            settings.waste_api_base.as_str(),
        )),
        weather: Arc::new(OpenMeteoPort::new(client, &settings.weather)),
        store: Arc::new(JsonFileStore::in_default_dirs()),
        clock: Arc::new(SystemClock),
    });

    let mut app = App::new(session);
    let state = app.session.load();
    info!(?state, "starting");

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let first = if state == SessionState::NeedsSetup {
        Action::ChangeAddress
    } else {
        Action::Refresh
    };

    // Run event loop
    let res = run(&mut terminal, app, first).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn init_logging() -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(paths::logs_dir(), "binday.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("binday=info,warn")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}

async fn run(terminal: &mut Term, mut app: App, first: Action) -> Result<()> {
    let mut pending = Some(first);

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        let action = match pending.take() {
            Some(action) => action,
            // Poll for input (non-blocking, small timeout to keep CPU low)
            None => {
                if event::poll(StdDuration::from_millis(100))?
                    && let CEvent::Key(key) = event::read()?
                {
                    input::handle_key_event(key, &mut app)
                } else {
                    continue;
                }
            }
        };

        if action != Action::None {
            app.clear_messages();
        }

        match action {
            Action::Quit => break,
            Action::None => {}
            Action::Refresh => {
                app.is_loading = true;
                terminal.draw(|frame| ui::draw(frame, &app))?;

                refresh(&mut app).await;

                app.is_loading = false;
            }
            Action::ChangeAddress => {
                app.screen = Screen::Setup;
                app.reset_setup_cursor();
                app.is_loading = true;
                terminal.draw(|frame| ui::draw(frame, &app))?;

                let port = app.session.waste();
                let res = app.wizard.load_localities(port.as_ref()).await;

                app.is_loading = false;
                if let Err(err) = res {
                    warn!(error = %err, "could not load suburbs");
                    app.error_message = Some(format!("Failed to load suburbs: {err}"));
                }
            }
            Action::Choose => {
                let Some(choice) = app.current_choice() else {
                    if app.wizard.step() == SetupStep::Locality && app.setup_query.is_empty() {
                        // Suburb list failed to load; Enter retries.
                        pending = Some(Action::ChangeAddress);
                    } else {
                        app.error_message = Some("Nothing selected".into());
                    }
                    continue;
                };

                app.is_loading = true;
                terminal.draw(|frame| ui::draw(frame, &app))?;

                let port = app.session.waste();
                let res = app.wizard.choose(port.as_ref(), choice.id).await;

                app.is_loading = false;
                app.reset_setup_cursor();
                if let Err(err) = res {
                    app.error_message = Some(lookup_error(&err));
                    continue;
                }

                if app.wizard.step() == SetupStep::Ready {
                    finish_setup(terminal, &mut app).await?;
                }
            }
            Action::LoadMaterials => {
                if app.guide.is_none() {
                    app.is_loading = true;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.session.waste().materials().await;

                    app.is_loading = false;
                    match res {
                        Ok(materials) => app.guide = Some(MaterialsGuide::new(materials)),
                        Err(err) => {
                            warn!(error = %err, "could not load materials");
                            app.error_message = Some(format!("Failed to load materials: {err}"));
                            continue;
                        }
                    }
                }
                app.materials_query.clear();
                app.materials_index = 0;
                app.screen = Screen::Materials;
            }
            Action::ExportCalendar => export_calendar(&mut app),
        }
    }

    Ok(())
}

async fn refresh(app: &mut App) {
    app.session.refresh().await;

    match app.session.waste().events().await {
        Ok(events) => app.upcoming_event = upcoming_event(&events, app.session.today()),
        Err(err) => warn!(error = %err, "could not load council events"),
    }
}

async fn finish_setup(terminal: &mut Term, app: &mut App) -> Result<()> {
    let Some(property_id) = app.wizard.selected_property() else {
        return Ok(());
    };

    if let Err(err) = app.session.complete_setup(property_id) {
        warn!(error = %err, "could not save config");
        app.error_message = Some(format!("Could not save your address: {err}"));
        return Ok(());
    }

    app.screen = Screen::Dashboard;
    app.is_loading = true;
    terminal.draw(|frame| ui::draw(frame, app))?;

    refresh(app).await;

    app.is_loading = false;
    Ok(())
}

fn export_calendar(app: &mut App) {
    let (Some(property_id), Some(snapshot)) = (app.session.property_id(), app.session.snapshot())
    else {
        app.error_message = Some("No collection dates to export".into());
        return;
    };

    let path = paths::calendar_file();
    match calendar::write_ics(&path, property_id, &snapshot.collections, snapshot.cached_at) {
        Ok(()) => app.notice = Some(format!("Calendar exported to {}", path.display())),
        Err(PortError::NoResults(_)) => {
            app.error_message = Some("No collection dates to export".into());
        }
        Err(err) => {
            warn!(error = %err, "calendar export failed");
            app.error_message = Some(format!("Export failed: {err}"));
        }
    }
}

fn lookup_error(err: &PortError) -> String {
    match err {
        PortError::NoResults(_) => format!("{err}, pick another option"),
        other => format!("Lookup failed: {other}"),
    }
}
