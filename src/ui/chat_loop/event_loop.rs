//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input and request settlements both arrive on channels; each is
//! turned into [`AppAction`]s, applied in one batch, and the resulting
//! commands are executed before the next frame is drawn.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppCommand};
use crate::core::ask_service::{AskMessage, AskService};
use crate::ui::renderer::ui;

use super::keybindings::handle_key;
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

const MAX_FPS: u64 = 60;
/// Redraw cadence for the waiting indicator.
const INDICATOR_FRAME: Duration = Duration::from_millis(125);

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    (app.update(|app| terminal_guard.draw(|f| ui(f, app))).await)?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        request_redraw: false,
    };
    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let actions = app
                    .update(|app| handle_key(app, key, term_size.width, term_size.height))
                    .await;
                dispatcher.dispatch_many(actions);
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                handle_paste_event(dispatcher, text);
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    if outcome.events_processed {
        outcome.request_redraw = true;
    }

    outcome
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

pub(crate) fn handle_paste_event(dispatcher: &AppActionDispatcher, text: String) {
    let sanitized_text = sanitize_pasted_text(&text);
    if sanitized_text.is_empty() {
        return;
    }

    dispatcher.dispatch_many([AppAction::InsertIntoInput {
        text: sanitized_text,
    }]);
}

/// Forward settlements to the reducer. Stale ids are passed through; the
/// reducer is the one place that decides what is current.
fn process_ask_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(AskMessage, u64)>,
) -> bool {
    let mut actions = Vec::new();
    while let Ok((message, request_id)) = rx.try_recv() {
        actions.push(match message {
            AskMessage::Answered { answer, latency } => AppAction::AnswerReceived {
                request_id,
                answer,
                latency,
            },
            AskMessage::Failed(error) => AppAction::AnswerFailed { request_id, error },
        });
    }

    if actions.is_empty() {
        return false;
    }

    dispatcher.dispatch_many(actions);
    true
}

async fn drain_action_queue(
    app: &AppHandle,
    ask_service: &AskService,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::SendPrompt(params) => ask_service.spawn_request(params),
        }
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(app: App) -> Result<(), Box<dyn Error>> {
    info!(endpoint = %app.session.target.endpoint, "starting chat session");
    let app = AppHandle::new(app);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);

    let terminal = setup_terminal()?;

    let (ask_service, mut ask_rx) = AskService::new();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut last_indicator_frame = Instant::now();

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;

        let event_outcome =
            process_ui_events(&app, &mut event_rx, &action_dispatcher, term_size).await;
        if event_outcome.request_redraw {
            request_redraw = true;
        }

        let received_any = process_ask_updates(&action_dispatcher, &mut ask_rx);
        if received_any {
            request_redraw = true;
        }

        if drain_action_queue(&app, &ask_service, &mut action_rx).await {
            request_redraw = true;
        }

        if app.read(|app| app.is_awaiting()).await {
            let now = Instant::now();
            if now.duration_since(last_indicator_frame) >= INDICATOR_FRAME {
                request_redraw = true;
                last_indicator_frame = now;
            }
        }

        let idle = !event_outcome.events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    app.update(|app| app.session.cancel_current_request()).await;
    restore_terminal(&terminal).await?;
    debug!("chat session ended");

    result
}
