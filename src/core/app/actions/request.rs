use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{App, AppAction, AppCommand};
use crate::api::Answer;
use crate::core::app::RequestState;
use crate::core::constants::REQUEST_FAILED_MESSAGE;
use crate::core::message::{latency_millis, Message};

pub(super) fn handle_request_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitPrompt { text } => submit_prompt(app, text),
        AppAction::AnswerReceived {
            request_id,
            answer,
            latency,
        } => {
            settle(app, request_id, answered_message(answer, latency));
            None
        }
        AppAction::AnswerFailed { request_id, error } => {
            debug!(request_id, %error, "request failed");
            settle(app, request_id, Message::assistant(REQUEST_FAILED_MESSAGE));
            None
        }
        AppAction::Reset => {
            reset(app);
            None
        }
        _ => unreachable!("non-request action routed to request handler"),
    }
}

/// `Idle -> Awaiting`. Blank input and sends while a request is outstanding
/// are dropped without touching any state.
fn submit_prompt(app: &mut App, text: String) -> Option<AppCommand> {
    if text.trim().is_empty() || app.is_awaiting() {
        return None;
    }

    let request_id = app.session.next_request_id();
    app.transcript.append(Message::user(text.clone()));
    app.transcript.append(Message::pending());
    app.ui.clear_input();
    app.ui.follow_latest();
    app.request = RequestState::Awaiting {
        request_id,
        started_at: Instant::now(),
    };

    info!(request_id, prompt_len = text.len(), "prompt submitted");
    let params = app.session.build_ask_params(text, request_id);
    Some(AppCommand::SendPrompt(params))
}

fn answered_message(answer: Answer, latency: Duration) -> Message {
    Message::answered(answer.text, answer.sources, latency_millis(latency))
}

/// `Awaiting -> Idle`. Settlements for anything but the in-flight request are
/// ignored.
fn settle(app: &mut App, request_id: u64, message: Message) {
    if !app.is_current_request(request_id) {
        debug!(request_id, "dropping stale settlement");
        return;
    }

    if let Err(err) = app.transcript.replace_last(message) {
        warn!(request_id, error = %err, "settlement without a pending record");
    }
    app.request = RequestState::Idle;
    app.session.clear_cancel_token();
    app.ui.follow_latest();
}

/// Re-seed the transcript. An in-flight request is cancelled and its id
/// invalidated so a late settlement cannot land in the fresh transcript.
fn reset(app: &mut App) {
    if let Some(request_id) = app.request.awaiting_request_id() {
        info!(request_id, "reset while awaiting; cancelling request");
    }
    app.session.cancel_current_request();
    app.request = RequestState::Idle;
    app.transcript.reset();
    app.ui.scroll_offset = 0;
    app.ui.follow_latest();
}
