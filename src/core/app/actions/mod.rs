mod input;
mod request;

use std::time::Duration;

use tokio::sync::mpsc;

use super::App;
use crate::api::Answer;
use crate::core::ask_service::AskParams;

#[derive(Debug)]
pub enum AppAction {
    SubmitPrompt {
        text: String,
    },
    AnswerReceived {
        request_id: u64,
        answer: Answer,
        latency: Duration,
    },
    AnswerFailed {
        request_id: u64,
        error: String,
    },
    Reset,
    InsertIntoInput {
        text: String,
    },
    ClearInput,
    Quit,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(action);
        }
    }
}

pub enum AppCommand {
    SendPrompt(AskParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitPrompt { .. }
        | AppAction::AnswerReceived { .. }
        | AppAction::AnswerFailed { .. }
        | AppAction::Reset => request::handle_request_action(app, action),

        AppAction::InsertIntoInput { .. } | AppAction::ClearInput | AppAction::Quit => {
            input::handle_input_action(app, action)
        }
    }
}
