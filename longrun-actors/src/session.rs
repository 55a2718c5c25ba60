//! Actor hosting a [`ChatSession`] and the one timer it may have pending.
//!
//! Every directive returned by the session replaces the previous timer task,
//! so there is never more than one sleeper per session. Views are published
//! on a `watch` channel after each message that changed something.
use crate::actor::{Actor, Addr, Context};
use anyhow::Result;
use longrun_chat::{ChatSession, Scheduled, SessionView, Timer};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug)]
pub enum SessionMsg {
    /// The input box changed. `revision` is the input revision the edit was made on.
    SetInput { text: String, revision: u64 },
    /// Submit explicit text.
    Submit(String),
    /// Submit the current input contents.
    SubmitInput,
    /// Fill the input with a suggestion, then submit it on the next turn.
    SelectSuggestion(String),
    /// Stop the running reveal, if any.
    CancelTyping,
    /// A scheduled step came due.
    Timer(Timer),
    /// Tear the session down.
    Shutdown,
}

pub struct SessionActor {
    id: Uuid,
    session: ChatSession,
    timer: Option<JoinHandle<()>>,
    view_tx: watch::Sender<SessionView>,
}

impl SessionActor {
    pub fn new(session: ChatSession) -> (Self, watch::Receiver<SessionView>) {
        let (view_tx, view_rx) = watch::channel(session.view());
        let id = Uuid::new_v4();
        info!(session = %id, responses = session.script().len(), "session.created");
        (
            Self {
                id,
                session,
                timer: None,
                view_tx,
            },
            view_rx,
        )
    }

    fn schedule(&mut self, step: Option<Scheduled>, me: Addr<SessionActor>) {
        let Some(step) = step else {
            return;
        };
        self.cancel_timer();
        let session = self.id;
        debug!(%session, timer = ?step.timer, delay_ms = step.delay.as_millis() as u64, "session.timer.scheduled");
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(step.delay).await;
            if me.send(SessionMsg::Timer(step.timer)).await.is_err() {
                debug!(%session, "session.timer.mailbox_closed");
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }

    fn publish(&self) {
        let next = self.session.view();
        self.view_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Drop for SessionActor {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[async_trait::async_trait]
impl Actor for SessionActor {
    type Msg = SessionMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            SessionMsg::SetInput { text, revision } => {
                self.session.edit_input(text, revision);
            }
            SessionMsg::Submit(text) => {
                let step = self.session.submit_prompt(&text);
                self.schedule(step, ctx.addr());
            }
            SessionMsg::SubmitInput => {
                let step = self.session.submit_input();
                self.schedule(step, ctx.addr());
            }
            SessionMsg::SelectSuggestion(prompt) => {
                self.session.fill_suggestion(prompt);
                if ctx.addr().try_send(SessionMsg::SubmitInput).is_err() {
                    warn!(session = %self.id, "session.suggestion.mailbox_full; submitting inline");
                    let step = self.session.submit_input();
                    self.schedule(step, ctx.addr());
                }
            }
            SessionMsg::Timer(timer) => {
                let step = self.session.fire(timer);
                self.schedule(step, ctx.addr());
            }
            SessionMsg::CancelTyping => {
                self.cancel_timer();
                self.session.cancel_typing();
            }
            SessionMsg::Shutdown => ctx.stop(),
        }

        self.publish();
        Ok(())
    }

    async fn stopped(&mut self) {
        self.cancel_timer();
        self.session.cancel_typing();
        self.publish();
        info!(session = %self.id, messages = self.session.messages().len(), "session.closed");
    }
}
