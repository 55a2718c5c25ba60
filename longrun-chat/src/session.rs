//! Session state machine: transcript, round-robin reply index and the
//! word-by-word reveal of the current bot reply.
//!
//! Operations return at most one [`Scheduled`] directive. The host keeps a
//! single pending timer and replaces it with whatever the latest call
//! returned. Firings are checked against the active message id, so a timer
//! that was aborted after it already fired cannot touch a newer reply.
use crate::{
    message::{Message, MessageId, RevealedWord, TypingState},
    script::Script,
    timing::{RevealTiming, Scheduled, Timer},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Observable state handed to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub typing: Option<TypingState>,
    pub is_bot_typing: bool,
    pub is_awaiting_reply: bool,
    pub is_input_docked: bool,
    pub input: String,
    /// Bumped whenever the session rewrites `input` itself.
    pub input_revision: u64,
}

#[derive(Debug)]
pub struct ChatSession {
    script: Script,
    timing: RevealTiming,
    messages: Vec<Message>,
    response_index: usize,
    typing: Option<TypingState>,
    reveal_words: Vec<String>,
    awaiting_reply: Option<MessageId>,
    input: String,
    input_revision: u64,
    input_docked: bool,
    next_message_id: u64,
    next_word_id: u64,
}

impl ChatSession {
    pub fn new(script: Script, timing: RevealTiming) -> Self {
        Self {
            script,
            timing,
            messages: Vec::new(),
            response_index: 0,
            typing: None,
            reveal_words: Vec::new(),
            awaiting_reply: None,
            input: String::new(),
            input_revision: 0,
            input_docked: false,
            next_message_id: 0,
            next_word_id: 0,
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn typing(&self) -> Option<&TypingState> {
        self.typing.as_ref()
    }

    pub fn is_bot_typing(&self) -> bool {
        self.typing.is_some()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply.is_some()
    }

    pub fn is_input_docked(&self) -> bool {
        self.input_docked
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn response_index(&self) -> usize {
        self.response_index
    }

    /// Keystroke-level edit coming from the presentation layer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input_revision(&self) -> u64 {
        self.input_revision
    }

    /// Apply an edit made on top of input revision `based_on`.
    ///
    /// Edits based on an older revision are dropped: the session has since
    /// rewritten the input (cleared it on send, or filled a suggestion) and
    /// the editor has not seen that yet. Returns whether the edit was applied.
    pub fn edit_input(&mut self, text: impl Into<String>, based_on: u64) -> bool {
        if based_on != self.input_revision {
            debug!(based_on, current = self.input_revision, "session.input.stale_edit");
            return false;
        }
        self.set_input(text);
        true
    }

    /// Put a suggestion into the input box, as if the user had typed it.
    pub fn fill_suggestion(&mut self, prompt: impl Into<String>) {
        self.rewrite_input(prompt.into());
    }

    /// Fill the input with `prompt` and submit it straight away.
    pub fn select_suggestion(&mut self, prompt: impl Into<String>) -> Option<Scheduled> {
        self.fill_suggestion(prompt);
        self.submit_input()
    }

    /// Submit whatever the input box currently holds.
    pub fn submit_input(&mut self) -> Option<Scheduled> {
        let text = self.input.clone();
        self.submit_prompt(&text)
    }

    /// Append a user message and ask for a reply after the think delay.
    ///
    /// Blank prompts and prompts sent while a reply is being revealed are
    /// dropped without touching any state.
    pub fn submit_prompt(&mut self, text: &str) -> Option<Scheduled> {
        if text.trim().is_empty() {
            debug!("session.submit.blank_ignored");
            return None;
        }
        if self.is_bot_typing() {
            debug!("session.submit.ignored_while_typing");
            return None;
        }

        let id = self.next_id();
        self.messages.push(Message::User {
            id,
            text: text.to_string(),
        });
        self.rewrite_input(String::new());
        self.input_docked = true;
        self.awaiting_reply = Some(id);
        debug!(message = %id, "session.submit.accepted");

        Some(Scheduled::new(
            self.timing.think_delay,
            Timer::Think { reply_to: id },
        ))
    }

    /// Run a timer that came due. Returns the follow-up timer, if any.
    pub fn fire(&mut self, timer: Timer) -> Option<Scheduled> {
        match timer {
            Timer::Think { reply_to } => {
                if self.awaiting_reply != Some(reply_to) {
                    debug!(message = %reply_to, "session.think.stale");
                    return None;
                }
                self.awaiting_reply = None;
                Some(self.produce_response())
            }
            Timer::RevealWord { message_id } => {
                if !self.is_revealing(message_id) {
                    debug!(message = %message_id, "session.reveal.stale");
                    return None;
                }
                self.reveal_next_word()
            }
            Timer::Settle { message_id } => {
                if !self.is_revealing(message_id) {
                    debug!(message = %message_id, "session.settle.stale");
                    return None;
                }
                self.typing = None;
                self.reveal_words.clear();
                debug!(message = %message_id, "session.reveal.settled");
                None
            }
        }
    }

    /// Drop the running reveal and any pending reply. Safe to call at any time.
    pub fn cancel_typing(&mut self) {
        if let Some(t) = self.typing.take() {
            debug!(message = %t.message_id, "session.reveal.cancelled");
        }
        self.reveal_words.clear();
        self.awaiting_reply = None;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            messages: self.messages.clone(),
            typing: self.typing.clone(),
            is_bot_typing: self.is_bot_typing(),
            is_awaiting_reply: self.is_awaiting_reply(),
            is_input_docked: self.input_docked,
            input: self.input.clone(),
            input_revision: self.input_revision,
        }
    }

    fn produce_response(&mut self) -> Scheduled {
        let index = self.response_index;
        let response = self.script.response(index).to_string();
        let id = self.next_id();

        let split = if self.script.is_product_index(index) {
            self.script.split_product(&response)
        } else {
            None
        };
        let message = match split {
            Some((lead_in, trailing)) => Message::Product {
                id,
                lead_in: lead_in.to_string(),
                link: self.script.link().clone(),
                trailing: trailing.to_string(),
            },
            None => Message::Bot {
                id,
                text: response.clone(),
            },
        };

        self.reveal_words = message
            .display_text()
            .split(' ')
            .map(str::to_owned)
            .collect();
        self.messages.push(message);
        self.typing = Some(TypingState::new(id));
        self.response_index = (index + 1) % self.script.len();
        debug!(message = %id, response = index, "session.reply.started");

        Scheduled::new(
            self.timing.reveal_delay,
            Timer::RevealWord { message_id: id },
        )
    }

    fn reveal_next_word(&mut self) -> Option<Scheduled> {
        let typing = self.typing.as_mut()?;
        let word = self.reveal_words.get(typing.revealed_words.len())?.clone();

        typing.revealed_words.push(RevealedWord {
            text: word,
            sequence_id: self.next_word_id,
        });
        self.next_word_id += 1;

        let message_id = typing.message_id;
        if typing.revealed_words.len() < self.reveal_words.len() {
            Some(Scheduled::new(
                self.timing.word_interval,
                Timer::RevealWord { message_id },
            ))
        } else {
            Some(Scheduled::new(
                self.timing.settle_delay,
                Timer::Settle { message_id },
            ))
        }
    }

    fn is_revealing(&self, message_id: MessageId) -> bool {
        self.typing
            .as_ref()
            .is_some_and(|t| t.message_id == message_id)
    }

    fn rewrite_input(&mut self, text: String) {
        self.input = text;
        self.input_revision += 1;
    }

    fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }
}
