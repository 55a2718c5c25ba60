use crate::message::MessageId;
use std::time::Duration;

/// Delays driving a reply: think pause, first word, per-word cadence, settle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    pub think_delay: Duration,
    pub reveal_delay: Duration,
    pub word_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(500),
            reveal_delay: Duration::from_millis(100),
            word_interval: Duration::from_millis(80),
            settle_delay: Duration::from_millis(200),
        }
    }
}

/// A deferred step of the session, tagged with the message it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Produce the reply to user message `reply_to`.
    Think { reply_to: MessageId },
    /// Reveal the next word of `message_id`.
    RevealWord { message_id: MessageId },
    /// Clear typing state once `message_id` is fully shown.
    Settle { message_id: MessageId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub timer: Timer,
}

impl Scheduled {
    pub fn new(delay: Duration, timer: Timer) -> Self {
        Self { delay, timer }
    }
}
