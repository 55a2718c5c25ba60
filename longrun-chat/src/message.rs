use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a message in the session transcript. Assigned in append order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLink {
    pub label: String,
    pub url: String,
}

/// One entry of the transcript. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    User {
        id: MessageId,
        text: String,
    },
    Bot {
        id: MessageId,
        text: String,
    },
    /// Final canned reply: `lead_in` + `link.label` + `trailing` is the
    /// original response string.
    Product {
        id: MessageId,
        lead_in: String,
        link: ProductLink,
        trailing: String,
    },
}

impl Message {
    pub fn id(&self) -> MessageId {
        match self {
            Message::User { id, .. } | Message::Bot { id, .. } | Message::Product { id, .. } => *id,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User { .. })
    }

    pub fn product_link(&self) -> Option<&ProductLink> {
        match self {
            Message::Product { link, .. } => Some(link),
            _ => None,
        }
    }

    /// Full text as shown once revealed; product messages include the link label inline.
    pub fn display_text(&self) -> String {
        match self {
            Message::User { text, .. } | Message::Bot { text, .. } => text.clone(),
            Message::Product {
                lead_in,
                link,
                trailing,
                ..
            } => format!("{lead_in}{}{trailing}", link.label),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedWord {
    pub text: String,
    pub sequence_id: u64,
}

/// Reveal progress of the one bot message currently being animated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingState {
    pub message_id: MessageId,
    pub revealed_words: Vec<RevealedWord>,
}

impl TypingState {
    pub fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            revealed_words: Vec::new(),
        }
    }

    /// Revealed words joined back with single spaces.
    pub fn revealed_text(&self) -> String {
        self.revealed_words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Message {
        Message::Product {
            id: MessageId(7),
            lead_in: "Try our ".into(),
            link: ProductLink {
                label: "Discovery Pack".into(),
                url: "https://example.com/pack".into(),
            },
            trailing: " today.".into(),
        }
    }

    #[test]
    fn product_display_text_inlines_label() {
        assert_eq!(product().display_text(), "Try our Discovery Pack today.");
        assert!(!product().is_user());
        assert_eq!(product().id(), MessageId(7));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let user = Message::User {
            id: MessageId(1),
            text: "hi".into(),
        };
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(v["kind"], "user");
        assert_eq!(v["id"], 1);

        let v = serde_json::to_value(product()).unwrap();
        assert_eq!(v["kind"], "product");
        assert_eq!(v["link"]["label"], "Discovery Pack");
    }

    #[test]
    fn revealed_text_rejoins_words() {
        let mut t = TypingState::new(MessageId(2));
        assert_eq!(t.revealed_text(), "");
        for (i, w) in ["How", "many", "runs"].iter().enumerate() {
            t.revealed_words.push(RevealedWord {
                text: (*w).into(),
                sequence_id: i as u64,
            });
        }
        assert_eq!(t.revealed_text(), "How many runs");
    }
}
