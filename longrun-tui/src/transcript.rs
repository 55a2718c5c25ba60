use crate::styles;
use longrun_chat::{Message, SessionView};
use ratatui::style::Style;

pub const BOT_NAME: &str = "Puresport";
const CARET: &str = "▍";

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptLine {
    pub text: String,
    pub style: Style,
}

impl TranscriptLine {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new(), Style::default())
    }
}

/// Local UI output (help, errors) pinned after the first `after` messages.
#[derive(Clone, Debug)]
pub struct Notice {
    pub after: usize,
    pub line: TranscriptLine,
}

/// Flatten session messages and local notices into styled lines.
pub fn build(view: &SessionView, notices: &[Notice]) -> Vec<TranscriptLine> {
    let mut out = Vec::new();
    let mut pending = notices.iter().peekable();

    for (idx, msg) in view.messages.iter().enumerate() {
        while let Some(n) = pending.next_if(|n| n.after <= idx) {
            out.push(n.line.clone());
        }
        push_message(&mut out, view, msg);
    }
    out.extend(pending.map(|n| n.line.clone()));
    out
}

fn push_message(out: &mut Vec<TranscriptLine>, view: &SessionView, msg: &Message) {
    if msg.is_user() {
        out.push(TranscriptLine::new("→ [You]", styles::user_header()));
        push_body(out, &msg.display_text(), styles::user_text());
        out.push(TranscriptLine::blank());
        return;
    }

    out.push(TranscriptLine::new(
        format!("← [{BOT_NAME}]"),
        styles::bot_header(),
    ));

    let revealing = view
        .typing
        .as_ref()
        .filter(|t| t.message_id == msg.id());
    match revealing {
        Some(t) => push_body(out, &format!("{}{CARET}", t.revealed_text()), styles::bot_text()),
        None => {
            push_body(out, &msg.display_text(), styles::bot_text());
            if let Some(link) = msg.product_link() {
                out.push(TranscriptLine::new(format!("  ↗ {}", link.label), styles::link()));
                out.push(TranscriptLine::new(format!("    {}", link.url), styles::dim()));
            }
        }
    }
    out.push(TranscriptLine::blank());
}

fn push_body(out: &mut Vec<TranscriptLine>, text: &str, style: Style) {
    for line in text.lines() {
        out.push(TranscriptLine::new(format!("  {line}"), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longrun_chat::{MessageId, ProductLink, RevealedWord, TypingState};

    fn texts(lines: &[TranscriptLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn view_with(messages: Vec<Message>, typing: Option<TypingState>) -> SessionView {
        SessionView {
            is_bot_typing: typing.is_some(),
            is_input_docked: !messages.is_empty(),
            messages,
            typing,
            ..SessionView::default()
        }
    }

    #[test]
    fn renders_partial_reveal_with_caret() {
        let typing = TypingState {
            message_id: MessageId(1),
            revealed_words: vec![
                RevealedWord { text: "How".into(), sequence_id: 0 },
                RevealedWord { text: "many".into(), sequence_id: 1 },
            ],
        };
        let view = view_with(
            vec![
                Message::User { id: MessageId(0), text: "Running a marathon".into() },
                Message::Bot {
                    id: MessageId(1),
                    text: "How many runs per week are you doing for training?".into(),
                },
            ],
            Some(typing),
        );

        let lines = build(&view, &[]);
        assert_eq!(
            texts(&lines),
            vec![
                "→ [You]",
                "  Running a marathon",
                "",
                "← [Puresport]",
                "  How many▍",
                "",
            ]
        );
    }

    #[test]
    fn settled_product_shows_link_and_url() {
        let view = view_with(
            vec![Message::Product {
                id: MessageId(7),
                lead_in: "Try our ".into(),
                link: ProductLink {
                    label: "Discovery Pack".into(),
                    url: "https://example.com/pack".into(),
                },
                trailing: ".".into(),
            }],
            None,
        );
        let lines = build(&view, &[]);
        assert_eq!(lines[1].text, "  Try our Discovery Pack.");
        assert_eq!(lines[2].text, "  ↗ Discovery Pack");
        assert_eq!(lines[2].style, styles::link());
        assert_eq!(lines[3].text, "    https://example.com/pack");
    }

    #[test]
    fn notices_are_interleaved_by_position() {
        let view = view_with(
            vec![Message::User { id: MessageId(0), text: "hi".into() }],
            None,
        );
        let notices = vec![
            Notice { after: 0, line: TranscriptLine::new("before", styles::system()) },
            Notice { after: 1, line: TranscriptLine::new("after", styles::system()) },
        ];
        let lines = build(&view, &notices);
        assert_eq!(texts(&lines), vec!["before", "→ [You]", "  hi", "", "after"]);
    }
}
