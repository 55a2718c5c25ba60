use anyhow::Result;
use longrun_actors::{SessionActor, builder::Builder};
use longrun_chat::{ChatSession, ProductLink, RevealTiming, Script, script::DEFAULT_RESPONSES};
use longrun_config::LongrunConfig;
use longrun_tui::{Landing, TuiActor, spawn_tui_feeders};

const SESSION_MAILBOX: usize = 256;
const TUI_MAILBOX: usize = 256;

pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
    pub async fn run(self) -> Result<()> {
        self.builder.run_until_shutdown().await
    }
}

/// Build the controller from the `script` and `timing` sections.
pub fn build_session(cfg: &LongrunConfig) -> Result<ChatSession> {
    let sc = &cfg.script;
    let mut script = match (&sc.responses, &sc.product_link) {
        (None, None) => Script::default(),
        (responses, link) => {
            let defaults = Script::default();
            let responses = responses
                .clone()
                .unwrap_or_else(|| DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect());
            let link = link.as_ref().map_or_else(
                || defaults.link().clone(),
                |l| ProductLink {
                    label: l.label.clone(),
                    url: l.url.clone(),
                },
            );
            Script::new(responses, link)?
        }
    };
    if let Some(heading) = &sc.heading {
        script = script.with_heading(heading.clone());
    }
    if let Some(suggestions) = &sc.suggestions {
        script = script.with_suggestions(suggestions.clone());
    }

    let t = &cfg.timing;
    let timing = RevealTiming {
        think_delay: t.think_delay(),
        reveal_delay: t.reveal_delay(),
        word_interval: t.word_interval(),
        settle_delay: t.settle_delay(),
    };

    Ok(ChatSession::new(script, timing))
}

/// Session first, then the UI that talks to it, then the feeders.
pub fn build_interactive(t: &mut Tether, session: ChatSession) -> Result<()> {
    let b = t.builder_mut();
    let shutdown = b.shutdown_handle();

    let landing = Landing {
        heading: session.script().heading().to_string(),
        suggestions: session.script().suggestions().to_vec(),
    };
    let (actor, views) = SessionActor::new(session);
    let initial = views.borrow().clone();
    let session_addr = b.spawn("session:main", SESSION_MAILBOX, actor);

    let tui = TuiActor::new(session_addr, initial, landing, shutdown.clone())?;
    let tui_addr = b.spawn("tui:main", TUI_MAILBOX, tui);
    spawn_tui_feeders(tui_addr, views, shutdown);

    Ok(())
}
