//! Non-interactive mode: feed prompts to a session actor and print each exchange.
use anyhow::{Context, Result, anyhow};
use longrun_actors::{SessionActor, SessionMsg, builder::Builder};
use longrun_chat::{ChatSession, Message};
use std::io::Write;
use tracing::warn;

const MAILBOX: usize = 16;

pub async fn run_prompts<W: Write>(session: ChatSession, prompts: &[String], out: &mut W) -> Result<()> {
    let mut b = Builder::new();
    let (actor, mut views) = SessionActor::new(session);
    let addr = b.spawn("session:headless", MAILBOX, actor);

    for prompt in prompts {
        if prompt.trim().is_empty() {
            warn!("headless.blank_prompt_skipped");
            continue;
        }
        let before = views.borrow().messages.len();
        addr.send(SessionMsg::Submit(prompt.clone()))
            .await
            .map_err(|_| anyhow!("session stopped before prompt {prompt:?}"))?;

        // One user message plus one reply, fully revealed.
        let settled = views
            .wait_for(|v| v.messages.len() >= before + 2 && !v.is_bot_typing)
            .await
            .context("session closed while replying")?
            .clone();

        for msg in &settled.messages[before..] {
            write_message(out, msg)?;
        }
    }
    out.flush()?;

    let _ = addr.send(SessionMsg::Shutdown).await;
    drop(addr);
    b.graceful_shutdown().await
}

fn write_message<W: Write>(out: &mut W, msg: &Message) -> Result<()> {
    let who = if msg.is_user() { "You" } else { "Puresport" };
    writeln!(out, "{who}: {}", msg.display_text())?;
    if let Some(link) = msg.product_link() {
        writeln!(out, "  ↗ {} <{}>", link.label, link.url)?;
    }
    Ok(())
}
