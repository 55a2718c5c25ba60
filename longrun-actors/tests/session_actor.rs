use longrun_actors::{
    SessionActor, SessionMsg,
    actor::{ActorHandle, spawn_actor},
};
use longrun_chat::{
    ChatSession, Message, RevealTiming, Script, SessionView,
    script::{DEFAULT_RESPONSES, PRODUCT_URL},
};
use std::time::Duration;
use tokio::{sync::watch, time::sleep};

fn start() -> (ActorHandle<SessionActor>, watch::Receiver<SessionView>) {
    let session = ChatSession::new(Script::default(), RevealTiming::default());
    let (actor, view) = SessionActor::new(session);
    (spawn_actor(actor, 16), view)
}

fn revealed(view: &watch::Receiver<SessionView>) -> usize {
    view.borrow()
        .typing
        .as_ref()
        .map(|t| t.revealed_words.len())
        .unwrap_or(0)
}

async fn settle(view: &mut watch::Receiver<SessionView>, messages: usize) -> SessionView {
    view.wait_for(|v| v.messages.len() == messages && !v.is_bot_typing && !v.is_awaiting_reply)
        .await
        .expect("session alive")
        .clone()
}

#[tokio::test(start_paused = true)]
async fn marathon_prompt_is_answered_word_by_word() {
    let (ActorHandle { addr, .. }, mut view) = start();
    addr.send(SessionMsg::Submit("Running a marathon".into()))
        .await
        .unwrap();

    sleep(Duration::from_millis(450)).await;
    assert_eq!(view.borrow().messages.len(), 1);
    assert!(view.borrow().is_input_docked);

    // Think delay elapsed at 500ms; first word lands at 600ms.
    sleep(Duration::from_millis(100)).await;
    {
        let v = view.borrow();
        assert_eq!(v.messages.len(), 2);
        assert!(v.is_bot_typing);
        assert_eq!(
            v.messages[1].display_text(),
            "How many runs per week are you doing for training?"
        );
    }
    assert_eq!(revealed(&view), 0);

    // Words at 600ms and 680ms.
    sleep(Duration::from_millis(150)).await;
    assert_eq!(revealed(&view), 2);

    let done = settle(&mut view, 2).await;
    assert!(done.typing.is_none());
}

#[tokio::test(start_paused = true)]
async fn sends_while_typing_are_dropped() {
    let (ActorHandle { addr, .. }, mut view) = start();
    addr.send(SessionMsg::Submit("Running a marathon".into()))
        .await
        .unwrap();
    sleep(Duration::from_millis(650)).await;
    assert!(view.borrow().is_bot_typing);

    addr.send(SessionMsg::Submit("Actually, cycling".into()))
        .await
        .unwrap();
    let done = settle(&mut view, 2).await;
    assert_eq!(done.messages.iter().filter(|m| m.is_user()).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_reveal_leaves_nothing_pending() {
    let (ActorHandle { addr, .. }, view) = start();
    addr.send(SessionMsg::Submit("Building muscle".into()))
        .await
        .unwrap();
    sleep(Duration::from_millis(700)).await;
    assert_eq!(revealed(&view), 2);

    addr.send(SessionMsg::CancelTyping).await.unwrap();
    sleep(Duration::from_millis(1)).await;
    let after_cancel = view.borrow().clone();
    assert!(after_cancel.typing.is_none());
    assert!(!after_cancel.is_bot_typing);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(*view.borrow(), after_cancel);
}

#[tokio::test(start_paused = true)]
async fn shutdown_mid_reveal_stops_cleanly() {
    let (ActorHandle { addr, task }, mut view) = start();
    addr.send(SessionMsg::Submit("Running a marathon".into()))
        .await
        .unwrap();
    sleep(Duration::from_millis(650)).await;
    assert!(view.borrow().is_bot_typing);

    addr.send(SessionMsg::Shutdown).await.unwrap();
    task.await.unwrap().unwrap();

    let last = view.borrow_and_update().clone();
    assert!(last.typing.is_none());
    assert_eq!(last.messages.len(), 2);

    sleep(Duration::from_secs(5)).await;
    assert!(view.has_changed().is_err(), "view channel closes with the actor");
    assert_eq!(*view.borrow(), last);
}

#[tokio::test(start_paused = true)]
async fn suggestion_is_filled_then_submitted() {
    let (ActorHandle { addr, .. }, mut view) = start();
    addr.send(SessionMsg::SelectSuggestion("Building muscle".into()))
        .await
        .unwrap();

    let v = view
        .wait_for(|v| !v.messages.is_empty())
        .await
        .unwrap()
        .clone();
    assert_eq!(v.messages[0].display_text(), "Building muscle");
    assert_eq!(v.input, "");
    assert!(v.input_revision >= 2);
    assert!(v.is_awaiting_reply);
}

#[tokio::test(start_paused = true)]
async fn full_cycle_ends_with_product_and_wraps() {
    let (ActorHandle { addr, .. }, mut view) = start();

    let mut replies = Vec::new();
    for k in 0..5 {
        let revision = view.borrow().input_revision;
        addr.send(SessionMsg::SetInput {
            text: format!("message {k}"),
            revision,
        })
        .await
        .unwrap();
        addr.send(SessionMsg::SubmitInput).await.unwrap();
        let v = settle(&mut view, (k + 1) * 2).await;
        replies.push(v.messages.last().cloned().unwrap());
    }

    for (k, reply) in replies.iter().take(3).enumerate() {
        assert_eq!(reply.display_text(), DEFAULT_RESPONSES[k]);
    }
    match &replies[3] {
        Message::Product { link, .. } => assert_eq!(link.url, PRODUCT_URL),
        other => panic!("expected product reply, got {other:?}"),
    }
    assert_eq!(replies[3].display_text(), DEFAULT_RESPONSES[3]);
    assert_eq!(replies[4].display_text(), DEFAULT_RESPONSES[0]);
}

#[tokio::test(start_paused = true)]
async fn late_keystroke_cannot_resurface_after_send() {
    let (ActorHandle { addr, .. }, mut view) = start();
    addr.send(SessionMsg::SetInput {
        text: "ab".into(),
        revision: 0,
    })
    .await
    .unwrap();
    addr.send(SessionMsg::Submit("ab".into())).await.unwrap();
    // Typed on the old line before the cleared view reached the editor.
    addr.send(SessionMsg::SetInput {
        text: "abc".into(),
        revision: 0,
    })
    .await
    .unwrap();

    let done = settle(&mut view, 2).await;
    assert_eq!(done.input, "");
    assert_eq!(done.input_revision, 1);

    addr.send(SessionMsg::SubmitInput).await.unwrap();
    sleep(Duration::from_secs(2)).await;
    let after = view.borrow().clone();
    assert_eq!(after.messages.len(), 2);
    assert_eq!(after.messages.iter().filter(|m| m.is_user()).count(), 1);
}
