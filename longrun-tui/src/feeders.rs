use crate::tui::{TuiActor, TuiMsg};
use crossterm::event::EventStream;
use futures::StreamExt;
use longrun_actors::actor::Addr;
use longrun_actors::system::ShutdownHandle;
use longrun_chat::SessionView;
use std::time::Duration;
use tokio::{sync::watch, time};

/// Forward terminal input, render ticks and session views into the TUI mailbox.
pub fn spawn_tui_feeders(
    tui: Addr<TuiActor>,
    mut views: watch::Receiver<SessionView>,
    shutdown: ShutdownHandle,
) {
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            tokio::select! {
                _ = shutdown_input.recv() => break,
                ev = events.next() => match ev {
                    Some(Ok(e)) => {
                        if tui_in.send(TuiMsg::InputEvent(e)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tui_in.send(TuiMsg::OpError(format!("input: {e}"))).await;
                    }
                    None => break,
                },
            }
        }
    });

    let tui_tick = tui.clone();
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(80));
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    let mut shutdown_views = shutdown.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_views.recv() => break,
                changed = views.changed() => {
                    if changed.is_err() {
                        tracing::debug!("tui.session_feed.closed");
                        break;
                    }
                    let view = views.borrow_and_update().clone();
                    if tui.send(TuiMsg::Session(view)).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}
