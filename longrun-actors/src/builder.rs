use crate::actor::{spawn_actor_with_shutdown, Actor, ActorHandle, Addr};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;

/// Spawns actors under the shared shutdown signal and tracks their tasks.
pub struct Builder {
    sys: ActorSystem,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Spawn an actor and track its task. `name` only labels the logs.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use longrun_actors::{actor::{Actor, Context}, builder::Builder};
    /// # struct Sink;
    /// # #[async_trait]
    /// # impl Actor for Sink {
    /// #     type Msg = ();
    /// #     async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) -> Result<()> {
    /// #         Ok(())
    /// #     }
    /// # }
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let mut b = Builder::new();
    ///     let addr = b.spawn("sink", 4, Sink);
    ///     addr.send(()).await.unwrap();
    ///     b.graceful_shutdown().await.unwrap();
    /// });
    /// ```
    pub fn spawn<A: Actor>(&mut self, name: &str, mailbox: usize, actor: A) -> Addr<A> {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        let addr = h.addr.clone();
        let actor_name = name.to_string();
        self.sys.track(async move {
            h.task.await??;
            tracing::debug!(target = "longrun-actors", actor = %actor_name, "actor.finished");
            Ok(())
        });
        tracing::debug!(target = "longrun-actors", actor = name, mailbox, "actor.spawned");
        addr
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.sys.graceful_shutdown().await
    }

    /// Block until CTRL-C or an in-process shutdown signal, then shut everything down.
    pub async fn run_until_shutdown(self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = async {
                let _ = shutdown_rx.recv().await;
            } => {}
        }
        self.sys.graceful_shutdown().await
    }
}
