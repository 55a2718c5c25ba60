use crate::{
    command::Command,
    input::InputLine,
    keys::{KeyAction, Submission, classify_submit, map_key},
    styles,
    transcript::{self, Notice, TranscriptLine},
    view::{self, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{Event as CtEvent, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use longrun_actors::{
    SessionActor, SessionMsg,
    actor::{Actor, Addr, Context},
    system::ShutdownHandle,
};
use longrun_chat::SessionView;
use ratatui::{Terminal, backend::CrosstermBackend, style::Style};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Session(SessionView),
    Submit(String),
    OpError(String),
    Shutdown,
}

/// Landing-page copy shown before the first message.
#[derive(Clone, Debug)]
pub struct Landing {
    pub heading: String,
    pub suggestions: Vec<String>,
}

pub struct TuiActor {
    session: Addr<SessionActor>,
    landing: Landing,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,

    // ui state
    view: SessionView,
    input: InputLine,
    input_revision: u64,
    notices: Vec<Notice>,
    scroll: usize, // rows up from the bottom
    dirty: bool,
    spin_idx: usize,

    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(
        session: Addr<SessionActor>,
        initial: SessionView,
        landing: Landing,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        let mut input = InputLine::default();
        input.replace(initial.input.clone());

        Ok(Self {
            session,
            landing,
            term,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            input_revision: initial.input_revision,
            view: initial,
            input,
            notices: Vec::new(),
            scroll: 0,
            dirty: true,
            spin_idx: 0,
            shutdown,
        })
    }

    fn input_enabled(&self) -> bool {
        !self.view.is_bot_typing
    }

    fn is_busy(&self) -> bool {
        self.view.is_bot_typing || self.view.is_awaiting_reply
    }

    fn tell_session(&self, msg: SessionMsg) {
        if let Err(msg) = self.session.try_send(msg) {
            warn!(?msg, "tui.session_mailbox_unavailable");
        }
    }

    fn sync_input(&self) {
        self.tell_session(SessionMsg::SetInput {
            text: self.input.value().to_string(),
            revision: self.input_revision,
        });
    }

    fn notice<S: Into<String>>(&mut self, s: S, style: Style) {
        self.notices.push(Notice {
            after: self.view.messages.len(),
            line: TranscriptLine::new(s, style),
        });
        self.scroll = 0;
        self.dirty = true;
    }

    fn apply_view(&mut self, next: SessionView) {
        if next.messages.len() > self.view.messages.len() {
            self.scroll = 0;
        }
        if next.input_revision != self.input_revision {
            self.input.replace(next.input.clone());
            self.input_revision = next.input_revision;
        }
        self.view = next;
        self.dirty = true;
    }

    fn spinner(&self) -> &'static str {
        if self.is_busy() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn status(&self) -> &'static str {
        if self.view.is_bot_typing {
            "Typing…"
        } else if self.view.is_awaiting_reply {
            "Thinking…"
        } else {
            "Ready"
        }
    }

    fn step_spinner(&mut self) {
        if self.is_busy() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = ViewSnap {
            heading: &self.landing.heading,
            suggestions: &self.landing.suggestions,
            docked: self.view.is_input_docked,
            input: self.input.value(),
            input_cursor: self.input.cursor(),
            input_enabled: self.input_enabled(),
            lines: transcript::build(&self.view, &self.notices),
            scroll: self.scroll,
            status: self.status(),
            spinner: self.spinner(),
        };

        self.scroll = view::draw(&mut self.term, &snap)?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<TuiMsg> {
        match map_key(key, !self.input_enabled()) {
            KeyAction::Quit => return Some(TuiMsg::Shutdown),
            KeyAction::Submit => return Some(TuiMsg::Submit(self.input.value().to_string())),
            KeyAction::Ignore => return None,
            KeyAction::ScrollUp(n) => self.scroll = self.scroll.saturating_add(n),
            KeyAction::ScrollDown(n) => self.scroll = self.scroll.saturating_sub(n),
            KeyAction::CancelReveal => self.tell_session(SessionMsg::CancelTyping),
            KeyAction::Suggest(slot) => {
                if let Some(prompt) = self.landing.suggestions.get(slot).cloned() {
                    self.tell_session(SessionMsg::SelectSuggestion(prompt));
                }
            }
            KeyAction::Edit(edit) => {
                if self.input.apply(edit) {
                    self.sync_input();
                }
            }
        }
        self.dirty = true;
        None
    }

    fn route_submit(&mut self, line: String, me: Addr<TuiActor>) {
        match classify_submit(&line) {
            Submission::Blank => {}
            Submission::Command(cmd) => {
                self.input.clear();
                self.sync_input();
                self.dirty = true;
                self.handle_command(cmd, me);
            }
            // The session clears the input itself once it accepts the send.
            Submission::Prompt(text) => self.tell_session(SessionMsg::Submit(text)),
        }
    }

    fn handle_command(&mut self, cmd: Command, me: Addr<TuiActor>) {
        match cmd {
            Command::Quit => {
                let _ = me.try_send(TuiMsg::Shutdown);
            }
            Command::Stop => {
                self.tell_session(SessionMsg::CancelTyping);
                self.notice("✓ Stopped.", styles::system());
            }
            Command::Help => {
                self.notice("Keys:", styles::key_hint());
                self.notice("  Enter        send the message", styles::value());
                self.notice("  F1-F3        send a suggested prompt", styles::value());
                self.notice("  PgUp/PgDn    scroll the chat", styles::value());
                self.notice("  Esc          stop the reply being typed", styles::value());
                self.notice("  /stop        cancel a pending reply", styles::value());
                self.notice("  /quit        exit", styles::value());
                self.notice("", Style::default());
            }
            Command::Unknown(s) => {
                self.notice(format!("× Unknown command: {s}"), styles::error());
                self.notice("Try `/help`.", styles::dim());
            }
        }
    }

    fn restore_terminal(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(self.term.backend_mut(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => match ev {
                CtEvent::Key(k) => {
                    if let Some(next) = self.handle_key(k) {
                        let _ = ctx.addr().try_send(next);
                    }
                }
                CtEvent::Resize(..) => self.dirty = true,
                _ => {}
            },
            TuiMsg::Submit(line) => self.route_submit(line, ctx.addr()),
            TuiMsg::Session(view) => self.apply_view(view),
            TuiMsg::OpError(e) => self.notice(format!("× Error: {e}"), styles::error()),
            TuiMsg::Tick => {
                self.step_spinner();
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                debug!("tui.shutdown_requested");
                // Tear the session down first so no reveal timer outlives the UI.
                let _ = self.session.send(SessionMsg::Shutdown).await;
                self.restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }

    async fn stopped(&mut self) {
        self.restore_terminal();
    }
}
