//! SSH session handler.
//!
//! One [`SessionHandler`] serves one TCP connection. For every session
//! channel it keeps the sending end of the channel's event queue and a key
//! decoder; once the client asks for a shell it spawns two tasks:
//!
//! - the session task, which runs an [`App`] under a [`Runtime`] with a
//!   [`SessionDriver`] and closes the channel with an exit status once the
//!   session is over;
//! - the output task, which forwards flushed frame bytes to the channel
//!   until the session task is done writing.
//!
//! A shell request on a channel without a PTY gets a short notice and a
//! failing exit status instead of a session.

use std::{
    collections::HashMap,
    io::Write,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::Utc;
use heartsh_app::{App, AppEvent, Exit, Runtime, Theme};
use russh::{
    Channel, ChannelId, CryptoVec,
    server::{Auth, Handle, Handler, Msg, Session},
};
use russh_keys::key::PublicKey;
use tokio::sync::{mpsc, watch};

use crate::{
    SessionError, Ticker, asset,
    input::KeyDecoder,
    terminal::{ChannelWriter, OUTPUT_QUEUE_DEPTH, SessionDriver},
};

/// Size assumed until the client sends a PTY request.
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Shown to the client when the banner cannot be loaded.
const ASSET_FAILURE_MESSAGE: &[u8] = b"Sorry, this session is unavailable right now.\r\n";

/// Shown to clients that ask for a shell without a PTY.
const NO_PTY_MESSAGE: &[u8] = b"no active terminal, skipping\n";

/// Exit status sent when a session ends normally.
const EXIT_OK: u32 = 0;

/// Exit status sent when the session could not run.
const EXIT_FAILURE: u32 = 1;

/// State shared by every session of the server.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Styling shared read-only across sessions.
    pub theme: Arc<Theme>,
    /// Banner file, read at each session start.
    pub asset_path: PathBuf,
    /// Clock refresh period.
    pub tick_interval: Duration,
    /// Flips to `true` when the server shuts down.
    pub shutdown: watch::Receiver<bool>,
}

/// Per-channel bookkeeping.
struct ChannelState {
    events: mpsc::UnboundedSender<AppEvent>,
    /// Taken by the shell request that starts the session.
    queue: Option<mpsc::UnboundedReceiver<AppEvent>>,
    size: (u16, u16),
    term: String,
    /// Set by the PTY request; a shell needs one.
    pty: bool,
    decoder: KeyDecoder,
}

/// Who a session belongs to, for connection logging.
#[derive(Debug, Clone)]
struct SessionInfo {
    user: String,
    peer: Option<SocketAddr>,
    size: (u16, u16),
    term: String,
}

/// russh handler for one client connection.
pub struct SessionHandler {
    ctx: SessionContext,
    peer: Option<SocketAddr>,
    user: String,
    channels: HashMap<ChannelId, ChannelState>,
}

impl SessionHandler {
    /// Create a handler for a connection from `peer`.
    pub fn new(ctx: SessionContext, peer: Option<SocketAddr>) -> Self {
        Self { ctx, peer, user: String::new(), channels: HashMap::new() }
    }

    fn accept(&mut self, user: &str) -> Auth {
        self.user = user.to_string();
        Auth::Accept
    }

    fn push(&self, channel: ChannelId, event: AppEvent) {
        if let Some(state) = self.channels.get(&channel) {
            // The session may already be over; late input is dropped.
            let _ = state.events.send(event);
        }
    }
}

#[async_trait]
impl Handler for SessionHandler {
    type Error = SessionError;

    async fn auth_none(&mut self, user: &str) -> Result<Auth, Self::Error> {
        tracing::debug!(user, peer = ?self.peer, "auth none accepted");
        Ok(self.accept(user))
    }

    async fn auth_publickey(&mut self, user: &str, public_key: &PublicKey) -> Result<Auth, Self::Error> {
        tracing::debug!(user, peer = ?self.peer, key = %public_key.fingerprint(), "auth publickey accepted");
        Ok(self.accept(user))
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        let (events, queue) = mpsc::unbounded_channel();
        self.channels.insert(
            channel.id(),
            ChannelState {
                events,
                queue: Some(queue),
                size: DEFAULT_SIZE,
                term: String::new(),
                pty: false,
                decoder: KeyDecoder::new(),
            },
        );
        Ok(true)
    }

    async fn pty_request(
        &mut self,
        channel: ChannelId,
        term: &str,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _modes: &[(russh::Pty, u32)],
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        let size = (clamp_dimension(col_width), clamp_dimension(row_height));
        if let Some(state) = self.channels.get_mut(&channel) {
            state.size = size;
            state.term = term.to_string();
            state.pty = true;
        }
        self.push(channel, AppEvent::Resize(size.0, size.1));
        Ok(())
    }

    async fn window_change_request(
        &mut self,
        channel: ChannelId,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        let size = (clamp_dimension(col_width), clamp_dimension(row_height));
        if let Some(state) = self.channels.get_mut(&channel) {
            state.size = size;
        }
        self.push(channel, AppEvent::Resize(size.0, size.1));
        Ok(())
    }

    async fn shell_request(&mut self, channel: ChannelId, session: &mut Session) -> Result<(), Self::Error> {
        let Some(state) = self.channels.get_mut(&channel) else {
            return Ok(());
        };
        let Some(queue) = state.queue.take() else {
            tracing::debug!(?channel, "ignoring repeated shell request");
            return Ok(());
        };

        if !state.pty {
            tracing::warn!(user = %self.user, peer = ?self.peer, "shell requested without a pty");
            drop(queue);
            tokio::spawn(reject_without_pty(session.handle(), channel));
            return Ok(());
        }

        let info = SessionInfo {
            user: self.user.clone(),
            peer: self.peer,
            size: state.size,
            term: state.term.clone(),
        };
        let ticker = Ticker::spawn(state.events.downgrade(), self.ctx.tick_interval);

        tokio::spawn(run_session(self.ctx.clone(), info, session.handle(), channel, queue, ticker));
        Ok(())
    }

    async fn data(&mut self, channel: ChannelId, data: &[u8], _session: &mut Session) -> Result<(), Self::Error> {
        let Some(state) = self.channels.get_mut(&channel) else {
            return Ok(());
        };
        for key in state.decoder.feed(data) {
            let _ = state.events.send(AppEvent::Key(key));
        }
        Ok(())
    }

    async fn channel_close(&mut self, channel: ChannelId, _session: &mut Session) -> Result<(), Self::Error> {
        // Dropping the sender closes the queue, which ends the session loop.
        self.channels.remove(&channel);
        Ok(())
    }
}

fn clamp_dimension(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Run one session to completion, log its start and end, then close the
/// channel.
async fn run_session(
    ctx: SessionContext,
    info: SessionInfo,
    handle: Handle,
    channel: ChannelId,
    queue: mpsc::UnboundedReceiver<AppEvent>,
    ticker: Ticker,
) {
    let started = Instant::now();
    tracing::info!(
        user = %info.user,
        peer = ?info.peer,
        cols = info.size.0,
        rows = info.size.1,
        term = %info.term,
        "session started"
    );

    let (output, output_rx) = mpsc::channel(OUTPUT_QUEUE_DEPTH);
    let forwarder = tokio::spawn(forward_output(handle.clone(), channel, output_rx));

    let exit_status = match drive_session(&ctx, info.size, ChannelWriter::new(output), queue, ticker).await {
        Ok(exit) => {
            tracing::info!(user = %info.user, peer = ?info.peer, ?exit, elapsed = ?started.elapsed(), "session ended");
            EXIT_OK
        },
        Err(SessionError::Asset(e)) => {
            tracing::error!(user = %info.user, peer = ?info.peer, "session failed: {}", e);
            EXIT_FAILURE
        },
        Err(e) => {
            tracing::warn!(user = %info.user, peer = ?info.peer, elapsed = ?started.elapsed(), "session aborted: {}", e);
            EXIT_FAILURE
        },
    };

    // Every writer is gone by now, so the forwarder drains and returns.
    if matches!(forwarder.await, Ok(true)) {
        close_channel(&handle, channel, exit_status).await;
    }
}

async fn drive_session(
    ctx: &SessionContext,
    size: (u16, u16),
    mut writer: ChannelWriter,
    queue: mpsc::UnboundedReceiver<AppEvent>,
    ticker: Ticker,
) -> Result<Exit, SessionError> {
    let content = match asset::load_banner(&ctx.asset_path) {
        Ok(content) => content,
        Err(e) => {
            writer.write_all(ASSET_FAILURE_MESSAGE)?;
            writer.flush()?;
            return Err(e.into());
        },
    };

    let driver = SessionDriver::new(writer, size, queue, ctx.shutdown.clone())?.with_ticker(ticker);
    let app = App::new(content, Arc::clone(&ctx.theme), Utc::now());

    Runtime::new(driver, app).run().await
}

/// Forward frame bytes to the client.
///
/// Runs until every [`ChannelWriter`] for the channel is gone and returns
/// `true`, or returns `false` as soon as the client stops accepting data.
async fn forward_output(handle: Handle, channel: ChannelId, mut output: mpsc::Receiver<Vec<u8>>) -> bool {
    while let Some(bytes) = output.recv().await {
        if handle.data(channel, CryptoVec::from_slice(&bytes)).await.is_err() {
            tracing::debug!(?channel, "client stopped accepting data");
            return false;
        }
    }
    true
}

/// Tell a client without a PTY there is nothing to show, then close.
async fn reject_without_pty(handle: Handle, channel: ChannelId) {
    if handle.data(channel, CryptoVec::from_slice(NO_PTY_MESSAGE)).await.is_err() {
        tracing::debug!(?channel, "client stopped accepting data");
        return;
    }
    close_channel(&handle, channel, EXIT_FAILURE).await;
}

async fn close_channel(handle: &Handle, channel: ChannelId, exit_status: u32) {
    // The client may already be gone; nothing is left to report to it.
    let _ = handle.exit_status_request(channel, exit_status).await;
    let _ = handle.eof(channel).await;
    let _ = handle.close(channel).await;
}
