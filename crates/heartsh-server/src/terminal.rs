//! Session driver over an SSH channel.
//!
//! Implements the [`Driver`] trait for one remote terminal: events come from
//! the session queue (fed by the SSH handler and the [`Ticker`]), frames are
//! drawn by ratatui's crossterm backend into a [`ChannelWriter`] whose
//! flushed bytes are forwarded to the client.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use heartsh_app::{App, AppEvent, Driver, ui};
use ratatui::{
    Terminal, TerminalOptions, Viewport,
    backend::{Backend, ClearType, CrosstermBackend, WindowSize},
    buffer::Cell,
    layout::{Position, Rect, Size},
};
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    watch,
};

use crate::{SessionError, Ticker};

/// Flushed frames the output queue holds before writes are coalesced.
pub const OUTPUT_QUEUE_DEPTH: usize = 32;

/// Unsent output allowed to pile up while the queue is full.
const MAX_PENDING_BYTES: usize = 1 << 20;

/// Writer that buffers terminal output and hands it off on flush.
///
/// Bytes go to a bounded queue drained by the task that writes to the SSH
/// channel, so rendering never blocks on the network. While the queue is
/// full, flushed bytes stay in the buffer and go out with the next flush.
/// A client that lets more than the pending limit pile up fails the writer.
#[derive(Debug)]
pub struct ChannelWriter {
    buffer: Vec<u8>,
    output: mpsc::Sender<Vec<u8>>,
    max_pending: usize,
}

impl ChannelWriter {
    /// Create a writer feeding `output`.
    pub fn new(output: mpsc::Sender<Vec<u8>>) -> Self {
        Self { buffer: Vec::new(), output, max_pending: MAX_PENDING_BYTES }
    }

    /// Override how many unsent bytes may pile up behind a full queue.
    pub fn with_max_pending(mut self, bytes: usize) -> Self {
        self.max_pending = bytes;
        self
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        match self.output.try_reserve() {
            Ok(permit) => {
                permit.send(std::mem::take(&mut self.buffer));
                Ok(())
            },
            Err(TrySendError::Full(())) if self.buffer.len() <= self.max_pending => Ok(()),
            Err(TrySendError::Full(())) => Err(io::Error::other("client is not reading output")),
            Err(TrySendError::Closed(())) => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
        }
    }
}

impl Drop for ChannelWriter {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            let _ = self.output.try_send(std::mem::take(&mut self.buffer));
        }
    }
}

/// Crossterm backend for a remote terminal.
///
/// Drawing goes through [`CrosstermBackend`], but size and cursor queries
/// are answered from the client's PTY dimensions and the last cursor move.
/// The server's own tty, if it has one, is never consulted.
#[derive(Debug)]
pub struct ChannelBackend<W: Write> {
    inner: CrosstermBackend<W>,
    size: Size,
    cursor: Position,
}

impl<W: Write> ChannelBackend<W> {
    /// Create a backend for a client screen of `size`.
    pub fn new(writer: W, size: Size) -> Self {
        Self { inner: CrosstermBackend::new(writer), size, cursor: Position::ORIGIN }
    }

    /// Record a new client screen size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

impl<W: Write> Write for ChannelBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}

impl<W: Write> Backend for ChannelBackend<W> {
    type Error = io::Error;

    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        Ok(self.cursor)
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        let position = position.into();
        self.inner.set_cursor_position(position)?;
        self.cursor = position;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        Backend::clear(&mut self.inner)
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        Ok(self.size)
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        Ok(WindowSize { columns_rows: self.size, pixels: Size::default() })
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

/// Session driver implementing the [`Driver`] trait.
///
/// Owns the ratatui terminal, the receiving end of the session queue and the
/// session's ticker. Dropping it stops the ticker and restores the client's
/// screen.
pub struct SessionDriver<W: Write> {
    terminal: Terminal<ChannelBackend<W>>,
    events: mpsc::UnboundedReceiver<AppEvent>,
    shutdown: watch::Receiver<bool>,
    ticker: Option<Ticker>,
    restored: bool,
}

impl<W: Write> SessionDriver<W> {
    /// Create a driver drawing a `cols` x `rows` screen into `writer`.
    ///
    /// Switches the client to the alternate screen and hides the cursor.
    pub fn new(
        writer: W,
        (cols, rows): (u16, u16),
        events: mpsc::UnboundedReceiver<AppEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, SessionError> {
        let backend = ChannelBackend::new(writer, Size::new(cols, rows));
        let options = TerminalOptions { viewport: Viewport::Fixed(Rect::new(0, 0, cols, rows)) };
        let mut terminal = Terminal::with_options(backend, options)?;

        terminal.backend_mut().execute(EnterAlternateScreen)?;
        terminal.hide_cursor()?;

        Ok(Self { terminal, events, shutdown, ticker: None, restored: false })
    }

    /// Attach the ticker whose lifetime is bound to this driver.
    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    /// Current drawing area.
    pub fn area(&mut self) -> Rect {
        self.terminal.get_frame().area()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.terminal.show_cursor()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl<W: Write + Send> Driver for SessionDriver<W> {
    type Error = SessionError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let shutdown = &mut self.shutdown;
        let events = &mut self.events;

        let event = tokio::select! {
            biased;

            () = async {
                // Err means the server is gone, which ends the session too
                let _ = shutdown.wait_for(|stop| *stop).await;
            } => None,

            event = events.recv() => event,
        };

        if let Some(AppEvent::Resize(cols, rows)) = event {
            self.terminal.backend_mut().set_size(Size::new(cols, rows));
            self.terminal.resize(Rect::new(0, 0, cols, rows))?;
        }
        Ok(event)
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::draw(frame, app))?;
        Ok(())
    }

    fn sync(&mut self, _app: &App) -> Result<(), Self::Error> {
        // Resizing to the current area clears it and forces a full redraw.
        let area = self.area();
        self.terminal.resize(area)?;
        Ok(())
    }

    fn stop(&mut self) {
        self.ticker = None;
        if let Err(e) = self.restore() {
            tracing::debug!("failed to restore client terminal: {}", e);
        }
    }
}

impl<W: Write> Drop for SessionDriver<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
