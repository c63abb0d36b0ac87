use crate::core::stream::ThreadSafeAsyncStream;
use crate::domain::model::StreamSummary;
use crate::domain::ports::PrimeSink;
use crate::utils::error::Result;
use std::future::Future;
use std::io::Write;

pub const MESSAGE_PREFIX: &str = "Received prime from secondary thread: ";

/// Prints one line per delivered prime.
pub struct ConsoleSink<W: Write> {
    out: W,
    lines: u32,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn lines_written(&self) -> u32 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PrimeSink for ConsoleSink<W> {
    fn deliver(&mut self, prime: u32) -> Result<()> {
        writeln!(self.out, "{}{}", MESSAGE_PREFIX, prime)?;
        self.lines += 1;
        Ok(())
    }
}

/// Hands the stream a printing callback and waits until it drains.
pub async fn run_driver<W: Write>(stream: &ThreadSafeAsyncStream, out: W) -> Result<StreamSummary> {
    run_driver_until(stream, out, std::future::pending::<()>()).await
}

pub async fn run_driver_until<W, F>(
    stream: &ThreadSafeAsyncStream,
    out: W,
    shutdown: F,
) -> Result<StreamSummary>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut sink = ConsoleSink::new(out);
    let summary = stream.run_with_shutdown(&mut sink, shutdown).await?;
    sink.out.flush()?;

    tracing::debug!("Driver printed {} lines", sink.lines_written());
    Ok(summary)
}
