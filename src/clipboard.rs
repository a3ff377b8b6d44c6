/// Clipboard access with an ordered chain of write strategies
use crate::error::HostError;
use crate::host::ClipboardHost;
use futures::future::LocalBoxFuture;

/// One way of putting text on the clipboard
pub trait WriteStrategy {
    fn name(&self) -> &'static str;

    fn write<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), HostError>>;
}

/// Source of clipboard text
#[allow(async_fn_in_trait)]
pub trait ReadText {
    async fn read(&self) -> Result<String, HostError>;
}

/// Try each strategy in order until one succeeds
///
/// Returns the name of the strategy that wrote the text, or a
/// `ClipboardWrite` error listing every failure when all are exhausted.
pub async fn write_with_fallback(
    strategies: &[Box<dyn WriteStrategy>],
    text: &str,
) -> Result<&'static str, HostError> {
    let mut failures = Vec::new();

    for strategy in strategies {
        match strategy.write(text).await {
            Ok(()) => return Ok(strategy.name()),
            Err(e) => {
                log::debug!("Clipboard strategy {} failed: {}", strategy.name(), e);
                failures.push(format!("{}: {}", strategy.name(), e));
            }
        }
    }

    if failures.is_empty() {
        Err(HostError::ClipboardWrite("no write strategy configured".to_string()))
    } else {
        Err(HostError::ClipboardWrite(failures.join("; ")))
    }
}

/// A clipboard made of one reader and a fallback chain of writers
pub struct ChainedClipboard<R> {
    reader: R,
    writers: Vec<Box<dyn WriteStrategy>>,
}

impl<R: ReadText> ChainedClipboard<R> {
    pub fn new(reader: R, writers: Vec<Box<dyn WriteStrategy>>) -> Self {
        ChainedClipboard { reader, writers }
    }
}

impl<R: ReadText> ClipboardHost for ChainedClipboard<R> {
    async fn read_text(&self) -> Result<String, HostError> {
        self.reader.read().await
    }

    async fn write_text(&self, text: &str) -> Result<(), HostError> {
        let used = write_with_fallback(&self.writers, text).await?;
        log::debug!("Clipboard written via {}", used);
        Ok(())
    }
}
