use anyhow::Result;
use arboard::Clipboard;

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard. The handle is opened lazily and kept, since some
/// platforms drop the contents when the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new()?);
        }
        match self.inner.as_mut() {
            Some(cb) => Ok(cb.set_text(text.to_owned())?),
            None => Err(anyhow::anyhow!("clipboard unavailable")),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Records writes; fails every write when `fail` is set.
    #[derive(Default)]
    pub struct MockClipboard {
        pub writes: Vec<String>,
        pub fail: bool,
    }

    impl ClipboardWriter for MockClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard in tests");
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }
}
