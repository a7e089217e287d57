use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::clipboard::ClipboardWriter;
use crate::error::ServiceError;
use crate::models::{
    COPY_ALL_KEY, CategorizedHashtags, Category, FocusArea, RequestState, format_hashtags,
};
use crate::network::HashtagService;
use crate::theme::ThemeMode;

/// How long a "copied" marker stays visible.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

pub type GenerationResult = Result<CategorizedHashtags, ServiceError>;

/// Which copy action succeeded last, and until when to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    pub key: String,
    pub expires_at: Instant,
}

/// All state the screen is drawn from. Every mutation goes through a method
/// here; the main loop redraws from it after each event.
pub struct App {
    pub topic: String,
    pub request: RequestState,
    pub selection: BTreeMap<String, bool>,
    pub copy_feedback: Option<CopyFeedback>,
    pub theme: ThemeMode,
    pub focus: FocusArea,
    pub cursor: usize,
}

impl App {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            topic: String::new(),
            request: RequestState::Idle,
            selection: BTreeMap::new(),
            copy_feedback: None,
            theme,
            focus: FocusArea::Topic,
            cursor: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_loading()
    }

    pub fn hashtags(&self) -> Option<&CategorizedHashtags> {
        self.request.hashtags()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.topic.trim().is_empty()
    }

    /// Starts a generation. Returns the trimmed topic to send, or `None` when
    /// the topic is blank or a request is already running.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let topic = self.topic.trim().to_string();
        self.request = RequestState::Loading;
        self.selection.clear();
        self.cursor = 0;
        tracing::debug!(topic = %topic, "generation started");
        Some(topic)
    }

    pub fn finish_generation(&mut self, result: GenerationResult) {
        if !self.is_loading() {
            tracing::warn!("generation result arrived while not loading, ignoring");
            return;
        }
        match result {
            Ok(hashtags) => {
                self.selection = hashtags.names().map(|n| (n.to_string(), true)).collect();
                self.cursor = 0;
                self.request = RequestState::Success(hashtags);
                if !self.visible_categories().is_empty() {
                    self.focus = FocusArea::Results;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, format_error = e.is_format_error(), "generation failed");
                self.request = RequestState::Failed(e.user_message());
                self.focus = FocusArea::Topic;
            }
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.get(name).copied().unwrap_or(false)
    }

    /// Flips one category. Unknown names are ignored.
    pub fn toggle_category(&mut self, name: &str) {
        if let Some(selected) = self.selection.get_mut(name) {
            *selected = !*selected;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Tags of the selected categories, categories in alphabetical order.
    pub fn selected_hashtags(&self) -> Vec<&String> {
        self.hashtags()
            .map(|h| {
                h.categories()
                    .iter()
                    .filter(|c| self.is_selected(&c.name))
                    .flat_map(|c| c.tags.iter())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Categories that have at least one tag; these are the ones listed.
    pub fn visible_categories(&self) -> Vec<&Category> {
        self.hashtags()
            .map(|h| h.categories().iter().filter(|c| !c.tags.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.visible_categories().get(self.cursor).copied()
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        let count = self.visible_categories().len();
        if self.cursor + 1 < count {
            self.cursor += 1;
        }
    }

    pub fn toggle_current(&mut self) {
        if let Some(name) = self.current_category().map(|c| c.name.clone()) {
            self.toggle_category(&name);
        }
    }

    pub fn copy_all(&mut self, clipboard: &mut dyn ClipboardWriter, now: Instant) -> bool {
        let text = format_hashtags(self.selected_hashtags());
        self.copy(&text, COPY_ALL_KEY, clipboard, now)
    }

    /// Copies one category's full list, whether or not it is selected.
    pub fn copy_category(
        &mut self,
        name: &str,
        clipboard: &mut dyn ClipboardWriter,
        now: Instant,
    ) -> bool {
        let text = match self.hashtags().and_then(|h| h.get(name)) {
            Some(tags) => format_hashtags(tags),
            None => return false,
        };
        self.copy(&text, name, clipboard, now)
    }

    pub fn copy_current(&mut self, clipboard: &mut dyn ClipboardWriter, now: Instant) -> bool {
        match self.current_category().map(|c| c.name.clone()) {
            Some(name) => self.copy_category(&name, clipboard, now),
            None => false,
        }
    }

    fn copy(
        &mut self,
        text: &str,
        key: &str,
        clipboard: &mut dyn ClipboardWriter,
        now: Instant,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        if let Err(e) = clipboard.write_text(text) {
            tracing::debug!(error = %e, key = %key, "clipboard write failed");
            return false;
        }
        self.copy_feedback = Some(CopyFeedback {
            key: key.to_string(),
            expires_at: now + COPY_FEEDBACK_DURATION,
        });
        true
    }

    pub fn copied_key(&self) -> Option<&str> {
        self.copy_feedback.as_ref().map(|f| f.key.as_str())
    }

    /// Clears copy feedback whose time is up.
    pub fn tick(&mut self, now: Instant) {
        if self
            .copy_feedback
            .as_ref()
            .is_some_and(|f| now >= f.expires_at)
        {
            self.copy_feedback = None;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if !self.is_loading() {
            self.topic.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_loading() {
            self.topic.pop();
        }
    }

    pub fn clear_topic(&mut self) {
        if !self.is_loading() {
            self.topic.clear();
        }
    }
}

/// Runs one generation on the runtime and sends the outcome to the UI loop.
pub fn spawn_generation(
    handle: &Handle,
    service: Arc<dyn HashtagService>,
    topic: String,
    tx: UnboundedSender<GenerationResult>,
) {
    handle.spawn(async move {
        let result = service.generate(&topic).await;
        if tx.send(result).is_err() {
            tracing::debug!("UI loop gone, dropping generation result");
        }
    });
}
