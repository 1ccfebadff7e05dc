//! Test doubles for the host surfaces.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::host::{ChatSurface, HostPlatform};
use crate::presentation::{ChatView, TypingFrame};

/// Records every call a session makes to its host.
#[derive(Default)]
pub(crate) struct RecordingHost {
    embedded_data: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    next_button: Mutex<Vec<bool>>,
    views: Mutex<Vec<ChatView>>,
    typing: Mutex<Vec<Option<TypingFrame>>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn with_embedded_data<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let host = Self::default();
        lock(&host.embedded_data).extend(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned())),
        );
        host
    }

    pub fn embedded(&self, key: &str) -> Option<String> {
        lock(&self.embedded_data).get(key).cloned()
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }

    pub fn next_button(&self) -> Vec<bool> {
        lock(&self.next_button).clone()
    }

    pub fn views(&self) -> Vec<ChatView> {
        lock(&self.views).clone()
    }

    pub fn last_view(&self) -> Option<ChatView> {
        lock(&self.views).last().cloned()
    }

    pub fn typing_frames(&self) -> Vec<Option<TypingFrame>> {
        lock(&self.typing).clone()
    }

    pub fn notices(&self) -> Vec<String> {
        lock(&self.notices).clone()
    }
}

impl HostPlatform for RecordingHost {
    fn embedded_data(&self, key: &str) -> Option<String> {
        self.embedded(key)
    }

    fn set_embedded_data(&self, key: &str, value: &str) {
        lock(&self.embedded_data).insert(key.to_owned(), value.to_owned());
        lock(&self.writes).push((key.to_owned(), value.to_owned()));
    }

    fn set_next_button_visible(&self, visible: bool) {
        lock(&self.next_button).push(visible);
    }
}

impl ChatSurface for RecordingHost {
    fn render(&self, view: &ChatView) {
        lock(&self.views).push(view.clone());
    }

    fn update_typing(&self, frame: Option<TypingFrame>) {
        lock(&self.typing).push(frame);
    }

    fn show_notice(&self, notice: &str) {
        lock(&self.notices).push(notice.to_owned());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
