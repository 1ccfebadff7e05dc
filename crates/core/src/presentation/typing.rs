use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::{Instant, interval_at, sleep};

use super::TimerSet;
use crate::config::TypingAnimation;
use crate::host::ChatSurface;

/// One state of the "partner is typing" line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypingFrame {
    /// Length of the ellipsis, `0..=3`.
    pub dots: u8,
    /// Whether the line is currently shown.
    pub visible: bool,
}

impl TypingFrame {
    /// Returns the text of the line, e.g. `typing..`.
    #[inline]
    pub fn text(&self) -> String {
        format!("typing{}", ".".repeat(self.dots as usize))
    }
}

struct Shared {
    frame: TypingFrame,
    torn_down: bool,
}

/// A running typing indicator.
///
/// The indicator is drawn hidden, appears after a short delay, then cycles
/// its ellipsis on a fast tick and blinks on a slower, independent cycle.
/// Dropping it cancels every timer and removes the line from the surface.
pub struct TypingIndicator {
    timers: TimerSet,
    shared: Arc<Mutex<Shared>>,
    surface: Arc<dyn ChatSurface>,
}

impl TypingIndicator {
    /// Draws the indicator and starts its timers on the current runtime.
    pub fn start(
        surface: Arc<dyn ChatSurface>,
        animation: TypingAnimation,
    ) -> Self {
        let initial = TypingFrame {
            dots: 3,
            visible: false,
        };
        let shared = Arc::new(Mutex::new(Shared {
            frame: initial,
            torn_down: false,
        }));
        surface.update_typing(Some(initial));

        let mut timers = TimerSet::new();
        timers.spawn({
            let shared = Arc::clone(&shared);
            let surface = Arc::clone(&surface);
            async move {
                sleep(animation.appear_after).await;
                let mut ticker = interval_at(
                    Instant::now() + animation.dots_tick,
                    animation.dots_tick,
                );
                let mut dots = 0;
                loop {
                    ticker.tick().await;
                    dots = (dots + 1) % 4;
                    update(&shared, &*surface, |frame| frame.dots = dots);
                }
            }
        });
        timers.spawn({
            let shared = Arc::clone(&shared);
            let surface = Arc::clone(&surface);
            async move {
                sleep(animation.appear_after).await;
                loop {
                    update(&shared, &*surface, |frame| frame.visible = true);
                    sleep(animation.visible_for).await;
                    update(&shared, &*surface, |frame| frame.visible = false);
                    sleep(animation.hidden_for).await;
                }
            }
        });

        Self {
            timers,
            shared,
            surface,
        }
    }

    /// Returns the frame currently drawn.
    #[inline]
    pub fn frame(&self) -> TypingFrame {
        lock(&self.shared).frame
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.timers.cancel_all();
        // Hold the lock while removing, so a tick that is already running
        // cannot draw the line again afterwards.
        let mut shared = lock(&self.shared);
        shared.torn_down = true;
        self.surface.update_typing(None);
    }
}

fn update(
    shared: &Mutex<Shared>,
    surface: &dyn ChatSurface,
    f: impl FnOnce(&mut TypingFrame),
) {
    let mut shared = lock(shared);
    if shared.torn_down {
        return;
    }
    f(&mut shared.frame);
    surface.update_typing(Some(shared.frame));
}

#[inline]
fn lock(mutex: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
