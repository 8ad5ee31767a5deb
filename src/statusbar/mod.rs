// The statusbar owns the single shared input/message line at the bottom of
// the screen, plus the progress display above it. Both are exclusive
// resources: one holder at a time, enforced by lock/unlock discipline.

use std::time::{Duration, Instant};
use tracing::debug;

/// What happens to the in-progress text after every keystroke of a prompt.
/// `Plain` is the no-op default and is restored whenever a prompt ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptHook {
    Plain,
    /// Re-run the active screen's search with the partial query.
    Search { backward: bool },
    /// Re-apply the partial text as the active screen's filter.
    Filter,
}

pub struct Statusbar {
    locked: bool,
    hook: PromptHook,
    prompt: String,
    input: String,
    message: Option<(String, Instant)>,
    message_ttl: Duration,
}

impl Statusbar {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            locked: false,
            hook: PromptHook::Plain,
            prompt: String::new(),
            input: String::new(),
            message: None,
            message_ttl,
        }
    }

    /// Show a transient status message. Ignored while a prompt holds the
    /// line, matching how the line is shared everywhere else.
    pub fn msg(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!("status: {}", text);
        if !self.locked {
            self.message = Some((text, Instant::now()));
        }
    }

    /// Drop the current message once it has outlived its display time.
    pub fn expire(&mut self) {
        if let Some((_, shown_at)) = self.message {
            if shown_at.elapsed() >= self.message_ttl {
                self.message = None;
            }
        }
    }

    /// Claim the input line for a prompt. Calling this while the line is
    /// already claimed is a bug in the caller, not a runtime condition.
    /// Returns the hook that was installed before, for `unlock`.
    pub fn lock(&mut self, hook: PromptHook) -> PromptHook {
        assert!(!self.locked, "statusbar prompt is already locked");
        self.locked = true;
        self.message = None;
        std::mem::replace(&mut self.hook, hook)
    }

    /// Release the input line and restore the previous hook. Must be paired
    /// with exactly one `lock` on every exit path of the holder.
    pub fn unlock(&mut self, previous: PromptHook) {
        assert!(self.locked, "statusbar prompt is not locked");
        self.locked = false;
        self.hook = previous;
        self.prompt.clear();
        self.input.clear();
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn hook(&self) -> PromptHook {
        self.hook
    }

    pub fn begin_input(&mut self, prompt: &str, initial: &str) {
        self.prompt = prompt.to_string();
        self.input = initial.to_string();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// The text the display layer should put on the line right now.
    pub fn line(&self) -> String {
        if self.locked {
            format!("{}{}", self.prompt, self.input)
        } else {
            match &self.message {
                Some((text, shown_at)) if shown_at.elapsed() < self.message_ttl => {
                    text.clone()
                }
                _ => String::new(),
            }
        }
    }
}

/// The progress display used by the scrub loop. Locking it replaces the
/// player-driven elapsed/total readout with loop-driven values.
pub struct Progress {
    locked: bool,
    scrub: Option<(u64, u64)>,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            locked: false,
            scrub: None,
        }
    }

    pub fn lock(&mut self) {
        assert!(!self.locked, "progress display is already locked");
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        assert!(self.locked, "progress display is not locked");
        self.locked = false;
        self.scrub = None;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Position/total (seconds) to display while scrubbing.
    pub fn set_scrub(&mut self, position: u64, total: u64) {
        self.scrub = Some((position, total));
    }

    pub fn scrub(&self) -> Option<(u64, u64)> {
        self.scrub
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statusbar() -> Statusbar {
        Statusbar::new(Duration::from_secs(5))
    }

    #[test]
    fn test_lock_restores_previous_hook() {
        let mut bar = statusbar();
        assert_eq!(bar.hook(), PromptHook::Plain);

        let prev = bar.lock(PromptHook::Filter);
        assert_eq!(prev, PromptHook::Plain);
        assert_eq!(bar.hook(), PromptHook::Filter);

        bar.unlock(prev);
        assert_eq!(bar.hook(), PromptHook::Plain);
        assert!(!bar.is_locked());
    }

    #[test]
    #[should_panic(expected = "already locked")]
    fn test_double_lock_panics() {
        let mut bar = statusbar();
        let _prev = bar.lock(PromptHook::Plain);
        bar.lock(PromptHook::Plain);
    }

    #[test]
    fn test_messages_are_suppressed_while_locked() {
        let mut bar = statusbar();
        let prev = bar.lock(PromptHook::Plain);
        bar.begin_input("Find: ", "");
        bar.push_input('a');
        bar.msg("should not appear");
        assert_eq!(bar.line(), "Find: a");

        bar.unlock(prev);
        assert_eq!(bar.line(), "");
        bar.msg("now it does");
        assert_eq!(bar.line(), "now it does");
    }

    #[test]
    fn test_message_expiry() {
        let mut bar = Statusbar::new(Duration::ZERO);
        bar.msg("gone in a flash");
        bar.expire();
        assert_eq!(bar.line(), "");
    }

    #[test]
    fn test_input_editing() {
        let mut bar = statusbar();
        let prev = bar.lock(PromptHook::Plain);
        bar.begin_input("vol: ", "5");
        bar.push_input('0');
        assert_eq!(bar.input(), "50");
        bar.pop_input();
        bar.pop_input();
        bar.pop_input(); // popping empty input is fine
        assert_eq!(bar.input(), "");
        bar.unlock(prev);
    }

    #[test]
    #[should_panic(expected = "already locked")]
    fn test_progress_double_lock_panics() {
        let mut progress = Progress::new();
        progress.lock();
        progress.lock();
    }

    #[test]
    fn test_progress_scrub_cleared_on_unlock() {
        let mut progress = Progress::new();
        progress.lock();
        progress.set_scrub(35, 120);
        assert_eq!(progress.scrub(), Some((35, 120)));
        progress.unlock();
        assert_eq!(progress.scrub(), None);
    }
}
