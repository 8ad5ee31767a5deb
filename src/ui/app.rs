use super::input::{KeySource, TerminalKeys};
use super::TerminalManager;
use crate::actions::{ActionTag, Registry};
use crate::bindings::{BindingTable, Key, Resolution};
use crate::config::{Config, PlaybackConfig};
use crate::player::{format_time, Player, PlayerState};
use crate::screens::{Screen, ScreenComposition, ScreenKind, Screens};
use crate::statusbar::{Progress, PromptHook, Statusbar};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Gauge, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// How long the main loop waits for a key before treating the pass as an
/// idle tick (message expiry, elapsed-time refresh).
const IDLE_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Key read timeout inside the scrub loop.
const SCRUB_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Seek step size in seconds. With incremental seeking the step grows with
/// the wall-clock time the scrub loop has been open.
pub(crate) fn seek_step(elapsed_wall_secs: u64, playback: &PlaybackConfig) -> u64 {
    if playback.incremental_seeking {
        elapsed_wall_secs / 2 + playback.seek_time
    } else {
        playback.seek_time
    }
}

pub struct App {
    pub(crate) config: Config,
    pub(crate) player: Box<dyn Player>,
    pub(crate) screens: Screens,
    pub(crate) composition: ScreenComposition,
    pub(crate) statusbar: Statusbar,
    pub(crate) progress: Progress,
    pub(crate) bindings: BindingTable,
    pub(crate) keys: Box<dyn KeySource>,
    pub(crate) input_timeout: Duration,
    pub should_quit: bool,
    terminal: Option<TerminalManager>,
}

impl App {
    pub fn new(config: Config, player: Box<dyn Player>) -> Result<Self> {
        let terminal = TerminalManager::new()?;
        Self::build(config, player, Box::new(TerminalKeys), Some(terminal))
    }

    /// An app without a terminal attached. Rendering becomes a no-op;
    /// everything else behaves identically. Used by tests.
    pub fn headless(
        config: Config,
        player: Box<dyn Player>,
        keys: Box<dyn KeySource>,
    ) -> Result<Self> {
        Self::build(config, player, keys, None)
    }

    fn build(
        config: Config,
        player: Box<dyn Player>,
        keys: Box<dyn KeySource>,
        terminal: Option<TerminalManager>,
    ) -> Result<Self> {
        let bindings = BindingTable::from_config(&config.bindings)?;
        let screens = Screens::new(player.queue(), player.library(), &bindings);
        let statusbar = Statusbar::new(Duration::from_millis(config.ui.status_message_ttl_ms));
        Ok(Self {
            config,
            player,
            screens,
            composition: ScreenComposition::new(ScreenKind::Playlist),
            statusbar,
            progress: Progress::new(),
            bindings,
            keys,
            input_timeout: IDLE_READ_TIMEOUT,
            should_quit: false,
            terminal,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        info!("entering main loop");
        while !self.should_quit {
            self.tick();
            self.refresh_display()?;
            let timeout = self.input_timeout;
            if let Some(key) = self.keys.read_key(timeout)? {
                self.dispatch(key)?;
            }
        }
        info!("main loop finished");
        Ok(())
    }

    fn tick(&mut self) {
        self.statusbar.expire();
    }

    // ---- dispatch ----

    /// Resolve a key (reading more keys while it prefixes a chain) and run
    /// the bound actions. Unbound keys change nothing at all.
    pub fn dispatch(&mut self, first: Key) -> Result<()> {
        if first == Key::Resize {
            self.handle_resize();
            return Ok(());
        }
        let mut pressed = vec![first];
        loop {
            let tags = match self.bindings.resolve(&pressed) {
                Resolution::Matched(binding) => binding.actions().to_vec(),
                Resolution::Prefix => {
                    let timeout = self.input_timeout;
                    match self.keys.read_key(timeout)? {
                        Some(Key::Resize) => self.handle_resize(),
                        Some(key) => pressed.push(key),
                        // chain abandoned, silently
                        None => return Ok(()),
                    }
                    continue;
                }
                Resolution::Unbound => {
                    trace!("no binding for {:?}", pressed);
                    return Ok(());
                }
            };
            self.execute_binding(&tags);
            return Ok(());
        }
    }

    /// Run a binding's actions in order. The first failing precondition
    /// aborts the remainder of the chain; actions already run stay run.
    pub(crate) fn execute_binding(&mut self, tags: &[ActionTag]) {
        for &tag in tags {
            let action = Registry::global().get(tag);
            if !action.can_run(self) {
                debug!("precondition failed for {}", action.name());
                self.statusbar
                    .msg(format!("Cannot execute \"{}\"", action.name()));
                break;
            }
            if let Err(e) = action.run(self) {
                warn!("action {} failed: {:#}", action.name(), e);
                self.statusbar.msg(format!("Error: {:#}", e));
                break;
            }
        }
    }

    // ---- screens ----

    pub(crate) fn active_screen_mut(&mut self) -> &mut dyn Screen {
        self.screens.get_mut(self.composition.active())
    }

    pub(crate) fn active_supports_search(&self) -> bool {
        // keep in sync with the capability accessors; checked by a test
        matches!(
            self.composition.active(),
            ScreenKind::Playlist | ScreenKind::Browser | ScreenKind::Library | ScreenKind::Help
        )
    }

    pub(crate) fn active_supports_filter(&self) -> bool {
        matches!(
            self.composition.active(),
            ScreenKind::Playlist | ScreenKind::Browser
        )
    }

    pub(crate) fn active_supports_song_list(&self) -> bool {
        matches!(
            self.composition.active(),
            ScreenKind::Playlist | ScreenKind::Library
        )
    }

    pub(crate) fn switch_screen(&mut self, kind: ScreenKind) -> Result<()> {
        if self.composition.active() == kind {
            return Ok(());
        }
        match self.composition.switch_to(kind) {
            Ok(()) => {
                debug!("switched to {:?}", kind);
                self.active_screen_mut().on_switch();
            }
            Err(e) => self.statusbar.msg(e.to_string()),
        }
        Ok(())
    }

    /// The screen the lock command pairs with the current one: the screen
    /// we came from when possible, otherwise the first other mergeable one.
    pub(crate) fn lock_slave_candidate(&self) -> Option<ScreenKind> {
        let master = self.composition.active();
        let previous = self.composition.previous();
        if previous != master && previous.mergeable() {
            return Some(previous);
        }
        ScreenKind::ORDER
            .iter()
            .copied()
            .find(|&k| k != master && k.mergeable())
    }

    fn handle_resize(&mut self) {
        debug!("terminal resized");
    }

    // ---- modal scrub loop ----

    /// The interactive seek loop. Owns the statusbar and the progress
    /// display while it runs; exits on the first key that is not a
    /// single-action seek binding and then issues exactly one seek.
    pub(crate) fn seek_interactively(&mut self) -> Result<()> {
        let Some(total) = self
            .player
            .duration()
            .map(|d| d.as_secs())
            .filter(|&t| t > 0)
        else {
            self.statusbar.msg("Unknown item length");
            return Ok(());
        };
        debug!("entering scrub loop");

        self.progress.lock();
        let prev_hook = self.statusbar.lock(PromptHook::Plain);
        self.statusbar.begin_input("Seeking", "");
        let old_timeout = self.input_timeout;
        self.input_timeout = SCRUB_READ_TIMEOUT;

        let start = self.player.elapsed().as_secs().min(total);
        let result = self.scrub_loop(start, total);

        // released on every exit path, including key-source failures
        self.input_timeout = old_timeout;
        self.statusbar.unlock(prev_hook);
        self.progress.unlock();

        let final_pos = result?;
        debug!("scrub finished at {}s", final_pos);
        self.player.seek(Duration::from_secs(final_pos))?;
        Ok(())
    }

    fn scrub_loop(&mut self, mut pos: u64, total: u64) -> Result<u64> {
        let started = Instant::now();
        loop {
            self.progress.set_scrub(pos, total);
            self.refresh_display()?;

            let timeout = self.input_timeout;
            let Some(key) = self.keys.read_key(timeout)? else {
                // timeout with no key: keep looping, nothing changes
                continue;
            };
            if key == Key::Resize {
                continue;
            }

            let step = seek_step(started.elapsed().as_secs(), &self.config.playback);
            let (single, first) = match self.bindings.resolve(&[key]) {
                Resolution::Matched(binding) => {
                    (binding.is_single(), binding.actions().first().copied())
                }
                _ => break,
            };
            if !single {
                break;
            }
            match first {
                Some(ActionTag::SeekForward) => {
                    if pos < total {
                        pos = (pos + step).min(total);
                    }
                }
                Some(ActionTag::SeekBackward) => {
                    pos = pos.saturating_sub(step);
                }
                _ => break,
            }
        }
        // The key that ended the loop is consumed here and never reaches the
        // dispatcher. TODO: revisit whether it should be re-dispatched.
        Ok(pos)
    }

    // ---- prompts ----

    /// Read a line on the statusbar. The hook runs after every keystroke;
    /// whatever hook was installed before is restored when the prompt ends,
    /// however it ends. Returns `None` when cancelled with Esc.
    pub(crate) fn read_line(
        &mut self,
        prompt: &str,
        initial: &str,
        hook: PromptHook,
    ) -> Result<Option<String>> {
        let prev = self.statusbar.lock(hook);
        self.statusbar.begin_input(prompt, initial);
        let result = self.read_line_inner();
        self.statusbar.unlock(prev);
        result
    }

    fn read_line_inner(&mut self) -> Result<Option<String>> {
        loop {
            self.refresh_display()?;
            let timeout = self.input_timeout;
            let Some(key) = self.keys.read_key(timeout)? else {
                continue;
            };
            match key {
                Key::Enter => return Ok(Some(self.statusbar.take_input())),
                Key::Esc => return Ok(None),
                Key::Backspace => {
                    self.statusbar.pop_input();
                    self.run_prompt_hook();
                }
                Key::Char(c) => {
                    self.statusbar.push_input(c);
                    self.run_prompt_hook();
                }
                Key::Resize => self.handle_resize(),
                _ => {}
            }
        }
    }

    fn run_prompt_hook(&mut self) {
        let text = self.statusbar.input().to_string();
        match self.statusbar.hook() {
            PromptHook::Plain => {}
            PromptHook::Search { .. } => {
                if let Some(s) = self.active_screen_mut().searchable() {
                    s.search(&text);
                }
            }
            PromptHook::Filter => {
                if let Some(f) = self.active_screen_mut().filterable() {
                    f.apply_filter(&text);
                }
            }
        }
    }

    /// Prompt for a number. Malformed input is treated as zero; callers
    /// clamp to their own bounds. `None` only on cancel.
    pub(crate) fn prompt_number(&mut self, prompt: &str, initial: &str) -> Result<Option<i64>> {
        let Some(text) = self.read_line(prompt, initial, PromptHook::Plain)? else {
            return Ok(None);
        };
        Ok(Some(text.trim().parse::<i64>().unwrap_or(0)))
    }

    /// The incremental find prompt shared by the forward/backward commands.
    pub(crate) fn find_item(&mut self, backward: bool) -> Result<()> {
        let direction = if backward { "backward" } else { "forward" };
        let prompt = format!("Find {}: ", direction);
        let Some(query) = self.read_line(&prompt, "", PromptHook::Search { backward })? else {
            return Ok(());
        };
        if query.is_empty() {
            // confirming an empty query clears the recorded matches
            if let Some(s) = self.active_screen_mut().searchable() {
                s.search("");
            }
            return Ok(());
        }
        let wrap = self.config.ui.wrapped_search;
        let found = match self.active_screen_mut().searchable() {
            Some(s) => {
                let found = s.search(&query);
                if found {
                    if backward {
                        s.prev_found(wrap);
                    } else {
                        s.next_found(wrap);
                    }
                }
                found
            }
            None => return Ok(()),
        };
        if found {
            self.statusbar.msg("Searching finished");
        } else {
            self.statusbar.msg(format!("Unable to find \"{}\"", query));
        }
        Ok(())
    }

    // ---- rendering ----

    fn refresh_display(&mut self) -> Result<()> {
        self.screens.playlist.now_playing = self.player.current_index();
        let Self {
            terminal,
            screens,
            composition,
            statusbar,
            progress,
            player,
            config,
            ..
        } = self;
        let Some(terminal) = terminal.as_mut() else {
            return Ok(());
        };
        terminal.draw(|frame| {
            draw_ui(
                frame,
                screens,
                *composition,
                statusbar,
                progress,
                player.as_ref(),
                config,
            )
        })
    }
}

fn draw_ui(
    frame: &mut Frame,
    screens: &mut Screens,
    composition: ScreenComposition,
    statusbar: &Statusbar,
    progress: &Progress,
    player: &dyn Player,
    config: &Config,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // active screen(s)
            Constraint::Length(1), // progress
            Constraint::Length(1), // statusbar
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], composition, player);
    draw_main(frame, chunks[1], screens, composition, config);
    draw_progress(frame, chunks[2], progress, player);
    draw_statusline(frame, chunks[3], statusbar, player);
}

fn draw_header(frame: &mut Frame, area: Rect, composition: ScreenComposition, player: &dyn Player) {
    let mut flags = String::new();
    if player.repeat() {
        flags.push('r');
    }
    if player.random() {
        flags.push('z');
    }
    if player.crossfade() > 0 {
        flags.push('x');
    }
    let lock_marker = if composition.is_locked() { " [locked]" } else { "" };
    let header = format!(
        "syrinx :: {}{}  |  vol {}%  [{}]",
        composition.active().title(),
        lock_marker,
        player.volume(),
        flags
    );
    let widget = Paragraph::new(header)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(widget, area);
}

fn draw_main(
    frame: &mut Frame,
    area: Rect,
    screens: &mut Screens,
    composition: ScreenComposition,
    config: &Config,
) {
    match composition.locked_pair() {
        Some((master, slave)) => {
            let part = config.ui.locked_screen_width_part.clamp(20, 80) as u16;
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(part),
                    Constraint::Percentage(100 - part),
                ])
                .split(area);
            let active = composition.active();
            screens.get_mut(master).render(frame, halves[0], active == master);
            screens.get_mut(slave).render(frame, halves[1], active == slave);
        }
        None => {
            screens
                .get_mut(composition.active())
                .render(frame, area, true);
        }
    }
}

fn draw_progress(frame: &mut Frame, area: Rect, progress: &Progress, player: &dyn Player) {
    // while the scrub loop holds the lock it drives the readout
    let display = progress.scrub().or_else(|| {
        player
            .duration()
            .filter(|d| d.as_secs() > 0)
            .map(|d| (player.elapsed().as_secs().min(d.as_secs()), d.as_secs()))
    });
    match display {
        Some((pos, total)) => {
            let label = format!(
                "[{}/{}]",
                format_time(Duration::from_secs(pos)),
                format_time(Duration::from_secs(total))
            );
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Green))
                .ratio((pos as f64 / total as f64).clamp(0.0, 1.0))
                .label(label);
            frame.render_widget(gauge, area);
        }
        None => {
            frame.render_widget(Paragraph::new(""), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Binding;
    use crate::player::{LocalPlayer, Song};
    use crate::screens::{Filterable, ScrollDir, SongList};
    use crate::ui::input::ScriptedKeys;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Deterministic player double: fixed elapsed time, recorded seeks.
    struct TestPlayer {
        state: PlayerState,
        position: Duration,
        duration: Option<Duration>,
        volume: u8,
        repeat: bool,
        random: bool,
        crossfade: u32,
        queue: Vec<Song>,
        current: Option<usize>,
        seeks: Rc<RefCell<Vec<u64>>>,
    }

    impl TestPlayer {
        fn playing(position: u64, duration: u64) -> (Self, Rc<RefCell<Vec<u64>>>) {
            let seeks = Rc::new(RefCell::new(Vec::new()));
            let queue = vec![Song::new("test/track.flac")
                .with_tags("Title", "Artist", "Album")
                .with_duration(Duration::from_secs(duration))];
            (
                Self {
                    state: PlayerState::Playing,
                    position: Duration::from_secs(position),
                    duration: Some(Duration::from_secs(duration)),
                    volume: 50,
                    repeat: false,
                    random: false,
                    crossfade: 0,
                    queue,
                    current: Some(0),
                    seeks: Rc::clone(&seeks),
                },
                seeks,
            )
        }
    }

    impl Player for TestPlayer {
        fn state(&self) -> PlayerState {
            self.state
        }
        fn elapsed(&self) -> Duration {
            self.position
        }
        fn duration(&self) -> Option<Duration> {
            self.duration
        }
        fn seek(&mut self, position: Duration) -> Result<()> {
            self.seeks.borrow_mut().push(position.as_secs());
            self.position = position;
            Ok(())
        }
        fn toggle_pause(&mut self) -> Result<()> {
            self.state = match self.state {
                PlayerState::Playing => PlayerState::Paused,
                _ => PlayerState::Playing,
            };
            Ok(())
        }
        fn stop(&mut self) -> Result<()> {
            self.state = PlayerState::Stopped;
            Ok(())
        }
        fn next(&mut self) -> Result<()> {
            Ok(())
        }
        fn previous(&mut self) -> Result<()> {
            Ok(())
        }
        fn volume(&self) -> u8 {
            self.volume
        }
        fn set_volume(&mut self, volume: u8) -> Result<()> {
            self.volume = volume.min(100);
            Ok(())
        }
        fn repeat(&self) -> bool {
            self.repeat
        }
        fn set_repeat(&mut self, on: bool) -> Result<()> {
            self.repeat = on;
            Ok(())
        }
        fn random(&self) -> bool {
            self.random
        }
        fn set_random(&mut self, on: bool) -> Result<()> {
            self.random = on;
            Ok(())
        }
        fn crossfade(&self) -> u32 {
            self.crossfade
        }
        fn set_crossfade(&mut self, seconds: u32) -> Result<()> {
            self.crossfade = seconds;
            Ok(())
        }
        fn queue(&self) -> &[Song] {
            &self.queue
        }
        fn current_index(&self) -> Option<usize> {
            self.current
        }
        fn play_index(&mut self, index: usize) -> Result<()> {
            self.current = Some(index);
            self.state = PlayerState::Playing;
            Ok(())
        }
        fn library(&self) -> &[Song] {
            &self.queue
        }
    }

    fn app_with(player: Box<dyn Player>, keys: ScriptedKeys) -> App {
        App::headless(Config::default(), player, Box::new(keys)).unwrap()
    }

    fn demo_app(keys: ScriptedKeys) -> App {
        app_with(Box::new(LocalPlayer::demo()), keys)
    }

    fn no_keys() -> ScriptedKeys {
        ScriptedKeys::new([])
    }

    // ---- dispatch ----

    #[test]
    fn test_unbound_key_is_a_silent_noop() {
        let mut app = demo_app(no_keys());
        let active = app.composition.active();
        let volume = app.player.volume();
        app.dispatch(Key::Char('~')).unwrap();
        assert_eq!(app.composition.active(), active);
        assert_eq!(app.player.volume(), volume);
        assert_eq!(app.statusbar.line(), "");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_key() {
        let mut app = demo_app(no_keys());
        app.dispatch(Key::Char('q')).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_chain_binding_reads_the_second_key() {
        let mut app = demo_app(ScriptedKeys::new([Some(Key::Char('g'))]));
        app.active_screen_mut().scroll(ScrollDir::End);
        assert_ne!(SongList::choice(&app.screens.playlist), 0);
        // "g g" is bound to move_home
        app.dispatch(Key::Char('g')).unwrap();
        assert_eq!(SongList::choice(&app.screens.playlist), 0);
    }

    #[test]
    fn test_chain_abandoned_on_timeout() {
        let mut app = demo_app(ScriptedKeys::new([None]));
        app.active_screen_mut().scroll(ScrollDir::End);
        let before = SongList::choice(&app.screens.playlist);
        app.dispatch(Key::Char('g')).unwrap();
        assert_eq!(SongList::choice(&app.screens.playlist), before);
    }

    #[test]
    fn test_failed_precondition_aborts_the_chain() {
        let mut app = demo_app(no_keys());
        // master_screen can't run while unlocked, so quit must never fire
        app.bindings = BindingTable::new(vec![Binding::new(
            vec![Key::Char('!')],
            vec![ActionTag::MasterScreen, ActionTag::Quit],
        )]);
        app.dispatch(Key::Char('!')).unwrap();
        assert!(!app.should_quit);
        assert!(app.statusbar.line().contains("Cannot execute"));
    }

    // ---- scrub loop ----

    #[test]
    fn test_seek_step_formula() {
        let mut playback = Config::default().playback;
        playback.seek_time = 5;
        playback.incremental_seeking = false;
        assert_eq!(seek_step(0, &playback), 5);
        assert_eq!(seek_step(100, &playback), 5);

        playback.incremental_seeking = true;
        assert_eq!(seek_step(10, &playback), 10);
        assert_eq!(seek_step(0, &playback), 5);
    }

    #[test]
    fn test_scrub_loop_end_to_end() {
        let (player, seeks) = TestPlayer::playing(30, 120);
        let keys = ScriptedKeys::new([Some(Key::Char('f')), Some(Key::Char('q'))]);
        let mut app = app_with(Box::new(player), keys);
        app.config.playback.incremental_seeking = false;
        let old_timeout = app.input_timeout;

        app.execute_binding(&[ActionTag::SeekForward]);

        // one forward step of 5, then 'q' ends the loop: one seek, to 35
        assert_eq!(seeks.borrow().as_slice(), &[35]);
        // the terminating key is consumed, not dispatched - quit never ran
        assert!(!app.should_quit);
        assert!(!app.statusbar.is_locked());
        assert!(!app.progress.is_locked());
        assert_eq!(app.input_timeout, old_timeout);
    }

    #[test]
    fn test_scrub_timeout_keeps_looping() {
        let (player, seeks) = TestPlayer::playing(30, 120);
        let keys = ScriptedKeys::new([
            None, // timeout: no state change
            Some(Key::Char('f')),
            Some(Key::Char('b')),
            Some(Key::Char('b')),
            Some(Key::Char('q')),
        ]);
        let mut app = app_with(Box::new(player), keys);
        app.config.playback.incremental_seeking = false;

        app.execute_binding(&[ActionTag::SeekForward]);
        assert_eq!(seeks.borrow().as_slice(), &[25]);
    }

    #[test]
    fn test_scrub_clamps_to_song_bounds() {
        let (player, seeks) = TestPlayer::playing(118, 120);
        let keys = ScriptedKeys::new([
            Some(Key::Char('f')),
            Some(Key::Char('f')),
            Some(Key::Char('q')),
        ]);
        let mut app = app_with(Box::new(player), keys);
        app.config.playback.incremental_seeking = false;
        app.execute_binding(&[ActionTag::SeekForward]);
        assert_eq!(seeks.borrow().as_slice(), &[120]);

        let (player, seeks) = TestPlayer::playing(3, 120);
        let keys = ScriptedKeys::new([Some(Key::Char('b')), Some(Key::Char('q'))]);
        let mut app = app_with(Box::new(player), keys);
        app.config.playback.incremental_seeking = false;
        app.execute_binding(&[ActionTag::SeekBackward]);
        assert_eq!(seeks.borrow().as_slice(), &[0]);
    }

    #[test]
    fn test_scrub_refused_without_known_length() {
        let (mut player, seeks) = TestPlayer::playing(30, 120);
        player.duration = None;
        let mut app = app_with(Box::new(player), no_keys());

        app.seek_interactively().unwrap();
        assert!(seeks.borrow().is_empty());
        assert_eq!(app.statusbar.line(), "Unknown item length");
        assert!(!app.statusbar.is_locked());
        assert!(!app.progress.is_locked());
    }

    // ---- prompts ----

    #[test]
    fn test_set_volume_prompt_clamps() {
        for (input, expected) in [("150", 100), ("-5", 0), ("notanumber", 0)] {
            let mut app = demo_app(ScriptedKeys::typed(input, Key::Enter));
            app.execute_binding(&[ActionTag::SetVolume]);
            assert_eq!(app.player.volume(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_set_volume_prompt_cancel_changes_nothing() {
        let mut app = demo_app(ScriptedKeys::typed("42", Key::Esc));
        let before = app.player.volume();
        app.execute_binding(&[ActionTag::SetVolume]);
        assert_eq!(app.player.volume(), before);
    }

    #[test]
    fn test_set_crossfade_lower_bound() {
        let mut app = demo_app(ScriptedKeys::typed("0", Key::Enter));
        app.execute_binding(&[ActionTag::SetCrossfade]);
        assert_eq!(app.player.crossfade(), 1);
        assert_eq!(app.config.playback.crossfade_time, 1);
    }

    #[test]
    fn test_prompt_hook_applies_before_confirm() {
        let mut app = demo_app(no_keys());
        let prev = app.statusbar.lock(PromptHook::Filter);
        app.statusbar.begin_input("Apply filter: ", "");
        for c in "Cassette".chars() {
            app.statusbar.push_input(c);
        }
        app.run_prompt_hook();
        // the filter took effect while the prompt is still open
        assert_eq!(SongList::len(&app.screens.playlist), 2);
        app.statusbar.unlock(prev);
    }

    #[test]
    fn test_filter_prompt_confirm() {
        let mut app = demo_app(ScriptedKeys::typed("Cassette", Key::Enter));
        app.execute_binding(&[ActionTag::ApplyFilter]);
        assert_eq!(app.screens.playlist.current_filter(), "Cassette");
        assert_eq!(SongList::len(&app.screens.playlist), 2);
        assert!(app.statusbar.line().contains("Using filter"));
    }

    #[test]
    fn test_filter_prompt_cancel_restores_previous_filter() {
        let mut app = demo_app(ScriptedKeys::typed("xyzzy", Key::Esc));
        app.execute_binding(&[ActionTag::ApplyFilter]);
        assert_eq!(app.screens.playlist.current_filter(), "");
        assert_eq!(SongList::len(&app.screens.playlist), 4);
    }

    #[test]
    fn test_clearing_the_filter_disables_filtering() {
        // the prompt starts from the current filter; backspace it away
        let mut app = demo_app(ScriptedKeys::new(
            std::iter::repeat(Some(Key::Backspace))
                .take(8)
                .chain([Some(Key::Enter)])
                .collect::<Vec<_>>(),
        ));
        app.screens.playlist.apply_filter("Cassette");
        app.execute_binding(&[ActionTag::ApplyFilter]);
        assert!(app.statusbar.line().contains("Filtering disabled"));
        assert_eq!(app.screens.playlist.current_filter(), "");
        assert_eq!(SongList::len(&app.screens.playlist), 4);
    }

    #[test]
    fn test_find_prompt_moves_to_match() {
        let mut app = demo_app(ScriptedKeys::typed("cassette", Key::Enter));
        app.execute_binding(&[ActionTag::FindItemForward]);
        assert_eq!(SongList::choice(&app.screens.playlist), 2);
        assert_eq!(app.statusbar.line(), "Searching finished");
    }

    #[test]
    fn test_find_prompt_reports_no_match() {
        let mut app = demo_app(ScriptedKeys::typed("zebra", Key::Enter));
        app.execute_binding(&[ActionTag::FindItemForward]);
        assert!(app.statusbar.line().contains("Unable to find"));
    }

    #[test]
    fn test_empty_find_clears_matches() {
        let mut app = demo_app(ScriptedKeys::new(
            "cassette"
                .chars()
                .map(|c| Some(Key::Char(c)))
                .chain([Some(Key::Enter), Some(Key::Enter)])
                .collect::<Vec<_>>(),
        ));
        app.execute_binding(&[ActionTag::FindItemForward]);
        assert_eq!(SongList::choice(&app.screens.playlist), 2);

        // second prompt confirms an empty query: matches are gone
        app.execute_binding(&[ActionTag::FindItemForward]);
        app.execute_binding(&[ActionTag::NextFoundItem]);
        assert_eq!(SongList::choice(&app.screens.playlist), 2);
    }

    #[test]
    fn test_command_prompt_runs_actions_by_name() {
        let mut app = demo_app(ScriptedKeys::typed("stop", Key::Enter));
        app.player.play_index(0).unwrap();
        app.execute_binding(&[ActionTag::ExecuteCommand]);
        assert_eq!(app.player.state(), PlayerState::Stopped);
    }

    #[test]
    fn test_command_prompt_reports_unknown_names() {
        let mut app = demo_app(ScriptedKeys::typed("warp_ten", Key::Enter));
        app.execute_binding(&[ActionTag::ExecuteCommand]);
        assert!(app.statusbar.line().contains("No command named"));
    }

    // ---- screens ----

    #[test]
    fn test_screen_lock_toggle_and_master_slave() {
        let mut app = demo_app(no_keys());
        app.execute_binding(&[ActionTag::ToggleScreenLock]);
        assert_eq!(
            app.composition.locked_pair(),
            Some((ScreenKind::Playlist, ScreenKind::Browser))
        );

        // the master half is already active
        app.execute_binding(&[ActionTag::MasterScreen]);
        assert!(app.statusbar.line().contains("Cannot execute"));

        app.execute_binding(&[ActionTag::SlaveScreen]);
        assert_eq!(app.composition.active(), ScreenKind::Browser);
        app.execute_binding(&[ActionTag::MasterScreen]);
        assert_eq!(app.composition.active(), ScreenKind::Playlist);

        app.execute_binding(&[ActionTag::ToggleScreenLock]);
        assert!(!app.composition.is_locked());
        assert!(app.statusbar.line().contains("Screen unlocked"));
    }

    #[test]
    fn test_lock_refused_on_non_mergeable_screen() {
        let mut app = demo_app(no_keys());
        app.switch_screen(ScreenKind::Help).unwrap();
        app.execute_binding(&[ActionTag::ToggleScreenLock]);
        assert!(!app.composition.is_locked());
        assert!(app.statusbar.line().contains("Cannot execute"));
    }

    #[test]
    fn test_lock_width_prompt_is_clamped() {
        let mut app = demo_app(ScriptedKeys::typed("95", Key::Enter));
        app.config.ui.ask_for_locked_screen_width_part = true;
        app.execute_binding(&[ActionTag::ToggleScreenLock]);
        assert!(app.composition.is_locked());
        assert_eq!(app.config.ui.locked_screen_width_part, 80);
    }

    #[test]
    fn test_screen_cycle_skips_locked_out_screens() {
        let mut app = demo_app(no_keys());
        app.composition
            .lock(ScreenKind::Playlist, ScreenKind::Library)
            .unwrap();
        app.execute_binding(&[ActionTag::NextScreen]);
        assert_eq!(app.composition.active(), ScreenKind::Library);
        app.execute_binding(&[ActionTag::NextScreen]);
        assert_eq!(app.composition.active(), ScreenKind::Playlist);
    }

    #[test]
    fn test_capability_helpers_match_the_accessors() {
        let mut app = demo_app(no_keys());
        for kind in ScreenKind::ORDER {
            app.composition = ScreenComposition::new(kind);
            let search = app.active_supports_search();
            let filter = app.active_supports_filter();
            let songs = app.active_supports_song_list();
            let screen = app.screens.get_mut(kind);
            assert_eq!(screen.searchable().is_some(), search, "{:?}", kind);
            assert_eq!(screen.filterable().is_some(), filter, "{:?}", kind);
            assert_eq!(screen.song_list().is_some(), songs, "{:?}", kind);
        }
    }

    #[test]
    fn test_enter_plays_the_chosen_queue_entry() {
        let mut app = demo_app(no_keys());
        app.active_screen_mut().scroll(ScrollDir::Down);
        app.execute_binding(&[ActionTag::PressEnter]);
        assert_eq!(app.player.current_index(), Some(1));
        assert_eq!(app.player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_artist_jump_on_the_library_screen() {
        let mut app = demo_app(no_keys());
        app.switch_screen(ScreenKind::Library).unwrap();
        // demo library sorts to three Cassette Summer rows first
        app.execute_binding(&[ActionTag::ScrollDownArtist]);
        assert_eq!(SongList::choice(&app.screens.library), 3);
        app.execute_binding(&[ActionTag::ScrollUpArtist]);
        assert_eq!(SongList::choice(&app.screens.library), 2);
    }

    #[test]
    fn test_volume_step_actions() {
        let mut app = demo_app(no_keys());
        app.execute_binding(&[ActionTag::VolumeUp]);
        assert_eq!(app.player.volume(), 72);
        app.execute_binding(&[ActionTag::VolumeDown]);
        assert_eq!(app.player.volume(), 70);
    }
}

fn draw_statusline(frame: &mut Frame, area: Rect, statusbar: &Statusbar, player: &dyn Player) {
    let line = statusbar.line();
    let text = if !line.is_empty() {
        line
    } else {
        let song = player
            .current_index()
            .and_then(|i| player.queue().get(i))
            .map(|s| s.display_line());
        match (player.state(), song) {
            (PlayerState::Playing, Some(song)) => format!("Playing: {}", song),
            (PlayerState::Paused, Some(song)) => format!("Paused: {}", song),
            _ => "Stopped".to_string(),
        }
    };
    frame.render_widget(Paragraph::new(text), area);
}
