//! Event dispatcher: the single-threaded run loop.
//!
//! Events are handled strictly one at a time in arrival order, so a menu
//! handler can never interleave with a frame. Internal full-speed ticks
//! join the same FIFO as host events.

use std::collections::VecDeque;
use std::time::Duration;

use emu_core::{Indicator, Machine, SnapshotError};

use crate::clock::HostClock;
use crate::config::{AUTOBOOT_FRAMES, PaceConfig};
use crate::controller::PaceController;
use crate::driver::{FrameDriver, TickOutcome};
use crate::event::{Event, EventSource, Hotkey, MenuCommand};
use crate::host::Host;
use crate::quicksave::{Hud, QuickSlots};

/// A focus loss this soon after a focus gain is treated as window-system
/// noise and ignored.
pub const FOCUS_GRACE: Duration = Duration::from_millis(100);

/// Owns the pacing state and every collaborator, and routes events to them.
pub struct Dispatcher<M, H, C: HostClock> {
    pace: PaceController<C>,
    driver: FrameDriver,
    machine: M,
    host: H,
    slots: QuickSlots,
    hud: Option<Hud>,
    queue: VecDeque<Event>,
    quitting: bool,
    last_focus_in: Option<Duration>,
}

impl<M: Machine, H: Host, C: HostClock> Dispatcher<M, H, C> {
    pub fn new(config: &PaceConfig, machine: M, mut host: H, clock: C) -> Self {
        let mut pace = PaceController::new(clock, config.speed);
        if let Some(max) = config.frame_skip {
            pace.set_max_frame_skip(max);
        }
        host.set_autopause(config.autopause);
        host.set_frame_skip(pace.state().max_frame_skip());

        let mut driver = FrameDriver::new();
        if config.autoboot {
            driver
                .indicators_mut()
                .arm(Indicator::Autoboot, AUTOBOOT_FRAMES);
        }

        let mut slots = QuickSlots::new(config.states_dir.clone());
        slots.set_disc_image(config.disc_image.as_deref());

        tracing::info!(
            "pacer ready: speed {}, autopause {}",
            pace.state().selected_speed(),
            config.autopause
        );

        Self {
            pace,
            driver,
            machine,
            host,
            slots,
            hud: None,
            queue: VecDeque::new(),
            quitting: false,
            last_focus_in: None,
        }
    }

    /// Handle one event.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Tick(tick) => {
                let outcome =
                    self.driver
                        .on_tick(tick, &mut self.pace, &mut self.machine, &mut self.host);
                if outcome == TickOutcome::Stale {
                    tracing::trace!("frame skipped");
                }
            }
            Event::Input(input) => self.machine.input(input),
            Event::Hotkey(key) => self.on_hotkey(key),
            Event::Menu(command) => self.on_menu(command),
            Event::FocusLost { at } => self.on_focus_lost(at),
            Event::FocusGained { at } => self.on_focus_gained(at),
            Event::Resize { width, height } => self.host.resize(width, height),
            Event::Close => self.quit(),
        }
    }

    /// Dispatch the oldest pending event, after collecting any tick that
    /// has fallen due. Returns `false` when nothing was pending.
    ///
    /// Callback-driven hosts call this whenever [`next_deadline`] passes.
    ///
    /// [`next_deadline`]: Self::next_deadline
    pub fn pump(&mut self) -> bool {
        self.collect_ticks();
        match self.queue.pop_front() {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Queue a host event behind anything already pending.
    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Host time at which [`pump`](Self::pump) next has work, or `None`
    /// if only a host event can wake the loop.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.queue.is_empty() {
            self.pace.next_deadline()
        } else {
            Some(Duration::ZERO)
        }
    }

    /// Run until the quitting flag is set.
    ///
    /// Blocks in [`EventSource::wait_event`] whenever nothing is due. An
    /// empty return is only a wake-up; the loop ends on `Close` or `Quit`.
    pub fn run<S: EventSource>(&mut self, source: &mut S) {
        while !self.quitting {
            while let Some(event) = source.poll_event() {
                self.queue.push_back(event);
            }
            if self.pump() {
                continue;
            }

            if let Some(event) = source.wait_event(self.next_deadline()) {
                self.queue.push_back(event);
            }
        }
        tracing::info!("run loop finished after {} frames", self.driver.frames_run());
    }

    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    #[must_use]
    pub fn pace(&self) -> &PaceController<C> {
        &self.pace
    }

    #[must_use]
    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    #[must_use]
    pub fn machine(&self) -> &M {
        &self.machine
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn slots(&self) -> &QuickSlots {
        &self.slots
    }

    /// The quick-save message currently on screen, if any.
    #[must_use]
    pub fn hud(&self) -> Option<&Hud> {
        self.hud.as_ref()
    }

    /// Fade the on-screen message by `step`, dropping it once invisible.
    pub fn fade_hud(&mut self, step: u8) {
        if let Some(hud) = &mut self.hud {
            hud.fade(step);
            if !hud.is_visible() {
                self.hud = None;
            }
        }
    }

    fn collect_ticks(&mut self) {
        if let Some(tick) = self.pace.take_emitted() {
            self.queue.push_back(Event::Tick(tick));
        }
        while let Some(tick) = self.pace.poll_timer() {
            self.queue.push_back(Event::Tick(tick));
        }
    }

    fn on_hotkey(&mut self, key: Hotkey) {
        match key {
            Hotkey::Pause => {
                self.pace.toggle_pause();
                if self.pace.state().is_user_paused() {
                    self.host.show_pause("paused");
                }
            }
            Hotkey::FastForward { via_modifier } => self.pace.enter_fastforward(via_modifier),
            Hotkey::FastForwardReleased { via_modifier } => {
                self.pace.exit_fastforward(via_modifier);
            }
            Hotkey::Break => self.machine.soft_reset(),
            Hotkey::QuickSave => self.quick_save(),
            Hotkey::QuickLoad => self.quick_load(),
            Hotkey::SlotPrev => {
                let slot = self.slots.prev_slot();
                self.show_hud(Hud::slot(slot));
            }
            Hotkey::SlotNext => {
                let slot = self.slots.next_slot();
                self.show_hud(Hud::slot(slot));
            }
        }
    }

    /// Apply one menu command with emulation held still around it.
    fn on_menu(&mut self, command: MenuCommand) {
        self.pace.pause("menu active");
        self.host.show_pause("menu active");

        match command {
            MenuCommand::SetSpeed(selection) => {
                self.pace.set_speed(selection);
                self.host.set_frame_skip(self.pace.state().max_frame_skip());
            }
            MenuCommand::ToggleAutopause => {
                let enabled = !self.host.is_autopause_enabled();
                self.host.set_autopause(enabled);
            }
            MenuCommand::QuickSave => self.quick_save(),
            MenuCommand::QuickLoad => self.quick_load(),
            MenuCommand::SlotPrev => self.on_hotkey(Hotkey::SlotPrev),
            MenuCommand::SlotNext => self.on_hotkey(Hotkey::SlotNext),
            MenuCommand::Restart => self.restart(),
            MenuCommand::Quit => self.quit(),
        }

        self.pace.resume();
    }

    fn on_focus_lost(&mut self, at: Duration) {
        if self
            .last_focus_in
            .is_some_and(|gained| at.saturating_sub(gained) < FOCUS_GRACE)
        {
            tracing::debug!("ignoring focus loss inside the grace window");
            return;
        }

        self.machine.focus_lost();
        if self.host.is_autopause_enabled() && !self.host.is_debugger_attached() {
            self.pace.pause("auto-paused");
            self.host.show_pause("auto-paused");
        }
    }

    fn on_focus_gained(&mut self, at: Duration) {
        self.last_focus_in = Some(at);
        if self.host.is_autopause_enabled() {
            self.pace.resume();
        }
    }

    fn restart(&mut self) {
        self.pace.pause("restarting");
        self.machine.reset();
        self.pace.resume();
    }

    fn quit(&mut self) {
        tracing::debug!("quit requested");
        self.quitting = true;
    }

    fn quick_save(&mut self) {
        let name = self.slots.file_name();
        let hud = match self.machine.request_save(&self.slots.path()) {
            Ok(()) => Hud::saved(&name),
            Err(err) => {
                tracing::warn!("quick save to {name} failed: {err}");
                Hud::failed(&name)
            }
        };
        self.show_hud(hud);
    }

    fn quick_load(&mut self) {
        let name = self.slots.file_name();
        let hud = match self.machine.request_load(&self.slots.path()) {
            Ok(()) => Hud::loaded(&name),
            Err(SnapshotError::NotFound(_)) => Hud::not_found(&name),
            Err(err) => {
                tracing::warn!("quick load from {name} failed: {err}");
                Hud::failed(&name)
            }
        };
        self.show_hud(hud);
    }

    fn show_hud(&mut self, hud: Hud) {
        self.host.show_hud(&hud);
        self.hud = Some(hud);
    }
}
