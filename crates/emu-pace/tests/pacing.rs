//! End-to-end pacing scenarios driven by a fake clock and a scripted event
//! source.

use std::collections::VecDeque;
use std::time::Duration;

use emu_core::{EmulationFault, Indicators, InputEvent, Machine, MasterClock};
use emu_pace::{
    Dispatcher, Event, EventSource, FakeHostClock, FullSpeedPhase, Host, HostClock, Hotkey,
    MenuCommand, PaceConfig, SpeedSelection, Tick,
};

const MS: Duration = Duration::from_millis(1);

/// Events at fixed host times. Waiting jumps the clock forward instead of
/// sleeping.
struct Script {
    clock: FakeHostClock,
    events: VecDeque<(Duration, Event)>,
}

impl Script {
    fn new(clock: &FakeHostClock, events: Vec<(Duration, Event)>) -> Self {
        Self {
            clock: clock.clone(),
            events: events.into(),
        }
    }

    fn jump_to(&self, at: Duration) {
        if at > self.clock.now() {
            self.clock.set(at);
        }
    }
}

impl EventSource for Script {
    fn poll_event(&mut self) -> Option<Event> {
        match self.events.front() {
            Some((at, _)) if *at <= self.clock.now() => self.events.pop_front().map(|(_, e)| e),
            _ => None,
        }
    }

    fn wait_event(&mut self, deadline: Option<Duration>) -> Option<Event> {
        let next = self.events.front().map(|(at, _)| *at);
        match (next, deadline) {
            (Some(at), Some(deadline)) if deadline < at => {
                self.jump_to(deadline);
                None
            }
            (Some(at), _) => {
                self.jump_to(at);
                self.events.pop_front().map(|(_, e)| e)
            }
            (None, Some(deadline)) => {
                self.jump_to(deadline);
                None
            }
            // An exhausted script closes the window.
            (None, None) => Some(Event::Close),
        }
    }
}

/// A machine whose frames take a fixed amount of host time.
struct Bench {
    clock: FakeHostClock,
    cost: Duration,
    starts: Vec<Duration>,
}

impl Machine for Bench {
    fn clock(&self) -> MasterClock {
        MasterClock::BBC_MICRO
    }

    fn run_frame(&mut self, _indicators: &mut Indicators) -> Result<(), EmulationFault> {
        self.starts.push(self.clock.now());
        self.clock.advance(self.cost);
        Ok(())
    }

    fn input(&mut self, _event: InputEvent) {}

    fn reset(&mut self) {}
}

#[derive(Default)]
struct Title {
    samples: Vec<(f64, f64)>,
    autopause: bool,
}

impl Host for Title {
    fn publish_throughput(&mut self, mhz: f64, percent: f64) {
        self.samples.push((mhz, percent));
    }

    fn is_autopause_enabled(&self) -> bool {
        self.autopause
    }

    fn set_autopause(&mut self, enabled: bool) {
        self.autopause = enabled;
    }
}

type Rig = Dispatcher<Bench, Title, FakeHostClock>;

fn rig(config: &PaceConfig, cost: Duration) -> (Rig, FakeHostClock) {
    let clock = FakeHostClock::new();
    let bench = Bench {
        clock: clock.clone(),
        cost,
        starts: Vec::new(),
    };
    let d = Dispatcher::new(config, bench, Title::default(), clock.clone());
    (d, clock)
}

fn at_speed(speed: SpeedSelection) -> PaceConfig {
    PaceConfig {
        speed,
        ..PaceConfig::default()
    }
}

fn run(d: &mut Rig, clock: &FakeHostClock, events: Vec<(Duration, Event)>) {
    let mut script = Script::new(clock, events);
    d.run(&mut script);
}

#[test]
fn normal_speed_runs_fifty_frames_a_second() {
    let (mut d, clock) = rig(&PaceConfig::default(), MS);
    run(&mut d, &clock, vec![(1010 * MS, Event::Close)]);

    assert_eq!(d.driver().frames_run(), 50);
    assert_eq!(d.driver().frames_skipped(), 0);
    for (i, start) in d.machine().starts.iter().enumerate() {
        assert_eq!(*start, 20 * MS * (i as u32 + 1));
    }

    let samples = &d.host().samples;
    assert!(samples.len() >= 9);
    let (mhz, percent) = *samples.last().unwrap();
    assert!((mhz - 2.0).abs() < 0.05, "{mhz}");
    assert!((percent - 100.0).abs() < 2.0, "{percent}");
}

#[test]
fn every_preset_sets_double_interval_limit() {
    let (mut d, _) = rig(&PaceConfig::default(), MS);
    for index in 0..10 {
        d.dispatch(Event::Menu(MenuCommand::SetSpeed(SpeedSelection::Preset(index))));
        let state = d.pace().state();
        assert_eq!(state.time_limit(), 2 * state.interval());
    }
}

#[test]
fn out_of_range_menu_selection_uses_default() {
    let (mut d, _) = rig(&at_speed(SpeedSelection::Preset(0)), MS);
    d.dispatch(Event::Menu(MenuCommand::SetSpeed(SpeedSelection::Preset(10))));
    let state = d.pace().state();
    assert_eq!(state.selected_speed(), SpeedSelection::Preset(4));
    assert_eq!(state.interval(), 20 * MS);
    assert_eq!(state.time_limit(), 40 * MS);
    assert_eq!(state.max_frame_skip(), 2);
}

#[test]
fn stale_tick_never_executes() {
    let (mut d, clock) = rig(&PaceConfig::default(), MS);
    clock.set(60 * MS);
    d.dispatch(Event::Tick(Tick::timer(15 * MS)));
    assert!(d.machine().starts.is_empty());
    assert_eq!(d.driver().frames_skipped(), 1);
}

#[test]
fn slow_host_skips_instead_of_bursting() {
    // Each frame takes longer than the 20 ms interval.
    let (mut d, clock) = rig(&PaceConfig::default(), 50 * MS);
    run(&mut d, &clock, vec![(1000 * MS, Event::Close)]);

    let run_count = d.driver().frames_run();
    assert!(d.driver().frames_skipped() > 0);
    assert!(run_count <= 21, "{run_count}");
    for pair in d.machine().starts.windows(2) {
        assert!(pair[1] - pair[0] >= 50 * MS);
    }
}

#[test]
fn pause_is_idempotent_through_focus_loss() {
    let config = PaceConfig {
        autopause: true,
        ..PaceConfig::default()
    };
    let (mut d, _) = rig(&config, MS);
    d.dispatch(Event::FocusLost { at: 500 * MS });
    let once = d.pace().state().clone();
    d.dispatch(Event::FocusLost { at: 600 * MS });
    let twice = d.pace().state();

    assert!(!twice.timer_armed());
    assert_eq!(once.pause_reason(), twice.pause_reason());
    assert_eq!(once.selected_speed(), twice.selected_speed());
    assert_eq!(once.interval(), twice.interval());
}

#[test]
fn resume_while_paused_keeps_timer_stopped() {
    let config = PaceConfig {
        speed: SpeedSelection::Paused,
        autopause: true,
        ..PaceConfig::default()
    };
    let (mut d, clock) = rig(&config, MS);
    d.dispatch(Event::FocusGained { at: 10 * MS });
    assert!(!d.pace().state().timer_armed());

    // Nothing is due, so the loop sleeps until the script runs out and closes.
    run(&mut d, &clock, vec![(5000 * MS, Event::FocusGained { at: 5000 * MS })]);
    assert_eq!(d.driver().frames_run(), 0);
    assert!(d.is_quitting());
}

#[test]
fn full_speed_round_trip_restores_preset() {
    let (mut d, clock) = rig(&PaceConfig::default(), MS);
    run(
        &mut d,
        &clock,
        vec![
            (
                100 * MS,
                Event::Hotkey(Hotkey::FastForward {
                    via_modifier: false,
                }),
            ),
            (
                200 * MS,
                Event::Hotkey(Hotkey::FastForwardReleased {
                    via_modifier: false,
                }),
            ),
            (300 * MS, Event::Close),
        ],
    );

    // Four paced frames, about a hundred unpaced, then paced again.
    let frames = d.driver().frames_run();
    assert!((100..=112).contains(&frames), "{frames}");
    let unpaced = d
        .machine()
        .starts
        .iter()
        .filter(|t| (100 * MS..200 * MS).contains(*t))
        .count();
    assert!(unpaced >= 95, "{unpaced}");

    let state = d.pace().state();
    assert_eq!(state.fullspeed_phase(), FullSpeedPhase::None);
    assert!(state.timer_armed());
    assert_eq!(state.interval(), 20 * MS);
    assert_eq!(state.time_limit(), 40 * MS);
}

#[test]
fn user_pause_halts_full_speed() {
    let (mut d, clock) = rig(&at_speed(SpeedSelection::Full), MS);
    run(
        &mut d,
        &clock,
        vec![
            (50 * MS, Event::Hotkey(Hotkey::Pause)),
            (150 * MS, Event::Hotkey(Hotkey::Pause)),
            (200 * MS, Event::Close),
        ],
    );

    let starts = &d.machine().starts;
    assert!(starts.iter().all(|t| !(51 * MS..150 * MS).contains(t)));
    assert!(starts.iter().any(|t| *t >= 150 * MS));
    assert_eq!(d.pace().state().fullspeed_phase(), FullSpeedPhase::Running);
}

#[test]
fn focus_grace_window() {
    let config = PaceConfig {
        autopause: true,
        ..PaceConfig::default()
    };

    let (mut quick, _) = rig(&config, MS);
    quick.dispatch(Event::FocusGained { at: 1000 * MS });
    quick.dispatch(Event::FocusLost { at: 1050 * MS });
    assert!(quick.pace().state().timer_armed());

    let (mut slow, _) = rig(&config, MS);
    slow.dispatch(Event::FocusGained { at: 1000 * MS });
    slow.dispatch(Event::FocusLost { at: 1200 * MS });
    assert!(!slow.pace().state().timer_armed());
    assert_eq!(slow.pace().state().pause_reason(), Some("auto-paused"));
}

#[test]
fn menu_during_full_speed_keeps_self_pacing() {
    let (mut d, clock) = rig(&at_speed(SpeedSelection::Full), MS);
    run(
        &mut d,
        &clock,
        vec![
            (20 * MS, Event::Menu(MenuCommand::SlotNext)),
            (40 * MS, Event::Menu(MenuCommand::SetSpeed(SpeedSelection::Preset(9)))),
            (100 * MS, Event::Close),
        ],
    );

    let state = d.pace().state();
    assert_eq!(state.selected_speed(), SpeedSelection::Preset(9));
    assert_eq!(state.fullspeed_phase(), FullSpeedPhase::None);
    assert!(state.timer_armed());
    assert_eq!(d.slots().slot(), 1);
    // Unpaced until 40 ms, then one frame per 4 ms.
    let after = d.machine().starts.iter().filter(|t| **t >= 41 * MS).count();
    assert!(after <= 16, "{after}");
}
