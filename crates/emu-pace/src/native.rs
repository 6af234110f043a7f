//! Desktop front end: a winit window driving the dispatcher.
//!
//! winit owns the thread. Window events are translated into pacer events
//! and queued; `about_to_wait` pumps whatever is due and then sleeps the
//! event loop until the next tick deadline.

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::window::{Window, WindowAttributes, WindowId};

use emu_core::{InputEvent, Machine};

use crate::clock::{HostClock, StdHostClock};
use crate::config::PaceConfig;
use crate::dispatch::Dispatcher;
use crate::event::{Event, Hotkey, MenuCommand};
use crate::host::Host;
use crate::quicksave::Hud;
use crate::speed::SpeedSelection;

/// Initial window size: a 320x256 display at 2x.
const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 512;

/// Events dispatched per wake-up before control returns to winit. Keeps
/// full speed from starving window events.
const MAX_PUMP_BATCH: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Reports pacing state through the window title.
pub struct WindowHost {
    window: Option<Window>,
    title: String,
    autopause: bool,
    frame_skip: u32,
}

impl WindowHost {
    fn new(title: &str) -> Self {
        Self {
            window: None,
            title: title.to_string(),
            autopause: false,
            frame_skip: 1,
        }
    }

    fn set_title(&self, text: &str) {
        if let Some(window) = &self.window {
            window.set_title(text);
        }
    }

    /// Renderer frame-skip ceiling last requested by the pacer.
    #[must_use]
    pub fn frame_skip(&self) -> u32 {
        self.frame_skip
    }
}

impl Host for WindowHost {
    fn publish_throughput(&mut self, mhz: f64, percent: f64) {
        self.set_title(&format!("{} {mhz:.3}MHz {percent:.1}%", self.title));
    }

    fn show_pause(&mut self, reason: &str) {
        self.set_title(&format!("{} ({reason})", self.title));
    }

    fn show_hud(&mut self, hud: &Hud) {
        tracing::info!("{}", hud.message());
        self.set_title(&format!("{} - {}", self.title, hud.message()));
    }

    fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!("window resized to {width}x{height}");
    }

    fn set_frame_skip(&mut self, max: u32) {
        self.frame_skip = max;
    }

    fn is_autopause_enabled(&self) -> bool {
        self.autopause
    }

    fn set_autopause(&mut self, enabled: bool) {
        self.autopause = enabled;
    }
}

struct App<M: Machine> {
    dispatcher: Dispatcher<M, WindowHost, StdHostClock>,
    clock: StdHostClock,
    modifiers: ModifiersState,
}

impl<M: Machine> App<M> {
    fn on_key(&mut self, code: KeyCode, physical: PhysicalKey, pressed: bool, repeat: bool) {
        if let Some(event) = hotkey_event(code, pressed, self.modifiers) {
            if !repeat {
                self.dispatcher.push(event);
            }
            return;
        }
        if let Some(scancode) = physical.to_scancode() {
            self.dispatcher
                .push(Event::Input(InputEvent::Key { scancode, pressed }));
        }
    }
}

/// Keys reserved for the pacer. Everything else goes to the machine.
fn hotkey_event(code: KeyCode, pressed: bool, modifiers: ModifiersState) -> Option<Event> {
    let hotkey = match (code, pressed) {
        (KeyCode::PageUp, true) => Hotkey::FastForward {
            via_modifier: false,
        },
        (KeyCode::PageUp, false) => Hotkey::FastForwardReleased {
            via_modifier: false,
        },
        (KeyCode::AltRight, true) => Hotkey::FastForward { via_modifier: true },
        (KeyCode::AltRight, false) => Hotkey::FastForwardReleased { via_modifier: true },
        (KeyCode::Pause, true) => Hotkey::Pause,
        (KeyCode::F12, true) => Hotkey::Break,
        (KeyCode::F5, true) => Hotkey::QuickSave,
        (KeyCode::F6, true) => Hotkey::SlotPrev,
        (KeyCode::F7, true) => Hotkey::QuickLoad,
        (KeyCode::F8, true) => Hotkey::SlotNext,
        (_, true) if modifiers.control_key() => {
            return menu_shortcut(code).map(Event::Menu);
        }
        _ => return None,
    };
    Some(Event::Hotkey(hotkey))
}

/// Ctrl shortcuts standing in for the menu bar.
fn menu_shortcut(code: KeyCode) -> Option<MenuCommand> {
    let preset = |index| Some(MenuCommand::SetSpeed(SpeedSelection::Preset(index)));
    match code {
        KeyCode::Digit1 => preset(0),
        KeyCode::Digit2 => preset(1),
        KeyCode::Digit3 => preset(2),
        KeyCode::Digit4 => preset(3),
        KeyCode::Digit5 => preset(4),
        KeyCode::Digit6 => preset(5),
        KeyCode::Digit7 => preset(6),
        KeyCode::Digit8 => preset(7),
        KeyCode::Digit9 => preset(8),
        KeyCode::Digit0 => preset(9),
        KeyCode::KeyP => Some(MenuCommand::SetSpeed(SpeedSelection::Paused)),
        KeyCode::KeyF => Some(MenuCommand::SetSpeed(SpeedSelection::Full)),
        KeyCode::KeyA => Some(MenuCommand::ToggleAutopause),
        KeyCode::KeyS => Some(MenuCommand::QuickSave),
        KeyCode::KeyL => Some(MenuCommand::QuickLoad),
        KeyCode::KeyR => Some(MenuCommand::Restart),
        KeyCode::KeyQ => Some(MenuCommand::Quit),
        _ => None,
    }
}

impl<M: Machine> ApplicationHandler for App<M> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.dispatcher.host().window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(&self.dispatcher.host().title)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        match event_loop.create_window(attrs) {
            Ok(window) => self.dispatcher.host_mut().window = Some(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let at = self.clock.now();
        match event {
            WindowEvent::CloseRequested => self.dispatcher.push(Event::Close),
            WindowEvent::Resized(size) => self.dispatcher.push(Event::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(true) => self.dispatcher.push(Event::FocusGained { at }),
            WindowEvent::Focused(false) => self.dispatcher.push(Event::FocusLost { at }),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(
                        code,
                        event.physical_key,
                        event.state == ElementState::Pressed,
                        event.repeat,
                    );
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => 0,
                    MouseButton::Right => 1,
                    MouseButton::Middle => 2,
                    _ => return,
                };
                self.dispatcher.push(Event::Input(InputEvent::MouseButton {
                    button,
                    pressed: state == ElementState::Pressed,
                }));
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.dispatcher
                .push(Event::Input(InputEvent::MouseMotion { dx, dy }));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        for _ in 0..MAX_PUMP_BATCH {
            if self.dispatcher.is_quitting() || !self.dispatcher.pump() {
                break;
            }
        }

        if self.dispatcher.is_quitting() {
            event_loop.exit();
            return;
        }

        let flow = match self.dispatcher.next_deadline() {
            Some(deadline) if deadline <= self.clock.now() => ControlFlow::Poll,
            Some(deadline) => ControlFlow::WaitUntil(self.clock.instant_at(deadline)),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }
}

/// Open a window titled `title` and run `machine` until the window closes.
pub fn run<M: Machine>(config: &PaceConfig, machine: M, title: &str) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let clock = StdHostClock::new();
    let mut app = App {
        dispatcher: Dispatcher::new(config, machine, WindowHost::new(title), clock),
        clock,
        modifiers: ModifiersState::empty(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_forward_keys() {
        assert_eq!(
            hotkey_event(KeyCode::PageUp, true, ModifiersState::empty()),
            Some(Event::Hotkey(Hotkey::FastForward {
                via_modifier: false
            }))
        );
        assert_eq!(
            hotkey_event(KeyCode::AltRight, false, ModifiersState::empty()),
            Some(Event::Hotkey(Hotkey::FastForwardReleased { via_modifier: true }))
        );
    }

    #[test]
    fn ctrl_shortcuts_map_to_menu() {
        assert_eq!(
            hotkey_event(KeyCode::Digit5, true, ModifiersState::CONTROL),
            Some(Event::Menu(MenuCommand::SetSpeed(SpeedSelection::Preset(4))))
        );
        assert_eq!(
            hotkey_event(KeyCode::KeyQ, true, ModifiersState::CONTROL),
            Some(Event::Menu(MenuCommand::Quit))
        );
        assert_eq!(hotkey_event(KeyCode::KeyQ, true, ModifiersState::empty()), None);
        assert_eq!(hotkey_event(KeyCode::KeyQ, false, ModifiersState::CONTROL), None);
    }
}
