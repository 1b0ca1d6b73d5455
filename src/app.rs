//! Application shell
//!
//! Owns the lifecycle (`init` / `start` / `stop` / `destroy`), the running
//! [`Session`], and at most one modal [`Dialog`]. Frontends feed it key
//! commands and elapsed time and repaint when it reports a tick.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{AppError, Dialog};
use crate::settings::Settings;
use crate::sim::{Command, Display, GameWorld, WorldConfig};

/// Where the application is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Initialized, never started
    Created,
    /// A session is in the foreground
    Running,
    /// Backgrounded; the session is kept for resume
    Suspended,
    /// The player quit; the session is gone
    Exited,
    /// Torn down
    Destroyed,
}

/// One game from creation to quit, driven by a fixed-interval timer
#[derive(Debug, Clone)]
pub struct Session {
    world: GameWorld,
    interval: f32,
    accumulator: f32,
}

impl Session {
    pub fn new(display: Display, settings: &Settings) -> Self {
        Self {
            world: GameWorld::new(display, WorldConfig::from(settings)),
            interval: settings.tick_interval().as_secs_f32(),
            accumulator: 0.0,
        }
    }

    /// Advance the timer by `dt` seconds; returns how many ticks ran
    pub fn update(&mut self, dt: f32, display: Display) -> u32 {
        // A NaN would poison the accumulator for good
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.interval && substeps < MAX_SUBSTEPS {
            self.world.tick(display);
            self.accumulator -= self.interval;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.interval);
        }
        substeps
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }
}

/// The application: settings, lifecycle, current session and dialog
#[derive(Debug)]
pub struct App {
    settings: Settings,
    lifecycle: Lifecycle,
    current: Option<Session>,
    dialog: Option<Dialog>,
}

impl App {
    pub fn init(settings: Settings) -> Self {
        log::info!(
            "Spoke initialized (tick {} ms, step {} px)",
            settings.tick_interval_ms,
            settings.move_distance
        );
        Self {
            settings,
            lifecycle: Lifecycle::Created,
            current: None,
            dialog: None,
        }
    }

    /// Bring the app to the foreground, resuming a suspended session if there is one
    pub fn start(&mut self, display: Display) {
        if self.lifecycle == Lifecycle::Destroyed {
            log::warn!("start() after destroy() ignored");
            return;
        }
        if self.current.is_some() {
            log::info!("Resuming session");
        } else {
            log::info!("New session on {}x{} display", display.width, display.height);
            self.current = Some(Session::new(display, &self.settings));
        }
        self.lifecycle = Lifecycle::Running;
    }

    /// Move to the background; an open dialog is disposed
    pub fn stop(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        if let Some(dialog) = self.dialog.take() {
            log::debug!("Disposed dialog `{}` on stop", dialog.title);
        }
        self.lifecycle = Lifecycle::Suspended;
        log::info!("Suspended");
    }

    pub fn destroy(&mut self) {
        self.current = None;
        self.dialog = None;
        self.lifecycle = Lifecycle::Destroyed;
        log::info!("Destroyed");
    }

    /// Close the open dialog; returns false if there was none
    pub fn dismiss_dialog(&mut self) -> bool {
        match self.dialog.take() {
            Some(dialog) => {
                log::debug!("Dialog `{}` dismissed", dialog.title);
                true
            }
            None => false,
        }
    }

    /// Route a key command. An open dialog swallows the key and closes.
    pub fn handle_command(&mut self, command: Command) {
        if self.dismiss_dialog() {
            return;
        }
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        let Some(session) = self.current.as_mut() else {
            return;
        };
        session.world_mut().apply(command);
        if session.world().has_quit() {
            self.current = None;
            self.lifecycle = Lifecycle::Exited;
            log::info!("Session ended");
        }
    }

    /// Advance the running session; returns the number of ticks (repaint when > 0)
    pub fn update(&mut self, dt: f32, display: Display) -> u32 {
        if self.lifecycle != Lifecycle::Running {
            return 0;
        }
        self.current
            .as_mut()
            .map_or(0, |session| session.update(dt, display))
    }

    /// Report a failed network request: consume it, log it, and open the connection dialog
    pub fn on_network_error(&mut self, url: &str, reason: Option<String>) -> &Dialog {
        if let Some(reason) = &reason {
            log::error!("Network error for {}: {}", url, reason);
        } else {
            log::error!("Network error for {}", url);
        }
        let err = AppError::Network {
            url: url.to_string(),
            reason,
        };
        self.dialog.insert(err.dialog())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn has_exited(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Exited | Lifecycle::Destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: Display = Display::new(640, 480);

    fn started() -> App {
        let mut app = App::init(Settings::default());
        app.start(DISPLAY);
        app
    }

    #[test]
    fn test_start_creates_session() {
        let mut app = App::init(Settings::default());
        assert_eq!(app.lifecycle(), Lifecycle::Created);
        assert!(app.session().is_none());
        app.start(DISPLAY);
        assert!(app.is_running());
        assert!(app.session().is_some());
    }

    #[test]
    fn test_session_ticks_on_interval() {
        let mut session = Session::new(DISPLAY, &Settings::default());
        assert_eq!(session.update(0.05, DISPLAY), 0);
        assert_eq!(session.update(0.06, DISPLAY), 1);
        assert_eq!(session.update(0.25, DISPLAY), 2);
        assert_eq!(session.world().ticks(), 3);
    }

    #[test]
    fn test_session_caps_substeps() {
        let mut session = Session::new(DISPLAY, &Settings::default());
        // A long stall clamps to one second: 10 intervals, capped at MAX_SUBSTEPS
        assert_eq!(session.update(30.0, DISPLAY), MAX_SUBSTEPS);
        assert!(session.update(0.0, DISPLAY) <= 1);
    }

    #[test]
    fn test_session_ignores_non_finite_dt() {
        let mut session = Session::new(DISPLAY, &Settings::default());
        assert_eq!(session.update(f32::NAN, DISPLAY), 0);
        assert_eq!(session.update(f32::INFINITY, DISPLAY), 0);
        assert_eq!(session.update(-1.0, DISPLAY), 0);
        // The timer keeps running afterwards
        assert_eq!(session.update(0.1, DISPLAY), 1);
        assert_eq!(session.world().ticks(), 1);
    }

    #[test]
    fn test_tick_picks_up_resize() {
        let mut app = started();
        let resized = Display::new(1024, 768);
        assert_eq!(app.update(0.1, resized), 1);
        assert_eq!(app.session().unwrap().world().display(), resized);
    }

    #[test]
    fn test_stop_then_start_resumes() {
        let mut app = started();
        app.handle_command(Command::TurnRight);
        app.stop();
        assert_eq!(app.lifecycle(), Lifecycle::Suspended);

        // Suspended: no ticks, no input
        assert_eq!(app.update(1.0, DISPLAY), 0);
        app.handle_command(Command::TurnRight);

        app.start(DISPLAY);
        let player = app.session().unwrap().world().player();
        assert_eq!(player.angle_multiplier(), 19);
    }

    #[test]
    fn test_quit_ends_session() {
        let mut app = started();
        app.handle_command(Command::Quit);
        assert_eq!(app.lifecycle(), Lifecycle::Exited);
        assert!(app.session().is_none());
        assert!(app.has_exited());
        assert_eq!(app.update(1.0, DISPLAY), 0);

        // Starting again gives a fresh session
        app.start(DISPLAY);
        let player = app.session().unwrap().world().player();
        assert_eq!(player.angle_multiplier(), 18);
    }

    #[test]
    fn test_network_error_opens_dialog() {
        let mut app = started();
        let dialog = app.on_network_error("https://example.com", Some("offline".into()));
        assert_eq!(dialog.title, "Connection Error");
        assert!(app.dialog().is_some());

        // The next key closes the dialog instead of moving the player
        let before = app.session().unwrap().world().player().clone();
        app.handle_command(Command::Forward);
        assert!(app.dialog().is_none());
        assert_eq!(app.session().unwrap().world().player(), &before);

        app.handle_command(Command::Forward);
        assert_ne!(app.session().unwrap().world().player(), &before);
    }

    #[test]
    fn test_stop_disposes_dialog() {
        let mut app = started();
        app.on_network_error("https://example.com", None);
        app.stop();
        assert!(app.dialog().is_none());
    }

    #[test]
    fn test_destroy_is_final() {
        let mut app = started();
        app.destroy();
        app.start(DISPLAY);
        assert_eq!(app.lifecycle(), Lifecycle::Destroyed);
        assert!(app.session().is_none());
    }
}
