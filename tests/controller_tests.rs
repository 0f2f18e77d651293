use anti_screensaver::autostart::AutoStart;
use anti_screensaver::config_file::{ConfigStore, RunningState};
use anti_screensaver::scheduler::ManualClock;
use anti_screensaver::{
    AppController, AppState, AutoStartError, MouseController, MouseError, MovementEngine, NoticeLevel,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

struct FakeMouse {
    fail: bool,
}

impl MouseController for FakeMouse {
    fn move_relative(&mut self, _delta_x: i32, _delta_y: i32) -> Result<(), MouseError> {
        if self.fail {
            Err(MouseError::Input("blocked by compositor".to_string()))
        } else {
            Ok(())
        }
    }

    fn current_position(&self) -> Result<(i32, i32), MouseError> {
        Ok((100, 100))
    }
}

/// Registration double; clones share the registered flag
#[derive(Clone, Default)]
struct FakeAutoStart {
    registered: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<&'static str>>>,
    /// Registration lookups, counted apart from changes
    queries: Rc<Cell<u32>>,
    broken: bool,
}

impl AutoStart for FakeAutoStart {
    fn enable(&self) -> Result<(), AutoStartError> {
        self.calls.borrow_mut().push("enable");
        if self.broken {
            return Err(AutoStartError::Command {
                command: "register".to_string(),
                message: "access denied".to_string(),
            });
        }
        self.registered.set(true);
        Ok(())
    }

    fn disable(&self) -> Result<(), AutoStartError> {
        self.calls.borrow_mut().push("disable");
        self.registered.set(false);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.registered.get()
    }

    fn location(&self) -> String {
        "fake".to_string()
    }
}

type TestController = AppController<FakeMouse, ManualClock>;

fn controller_at(
    path: &Path,
    fail: bool,
    autostart: Option<Box<dyn AutoStart>>,
) -> (TestController, ManualClock) {
    let clock = ManualClock::new();
    let engine = MovementEngine::with_clock(FakeMouse { fail }, AppState::new(), clock.clone());
    let controller = AppController::new(ConfigStore::open(path), engine, autostart);
    (controller, clock)
}

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    (dir, path)
}

#[test]
fn test_start_and_stop_notices() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);

    let notice = controller.start();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.body, "Mouse movement started (every 30s)");
    assert!(controller.is_running());

    let again = controller.start();
    assert_eq!(again.level, NoticeLevel::Info);
    assert!(again.body.contains("already running"));

    assert_eq!(controller.stop().body, "Mouse movement stopped");
    assert!(controller.stop().body.contains("already stopped"));
    assert!(!controller.is_running());
}

#[test]
fn test_toggle() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);

    controller.toggle();
    assert!(controller.is_running());
    controller.toggle();
    assert!(!controller.is_running());
}

#[test]
fn test_set_interval_persists_and_retunes() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);
    controller.start();

    let notice = controller.set_interval(60);
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.body, "Interval set to 60s");
    assert_eq!(controller.engine().interval(), 60);
    assert!(controller.is_running());

    assert_eq!(ConfigStore::open(&path).interval(), 60);
}

#[test]
fn test_set_interval_clamps() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);

    assert_eq!(controller.set_interval(500).body, "Interval set to 300s");
    assert_eq!(controller.effective_interval(), 300);
}

#[test]
fn test_interval_override_not_persisted() {
    let (_dir, path) = setup();
    let (controller, _clock) = controller_at(&path, false, None);
    let mut controller = controller.with_interval_override(Some(45));

    assert_eq!(controller.start().body, "Mouse movement started (every 45s)");
    assert_eq!(ConfigStore::open(&path).interval(), 30);

    // An explicit choice from the menu replaces the override
    controller.set_interval(120);
    assert_eq!(controller.effective_interval(), 120);
}

#[test]
fn test_shutdown_mirrors_running_state() {
    let (_dir, path) = setup();
    {
        let (mut controller, _clock) = controller_at(&path, false, None);
        controller.start();
        controller.shutdown();
        assert!(!controller.is_running());
    }
    assert_eq!(ConfigStore::open(&path).last_state(), RunningState::Running);

    let (mut controller, _clock) = controller_at(&path, false, None);
    let restored = controller.restore_last_state();
    assert!(restored.is_some());
    assert!(controller.is_running());

    controller.stop();
    controller.shutdown();
    assert_eq!(ConfigStore::open(&path).last_state(), RunningState::Stopped);
}

#[test]
fn test_restore_when_stopped_does_nothing() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);
    assert!(controller.restore_last_state().is_none());
    assert!(!controller.is_running());
}

#[test]
fn test_auto_start_toggle_persists() {
    let (_dir, path) = setup();
    let fake = FakeAutoStart::default();
    let (mut controller, _clock) = controller_at(&path, false, Some(Box::new(fake.clone())));

    assert!(controller.auto_start_available());
    assert!(!controller.auto_start_enabled());

    let notice = controller.set_auto_start(true);
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(fake.registered.get());
    assert!(controller.auto_start_enabled());
    assert!(ConfigStore::open(&path).auto_start());

    controller.set_auto_start(false);
    assert!(!fake.registered.get());
    assert!(!ConfigStore::open(&path).auto_start());
}

#[test]
fn test_auto_start_failure_keeps_config() {
    let (_dir, path) = setup();
    let fake = FakeAutoStart {
        broken: true,
        ..Default::default()
    };
    let (mut controller, _clock) = controller_at(&path, false, Some(Box::new(fake)));

    let notice = controller.set_auto_start(true);
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.body.contains("access denied"));
    assert!(!ConfigStore::open(&path).auto_start());
}

#[test]
fn test_auto_start_unavailable() {
    let (_dir, path) = setup();
    let (mut controller, _clock) = controller_at(&path, false, None);

    assert!(!controller.auto_start_available());
    assert_eq!(controller.set_auto_start(true).level, NoticeLevel::Warning);
}

#[test]
fn test_reconcile_rewrites_registration() {
    let (_dir, path) = setup();
    let mut store = ConfigStore::open(&path);
    store.set_auto_start(true);
    assert!(store.commit());

    let fake = FakeAutoStart::default();
    let (mut controller, _clock) = controller_at(&path, false, Some(Box::new(fake.clone())));
    controller.reconcile_auto_start();

    assert!(fake.registered.get());
    assert_eq!(*fake.calls.borrow(), vec!["enable"]);
}

#[test]
fn test_reconcile_leaves_disabled_registration_alone() {
    let (_dir, path) = setup();
    let fake = FakeAutoStart::default();
    fake.registered.set(true);
    let (mut controller, _clock) = controller_at(&path, false, Some(Box::new(fake.clone())));

    controller.reconcile_auto_start();
    assert!(fake.calls.borrow().is_empty());
}

#[test]
fn test_auto_start_state_is_cached() {
    let (_dir, path) = setup();
    let fake = FakeAutoStart::default();
    fake.registered.set(true);
    let (mut controller, _clock) = controller_at(&path, false, Some(Box::new(fake.clone())));
    controller.reconcile_auto_start();
    let queries = fake.queries.get();

    for _ in 0..10 {
        assert!(controller.auto_start_enabled());
    }
    controller.set_auto_start(false);
    assert!(!controller.auto_start_enabled());
    controller.set_auto_start(true);
    assert!(controller.auto_start_enabled());

    assert_eq!(fake.queries.get(), queries, "Reading the state must not query the OS");
}

#[test]
fn test_session_elapsed_follows_engine_clock() {
    let (_dir, path) = setup();
    let (mut controller, clock) = controller_at(&path, false, None);
    assert_eq!(controller.session_elapsed(), None);

    controller.start();
    clock.advance_secs(95);
    assert_eq!(controller.session_elapsed(), Some(Duration::from_secs(95)));

    controller.stop();
    assert_eq!(controller.session_elapsed(), None);
}

#[test]
fn test_failure_notices_escalate() {
    let (_dir, path) = setup();
    let (mut controller, clock) = controller_at(&path, true, None);
    controller.start();

    for _ in 0..2 {
        clock.advance_secs(30);
        assert_eq!(controller.poll(), None, "Early failures stay quiet");
    }

    for _ in 0..2 {
        clock.advance_secs(30);
        let notice = controller.poll().expect("warning notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.body.contains("blocked by compositor"));
    }

    clock.advance_secs(30);
    let notice = controller.poll().expect("auto-stop notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Auto-Stopped");
    assert!(!controller.is_running());
    assert!(!controller.snapshot().is_running);
}

#[test]
fn test_successful_ticks_are_silent() {
    let (_dir, path) = setup();
    let (mut controller, clock) = controller_at(&path, false, None);
    controller.start();

    for _ in 0..3 {
        clock.advance_secs(30);
        assert_eq!(controller.poll(), None);
    }
    assert_eq!(controller.snapshot().movement_count, 3);
}
