use std::sync::{Arc, Mutex};
use watchdesk_core::{
    command::PlayerCommand,
    config::EconomyConfig,
    engine::GameEngine,
    error::{SimError, SimResult},
    event::{EventLogEntry, GameEvent},
    rng::SimRng,
    state::GameState,
    store::{FileSave, SaveBackend, SaveStore},
    trade::TradeRejection,
};

/// Shared in-memory backend so the test can look inside after the
/// engine has taken ownership.
#[derive(Clone, Default)]
struct MemoryBackend {
    save:    Arc<Mutex<Option<String>>>,
    journal: Arc<Mutex<Vec<EventLogEntry>>>,
    fail_writes: bool,
}

impl SaveBackend for MemoryBackend {
    fn write_save(&mut self, text: &str) -> SimResult<()> {
        if self.fail_writes {
            return Err(SimError::Io(std::io::Error::other("disk full")));
        }
        *self.save.lock().unwrap() = Some(text.to_string());
        Ok(())
    }

    fn read_save(&mut self) -> SimResult<Option<String>> {
        Ok(self.save.lock().unwrap().clone())
    }

    fn record_event(&mut self, entry: &EventLogEntry) -> SimResult<()> {
        self.journal.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

fn engine_with(backend: MemoryBackend, seed: u64) -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let state = GameState::start(EconomyConfig::default(), Box::new(SimRng::new(seed)));
    GameEngine::new(format!("engine-test-{seed}"), state, Some(Box::new(backend)))
}

#[test]
fn successful_trade_autosaves_and_journals() {
    let backend = MemoryBackend::default();
    let mut engine = engine_with(backend.clone(), 71);
    engine.state_mut().player_mut().cash = 1_000_000;

    engine.execute(PlayerCommand::Buy { index: 0 }).unwrap();

    let saved = backend.save.lock().unwrap().clone().expect("autosave written");
    assert_eq!(saved, engine.state().save());
    let journal = backend.journal.lock().unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].event_type, "item_purchased");
    assert_eq!(journal[0].run_id, "engine-test-71");
}

#[test]
fn rejected_command_is_not_saved_or_journalled() {
    let backend = MemoryBackend::default();
    let mut engine = engine_with(backend.clone(), 72);

    let result = engine.execute(PlayerCommand::QuickSellAll);

    assert_eq!(result, Err(TradeRejection::EmptyInventory));
    assert!(backend.save.lock().unwrap().is_none());
    assert!(backend.journal.lock().unwrap().is_empty());
}

#[test]
fn failed_writes_are_swallowed() {
    let backend = MemoryBackend {
        fail_writes: true,
        ..MemoryBackend::default()
    };
    let mut engine = engine_with(backend, 73);

    engine.execute(PlayerCommand::AdvanceDay).expect("day advances despite save failure");
    assert_eq!(engine.state().day(), 2);

    let event = engine.execute(PlayerCommand::Save).unwrap();
    assert!(matches!(event, GameEvent::GameSaved { persisted: false, .. }));
}

#[test]
fn load_restores_the_saved_game() {
    let backend = MemoryBackend::default();
    let mut engine = engine_with(backend.clone(), 74);
    engine.execute(PlayerCommand::AdvanceDay).unwrap();
    engine.execute(PlayerCommand::AdvanceDay).unwrap();
    engine.execute(PlayerCommand::Save).unwrap();
    let saved_cash = engine.state().cash();

    engine.state_mut().player_mut().cash = 1;
    let event = engine.execute(PlayerCommand::Load).unwrap();

    assert!(matches!(event, GameEvent::GameLoaded { day: 3, .. }));
    assert_eq!(engine.state().cash(), saved_cash);
}

#[test]
fn load_without_save_keeps_current_game() {
    let mut engine = engine_with(MemoryBackend::default(), 75);
    let before = engine.snapshot();

    let event = engine.execute(PlayerCommand::Load).unwrap();

    assert!(matches!(event, GameEvent::LoadFailed { .. }));
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn corrupt_save_is_reported_not_applied() {
    let backend = MemoryBackend::default();
    *backend.save.lock().unwrap() = Some("not,a,save".to_string());
    let mut engine = engine_with(backend, 76);
    let before = engine.snapshot();

    let event = engine.execute(PlayerCommand::Load).unwrap();

    let GameEvent::LoadFailed { reason } = event else {
        panic!("Expected LoadFailed, got {event:?}");
    };
    assert!(reason.contains("Corrupt save"), "Unexpected reason {reason:?}");
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn boot_resumes_an_existing_save() {
    let backend = MemoryBackend::default();
    *backend.save.lock().unwrap() =
        Some("12,3300,4\nI,watch,Tudor,,Good,2500,1900,Tudor auto\n".to_string());
    let mut engine = engine_with(backend, 77);

    let event = engine.boot().expect("save found at boot");

    assert!(matches!(event, GameEvent::GameLoaded { day: 12, items: 1, skipped: 0 }));
    assert_eq!(engine.state().cash(), 3_300);
    assert_eq!(engine.state().player().reputation, 4);
}

#[test]
fn engine_without_backend_reports_unpersisted_save() {
    let state = GameState::start(EconomyConfig::default(), Box::new(SimRng::new(78)));
    let mut engine = GameEngine::new("no-backend".into(), state, None);

    assert!(engine.boot().is_none());
    let event = engine.execute(PlayerCommand::Save).unwrap();
    assert!(matches!(event, GameEvent::GameSaved { persisted: false, .. }));
}

#[test]
fn sqlite_store_keeps_slots_and_journal() {
    let store = SaveStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    assert_eq!(store.get_slot("main").unwrap(), None);
    store.put_slot("main", "1,25000,0\n").unwrap();
    store.put_slot("main", "2,24990,0\n").unwrap();
    assert_eq!(store.get_slot("main").unwrap().as_deref(), Some("2,24990,0\n"));
    assert!(store.saved_at("main").unwrap().is_some());

    let entry = EventLogEntry {
        id:         None,
        run_id:     "store-test".into(),
        day:        2,
        event_type: "day_advanced".into(),
        payload:    "{}".into(),
    };
    store.append_event(&entry).unwrap();
    store.append_event(&entry).unwrap();
    assert_eq!(store.event_count("store-test").unwrap(), 2);
    let day_two = store.events_for_day("store-test", 2).unwrap();
    assert_eq!(day_two.len(), 2);
    assert!(day_two[0].id < day_two[1].id);
}

#[test]
fn sqlite_backend_uses_its_slot() {
    let store = SaveStore::in_memory().expect("in-memory store").with_slot("slot-b");
    store.migrate().expect("migration");
    let mut backend: Box<dyn SaveBackend> = Box::new(store);

    assert_eq!(backend.read_save().unwrap(), None);
    backend.write_save("3,100,0\n").unwrap();
    assert_eq!(backend.read_save().unwrap().as_deref(), Some("3,100,0\n"));
}

#[test]
fn file_backend_round_trips_through_disk() {
    let path = std::env::temp_dir().join(format!("watchdesk-{}.txt", uuid::Uuid::new_v4()));
    let mut backend = FileSave::new(path.clone());
    assert_eq!(backend.read_save().unwrap(), None, "Missing file reads as no save");

    let mut engine = engine_with(MemoryBackend::default(), 79);
    engine.execute(PlayerCommand::AdvanceDay).unwrap();
    backend.write_save(&engine.state().save()).unwrap();

    let text = backend.read_save().unwrap().expect("file written");
    assert!(text.starts_with("2,"), "Expected day 2 header, got {text:?}");
    let _ = std::fs::remove_file(&path);
}
