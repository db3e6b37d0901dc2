use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use arcade_host::offline::{AssetCache, CacheReport, OfflineCacheError};
use arcade_host::scores::DEFAULT_STORAGE_KEY;
use arcade_host::{
    AppPorts, BootstrapError, Bootstrapper, EmbeddableApp, HighScoreStore, HostPage, HostWindow,
    Leaderboard, LocalStorage, MemoryStorage, MountPoint, ScoreEntry, WindowEventKind,
};
use kuchiki::NodeRef;
use winit::event::WindowEvent;

const PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
        <head><title>Arcade</title></head>
        <body><div id="root"></div></body>
    </html>
"#;

/// Stand-in for the compiled game: records everything the host sends it.
#[derive(Default)]
struct FakeGame {
    blurs: Rc<RefCell<Vec<String>>>,
    boards: Rc<RefCell<Vec<Leaderboard>>>,
}

impl EmbeddableApp for FakeGame {
    fn embed(&self, mount: &MountPoint) -> Result<AppPorts> {
        mount.node().append(NodeRef::new_text("game running"));

        let ports = AppPorts::default();
        let blurs = Rc::clone(&self.blurs);
        ports
            .window_blur
            .subscribe(move |payload: &String| blurs.borrow_mut().push(payload.clone()));
        let boards = Rc::clone(&self.boards);
        ports
            .receive_scores
            .subscribe(move |board: &Leaderboard| boards.borrow_mut().push(board.clone()));
        Ok(ports)
    }
}

struct BrokenGame;

impl EmbeddableApp for BrokenGame {
    fn embed(&self, _mount: &MountPoint) -> Result<AppPorts> {
        Err(anyhow!("flags decoder rejected host input"))
    }
}

struct FailingCache;

impl AssetCache for FailingCache {
    fn register(&self) -> Result<CacheReport, OfflineCacheError> {
        Err(OfflineCacheError::DataDir)
    }
}

fn memory_store() -> Rc<HighScoreStore<Rc<MemoryStorage>>> {
    Rc::new(HighScoreStore::new(
        Rc::new(MemoryStorage::new()),
        DEFAULT_STORAGE_KEY,
    ))
}

fn count_sends<T: 'static>(port: &arcade_host::Port<T>) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let inner = Rc::clone(&count);
    port.subscribe(move |_: &T| *inner.borrow_mut() += 1);
    count
}

#[test]
fn mounts_into_root_element() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let game = FakeGame::default();

    Bootstrapper::new("root")
        .start(&page, &window, &game, memory_store())
        .expect("startup");

    let mount = page.mount_point("root").unwrap();
    assert_eq!(mount.text_contents(), "game running");
    assert_eq!(window.listener_count(WindowEventKind::Blur), 1);
}

#[test]
fn each_blur_sends_one_empty_message() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let game = FakeGame::default();
    let ports = Bootstrapper::new("root")
        .start(&page, &window, &game, memory_store())
        .unwrap();

    let saves = count_sends(&ports.save_score);
    let queries = count_sends(&ports.get_scores);
    let replies = count_sends(&ports.receive_scores);

    window.handle_window_event(&WindowEvent::Focused(false));
    window.handle_window_event(&WindowEvent::Focused(true));
    window.handle_window_event(&WindowEvent::Focused(false));

    assert_eq!(*game.blurs.borrow(), vec![String::new(), String::new()]);
    assert_eq!(*saves.borrow(), 0);
    assert_eq!(*queries.borrow(), 0);
    assert_eq!(*replies.borrow(), 0);
    assert!(game.boards.borrow().is_empty());
}

#[test]
fn missing_mount_point_aborts_startup() {
    let page = HostPage::parse("<html><body><div id=\"app\"></div></body></html>");
    let window = HostWindow::new();
    let game = FakeGame::default();

    let err = Bootstrapper::new("root")
        .start(&page, &window, &game, memory_store())
        .unwrap_err();

    assert!(matches!(err, BootstrapError::MissingMountPoint(ref id) if id == "root"));
    assert_eq!(window.listener_count(WindowEventKind::Blur), 0);
}

#[test]
fn embed_failure_aborts_startup() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();

    let err = Bootstrapper::new("root")
        .start(&page, &window, &BrokenGame, memory_store())
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Embed(_)));
    assert!(err.to_string().contains("flags decoder"));
}

#[test]
fn failing_asset_cache_does_not_block_startup() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let game = FakeGame::default();

    let ports = Bootstrapper::new("root")
        .with_asset_cache(FailingCache)
        .start(&page, &window, &game, memory_store())
        .expect("startup despite cache failure");

    ports.get_scores.send(());
    assert_eq!(game.boards.borrow().len(), 1);
}

#[test]
fn game_saves_and_reads_scores_through_ports() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let game = FakeGame::default();
    let store = memory_store();
    let ports = Bootstrapper::new("root")
        .start(&page, &window, &game, Rc::clone(&store))
        .unwrap();

    ports.save_score.send(("A".into(), 5));
    ports.save_score.send(("B".into(), 9));
    ports.get_scores.send(());

    let boards = game.boards.borrow();
    assert_eq!(boards.len(), 3);
    assert_eq!(boards[0].entries(), &[ScoreEntry::new("A", 5)]);
    assert_eq!(
        boards[2].entries(),
        &[ScoreEntry::new("B", 9), ScoreEntry::new("A", 5)]
    );
    assert!(store.storage().get_item(DEFAULT_STORAGE_KEY).unwrap().is_some());
}

#[test]
fn unavailable_storage_drops_saves_but_answers_queries() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let game = FakeGame::default();
    let storage = Rc::new(MemoryStorage::unavailable());
    let store = Rc::new(HighScoreStore::new(Rc::clone(&storage), DEFAULT_STORAGE_KEY));
    let ports = Bootstrapper::new("root")
        .start(&page, &window, &game, store)
        .unwrap();

    ports.save_score.send(("A".into(), 5));
    assert!(game.boards.borrow().is_empty());

    ports.get_scores.send(());
    let boards = game.boards.borrow();
    assert_eq!(boards.len(), 1);
    assert!(boards[0].is_empty());

    storage.set_available(true);
    assert!(storage.is_empty());
}

#[test]
fn closure_can_be_embedded() {
    let page = HostPage::parse(PAGE);
    let window = HostWindow::new();
    let mounted = Rc::new(RefCell::new(None));

    let recorder = Rc::clone(&mounted);
    let app = move |mount: &MountPoint| -> Result<AppPorts> {
        *recorder.borrow_mut() = Some(mount.id().to_string());
        Ok(AppPorts::default())
    };

    let ports = Bootstrapper::new("root")
        .start(&page, &window, &app, memory_store())
        .unwrap();

    assert_eq!(mounted.borrow().as_deref(), Some("root"));
    assert_eq!(window.dispatch(WindowEventKind::Blur), 1);
    assert_eq!(ports.save_score.subscriber_count(), 1);
    assert_eq!(ports.get_scores.subscriber_count(), 1);
}
