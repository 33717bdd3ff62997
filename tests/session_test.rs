use std::fs;
use votewheel::spinner::{self, SpinState};
use votewheel::state::{spawn_window_watcher, WheelExport};
use votewheel::{VotePhase, WheelConfig, WheelError, WheelState};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "votewheel=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// End-to-end flow: open a window, collect merging chat votes, edit the
/// table, spin the wheel, snapshot to disk and restore.
#[tokio::test]
async fn test_full_session_flow() {
    init_tracing();
    let state = WheelState::default();

    // 1. Voting closed: chat is ignored
    assert_eq!(state.on_chat_message("early_bird", "pizza").await, None);
    assert!(state.top_n().await.is_empty());

    // 2. Open the window and collect votes
    state.start_vote().await;
    assert_eq!(state.phase().await, VotePhase::VotingOpen);

    state.on_chat_message("Alice", "Pizza").await;
    state.on_chat_message("bob", " pizza ").await;
    state.on_chat_message("carol", "PIZZA!!").await;
    state.on_chat_message("dave", "do a backflip").await;
    state.on_chat_message("erin", "backflip").await;

    let top = state.top_n().await;
    assert_eq!(
        top,
        vec![
            ("pizza".to_string(), 3),
            ("do a backflip".to_string(), 2),
        ]
    );

    // 3. Re-vote moves a ballot without changing the total
    let total_before = state.total_votes().await;
    state.on_chat_message("carol", "do a backflip").await;
    assert_eq!(state.total_votes().await, total_before);
    assert_eq!(
        state.top_n().await,
        vec![
            ("do a backflip".to_string(), 3),
            ("pizza".to_string(), 2),
        ]
    );

    // 4. Manual edits work while voting is open
    let added = state.add_phrase("Sing a Song").await.unwrap();
    assert_eq!(added, "sing a song");
    state.set_count("sing a song", 4).await.unwrap();
    assert_eq!(
        state.top_n().await,
        vec![
            ("sing a song".to_string(), 4),
            ("do a backflip".to_string(), 3),
            ("pizza".to_string(), 2),
        ],
        "manual counts rank alongside live buckets"
    );

    // 5. The wheel sees the ranked entries
    let entries = state.wheel_entries().await;
    let segments = spinner::layout(&entries);
    assert_eq!(segments.len(), 3);
    let total_extent: f64 = segments.iter().map(|s| s.extent_deg).sum();
    assert!((total_extent - 360.0).abs() < 1e-6);

    let mut spin = SpinState::default();
    spin.spin();
    while spin.tick() {}
    let pointer = spinner::pointer_details(&entries, spin.rotation)
        .expect("a settled wheel with segments always has a pointer result");
    assert!(entries.iter().any(|e| e.phrase == pointer.phrase));

    // 6. Snapshot to disk and restore into a fresh engine
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segments.json");
    let snapshot = state.export_state().await;
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    let loaded: WheelExport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let restored = WheelState::default();
    restored.import_state(loaded).await.unwrap();

    assert_eq!(restored.rows().await, state.rows().await);
    assert_eq!(
        restored.voters_of("do a backflip").await.unwrap(),
        state.voters_of("do a backflip").await.unwrap()
    );

    // restored users keep their one-vote-per-user semantics
    restored.start_vote().await;
    restored.on_chat_message("carol", "pizza").await;
    assert_eq!(restored.total_votes().await, state.total_votes().await);

    // 7. Stop early, then reset for a new session
    state.stop_vote().await;
    assert_eq!(state.phase().await, VotePhase::Idle);
    assert_eq!(state.on_chat_message("late_vote", "pizza").await, None);

    state.reset().await;
    assert!(state.top_n().await.is_empty());
}

/// A vote arriving after the window duration has elapsed is rejected even
/// when nothing else polled the session in between.
#[tokio::test]
async fn test_expired_window_rejects_votes() {
    init_tracing();
    let state = WheelState::new(WheelConfig {
        vote_duration_secs: 0,
        ..WheelConfig::default()
    });

    state.start_vote().await;

    // the deadline has already passed; the chat path must close the window
    assert_eq!(state.on_chat_message("alice", "pizza").await, None);
    assert_eq!(state.phase().await, VotePhase::Idle);
    assert!(state.top_n().await.is_empty());
}

/// The watcher task closes the window with no chat traffic at all.
#[tokio::test]
async fn test_watcher_closes_silent_window() {
    init_tracing();
    let state = WheelState::new(WheelConfig {
        vote_duration_secs: 0,
        ..WheelConfig::default()
    });

    state.start_vote().await;
    let watcher = spawn_window_watcher(state.clone());

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;
    assert_eq!(state.phase().await, VotePhase::Idle);

    watcher.abort();
}

/// Errors from manual edits are recoverable and leave the ledger usable.
#[tokio::test]
async fn test_edit_errors_are_recoverable() {
    init_tracing();
    let state = WheelState::default();
    state.start_vote().await;
    state.on_chat_message("alice", "pizza").await;

    assert!(matches!(
        state.set_count("no such row", 3).await,
        Err(WheelError::NotFound(_))
    ));
    assert!(matches!(
        state.add_phrase("???").await,
        Err(WheelError::InvalidInput(_))
    ));

    // ledger unaffected by the failed edits
    assert_eq!(state.top_n().await, vec![("pizza".to_string(), 1)]);
}
