use std::fs;

use homegame_engine::board::Stage;
use homegame_engine::cards::parse_cards;
use homegame_engine::logger::{ActionRecord, HandLogger, HandRecord};
use homegame_engine::player::{PlayerAction, PlayerId};
use homegame_engine::repository::{GameId, InMemoryRepository};
use homegame_engine::service::GameService;
use homegame_engine::settings::EngineSettings;

fn record(hand_id: &str) -> HandRecord {
    HandRecord {
        hand_id: hand_id.to_string(),
        game_id: GameId::new("123456"),
        seed: Some(1),
        big_blind: 100,
        dealer: 0,
        seats: vec![],
        actions: vec![ActionRecord {
            seat: 0,
            stage: Stage::Preflop,
            action: PlayerAction::Call,
        }],
        board: parse_cards("Ac").unwrap(),
        payouts: vec![],
        refunds: vec![],
        ts: None,
        showdown: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&record("20250102-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/ts.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&record("20250102-000010")).unwrap();
    let mut fixed = record("20250102-000011");
    fixed.ts = Some("2025-01-02T03:04:05Z".to_string());
    logger.write(&fixed).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<HandRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ts.as_deref().is_some_and(|t| t.ends_with('Z')));
    assert_eq!(lines[1].ts.as_deref(), Some("2025-01-02T03:04:05Z"));
}

#[test]
fn append_keeps_earlier_hands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("append.jsonl");
    HandLogger::create(&path)
        .unwrap()
        .write(&record("a"))
        .unwrap();
    HandLogger::append(&path)
        .unwrap()
        .write(&record("b"))
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn service_writes_one_line_per_finished_hand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    let settings = EngineSettings {
        seed: Some(77),
        history_path: Some(path.clone()),
        ..EngineSettings::default()
    };
    let svc = GameService::new(InMemoryRepository::new(), settings).unwrap();
    let game = svc.create_game().unwrap();
    let ids: Vec<PlayerId> = ["Ann", "Bo", "Cy"]
        .iter()
        .map(|n| svc.add_player(&game, *n, 1000).unwrap())
        .collect();

    svc.deal(&game).unwrap();
    svc.fold(&game, &ids[0]).unwrap();
    // in flight: nothing written yet
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    svc.fold(&game, &ids[1]).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let rec: HandRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(rec.game_id, game);
    assert_eq!(rec.seed, Some(77));
    assert_eq!(rec.seats[1].name, "Bo");
    assert_eq!(rec.actions.len(), 2);
    assert!(rec
        .actions
        .iter()
        .all(|a| a.action == PlayerAction::Fold && a.stage == Stage::Preflop));
    assert_eq!(rec.payouts.len(), 1);
    assert_eq!(rec.payouts[0].seat, 2);
    assert_eq!(rec.payouts[0].amount, 150);
    let showdown = rec.showdown.expect("showdown info");
    assert_eq!(showdown.winners, vec![2]);
    assert_eq!(showdown.hands.len(), 1);
    assert!(rec.ts.is_some());
}

#[test]
fn hand_ids_use_logger_sequence() {
    let svc = GameService::new(
        InMemoryRepository::new(),
        EngineSettings {
            seed: Some(5),
            ..EngineSettings::default()
        },
    )
    .unwrap()
    .with_hand_logger(HandLogger::with_seq_for_test("20250301"));
    let game = svc.create_game().unwrap();
    svc.add_player(&game, "a", 500).unwrap();
    svc.add_player(&game, "b", 500).unwrap();
    svc.deal(&game).unwrap();
    assert_eq!(svc.last_hand(&game).unwrap().hand_id, "20250301-000001");
    svc.undeal(&game).unwrap();
    assert!(svc.last_hand(&game).is_none());
    svc.deal(&game).unwrap();
    assert_eq!(svc.last_hand(&game).unwrap().hand_id, "20250301-000002");
}
