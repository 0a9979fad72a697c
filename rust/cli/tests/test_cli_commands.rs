use homegame_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["homegame"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn eval_scores_a_full_house() {
    let (code, out, _) = run_cli(&["eval", "Kh", "Kd", "Ks", "2c", "2d", "9h", "3s"]);
    assert_eq!(code, 0);
    assert!(out.contains("Category: Full House"));
    assert!(out.contains("Hand: Full House: Ks over 2s"));
}

#[test]
fn eval_wheel_is_five_high() {
    let (code, out, _) = run_cli(&["eval", "Ah", "2d", "3c", "4s", "5h"]);
    assert_eq!(code, 0);
    assert!(out.contains("Straight: 5 high"));
}

#[test]
fn eval_bad_card_exits_with_error() {
    let (code, out, err) = run_cli(&["eval", "Ah", "2d", "3c", "4s", "1h"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("Error: Invalid input:"));
}

#[test]
fn deal_prints_board_and_holes() {
    let (code, out, _) = run_cli(&["deal", "--players", "2", "--seed", "1"]);
    assert_eq!(code, 0);
    assert!(out.contains("Hole P1:"));
    assert!(out.contains("Hole P2:"));
    assert!(out.contains("Board:"));
    assert!(!out.contains("Hole P3:"));
}

#[test]
fn deal_is_reproducible_with_seed() {
    let a = run_cli(&["deal", "--players", "5", "--seed", "2024"]);
    let b = run_cli(&["deal", "--players", "5", "--seed", "2024"]);
    assert_eq!(a.0, 0);
    assert_eq!(a, b);
}

#[test]
fn deal_rejects_too_many_players() {
    let (code, _, err) = run_cli(&["deal", "--players", "24", "--seed", "1"]);
    assert_eq!(code, 2);
    assert!(err.contains("players must be between 2 and 23"));
}

#[test]
fn sim_reports_conservation() {
    let (code, out, err) = run_cli(&[
        "sim", "--hands", "15", "--players", "4", "--seed", "9", "--bots", "baseline,station",
    ]);
    assert_eq!(code, 0, "stderr: {err}");
    assert!(out.contains("Hands played:"));
    assert!(out.contains("Chip conservation: ok"));
}

#[test]
fn sim_appends_history_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    for _ in 0..2 {
        let (code, _, err) = run_cli(&[
            "sim", "--hands", "2", "--players", "3", "--seed", "4", "--bots", "station",
            "--output", &path_str,
        ]);
        assert_eq!(code, 0, "stderr: {err}");
    }
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
    let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(first["seed"].as_u64(), Some(4));
    assert_eq!(first["board"].as_array().map(Vec::len), Some(5));
}

#[test]
fn unknown_command_lists_available_commands() {
    let (code, _, err) = run_cli(&["shuffle"]);
    assert_eq!(code, 2);
    for c in ["eval", "deal", "sim", "cfg"] {
        assert!(err.contains(&format!("  {c}\n")), "missing {c}: {err}");
    }
}

#[test]
fn help_goes_to_stdout() {
    let (code, out, err) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("Usage"));
    assert!(err.is_empty());
}
