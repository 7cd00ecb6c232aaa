//! End-to-end run against a scripted UCI engine.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// MultiPV 3 本を返す最小の UCI エンジン
const FAKE_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  case "$line" in
    uci)
      echo "id name FakeFish 1"
      echo "id author Tester"
      echo "option name MultiPV type spin default 1 min 1 max 500"
      echo "option name Hash type spin default 16 min 1 max 1024"
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    go*)
      echo "info string searching"
      echo "info depth 8 multipv 1 score cp 30 nodes 1000 pv e2e4 e7e5 g1f3"
      echo "info depth 8 multipv 2 score cp 25 nodes 1000 pv d2d4 e7e5 d4e5 f7f6 e5f6"
      echo "info depth 8 multipv 3 score cp -200 nodes 1000 pv g2g4 d7d5"
      echo "bestmove e2e4 ponder e7e5"
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#;

/// 最初の go で落ち、再起動後は普通に応答するエンジン。起動回数を launches に記録する
const CRASHING_ENGINE: &str = r#"#!/bin/sh
dir=$(dirname "$0")
echo start >> "$dir/launches"
while read -r line; do
  case "$line" in
    uci)
      echo "id name Crashy"
      echo "id author Tester"
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    go*)
      if [ ! -f "$dir/crashed" ]; then
        touch "$dir/crashed"
        exit 1
      fi
      echo "info depth 1 multipv 1 score cp 10 pv d2d4"
      echo "bestmove d2d4"
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#;

fn install_engine(dir: &Path, script: &str) -> PathBuf {
    let engine = dir.join("engine.sh");
    std::fs::write(&engine, script).unwrap();
    std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();
    engine
}

fn run_proxy(engine: &Path, script: &str) -> String {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("aggro-uci"))
        .arg(engine)
        .write_stdin(script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).into_owned()
}

fn bestmoves(stdout: &str) -> Vec<&str> {
    stdout.lines().filter_map(|l| l.strip_prefix("bestmove ")).collect()
}

#[test]
fn proxy_reranks_scripted_engine_lines() {
    let dir = tempfile::tempdir().unwrap();
    let engine = install_engine(dir.path(), FAKE_ENGINE);

    let stdout = run_proxy(
        &engine,
        "uci\nsetoption name Hash value 32\nisready\nucinewgame\nposition startpos\ngo depth 8\nquit\n",
    );

    assert!(stdout.contains("info string wrapping FakeFish 1 by Tester"), "stdout:\n{stdout}");
    assert!(stdout.contains("info string candidate e2e4 score 30"), "stdout:\n{stdout}");
    assert!(stdout.contains("info string candidate d2d4 score 25"), "stdout:\n{stdout}");
    // -200 は MaxLoss 50 を超えるので候補にならない
    assert!(!stdout.contains("candidate g2g4"), "stdout:\n{stdout}");

    // 2 番目の線は取りとキング付近への前進を含むので、エンジンの e2e4 より優先される
    let d4 = stdout.find("candidate d2d4").unwrap();
    let e4 = stdout.find("candidate e2e4").unwrap();
    assert!(d4 < e4, "candidates not ordered by attacking score:\n{stdout}");
    assert_eq!(bestmoves(&stdout), vec!["d2d4"], "stdout:\n{stdout}");
}

#[test]
fn crashed_engine_is_relaunched() {
    let dir = tempfile::tempdir().unwrap();
    let engine = install_engine(dir.path(), CRASHING_ENGINE);

    let stdout = run_proxy(
        &engine,
        "isready\nposition startpos\ngo depth 1\nisready\ngo depth 1\nucinewgame\nisready\nquit\n",
    );

    assert!(stdout.contains("info string Engine exited unexpectedly"), "stdout:\n{stdout}");
    let moves = bestmoves(&stdout);
    assert_eq!(moves.len(), 2, "stdout:\n{stdout}");
    // 2 回目の go は再起動したエンジンの手
    assert_eq!(moves[1], "d2d4", "stdout:\n{stdout}");
    assert!(stdout.contains("info string candidate d2d4 score 10"), "stdout:\n{stdout}");
    assert_eq!(stdout.matches("readyok").count(), 3, "stdout:\n{stdout}");
    assert!(!stdout.contains("Broken pipe"), "stdout:\n{stdout}");

    let launches = std::fs::read_to_string(dir.path().join("launches")).unwrap();
    assert_eq!(launches.lines().count(), 2, "launches:\n{launches}");
}
