use std::thread;
use std::time::Duration;

use coach_engine::{ChessRules, Difficulty, EngineConfig, EngineError, EngineHost, HostPoll, Outcome, Position};
use cozy_chess::Color;

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn roomy_host(seed: u64) -> EngineHost {
    let _ = env_logger::builder().is_test(true).try_init();
    EngineHost::seeded(EngineConfig::default(), seed).with_budget(Duration::from_secs(30))
}

#[test]
fn move_request_completes() {
    let mut host = roomy_host(1);
    let pending = host.submit_move(START, Difficulty::Medium).unwrap();
    match pending.wait() {
        Outcome::Completed(Some(mv)) => assert!(Position::startpos().legal_moves().contains(&mv)),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn newer_request_supersedes_older() {
    let mut host = roomy_host(2);
    let first = host.submit_move(START, Difficulty::Easy).unwrap();
    let second = host.submit_move(START, Difficulty::Easy).unwrap();
    assert!(second.token() > first.token());
    assert_eq!(host.latest_token(), second.token());
    assert_eq!(first.wait(), Outcome::Superseded);
    assert!(matches!(second.wait(), Outcome::Completed(Some(_))));
}

#[test]
fn cancel_all_makes_requests_stale() {
    let mut host = roomy_host(3);
    let pending = host.submit_suggestions(START, Color::White, 3).unwrap();
    host.cancel_all();
    assert_eq!(pending.wait(), Outcome::Superseded);
}

#[test]
fn watchdog_returns_the_fallback() {
    let mut host = EngineHost::seeded(EngineConfig::default(), 4).with_budget(Duration::from_millis(20));
    let pending = host.submit_job(7u32, |_| {
        thread::sleep(Duration::from_millis(500));
        1
    });
    assert_eq!(pending.wait(), Outcome::TimedOut(7));
}

#[test]
fn panicking_worker_falls_back() {
    let mut host = roomy_host(5);
    let pending = host.submit_job(3i32, |_| -> i32 { panic!("worker blew up") });
    assert_eq!(pending.wait(), Outcome::TimedOut(3));
}

#[test]
fn late_or_not_the_move_is_legal() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let pos = Position::from_fen(fen).unwrap();
    let mut host = EngineHost::seeded(EngineConfig::default(), 6).with_budget(Duration::from_millis(1));
    match host.submit_move(fen, Difficulty::Expert).unwrap().wait() {
        Outcome::Completed(Some(mv)) | Outcome::TimedOut(Some(mv)) => assert!(pos.legal_moves().contains(&mv)),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn finished_game_completes_with_nothing() {
    let mut host = roomy_host(7);
    let pending = host.submit_move("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1", Difficulty::Hard).unwrap();
    assert_eq!(pending.wait(), Outcome::Completed(None));
}

#[test]
fn invalid_fen_fails_before_dispatch() {
    let mut host = roomy_host(8);
    let before = host.latest_token();
    assert!(matches!(host.submit_move("not a fen", Difficulty::Easy), Err(EngineError::InvalidFen { .. })));
    assert_eq!(host.latest_token(), before);
}

#[test]
fn polling_reaches_ready() {
    let mut host = roomy_host(9);
    let mut pending = host.submit_suggestions(START, Color::White, 4).unwrap();
    let outcome = loop {
        match pending.poll() {
            HostPoll::Pending => thread::sleep(Duration::from_millis(5)),
            HostPoll::Ready(o) => break o,
        }
    };
    match outcome {
        Outcome::Completed(hints) => assert_eq!(hints.len(), 4),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(pending.poll(), HostPoll::Ready(Outcome::Superseded));
}
