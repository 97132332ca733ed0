use coach_engine::search::alphabeta::{SearchParams, Searcher};
use coach_engine::search::ordering::{order_moves, order_score};
use coach_engine::{ChessRules, Position};

#[test]
fn queen_capture_is_tried_first() {
    let b = Position::from_fen("4k3/8/8/8/5Q2/8/8/2b4K b - - 0 1").expect("valid fen");
    let mut moves = b.legal_moves();
    order_moves(&mut moves);
    assert_eq!(moves[0].uci(), "c1f4");
    assert!(moves[1..].iter().all(|m| !m.is_capture()));
}

#[test]
fn cheaper_attacker_ranks_higher() {
    // Pawn and rook can both take the knight on d5.
    let b = Position::from_fen("4k3/8/8/3n4/4P3/8/8/3RK3 w - - 0 1").unwrap();
    let pawn = b.find_uci("e4d5").unwrap();
    let rook = b.find_uci("d1d5").unwrap();
    assert!(order_score(&pawn) > order_score(&rook));
}

#[test]
fn promotions_follow_captures() {
    let b = Position::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let mut moves = b.legal_moves();
    order_moves(&mut moves);
    assert!(moves[0].is_capture() && moves[0].promotion.is_some());
    let first_quiet = moves.iter().position(|m| m.promotion.is_none()).unwrap();
    assert!(moves[..first_quiet].iter().all(|m| m.promotion.is_some()));
}

#[test]
fn ordering_does_not_change_the_result() {
    let b = Position::from_fen("4k3/8/8/8/5Q2/8/8/2b4K b - - 0 1").unwrap();
    let plain = SearchParams { depth: 3, pruning: true, order_moves: false };
    let ordered = SearchParams { order_moves: true, ..plain };
    let r1 = Searcher::default().search_with_params(&b, plain);
    let r2 = Searcher::default().search_with_params(&b, ordered);
    assert_eq!(r1.score_cp, r2.score_cp);
    assert_eq!(r2.bestmove.map(|m| m.uci()), Some("c1f4".to_string()));
}
