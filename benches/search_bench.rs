use criterion::{criterion_group, criterion_main, Criterion, black_box};
use coach_engine::search::alphabeta::{SearchParams, Searcher};
use coach_engine::{ChessRules, Difficulty, Engine, EngineConfig, Position};

fn bench_search(c: &mut Criterion) {
    let b = Position::startpos();
    c.bench_function("search_depth_3_startpos", |ben| {
        ben.iter(|| {
            let mut s = Searcher::default();
            let p = SearchParams { depth: 3, ..SearchParams::default() };
            let r = s.search_with_params(black_box(&b), p);
            black_box(r.nodes)
        })
    });
}

fn bench_select_move(c: &mut Criterion) {
    let b = Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").expect("valid fen");
    let mut engine = Engine::seeded(EngineConfig::default(), 7);
    let mut group = c.benchmark_group("select_move");
    group.sample_size(10);
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        group.bench_function(d.name(), |ben| {
            ben.iter(|| black_box(engine.select_move_in(black_box(&b), d)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search, bench_select_move);
criterion_main!(benches);
