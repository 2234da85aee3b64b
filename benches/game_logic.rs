use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fallblock::core::{
    Board, Game, GameConfig, HeadlessRenderer, ManualClock, NullAudio, Shape, TimerQueue,
};
use fallblock::types::{Direction, GameAction, PieceKind, Spin};

fn new_game() -> Game<HeadlessRenderer, TimerQueue> {
    let mut game = Game::new(
        GameConfig::default(),
        12345,
        HeadlessRenderer::new(),
        TimerQueue::new(),
        Box::new(NullAudio),
        Box::new(ManualClock::new(0)),
    );
    game.new_game();
    game
}

fn bench_tick(c: &mut Criterion) {
    let mut game = new_game();
    let mut now = 0;

    c.bench_function("pump_one_tick", |b| {
        b.iter(|| {
            now += 1000;
            if game.is_lost() {
                game.new_game();
            }
            game.pump(black_box(now));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::from_rows(&[
                "##########",
                "##########",
                "##########",
                "##########",
            ]);
            let rows = board.full_rows();
            board.clear_rows(black_box(&rows));
            board
        })
    });
}

fn bench_can_place(c: &mut Criterion) {
    let board = Board::from_rows(&["#.#.#.#.#.", "##.##.##.#"]);
    let shape = Shape::canonical(PieceKind::T);

    c.bench_function("can_place", |b| {
        b.iter(|| board.can_place(black_box(&shape), black_box(20), black_box(3)))
    });
}

fn bench_shift(c: &mut Criterion) {
    let mut game = new_game();
    let mut right = true;

    c.bench_function("shift_lateral", |b| {
        b.iter(|| {
            let dir = if right { Direction::Right } else { Direction::Left };
            right = !right;
            game.apply_action(GameAction::Shift(black_box(dir)));
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut game = new_game();

    c.bench_function("rotate", |b| {
        b.iter(|| {
            game.apply_action(GameAction::Rotate(black_box(Spin::Cw)));
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("snap_until_loss", |b| {
        b.iter(|| {
            let mut game = new_game();
            let mut now = 0;
            while !game.is_lost() {
                game.apply_action(GameAction::Snap(Direction::Down));
                now += 1000;
                game.pump(now);
            }
            game.score()
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_can_place,
    bench_shift,
    bench_rotate,
    bench_full_game
);
criterion_main!(benches);
