#![cfg(feature = "bench")]

mod move_generation {
    use criterion::Criterion;
    use quantik::board::Board;
    use quantik::hand::Hand;
    use quantik::moves;
    use quantik::piece::Side;
    use quantik::quantik_board;

    fn get_board_states() -> Vec<Board> {
        use quantik::piece::Shape::{A, B, C, D};
        vec![
            Board::new(),
            quantik_board! { (0, 0) => (A, Side::Blue) },
            quantik_board! { (0, 1) => (A, Side::Red) },
            quantik_board! {
                (0, 0) => (A, Side::Blue),
                (0, 1) => (B, Side::Blue),
                (0, 2) => (C, Side::Blue),
                (1, 0) => (C, Side::Red),
                (2, 1) => (D, Side::Red),
                (2, 2) => (B, Side::Red),
            },
        ]
    }

    pub fn bench_generation(c: &mut Criterion) {
        let boards = get_board_states();
        let hand = Hand::new_full();

        c.bench_function("moves::exhaustive_moves", |b| {
            b.iter(|| {
                for board in &boards {
                    moves::exhaustive_moves(board, &hand, Side::Blue);
                }
            });
        });

        c.bench_function("moves::canonical_moves", |b| {
            b.iter(|| {
                for board in &boards {
                    moves::canonical_moves(board, &hand, Side::Blue);
                }
            });
        });
    }
}

mod search {
    use criterion::Criterion;
    use quantik::board::Board;
    use quantik::hand::Hand;
    use quantik::mcts;
    use quantik::minimax;
    use quantik::piece::Side;
    use quantik::quantik_board;

    const ITERATIONS: [u32; 2] = [500, 2_000];

    pub fn bench_mcts(c: &mut Criterion) {
        let board = Board::new();
        let blue = Hand::new_full();
        let red = Hand::new_full();

        let mut group = c.benchmark_group("mcts::search(empty_board)");
        group.sample_size(10);
        for iterations in ITERATIONS {
            let config = mcts::Config {
                iterations,
                ..mcts::Config::default()
            };
            group.bench_function(format!("iterations={iterations}"), |b| {
                b.iter(|| mcts::search(&board, &blue, &red, Side::Blue, &config));
            });
        }
    }

    pub fn bench_minimax(c: &mut Criterion) {
        use quantik::hand::HandsBySide;
        use quantik::piece::Shape::{A, B, C, D};

        let board = quantik_board! {
            (0, 0) => (A, Side::Blue),
            (0, 1) => (B, Side::Blue),
            (0, 2) => (C, Side::Blue),
            (1, 0) => (C, Side::Red),
            (2, 1) => (D, Side::Red),
            (2, 2) => (B, Side::Red),
        };
        let hands = HandsBySide::new(
            Side::Blue,
            &Hand::from_shapes(vec![A, B, C, D]),
            &Hand::from_shapes(vec![A, B, C, D]),
        );

        c.bench_function("minimax::decide(s4_forced_win)", |b| {
            b.iter(|| minimax::decide(&board, &hands, Side::Blue, Side::Blue));
        });
    }
}

criterion::criterion_group!(
    benches,
    move_generation::bench_generation,
    search::bench_mcts,
    search::bench_minimax,
);
criterion::criterion_main!(benches);
