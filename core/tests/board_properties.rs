use minegrid_core::*;

fn fixed(size: Coord2, mines: &[Coord2], cascade_flags: CascadeFlags) -> Board {
    let layout = MineLayout::from_mine_coords(size, mines).unwrap();
    Board::from_layout(&layout, cascade_flags).unwrap()
}

fn brute_force_count(board: &Board, (row, column): Coord2) -> u8 {
    let (rows, columns) = board.size();
    let mut count = 0;
    for d_row in -1i32..=1 {
        for d_column in -1i32..=1 {
            if d_row == 0 && d_column == 0 {
                continue;
            }
            let r = i32::from(row) + d_row;
            let c = i32::from(column) + d_column;
            if r < 0 || c < 0 || r >= i32::from(rows) || c >= i32::from(columns) {
                continue;
            }
            if board.cell_at((r as Coord, c as Coord)).unwrap().is_mine() {
                count += 1;
            }
        }
    }
    count
}

fn first_cell(board: &Board, pred: impl Fn(Cell) -> bool) -> Option<Coord2> {
    board
        .cells()
        .find(|&(_, cell)| pred(cell))
        .map(|(coords, _)| coords)
}

#[test]
fn constructed_boards_have_exact_mine_count() {
    let configs = [(1, 2, 1), (5, 5, 24), (9, 9, 10), (16, 16, 40), (16, 30, 99)];
    for (seed, &(rows, columns, mines)) in configs.iter().enumerate() {
        let board = Board::with_seed(BoardConfig::new(rows, columns, mines).unwrap(), seed as u64)
            .unwrap();

        let placed = board.cells().filter(|(_, cell)| cell.is_mine()).count();
        assert_eq!(placed, usize::from(mines));
        assert_eq!(board.mine_count(), mines);
    }

    let board = Board::new(BoardConfig::default()).unwrap();
    assert_eq!(board.cells().filter(|(_, cell)| cell.is_mine()).count(), 40);
}

#[test]
fn invalid_configurations_are_rejected() {
    for (rows, columns, mines) in [(3, 3, 0), (3, 3, 9), (3, 3, 200), (0, 0, 1), (1, 1, 1)] {
        let config = BoardConfig::new_unchecked(rows, columns, mines);
        assert_eq!(
            Board::new(config),
            Err(GameError::InvalidConfiguration {
                rows,
                columns,
                mines
            })
        );
    }
}

#[test]
fn adjacency_on_hand_placed_board() {
    let board = fixed((3, 3), &[(0, 0), (2, 2)], CascadeFlags::Clear);

    assert_eq!(board.cell_at((1, 1)).unwrap().adjacent_mine_count(), 2);
    let expected = [[None, Some(1), Some(0)], [Some(1), Some(2), Some(1)], [Some(0), Some(1), None]];
    for (row, expected_row) in expected.iter().enumerate() {
        for (column, &count) in expected_row.iter().enumerate() {
            let cell = board.cell_at((row as Coord, column as Coord)).unwrap();
            match count {
                Some(count) => assert_eq!(cell.adjacent_mine_count(), count),
                None => assert!(cell.is_mine()),
            }
        }
    }
}

#[test]
fn adjacency_matches_brute_force_on_random_boards() {
    for seed in 0..8 {
        let board = Board::with_seed(BoardConfig::new(12, 17, 50).unwrap(), seed).unwrap();

        for (coords, cell) in board.cells().filter(|(_, cell)| !cell.is_mine()) {
            assert_eq!(cell.adjacent_mine_count(), brute_force_count(&board, coords));
        }
    }
}

#[test]
fn reveal_is_idempotent() {
    let mut board = fixed((3, 3), &[(0, 0)], CascadeFlags::Clear);

    assert_eq!(board.reveal((1, 1)), RevealOutcome::Opened(1));
    let once = board.clone();

    assert_eq!(board.reveal((1, 1)), RevealOutcome::NoOp);
    assert_eq!(board, once);
}

#[test]
fn flag_blocks_reveal() {
    let mut board = fixed((3, 3), &[(0, 0)], CascadeFlags::Clear);

    assert_eq!(board.flag((0, 0)), FlagOutcome::Flagged);
    assert_eq!(board.reveal((0, 0)), RevealOutcome::NoOp);
    assert!(board.cell_at((0, 0)).unwrap().is_covered());
    assert_eq!(board.state(), BoardState::InProgress);
}

#[test]
fn flag_budget_is_capped() {
    let mut board = fixed((3, 3), &[(1, 1)], CascadeFlags::Clear);

    assert_eq!(board.flag((0, 0)), FlagOutcome::Flagged);
    assert_eq!(board.remaining_flag_budget(), 0);
    assert_eq!(board.flag((0, 1)), FlagOutcome::NoOp);
    assert!(!board.cell_at((0, 1)).unwrap().is_flagged());
    assert_eq!(board.remaining_flag_budget(), 0);
    assert_eq!(board.flag_count(), 1);
}

#[test]
fn cascade_opens_region_bounded_by_numbers() {
    let (board, start) = (0..64)
        .find_map(|seed| {
            let board = Board::with_seed(BoardConfig::default(), seed).unwrap();
            let start = first_cell(&board, |cell| !cell.is_mine() && cell.adjacent_mine_count() == 0)?;
            Some((board, start))
        })
        .expect("some seed has a zero cell");
    let mut board = board;

    let outcome = board.reveal(start);
    assert!(matches!(outcome, RevealOutcome::Opened(_) | RevealOutcome::Won));

    let opened = board.cells().filter(|(_, cell)| !cell.is_covered()).count();
    if let RevealOutcome::Opened(count) = outcome {
        assert_eq!(usize::from(count), opened);
    }

    for (coords, cell) in board.cells() {
        if cell.is_covered() {
            continue;
        }
        assert!(!cell.is_mine());
        if cell.adjacent_mine_count() == 0 {
            // a zero cell never sits on the edge of the opened region
            for neighbor in NeighborIter::new(coords, board.size()) {
                assert!(!board.cell_at(neighbor).unwrap().is_covered());
            }
        }
    }
}

#[test]
fn cascade_terminates_on_largest_board() {
    let mut board = fixed((Coord::MAX, Coord::MAX), &[(0, 0)], CascadeFlags::Clear);

    assert_eq!(board.reveal((Coord::MAX - 1, Coord::MAX - 1)), RevealOutcome::Won);
    assert_eq!(board.covered_safe_count(), 0);
    assert_eq!(board.state(), BoardState::Won);
    assert!(board.cell_at((0, 0)).unwrap().is_covered());
}

#[test]
fn cascade_flag_policies_differ() {
    // mine in the corner, flag inside the zero region
    let mines = [(0, 0)];

    let mut clearing = fixed((4, 4), &mines, CascadeFlags::Clear);
    clearing.flag((3, 0));
    assert_eq!(clearing.reveal((3, 3)), RevealOutcome::Won);
    assert!(!clearing.cell_at((3, 0)).unwrap().is_flagged());
    assert_eq!(clearing.remaining_flag_budget(), 1);

    let mut preserving = fixed((4, 4), &mines, CascadeFlags::Preserve);
    preserving.flag((3, 0));
    assert_eq!(preserving.reveal((3, 3)), RevealOutcome::Opened(14));
    let flagged = preserving.cell_at((3, 0)).unwrap();
    assert!(flagged.is_covered() && flagged.is_flagged());
    assert_eq!(preserving.state(), BoardState::InProgress);
    assert_eq!(preserving.remaining_flag_budget(), 0);
}

#[test]
fn losing_reveals_every_mine_and_freezes_board() {
    let mut board = Board::with_seed(BoardConfig::new(9, 9, 10).unwrap(), 11).unwrap();
    let mine = first_cell(&board, Cell::is_mine).unwrap();
    let other_mine = board
        .cells()
        .filter(|&(coords, cell)| cell.is_mine() && coords != mine)
        .map(|(coords, _)| coords)
        .next()
        .unwrap();
    board.flag(other_mine);

    assert_eq!(board.reveal(mine), RevealOutcome::Lost);
    assert_eq!(board.state(), BoardState::Lost);
    assert!(board
        .cells()
        .filter(|(_, cell)| cell.is_mine())
        .all(|(_, cell)| !cell.is_covered() && !cell.is_flagged()));

    let frozen = board.clone();
    let safe = first_cell(&board, |cell| cell.is_covered()).unwrap();
    assert_eq!(board.reveal(safe), RevealOutcome::NoOp);
    assert_eq!(board.flag(safe), FlagOutcome::NoOp);
    assert_eq!(board, frozen);
}

#[test]
fn single_safe_cell_wins_immediately() {
    let config = BoardConfig::new(4, 5, 19).unwrap();
    let mut board = Board::with_seed(config, 5).unwrap();
    let safe = first_cell(&board, |cell| !cell.is_mine()).unwrap();

    assert_eq!(board.reveal(safe), RevealOutcome::Won);
    assert_eq!(board.state(), BoardState::Won);
}

#[test]
fn identical_layouts_and_moves_give_identical_boards() {
    let layout = MineLayout::from_mine_coords((6, 6), &[(0, 5), (2, 2), (4, 1), (5, 5)]).unwrap();
    let moves: [(bool, Coord2); 6] = [
        (true, (0, 5)),
        (false, (5, 0)),
        (true, (3, 3)),
        (false, (0, 0)),
        (true, (3, 3)),
        (false, (9, 9)),
    ];

    let play = || {
        let mut board = Board::from_layout(&layout, CascadeFlags::Clear).unwrap();
        for (is_flag, coords) in moves {
            if is_flag {
                board.flag(coords);
            } else {
                board.reveal(coords);
            }
        }
        board
    };

    assert_eq!(play(), play());

    let config = BoardConfig::new(10, 10, 15).unwrap();
    assert_eq!(
        Board::with_seed(config, 99).unwrap(),
        Board::with_seed(config, 99).unwrap()
    );
}
