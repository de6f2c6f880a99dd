//! Observer snapshot serialization

use blocktris::core::Block;
use blocktris::engine::{Game, GameConfig};
use blocktris::input::KeyFrame;
use blocktris::types::{Action, ShapeKind};
use serde::Deserialize;

/// The subset of the snapshot a remote viewer reads
#[derive(Debug, Deserialize)]
struct ViewerFrame {
    board: Vec<Vec<u8>>,
    active: Option<ViewerPiece>,
    ghost: Option<ViewerPiece>,
    hold: Option<u8>,
    next: Vec<u8>,
    can_hold: bool,
    state: String,
    paused: bool,
    score: u32,
    level: u32,
    lines: u32,
    slowmo_meter: f32,
}

#[derive(Debug, Deserialize)]
struct ViewerPiece {
    kind: u8,
    x: i8,
    y: i8,
    cells: Vec<(i8, i8)>,
}

#[test]
fn test_snapshot_serializes_for_viewers() -> anyhow::Result<()> {
    let mut game = Game::new(GameConfig::default());
    game.create();
    game.set_next(0, ShapeKind::I);
    game.set_next(1, ShapeKind::T);
    game.board_mut().set(0, 0, Some(Block::new(ShapeKind::Z, 0)));
    game.tick(&KeyFrame::NONE, 16);

    let json = serde_json::to_string(&game.snapshot())?;
    let frame: ViewerFrame = serde_json::from_str(&json)?;

    assert_eq!(frame.state, "playing");
    assert_eq!(frame.board.len(), 20);
    assert!(frame.board.iter().all(|row| row.len() == 10));
    assert_eq!(frame.board[0][0], ShapeKind::Z.code());

    let active = frame.active.expect("active piece");
    assert_eq!(active.kind, ShapeKind::I.code());
    assert_eq!((active.x, active.y), (3, 17));
    assert_eq!(active.cells, vec![(3, 19), (4, 19), (5, 19), (6, 19)]);

    let ghost = frame.ghost.expect("ghost piece");
    assert!(ghost.cells.iter().all(|&(_, y)| y == 0));

    assert_eq!(frame.hold, None);
    assert_eq!(frame.next.len(), 3);
    assert_eq!(frame.next[0], ShapeKind::T.code());
    assert!(frame.can_hold);
    assert!(!frame.paused);
    assert_eq!((frame.score, frame.level, frame.lines), (0, 1, 0));
    assert_eq!(frame.slowmo_meter, 1.0);
    Ok(())
}

#[test]
fn test_round_state_names() -> anyhow::Result<()> {
    let mut game = Game::default();
    assert_eq!(serde_json::to_value(game.snapshot())?["state"], "empty");

    game.create();
    game.tick(&KeyFrame::NONE, 16);
    game.board_mut().set(5, 19, Some(Block::new(ShapeKind::O, 0)));
    game.tick(&KeyFrame::new().press(Action::Drop), 16);
    assert!(game.is_game_over());

    let value = serde_json::to_value(game.snapshot())?;
    assert_eq!(value["state"], "game_over");
    assert!(value["active"].is_null());
    assert!(value["ghost"].is_null());
    Ok(())
}
