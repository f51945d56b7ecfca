use chess::{Board, File, Rank, Square};

use super::coordinator::{FinishReason, GamePhase};
use super::rules::Outcome;
use super::Side;

/// Format milliseconds as `MM:SS`, rounding up to the next whole second so
/// that `00:00` is only shown once the time is really gone.
pub fn format_clock(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Board rows from rank 8 down to rank 1, one letter per piece (upper case for
/// white) and `.` for an empty square.
pub fn board_rows(board: &Board) -> Vec<String> {
    (0..8)
        .rev()
        .map(|rank| {
            (0..8)
                .map(|file| {
                    let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
                    match (board.piece_on(square), board.color_on(square)) {
                        (Some(piece), Some(color)) => piece.to_string(color),
                        _ => ".".to_string(),
                    }
                })
                .collect()
        })
        .collect()
}

/// Get the current game status as a string
pub fn game_status(phase: &GamePhase, board: &Board) -> String {
    match phase {
        GamePhase::Finished { reason } => match reason {
            FinishReason::Rules {
                outcome: Outcome::Checkmate { winner },
            } => wins(*winner),
            FinishReason::Rules { .. } => "draw".to_string(),
            FinishReason::Timeout { side } => wins(side.opponent()),
            FinishReason::Aborted { .. } => "aborted".to_string(),
        },
        GamePhase::AwaitingMove { side } => turn_status(*side, board),
        // The mover is still the board's side to move until the move lands.
        GamePhase::ApplyingMove => turn_status(board.side_to_move().into(), board),
    }
}

fn turn_status(side: Side, board: &Board) -> String {
    if board.checkers().popcnt() > 0 {
        "check".to_string()
    } else {
        format!("{}_turn", side)
    }
}

fn wins(side: Side) -> String {
    format!("{}_wins", side)
}
