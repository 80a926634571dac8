//! Plain-text rendering of a [`GameView`].

use std::fmt::Write;

use gobblet_engine::{GameView, Piece, Player, Size};

// ============================================================================
// Constants
// ============================================================================

const CELL_WIDTH: usize = 7;

fn size_letter(size: Size) -> char {
    match size {
        Size::Small => 'S',
        Size::Medium => 'M',
        Size::Large => 'L',
    }
}

fn player_letter(player: Player) -> char {
    match player {
        Player::One => 'R',
        Player::Two => 'B',
    }
}

/// Visible piece plus the number of pieces hidden under it, e.g. `R:L+1`.
fn cell_label(stack: &[Piece]) -> String {
    match stack.last() {
        None => String::new(),
        Some(top) => {
            let mut label = format!("{}:{}", player_letter(top.owner), size_letter(top.size));
            if stack.len() > 1 {
                let _ = write!(label, "+{}", stack.len() - 1);
            }
            label
        }
    }
}

/// Board grid with 1-based row/column headers, winning cells marked with `*`.
pub fn board(view: &GameView) -> String {
    let line = format!("  +{}\n", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(3));
    let mut out = String::new();

    out.push_str("   ");
    for col in 1..=3 {
        let _ = write!(out, "{:^width$} ", col, width = CELL_WIDTH);
    }
    out.push('\n');
    out.push_str(&line);

    for row in 0..3 {
        let _ = write!(out, "{} |", row + 1);
        for col in 0..3 {
            let index = row * 3 + col;
            let mut label = cell_label(&view.board[index]);
            if view
                .winning_line
                .is_some_and(|line| line.iter().any(|pos| pos.index() == index))
            {
                label.push('*');
            }
            let _ = write!(out, "{:^width$}|", label, width = CELL_WIDTH);
        }
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Hands, selection and turn line.
pub fn status(view: &GameView) -> String {
    let mut out = String::new();
    for player in [Player::One, Player::Two] {
        let [small, medium, large] = view.inventory.hand(player);
        let _ = writeln!(out, "{:<5} hand: S{} M{} L{}", player.color(), small, medium, large);
    }
    if let Some(size) = view.selection {
        let _ = writeln!(out, "Selected: {}", size);
    }
    out.push_str(&view.turn_label);
    out.push('\n');
    out
}
