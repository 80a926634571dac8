//! Game session: the surface a presentation layer drives.
//!
//! A session owns the live state, the pending size selection and the
//! history. Calls are applied one at a time to completion; a caller sharing a
//! session between threads has to serialize access itself.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    Action, GameError, GameState, History, Inventory, MoveLog, Piece, Player, Pos, Size,
    UndoPolicy,
};

/// Session settings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SessionConfig {
    pub undo_policy: UndoPolicy,
}

/// Everything a renderer needs after an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Nine stacks, bottom to top, in cell order.
    pub board: Vec<Vec<Piece>>,
    pub current_player: Player,
    pub must_replace_piece: Option<Size>,
    pub game_ended: bool,
    pub winner: Option<Player>,
    pub winning_line: Option<[Pos; 3]>,
    pub inventory: Inventory,
    pub selection: Option<Size>,
    pub turn_label: String,
    pub can_undo: bool,
    /// Accepted actions since the start (or last reset).
    pub move_count: usize,
}

/// Outcome of a cell click that was not rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// The action went through.
    Applied(GameView),
    /// The click would reclaim `piece` from `at`. Nothing changed; repeat the
    /// click with confirmation to go ahead.
    ConfirmReclaim { at: Pos, piece: Piece },
}

#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    state: GameState,
    selection: Option<Size>,
    history: History,
}

impl Session {
    /// Fresh game with default settings.
    pub fn new_game() -> Session {
        Session::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Session {
        let state = GameState::new();
        Session {
            config,
            state,
            selection: None,
            history: History::new(state),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Live rule state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Size that the next click will use.
    pub fn selection(&self) -> Option<Size> {
        self.selection
    }

    /// Change the pending selection. No board effect.
    #[instrument(level = "debug", skip(self))]
    pub fn select_size(&mut self, size: Option<Size>) {
        self.selection = size;
    }

    /// Act on a cell as whoever is on move.
    ///
    /// A reclaim is only carried out with `confirm_reclaim`; without it the
    /// session answers [`Response::ConfirmReclaim`] and changes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn act_on_cell(
        &mut self,
        index: usize,
        confirm_reclaim: bool,
    ) -> Result<Response, GameError> {
        self.act(index, confirm_reclaim)
            .inspect_err(|err| debug!(%err, "action rejected"))
    }

    /// Act on a cell on behalf of `player`, rejecting out-of-turn clicks.
    #[instrument(level = "debug", skip(self))]
    pub fn act_on_cell_as(
        &mut self,
        player: Player,
        index: usize,
        confirm_reclaim: bool,
    ) -> Result<Response, GameError> {
        if self.state.turn.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        let expected = self.state.turn.player();
        if player != expected {
            debug!(%player, %expected, "out of turn");
            return Err(GameError::NotYourTurn { expected });
        }
        self.act_on_cell(index, confirm_reclaim)
    }

    fn act(&mut self, index: usize, confirm_reclaim: bool) -> Result<Response, GameError> {
        if self.state.turn.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        let at = Pos::new(index)?;
        let action = self.state.interpret(at, self.selection)?;

        if let Action::Reclaim { from } = action {
            self.state.validate(action)?;
            if !confirm_reclaim {
                let piece = self.state.board.top_of(from).ok_or(GameError::EmptyCell(from))?;
                return Ok(Response::ConfirmReclaim { at: from, piece });
            }
        }

        let applied = self.state.apply(action)?;
        debug!(?action, player = %applied.player, "action applied");
        if let Some(winner) = applied.winner {
            info!(%winner, "game won");
        }

        self.selection = match action {
            Action::Reclaim { .. } => Some(applied.size),
            _ => None,
        };
        self.history.record(self.state, Some(applied.describe()));
        Ok(Response::Applied(self.view()))
    }

    /// Step back one action. `None` when there is nothing the undo policy
    /// lets us remove.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> Option<GameView> {
        let Some(state) = self.history.undo(self.config.undo_policy) else {
            debug!("cannot undo");
            return None;
        };
        self.state = state;
        self.selection = state.turn.obligation();
        debug!(snapshots = self.history.len(), "undone");
        Some(self.view())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(self.config.undo_policy)
    }

    /// Start over. Any confirmation belongs to the caller.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> GameView {
        self.state = GameState::new();
        self.selection = None;
        self.history.reset(self.state);
        info!("game reset");
        self.view()
    }

    /// Descriptions of the accepted actions, oldest first.
    pub fn move_log(&self) -> MoveLog<'_> {
        self.history.log()
    }

    /// Snapshot of the observable state.
    pub fn view(&self) -> GameView {
        let turn = self.state.turn;
        let winning_line = turn
            .winner()
            .and_then(|_| self.state.board.winning_line())
            .map(|(_, line)| line);

        GameView {
            board: Pos::all().map(|pos| self.state.board.stack(pos)).collect(),
            current_player: turn.player(),
            must_replace_piece: turn.obligation(),
            game_ended: turn.is_ended(),
            winner: turn.winner(),
            winning_line,
            inventory: self.state.inventory,
            selection: self.selection,
            turn_label: turn.label(),
            can_undo: self.can_undo(),
            move_count: self.history.len() - 1,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Turn;

    fn applied(response: Result<Response, GameError>) -> GameView {
        match response {
            Ok(Response::Applied(view)) => view,
            other => panic!("expected an applied action, got {:?}", other),
        }
    }

    fn play(session: &mut Session, size: Size, index: usize) -> GameView {
        session.select_size(Some(size));
        applied(session.act_on_cell(index, false))
    }

    #[test]
    fn test_new_game_view() {
        let view = Session::new_game().view();
        assert_eq!(view.board, vec![Vec::<Piece>::new(); 9]);
        assert_eq!(view.current_player, Player::One);
        assert_eq!(view.must_replace_piece, None);
        assert!(!view.game_ended);
        assert_eq!(view.winner, None);
        assert_eq!(view.turn_label, "Red's turn");
        assert!(!view.can_undo);
        assert_eq!(view.move_count, 0);
    }

    #[test]
    fn test_invalid_cell() {
        let mut session = Session::new_game();
        session.select_size(Some(Size::Small));
        assert_eq!(session.act_on_cell(9, false), Err(GameError::InvalidCell(9)));
        assert_eq!(session.view().move_count, 0);
    }

    #[test]
    fn test_selection_cleared_after_placement() {
        let mut session = Session::new_game();
        let view = play(&mut session, Size::Medium, 4);
        assert_eq!(view.selection, None);
        assert_eq!(session.act_on_cell(0, false), Err(GameError::NoSizeSelected));
    }

    #[test]
    fn test_rejected_action_keeps_selection() {
        let mut session = Session::new_game();
        play(&mut session, Size::Large, 4);
        session.select_size(Some(Size::Small));
        assert_eq!(
            session.act_on_cell(4, false),
            Err(GameError::IllegalCover { size: Size::Small, top: Size::Large })
        );
        assert_eq!(session.selection(), Some(Size::Small));
    }

    #[test]
    fn test_reclaim_asks_for_confirmation_first() {
        let mut session = Session::new_game();
        play(&mut session, Size::Large, 0);
        play(&mut session, Size::Small, 8);
        let before = session.view();

        assert_eq!(
            session.act_on_cell(0, false),
            Ok(Response::ConfirmReclaim {
                at: Pos(0),
                piece: Piece::new(Player::One, Size::Large)
            })
        );
        assert_eq!(session.view(), before);

        let view = applied(session.act_on_cell(0, true));
        assert_eq!(view.must_replace_piece, Some(Size::Large));
        assert_eq!(view.selection, Some(Size::Large));
        assert_eq!(view.current_player, Player::One);
        assert_eq!(view.turn_label, "Red must place the reclaimed Large");
    }

    #[test]
    fn test_invalid_reclaim_is_reported_before_confirmation() {
        let mut session = Session::new_game();
        play(&mut session, Size::Medium, 0);
        play(&mut session, Size::Small, 8);
        play(&mut session, Size::Small, 4);
        play(&mut session, Size::Small, 7);

        session.select_size(None);
        applied(session.act_on_cell(0, true));
        // Still obliged to place the Medium: a second reclaim is refused outright
        session.select_size(None);
        assert_eq!(session.act_on_cell(4, false), Err(GameError::ObligationPending(Size::Medium)));
    }

    #[test]
    fn test_out_of_turn() {
        let mut session = Session::new_game();
        session.select_size(Some(Size::Small));
        applied(session.act_on_cell_as(Player::One, 4, false));

        session.select_size(Some(Size::Small));
        assert_eq!(
            session.act_on_cell_as(Player::One, 0, false),
            Err(GameError::NotYourTurn { expected: Player::Two })
        );
        applied(session.act_on_cell_as(Player::Two, 0, false));
    }

    #[test]
    fn test_undo_restores_obligation_and_selection() {
        let mut session = Session::new_game();
        play(&mut session, Size::Medium, 0);
        play(&mut session, Size::Small, 8);
        session.select_size(None);
        let obliged = applied(session.act_on_cell(0, true));
        play(&mut session, Size::Medium, 4);

        let view = session.undo().unwrap();
        assert_eq!(view, obliged);
        assert_eq!(
            session.state().turn,
            Turn::MustReplace { player: Player::One, size: Size::Medium, from: Pos(0) }
        );
    }

    #[test]
    fn test_undo_reopens_finished_game() {
        let mut session = Session::new_game();
        play(&mut session, Size::Small, 0);
        play(&mut session, Size::Small, 3);
        play(&mut session, Size::Small, 1);
        play(&mut session, Size::Small, 4);
        let win = play(&mut session, Size::Medium, 2);
        assert!(win.game_ended);
        assert_eq!(win.winning_line, Some([Pos(0), Pos(1), Pos(2)]));
        assert_eq!(win.turn_label, "Player 1 wins! (Red)");

        let view = session.undo().unwrap();
        assert!(!view.game_ended);
        assert_eq!(view.current_player, Player::One);
        assert_eq!(view.winning_line, None);
    }

    #[test]
    fn test_default_keeps_first_move() {
        let mut session = Session::new_game();
        assert_eq!(session.config().undo_policy, UndoPolicy::KeepFirstMove);
        let first = play(&mut session, Size::Small, 0);
        assert!(!first.can_undo);
        assert_eq!(session.undo(), None);

        play(&mut session, Size::Small, 8);
        let view = session.undo().unwrap();
        assert_eq!(view.board, first.board);
        assert_eq!(view.current_player, Player::Two);
    }

    #[test]
    fn test_any_move_policy_undoes_first_move() {
        let mut session = Session::with_config(SessionConfig {
            undo_policy: UndoPolicy::AnyMove,
        });
        let initial = session.view();
        let first = play(&mut session, Size::Small, 0);
        assert!(first.can_undo);

        let view = session.undo().unwrap();
        assert_eq!(view.board, initial.board);
        assert_eq!(view.current_player, Player::One);
        assert!(!view.can_undo);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new_game();
        play(&mut session, Size::Small, 0);
        session.select_size(Some(Size::Large));

        let view = session.reset();
        assert_eq!(view, Session::new_game().view());
        assert_eq!(session.move_log().count(), 0);
    }

    #[test]
    fn test_move_log() {
        let mut session = Session::new_game();
        play(&mut session, Size::Small, 0);
        play(&mut session, Size::Medium, 0);
        play(&mut session, Size::Large, 4);
        session.select_size(None);
        applied(session.act_on_cell(0, true));
        play(&mut session, Size::Medium, 5);

        let log: Vec<_> = session.move_log().collect();
        assert_eq!(
            log,
            vec![
                "Turn 1: Red placed Small on 1.1",
                "Turn 2: Blue placed Medium on 1.1",
                "Turn 3: Red placed Large on 2.2",
                "Turn 4: Blue reclaimed Medium from 1.1",
                "Turn 5: Blue moved Medium from 1.1 to 2.3",
            ]
        );
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let mut session = Session::new_game();
        play(&mut session, Size::Small, 4);
        let json = serde_json::to_value(session.view()).unwrap();

        assert_eq!(json["currentPlayer"], "Two");
        assert_eq!(json["mustReplacePiece"], serde_json::Value::Null);
        assert_eq!(json["gameEnded"], false);
        assert_eq!(json["board"][4][0]["size"], "Small");
        assert_eq!(json["board"][4][0]["owner"], "One");
        assert_eq!(json["inventory"]["One"]["small"], 1);
        assert_eq!(json["inventory"]["Two"]["small"], 2);
        assert_eq!(json["turnLabel"], "Blue's turn");
    }
}
