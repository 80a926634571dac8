//! Snapshot history and the move log that travels with it.
//!
//! Index 0 always holds the starting position. Each accepted action appends
//! the state as it stands afterwards, so restoring a snapshot restores whose
//! move it is and any pending replacement along with the board.

use std::iter::Enumerate;
use std::slice;

use crate::GameState;

/// How far back undo may go.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UndoPolicy {
    /// The first action is permanent: undo needs at least three snapshots.
    #[default]
    KeepFirstMove,
    /// Any action may be undone, down to the starting position.
    AnyMove,
}

impl UndoPolicy {
    /// Snapshots that must exist before an undo is allowed.
    fn min_snapshots(self) -> usize {
        match self {
            UndoPolicy::AnyMove => 2,
            UndoPolicy::KeepFirstMove => 3,
        }
    }
}

/// One recorded state and the log line paired with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub state: GameState,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    /// History seeded with a starting position.
    pub fn new(initial: GameState) -> History {
        History {
            snapshots: vec![Snapshot { state: initial, description: None }],
        }
    }

    /// Append a post-action state.
    pub fn record(&mut self, state: GameState, description: Option<String>) {
        self.snapshots.push(Snapshot { state, description });
    }

    /// Number of snapshots, the starting one included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the starting snapshot cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Most recent state.
    pub fn latest(&self) -> &GameState {
        // `new` and `reset` seed a snapshot and `undo` never pops the last one
        &self.snapshots[self.snapshots.len() - 1].state
    }

    pub fn can_undo(&self, policy: UndoPolicy) -> bool {
        self.snapshots.len() >= policy.min_snapshots()
    }

    /// Drop the latest snapshot and its log line, returning the state to
    /// resume from. `None` when the policy forbids going further back.
    pub fn undo(&mut self, policy: UndoPolicy) -> Option<GameState> {
        if !self.can_undo(policy) {
            return None;
        }
        self.snapshots.pop();
        Some(*self.latest())
    }

    /// Forget everything and start over from `initial`.
    pub fn reset(&mut self, initial: GameState) {
        self.snapshots.clear();
        self.snapshots.push(Snapshot { state: initial, description: None });
    }

    /// Log lines in chronological order. Call again to restart.
    pub fn log(&self) -> MoveLog<'_> {
        MoveLog {
            entries: self.snapshots.iter().enumerate(),
        }
    }
}

/// Lazily formatted move log: `"Turn {n}: {description}"`, where `n` is the
/// snapshot index the line belongs to.
#[derive(Clone, Debug)]
pub struct MoveLog<'a> {
    entries: Enumerate<slice::Iter<'a, Snapshot>>,
}

impl Iterator for MoveLog<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.entries.find_map(|(turn, snapshot)| {
            snapshot
                .description
                .as_ref()
                .map(|text| format!("Turn {}: {}", turn, text))
        })
    }
}
