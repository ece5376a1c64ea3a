use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Change a collaborator may want to react to, queued by the operation that caused it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    MinesChanged { mines: CellCount },
    FlagsChanged { flags: CellCount },
    OpenedChanged { open_cells: CellCount },
    OutcomeChanged { outcome: Outcome },
}

pub type Notifications = SmallVec<[Notification; 4]>;

/// Result of a reveal: the cells it newly opened and the outcome afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReport {
    pub opened: Vec<OpenedCell>,
    /// Every mine on the board, row-major, filled in only by the reveal that lost the game.
    #[serde(default)]
    pub mines: Vec<Coord2>,
    pub outcome: Outcome,
}

impl RevealReport {
    fn unchanged(outcome: Outcome) -> Self {
        Self {
            opened: Vec::new(),
            mines: Vec::new(),
            outcome,
        }
    }

    /// Whether this reveal could have caused an update to the board
    pub fn has_update(&self) -> bool {
        !self.opened.is_empty() || !self.mines.is_empty()
    }
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub changed: bool,
    pub flagged: bool,
    pub flag_count: CellCount,
    pub outcome: Outcome,
}

/// What a presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    /// The mine that ended the game.
    Exploded,
    /// Any other mine, shown once the game is lost.
    Mine,
}

/// One game from generation to win or loss.
///
/// Every mutating operation goes through `&mut self`; a new or restarted game is a new session value.
///
/// A deserialized session is checked against its grid: the state matrix has to match the board and the counters
/// have to match the states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRepr")]
pub struct GameSession {
    grid: Grid,
    states: Array2<CellState>,
    open_cells: CellCount,
    flags: CellCount,
    outcome: Outcome,
    exploded: Option<Coord2>,
    #[serde(skip)]
    pending: Notifications,
}

#[derive(Deserialize)]
struct SessionRepr {
    grid: Grid,
    states: Array2<CellState>,
    open_cells: CellCount,
    flags: CellCount,
    outcome: Outcome,
    exploded: Option<Coord2>,
}

impl TryFrom<SessionRepr> for GameSession {
    type Error = GameError;

    fn try_from(repr: SessionRepr) -> Result<Self> {
        let SessionRepr {
            grid,
            states,
            open_cells,
            flags,
            outcome,
            exploded,
        } = repr;

        if states.shape() != grid.size().to_nd_index().as_slice() {
            return Err(GameError::InconsistentSession);
        }
        if let Some(coords) = exploded {
            grid.validate_coords(coords)?;
        }

        let mut counted_flags = 0;
        let mut counted_open = 0;
        for ((coords, value), &state) in grid.iter_cells().zip(states.iter()) {
            match state {
                CellState::Flagged => counted_flags += 1,
                CellState::Opened if !value.is_mine() => counted_open += 1,
                CellState::Opened if exploded != Some(coords) => return Err(GameError::InconsistentSession),
                CellState::Opened | CellState::Hidden => {}
            }
        }
        if counted_flags != flags || counted_open != open_cells {
            return Err(GameError::InconsistentSession);
        }

        Ok(Self {
            grid,
            states,
            open_cells,
            flags,
            outcome,
            exploded,
            pending: Notifications::new(),
        })
    }
}

impl GameSession {
    pub fn new(grid: Grid) -> Self {
        let size = grid.size();
        let mut session = Self {
            states: Array2::default(size.to_nd_index()),
            open_cells: 0,
            flags: 0,
            outcome: Outcome::InProgress,
            exploded: None,
            pending: Notifications::new(),
            grid,
        };
        session.pending.extend([
            Notification::MinesChanged {
                mines: session.grid.mine_count(),
            },
            Notification::FlagsChanged { flags: 0 },
            Notification::OpenedChanged { open_cells: 0 },
        ]);
        session
    }

    /// Validates `config`, places the mines and computes proximity values.
    pub fn initialize<R: RandomSource>(config: GameConfig, rng: R) -> Result<Self> {
        let grid = RowCappedGenerator::new(rng).generate(config)?;
        Ok(Self::new(grid))
    }

    /// Fresh layout with the same dimensions and mine count.
    pub fn restart<R: RandomSource>(&self, rng: R) -> Result<Self> {
        Self::initialize(self.config(), rng)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> GameConfig {
        self.grid.game_config()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn open_cells(&self) -> CellCount {
        self.open_cells
    }

    pub fn flag_count(&self) -> CellCount {
        self.flags
    }

    pub fn mine_count(&self) -> CellCount {
        self.grid.mine_count()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> i64 {
        i64::from(self.grid.mine_count()) - i64::from(self.flags)
    }

    pub fn exploded(&self) -> Option<Coord2> {
        self.exploded
    }

    pub fn state_at(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(self.states[coords.to_nd_index()])
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.grid.validate_coords(coords)?;
        if self.exploded == Some(coords) {
            return Ok(CellView::Exploded);
        }

        Ok(match (self.states[coords.to_nd_index()], self.grid[coords]) {
            (_, CellValue::Mine) if self.outcome == Outcome::Lost => CellView::Mine,
            (CellState::Opened, CellValue::Proximity(count)) => CellView::Open(count),
            (CellState::Opened, CellValue::Mine) => CellView::Exploded,
            (CellState::Flagged, _) => CellView::Flagged,
            (CellState::Hidden, _) => CellView::Hidden,
        })
    }

    /// Drains the notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Notifications {
        core::mem::take(&mut self.pending)
    }

    /// Opens a cell. Mines end the game, numbered cells open alone and zero cells flood their region.
    ///
    /// Hitting a mine only opens that mine, the report lists every mine in `mines` and [`Self::cell_view`]
    /// shows them from then on. Revealing an opened cell, or revealing after the game ended, changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.grid.validate_coords(coords)?;

        if self.outcome.is_finished() || self.states[coords.to_nd_index()] == CellState::Opened {
            return Ok(RevealReport::unchanged(self.outcome));
        }

        let open_before = self.open_cells;
        let flags_before = self.flags;

        let (opened, next) = if self.grid.contains_mine(coords) {
            log::debug!("Mine hit at {:?}", coords);
            self.exploded = Some(coords);
            let opened: Vec<_> = self.open_cell(coords).into_iter().collect();
            (opened, Outcome::Lost)
        } else {
            let opened: Vec<_> = flood_region(&self.grid, coords)
                .into_iter()
                .filter_map(|pos| self.open_cell(pos))
                .collect();
            log::debug!("Reveal at {:?} opened {} cells", coords, opened.len());
            let next = check_opened(self.grid.total_cells(), self.open_cells, self.grid.mine_count());
            (opened, next)
        };

        self.notify_counters(open_before, flags_before);
        self.finish(next);

        let mines = if next == Outcome::Lost {
            self.grid.mine_coords().collect()
        } else {
            Vec::new()
        };

        Ok(RevealReport {
            opened,
            mines,
            outcome: self.outcome,
        })
    }

    /// Flags a hidden cell or unflags a flagged one. Opened cells and finished games are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        let coords = self.grid.validate_coords(coords)?;

        let changed = if self.outcome.is_finished() {
            false
        } else {
            let state = &mut self.states[coords.to_nd_index()];
            match *state {
                CellState::Hidden => {
                    *state = CellState::Flagged;
                    self.flags += 1;
                    true
                }
                CellState::Flagged => {
                    *state = CellState::Hidden;
                    self.flags -= 1;
                    true
                }
                CellState::Opened => false,
            }
        };

        if changed {
            self.pending
                .push(Notification::FlagsChanged { flags: self.flags });
            let next = check_flags(&self.grid, &self.states, self.flags);
            self.finish(next);
        }

        Ok(FlagReport {
            changed,
            flagged: self.states[coords.to_nd_index()] == CellState::Flagged,
            flag_count: self.flags,
            outcome: self.outcome,
        })
    }

    /// Opens a random 2×2 block to get the player started, flagging any mine inside it instead of opening it.
    pub fn open_starting_area<R: RandomSource>(&mut self, mut rng: R) -> Result<RevealReport> {
        let (rows, columns) = self.grid.size();
        let top = rng.between(0, CellCount::from(rows) - 1) as Coord;
        let left = rng.between(0, CellCount::from(columns) - 1) as Coord;
        log::debug!("Opening starting area at {:?}", (top, left));

        let mut opened = Vec::new();
        for row in top..=top.saturating_add(1) {
            for column in left..=left.saturating_add(1) {
                let coords = (row, column);
                if self.outcome.is_finished() || self.grid.validate_coords(coords).is_err() {
                    continue;
                }

                if self.grid.contains_mine(coords) {
                    if self.states[coords.to_nd_index()] == CellState::Hidden {
                        self.toggle_flag(coords)?;
                    }
                } else {
                    opened.extend(self.reveal(coords)?.opened);
                }
            }
        }

        Ok(RevealReport {
            opened,
            mines: Vec::new(),
            outcome: self.outcome,
        })
    }

    /// Moves a cell to `Opened`, clearing its flag. Returns `None` when it was already open.
    fn open_cell(&mut self, coords: Coord2) -> Option<OpenedCell> {
        let value = self.grid[coords];
        let state = &mut self.states[coords.to_nd_index()];

        match *state {
            CellState::Opened => return None,
            CellState::Flagged => self.flags -= 1,
            CellState::Hidden => {}
        }
        *state = CellState::Opened;

        if !value.is_mine() {
            self.open_cells += 1;
        }
        log::trace!("Opened {:?} ({:?})", coords, value);
        Some(OpenedCell::new(coords, value))
    }

    fn notify_counters(&mut self, open_before: CellCount, flags_before: CellCount) {
        if self.flags != flags_before {
            self.pending
                .push(Notification::FlagsChanged { flags: self.flags });
        }
        if self.open_cells != open_before {
            self.pending.push(Notification::OpenedChanged {
                open_cells: self.open_cells,
            });
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_finished() || !outcome.is_finished() {
            return;
        }

        log::debug!("Game ended: {:?}", outcome);
        self.outcome = outcome;
        self.pending.push(Notification::OutcomeChanged { outcome });
    }
}
