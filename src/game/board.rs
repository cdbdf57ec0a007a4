//! The board - owns the grid and resolves one shot at a time.
//!
//! A shot moves through `Idle -> InFlight -> Resolving -> Idle`:
//! - the request traces the whole bounce path up front and enters `InFlight`
//! - the caller plays the waypoints back with [`Board::advance_waypoint`]
//! - [`Board::resolve`] commits the bubble, pops its chain and drops whatever
//!   lost its path to the ceiling
//!
//! `Won` and `Lost` are terminal; the grid is frozen until [`Board::reset`].

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use super::{
    bubble::BubbleColor,
    cluster::{collect_chain, collect_dropping},
    config::{BoardConfig, Playback},
    error::{ConfigError, PlaybackError, ShotRejected},
    grid::{BubbleGrid, GridBounds},
    hex::{GridPos, HexLayout},
    projectile::{FlightEnding, Marcher},
};

/// Where the board is in the shot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    #[default]
    Idle,
    /// Waypoints are being played back.
    InFlight,
    /// Every waypoint has been reached; waiting for [`Board::resolve`].
    Resolving,
    Won,
    Lost,
}

/// A launched shot and the path it will take.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotFlight {
    pub origin: Vec2,
    pub color: BubbleColor,
    /// Normalized launch direction.
    pub direction: Vec2,
    pub waypoints: Vec<Vec2>,
    /// Playback speed, in local units per second.
    pub speed: f32,
    pub ending: FlightEnding,
    pub bounces: u32,
}

impl ShotFlight {
    /// Length of the polyline from the origin through every waypoint.
    pub fn path_length(&self) -> f32 {
        let mut from = self.origin;
        let mut length = 0.0;
        for &to in &self.waypoints {
            length += from.distance(to);
            from = to;
        }
        length
    }

    /// Seconds needed to play the whole path back at `speed`.
    pub fn travel_time(&self) -> f32 {
        if self.speed > 0.0 {
            self.path_length() / self.speed
        } else {
            0.0
        }
    }
}

/// A bubble on the board, with its cell center in local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleAt {
    pub pos: GridPos,
    pub color: BubbleColor,
    pub local: Vec2,
}

/// A bubble that lost its path to the ceiling and falls off the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroppedBubble {
    pub bubble: BubbleAt,
    /// Y coordinate to fall to.
    pub drop_to: f32,
    pub drop_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSignal {
    Won,
    Lost,
}

/// Everything that happened when a shot resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotOutcome {
    pub color: BubbleColor,
    pub waypoints: Vec<Vec2>,
    /// `None` when the bubble was discarded or overflowed the board.
    pub placed: Option<BubbleAt>,
    pub popped: Vec<BubbleAt>,
    pub dropped: Vec<DroppedBubble>,
    pub signal: Option<GameSignal>,
}

/// The edges of the playfield in local space. Y decreases downward from the ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardBorders {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BoardBorders {
    pub fn new(layout: &HexLayout, bounds: GridBounds) -> Self {
        let left = 0.0;
        let top = 0.0;
        let radius = layout.bubble_radius;
        Self {
            left,
            right: left + radius * 2.0 * bounds.bubbles_per_row as f32 + radius,
            top,
            bottom: top
                - (bounds.rows - 1) as f32 * layout.row_spacing()
                - 2.0 * layout.hexagon_size,
        }
    }

    /// Just below the bottom center.
    pub fn default_cannon(&self, bubble_radius: f32) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, self.bottom - bubble_radius)
    }
}

#[derive(Resource, Debug)]
pub struct Board {
    config: BoardConfig,
    layout: HexLayout,
    grid: BubbleGrid,
    /// Ceiling reachability watermark, bumped after every pop.
    generation: u32,
    phase: ShotPhase,
    flight: Option<ShotFlight>,
    /// Waypoints of `flight` already played back.
    reached: usize,
    cannon: Vec2,
    loaded: BubbleColor,
    rng: StdRng,
}

impl Board {
    /// Build a board and seed its initial layout.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout = HexLayout::new(config.bubble_radius);
        let bounds = GridBounds::new(config.bubbles_per_row, config.board_height_in_rows);
        let cannon = config.cannon.map(Vec2::from).unwrap_or_else(|| {
            BoardBorders::new(&layout, bounds).default_cannon(layout.bubble_radius)
        });

        let mut board = Self {
            rng: new_rng(config.seed),
            config,
            layout,
            grid: BubbleGrid::new(bounds),
            generation: 0,
            phase: ShotPhase::Idle,
            flight: None,
            reached: 0,
            cannon,
            loaded: BubbleColor::default(),
        };
        board.populate();
        Ok(board)
    }

    /// Start a new game: empty the grid, reseed the layout and reload the cannon.
    ///
    /// Seeded boards come back exactly as they were first built.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.generation = 0;
        self.phase = ShotPhase::Idle;
        self.flight = None;
        self.reached = 0;
        self.rng = new_rng(self.config.seed);
        self.populate();
    }

    fn populate(&mut self) {
        let bounds = self.grid.bounds();
        let palette = BubbleColor::palette(self.config.colors);
        let seeds = self
            .config
            .layout
            .generate(bounds.bubbles_per_row, bounds.rows, palette, &mut self.rng);

        for seed in seeds {
            let pos = seed.pos();
            if !bounds.contains(pos) {
                warn!(
                    "Skipping seed bubble at {} outside the {}x{} board",
                    pos, bounds.bubbles_per_row, bounds.rows
                );
                continue;
            }
            self.grid.place(pos, seed.color, self.generation);
        }

        self.reload();
        info!(
            "Board ready: {}x{}, {} bubble(s), cannon at {:?} loaded with {:?}",
            bounds.bubbles_per_row,
            bounds.rows,
            self.grid.len(),
            self.cannon,
            self.loaded
        );
    }

    fn reload(&mut self) {
        let palette = BubbleColor::palette(self.config.colors);
        self.loaded = BubbleColor::random_from(&mut self.rng, palette);
        debug!("Reloaded with {:?}", self.loaded);
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn layout(&self) -> HexLayout {
        self.layout
    }

    pub fn grid(&self) -> &BubbleGrid {
        &self.grid
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn playback(&self) -> Playback {
        self.config.playback
    }

    pub fn cannon(&self) -> Vec2 {
        self.cannon
    }

    /// The color the next [`Board::request_shot`] fires.
    pub fn loaded_color(&self) -> BubbleColor {
        self.loaded
    }

    pub fn borders(&self) -> BoardBorders {
        BoardBorders::new(&self.layout, self.grid.bounds())
    }

    /// The shot currently being played back or resolved.
    pub fn flight(&self) -> Option<&ShotFlight> {
        self.flight.as_ref()
    }

    pub fn remaining_waypoints(&self) -> usize {
        self.flight
            .as_ref()
            .map_or(0, |flight| flight.waypoints.len().saturating_sub(self.reached))
    }

    /// Fire the loaded bubble and reload the cannon.
    pub fn request_shot(&mut self, direction: Vec2) -> Result<&ShotFlight, ShotRejected> {
        let direction = self.check_request(direction)?;
        let color = self.loaded;
        self.reload();
        Ok(self.launch(direction, color))
    }

    /// Fire a bubble of a given color. The loaded bubble stays in the cannon.
    pub fn request_shot_with(
        &mut self,
        direction: Vec2,
        color: BubbleColor,
    ) -> Result<&ShotFlight, ShotRejected> {
        let direction = self.check_request(direction)?;
        Ok(self.launch(direction, color))
    }

    fn check_request(&self, direction: Vec2) -> Result<Vec2, ShotRejected> {
        let checked = match self.phase {
            ShotPhase::InFlight | ShotPhase::Resolving => Err(ShotRejected::Busy),
            ShotPhase::Lost => Err(ShotRejected::GameOver),
            ShotPhase::Won => Err(ShotRejected::GameWon),
            ShotPhase::Idle if !direction.is_finite() => Err(ShotRejected::NonFinite),
            ShotPhase::Idle if direction == Vec2::ZERO => Err(ShotRejected::ZeroDirection),
            ShotPhase::Idle if direction.y <= 0.0 => {
                Err(ShotRejected::NotUpward { y: direction.y })
            }
            ShotPhase::Idle => direction.try_normalize().ok_or(ShotRejected::ZeroDirection),
        };
        checked.inspect_err(|reason| debug!("Shot toward {:?} rejected: {}", direction, reason))
    }

    fn launch(&mut self, direction: Vec2, color: BubbleColor) -> &ShotFlight {
        let marcher = Marcher::new(
            &self.grid,
            self.layout,
            self.config.collide_threshold,
            self.config.max_march_distance,
        );
        let trajectory = marcher.trace_shot(self.cannon, direction, self.config.max_bounces);

        info!(
            "Fired {:?} toward {:?}: {} waypoint(s), {} bounce(s), ends {:?}",
            color,
            direction,
            trajectory.waypoints.len(),
            trajectory.bounces,
            trajectory.ending
        );

        self.phase = ShotPhase::InFlight;
        self.reached = 0;
        self.flight.insert(ShotFlight {
            origin: self.cannon,
            color,
            direction,
            waypoints: trajectory.waypoints,
            speed: self.config.shooting_speed,
            ending: trajectory.ending,
            bounces: trajectory.bounces,
        })
    }

    /// Mark the next waypoint as reached and return it.
    ///
    /// After the last waypoint the board moves to `Resolving` and further calls
    /// return `Ok(None)`.
    pub fn advance_waypoint(&mut self) -> Result<Option<Vec2>, PlaybackError> {
        match self.phase {
            ShotPhase::InFlight => {}
            ShotPhase::Resolving => return Ok(None),
            _ => return Err(PlaybackError::NoShotInFlight),
        }
        let Some(flight) = &self.flight else {
            return Err(PlaybackError::NoShotInFlight);
        };

        let next = flight.waypoints.get(self.reached).copied();
        if next.is_some() {
            self.reached += 1;
        }
        if self.reached >= flight.waypoints.len() {
            self.phase = ShotPhase::Resolving;
        }
        Ok(next)
    }

    /// Settle the shot once every waypoint has been played back.
    pub fn resolve(&mut self) -> Result<ShotOutcome, PlaybackError> {
        match self.phase {
            ShotPhase::Resolving => {}
            ShotPhase::InFlight => {
                return Err(PlaybackError::PlaybackIncomplete {
                    remaining: self.remaining_waypoints(),
                });
            }
            _ => return Err(PlaybackError::NoShotInFlight),
        }
        let Some(flight) = self.flight.take() else {
            return Err(PlaybackError::NoShotInFlight);
        };
        self.phase = ShotPhase::Idle;
        self.reached = 0;

        let mut outcome = ShotOutcome {
            color: flight.color,
            waypoints: flight.waypoints,
            placed: None,
            popped: Vec::new(),
            dropped: Vec::new(),
            signal: None,
        };

        let rest = match flight.ending {
            FlightEnding::Stuck(pos) => pos,
            FlightEnding::Exited(pos) | FlightEnding::BounceLimit(pos) => {
                warn!(
                    "Discarding {:?} bubble: shot ended {:?} near {}",
                    flight.color, flight.ending, pos
                );
                return Ok(outcome);
            }
        };

        if rest.row >= self.config.board_height_in_rows {
            info!(
                "{:?} bubble came to rest at {} below the last row, game over",
                flight.color, rest
            );
            self.phase = ShotPhase::Lost;
            outcome.signal = Some(GameSignal::Lost);
            return Ok(outcome);
        }

        if !self.grid.bounds().contains(rest) || self.grid.is_occupied(rest) {
            warn!(
                "Discarding {:?} bubble: resting cell {} is off the grid or taken",
                flight.color, rest
            );
            return Ok(outcome);
        }

        self.grid.place(rest, flight.color, self.generation);
        outcome.placed = Some(self.bubble_at(rest, flight.color));
        info!("Committed {:?} bubble at {}", flight.color, rest);

        let chain = collect_chain(&mut self.grid, rest, flight.color);
        if chain.len() >= self.config.chain_threshold {
            outcome.popped = self.take_bubbles(&chain);

            self.generation += 1;
            let dropping = collect_dropping(&mut self.grid, self.generation);
            outcome.dropped = self
                .take_bubbles(&dropping)
                .into_iter()
                .map(|bubble| DroppedBubble {
                    bubble,
                    drop_to: self.config.drop_to,
                    drop_speed: self.config.drop_speed,
                })
                .collect();

            info!(
                "Popped {} {:?} bubble(s), dropped {}",
                outcome.popped.len(),
                flight.color,
                outcome.dropped.len()
            );
        }

        // Any bubble committed to the ceiling row wins, not only a cleared board.
        if rest.row == 0 {
            info!("Bubble reached the ceiling row, board won");
            self.phase = ShotPhase::Won;
            outcome.signal = Some(GameSignal::Won);
        }

        Ok(outcome)
    }

    /// Fire the loaded bubble and resolve it immediately.
    pub fn shoot(&mut self, direction: Vec2) -> Result<ShotOutcome, ShotRejected> {
        self.request_shot(direction)?;
        Ok(self.finish_flight())
    }

    /// Fire a bubble of a given color and resolve it immediately.
    pub fn shoot_with(
        &mut self,
        direction: Vec2,
        color: BubbleColor,
    ) -> Result<ShotOutcome, ShotRejected> {
        self.request_shot_with(direction, color)?;
        Ok(self.finish_flight())
    }

    /// Play every waypoint back and resolve. Only called right after a launch.
    pub(crate) fn finish_flight(&mut self) -> ShotOutcome {
        while let Ok(Some(_)) = self.advance_waypoint() {}
        match self.resolve() {
            Ok(outcome) => outcome,
            Err(err) => unreachable!("a launched shot always resolves: {err}"),
        }
    }

    fn bubble_at(&self, pos: GridPos, color: BubbleColor) -> BubbleAt {
        BubbleAt {
            pos,
            color,
            local: self.layout.grid_to_local(pos),
        }
    }

    fn take_bubbles(&mut self, positions: &[GridPos]) -> Vec<BubbleAt> {
        let mut taken = Vec::with_capacity(positions.len());
        for &pos in positions {
            if let Some(color) = self.grid.remove(pos) {
                taken.push(self.bubble_at(pos, color));
            }
        }
        taken
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::game::bubble::{LayoutStrategy, SeedBubble};
    use BubbleColor::*;

    /// A 9 x 13 board with three striped ceiling rows and two yellows hanging
    /// off the left end of the green row.
    fn striped_config() -> BoardConfig {
        let mut bubbles = Vec::new();
        for (row, color) in [Red, Blue, Green].into_iter().enumerate() {
            for col in 0..9 {
                bubbles.push(SeedBubble::new(col, row as i32, color));
            }
        }
        bubbles.push(SeedBubble::new(0, 3, Yellow));
        bubbles.push(SeedBubble::new(1, 3, Yellow));

        BoardConfig {
            bubbles_per_row: 9,
            board_height_in_rows: 13,
            seed: Some(11),
            layout: LayoutStrategy::Explicit { bubbles },
            ..default()
        }
    }

    fn empty_config() -> BoardConfig {
        BoardConfig {
            bubbles_per_row: 9,
            board_height_in_rows: 13,
            seed: Some(5),
            layout: LayoutStrategy::Explicit { bubbles: Vec::new() },
            ..default()
        }
    }

    fn cells(bubbles: impl IntoIterator<Item = GridPos>) -> HashSet<GridPos> {
        bubbles.into_iter().collect()
    }

    #[test]
    fn test_borders_and_default_cannon() {
        let board = Board::new(empty_config()).unwrap();
        let borders = board.borders();
        let hexagon_size = board.layout().hexagon_size;

        assert_eq!(borders.left, 0.0);
        assert_eq!(borders.top, 0.0);
        assert!((borders.right - 9.5).abs() < 1e-5);
        assert!((borders.bottom + 20.0 * hexagon_size).abs() < 1e-4);
        assert!((board.cannon() - Vec2::new(4.75, borders.bottom - 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_explicit_cannon() {
        let config = BoardConfig {
            cannon: Some([1.0, -4.0]),
            ..empty_config()
        };
        assert_eq!(Board::new(config).unwrap().cannon(), Vec2::new(1.0, -4.0));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BoardConfig {
            bubble_radius: -1.0,
            ..default()
        };
        assert!(matches!(
            Board::new(config),
            Err(ConfigError::Invalid {
                field: "bubble_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_seeded_random_layout() {
        let config = BoardConfig {
            seed: Some(42),
            ..default()
        };
        let board = Board::new(config.clone()).unwrap();
        assert_eq!(board.grid().len(), 24);
        assert_eq!(board.grid().lowest_row(), Some(3));
        assert_eq!(board.grid(), Board::new(config).unwrap().grid());
    }

    #[test]
    fn test_out_of_range_seeds_are_skipped() {
        let config = BoardConfig {
            layout: LayoutStrategy::Explicit {
                bubbles: vec![
                    SeedBubble::new(0, 0, Red),
                    SeedBubble::new(6, 0, Red),
                    SeedBubble::new(0, -1, Red),
                    SeedBubble::new(2, 10, Red),
                ],
            },
            seed: Some(1),
            ..default()
        };
        let board = Board::new(config).unwrap();
        assert_eq!(board.grid().len(), 1);
    }

    #[test]
    fn test_rejected_requests_leave_board_idle() {
        let mut board = Board::new(empty_config()).unwrap();

        assert_eq!(board.request_shot(Vec2::ZERO).unwrap_err(), ShotRejected::ZeroDirection);
        assert_eq!(
            board.request_shot(Vec2::new(1.0, 0.0)).unwrap_err(),
            ShotRejected::NotUpward { y: 0.0 }
        );
        assert_eq!(
            board.request_shot(Vec2::new(0.2, -1.0)).unwrap_err(),
            ShotRejected::NotUpward { y: -1.0 }
        );
        assert_eq!(
            board.request_shot(Vec2::new(f32::NAN, 1.0)).unwrap_err(),
            ShotRejected::NonFinite
        );
        assert_eq!(board.phase(), ShotPhase::Idle);
        assert!(board.flight().is_none());
    }

    #[test]
    fn test_only_one_shot_in_flight() {
        let mut board = Board::new(empty_config()).unwrap();
        board.request_shot(Vec2::Y).unwrap();
        assert_eq!(board.phase(), ShotPhase::InFlight);
        assert_eq!(board.request_shot(Vec2::Y).unwrap_err(), ShotRejected::Busy);

        while board.advance_waypoint().unwrap().is_some() {}
        assert_eq!(board.phase(), ShotPhase::Resolving);
        assert_eq!(board.request_shot(Vec2::Y).unwrap_err(), ShotRejected::Busy);
    }

    #[test]
    fn test_request_fires_loaded_color_and_reloads() {
        let config = BoardConfig {
            colors: 1,
            ..empty_config()
        };
        let mut board = Board::new(config).unwrap();
        assert_eq!(board.loaded_color(), Red);

        let flight = board.request_shot(Vec2::new(0.1, 1.0)).unwrap();
        assert_eq!(flight.color, Red);
        assert!((flight.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(flight.speed, 3.0);
        assert_eq!(board.loaded_color(), Red);
    }

    #[test]
    fn test_explicit_color_keeps_loaded_bubble() {
        let mut board = Board::new(empty_config()).unwrap();
        let loaded = board.loaded_color();
        let flight = board.request_shot_with(Vec2::Y, Purple).unwrap();
        assert_eq!(flight.color, Purple);
        assert_eq!(board.loaded_color(), loaded);
    }

    #[test]
    fn test_straight_shot_into_empty_board_wins() {
        let mut board = Board::new(empty_config()).unwrap();
        let outcome = board.shoot_with(Vec2::Y, Blue).unwrap();

        let placed = outcome.placed.unwrap();
        assert_eq!(placed.pos, GridPos::new(4, 0));
        assert_eq!(placed.local, board.layout().grid_to_local(GridPos::new(4, 0)));
        assert_eq!(outcome.signal, Some(GameSignal::Won));
        assert_eq!(board.phase(), ShotPhase::Won);
        assert_eq!(board.shoot(Vec2::Y).unwrap_err(), ShotRejected::GameWon);
    }

    #[test]
    fn test_matching_shot_pops_chain_and_drops_orphans() {
        let mut board = Board::new(striped_config()).unwrap();
        assert_eq!(board.grid().len(), 29);

        let outcome = board.shoot_with(Vec2::Y, Green).unwrap();

        assert_eq!(outcome.placed.map(|bubble| bubble.pos), Some(GridPos::new(4, 3)));

        let mut expected_popped: HashSet<GridPos> =
            (0..9).map(|col| GridPos::new(col, 2)).collect();
        expected_popped.insert(GridPos::new(4, 3));
        assert_eq!(cells(outcome.popped.iter().map(|bubble| bubble.pos)), expected_popped);
        assert!(outcome.popped.iter().all(|bubble| bubble.color == Green));

        assert_eq!(
            cells(outcome.dropped.iter().map(|dropped| dropped.bubble.pos)),
            cells([GridPos::new(0, 3), GridPos::new(1, 3)])
        );
        assert!(outcome.dropped.iter().all(|dropped| dropped.bubble.color == Yellow));
        assert!(
            outcome
                .dropped
                .iter()
                .all(|dropped| dropped.drop_to == -5.0 && dropped.drop_speed == 15.0)
        );

        assert_eq!(outcome.signal, None);
        assert_eq!(board.grid().len(), 18);
        assert_eq!(board.grid().lowest_row(), Some(1));
        assert_eq!(board.generation(), 1);
        assert_eq!(board.phase(), ShotPhase::Idle);
    }

    #[test]
    fn test_short_chain_only_sticks() {
        let mut board = Board::new(striped_config()).unwrap();
        let outcome = board.shoot_with(Vec2::Y, Red).unwrap();

        assert_eq!(outcome.placed.map(|bubble| bubble.pos), Some(GridPos::new(4, 3)));
        assert!(outcome.popped.is_empty());
        assert!(outcome.dropped.is_empty());
        assert_eq!(board.grid().len(), 30);
        assert_eq!(board.generation(), 0);
    }

    #[test]
    fn test_overflow_loses_once_without_commit() {
        let config = BoardConfig {
            layout: LayoutStrategy::Stripes {
                rows: 13,
                colors: vec![Red, Blue, Green],
            },
            ..empty_config()
        };
        let mut board = Board::new(config).unwrap();
        assert_eq!(board.grid().len(), 117);

        let outcome = board.shoot_with(Vec2::Y, Red).unwrap();
        assert_eq!(outcome.signal, Some(GameSignal::Lost));
        assert_eq!(outcome.placed, None);
        assert_eq!(board.phase(), ShotPhase::Lost);
        assert_eq!(board.grid().len(), 117);

        assert_eq!(board.request_shot(Vec2::Y).unwrap_err(), ShotRejected::GameOver);
        assert_eq!(board.grid().len(), 117);
    }

    #[test]
    fn test_shallow_shots_stick_on_both_sides() {
        let config = BoardConfig {
            layout: LayoutStrategy::Stripes {
                rows: 3,
                colors: vec![Red, Blue, Green],
            },
            ..empty_config()
        };

        for degrees in (1..=10).chain(170..=179) {
            let mut board = Board::new(config.clone()).unwrap();
            let borders = board.borders();
            let direction = Vec2::from_angle((degrees as f32).to_radians());

            let flight = board.request_shot_with(direction, Yellow).unwrap();
            assert!(
                matches!(flight.ending, FlightEnding::Stuck(_)),
                "{degrees} degree shot ended {:?}",
                flight.ending
            );
            assert!(
                flight
                    .waypoints
                    .iter()
                    .all(|waypoint| (borders.left..=borders.right).contains(&waypoint.x)),
                "{degrees} degree shot left the board: {:?}",
                flight.waypoints
            );

            let outcome = board.finish_flight();
            let placed = outcome.placed.unwrap();
            assert_eq!(placed.pos.row, 3, "{degrees} degree shot rests at {}", placed.pos);
            assert_eq!(board.grid().len(), 28);
        }
    }

    #[test]
    fn test_wall_bounce_path() {
        let mut board = Board::new(empty_config()).unwrap();
        let cannon = board.cannon();
        let flight = board.request_shot_with(Vec2::new(-1.0, 1.0), Red).unwrap().clone();

        assert!(flight.bounces >= 1);
        assert!(flight.waypoints.len() >= 2);
        assert!(flight.waypoints[0].x < cannon.x);
        assert!(flight.waypoints[1].x > flight.waypoints[0].x);
        assert!(flight.path_length() > cannon.distance(flight.waypoints[0]));
        assert!(flight.travel_time() > 0.0);
    }

    #[test]
    fn test_resolve_waits_for_playback() {
        let mut board = Board::new(empty_config()).unwrap();
        assert_eq!(board.advance_waypoint().unwrap_err(), PlaybackError::NoShotInFlight);
        assert_eq!(board.resolve().unwrap_err(), PlaybackError::NoShotInFlight);

        let waypoints = board
            .request_shot_with(Vec2::new(-1.0, 1.0), Red)
            .unwrap()
            .waypoints
            .clone();
        assert!(waypoints.len() >= 2);

        assert_eq!(board.advance_waypoint().unwrap(), Some(waypoints[0]));
        assert_eq!(
            board.resolve().unwrap_err(),
            PlaybackError::PlaybackIncomplete {
                remaining: waypoints.len() - 1
            }
        );

        let mut played = vec![waypoints[0]];
        while let Some(waypoint) = board.advance_waypoint().unwrap() {
            played.push(waypoint);
        }
        assert_eq!(played, waypoints);
        assert_eq!(board.phase(), ShotPhase::Resolving);
        assert_eq!(board.advance_waypoint().unwrap(), None);

        let outcome = board.resolve().unwrap();
        assert_eq!(outcome.waypoints, waypoints);
        assert_ne!(board.phase(), ShotPhase::Resolving);
        assert!(board.flight().is_none());
    }

    #[test]
    fn test_reset_restores_seeded_board() {
        let config = BoardConfig {
            seed: Some(9),
            ..default()
        };
        let fresh = Board::new(config.clone()).unwrap();
        let mut board = Board::new(config).unwrap();

        board.shoot(Vec2::new(0.3, 1.0)).unwrap();
        board.reset();

        assert_eq!(board.grid(), fresh.grid());
        assert_eq!(board.loaded_color(), fresh.loaded_color());
        assert_eq!(board.generation(), 0);
        assert_eq!(board.phase(), ShotPhase::Idle);
    }
}
