//! Shot messages and the systems that feed them through the [`Board`].
//!
//! Input sends [`RequestShot`]; rendering listens for [`ShotLaunched`], plays
//! the waypoints back and answers with one [`WaypointReached`] per waypoint
//! when the board uses [`Playback::Driven`]. Once the shot settles the
//! outcome goes out as [`ShotResolved`] plus the finer-grained messages.

use bevy::{ecs::system::SystemParam, prelude::*};

use super::{
    board::{Board, BubbleAt, DroppedBubble, GameSignal, ShotFlight, ShotOutcome, ShotPhase},
    bubble::BubbleColor,
    config::{BoardConfig, Playback},
    error::ShotRejected,
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<RequestShot>();
    app.add_message::<WaypointReached>();
    app.add_message::<ResetBoard>();
    app.add_message::<ShotLaunched>();
    app.add_message::<ShotDenied>();
    app.add_message::<ShotResolved>();
    app.add_message::<BubblePlaced>();
    app.add_message::<ClusterPopped>();
    app.add_message::<FloatingBubblesDropped>();
    app.add_message::<GameWon>();
    app.add_message::<GameLost>();

    app.add_systems(Startup, create_board);

    app.add_systems(
        Update,
        (reset_board, handle_shot_requests, drive_playback)
            .chain()
            .in_set(ShotSystems),
    );
}

/// System set for shot handling. Order your own systems against it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShotSystems;

/// Ask the board to fire. `color: None` fires the loaded bubble.
#[derive(Message, Debug, Clone, Copy)]
pub struct RequestShot {
    pub direction: Vec2,
    pub color: Option<BubbleColor>,
}

/// The projectile reached its next waypoint. Only used with [`Playback::Driven`].
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct WaypointReached;

/// Start a new game on the current board.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetBoard;

#[derive(Message, Debug, Clone)]
pub struct ShotLaunched {
    pub flight: ShotFlight,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ShotDenied {
    pub direction: Vec2,
    pub reason: ShotRejected,
}

#[derive(Message, Debug, Clone)]
pub struct ShotResolved {
    pub outcome: ShotOutcome,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct BubblePlaced {
    pub bubble: BubbleAt,
}

/// Message sent when a chain is popped.
#[derive(Message, Debug, Clone)]
pub struct ClusterPopped {
    pub bubbles: Vec<BubbleAt>,
    pub color: BubbleColor,
    pub count: usize,
}

/// Message sent when bubbles cut off from the ceiling fall.
#[derive(Message, Debug, Clone)]
pub struct FloatingBubblesDropped {
    pub bubbles: Vec<DroppedBubble>,
    pub count: usize,
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct GameWon;

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct GameLost;

/// Writers for everything a resolved shot announces.
#[derive(SystemParam)]
struct OutcomeWriters<'w> {
    resolved: MessageWriter<'w, ShotResolved>,
    placed: MessageWriter<'w, BubblePlaced>,
    popped: MessageWriter<'w, ClusterPopped>,
    dropped: MessageWriter<'w, FloatingBubblesDropped>,
    won: MessageWriter<'w, GameWon>,
    lost: MessageWriter<'w, GameLost>,
}

impl OutcomeWriters<'_> {
    fn emit(&mut self, outcome: ShotOutcome) {
        if let Some(bubble) = outcome.placed {
            self.placed.write(BubblePlaced { bubble });
        }
        if !outcome.popped.is_empty() {
            self.popped.write(ClusterPopped {
                bubbles: outcome.popped.clone(),
                color: outcome.color,
                count: outcome.popped.len(),
            });
        }
        if !outcome.dropped.is_empty() {
            self.dropped.write(FloatingBubblesDropped {
                bubbles: outcome.dropped.clone(),
                count: outcome.dropped.len(),
            });
        }
        match outcome.signal {
            Some(GameSignal::Won) => {
                self.won.write(GameWon);
            }
            Some(GameSignal::Lost) => {
                self.lost.write(GameLost);
            }
            None => {}
        }
        self.resolved.write(ShotResolved { outcome });
    }
}

/// Build the board from [`BoardConfig`] unless the host already inserted one.
fn create_board(mut commands: Commands, config: Res<BoardConfig>, existing: Option<Res<Board>>) {
    if existing.is_some() {
        debug!("Board already present, skipping creation from config");
        return;
    }

    match Board::new(config.clone()) {
        Ok(board) => commands.insert_resource(board),
        Err(err) => error!("Could not create board: {err}"),
    }
}

fn reset_board(mut resets: MessageReader<ResetBoard>, board: Option<ResMut<Board>>) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    if let Some(mut board) = board {
        board.reset();
        info!("Board reset");
    }
}

fn handle_shot_requests(
    mut requests: MessageReader<RequestShot>,
    board: Option<ResMut<Board>>,
    mut launched: MessageWriter<ShotLaunched>,
    mut denied: MessageWriter<ShotDenied>,
    mut outcomes: OutcomeWriters,
) {
    let Some(mut board) = board else {
        if !requests.is_empty() {
            warn!("Ignoring {} shot request(s): no board", requests.len());
            requests.clear();
        }
        return;
    };

    for request in requests.read() {
        let result = match request.color {
            Some(color) => board.request_shot_with(request.direction, color),
            None => board.request_shot(request.direction),
        };

        match result {
            Ok(flight) => {
                launched.write(ShotLaunched { flight: flight.clone() });
            }
            Err(reason) => {
                denied.write(ShotDenied {
                    direction: request.direction,
                    reason,
                });
                continue;
            }
        }

        if board.playback() == Playback::Instant {
            let outcome = board.finish_flight();
            outcomes.emit(outcome);
        }
    }
}

/// Advance the in-flight shot once per [`WaypointReached`], then resolve it.
fn drive_playback(
    mut reached: MessageReader<WaypointReached>,
    board: Option<ResMut<Board>>,
    mut outcomes: OutcomeWriters,
) {
    let Some(mut board) = board else {
        reached.clear();
        return;
    };

    for _ in reached.read() {
        match board.advance_waypoint() {
            Ok(Some(waypoint)) => debug!("Projectile reached {:?}", waypoint),
            Ok(None) => {}
            Err(err) => debug!("Ignoring waypoint: {err}"),
        }
    }

    if board.phase() == ShotPhase::Resolving {
        match board.resolve() {
            Ok(outcome) => outcomes.emit(outcome),
            Err(err) => error!("Could not resolve shot: {err}"),
        }
    }
}
