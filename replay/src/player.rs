use model::{DayLog, ExecutiveID, LonLat, RoutePath};
use serde::Serialize;

use crate::geo;
use crate::segment::{visible_segments, Segment};

/// Wall-clock time to traverse a whole route at speed 1
pub const DEFAULT_BASE_DURATION_MS: f64 = 60_000.0;

/// Everything the map layer needs to draw one frame of a replay. Rebuilt as a
/// whole on every update; callers never see a half-updated state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySnapshot {
    /// The last whole route point the marker has reached
    pub current_index: usize,
    /// Percent of the route traversed, 0 to 100
    pub progress: f64,
    pub is_playing: bool,
    /// Interpolated marker position. None only for an empty route.
    pub current_position: Option<LonLat>,
    /// Direction of travel in compass degrees, [0, 360)
    pub current_bearing: f64,
    pub visible_segments: Vec<Segment>,
}

/// Replays one executive's route. The host render loop calls `tick` with its
/// clock once per frame; all controls are synchronous and never fail, only
/// degrade to no-ops. The route is fixed for the lifetime of one player; to
/// replay a different route, make a new player.
pub struct Player {
    path: RoutePath,
    speed: f64,
    base_duration_ms: f64,
    // Wall-clock anchor of the current play stretch. Cleared by pause, seek
    // and speed changes; the next tick re-derives it from elapsed_ms.
    started_at_ms: Option<f64>,
    // Progress expressed as milliseconds spent at the current speed
    elapsed_ms: f64,
    on_complete: Option<Box<dyn FnMut()>>,
    // Armed again by reset or by seeking back below 100
    completion_fired: bool,
    snapshot: ReplaySnapshot,
}

impl Player {
    pub fn new(path: RoutePath, speed: f64) -> Self {
        Self::with_base_duration(path, speed, DEFAULT_BASE_DURATION_MS)
    }

    pub fn with_base_duration(path: RoutePath, speed: f64, base_duration_ms: f64) -> Self {
        if !(speed > 0.0) {
            warn!("Replay speed {speed} is not positive; using 1");
        }
        let snapshot = initial_snapshot(&path);
        Self {
            path,
            speed: if speed > 0.0 { speed } else { 1.0 },
            base_duration_ms,
            started_at_ms: None,
            elapsed_ms: 0.0,
            on_complete: None,
            completion_fired: false,
            snapshot,
        }
    }

    /// Called once each time playback reaches the end of the route
    pub fn on_complete<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn snapshot(&self) -> &ReplaySnapshot {
        &self.snapshot
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn duration_ms(&self) -> f64 {
        self.base_duration_ms / self.speed
    }

    fn can_replay(&self) -> bool {
        self.path.len() >= 2
    }

    /// Starts playback, or resumes it from wherever pause or seek left the
    /// marker. A route with fewer than 2 points has no motion to show, so
    /// this is a no-op for it, as it is when already playing or finished.
    pub fn play(&mut self, now_ms: f64) {
        if !self.can_replay() {
            warn!("Not replaying a route with only {} points", self.path.len());
            return;
        }
        if self.snapshot.is_playing || self.snapshot.progress >= 100.0 {
            return;
        }
        self.started_at_ms = Some(now_ms - self.elapsed_ms);
        let progress = self.snapshot.progress;
        self.publish(progress, true);
    }

    /// Advances playback to the host's clock and returns the fresh state.
    /// Does nothing while paused or finished, so a stale frame callback can
    /// never clobber state published after it was scheduled.
    pub fn tick(&mut self, now_ms: f64) -> &ReplaySnapshot {
        if !self.snapshot.is_playing {
            return &self.snapshot;
        }
        let started = *self.started_at_ms.get_or_insert(now_ms - self.elapsed_ms);
        self.elapsed_ms = (now_ms - started).max(0.0);
        let raw = self.elapsed_ms / self.duration_ms() * 100.0;
        // Host timers jitter; never let the marker slide backwards mid-play
        let progress = raw.min(100.0).max(self.snapshot.progress);
        self.publish(progress, true);
        &self.snapshot
    }

    /// Idempotent. Progress is kept, so a later play() resumes here.
    pub fn pause(&mut self) {
        if !self.snapshot.is_playing {
            return;
        }
        self.elapsed_ms = self.snapshot.progress / 100.0 * self.duration_ms();
        self.started_at_ms = None;
        let progress = self.snapshot.progress;
        self.publish(progress, false);
    }

    /// Back to the start: not playing, nothing traversed yet
    pub fn reset(&mut self) {
        self.started_at_ms = None;
        self.elapsed_ms = 0.0;
        self.completion_fired = false;
        self.snapshot = initial_snapshot(&self.path);
    }

    /// Jumps to a percent of the route, clamped to [0, 100], and publishes
    /// the new state synchronously. This is the one move allowed to send
    /// progress backwards. A playing replay keeps playing from the new spot;
    /// a paused one stays paused there.
    pub fn seek_to(&mut self, target_progress: f64) {
        if !self.can_replay() {
            return;
        }
        let progress = target_progress.clamp(0.0, 100.0);
        self.elapsed_ms = progress / 100.0 * self.duration_ms();
        self.started_at_ms = None;
        if progress < 100.0 {
            self.completion_fired = false;
        }
        let keep_playing = self.snapshot.is_playing;
        self.publish(progress, keep_playing);
    }

    /// Changes the rate without moving the marker: progress so far is kept
    /// and only future frames advance at the new speed. Rates that make no
    /// sense are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if !(speed > 0.0) {
            warn!("Ignoring replay speed {speed}");
            return;
        }
        self.speed = speed;
        self.elapsed_ms = self.snapshot.progress / 100.0 * self.duration_ms();
        self.started_at_ms = None;
    }

    // Derives one whole snapshot from a progress percent. Only reachable once
    // the route has at least 2 points.
    fn publish(&mut self, progress: f64, keep_playing: bool) {
        let points = self.path.points();
        let last = points.len() - 1;
        let fractional_index = progress / 100.0 * (last as f64);
        let target = fractional_index.floor() as usize;

        if target >= last {
            // The end: snap to the exact final point, no interpolation
            let end = points[last].lon_lat();
            // A stationary final leg keeps the heading it arrived with
            let bearing = if points[last - 1].lon_lat() == end {
                self.snapshot.current_bearing
            } else {
                geo::initial_bearing(points[last - 1].lon_lat(), end)
            };
            self.snapshot = ReplaySnapshot {
                current_index: last,
                progress: 100.0,
                is_playing: false,
                current_position: Some(end),
                current_bearing: bearing,
                visible_segments: visible_segments(points, last, None),
            };
            self.elapsed_ms = self.duration_ms();
            self.started_at_ms = None;
            if !self.completion_fired {
                self.completion_fired = true;
                if let Some(callback) = self.on_complete.as_mut() {
                    callback();
                }
            }
            return;
        }

        let fraction = fractional_index - target as f64;
        let start = points[target].lon_lat();
        let end = points[target + 1].lon_lat();
        let position = geo::interpolate_position(start, end, fraction);
        // A zero-length leg has no direction; keep pointing the way we were
        let bearing = if start == end {
            self.snapshot.current_bearing
        } else {
            geo::initial_bearing(start, end)
        };
        self.snapshot = ReplaySnapshot {
            current_index: target,
            progress,
            is_playing: keep_playing,
            current_position: Some(position),
            current_bearing: bearing,
            visible_segments: visible_segments(points, target, Some(position)),
        };
    }
}

fn initial_snapshot(path: &RoutePath) -> ReplaySnapshot {
    ReplaySnapshot {
        current_index: 0,
        progress: 0.0,
        is_playing: false,
        current_position: path.points().first().map(|pt| pt.lon_lat()),
        current_bearing: 0.0,
        visible_segments: Vec::new(),
    }
}

/// One independent player per executive. Replaying two routes side by side
/// must not share any timing state, so every call builds a fresh player.
pub fn player_for(day: &DayLog, id: ExecutiveID) -> Option<Player> {
    day.executive(id)
        .map(|exec| Player::new(exec.route.clone(), 1.0))
}
