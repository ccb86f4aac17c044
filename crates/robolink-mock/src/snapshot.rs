//! Replay of recorded environment snapshots.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One recorded point of an environment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Where the snapshot was recorded ("step", "reset", ...).
    #[serde(default)]
    pub source: String,
    pub time: f64,
    #[serde(default)]
    pub env_id: String,
    #[serde(default)]
    pub run_id: String,
    pub episode: u64,
    pub step: u64,
    #[serde(default)]
    pub reward: f64,
    #[serde(default)]
    pub done: bool,
}

// ---------------------------------------------------------------------------
// SnapshotPlayback
// ---------------------------------------------------------------------------

/// Ordered replay over a recorded snapshot list.
///
/// Sequential consumption walks the list once; a seek rescans from the
/// beginning and positions the cursor just past the snapshot it found, so
/// replay continues from there.
#[derive(Debug, Clone)]
pub struct SnapshotPlayback {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl SnapshotPlayback {
    /// Replay over `snapshots` in the order given (recording order).
    #[must_use]
    pub const fn new(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            cursor: 0,
        }
    }

    /// Number of recorded snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The next snapshot in recording order, or `None` at the end.
    pub fn next_snapshot(&mut self) -> Option<Snapshot> {
        let snapshot = self.snapshots.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(snapshot)
    }

    /// The oldest snapshot matching every supplied filter.
    ///
    /// `None` filters match anything; seeking with all filters `None`
    /// rewinds to the first snapshot. On a hit the cursor moves just past
    /// the match; on a miss the cursor is left unchanged.
    pub fn seek_snapshot(
        &mut self,
        run_id: Option<&str>,
        episode: Option<u64>,
        step: Option<u64>,
    ) -> Option<Snapshot> {
        let index = self.snapshots.iter().position(|s| {
            run_id.map_or(true, |r| s.run_id == r)
                && episode.map_or(true, |e| s.episode == e)
                && step.map_or(true, |n| s.step == n)
        })?;
        self.cursor = index + 1;
        Some(self.snapshots[index].clone())
    }

    /// Rewind to the start and return the first snapshot, if any.
    pub fn first_snapshot(&mut self) -> Option<Snapshot> {
        self.seek_snapshot(None, None, None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(run_id: &str, episode: u64, step: u64) -> Snapshot {
        Snapshot {
            source: "step".into(),
            run_id: run_id.into(),
            episode,
            step,
            ..Snapshot::default()
        }
    }

    fn playback() -> SnapshotPlayback {
        SnapshotPlayback::new(vec![
            snapshot("run-a", 1, 0),
            snapshot("run-a", 1, 1),
            snapshot("run-a", 2, 0),
            snapshot("run-b", 1, 0),
        ])
    }

    #[test]
    fn next_walks_in_order_then_none() {
        let mut playback = playback();
        assert_eq!(playback.next_snapshot().unwrap().step, 0);
        assert_eq!(playback.next_snapshot().unwrap().step, 1);
        assert_eq!(playback.next_snapshot().unwrap().episode, 2);
        assert_eq!(playback.next_snapshot().unwrap().run_id, "run-b");
        assert!(playback.next_snapshot().is_none());
        assert!(playback.next_snapshot().is_none());
    }

    #[test]
    fn seek_finds_oldest_match() {
        let mut playback = playback();
        let found = playback.seek_snapshot(Some("run-a"), Some(2), None).unwrap();
        assert_eq!(found.episode, 2);
        // replay continues after the match
        assert_eq!(playback.next_snapshot().unwrap().run_id, "run-b");
    }

    #[test]
    fn seek_with_all_filters() {
        let mut playback = playback();
        let found = playback
            .seek_snapshot(Some("run-a"), Some(1), Some(1))
            .unwrap();
        assert_eq!(found.step, 1);
    }

    #[test]
    fn seek_miss_leaves_cursor_unchanged() {
        let mut playback = playback();
        playback.next_snapshot().unwrap();
        assert!(playback.seek_snapshot(Some("run-c"), None, None).is_none());
        assert_eq!(playback.next_snapshot().unwrap().step, 1);
    }

    #[test]
    fn first_snapshot_rewinds() {
        let mut playback = playback();
        playback.next_snapshot().unwrap();
        playback.next_snapshot().unwrap();
        let first = playback.first_snapshot().unwrap();
        assert_eq!(first.episode, 1);
        assert_eq!(first.step, 0);
        assert_eq!(playback.next_snapshot().unwrap().step, 1);
    }

    #[test]
    fn empty_playback() {
        let mut playback = SnapshotPlayback::new(Vec::new());
        assert!(playback.is_empty());
        assert!(playback.next_snapshot().is_none());
        assert!(playback.first_snapshot().is_none());
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snapshot = Snapshot {
            source: "reset".into(),
            time: 1.5,
            env_id: "robolink-env".into(),
            run_id: "run-a".into(),
            episode: 3,
            step: 0,
            reward: 0.25,
            done: true,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let snapshot2: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, snapshot2);
    }
}
