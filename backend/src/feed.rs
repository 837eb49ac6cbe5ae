// Ingestion-side handoff: the lap list, live session, and reference choice.
//
// The network ingestion service owns this store's contents; the analytics
// side only ever reads copy-on-read snapshots. A lap becomes visible to
// readers in a single push under the write lock, fully formed.

use std::env;
use std::net::IpAddr;

use lap_core::model::{Lap, Sample, Session};
use lap_core::selector::ReferenceChoice;

use crate::scheduler::SourceSnapshot;
use crate::utils::format_lap_time;

/// Startup configuration for the ingestion collaborator. A missing endpoint
/// is the one fatal configuration error: there is nothing to analyze without
/// a console to listen to.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub playstation_ip: IpAddr,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("PLAYSTATION_IP")
            .map_err(|_| "PLAYSTATION_IP is not set".to_string())?;
        let playstation_ip = raw
            .parse::<IpAddr>()
            .map_err(|_| format!("PLAYSTATION_IP {:?} is not a valid address", raw))?;
        Ok(Self { playstation_ip })
    }
}

#[derive(Debug, Default)]
pub struct FeedStore {
    connected: bool,
    /// Most-recent-first, matching the order comparisons expect.
    laps: Vec<Lap>,
    session: Session,
    reference_choice: ReferenceChoice,
    /// Samples of the lap currently in progress. Never visible to readers
    /// until a lap boundary turns them into a published `Lap`.
    live: Vec<Sample>,
    next_lap_number: i32,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            next_lap_number: 1,
            ..Default::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn update_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn reference_choice(&self) -> ReferenceChoice {
        self.reference_choice
    }

    pub fn set_reference_choice(&mut self, choice: ReferenceChoice) {
        self.reference_choice = choice;
    }

    /// Appends one in-flight telemetry sample to the lap under construction.
    pub fn push_sample(&mut self, sample: Sample) {
        self.live.push(sample);
    }

    /// Publishes a fully formed lap at the head of the list.
    pub fn publish_lap(&mut self, lap: Lap) {
        self.next_lap_number = self.next_lap_number.max(lap.number + 1);
        self.laps.insert(0, lap);
    }

    /// Forces a lap boundary on the samples accumulated so far. Returns the
    /// published lap, or `None` when nothing was captured yet.
    pub fn finish_lap(&mut self, manual: bool) -> Option<Lap> {
        if self.live.is_empty() {
            return None;
        }
        let samples = std::mem::take(&mut self.live);
        let first = samples[0];
        let last = samples[samples.len() - 1];

        let lap_time_ms = last.elapsed_ms.saturating_sub(first.elapsed_ms) as u64;
        let lap = Lap {
            number: self.next_lap_number,
            title: format_lap_time(lap_time_ms),
            lap_time_ms,
            fuel_at_start: first.fuel_level,
            fuel_at_end: last.fuel_level,
            full_throttle_ticks: samples.iter().filter(|s| s.throttle_pct >= 100.0).count() as u32,
            full_brake_ticks: samples.iter().filter(|s| s.brake_pct >= 100.0).count() as u32,
            no_throttle_ticks: samples.iter().filter(|s| s.throttle_pct == 0.0).count() as u32,
            tire_spin_ticks: 0,
            manually_logged: manual,
            samples,
        };
        self.publish_lap(lap.clone());
        Some(lap)
    }

    /// Clears accumulated laps and the live buffer.
    pub fn reset(&mut self) {
        self.laps.clear();
        self.live.clear();
        self.session = Session::default();
        self.reference_choice = ReferenceChoice::Unset;
        self.next_lap_number = 1;
    }

    /// Bulk import, either replacing the current list or appending behind it.
    pub fn load_laps(&mut self, laps: Vec<Lap>, replace_others: bool) {
        if replace_others {
            self.laps = laps;
        } else {
            self.laps.extend(laps);
        }
        let highest = self.laps.iter().map(|lap| lap.number).max().unwrap_or(0);
        self.next_lap_number = self.next_lap_number.max(highest + 1);
    }

    /// Copy-on-read snapshot for the scheduler. Readers never observe a lap
    /// under construction.
    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            connected: self.connected,
            laps: self.laps.clone(),
            session: self.session,
            reference_choice: self.reference_choice,
        }
    }
}
