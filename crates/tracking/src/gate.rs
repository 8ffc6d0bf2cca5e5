//! Write gate: bounds how often a location sample may be persisted.
//!
//! The gate accepts a bounded burst of writes, then forces a cooling pause
//! before accepting again. This protects the downstream store from a storm
//! of small updates while keeping the persisted position recent. The gate
//! only decides *whether* to write; performing the write and handling its
//! errors belong to the caller.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, TrackingError};

#[derive(Clone, Copy, Debug)]
pub struct WriteGateConfig {
    /// Writes accepted back-to-back before a cooling pause begins.
    pub max_consecutive_writes: u32,
    /// Length of the cooling pause.
    pub pause_duration: Duration,
    /// Optional minimum spacing between accepted writes.
    pub min_write_interval: Option<Duration>,
}

impl Default for WriteGateConfig {
    fn default() -> Self {
        Self {
            max_consecutive_writes: 6,
            pause_duration: Duration::seconds(60),
            min_write_interval: None,
        }
    }
}

impl WriteGateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_consecutive_writes == 0 {
            return Err(TrackingError::InvalidConfig(
                "max consecutive writes must be at least 1".into(),
            ));
        }
        if self.pause_duration <= Duration::zero() {
            return Err(TrackingError::InvalidConfig(format!(
                "pause duration must be positive, got {}",
                self.pause_duration
            )));
        }
        if let Some(interval) = self.min_write_interval {
            if interval <= Duration::zero() {
                return Err(TrackingError::InvalidConfig(format!(
                    "write interval must be positive, got {}",
                    interval
                )));
            }
        }
        Ok(())
    }
}

/// Which part of the Idle → Writing → Cooling cycle the gate is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePhase {
    /// No writes accepted yet since the last pause (or ever).
    Idle,
    /// Mid-burst: some writes accepted, burst limit not yet reached.
    Writing,
    /// Pause in effect; all writes rejected until it elapses.
    Cooling,
}

/// Outcome of offering a candidate write to the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteDecision {
    Accepted,
    /// Rejected: cooling pause in effect until the given instant.
    Cooling { until: DateTime<Utc> },
    /// Rejected: too soon after the previous accepted write.
    TooSoon { earliest: DateTime<Utc> },
}

impl WriteDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, WriteDecision::Accepted)
    }
}

/// Timer-driven rate limiter over candidate writes.
///
/// Callers pass `now` explicitly, so the gate is deterministic and owns no
/// clock. One gate instance per tracked entity; no internal locking.
#[derive(Clone, Debug)]
pub struct WriteGate {
    config: WriteGateConfig,
    last_write_at: Option<DateTime<Utc>>,
    consecutive_writes: u32,
    paused_until: Option<DateTime<Utc>>,
}

impl WriteGate {
    pub fn new(config: WriteGateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            last_write_at: None,
            consecutive_writes: 0,
            paused_until: None,
        })
    }

    pub fn phase(&self, now: DateTime<Utc>) -> GatePhase {
        match self.paused_until {
            Some(until) if now < until => GatePhase::Cooling,
            _ if self.consecutive_writes > 0 => GatePhase::Writing,
            _ => GatePhase::Idle,
        }
    }

    pub fn last_write_at(&self) -> Option<DateTime<Utc>> {
        self.last_write_at
    }

    /// Offer a candidate write at `now`.
    ///
    /// Rejections leave the counter and pause untouched; an accept that
    /// reaches the burst limit starts the cooling pause.
    pub fn offer(&mut self, now: DateTime<Utc>) -> WriteDecision {
        if let Some(until) = self.paused_until {
            if now < until {
                return WriteDecision::Cooling { until };
            }
            // Pause completed: counter back to zero before the next burst.
            self.paused_until = None;
            self.consecutive_writes = 0;
        }

        if let (Some(interval), Some(last)) = (self.config.min_write_interval, self.last_write_at) {
            let earliest = last + interval;
            if now < earliest {
                return WriteDecision::TooSoon { earliest };
            }
        }

        self.consecutive_writes += 1;
        self.last_write_at = Some(now);

        if self.consecutive_writes >= self.config.max_consecutive_writes {
            self.paused_until = Some(now + self.config.pause_duration);
            self.consecutive_writes = 0;
        }

        WriteDecision::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_accepts_burst_then_cools() {
        let mut gate = WriteGate::new(WriteGateConfig::default()).unwrap();
        let start = t0();

        // Exactly six accepts, one per second.
        for i in 0..6 {
            let now = start + Duration::seconds(i);
            assert_eq!(gate.offer(now), WriteDecision::Accepted, "write {}", i);
        }

        // Everything inside the 60 s pause is rejected.
        let paused_at = start + Duration::seconds(5);
        let until = paused_at + Duration::seconds(60);
        for offset in [6, 30, 64] {
            let now = start + Duration::seconds(offset);
            assert_eq!(gate.offer(now), WriteDecision::Cooling { until });
        }

        // Acceptance resumes once the pause elapses.
        assert_eq!(gate.offer(until), WriteDecision::Accepted);
    }

    #[test]
    fn test_counter_resets_after_pause() {
        let mut gate = WriteGate::new(WriteGateConfig {
            max_consecutive_writes: 2,
            pause_duration: Duration::seconds(10),
            min_write_interval: None,
        })
        .unwrap();
        let start = t0();

        assert!(gate.offer(start).is_accepted());
        assert!(gate.offer(start + Duration::seconds(1)).is_accepted());

        // A fresh full burst is available after each pause.
        let resumed = start + Duration::seconds(11);
        assert!(gate.offer(resumed).is_accepted());
        assert!(gate.offer(resumed + Duration::seconds(1)).is_accepted());
        assert!(matches!(
            gate.offer(resumed + Duration::seconds(2)),
            WriteDecision::Cooling { .. }
        ));
    }

    #[test]
    fn test_phase_transitions() {
        let mut gate = WriteGate::new(WriteGateConfig {
            max_consecutive_writes: 3,
            pause_duration: Duration::seconds(30),
            min_write_interval: None,
        })
        .unwrap();
        let start = t0();

        assert_eq!(gate.phase(start), GatePhase::Idle);

        gate.offer(start);
        assert_eq!(gate.phase(start), GatePhase::Writing);

        gate.offer(start + Duration::seconds(1));
        gate.offer(start + Duration::seconds(2));
        assert_eq!(gate.phase(start + Duration::seconds(3)), GatePhase::Cooling);

        assert_eq!(gate.phase(start + Duration::seconds(40)), GatePhase::Idle);
    }

    #[test]
    fn test_min_write_interval_spacing() {
        let mut gate = WriteGate::new(WriteGateConfig {
            max_consecutive_writes: 6,
            pause_duration: Duration::seconds(60),
            min_write_interval: Some(Duration::seconds(5)),
        })
        .unwrap();
        let start = t0();

        assert!(gate.offer(start).is_accepted());
        assert_eq!(
            gate.offer(start + Duration::seconds(2)),
            WriteDecision::TooSoon {
                earliest: start + Duration::seconds(5)
            }
        );
        assert!(gate.offer(start + Duration::seconds(5)).is_accepted());
    }

    #[test]
    fn test_rejection_does_not_consume_budget() {
        let mut gate = WriteGate::new(WriteGateConfig {
            max_consecutive_writes: 2,
            pause_duration: Duration::seconds(10),
            min_write_interval: Some(Duration::seconds(5)),
        })
        .unwrap();
        let start = t0();

        assert!(gate.offer(start).is_accepted());
        // Spammed offers inside the interval are rejected without counting.
        for i in 1..5 {
            assert!(matches!(
                gate.offer(start + Duration::seconds(i)),
                WriteDecision::TooSoon { .. }
            ));
        }
        assert!(gate.offer(start + Duration::seconds(5)).is_accepted());
    }

    #[test]
    fn test_config_validation() {
        assert!(WriteGate::new(WriteGateConfig {
            max_consecutive_writes: 0,
            ..Default::default()
        })
        .is_err());

        assert!(WriteGate::new(WriteGateConfig {
            pause_duration: Duration::zero(),
            ..Default::default()
        })
        .is_err());

        assert!(WriteGate::new(WriteGateConfig {
            min_write_interval: Some(Duration::seconds(-1)),
            ..Default::default()
        })
        .is_err());
    }
}
