//! Boarding detection by geodesic proximity with hysteresis.
//!
//! A rider counts as on board once they come within the enter radius of the
//! vehicle, and stays on board until they move out past the (larger) exit
//! radius. Two distinct thresholds prevent the state from flapping when the
//! distance hovers near a single boundary.

use geo::Point;

use crate::error::{Result, TrackingError};
use crate::spatial::distance_meters;

/// Enter/exit radii in meters. Enter must be strictly smaller than exit.
#[derive(Clone, Copy, Debug)]
pub struct ProximityConfig {
    /// Distance at or below which an off-board rider is considered boarded.
    pub enter_radius_m: f64,
    /// Distance at or above which an on-board rider is considered alighted.
    pub exit_radius_m: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            enter_radius_m: 8.0,
            exit_radius_m: 20.0,
        }
    }
}

impl ProximityConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enter_radius_m.is_finite() || self.enter_radius_m <= 0.0 {
            return Err(TrackingError::InvalidConfig(format!(
                "enter radius must be positive, got {}",
                self.enter_radius_m
            )));
        }
        if !self.exit_radius_m.is_finite() || self.exit_radius_m <= 0.0 {
            return Err(TrackingError::InvalidConfig(format!(
                "exit radius must be positive, got {}",
                self.exit_radius_m
            )));
        }
        if self.enter_radius_m >= self.exit_radius_m {
            return Err(TrackingError::InvalidConfig(format!(
                "enter radius ({}) must be smaller than exit radius ({})",
                self.enter_radius_m, self.exit_radius_m
            )));
        }
        Ok(())
    }
}

/// Rolling evaluation state for one rider/vehicle pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProximityState {
    pub last_known_distance_m: f64,
    pub on_board: bool,
}

/// Boarding state change. Emitted only on transition, not on every sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardingTransition {
    Boarded,
    Alighted,
}

/// Threshold-crossing evaluator over a stream of (rider, vehicle) pairs.
#[derive(Clone, Debug)]
pub struct ProximityEvaluator {
    config: ProximityConfig,
    state: ProximityState,
}

impl ProximityEvaluator {
    pub fn new(config: ProximityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ProximityState::default(),
        })
    }

    pub fn state(&self) -> ProximityState {
        self.state
    }

    /// Evaluate one sample pair. Returns the transition if the boarding
    /// state changed. Invalid coordinates leave prior state untouched.
    pub fn observe(&mut self, rider: Point, vehicle: Point) -> Result<Option<BoardingTransition>> {
        let distance = distance_meters(rider, vehicle)?;

        let transition = if !self.state.on_board && distance <= self.config.enter_radius_m {
            self.state.on_board = true;
            Some(BoardingTransition::Boarded)
        } else if self.state.on_board && distance >= self.config.exit_radius_m {
            self.state.on_board = false;
            Some(BoardingTransition::Alighted)
        } else {
            None
        };

        self.state.last_known_distance_m = distance;
        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::destination_point;
    use std::f64::consts::FRAC_PI_2;

    fn evaluator() -> ProximityEvaluator {
        ProximityEvaluator::new(ProximityConfig::default()).unwrap()
    }

    fn offset_east(origin: Point, meters: f64) -> Point {
        destination_point(origin, FRAC_PI_2, meters).unwrap()
    }

    #[test]
    fn test_boards_at_exact_vehicle_position() {
        let vehicle = Point::new(77.2090, 28.6139);
        let mut eval = evaluator();

        let transition = eval.observe(vehicle, vehicle).unwrap();
        assert_eq!(transition, Some(BoardingTransition::Boarded));
        assert!(eval.state().on_board);
        assert_eq!(eval.state().last_known_distance_m, 0.0);
    }

    #[test]
    fn test_hysteresis_holds_between_thresholds() {
        let vehicle = Point::new(77.2090, 28.6139);
        let mut eval = evaluator();

        assert_eq!(
            eval.observe(offset_east(vehicle, 5.0), vehicle).unwrap(),
            Some(BoardingTransition::Boarded)
        );

        // 15 m is past the enter radius but short of the exit radius.
        assert_eq!(eval.observe(offset_east(vehicle, 15.0), vehicle).unwrap(), None);
        assert!(eval.state().on_board);

        assert_eq!(
            eval.observe(offset_east(vehicle, 25.0), vehicle).unwrap(),
            Some(BoardingTransition::Alighted)
        );
        assert!(!eval.state().on_board);
    }

    #[test]
    fn test_no_repeat_events_without_state_change() {
        let vehicle = Point::new(77.2090, 28.6139);
        let mut eval = evaluator();

        assert!(eval.observe(vehicle, vehicle).unwrap().is_some());
        assert_eq!(eval.observe(vehicle, vehicle).unwrap(), None);
        assert_eq!(eval.observe(offset_east(vehicle, 2.0), vehicle).unwrap(), None);
    }

    #[test]
    fn test_off_board_between_thresholds_stays_off() {
        let vehicle = Point::new(77.2090, 28.6139);
        let mut eval = evaluator();

        // Never got within the enter radius, so 15 m is not a boarding.
        assert_eq!(eval.observe(offset_east(vehicle, 15.0), vehicle).unwrap(), None);
        assert!(!eval.state().on_board);
    }

    #[test]
    fn test_invalid_sample_leaves_state_unchanged() {
        let vehicle = Point::new(77.2090, 28.6139);
        let mut eval = evaluator();
        eval.observe(vehicle, vehicle).unwrap();

        let before = eval.state();
        assert!(eval.observe(Point::new(77.2090, 91.0), vehicle).is_err());
        let after = eval.state();

        assert_eq!(before.on_board, after.on_board);
        assert_eq!(before.last_known_distance_m, after.last_known_distance_m);
    }

    #[test]
    fn test_config_validation() {
        assert!(ProximityEvaluator::new(ProximityConfig {
            enter_radius_m: 0.0,
            exit_radius_m: 20.0,
        })
        .is_err());

        assert!(ProximityEvaluator::new(ProximityConfig {
            enter_radius_m: 20.0,
            exit_radius_m: 8.0,
        })
        .is_err());

        assert!(ProximityEvaluator::new(ProximityConfig {
            enter_radius_m: 8.0,
            exit_radius_m: 8.0,
        })
        .is_err());
    }
}
