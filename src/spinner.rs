//! Wheel geometry and spin physics.
//!
//! Rendering belongs to the host application; this module owns the math it
//! renders from: proportional segment layout over the top-N entries, the
//! phrase/voter currently under the pointer, and the spin impulse/decay
//! simulation. Everything except the impulse draw is pure.

use crate::state::WheelEntry;

/// The pointer sits at the top of the wheel (90° in canvas terms)
pub const POINTER_ANGLE: f64 = 90.0;

const MIN_IMPULSE: f64 = 18.0;
const MAX_IMPULSE: f64 = 28.0;
const MAX_VELOCITY: f64 = 120.0;
const DECAY_PER_TICK: f64 = 0.985;
const STOP_THRESHOLD: f64 = 0.05;

/// One wedge of the wheel, angles in degrees from the wheel's zero mark
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub phrase: String,
    pub count: u32,
    pub start_deg: f64,
    pub extent_deg: f64,
}

/// What the pointer is currently indicating
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    pub phrase: String,
    /// Rotating "voted by" credit; `None` when the segment has no voters
    pub voted_by: Option<String>,
}

/// Lay the entries out as proportional segments. Zero-count entries get no
/// wedge.
pub fn layout(entries: &[WheelEntry]) -> Vec<Segment> {
    let total: u32 = entries.iter().map(|e| e.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    entries
        .iter()
        .filter(|e| e.count > 0)
        .map(|e| {
            let extent = 360.0 * f64::from(e.count) / f64::from(total);
            let segment = Segment {
                phrase: e.phrase.clone(),
                count: e.count,
                start_deg: start,
                extent_deg: extent,
            };
            start += extent;
            segment
        })
        .collect()
}

/// Resolve the phrase and voter under the pointer for a given rotation.
///
/// Each segment is subdivided into equal voter slots so the credit label
/// rotates through the segment's voters as the wheel turns. When a manual
/// override inflates the count past the live voter list, the missing slots
/// are padded with `unknown-N` placeholders.
pub fn pointer_details(entries: &[WheelEntry], rotation: f64) -> Option<Pointer> {
    let active: Vec<&WheelEntry> = entries.iter().filter(|e| e.count > 0).collect();
    let total: u32 = active.iter().map(|e| e.count).sum();
    if total == 0 {
        return None;
    }

    let wheel_angle = (POINTER_ANGLE - rotation).rem_euclid(360.0);

    let mut running = 0.0;
    for entry in &active {
        let extent = 360.0 * f64::from(entry.count) / f64::from(total);
        if wheel_angle >= running && wheel_angle < running + extent {
            return Some(Pointer {
                phrase: entry.phrase.clone(),
                voted_by: voter_at(entry, wheel_angle - running, extent),
            });
        }
        running += extent;
    }

    // floating point can leave the boundary angle unclaimed
    active.first().map(|entry| Pointer {
        phrase: entry.phrase.clone(),
        voted_by: None,
    })
}

fn voter_at(entry: &WheelEntry, local_angle: f64, extent: f64) -> Option<String> {
    let mut slots: Vec<String> = entry
        .voters
        .iter()
        .take(entry.count as usize)
        .cloned()
        .collect();
    for i in slots.len()..entry.count as usize {
        slots.push(format!("unknown-{}", i + 1));
    }
    if slots.is_empty() {
        return None;
    }

    let slot_extent = extent / slots.len() as f64;
    let idx = ((local_angle / slot_extent) as usize).min(slots.len() - 1);
    Some(slots[idx].clone())
}

/// Spin simulation: an impulse ramps the velocity up, each tick decays it
/// until the wheel settles.
#[derive(Debug, Clone, Default)]
pub struct SpinState {
    pub rotation: f64,
    pub velocity: f64,
}

impl SpinState {
    /// Give the wheel a random shove. Repeated shoves stack up to a cap.
    pub fn spin(&mut self) {
        use rand::Rng;
        let mut rng = rand::rng();
        self.velocity += rng.random_range(MIN_IMPULSE..MAX_IMPULSE);
        self.velocity = self.velocity.min(MAX_VELOCITY);
    }

    /// Advance one animation tick. Returns true while still moving.
    pub fn tick(&mut self) -> bool {
        if self.velocity <= 0.0 {
            return false;
        }
        self.rotation = (self.rotation + self.velocity).rem_euclid(360.0);
        self.velocity *= DECAY_PER_TICK;
        if self.velocity < STOP_THRESHOLD {
            self.velocity = 0.0;
        }
        self.velocity > 0.0
    }

    pub fn is_spinning(&self) -> bool {
        self.velocity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(phrase: &str, count: u32, voters: &[&str]) -> WheelEntry {
        WheelEntry {
            phrase: phrase.to_string(),
            count,
            voters: voters.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_layout_is_proportional() {
        let entries = vec![entry("pizza", 3, &[]), entry("tacos", 1, &[])];
        let segments = layout(&entries);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_deg, 0.0);
        assert!((segments[0].extent_deg - 270.0).abs() < 1e-9);
        assert!((segments[1].start_deg - 270.0).abs() < 1e-9);
        assert!((segments[1].extent_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_skips_zero_counts() {
        let entries = vec![entry("pizza", 2, &[]), entry("empty row", 0, &[])];
        let segments = layout(&entries);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].phrase, "pizza");
    }

    #[test]
    fn test_layout_empty_wheel() {
        assert!(layout(&[]).is_empty());
        assert!(layout(&[entry("x", 0, &[])]).is_empty());
    }

    #[test]
    fn test_pointer_lands_in_correct_segment() {
        // pizza covers [0, 270), tacos [270, 360)
        let entries = vec![
            entry("pizza", 3, &["a", "b", "c"]),
            entry("tacos", 1, &["d"]),
        ];

        // rotation 0 puts the pointer at wheel angle 90 -> pizza
        let p = pointer_details(&entries, 0.0).unwrap();
        assert_eq!(p.phrase, "pizza");

        // rotation 180 puts the pointer at wheel angle 270 -> tacos
        let p = pointer_details(&entries, 180.0).unwrap();
        assert_eq!(p.phrase, "tacos");
        assert_eq!(p.voted_by.as_deref(), Some("d"));
    }

    #[test]
    fn test_pointer_rotates_through_voter_slots() {
        // single segment spanning the full wheel, three equal voter slots
        let entries = vec![entry("pizza", 3, &["a", "b", "c"])];

        let first = pointer_details(&entries, 90.0).unwrap(); // wheel angle 0
        assert_eq!(first.voted_by.as_deref(), Some("a"));

        let second = pointer_details(&entries, 330.0).unwrap(); // wheel angle 120
        assert_eq!(second.voted_by.as_deref(), Some("b"));

        let third = pointer_details(&entries, 210.0).unwrap(); // wheel angle 240
        assert_eq!(third.voted_by.as_deref(), Some("c"));
    }

    #[test]
    fn test_pointer_pads_unknown_voters() {
        // manual override says 2 votes but only one live voter
        let entries = vec![entry("pizza", 2, &["a"])];

        let back_half = pointer_details(&entries, 270.0).unwrap(); // wheel angle 180
        assert_eq!(back_half.voted_by.as_deref(), Some("unknown-2"));
    }

    #[test]
    fn test_pointer_none_when_wheel_empty() {
        assert_eq!(pointer_details(&[], 42.0), None);
        assert_eq!(pointer_details(&[entry("x", 0, &[])], 42.0), None);
    }

    #[test]
    fn test_spin_impulse_within_bounds() {
        let mut spin = SpinState::default();
        spin.spin();
        assert!(spin.velocity >= MIN_IMPULSE && spin.velocity < MAX_IMPULSE);

        for _ in 0..20 {
            spin.spin();
        }
        assert!(spin.velocity <= MAX_VELOCITY);
    }

    #[test]
    fn test_tick_decays_to_stop() {
        let mut spin = SpinState {
            rotation: 0.0,
            velocity: 20.0,
        };
        let mut ticks = 0;
        while spin.tick() {
            ticks += 1;
            assert!(ticks < 10_000, "spin must settle");
        }
        assert!(!spin.is_spinning());
        assert_eq!(spin.velocity, 0.0);
    }

    #[test]
    fn test_tick_idle_wheel_stays_put() {
        let mut spin = SpinState::default();
        assert!(!spin.tick());
        assert_eq!(spin.rotation, 0.0);
    }
}
