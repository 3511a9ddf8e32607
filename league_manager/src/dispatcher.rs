//! Least-loaded-referee selection: pure over `&[RefereeRecord]` so the
//! selection policy is unit-testable without any networking.

use domain::RefereeRecord;

/// Index of the referee with the smallest `active_matches / capacity`
/// load, breaking ties by `referee_id` ascending, skipping any referee
/// already at capacity. `None` means every referee is full.
pub fn select_referee(referees: &[RefereeRecord]) -> Option<usize> {
    referees
        .iter()
        .enumerate()
        .filter(|(_, r)| r.has_free_slot())
        .min_by(|(_, a), (_, b)| {
            a.load()
                .partial_cmp(&b.load())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.referee_id.cmp(&b.referee_id))
        })
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn referee(id: &str, capacity: u32, active: u32) -> RefereeRecord {
        RefereeRecord {
            referee_id: id.to_string(),
            endpoint: format!("http://127.0.0.1:8001/{id}"),
            capacity,
            active_matches: active,
            auth_token: "tok".to_string(),
        }
    }

    #[test]
    fn picks_the_least_loaded_referee() {
        let referees = vec![referee("R01", 2, 1), referee("R02", 2, 0)];
        assert_eq!(select_referee(&referees), Some(1));
    }

    #[test]
    fn ties_break_by_referee_id_ascending() {
        let referees = vec![referee("R02", 2, 0), referee("R01", 2, 0)];
        assert_eq!(select_referee(&referees), Some(1)); // R01, index 1
    }

    #[test]
    fn referees_at_capacity_are_skipped() {
        let referees = vec![referee("R01", 1, 1), referee("R02", 1, 1)];
        assert_eq!(select_referee(&referees), None);
    }

    #[test]
    fn partially_full_referee_is_preferred_over_full_one() {
        let referees = vec![referee("R01", 1, 1), referee("R02", 2, 1)];
        assert_eq!(select_referee(&referees), Some(1));
    }
}
