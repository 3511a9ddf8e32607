// referee record, owned exclusively by the league manager

#[derive(Debug, Clone)]
pub struct RefereeRecord {
    pub referee_id: String,
    pub endpoint: String,
    pub capacity: u32,
    pub active_matches: u32,
    pub auth_token: String,
}

impl RefereeRecord {
    /// Fraction of capacity in use; used by the dispatcher's least-loaded
    /// selection. A referee at capacity has load `1.0`.
    pub fn load(&self) -> f64 {
        if self.capacity == 0 {
            1.0
        } else {
            self.active_matches as f64 / self.capacity as f64
        }
    }

    pub fn has_free_slot(&self) -> bool {
        self.active_matches < self.capacity
    }

    pub fn on_match_assigned(&mut self) {
        debug_assert!(self.active_matches < self.capacity);
        self.active_matches += 1;
    }

    pub fn on_match_terminated(&mut self) {
        debug_assert!(self.active_matches > 0);
        self.active_matches = self.active_matches.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn referee(capacity: u32, active: u32) -> RefereeRecord {
        RefereeRecord {
            referee_id: "R01".to_string(),
            endpoint: "http://127.0.0.1:8001/mcp".to_string(),
            capacity,
            active_matches: active,
            auth_token: "tok".to_string(),
        }
    }

    #[test]
    fn load_is_fraction_of_capacity_in_use() {
        assert_eq!(referee(4, 2).load(), 0.5);
        assert_eq!(referee(1, 1).load(), 1.0);
        assert_eq!(referee(1, 0).load(), 0.0);
    }

    #[test]
    fn assignment_never_exceeds_capacity() {
        let mut r = referee(1, 0);
        assert!(r.has_free_slot());
        r.on_match_assigned();
        assert!(!r.has_free_slot());
        r.on_match_terminated();
        assert!(r.has_free_slot());
    }
}
