//! Experience and leveling

/// Result of an experience gain that crossed at least one threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub levels_gained: u32,
    pub new_level: u32,
}

/// Player experience track
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    experience: u32,
    threshold: u32,
    level: u32,
    growth: f32,
}

impl Progression {
    pub fn new(initial_threshold: u32, growth: f32) -> Self {
        Self {
            experience: 0,
            threshold: initial_threshold.max(1),
            level: 1,
            growth,
        }
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Next threshold: `floor(current × growth)`, always strictly larger
    fn next_threshold(&self) -> u32 {
        let grown = (self.threshold as f64 * self.growth as f64).floor();
        let grown = if grown >= u32::MAX as f64 {
            u32::MAX
        } else {
            grown as u32
        };
        grown.max(self.threshold.saturating_add(1))
    }

    /// Add experience and consume as many thresholds as it covers.
    ///
    /// A multi-level jump is reported as a single [`LevelUp`] carrying the
    /// final level.
    pub fn gain_experience(&mut self, amount: u32) -> Option<LevelUp> {
        self.experience = self.experience.saturating_add(amount);

        let mut levels_gained = 0;
        while self.experience >= self.threshold {
            self.experience -= self.threshold;
            self.level += 1;
            self.threshold = self.next_threshold();
            levels_gained += 1;
        }

        (levels_gained > 0).then_some(LevelUp {
            levels_gained,
            new_level: self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_level_up() {
        let mut p = Progression::new(100, 1.5);
        assert_eq!(p.gain_experience(90), None);

        let up = p.gain_experience(15).expect("crossed threshold");
        assert_eq!(up, LevelUp { levels_gained: 1, new_level: 2 });
        assert_eq!(p.experience(), 5);
        assert_eq!(p.threshold(), 150);
        assert_eq!(p.level(), 2);
    }

    #[test]
    fn test_multi_level_jump_reports_once() {
        let mut p = Progression::new(100, 1.5);
        // 100 + 150 + 225 = 475
        let up = p.gain_experience(480).expect("crossed thresholds");
        assert_eq!(up.levels_gained, 3);
        assert_eq!(up.new_level, 4);
        assert_eq!(p.experience(), 5);
        assert_eq!(p.threshold(), 337);
    }

    #[test]
    fn test_exact_threshold_levels() {
        let mut p = Progression::new(100, 1.5);
        assert!(p.gain_experience(100).is_some());
        assert_eq!(p.experience(), 0);
    }

    #[test]
    fn test_threshold_grows_even_with_flat_growth() {
        let mut p = Progression::new(1, 1.0);
        p.gain_experience(1);
        assert_eq!(p.threshold(), 2);
    }

    proptest! {
        #[test]
        fn prop_experience_is_conserved(gains in proptest::collection::vec(0u32..500, 0..50)) {
            let mut p = Progression::new(100, 1.5);
            let mut consumed: u64 = 0;
            let mut prev_threshold = p.threshold();

            for gain in &gains {
                let before_level = p.level();
                let mut thresholds = vec![p.threshold()];
                p.gain_experience(*gain);
                // Rebuild the consumed thresholds from the level delta
                for _ in 1..(p.level() - before_level) {
                    let last = *thresholds.last().unwrap();
                    thresholds.push(((last as f64 * 1.5).floor() as u32).max(last + 1));
                }
                consumed += thresholds
                    .iter()
                    .take((p.level() - before_level) as usize)
                    .map(|t| *t as u64)
                    .sum::<u64>();

                prop_assert!(p.threshold() >= prev_threshold);
                prop_assert!(p.experience() < p.threshold());
                prev_threshold = p.threshold();
            }

            let awarded: u64 = gains.iter().map(|g| *g as u64).sum();
            prop_assert_eq!(p.experience() as u64, awarded - consumed);
        }
    }
}
