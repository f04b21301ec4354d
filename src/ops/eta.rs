use crate::model::config::SchedulerConfig;

/// Estimates how long the due cards will take to study.
pub trait EtaEstimator {
    /// Minutes needed for `[new, learn, review]` due cards
    fn eta(&self, counts: [u32; 3]) -> u32;
}

/// Fixed average answer time per card category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondsPerCard {
    pub new: u32,
    pub learn: u32,
    pub review: u32,
}

impl From<SchedulerConfig> for SecondsPerCard {
    fn from(config: SchedulerConfig) -> Self {
        SecondsPerCard {
            new: config.secs_new,
            learn: config.secs_learn,
            review: config.secs_review,
        }
    }
}

impl EtaEstimator for SecondsPerCard {
    fn eta(&self, counts: [u32; 3]) -> u32 {
        let [new, learn, review] = counts.map(u64::from);
        let secs = (new * u64::from(self.new))
            .saturating_add(learn * u64::from(self.learn))
            .saturating_add(review * u64::from(self.review));
        u32::try_from(secs.div_ceil(60)).unwrap_or(u32::MAX)
    }
}
