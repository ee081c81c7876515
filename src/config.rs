use crate::error::HallError;

/// How many cleaners may hold the hall at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaintainerLimit {
    /// Cleaners take turns; a second cleaner queues on its own counter.
    #[default]
    Single,
    /// Any number of cleaners may work together once the students are out.
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallConfig {
    pub capacity: usize,
    pub maintainer_limit: MaintainerLimit,
}

impl HallConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            maintainer_limit: MaintainerLimit::default(),
        }
    }

    pub fn with_maintainer_limit(mut self, limit: MaintainerLimit) -> Self {
        self.maintainer_limit = limit;
        self
    }

    /// Returns the capacity as the signed permit count the seat counter takes.
    pub fn validate(&self) -> Result<isize, HallError> {
        if self.capacity == 0 {
            return Err(HallError::ZeroCapacity);
        }
        isize::try_from(self.capacity).map_err(|_| HallError::CapacityTooLarge {
            capacity: self.capacity,
        })
    }
}
