use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HallError {
    #[error("a dining hall needs room for at least one student")]
    ZeroCapacity,

    #[error("capacity {capacity} exceeds what the seat counter can hold")]
    CapacityTooLarge { capacity: usize },
}
