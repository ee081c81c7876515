use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};
use std_semaphore::Semaphore;

use crate::{
    config::{HallConfig, MaintainerLimit},
    error::HallError,
    guard::{CleaningShift, StudentSeat},
};

/// Counters shared by every student and cleaner. Only touched under `DiningHall::state`.
#[derive(Debug, Default)]
struct HallState {
    students: usize,
    cleaners: usize,
    // cleaners that announced themselves and are waiting for the students to drain
    waiting_cleaners: usize,
    cleaning: bool,
}

impl HallState {
    fn students_may_enter(&self, capacity: usize) -> bool {
        self.cleaners == 0 && self.waiting_cleaners == 0 && self.students < capacity
    }

    fn is_quiescent(&self) -> bool {
        self.students == 0 && self.cleaners == 0 && self.waiting_cleaners == 0 && !self.cleaning
    }
}

/// Logical phase of the hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HallPhase {
    Idle,
    Occupied,
    Cleaning,
}

/// Point-in-time copy of the hall's counters, read under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallSnapshot {
    pub capacity: usize,
    pub students: usize,
    pub cleaners: usize,
    pub waiting_cleaners: usize,
    pub cleaning: bool,
}

impl HallSnapshot {
    pub fn phase(&self) -> HallPhase {
        if self.cleaners > 0 {
            HallPhase::Cleaning
        } else if self.students > 0 {
            HallPhase::Occupied
        } else {
            HallPhase::Idle
        }
    }

    pub fn is_quiescent(&self) -> bool {
        self.students == 0 && self.cleaners == 0 && self.waiting_cleaners == 0 && !self.cleaning
    }
}

/// A capacity-bounded hall shared by students and cleaners, never both at once.
///
/// Students first take a seat permit, then wait under the lock until no cleaner is
/// inside or queued. Cleaners announce themselves (which holds off new students),
/// then wait until the last student has left. Each admission is handed back as a
/// guard; dropping it leaves the hall.
pub struct DiningHall {
    capacity: usize,
    limit: MaintainerLimit,
    state: Mutex<HallState>,
    // signalled when the student count drops to zero
    no_students: Condvar,
    // signalled when students may be admitted again, and on quiescence
    cleaning_done: Condvar,
    seats: Semaphore,
    cleaner_turn: Option<Semaphore>,
}

impl DiningHall {
    pub fn new(config: HallConfig) -> Result<Self, HallError> {
        let permits = config.validate()?;
        let cleaner_turn = match config.maintainer_limit {
            MaintainerLimit::Single => Some(Semaphore::new(1)),
            MaintainerLimit::Unbounded => None,
        };
        debug!(
            "opening dining hall: capacity={} cleaners={:?}",
            config.capacity, config.maintainer_limit
        );
        Ok(Self {
            capacity: config.capacity,
            limit: config.maintainer_limit,
            state: Mutex::new(HallState::default()),
            no_students: Condvar::new(),
            cleaning_done: Condvar::new(),
            seats: Semaphore::new(permits),
            cleaner_turn,
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, HallError> {
        Self::new(HallConfig::new(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn maintainer_limit(&self) -> MaintainerLimit {
        self.limit
    }

    // Counters are only changed by plain arithmetic that cannot panic halfway, so
    // a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, HallState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(
        &self,
        cond: &Condvar,
        guard: MutexGuard<'a, HallState>,
    ) -> MutexGuard<'a, HallState> {
        cond.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> HallSnapshot {
        let state = self.lock();
        HallSnapshot {
            capacity: self.capacity,
            students: state.students,
            cleaners: state.cleaners,
            waiting_cleaners: state.waiting_cleaners,
            cleaning: state.cleaning,
        }
    }

    /// Blocks until a seat is free and no cleaner is inside or waiting.
    pub fn student_enter(&self) -> StudentSeat<'_> {
        self.seats.acquire();
        let mut state = self.lock();
        while !state.students_may_enter(self.capacity) {
            trace!("student waiting: {:?}", *state);
            state = self.wait(&self.cleaning_done, state);
        }
        state.students += 1;
        debug!("student entered ({}/{})", state.students, self.capacity);
        StudentSeat::new(self)
    }

    pub(crate) fn student_leave(&self) {
        let mut state = self.lock();
        debug_assert!(state.students > 0, "student left an empty hall");
        state.students -= 1;
        self.seats.release();
        debug!("student left ({}/{})", state.students, self.capacity);
        if state.students == 0 && state.waiting_cleaners > 0 {
            self.no_students.notify_all();
        }
        if state.cleaners == 0 && state.waiting_cleaners == 0 {
            self.cleaning_done.notify_all();
        }
    }

    /// Blocks until this cleaner has the hall with no students inside. New students
    /// are held back from the moment the call is made.
    pub fn cleaning_enter(&self) -> CleaningShift<'_> {
        if let Some(turn) = &self.cleaner_turn {
            turn.acquire();
        }
        let mut state = self.lock();
        state.waiting_cleaners += 1;
        while state.students > 0 {
            trace!("cleaner waiting for {} students", state.students);
            state = self.wait(&self.no_students, state);
        }
        state.waiting_cleaners -= 1;
        state.cleaners += 1;
        state.cleaning = true;
        debug!("cleaner entered ({} cleaning)", state.cleaners);
        CleaningShift::new(self)
    }

    pub(crate) fn cleaning_leave(&self) {
        {
            let mut state = self.lock();
            debug_assert!(state.cleaners > 0, "cleaner left without entering");
            state.cleaners -= 1;
            debug!("cleaner left ({} cleaning)", state.cleaners);
            if state.cleaners == 0 {
                state.cleaning = false;
                self.cleaning_done.notify_all();
            }
        }
        if let Some(turn) = &self.cleaner_turn {
            turn.release();
        }
    }

    /// Blocks until nobody is inside or waiting to clean.
    pub fn wait_quiescent(&self) {
        let mut state = self.lock();
        while !state.is_quiescent() {
            state = self.wait(&self.cleaning_done, state);
        }
    }

    /// Waits for the hall to empty, then releases it.
    pub fn destroy(self) {
        self.wait_quiescent();
        debug!("closing dining hall: capacity={}", self.capacity);
    }
}
