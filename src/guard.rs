use crate::hall::DiningHall;

/// A student's admission to the hall. Leaves the hall when dropped.
#[must_use = "dropping the seat immediately leaves the hall"]
pub struct StudentSeat<'a> {
    hall: &'a DiningHall,
}

impl<'a> StudentSeat<'a> {
    pub(crate) fn new(hall: &'a DiningHall) -> Self {
        Self { hall }
    }

    pub fn leave(self) {
        drop(self);
    }
}

impl Drop for StudentSeat<'_> {
    fn drop(&mut self) {
        self.hall.student_leave();
    }
}

/// A cleaner's exclusive hold on the hall. Leaves the hall when dropped.
#[must_use = "dropping the shift immediately ends the cleaning"]
pub struct CleaningShift<'a> {
    hall: &'a DiningHall,
}

impl<'a> CleaningShift<'a> {
    pub(crate) fn new(hall: &'a DiningHall) -> Self {
        Self { hall }
    }

    pub fn leave(self) {
        drop(self);
    }
}

impl Drop for CleaningShift<'_> {
    fn drop(&mut self) {
        self.hall.cleaning_leave();
    }
}
