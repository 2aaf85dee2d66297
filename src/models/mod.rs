pub mod availability;
pub mod registry;
pub mod reservation;
pub mod session;
pub mod slot;

pub use availability::{AvailabilityReport, RoomAvailability, SkippedRecord};
pub use registry::{Building, RoomRegistry};
pub use reservation::{Reservation, ReservationRecord};
pub use session::{PendingQuery, SessionPhase};
pub use slot::TimeSlot;
