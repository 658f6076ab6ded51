pub mod attendance;
pub mod events;
pub mod users;

pub use attendance::{AttendanceStore, PgAttendanceStore};
pub use events::{EventStore, PgEventStore};
pub use users::{PgUserStore, UserStore};
