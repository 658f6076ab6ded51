pub mod event;
pub mod user;

pub use event::{Event, EventCategory, EventChanges, NewEvent};
pub use user::{initials_of, NewUser, User};
