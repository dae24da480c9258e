pub mod area;
pub mod country;
pub mod event;
pub mod reservation;
pub mod ticket;
pub mod user;

pub use area::{Area, AreaPayload, NewArea};
pub use country::Country;
pub use event::{Event, EventPayload, NewEvent};
pub use reservation::{NewReservation, Reservation};
pub use ticket::{NewTicket, Ticket};
pub use user::{NewUser, User};
