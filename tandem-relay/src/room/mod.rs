mod room_command;
mod room_coordinator;
mod room_manager;
mod room_seats;

pub use room_command::*;
pub use room_coordinator::*;
pub use room_manager::*;
pub use room_seats::*;
