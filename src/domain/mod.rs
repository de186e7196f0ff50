pub mod lifecycle;
pub mod queue;
pub mod ticket;
pub mod view;

pub use lifecycle::TicketState;
pub use queue::QueueState;
pub use ticket::{Category, NewTicket, SubArea, Ticket, TicketId};
pub use view::{CategoryBuckets, QueueCounts, QueueView};
