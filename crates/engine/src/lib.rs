pub use bookings::{Booking, BookingStatus};
pub use budget_lines::{BudgetCategory, BudgetLine};
pub use error::EngineError;
pub use ops::{
    BookingPatch, BudgetLinePatch, BudgetSyncError, BudgetSyncReport, Engine, EngineBuilder,
    NewBooking, NewWedding, WeddingPatch,
};
pub use vendors::Vendor;
pub use weddings::Wedding;

pub mod bookings;
pub mod budget_lines;
mod error;
mod ops;
pub mod users;
pub mod vendors;
pub mod weddings;

type ResultEngine<T> = Result<T, EngineError>;
