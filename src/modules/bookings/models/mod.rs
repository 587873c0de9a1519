pub mod booking;
pub mod booking_details;
pub mod schedule;

pub use booking::{
    Booking, BookingStatus, ConfirmScheduleRequest, CreateBookingRequest, DeclineBookingRequest,
    UpdateBookingStatusRequest,
};
pub use booking_details::BookingDetails;
pub use schedule::{NewSchedule, Schedule, ScheduleStatus};
