mod aggregate;
mod filter;

pub use aggregate::buffered_ticket_count;
pub use aggregate::remaining_tickets;
pub use aggregate::tickets_per_week_for_deadline;
pub use aggregate::CycleTimeAnalysis;
pub use aggregate::ThroughputAnalysis;
pub use filter::RecordsFilter;
