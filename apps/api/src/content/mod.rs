// Posts, campaigns and the approval workflow over `store::CalendarStore`.

pub mod approvals;
pub mod handlers;
