// Content calendar: the post/campaign overlay model and its HTTP surface.
// Rendering is pure; all I/O goes through `store::CalendarStore`.
//
// `CalendarSession` and `PostEditor` are the client-model API for a calendar
// front end that links this crate and keeps one session per open page. The
// HTTP handlers are stateless: `GET /calendar` builds a throwaway session to
// load and render, and the post routes share `PostForm` validation with the
// editor but write to the store directly and report failures as HTTP errors
// rather than notifications.

pub mod banding;
pub mod dates;
pub mod editor;
pub mod filter;
pub mod grouping;
pub mod handlers;
pub mod session;
pub mod views;
