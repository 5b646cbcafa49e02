//! Outbound message builders

pub mod contact;
pub mod draft;
pub mod file;
pub mod location;
pub mod poll;
pub mod text;

pub use contact::ContactMessage;
pub use draft::{CHAT_ID_SUFFIX, Draft, Message};
pub use file::{FileMessage, FileSource};
pub use location::LocationMessage;
pub use poll::PollMessage;
pub use text::TextMessage;
