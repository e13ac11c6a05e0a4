//! Small shared utilities: timestamps, identifiers, domain slugs.

mod ids;
mod slug;
mod timestamps;

pub use ids::{generate_conversation_id, generate_message_id};
pub use slug::domain_slug;
pub use timestamps::{iso_timestamp, now_millis, Timestamp};
