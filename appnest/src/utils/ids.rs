//! Identifier generation for conversations and chat messages.

use super::now_millis;
use rand::Rng;
use uuid::Uuid;

/// Generates a conversation identifier, stable for the lifetime of one run.
///
/// Format: `conv_<uuid>`.
#[must_use]
pub fn generate_conversation_id() -> String {
    format!("conv_{}", Uuid::new_v4().simple())
}

/// Generates a chat message identifier in the widget's wire format.
///
/// Format: `ai_<unix-millis>_<0..999>`.
#[must_use]
pub fn generate_message_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("ai_{}_{}", now_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_prefix() {
        let id = generate_conversation_id();
        assert!(id.starts_with("conv_"));
        assert!(id.len() > "conv_".len());
    }

    #[test]
    fn test_message_id_shape() {
        let id = generate_message_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ai");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().is_ok());
    }

    #[test]
    fn test_conversation_ids_are_unique() {
        assert_ne!(generate_conversation_id(), generate_conversation_id());
    }
}
