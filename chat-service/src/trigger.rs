//! Trigger-prefix detection for message sends.
//!
//! Case-sensitive, position 0, no parsing of the remainder. The two prefixes
//! are mutually exclusive by construction, so at most one job is ever
//! scheduled per send.

const GPT_PREFIX: &str = "@gpt";
const DALL_E_PREFIX: &str = "@dall-e";

/// Which AI variant a message content triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `@gpt ...` triggers text completion.
    Chat,
    /// `@dall-e ...` triggers image generation.
    Image,
}

impl Trigger {
    /// Detects a trigger prefix at the start of the content.
    pub fn detect(content: &str) -> Option<Trigger> {
        if content.starts_with(GPT_PREFIX) {
            Some(Trigger::Chat)
        } else if content.starts_with(DALL_E_PREFIX) {
            Some(Trigger::Image)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_gpt_prefix_at_start() {
        assert_eq!(Trigger::detect("@gpt explain recursion"), Some(Trigger::Chat));
        assert_eq!(Trigger::detect("@gpt"), Some(Trigger::Chat));
    }

    #[test]
    fn detects_dall_e_prefix_at_start() {
        assert_eq!(Trigger::detect("@dall-e a red fox"), Some(Trigger::Image));
    }

    #[test]
    fn ignores_mention_not_at_start() {
        assert_eq!(Trigger::detect("hello @gpt"), None);
        assert_eq!(Trigger::detect(" @dall-e a red fox"), None);
    }

    #[test]
    fn is_case_sensitive() {
        assert_eq!(Trigger::detect("@GPT hello"), None);
        assert_eq!(Trigger::detect("@Dall-E a fox"), None);
    }

    #[test]
    fn plain_text_does_not_trigger() {
        assert_eq!(Trigger::detect("what's 2+2?"), None);
        assert_eq!(Trigger::detect(""), None);
    }
}
