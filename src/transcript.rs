use std::collections::HashMap;

use assistant_api::ChatMessage;

/// Ordered transcript with id-addressed access.
///
/// Insertion order is display order. An id→position index backs the
/// id-addressed operations so streamed patches never scan the sequence.
/// Invariant: no two live messages share an `id`; if the backend ever reuses
/// one (extraction and summary of the same run share a run id), the index
/// points at the most recently appended entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    index: HashMap<String, usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.index.get(id).map(|&position| &self.messages[position])
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Append a message at the end of the transcript.
    pub fn push(&mut self, message: ChatMessage) {
        self.index.insert(message.id.clone(), self.messages.len());
        self.messages.push(message);
    }

    /// Patch the message addressed by `id` in place.
    ///
    /// The closure must not change the message's `id`. Returns whether a
    /// message was found.
    pub fn patch<F>(&mut self, id: &str, patch: F) -> bool
    where
        F: FnOnce(&mut ChatMessage),
    {
        match self.index.get(id) {
            Some(&position) => {
                patch(&mut self.messages[position]);
                true
            }
            None => false,
        }
    }

    /// Patch the last message whose sender matches, scanning from the end.
    ///
    /// Returns whether a message was found; used for correlations that carry
    /// a sender name instead of a client id.
    pub fn patch_last_from_sender<F>(&mut self, sender: &str, patch: F) -> bool
    where
        F: FnOnce(&mut ChatMessage),
    {
        match self
            .messages
            .iter_mut()
            .rev()
            .find(|message| message.sender == sender)
        {
            Some(message) => {
                patch(message);
                true
            }
            None => false,
        }
    }

    /// Replace the whole transcript with an externally supplied history.
    pub fn replace_all(&mut self, history: Vec<ChatMessage>) {
        self.index = history
            .iter()
            .enumerate()
            .map(|(position, message)| (message.id.clone(), position))
            .collect();
        self.messages = history;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use assistant_api::ChatMessage;

    use super::Transcript;

    fn message(id: &str, sender: &str, text: &str) -> ChatMessage {
        ChatMessage::new(id, sender, text)
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(message("a", "Вы", "hi"));
        transcript.push(message("b", "Bot", "hello"));

        let ids: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn patch_addresses_by_id_and_reports_misses() {
        let mut transcript = Transcript::new();
        transcript.push(message("a", "Bot", ""));
        transcript.push(message("b", "Bot", ""));

        assert!(transcript.patch("a", |entry| entry.message.push_str("patched")));
        assert!(!transcript.patch("missing", |entry| entry.message.push_str("nope")));

        assert_eq!(transcript.get("a").map(|entry| entry.message.as_str()), Some("patched"));
        assert_eq!(transcript.get("b").map(|entry| entry.message.as_str()), Some(""));
    }

    #[test]
    fn patch_last_from_sender_scans_from_the_end() {
        let mut transcript = Transcript::new();
        transcript.push(message("a", "Bot", "first"));
        transcript.push(message("b", "Вы", "question"));
        transcript.push(message("c", "Bot", "second"));

        assert!(transcript.patch_last_from_sender("Bot", |entry| {
            entry.message_id = Some("m9".to_owned());
        }));

        assert_eq!(transcript.get("c").and_then(|entry| entry.message_id.as_deref()), Some("m9"));
        assert_eq!(transcript.get("a").and_then(|entry| entry.message_id.as_deref()), None);
    }

    #[test]
    fn replace_all_rebuilds_the_index() {
        let mut transcript = Transcript::new();
        transcript.push(message("old", "Bot", "stale"));

        transcript.replace_all(vec![message("x", "Вы", "1"), message("y", "Bot", "2")]);

        assert_eq!(transcript.len(), 2);
        assert!(transcript.get("old").is_none());
        assert!(transcript.patch("y", |entry| entry.message.push('!')));
        assert_eq!(transcript.get("y").map(|entry| entry.message.as_str()), Some("2!"));
    }

    #[test]
    fn clear_empties_messages_and_index() {
        let mut transcript = Transcript::new();
        transcript.push(message("a", "Bot", "text"));

        transcript.clear();

        assert!(transcript.is_empty());
        assert!(!transcript.patch("a", |_| {}));
    }

    #[test]
    fn reused_id_addresses_the_newest_entry() {
        let mut transcript = Transcript::new();
        transcript.push(message("run1", "Bot", "extraction notice"));
        transcript.push(message("run1", "Bot", "summary text"));

        assert!(transcript.patch("run1", |entry| entry.message.push_str(" updated")));
        assert_eq!(transcript.messages()[0].message, "extraction notice");
        assert_eq!(transcript.messages()[1].message, "summary text updated");
    }
}
