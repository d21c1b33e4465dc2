use assistant_api::{ChatEvent, ChatMessage, SummarySections};
use tracing::{debug, warn};

use crate::transcript::Transcript;

/// Transient text shown in a run's bubble while the model reasons.
pub const THINKING_PLACEHOLDER: &str = "Думаю...";
/// Status text for a freshly started document extraction.
pub const EXTRACTION_NOTICE: &str = "Обработка файла, извлечение текста...";
/// Status text patched in once extraction hands over to summarization.
pub const SUMMARIZATION_NOTICE: &str = "Обработка файла, суммаризация текста...";
/// Sender name stamped on locally echoed user messages.
pub const LOCAL_USER_SENDER: &str = "Вы";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    AuthFailed,
}

/// Server-side conversation identity plus the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Empty until the backend announces a chat via `chat_creation`/`chat_load`.
    pub session_id: String,
    pub auth_state: AuthState,
    pub user_id: String,
    pub user_name: Option<String>,
}

impl Session {
    fn new() -> Self {
        Self {
            session_id: String::new(),
            auth_state: AuthState::Unauthenticated,
            user_id: String::new(),
            user_name: None,
        }
    }
}

/// Fire-and-forget side effect requested by an event, performed outside the
/// reducer so state transitions stay pure and unit-testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    DownloadFile { filename: String },
}

/// The protocol state machine: session identity, auth state, and the run
/// correlator over the transcript.
///
/// All mutation happens through [`ChatApp::on_event`], one decoded event at a
/// time, in receipt order. At most one streaming run is tracked; a new
/// run-start implicitly retires the previous one, and stream/thinking events
/// for a retired run are dropped (late delivery is expected, not an error).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatApp {
    pub session: Session,
    pub transcript: Transcript,
    current_run_id: Option<String>,
}

impl Default for ChatApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatApp {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            transcript: Transcript::new(),
            current_run_id: None,
        }
    }

    pub fn current_run_id(&self) -> Option<&str> {
        self.current_run_id.as_deref()
    }

    /// Apply one decoded event, returning any side effect it requests.
    pub fn on_event(&mut self, event: ChatEvent) -> Option<Effect> {
        match event {
            ChatEvent::AuthSuccess {
                user_id,
                user_name,
                message,
            } => self.on_auth_success(user_id, user_name, &message),
            ChatEvent::AuthError { message } => self.on_auth_error(&message),
            ChatEvent::OnParserStart { run_id, name } => self.on_parser_start(run_id, name),
            ChatEvent::ThinkingStart { run_id, .. } => self.on_thinking_start(&run_id),
            ChatEvent::ThinkingEnd { run_id, .. } => self.on_thinking_end(&run_id),
            ChatEvent::OnParserStream { run_id, data, .. } => {
                self.on_parser_stream(&run_id, &data.chunk)
            }
            ChatEvent::OnGenerationEnd {
                name, message_id, ..
            } => self.on_generation_end(&name, message_id),
            ChatEvent::DocumentExtraction { run_id, name } => {
                self.on_document_extraction(run_id, name)
            }
            ChatEvent::DocumentSummarization { run_id, .. } => {
                self.on_document_summarization(&run_id)
            }
            ChatEvent::Summary { run_id, name, data } => self.on_summary(run_id, name, &data),
            ChatEvent::Download { filename, .. } => {
                return Some(Effect::DownloadFile { filename });
            }
            ChatEvent::ChatCreation { session_id } => self.on_chat_creation(session_id),
            ChatEvent::ChatLoad {
                session_id,
                history,
            } => self.on_chat_load(session_id, history),
        }

        None
    }

    /// Optimistic local echo for an outgoing `QUERY`, appended before (and
    /// regardless of) transmission.
    pub fn push_local_user_message(&mut self, text: &str) {
        self.transcript.push(ChatMessage::new(
            epoch_millis_id(),
            LOCAL_USER_SENDER,
            text,
        ));
    }

    fn on_parser_start(&mut self, run_id: String, name: String) {
        self.transcript
            .push(ChatMessage::new(run_id.clone(), name, ""));
        self.current_run_id = Some(run_id);
    }

    fn on_thinking_start(&mut self, run_id: &str) {
        if self.is_current_run(run_id) {
            self.transcript.patch(run_id, |message| {
                message.message = THINKING_PLACEHOLDER.to_owned();
            });
        }
    }

    fn on_thinking_end(&mut self, run_id: &str) {
        if self.is_current_run(run_id) {
            self.transcript.patch(run_id, |message| {
                message.message.clear();
            });
        }
    }

    fn on_parser_stream(&mut self, run_id: &str, chunk: &str) {
        if self.is_current_run(run_id) {
            self.transcript.patch(run_id, |message| {
                message.message.push_str(chunk);
            });
        }
    }

    /// Best-effort correlation: the protocol does not carry the target
    /// message's client id on this event, only the sender name.
    fn on_generation_end(&mut self, name: &str, message_id: String) {
        if message_id.is_empty() {
            return;
        }

        let stamped = self.transcript.patch_last_from_sender(name, |message| {
            // A server id, once attached, stays attached.
            if message.message_id.is_none() {
                message.message_id = Some(message_id);
            }
        });

        if !stamped {
            debug!(sender = name, "generation end without a matching message");
        }
    }

    fn on_document_extraction(&mut self, run_id: String, name: String) {
        self.transcript
            .push(ChatMessage::new(run_id.clone(), name, EXTRACTION_NOTICE));
        self.current_run_id = Some(run_id);
    }

    // Extraction/summarization is a two-phase one-shot pair, not a token
    // stream, so the patch is id-addressed and ignores run tracking.
    fn on_document_summarization(&mut self, run_id: &str) {
        self.transcript.patch(run_id, |message| {
            message.message = SUMMARIZATION_NOTICE.to_owned();
        });
    }

    fn on_summary(&mut self, run_id: String, name: String, sections: &SummarySections) {
        self.transcript
            .push(ChatMessage::new(run_id, name, render_summary(sections)));
    }

    fn on_chat_creation(&mut self, session_id: String) {
        debug!(%session_id, "switching to a new chat");
        self.session.session_id = session_id;
        self.transcript.clear();
        self.current_run_id = None;
    }

    fn on_chat_load(&mut self, session_id: String, history: Vec<ChatMessage>) {
        debug!(%session_id, entries = history.len(), "loading previous chat");
        self.session.session_id = session_id;
        self.transcript.replace_all(history);
        self.current_run_id = None;
    }

    fn on_auth_success(&mut self, user_id: String, user_name: String, message: &str) {
        debug!(%user_id, %message, "authentication accepted");
        self.session.user_id = user_id;
        self.session.user_name = Some(user_name);
        self.session.auth_state = AuthState::Authenticated;
    }

    fn on_auth_error(&mut self, message: &str) {
        warn!(%message, "authentication rejected");
        self.session.auth_state = AuthState::AuthFailed;
    }

    fn is_current_run(&self, run_id: &str) -> bool {
        self.current_run_id.as_deref() == Some(run_id)
    }
}

/// Render summary sections as a heading per key, in arrival order.
fn render_summary(sections: &SummarySections) -> String {
    let mut text = String::new();
    for (heading, body) in &sections.0 {
        text.push_str(&format!("#### {heading}\n{body}\n"));
    }
    text
}

fn epoch_millis_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis().to_string()
}
