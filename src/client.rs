use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use assistant_api::{ChatCommand, ChatSocket, Rating};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{ChatApp, Effect};
use crate::config::AppConfig;
use crate::download::spawn_download;
use crate::error::ClientError;
use crate::services::upload_files;

/// Cloneable front door to a running [`ChatClient`].
///
/// Commands are fire-and-forget: once the connection has closed they are
/// dropped, never queued for a future connection.
#[derive(Debug, Clone)]
pub struct ChatClientHandle {
    app: Arc<Mutex<ChatApp>>,
    commands: mpsc::UnboundedSender<ChatCommand>,
    http: reqwest::Client,
    base_url: String,
}

impl ChatClientHandle {
    /// Shared view of the protocol state for rendering.
    pub fn app(&self) -> Arc<Mutex<ChatApp>> {
        Arc::clone(&self.app)
    }

    /// Send a user message.
    ///
    /// The local echo lands in the transcript before the command is even
    /// enqueued, so the user sees their message regardless of transmission.
    pub fn send_query(&self, message: &str) {
        lock_unpoisoned(&self.app).push_local_user_message(message);
        self.enqueue(ChatCommand::Query {
            message: message.to_owned(),
        });
    }

    pub fn rate_message(&self, message_id: &str, rating: Option<Rating>) {
        self.enqueue(ChatCommand::Rate {
            message_id: message_id.to_owned(),
            rating,
        });
    }

    pub fn formalize_message(&self, message_id: &str) {
        self.enqueue(ChatCommand::Formalize {
            message_id: message_id.to_owned(),
        });
    }

    pub fn request_summary(&self) {
        self.enqueue(ChatCommand::Summary);
    }

    pub fn authenticate(&self, user_id: &str, user_password: &str) {
        self.enqueue(ChatCommand::Auth {
            user_id: user_id.to_owned(),
            user_password: user_password.to_owned(),
        });
    }

    pub fn create_chat(&self) {
        self.enqueue(ChatCommand::Create);
    }

    pub fn load_chat(&self, session_id: &str) {
        self.enqueue(ChatCommand::LoadChat {
            session_id: session_id.to_owned(),
        });
    }

    /// Upload documents, then ask for their summary over the socket.
    pub async fn upload_and_summarize(&self, files: &[PathBuf]) -> Result<(), ClientError> {
        upload_files(&self.http, &self.base_url, files).await?;
        self.request_summary();
        Ok(())
    }

    fn enqueue(&self, command: ChatCommand) {
        if self.commands.send(command).is_err() {
            debug!("dropping command: client loop has stopped");
        }
    }
}

/// The connection driver: one socket, one command queue, one state machine.
pub struct ChatClient {
    app: Arc<Mutex<ChatApp>>,
    socket: ChatSocket,
    commands: mpsc::UnboundedReceiver<ChatCommand>,
    http: reqwest::Client,
    base_url: String,
    download_dir: PathBuf,
}

impl ChatClient {
    /// Connect to the backend and hand out the command handle.
    pub async fn connect(config: AppConfig) -> Result<(Self, ChatClientHandle), ClientError> {
        let socket = ChatSocket::connect(&config.backend).await?;
        let app = Arc::new(Mutex::new(ChatApp::new()));
        let (tx, rx) = mpsc::unbounded_channel();
        let http = reqwest::Client::new();
        let base_url = config.backend.http_base_url();

        let handle = ChatClientHandle {
            app: Arc::clone(&app),
            commands: tx,
            http: http.clone(),
            base_url: base_url.clone(),
        };
        let client = Self {
            app,
            socket,
            commands: rx,
            http,
            base_url,
            download_dir: config.download_dir,
        };
        Ok((client, handle))
    }

    /// Drive the connection until the backend closes it.
    ///
    /// All state mutation funnels through here, one event at a time, so the
    /// transcript only ever changes from a single task. Malformed frames are
    /// logged and skipped; they never terminate the loop.
    pub async fn run_until_closed(mut self) {
        let mut commands_open = true;
        loop {
            tokio::select! {
                event = self.socket.next_event() => {
                    match event {
                        Some(Ok(event)) => self.apply_event(event),
                        Some(Err(error)) => warn!(%error, "dropping undecodable frame"),
                        None => break,
                    }
                }
                command = self.commands.recv(), if commands_open => {
                    match command {
                        Some(command) => self.transmit(command).await,
                        None => commands_open = false,
                    }
                }
            }
        }
        info!("chat connection closed");
    }

    fn apply_event(&self, event: assistant_api::ChatEvent) {
        let effect = lock_unpoisoned(&self.app).on_event(event);
        if let Some(Effect::DownloadFile { filename }) = effect {
            spawn_download(
                self.http.clone(),
                self.base_url.clone(),
                filename,
                self.download_dir.clone(),
            );
        }
    }

    async fn transmit(&mut self, command: ChatCommand) {
        match self.socket.send(&command).await {
            Ok(true) => {}
            Ok(false) => debug!("command dropped by closed socket"),
            Err(error) => warn!(%error, "command could not be serialized"),
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
