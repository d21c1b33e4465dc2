//! HTTP collaborators that sit next to the chat socket: chat list
//! management, the prompt library, and document upload.

pub mod chats;
pub mod prompts;
pub mod upload;

pub use chats::{ChatListClient, ChatSummary, ChatsMenu};
pub use prompts::{derive_prompt_name, PromptEntry, PromptLibrary, PromptLibraryClient};
pub use upload::upload_files;
