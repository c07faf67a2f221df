//! ChatService: the operations behind every request.
//!
//! Each operation takes an explicit [`CallerContext`] built once at the
//! boundary; there is no ambient identity. Mutating and sensitive-read
//! operations resolve the caller and check conversation membership before
//! touching the message log. Writes by the AI sentinel bypass the service
//! entirely (the dispatch worker appends through the repository).

use std::collections::HashMap;
use std::sync::Arc;

use ai_dispatch::{AiJob, JobSender};
use chat_core::{CallerContext, ChatError, MessageKind, Result, AI_SENDER};
use serde::{Deserialize, Serialize};
use storage::{
    ConversationRecord, ConversationRepository, MessageRecord, MessageRepository, SortOrder,
    StorageError, UserRecord, UserRepository,
};
use tracing::{info, instrument, warn};

use crate::context::build_context_window;
use crate::object_store::ObjectStore;
use crate::trigger::Trigger;

/// Display icon for sentinel text messages.
const GPT_ICON: &str = "/gpt.png";
/// Display icon for sentinel image (and other non-text) messages.
const DALL_E_ICON: &str = "/dall-e.png";

/// Resolved display record for a message's sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderDisplay {
    pub name: String,
    pub image: Option<String>,
}

/// A message paired with its resolved sender; `sender` is `None` when the
/// sender id no longer matches any user.
#[derive(Debug, Clone, Serialize)]
pub struct MessageWithSender {
    pub message: MessageRecord,
    pub sender: Option<SenderDisplay>,
}

/// Parameters for conversation creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewConversation {
    pub participants: Vec<String>,
    #[serde(default)]
    pub is_group: bool,
    pub group_name: Option<String>,
    pub group_image: Option<String>,
    pub admin: Option<String>,
}

fn require_token(ctx: &CallerContext) -> Result<&str> {
    ctx.token.as_deref().ok_or(ChatError::Unauthenticated)
}

#[derive(Clone)]
pub struct ChatService {
    users: UserRepository,
    conversations: ConversationRepository,
    messages: MessageRepository,
    objects: Arc<dyn ObjectStore>,
    jobs: JobSender,
}

impl ChatService {
    pub fn new(
        users: UserRepository,
        conversations: ConversationRepository,
        messages: MessageRepository,
        objects: Arc<dyn ObjectStore>,
        jobs: JobSender,
    ) -> Self {
        Self {
            users,
            conversations,
            messages,
            objects,
            jobs,
        }
    }

    // ---------- Identity & membership ----------

    /// Maps the caller's token to their user record. `Unauthenticated` when
    /// the context carries no token, `NotFound` when no user matches.
    pub async fn resolve_caller(&self, ctx: &CallerContext) -> Result<UserRecord> {
        let token = require_token(ctx)?;
        self.users
            .find_by_token(token)
            .await
            .map_err(ChatError::database)?
            .ok_or_else(|| ChatError::NotFound("user".to_string()))
    }

    /// Fetches the conversation and confirms the user is a participant.
    pub async fn require_participant(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<ConversationRecord> {
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await
            .map_err(ChatError::database)?
            .ok_or_else(|| ChatError::NotFound(format!("conversation {}", conversation_id)))?;

        if !conversation.has_participant(user_id) {
            return Err(ChatError::Forbidden(
                "You are not part of this conversation".to_string(),
            ));
        }
        Ok(conversation)
    }

    // ---------- Message operations ----------

    /// Persists a text message from the caller, then schedules at most one
    /// AI job when the content starts with a trigger prefix.
    #[instrument(skip(self, ctx, content))]
    pub async fn send_text_message(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
        content: &str,
    ) -> Result<MessageRecord> {
        let caller = self.resolve_caller(ctx).await?;
        self.require_participant(conversation_id, &caller.id).await?;

        let message = self
            .messages
            .append(
                conversation_id,
                &caller.id,
                content,
                MessageKind::Text.as_str(),
                None,
            )
            .await
            .map_err(ChatError::database)?;

        self.schedule_dispatch(conversation_id, &message).await;

        Ok(message)
    }

    /// Enqueues the AI job for a just-stored message, if it carries a trigger
    /// prefix. Never fails the send: context-assembly errors are logged and
    /// the job skipped.
    async fn schedule_dispatch(&self, conversation_id: &str, message: &MessageRecord) {
        match Trigger::detect(&message.content) {
            Some(Trigger::Chat) => {
                match build_context_window(
                    &self.messages,
                    conversation_id,
                    &message.id,
                    &message.content,
                )
                .await
                {
                    Ok(context) => {
                        info!(
                            conversation_id = %conversation_id,
                            context_len = context.len(),
                            "Scheduling chat dispatch"
                        );
                        self.jobs.enqueue(AiJob::Chat {
                            conversation_id: conversation_id.to_string(),
                            context,
                        });
                    }
                    Err(e) => {
                        warn!(
                            conversation_id = %conversation_id,
                            error = %e,
                            "Context assembly failed; skipping dispatch"
                        );
                    }
                }
            }
            Some(Trigger::Image) => {
                info!(conversation_id = %conversation_id, "Scheduling image dispatch");
                // The raw text goes through as the prompt, prefix included.
                self.jobs.enqueue(AiJob::Image {
                    conversation_id: conversation_id.to_string(),
                    prompt: message.content.clone(),
                });
            }
            None => {}
        }
    }

    async fn send_media(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
        object_id: &str,
        kind: MessageKind,
        file_name: Option<&str>,
    ) -> Result<MessageRecord> {
        let caller = self.resolve_caller(ctx).await?;
        self.require_participant(conversation_id, &caller.id).await?;

        let content = self.objects.public_url(object_id).await?;

        self.messages
            .append(
                conversation_id,
                &caller.id,
                &content,
                kind.as_str(),
                file_name,
            )
            .await
            .map_err(ChatError::database)
    }

    /// Persists an image message; content is the stored object's public URL.
    #[instrument(skip(self, ctx))]
    pub async fn send_image(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
        object_id: &str,
    ) -> Result<MessageRecord> {
        self.send_media(ctx, conversation_id, object_id, MessageKind::Image, None)
            .await
    }

    /// Persists a video message; content is the stored object's public URL.
    #[instrument(skip(self, ctx))]
    pub async fn send_video(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
        object_id: &str,
    ) -> Result<MessageRecord> {
        self.send_media(ctx, conversation_id, object_id, MessageKind::Video, None)
            .await
    }

    /// Persists a file message; keeps the original filename for display.
    #[instrument(skip(self, ctx))]
    pub async fn send_file(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
        object_id: &str,
        file_name: &str,
    ) -> Result<MessageRecord> {
        self.send_media(
            ctx,
            conversation_id,
            object_id,
            MessageKind::File,
            Some(file_name),
        )
        .await
    }

    /// Lists the conversation's messages oldest-first with each sender
    /// resolved to a display record. Real-user profiles are looked up at
    /// most once per call; the cache lives only for this listing.
    #[instrument(skip(self, ctx))]
    pub async fn get_messages(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
    ) -> Result<Vec<MessageWithSender>> {
        let caller = self.resolve_caller(ctx).await?;
        self.require_participant(conversation_id, &caller.id).await?;

        let records = self
            .messages
            .list_by_conversation(conversation_id, SortOrder::Asc, None)
            .await
            .map_err(ChatError::database)?;

        let mut profile_cache: HashMap<String, Option<SenderDisplay>> = HashMap::new();
        let mut result = Vec::with_capacity(records.len());
        for record in records {
            let sender = if record.sender == AI_SENDER {
                let icon = if record.kind == MessageKind::Text.as_str() {
                    GPT_ICON
                } else {
                    DALL_E_ICON
                };
                Some(SenderDisplay {
                    name: AI_SENDER.to_string(),
                    image: Some(icon.to_string()),
                })
            } else if let Some(cached) = profile_cache.get(&record.sender) {
                cached.clone()
            } else {
                let display = self
                    .users
                    .find_by_id(&record.sender)
                    .await
                    .map_err(ChatError::database)?
                    .map(|user| SenderDisplay {
                        name: user.name,
                        image: user.image,
                    });
                profile_cache.insert(record.sender.clone(), display.clone());
                display
            };
            result.push(MessageWithSender {
                message: record,
                sender,
            });
        }
        Ok(result)
    }

    /// Deletes the conversation's messages, then the conversation itself;
    /// returns the number of messages removed. Safe to retry: messages go
    /// first, so a rerun after partial failure still finds the conversation
    /// and finishes the cascade.
    #[instrument(skip(self, ctx))]
    pub async fn delete_conversation(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
    ) -> Result<u64> {
        let caller = self.resolve_caller(ctx).await?;
        self.require_participant(conversation_id, &caller.id).await?;

        let deleted = self
            .messages
            .delete_by_conversation(conversation_id)
            .await
            .map_err(ChatError::database)?;
        self.conversations
            .delete(conversation_id)
            .await
            .map_err(ChatError::database)?;

        info!(
            conversation_id = %conversation_id,
            deleted_messages = deleted,
            "Conversation deleted"
        );
        Ok(deleted)
    }

    // ---------- Conversation creation ----------

    /// Creates a conversation. The caller must be listed among the
    /// participants.
    #[instrument(skip(self, ctx, new))]
    pub async fn create_conversation(
        &self,
        ctx: &CallerContext,
        new: NewConversation,
    ) -> Result<ConversationRecord> {
        let caller = self.resolve_caller(ctx).await?;

        if new.participants.is_empty() {
            return Err(ChatError::InvalidArgument(
                "participants must not be empty".to_string(),
            ));
        }
        if !new.participants.iter().any(|p| p == &caller.id) {
            return Err(ChatError::Forbidden(
                "Creator must be a participant".to_string(),
            ));
        }

        let record = ConversationRecord::new(
            new.participants,
            new.is_group,
            new.group_name,
            new.group_image,
            new.admin,
        );
        self.conversations
            .insert(&record)
            .await
            .map_err(ChatError::database)?;
        Ok(record)
    }

    // ---------- User operations ----------

    /// Creates a user on first successful authentication. Rejects an email
    /// that is already registered.
    pub async fn create_user(
        &self,
        token_identifier: &str,
        email: &str,
        name: &str,
        image: Option<String>,
    ) -> Result<UserRecord> {
        let user = UserRecord::new(
            token_identifier.to_string(),
            email.to_string(),
            name.to_string(),
            image,
        );
        match self.users.insert(&user).await {
            Ok(()) => Ok(user),
            Err(StorageError::AlreadyExists(what)) => Err(ChatError::AlreadyExists(what)),
            Err(e) => Err(ChatError::database(e)),
        }
    }

    /// Identity-provider callback: create the user on first login, or flip
    /// them online when the token is already known.
    #[instrument(skip(self, token_identifier, email, name, image))]
    pub async fn login(
        &self,
        token_identifier: &str,
        email: &str,
        name: &str,
        image: Option<String>,
    ) -> Result<UserRecord> {
        if let Some(existing) = self
            .users
            .find_by_token(token_identifier)
            .await
            .map_err(ChatError::database)?
        {
            self.users
                .set_online(token_identifier, true)
                .await
                .map_err(ChatError::database)?;
            return Ok(UserRecord {
                is_online: true,
                ..existing
            });
        }
        self.create_user(token_identifier, email, name, image).await
    }

    /// Updates the caller's profile image.
    pub async fn update_profile_image(&self, ctx: &CallerContext, image: &str) -> Result<()> {
        let token = require_token(ctx)?;
        let updated = self
            .users
            .set_image(token, image)
            .await
            .map_err(ChatError::database)?;
        if !updated {
            return Err(ChatError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Updates the caller's display name.
    pub async fn update_name(&self, ctx: &CallerContext, new_name: &str) -> Result<()> {
        let token = require_token(ctx)?;
        let updated = self
            .users
            .set_name(token, new_name)
            .await
            .map_err(ChatError::database)?;
        if !updated {
            return Err(ChatError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Marks the caller online.
    pub async fn set_online(&self, ctx: &CallerContext) -> Result<()> {
        self.set_presence(ctx, true).await
    }

    /// Marks the caller offline.
    pub async fn set_offline(&self, ctx: &CallerContext) -> Result<()> {
        self.set_presence(ctx, false).await
    }

    async fn set_presence(&self, ctx: &CallerContext, is_online: bool) -> Result<()> {
        let token = require_token(ctx)?;
        let updated = self
            .users
            .set_online(token, is_online)
            .await
            .map_err(ChatError::database)?;
        if !updated {
            return Err(ChatError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Every user except the caller.
    pub async fn get_users(&self, ctx: &CallerContext) -> Result<Vec<UserRecord>> {
        let token = require_token(ctx)?;
        let users = self.users.find_all().await.map_err(ChatError::database)?;
        Ok(users
            .into_iter()
            .filter(|u| u.token_identifier != token)
            .collect())
    }

    /// The caller's own record.
    pub async fn get_me(&self, ctx: &CallerContext) -> Result<UserRecord> {
        self.resolve_caller(ctx).await
    }

    /// User records for a conversation's participants. Requires an
    /// authenticated caller but not membership.
    pub async fn get_group_members(
        &self,
        ctx: &CallerContext,
        conversation_id: &str,
    ) -> Result<Vec<UserRecord>> {
        require_token(ctx)?;
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await
            .map_err(ChatError::database)?
            .ok_or_else(|| ChatError::NotFound(format!("conversation {}", conversation_id)))?;

        let users = self.users.find_all().await.map_err(ChatError::database)?;
        Ok(users
            .into_iter()
            .filter(|u| conversation.has_participant(&u.id))
            .collect())
    }
}
