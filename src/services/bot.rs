//! Conversation dispatch
//!
//! Turns webhook deliveries into catalog lookups and outgoing messages, and
//! keeps the message log and menu sessions up to date.

use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::bot::{builders, MenuAction};
use crate::config::BotConfig;
use crate::database::DatabaseService;
use crate::models::{CreateMessageRequest, Direction, MessageStatus, SessionUpdate, User, SETTING_VIDEO_LINK};
use crate::utils::errors::Result;
use crate::utils::logging::{log_api_error, log_user_action};
use crate::whatsapp::{InboundMessage, OutgoingMessage, WebhookPayload, WhatsAppClient};

/// Result of one outbound send; database failures are reported separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { message_id: String },
    Failed { error: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

/// Counters of one webhook delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebhookOutcome {
    pub handled: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub status_updates: usize,
}

#[derive(Clone, Debug)]
pub struct BotService {
    db: DatabaseService,
    client: WhatsAppClient,
    config: BotConfig,
}

impl BotService {
    pub fn new(db: DatabaseService, client: WhatsAppClient, config: BotConfig) -> Self {
        Self { db, client, config }
    }

    /// Handle every new message of a webhook delivery.
    ///
    /// Messages already in the log are skipped. A failure while handling one
    /// message is logged and does not stop the others; only the duplicate
    /// check itself can fail the delivery.
    pub async fn handle_webhook(&self, payload: &WebhookPayload) -> Result<WebhookOutcome> {
        let mut outcome = WebhookOutcome::default();

        for value in payload.values() {
            if value.is_status_update() {
                debug!("Skipping status update");
                outcome.status_updates += 1;
                continue;
            }

            for message in value.messages.iter().flatten() {
                if self.db.messages.exists(&message.id).await? {
                    info!(message_id = %message.id, "Message already processed");
                    outcome.duplicates += 1;
                    continue;
                }

                let contact_name = value.contact_name(&message.from);
                match self.handle_incoming(message, contact_name).await {
                    Ok(()) => outcome.handled += 1,
                    Err(e) => {
                        error!(message_id = %message.id, phone = %message.from, error = %e, "Failed to handle message");
                        outcome.failed += 1;
                    }
                }
            }
        }

        Ok(outcome)
    }

    /// Handle one inbound message
    pub async fn handle_incoming(&self, message: &InboundMessage, contact_name: Option<&str>) -> Result<()> {
        let phone = message.from.as_str();
        let (user, created) = self.db.users.record_interaction(phone, contact_name).await?;
        if created {
            info!(phone = %phone, user_id = user.id, "New user created");
        }

        let mut request = CreateMessageRequest::new(&message.id, user.id, Direction::Incoming, MessageStatus::Received);
        request.message_type = Some(message.kind.clone());
        request.content = message.log_content().map(str::to_string);
        self.db.messages.create(request).await?;

        if message.is_text() {
            let text = message.text_body().unwrap_or_default();
            self.handle_text(&user, &message.id, text).await
        } else if message.is_interactive() {
            match message.reply_id() {
                Some(reply_id) => self.handle_reply(&user, &message.id, reply_id).await,
                None => {
                    warn!(phone = %phone, message_id = %message.id, "Interactive message without reply id");
                    Ok(())
                }
            }
        } else {
            info!(phone = %phone, message_type = %message.kind, "Skipping unsupported message type");
            Ok(())
        }
    }

    async fn handle_text(&self, user: &User, message_id: &str, text: &str) -> Result<()> {
        debug!(phone = %user.phone_number, text = %text, "Text message");

        if is_greeting(&self.config.greeting_keywords, text) {
            log_user_action(&user.phone_number, "greeting", None);
            self.send_welcome(user, message_id).await
        } else {
            self.deliver(user, &builders::help(), Some(message_id)).await?;
            Ok(())
        }
    }

    async fn handle_reply(&self, user: &User, message_id: &str, reply_id: &str) -> Result<()> {
        let action = MenuAction::parse(reply_id);
        info!(phone = %user.phone_number, reply_id = %reply_id, action = action.name(), "Menu reply");

        match action {
            MenuAction::Category(kode) => {
                if self.send_service_list(user, message_id, kode).await? {
                    self.db.users.upsert_session(user.id, &SessionUpdate::category(kode)).await?;
                }
            }
            MenuAction::Back(kode) => {
                self.send_service_list(user, message_id, kode).await?;
            }
            MenuAction::Sop(layanan_id) => {
                let detail = self.db.layanan_detail(layanan_id).await?;
                self.deliver(user, &builders::sop_detail(detail.as_ref()), Some(message_id)).await?;
            }
            MenuAction::MainMenu => {
                self.send_welcome(user, message_id).await?;
            }
            MenuAction::NoServices => {
                self.deliver(user, &builders::no_services(), Some(message_id)).await?;
            }
            MenuAction::Service(layanan_id) => {
                self.send_service_detail(user, message_id, layanan_id).await?;
            }
        }

        Ok(())
    }

    /// Main menu, a pause, then the contact-admin message
    async fn send_welcome(&self, user: &User, message_id: &str) -> Result<()> {
        let menu = self.main_menu().await?;
        self.deliver(user, &menu, Some(message_id)).await?;

        tokio::time::sleep(Duration::from_millis(self.config.followup_delay_ms)).await;

        self.deliver(user, &builders::contact_admin(&self.config), Some(message_id)).await?;
        self.db.users.upsert_session(user.id, &SessionUpdate::default()).await?;
        Ok(())
    }

    /// Service list of a category, or the main menu when the category is unknown.
    /// Returns whether the category was found.
    async fn send_service_list(&self, user: &User, message_id: &str, kode: &str) -> Result<bool> {
        let Some(kategori) = self.db.catalog.find_active_kategori(kode).await? else {
            warn!(kode = %kode, "Category not found, sending main menu");
            let menu = self.main_menu().await?;
            self.deliver(user, &menu, Some(message_id)).await?;
            return Ok(false);
        };

        let layanan = self.db.catalog.active_layanan(kategori.id, builders::MAX_LIST_ROWS as i64).await?;
        let message = builders::service_list(&self.config, &kategori, &layanan);
        self.deliver(user, &message, Some(message_id)).await?;
        Ok(true)
    }

    async fn send_service_detail(&self, user: &User, message_id: &str, layanan_id: &str) -> Result<()> {
        let Some(detail) = self.db.layanan_detail(layanan_id).await? else {
            warn!(layanan_id = %layanan_id, "Service not found, sending main menu");
            let menu = self.main_menu().await?;
            self.deliver(user, &menu, Some(message_id)).await?;
            return Ok(());
        };

        let video_link = self.db.settings.get_value(SETTING_VIDEO_LINK).await?;
        let message = builders::service_detail(&self.config, &detail, video_link.as_deref());
        self.deliver(user, &message, Some(message_id)).await?;

        self.db.users.upsert_session(user.id, &SessionUpdate::layanan(layanan_id)).await?;

        let view_id = format!("view_{}_{}", layanan_id, Uuid::new_v4().simple());
        let mut view = CreateMessageRequest::new(view_id, user.id, Direction::Outgoing, MessageStatus::Viewed);
        view.message_type = Some("interactive".to_string());
        view.response_to = Some(message_id.to_string());
        view.service_type = Some(detail.kategori_kode.clone());
        view.layanan_id = Some(detail.layanan.id);
        self.db.messages.create(view).await?;

        log_user_action(&user.phone_number, "view_layanan", Some(layanan_id));
        Ok(())
    }

    /// Main menu built from the active categories
    pub async fn main_menu(&self) -> Result<OutgoingMessage> {
        let kategori = self.db.catalog.active_kategori().await?;
        Ok(builders::main_menu(&self.config, &kategori))
    }

    /// Send the main menu to a number outside of a conversation
    pub async fn send_test(&self, phone: &str) -> Result<SendOutcome> {
        let user = self.db.users.ensure(phone).await?;
        let menu = self.main_menu().await?;
        self.deliver(&user, &menu, None).await
    }

    /// Send a message and log it as sent or failed.
    ///
    /// Send failures become `SendOutcome::Failed`; the `Err` case is reserved
    /// for failures to write the log.
    pub async fn deliver(&self, user: &User, message: &OutgoingMessage, response_to: Option<&str>) -> Result<SendOutcome> {
        let (message_id, status, error_message, outcome) = match self.client.send(&user.phone_number, message).await {
            Ok(message_id) => (message_id.clone(), MessageStatus::Sent, None, SendOutcome::Sent { message_id }),
            Err(e) => {
                let error = e.to_string();
                log_api_error("whatsapp", &error, Some(&user.phone_number));
                (
                    format!("failed_{}", Uuid::new_v4().simple()),
                    MessageStatus::Failed,
                    Some(error.clone()),
                    SendOutcome::Failed { error },
                )
            }
        };

        let mut request = CreateMessageRequest::new(message_id, user.id, Direction::Outgoing, status);
        request.message_type = Some(message.message_type().to_string());
        request.content = Some(message.preview_text().to_string());
        request.response_to = response_to.map(str::to_string);
        request.error_message = error_message;
        self.db.record_message(request).await?;

        Ok(outcome)
    }
}

/// Whether the lower-cased text contains any greeting keyword
pub fn is_greeting(keywords: &[String], text: &str) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| text.contains(&keyword))
}
