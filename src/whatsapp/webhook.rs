//! Inbound webhook payloads of the WhatsApp Business Cloud API

use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Object type of webhook deliveries that carry WhatsApp traffic
pub const WHATSAPP_OBJECT: &str = "whatsapp_business_account";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

impl WebhookPayload {
    pub fn is_whatsapp(&self) -> bool {
        self.object == WHATSAPP_OBJECT
    }

    /// All change values of the delivery, in order
    pub fn values(&self) -> impl Iterator<Item = &ChangeValue> {
        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .map(|change| &change.value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub field: Option<String>,
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default, deserialize_with = "lenient_messages")]
    pub messages: Option<Vec<InboundMessage>>,
    pub statuses: Option<Vec<serde_json::Value>>,
    pub contacts: Option<Vec<Contact>>,
}

impl ChangeValue {
    /// Delivery receipts only, no messages to handle
    pub fn is_status_update(&self) -> bool {
        self.statuses.is_some()
    }

    /// WhatsApp profile name of the contact with the given number
    pub fn contact_name(&self, wa_id: &str) -> Option<&str> {
        self.contacts
            .as_deref()?
            .iter()
            .find(|contact| contact.wa_id.as_deref() == Some(wa_id))
            .and_then(|contact| contact.profile.as_ref())
            .and_then(|profile| profile.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub wa_id: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: Option<String>,
    pub text: Option<TextContent>,
    pub interactive: Option<InteractiveContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveContent {
    pub list_reply: Option<ReplyContent>,
    pub button_reply: Option<ReplyContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyContent {
    pub id: String,
    pub title: Option<String>,
}

impl InboundMessage {
    pub fn is_text(&self) -> bool {
        self.kind == "text"
    }

    pub fn is_interactive(&self) -> bool {
        self.kind == "interactive"
    }

    pub fn text_body(&self) -> Option<&str> {
        self.text.as_ref().map(|text| text.body.as_str())
    }

    /// Reply id of a list selection, or else of a button press
    pub fn reply_id(&self) -> Option<&str> {
        let interactive = self.interactive.as_ref()?;
        fn non_empty(reply: &Option<ReplyContent>) -> Option<&str> {
            reply.as_ref().map(|r| r.id.as_str()).filter(|id| !id.is_empty())
        }
        non_empty(&interactive.list_reply).or_else(|| non_empty(&interactive.button_reply))
    }

    /// What goes into the message log: the text body or the reply id
    pub fn log_content(&self) -> Option<&str> {
        if self.is_interactive() {
            self.reply_id()
        } else {
            self.text_body()
        }
    }
}

/// Messages that do not match [`InboundMessage`] are dropped one by one, so a
/// single malformed entry cannot reject the rest of the batch.
fn lenient_messages<'de, D>(deserializer: D) -> Result<Option<Vec<InboundMessage>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|messages| {
        messages
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<InboundMessage>(raw) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed webhook message");
                    None
                }
            })
            .collect()
    }))
}

/// Query of the subscription handshake (`hub.mode`, `hub.verify_token`, `hub.challenge`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl VerifyQuery {
    /// Challenge to echo back when the handshake is valid
    pub fn accept(&self, expected_token: &str) -> Option<&str> {
        let subscribing = self.mode.as_deref() == Some("subscribe");
        let token_matches = self.verify_token.as_deref() == Some(expected_token);
        if subscribing && token_matches {
            Some(self.challenge.as_deref().unwrap_or(""))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delivery(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(json!({
            "object": "whatsapp_business_account",
            "entry": [{ "id": "1", "changes": [{ "field": "messages", "value": value }] }]
        }))
        .unwrap()
    }

    #[test]
    fn test_text_message() {
        let payload = delivery(json!({
            "contacts": [{ "wa_id": "6281234", "profile": { "name": "Budi" } }],
            "messages": [{ "from": "6281234", "id": "wamid.A", "type": "text", "timestamp": "1700000000", "text": { "body": "Halo" } }]
        }));

        assert!(payload.is_whatsapp());
        let value = payload.values().next().unwrap();
        assert!(!value.is_status_update());
        assert_eq!(value.contact_name("6281234"), Some("Budi"));
        assert_eq!(value.contact_name("999"), None);

        let message = &value.messages.as_ref().unwrap()[0];
        assert!(message.is_text());
        assert_eq!(message.log_content(), Some("Halo"));
        assert_eq!(message.reply_id(), None);
    }

    #[test]
    fn test_list_reply_takes_precedence() {
        let payload = delivery(json!({
            "messages": [{
                "from": "6281234", "id": "wamid.B", "type": "interactive",
                "interactive": {
                    "type": "list_reply",
                    "list_reply": { "id": "kat_umum", "title": "Umum" },
                    "button_reply": { "id": "btn_menu", "title": "Menu" }
                }
            }]
        }));

        let message = &payload.values().next().unwrap().messages.as_ref().unwrap()[0];
        assert_eq!(message.reply_id(), Some("kat_umum"));
        assert_eq!(message.log_content(), Some("kat_umum"));
    }

    #[test]
    fn test_button_reply_fallback() {
        let payload = delivery(json!({
            "messages": [{
                "from": "6281234", "id": "wamid.C", "type": "interactive",
                "interactive": { "type": "button_reply", "button_reply": { "id": "btn_sop_umum_1", "title": "SOP" } }
            }]
        }));

        let message = &payload.values().next().unwrap().messages.as_ref().unwrap()[0];
        assert_eq!(message.reply_id(), Some("btn_sop_umum_1"));
    }

    #[test]
    fn test_malformed_message_is_skipped() {
        let payload = delivery(json!({
            "messages": [
                { "id": "wamid.NOFROM", "type": "text", "text": { "body": "Halo" } },
                { "from": "6281234", "type": "text" },
                { "from": "6281234", "id": "wamid.OK", "type": "text", "text": { "body": "menu" } }
            ]
        }));

        let messages = payload.values().next().unwrap().messages.as_ref().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "wamid.OK");
    }

    #[test]
    fn test_reply_with_empty_id_is_ignored() {
        let payload = delivery(json!({
            "messages": [{
                "from": "6281234", "id": "wamid.E", "type": "interactive",
                "interactive": {
                    "list_reply": { "id": "" },
                    "button_reply": { "id": "btn_menu" }
                }
            }]
        }));

        let message = &payload.values().next().unwrap().messages.as_ref().unwrap()[0];
        assert_eq!(message.reply_id(), Some("btn_menu"));
    }

    #[test]
    fn test_status_update_and_foreign_object() {
        let payload = delivery(json!({ "statuses": [{ "id": "wamid.D", "status": "read" }] }));
        assert!(payload.values().next().unwrap().is_status_update());

        let other: WebhookPayload = serde_json::from_value(json!({ "object": "page" })).unwrap();
        assert!(!other.is_whatsapp());
        assert_eq!(other.values().count(), 0);
    }

    #[test]
    fn test_verify_query() {
        let query = VerifyQuery {
            mode: Some("subscribe".into()),
            verify_token: Some("secret".into()),
            challenge: Some("12345".into()),
        };
        assert_eq!(query.accept("secret"), Some("12345"));
        assert_eq!(query.accept("other"), None);

        let wrong_mode = VerifyQuery { mode: Some("unsubscribe".into()), ..query };
        assert_eq!(wrong_mode.accept("secret"), None);
        assert_eq!(VerifyQuery::default().accept("secret"), None);
    }
}
