//! Outgoing message payloads
//!
//! Serialized shapes follow the Cloud API `messages` endpoint; the client adds
//! `messaging_product` and `to`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    Text { text: TextBody },
    Interactive { interactive: Interactive },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Interactive {
    List {
        #[serde(skip_serializing_if = "Option::is_none")]
        header: Option<Header>,
        body: BodyText,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<BodyText>,
        action: ListAction,
    },
    Button {
        body: BodyText,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<BodyText>,
        action: ButtonAction,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Header {
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListAction {
    pub button: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonAction {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Button {
    Reply { reply: Reply },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub id: String,
    pub title: String,
}

impl OutgoingMessage {
    pub fn text(body: impl Into<String>) -> Self {
        OutgoingMessage::Text {
            text: TextBody { body: body.into() },
        }
    }

    /// Value of the payload's `type` field
    pub fn message_type(&self) -> &'static str {
        match self {
            OutgoingMessage::Text { .. } => "text",
            OutgoingMessage::Interactive { .. } => "interactive",
        }
    }

    /// Body text as stored in the message log
    pub fn preview_text(&self) -> &str {
        match self {
            OutgoingMessage::Text { text } => &text.body,
            OutgoingMessage::Interactive { interactive } => match interactive {
                Interactive::List { body, .. } | Interactive::Button { body, .. } => &body.text,
            },
        }
    }
}

impl Button {
    pub fn reply(id: impl Into<String>, title: impl Into<String>) -> Self {
        Button::Reply {
            reply: Reply {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_shape() {
        let message = OutgoingMessage::text("Ketik *menu*");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "type": "text", "text": { "body": "Ketik *menu*" } })
        );
        assert_eq!(message.message_type(), "text");
        assert_eq!(message.preview_text(), "Ketik *menu*");
    }

    #[test]
    fn test_list_shape() {
        let message = OutgoingMessage::Interactive {
            interactive: Interactive::List {
                header: Some(Header::Text { text: "Kantor".into() }),
                body: BodyText { text: "Pilih".into() },
                footer: None,
                action: ListAction {
                    button: "Pilih Kategori".into(),
                    sections: vec![Section {
                        title: "Kategori Layanan".into(),
                        rows: vec![Row { id: "kat_umum".into(), title: "📋 Umum".into(), description: None }],
                    }],
                },
            },
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "interactive");
        assert_eq!(value["interactive"]["type"], "list");
        assert_eq!(value["interactive"]["header"], json!({ "type": "text", "text": "Kantor" }));
        assert!(value["interactive"].get("footer").is_none());
        assert!(value["interactive"]["action"]["sections"][0]["rows"][0].get("description").is_none());
        assert_eq!(message.preview_text(), "Pilih");
    }

    #[test]
    fn test_reply_button_shape() {
        assert_eq!(
            serde_json::to_value(Button::reply("btn_menu", "🏠 Menu")).unwrap(),
            json!({ "type": "reply", "reply": { "id": "btn_menu", "title": "🏠 Menu" } })
        );
    }
}
