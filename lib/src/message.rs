//! Payload types for the `send` endpoint.
//!
//! Field names follow the MailPace wire format. Optional fields that are not
//! set never appear in the JSON body.
use serde::{Deserialize, Serialize};

use crate::Error;

/// A single attachment. `content` must already be base64 encoded; nothing is
/// checked here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content: String,
    pub content_type: String,
    /// Content-ID for inline images, referenced as `cid:...` from HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
            cid: None,
        }
    }

    pub fn with_cid(mut self, cid: impl Into<String>) -> Self {
        self.cid = Some(cid.into());
        self
    }
}

/// One outgoing email.
///
/// `to`, `cc` and `bcc` take a single address or a comma-separated list.
/// At least one of the bodies should be set, but that is left to the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    #[serde(rename = "htmlbody", default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(rename = "textbody", default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "replyto", default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_unsubscribe: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Opaque value stored by the provider alongside the email. A JSON
    /// `null` is treated the same as no tags.
    #[serde(default, skip_serializing_if = "tags_absent")]
    pub tags: Option<serde_json::Value>,
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_list_unsubscribe(mut self, value: impl Into<String>) -> Self {
        self.list_unsubscribe = Some(value.into());
        self
    }

    /// Attachments are sent in the order they are added
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_tags(mut self, tags: impl Into<serde_json::Value>) -> Self {
        self.tags = match tags.into() {
            serde_json::Value::Null => None,
            tags => Some(tags),
        };
        self
    }

    /// Encode this message as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

fn tags_absent(tags: &Option<serde_json::Value>) -> bool {
    matches!(tags, None | Some(serde_json::Value::Null))
}
