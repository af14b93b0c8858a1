//! Public data models returned by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Summary of an inbox message as pushed by the message stream.
///
/// Summaries carry no body. Feed [`Message::id`] to
/// [`Inbox::email`](crate::Inbox::email) for the full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque message identifier.
    pub id: String,
    /// Sender address. The stream calls this `fromfull`; its presence is
    /// what marks a frame as a mail summary rather than a control frame.
    #[serde(rename = "fromfull")]
    pub from: String,
    /// Sender display name if the stream included one.
    #[serde(rename = "from", default)]
    pub from_name: Option<String>,
    /// Message subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Recipient mailbox.
    #[serde(default)]
    pub to: Option<String>,
    /// Delivery timestamp in epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Message age in seconds when the frame was pushed.
    #[serde(default)]
    pub seconds_ago: Option<i64>,
}

/// A fully fetched email, assembled from one detail response.
///
/// Built once by [`Inbox::email`](crate::Inbox::email) and immutable
/// afterwards. `html` and `text` hold the body of the last part of the
/// matching content type, if any part matched at all.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    /// Identifier the detail was fetched for.
    pub id: String,
    /// Session token the fetch was attributed to.
    pub session_id: String,
    /// Sender address.
    pub from: Option<String>,
    /// Sender display name.
    pub from_name: Option<String>,
    /// Recipient mailbox.
    pub to: Option<String>,
    /// Delivery timestamp in epoch milliseconds.
    pub time: i64,
    /// Message age in seconds at fetch time.
    pub seconds_ago: i64,
    /// Raw header map as returned by the service.
    pub headers: Map<String, Value>,
    /// Subject line.
    pub subject: Option<String>,
    /// IP address the message was submitted from.
    pub ip: Option<String>,
    /// Links the service extracted from the body.
    pub links: Vec<Link>,
    /// Body of the last `text/html` part.
    pub html: Option<String>,
    /// Body of the last `text/plain` part.
    pub text: Option<String>,
}

impl Email {
    /// Assemble an [`Email`] from the detail endpoint's `data` object.
    ///
    /// Multiple parts of the same content type do not concatenate; later
    /// matches overwrite earlier ones, body present or not.
    pub(crate) fn from_response(id: &str, session_id: &str, data: EmailData) -> Self {
        let mut html = None;
        let mut text = None;
        for part in data.parts.unwrap_or_default() {
            if part.headers.content_type.contains("text/html") {
                html = part.body.clone();
            }
            if part.headers.content_type.contains("text/plain") {
                text = part.body;
            }
        }

        Email {
            id: id.to_owned(),
            session_id: session_id.to_owned(),
            from: data.from,
            from_name: data.from_name,
            to: data.to,
            time: data.time,
            seconds_ago: data.seconds_ago,
            headers: data.headers.unwrap_or_default(),
            subject: data.subject,
            ip: data.ip,
            links: data.clickablelinks.unwrap_or_default(),
            html,
            text,
        }
    }
}

/// A link the service extracted from the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Address the link points at (the wire calls this `link`).
    #[serde(rename = "link", default)]
    pub url: String,
    /// Display text of the anchor.
    #[serde(default)]
    pub text: String,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<a href=\"{}\">{}</a>", self.url, self.text)
    }
}

/// Reported result of a removal request.
///
/// Removal is the one operation with explicit success/failure signaling:
/// transport problems still surface as [`Error`](crate::Error), but a
/// missing or unusable reply becomes a failed outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveOutcome {
    /// Whether the service confirmed the deletion.
    pub success: bool,
    /// Reply text, or a generic failure message when no usable reply
    /// arrived in time.
    pub message: String,
}

/// Reply text marking a confirmed deletion.
const REMOVED_MARKER: &str = "message deleted";
/// Fallback when no usable reply arrives.
const REMOVE_FAILED: &str = "Failed to remove email";

impl RemoveOutcome {
    /// Interpret the reply frame, if any, received after a trash command.
    ///
    /// A reply without a usable `msg` field, an empty message, or no reply
    /// at all count as a failed removal with a generic message.
    pub(crate) fn from_reply(reply: Option<&str>) -> Self {
        let message = reply
            .and_then(|text| serde_json::from_str::<CommandReply>(text).ok())
            .and_then(|reply| reply.msg)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| REMOVE_FAILED.to_owned());

        RemoveOutcome {
            success: message.contains(REMOVED_MARKER),
            message,
        }
    }
}

/// Wire shape of the detail endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct FetchEmailResponse {
    pub(crate) data: EmailData,
}

/// The `data` object of a detail response. `time` and `seconds_ago` are the
/// only fields the service always provides; everything else degrades to
/// absent.
#[derive(Debug, Deserialize)]
pub(crate) struct EmailData {
    #[serde(rename = "fromfull", default)]
    from: Option<String>,
    #[serde(rename = "from", default)]
    from_name: Option<String>,
    #[serde(default)]
    to: Option<String>,
    time: i64,
    seconds_ago: i64,
    #[serde(default)]
    headers: Option<Map<String, Value>>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    clickablelinks: Option<Vec<Link>>,
    #[serde(default)]
    parts: Option<Vec<EmailPart>>,
}

/// One MIME-ish body part of a detail response.
#[derive(Debug, Deserialize)]
struct EmailPart {
    headers: PartHeaders,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartHeaders {
    #[serde(rename = "content-type")]
    content_type: String,
}

/// Wire shape of a command reply frame.
#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    msg: Option<String>,
}
