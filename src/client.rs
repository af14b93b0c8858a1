//! Public Mailinator inbox client implementation.

use crate::models::{Email, FetchEmailResponse, Message, RemoveOutcome};
use crate::Result;
use async_stream::try_stream;
use futures_util::{SinkExt, Stream, StreamExt};
use rand::Rng;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{COOKIE, USER_AGENT};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message as Frame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type InboxStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Async client for one public Mailinator inbox.
///
/// Use [`Inbox::open`] for defaults or [`Inbox::builder`] for custom settings
/// like the quiescence timeout, a proxy, or alternative endpoints.
///
/// Opening an inbox drains the message stream once, so the value starts out
/// with a populated summary list; [`Inbox::refresh`] replaces that snapshot
/// on demand.
#[derive(Debug)]
pub struct Inbox {
    name: String,
    address: String,
    web_url: String,
    session_id: String,
    messages: Vec<Message>,
    http: reqwest::Client,
    proxy: Option<String>,
    user_agent: String,
    ws_url: String,
    api_url: String,
    timeout: Duration,
}

impl Inbox {
    /// Create a builder for configuring the inbox.
    pub fn builder() -> InboxBuilder {
        InboxBuilder::new()
    }

    /// Open a public inbox and fetch its current message list.
    ///
    /// # Arguments
    /// * `name` - The mailbox name (part before @)
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::open("myalias").await?;
    /// println!("{} messages in {}", inbox.messages().len(), inbox.address());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(name: impl Into<String>) -> Result<Self> {
        InboxBuilder::new().open(name).await
    }

    /// Mailbox name this inbox watches.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full address of the mailbox (`name@mailinator.com`).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Browser-viewable URL of the inbox.
    ///
    /// Constructed for humans; the client never fetches it.
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// Session token attached to every streaming connection.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the proxy URL if one was configured.
    ///
    /// Returns `None` when no proxy was set on the builder.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Message summaries collected by the most recent [`Inbox::refresh`].
    ///
    /// A snapshot in arrival order, not a live view.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Re-fetch the message list, replacing the stored summaries wholesale.
    ///
    /// Opens the inbox stream, collects every pushed summary until no frame
    /// arrives within the quiescence timeout, then closes the connection.
    /// An empty inbox and a stream the server closed early are
    /// indistinguishable; both just leave a shorter list.
    ///
    /// # Returns
    /// The refreshed summaries, newest last
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let mut inbox = Inbox::open("myalias").await?;
    /// for msg in inbox.refresh().await? {
    ///     println!("{}: {}", msg.from, msg.subject.as_deref().unwrap_or(""));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn refresh(&mut self) -> Result<&[Message]> {
        let mut stream = self.connect_stream().await?;
        let received = self.drain_backlog(&mut stream).await?;
        stream.close(None).await.ok();

        self.messages = received;
        Ok(&self.messages)
    }

    /// Fetch the full content of a message.
    ///
    /// # Arguments
    /// * `id` - Message identifier taken from a [`Message`] summary
    ///
    /// # Returns
    /// The assembled [`Email`], bodies and extracted links included
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::open("myalias").await?;
    /// if let Some(msg) = inbox.messages().first() {
    ///     let email = inbox.email(&msg.id).await?;
    ///     println!("{}", email.text.as_deref().unwrap_or("(no text body)"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn email(&self, id: &str) -> Result<Email> {
        let url = format!("{}/fetch_email?msgid={}&zone={}", self.api_url, id, ZONE);

        let response: serde_json::Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let response: FetchEmailResponse = serde_json::from_value(response)?;
        Ok(Email::from_response(id, &self.session_id, response.data))
    }

    /// Iterate the stored summaries as fully fetched emails.
    ///
    /// The stream is lazy and finite: one detail fetch per stored summary,
    /// performed on demand, so partial consumption does partial work.
    ///
    /// # Examples
    /// ```no_run
    /// # use futures_util::{pin_mut, TryStreamExt};
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::open("myalias").await?;
    /// let emails = inbox.emails();
    /// pin_mut!(emails);
    /// while let Some(email) = emails.try_next().await? {
    ///     println!("{}", email.subject.as_deref().unwrap_or("(no subject)"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn emails(&self) -> impl Stream<Item = Result<Email>> + '_ {
        try_stream! {
            for message in &self.messages {
                let email = self.email(&message.id).await?;
                yield email;
            }
        }
    }

    /// Fetch the most recently received email.
    ///
    /// "Most recent" means the last summary in arrival order, not the
    /// highest timestamp. Returns `None` when the inbox is empty.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::open("myalias").await?;
    /// if let Some(email) = inbox.latest().await? {
    ///     println!("latest: {}", email.subject.as_deref().unwrap_or(""));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn latest(&self) -> Result<Option<Email>> {
        match self.messages.last() {
            Some(message) => Ok(Some(self.email(&message.id).await?)),
            None => Ok(None),
        }
    }

    /// Ask the service to trash a message.
    ///
    /// Opens a fresh inbox stream and drains the replayed backlog first; the
    /// server only honors commands on an established, idle stream. One trash
    /// command is then sent and a single reply awaited, bounded by the
    /// quiescence timeout.
    ///
    /// # Arguments
    /// * `id` - Message identifier to trash
    ///
    /// # Returns
    /// A [`RemoveOutcome`]; a missing or unusable reply is a failed outcome,
    /// not an error.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::open("myalias").await?;
    /// if let Some(msg) = inbox.messages().first() {
    ///     let outcome = inbox.remove(&msg.id).await?;
    ///     println!("removed: {} ({})", outcome.success, outcome.message);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome> {
        let mut stream = self.connect_stream().await?;
        self.drain_backlog(&mut stream).await?;

        // The server is whitespace-sensitive; serde_json emits the command
        // without padding.
        let command = serde_json::json!({ "cmd": "trash", "id": id, "zone": ZONE });
        stream.send(Frame::text(command.to_string())).await?;

        let reply = match time::timeout(self.timeout, stream.next()).await {
            Err(_) | Ok(None) => None,
            Ok(Some(frame)) => frame_text(&frame?),
        };
        stream.close(None).await.ok();

        Ok(RemoveOutcome::from_reply(reply.as_deref()))
    }

    /// Open the push stream for this mailbox, session cookie attached.
    async fn connect_stream(&self) -> Result<InboxStream> {
        let url = format!("{}/ws/fetchinbox?zone={}&query={}", self.ws_url, ZONE, self.name);

        let mut request = url.into_client_request()?;
        let headers = request.headers_mut();
        if let Ok(cookie) = HeaderValue::from_str(&format!("JSESSIONID={}", self.session_id)) {
            headers.insert(COOKIE, cookie);
        }
        if let Ok(agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let (stream, _) = connect_async(request).await?;
        Ok(stream)
    }

    /// Collect pushed summaries until the stream goes quiet.
    ///
    /// One receive attempt at a time, each bounded by the quiescence
    /// timeout. The first wait that elapses means "no more backlog" and ends
    /// the loop; it is not an error.
    async fn drain_backlog(&self, stream: &mut InboxStream) -> Result<Vec<Message>> {
        let mut received = Vec::new();
        loop {
            let frame = match time::timeout(self.timeout, stream.next()).await {
                // Nothing new within the window: the backlog is drained.
                Err(_) => break,
                // Server closed the stream; whatever arrived is the list.
                Ok(None) => break,
                Ok(Some(frame)) => frame?,
            };

            // Only frames that decode as a mail summary count. Status and
            // control frames, and anything malformed, are skipped.
            let summary = frame_text(&frame)
                .and_then(|text| serde_json::from_str::<Message>(&text).ok());
            if let Some(summary) = summary {
                received.push(summary);
            }
        }
        Ok(received)
    }
}

/// Textual payload of a data frame, if it has one.
fn frame_text(frame: &Frame) -> Option<String> {
    match frame {
        Frame::Text(text) => Some(text.as_str().to_owned()),
        Frame::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok(),
        _ => None,
    }
}

const BASE_DOMAIN: &str = "mailinator.com";
const WS_BASE_URL: &str = "wss://mailinator.com";
const API_BASE_URL: &str = "https://mailinator.com";
const ZONE: &str = "public";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const USER_AGENT_VALUE: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:132.0) Gecko/20100101 Firefox/132.0";

const SESSION_ID_LEN: usize = 29;
const SESSION_ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random session identifier.
///
/// 29 characters drawn from lowercase letters and digits. The public zone
/// accepts any well-formed value, so a fresh one passes as an opaque
/// pseudo-session.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    (0..SESSION_ID_LEN)
        .map(|_| SESSION_ID_CHARS[rng.random_range(0..SESSION_ID_CHARS.len())] as char)
        .collect()
}

/// Builder for configuring a public inbox.
///
/// Start with [`Inbox::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct InboxBuilder {
    timeout: Duration,
    proxy: Option<String>,
    user_agent: String,
    session_id: Option<String>,
    ws_url: String,
    api_url: String,
}

impl InboxBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - 2 second quiescence timeout
    /// - No proxy
    /// - Default user agent
    /// - Freshly generated session token
    /// - Official Mailinator endpoints
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            user_agent: USER_AGENT_VALUE.to_string(),
            session_id: None,
            ws_url: WS_BASE_URL.to_string(),
            api_url: API_BASE_URL.to_string(),
        }
    }

    /// Set the quiescence timeout for streaming operations.
    ///
    /// The message stream counts as drained once no frame arrives within
    /// this window, and a removal reply is awaited at most this long.
    /// Increase it on slow connections; decrease it to poll busy inboxes
    /// faster.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050").
    ///
    /// Applies to detail fetches through reqwest's proxy support. The
    /// message stream always connects directly.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Supply a session token instead of generating one.
    ///
    /// Deletions are attributed to the pseudo-session that streamed the
    /// inbox, so pinning the token keeps them on one session.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Override the streaming endpoint base URL.
    ///
    /// Useful for testing or when Mailinator changes its endpoint.
    pub fn ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    /// Override the HTTP API base URL.
    ///
    /// Useful for testing or when Mailinator changes its endpoint.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Open the inbox and fetch its current message list.
    ///
    /// Builds the HTTP client, derives the mailbox address and web URL,
    /// generates the session token if none was supplied, then performs the
    /// initial stream drain.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailinator_client::Inbox;
    /// # use std::time::Duration;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailinator_client::Error> {
    /// let inbox = Inbox::builder()
    ///     .timeout(Duration::from_secs(5))
    ///     .open("myalias")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(self, name: impl Into<String>) -> Result<Inbox> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        let http = builder.build()?;

        let name = name.into();
        let session_id = self
            .session_id
            // Jetty-style cookie shape, the same the site itself hands out.
            .unwrap_or_else(|| format!("node01{}.node0", generate_session_id()));

        let mut inbox = Inbox {
            address: format!("{}@{}", name, BASE_DOMAIN),
            web_url: format!("{}/v3/index.jsp?zone={}&query={}", self.api_url, ZONE, name),
            name,
            session_id,
            messages: Vec::new(),
            http,
            proxy: self.proxy,
            user_agent: self.user_agent,
            ws_url: self.ws_url,
            api_url: self.api_url,
            timeout: self.timeout,
        };
        inbox.refresh().await?;
        Ok(inbox)
    }
}
