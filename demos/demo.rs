//! Walkthrough of the inbox API against the live public service.
//!
//! Pass a mailbox name, or let it default:
//! `cargo run --example demo -- my-test-alias`

use std::env;

use mailinator_client::{Error, Inbox};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let name = env::args()
        .nth(1)
        .unwrap_or_else(|| "rust-demo-inbox".to_string());

    println!("Opening inbox '{}'...", name);
    let inbox = Inbox::open(&name).await?;
    println!("Address:  {}", inbox.address());
    println!("Web view: {}", inbox.web_url());

    if inbox.messages().is_empty() {
        println!("No messages yet. Send something to {} and run again.", inbox.address());
        return Ok(());
    }

    println!("\n{} message(s):", inbox.messages().len());
    for (idx, msg) in inbox.messages().iter().enumerate() {
        println!(
            "{}. {} (from: {})",
            idx + 1,
            msg.subject.as_deref().unwrap_or("(no subject)"),
            msg.from
        );
    }

    if let Some(email) = inbox.latest().await? {
        println!("\nLatest message: {}", email.subject.as_deref().unwrap_or("(no subject)"));
        if let Some(text) = &email.text {
            println!("--- text body ---\n{}", text);
        }
        for link in &email.links {
            println!("Link: {}", link.url);
        }

        let outcome = inbox.remove(&email.id).await?;
        println!("\nRemoved latest: {} ({})", outcome.success, outcome.message);
    }

    Ok(())
}
