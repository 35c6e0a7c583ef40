use mailgun_client::{Client, Message, RecipientVariables, SendResponse};
use std::collections::BTreeMap;

#[tokio::main]
async fn main() -> Result<(), mailgun_client::Error> {
    // MAILGUN_API_KEY, MAILGUN_DOMAIN and optionally MAILGUN_REGION
    let client = Client::from_env()?;
    let from = format!("Demo <demo@{}>", client.domain());

    let single = Message::new(&from, "alice@example.com", "Hello from Rust")
        .with_text("Plain text body")
        .with_html("<p>HTML body</p>")
        .with_tag("demo");
    let sent: SendResponse = client.send(&single).await?.json()?;
    println!("Queued single send: {}", sent.id);

    let mut vars = RecipientVariables::new();
    for (address, name) in [("alice@example.com", "Alice"), ("bob@example.com", "Bob")] {
        vars.insert(
            address.to_string(),
            BTreeMap::from([("first".to_string(), name.to_string())]),
        );
    }
    let batch = Message::new(
        &from,
        vec!["alice@example.com", "bob@example.com"],
        "Hi %recipient.first%",
    )
    .with_text("Hello %recipient.first%, this went out as a batch.")
    .with_recipient_variables(vars);

    match client.send(&batch).await {
        Ok(response) => println!("Batch accepted: {}", response.text()),
        Err(err) => eprintln!("Batch failed ({}): {err}", err.identifier()),
    }

    Ok(())
}
