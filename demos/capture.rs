//! Drives a legacy-style handler against an in-memory response and prints
//! the captured result.

use response_emulator::cookies::CookieOptions;
use response_emulator::request::{Continuation, Request};
use response_emulator::response::Response;
use response_emulator::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings {
        json_spaces: Some(2),
        ..Settings::default()
    };

    let (continuation, mut signals) = Continuation::channel();
    let req = Request {
        accept: vec!["application/json".to_string()],
        secret: Some("keyboard cat".to_string()),
        continuation,
        ..Request::default()
    };

    let (mut res, handle) = Response::in_memory_with(req, settings, Default::default());

    // The kind of handler this crate exists for: imperative mutations in
    // arbitrary order, one terminal call.
    res.status(201);
    res.set("X-Request-Backend", "demo");
    res.vary("Accept");
    res.links(&[("self", "http://api.test/users/42")]);
    res.cookie(
        "session",
        "42",
        CookieOptions {
            signed: true,
            http_only: true,
            max_age: Some(900_000),
            ..CookieOptions::default()
        },
    )?;
    res.json(serde_json::json!({"id": 42, "name": "Ada"}));

    let captured = handle.captured().await.ok_or("response never finalized")?;

    println!("{} {}", captured.status.as_u16(), captured.status_message);
    for (name, value) in &captured.headers {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    println!();
    println!("{}", captured.text());

    if let Ok(signal) = signals.try_recv() {
        println!("continuation signal: {signal:?}");
    }

    Ok(())
}
