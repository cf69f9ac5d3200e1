//! Runs a handful of simulated logins through Arcgate with in-memory
//! storage. Pass a TOML config path to use your own backends.

use std::sync::Arc;

use arcgate::prelude::*;
use arcgate::protocol::{Codec, JsonCodec};

const DEFAULT_CONFIG: &str = r#"
name_allowed_regular = "^[0-9a-zA-Z_]{3,16}$"
whitelist = false

[session]
task_timeout_ms = 1000

[services.official]
enable = true
name = "Official"
conv_uuid = "preserve"
conv_repeat = false
name_allowed_regular = ""
whitelist = false
refuse_repeated_login = false
auth_retry = 1

[services.official.body]
server_type = "official"
pass_ip = false

[services.skins]
enable = true
name = "Littleskin"
conv_uuid = "offline"
conv_repeat = true
name_allowed_regular = ""
whitelist = true
refuse_repeated_login = true
auth_retry = 1

[services.skins.body]
server_type = "blessing_skin"
url = "https://littleskin.example/api/yggdrasil"
pass_ip = true
pass_ip_content = "&ip={0}"
"#;

// ---------------------------------------------------------------------------
// Simulated backend answers
// ---------------------------------------------------------------------------

struct Attempt {
    backend: &'static str,
    body: &'static str,
    ip: &'static str,
}

const ATTEMPTS: &[Attempt] = &[
    // First login through the official backend.
    Attempt {
        backend: "official",
        body: r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch","properties":[]}"#,
        ip: "10.0.0.1",
    },
    // Same account from another place: replaces the first session.
    Attempt {
        backend: "official",
        body: r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}"#,
        ip: "10.0.0.2",
    },
    // Same account through a different backend: refused.
    Attempt {
        backend: "skins",
        body: r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}"#,
        ip: "10.0.0.3",
    },
    // Whitelisted skin-site player.
    Attempt {
        backend: "skins",
        body: r#"{"id":"5627dd98e6be3c21b8a8e92344183641","name":"Alex"}"#,
        ip: "10.0.0.4",
    },
    // Not whitelisted.
    Attempt {
        backend: "skins",
        body: r#"{"id":"8667ba71b85a4004af54457a9734eed7","name":"Herobrine"}"#,
        ip: "10.0.0.5",
    },
    // Name outside the global pattern.
    Attempt {
        backend: "official",
        body: r#"{"id":"853c80ef3c3749fdaa49938b674adae6","name":"x"}"#,
        ip: "10.0.0.6",
    },
];

#[tokio::main]
async fn main() -> Result<(), ArcgateError> {
    arcgate::logging::init("info,arcgate=debug");

    let config = match std::env::args().nth(1) {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::from_toml_str(DEFAULT_CONFIG)?,
    };
    let coordinator_config = CoordinatorConfig {
        task_timeout: config.session.task_timeout(),
        queue_capacity: config.session.queue_capacity,
    };
    let shared = SharedConfig::new(GatewaySnapshot::build(config)?);

    let whitelist = Arc::new(WhitelistCache::new());
    whitelist.add("Alex");

    let sessions =
        SessionCoordinator::spawn(SessionManager::new(), coordinator_config);
    let pipeline = VerificationPipeline::new(
        Arc::new(MemoryUserStore::new()),
        Arc::clone(&whitelist),
        sessions.clone(),
        shared.clone(),
    );
    let gate = LoginGate::new(pipeline, PlainRenderer);

    for attempt in ATTEMPTS {
        let profile = JsonCodec.decode_profile(attempt.body.as_bytes())?;
        let Some(backend) = shared.load().registry().get(attempt.backend) else {
            tracing::warn!(backend = attempt.backend, "backend not configured");
            continue;
        };
        let login = LoginContext::new(
            profile.name.clone(),
            "demo-server-hash",
            Some(attempt.ip.to_string()),
        );
        tracing::info!(
            url = %backend.build_request_url(
                &login.username,
                &login.server_id,
                login.ip.as_deref(),
            ),
            "would query identity backend"
        );

        let name = profile.name.clone();
        match gate.login(BackendResult::new(backend, profile), login).await {
            LoginDecision::Admit(record) => {
                println!("{name}: admitted as {}", record.local_id);
                // Play the game server's part: register the live session
                // and report if the login core later closes it.
                let local_id = record.local_id;
                let mut notices = sessions
                    .run(move |m: &mut SessionManager| m.admit(local_id, name))
                    .await??;
                tokio::spawn(async move {
                    if let Some(reason) = notices.recv().await {
                        println!(
                            "{local_id}: kicked: {}",
                            reason.render(&PlainRenderer)
                        );
                    }
                });
            }
            LoginDecision::Deny { message, .. } => {
                println!("{name}: denied: {message}");
            }
        }
        tokio::task::yield_now().await;
    }

    let online = sessions.run(|m: &mut SessionManager| m.len()).await?;
    println!("{online} player(s) online, whitelist pending: {:?}", whitelist.entries());
    Ok(())
}
