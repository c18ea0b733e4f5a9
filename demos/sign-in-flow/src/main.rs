//! A minimal auth controller driving the Researchopia auth core.
//!
//! Signs in against a fake identity provider, polls the access token on an
//! interval, refreshes it when it is about to lapse, then signs out. Every
//! transition is announced on the global event dispatcher.
//!
//! ```text
//! cargo run -p sign-in-flow [config.json]
//! ```

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use rand::distr::Alphanumeric;
use researchopia_auth::logging;
use researchopia_auth::prelude::*;
use serde_json::json;

const REFRESH_CYCLES: usize = 3;

// ---------------------------------------------------------------------------
// Fake identity provider
// ---------------------------------------------------------------------------

/// Mints unsigned tokens the way a real provider would shape them.
struct FakeIdentityProvider {
    token_lifetime_ms: i64,
}

impl FakeIdentityProvider {
    fn sign_in(&self, email: &str) -> Session {
        let now = now_millis();
        let user = User {
            id: format!("user-{}", random_string(8)),
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        Session {
            access_token: self.mint_access_token(&user.id, now),
            refresh_token: random_string(32),
            expires_at: now + self.token_lifetime_ms,
            user,
        }
    }

    /// Returns a fresh access token, refresh token, and session expiry.
    fn refresh(&self, user_id: &str) -> (String, String, i64) {
        let now = now_millis();
        (
            self.mint_access_token(user_id, now),
            random_string(32),
            now + self.token_lifetime_ms,
        )
    }

    fn mint_access_token(&self, user_id: &str, now_ms: i64) -> String {
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let claims = json!({
            "sub": user_id,
            "iat": now_ms / 1000,
            "exp": (now_ms + self.token_lifetime_ms) / 1000,
            "jti": random_string(12),
        });
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(claims.to_string()),
            URL_SAFE_NO_PAD.encode(random_string(16)),
        )
    }
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// What one poll of the controller did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    NoSession,
    Fresh,
    Refreshed,
    Expired,
}

struct AuthController<S: SessionStore> {
    sessions: SessionManager<S>,
    events: EventDispatcher,
    provider: FakeIdentityProvider,
    refresh_threshold_ms: i64,
}

impl<S: SessionStore> AuthController<S> {
    fn new(store: S, events: EventDispatcher, config: &AuthConfig, token_lifetime_ms: i64) -> Self {
        Self {
            sessions: SessionManager::with_config(store, config.session.clone()),
            events,
            provider: FakeIdentityProvider { token_lifetime_ms },
            refresh_threshold_ms: config.refresh_threshold_ms,
        }
    }

    fn sign_in(&mut self, email: &str) -> User {
        let session = self.provider.sign_in(email);
        self.sessions.save_session(&session);
        self.events
            .emit(EventType::SignedIn, Some(json!({ "userId": session.user.id })));
        session.user
    }

    fn tick(&mut self) -> Tick {
        match self.sessions.state() {
            SessionState::Absent => Tick::NoSession,
            SessionState::Expired => {
                self.sessions.clear_session();
                self.events.emit(EventType::SessionExpired, None);
                Tick::Expired
            }
            SessionState::Valid => {
                let Some(token) = self.sessions.get_access_token() else {
                    return Tick::NoSession;
                };
                if is_token_expiring_soon(&token, self.refresh_threshold_ms) {
                    self.refresh()
                } else {
                    Tick::Fresh
                }
            }
        }
    }

    fn refresh(&mut self) -> Tick {
        let Some(current) = self.sessions.load_session() else {
            return Tick::NoSession;
        };
        let (access_token, refresh_token, expires_at) = self.provider.refresh(&current.user.id);

        self.sessions.save_session(&Session {
            access_token,
            refresh_token,
            ..current
        });
        self.events.emit(EventType::TokenUpdated, None);

        self.sessions.update_expiry(expires_at);
        self.events
            .emit(EventType::SessionRefreshed, Some(json!({ "expiresAt": expires_at })));
        Tick::Refreshed
    }

    fn sign_out(&mut self) {
        self.sessions.clear_session();
        self.events.emit(EventType::SignedOut, None);
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn demo_config() -> AuthConfig {
    AuthConfig {
        refresh_threshold_ms: 2_000,
        refresh_check_interval_ms: 500,
        ..AuthConfig::default()
    }
}

fn log_every_event(events: &EventDispatcher) {
    for kind in EventType::ALL {
        events.on(
            kind,
            listener(|event| {
                tracing::info!(
                    event = %event.event_type,
                    data = ?event.data,
                    timestamp = event.timestamp,
                    "auth event"
                );
            }),
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => AuthConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => demo_config(),
    };
    logging::init(&config.log_filter);

    let store = FileStore::open(std::env::temp_dir().join("researchopia-sign-in-flow"))?;
    tracing::info!(dir = %store.dir().display(), "session store ready");

    let events = researchopia_auth::events::global().clone();
    log_every_event(&events);

    let token_lifetime_ms = config.refresh_threshold_ms + 3_000;
    let mut controller = AuthController::new(store, events, &config, token_lifetime_ms);
    let user = controller.sign_in("ada@example.org");
    tracing::info!(user_id = %user.id, "signed in");

    let mut interval = tokio::time::interval(config.refresh_check_interval());
    let mut refreshes = 0;
    while refreshes < REFRESH_CYCLES {
        interval.tick().await;
        match controller.tick() {
            Tick::Refreshed => refreshes += 1,
            Tick::Fresh => {}
            Tick::NoSession | Tick::Expired => break,
        }
    }

    controller.sign_out();
    researchopia_auth::events::global().clear();
    Ok(())
}
