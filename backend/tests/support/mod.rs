//! Shared harness for the in-process HTTP suites.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use rfood::Trace;
use rfood::inbound::http::configure;
use rfood::inbound::http::health::HealthState;
use rfood::inbound::http::state::HttpState;
use rfood::outbound::memory::InMemoryDocumentStore;

/// Clock advanced by hand between requests.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn starting_at_noon() -> Arc<Self> {
        let noon = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(Self(Mutex::new(noon)))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.0.lock().expect("clock lock") += delta;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// The full route table over a fresh in-memory store.
pub fn app(
    clock: Arc<SteppingClock>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = HealthState::new();
    health.mark_ready();
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(HttpState::from_store(
            Arc::new(InMemoryDocumentStore::new()),
            clock,
        )))
        .app_data(web::Data::new(health))
        .wrap(session)
        .wrap(Trace)
        .configure(configure)
}

/// Log in as `$email` and return the session cookie.
macro_rules! login {
    ($app:expr, $email:expr) => {{
        let res = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri("/jwt")
                .set_json(serde_json::json!({ "email": $email }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK);
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(actix_web::cookie::Cookie::into_owned)
            .expect("session cookie")
    }};
}
pub(crate) use login;
