//! Session gate behaviour.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use rstest::{fixture, rstest};

use super::*;
use crate::inbound::http::test_utils::{
    MutableClock, fixture_now, memory_state, session_cookie, test_session_middleware,
};

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(fixture_now()))
}

async fn login(session: SessionContext, state: web::Data<HttpState>) -> Result<HttpResponse, Error> {
    let email = UserEmail::new("donor@example.com").expect("fixture email");
    session.persist_login(&email, state.clock.utc())?;
    Ok(HttpResponse::Ok().finish())
}

async fn whoami(email: SessionEmail) -> HttpResponse {
    HttpResponse::Ok().body(email.into_inner().to_string())
}

macro_rules! gate_app {
    ($clock:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state($clock)))
                .wrap(test_session_middleware())
                .route("/login", web::post().to(login))
                .route("/me", web::get().to(whoami)),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn live_session_exposes_email(clock: Arc<MutableClock>) {
    let app = gate_app!(clock);
    let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "donor@example.com");
}

#[rstest]
#[actix_web::test]
async fn missing_cookie_is_unauthorised(clock: Arc<MutableClock>) {
    let app = gate_app!(clock);
    let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(TimeDelta::hours(SESSION_TTL_HOURS) - TimeDelta::seconds(1), StatusCode::OK)]
#[case(TimeDelta::hours(SESSION_TTL_HOURS), StatusCode::UNAUTHORIZED)]
#[case(TimeDelta::days(2), StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn sessions_expire_after_five_hours(
    clock: Arc<MutableClock>,
    #[case] elapsed: TimeDelta,
    #[case] expected: StatusCode,
) {
    let app = gate_app!(Arc::clone(&clock));
    let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
    let cookie = session_cookie(&res);

    clock.advance(elapsed);
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn tampered_cookie_is_unauthorised(clock: Arc<MutableClock>) {
    let app = gate_app!(clock);
    let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
    let mut cookie = session_cookie(&res);
    let forged = format!("{}x", cookie.value());
    cookie.set_value(forged);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn session_without_expiry_is_unauthorised(clock: Arc<MutableClock>) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state(clock)))
            .wrap(test_session_middleware())
            .route(
                "/partial",
                web::post().to(|session: actix_session::Session| async move {
                    session
                        .insert(EMAIL_KEY, "donor@example.com")
                        .expect("insert email");
                    HttpResponse::Ok().finish()
                }),
            )
            .route("/me", web::get().to(whoami)),
    )
    .await;
    let res =
        test::call_service(&app, test::TestRequest::post().uri("/partial").to_request()).await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
