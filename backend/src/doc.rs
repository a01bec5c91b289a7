//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`], and the session cookie security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use crate::inbound::http::auth::{LoginRequest, SessionStatus};
use crate::inbound::http::schemas::{
    DeleteAckSchema, ErrorCodeSchema, ErrorSchema, InsertAckSchema, UpdateAckSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /jwt.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "RFood backend API",
        description = "Food donation listings, donation requests and cookie sessions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::issue_session,
        crate::inbound::http::auth::logout,
        crate::inbound::http::listings::add_food,
        crate::inbound::http::listings::search_foods,
        crate::inbound::http::listings::all_foods,
        crate::inbound::http::listings::get_food,
        crate::inbound::http::listings::donor_foods,
        crate::inbound::http::listings::update_food,
        crate::inbound::http::listings::delete_food,
        crate::inbound::http::food_requests::request_add,
        crate::inbound::http::food_requests::requested_food,
        crate::inbound::http::health::banner,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        SessionStatus,
        InsertAckSchema,
        UpdateAckSchema,
        DeleteAckSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "session", description = "Cookie session issuance and revocation"),
        (name = "listings", description = "Food listings offered by donors"),
        (name = "requests", description = "Requests claiming a listing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    #[case("/jwt")]
    #[case("/logout")]
    #[case("/addFood")]
    #[case("/all-foods")]
    #[case("/all")]
    #[case("/food/{id}")]
    #[case("/foods/{email}")]
    #[case("/update/{id}")]
    #[case("/delete/{id}")]
    #[case("/requestAdd")]
    #[case("/requestedFood/{email}")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(ERROR_SCHEMA_NAME).expect("Error schema") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(obj.properties.contains_key("code"));
                assert!(obj.properties.contains_key("message"));
                assert!(obj.properties.contains_key("traceId"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
