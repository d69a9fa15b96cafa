//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes
//! - **Schemas**: the camelCase response bodies and the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep utoipa out of the domain
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::inbound::http::dto::{
    CurrentUserBody, DashboardBody, DepartmentBody, DepartmentMessageBody, LeaderboardBody,
    StepsBody, SupportThreadBody, UserBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
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
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Step challenge API",
        description = "Step logging, department leaderboards, chat and the support desk."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::verify_email,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_avatar,
        crate::inbound::http::users::update_password,
        crate::inbound::http::users::update_steps,
        crate::inbound::http::view::switch_to_user_view,
        crate::inbound::http::view::switch_to_admin_view,
        crate::inbound::http::leaderboard::dashboard,
        crate::inbound::http::leaderboard::leaderboard,
        crate::inbound::http::leaderboard::list_departments,
        crate::inbound::http::messaging::department_messages,
        crate::inbound::http::messaging::send_department_message,
        crate::inbound::http::messaging::support_thread,
        crate::inbound::http::messaging::send_support_message,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::create_user,
        crate::inbound::http::admin::update_user,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::reset_password,
        crate::inbound::http::admin::create_department,
        crate::inbound::http::admin::support_threads,
        crate::inbound::http::admin::reply_to_support_thread,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserBody,
        CurrentUserBody,
        StepsBody,
        DepartmentBody,
        LeaderboardBody,
        DashboardBody,
        DepartmentMessageBody,
        SupportThreadBody,
    )),
    tags(
        (name = "accounts", description = "Signup, verification and sessions"),
        (name = "users", description = "The signed-in user's profile and steps"),
        (name = "view", description = "Admin view override"),
        (name = "leaderboard", description = "Dashboards and department rankings"),
        (name = "messaging", description = "Department chat and support requests"),
        (name = "admin", description = "Roster, departments and support desk"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn response_bodies_are_registered_in_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = schemas.get("UserBody").expect("UserBody schema");

        assert_object_schema_has_field(user, "departmentId");
        assert_object_schema_has_field(user, "mustChangePassword");
    }

    #[rstest]
    #[case("/api/v1/signup")]
    #[case("/api/v1/users/me/steps")]
    #[case("/api/v1/leaderboard")]
    #[case("/api/v1/departments/{id}/messages")]
    #[case("/api/v1/admin/users/{id}/password-reset")]
    #[case("/api/v1/admin/support/threads/{userId}/messages")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
