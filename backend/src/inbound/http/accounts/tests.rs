//! Integration coverage for the account resource.
//!
//! Runs the real handler stack (session middleware, coarse gate, field
//! validation, Argon2 hashing) over the in-memory repositories.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::auth::{login, logout};
use crate::inbound::http::test_utils::{
    login_cookie, seed_account, seed_superuser, test_session_middleware, test_state,
};

const PASSWORD: &str = "Str0ngP@ss!";

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(login)
                .service(logout)
                .service(list_accounts)
                .service(get_account)
                .service(create_account)
                .service(update_account)
                .service(patch_account)
                .service(delete_account),
        )
}

fn create_payload(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "firstName": "New",
        "lastName": "Person",
        "password": PASSWORD,
        "role": role,
    })
}

#[actix_web::test]
async fn unauthenticated_list_is_rejected() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn any_authenticated_actor_can_list_in_camel_case() {
    let state = test_state();
    seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    seed_account(&state, "sec@example.com", Some(Role::Secretary), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "vet@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    let listed = body.as_array().expect("array body");
    assert_eq!(listed.len(), 2);
    let first = &listed[0];
    assert!(first.get("firstName").is_some());
    assert!(first.get("first_name").is_none());
    assert!(first.get("password").is_none());
    assert!(first.get("passwordHash").is_none());
}

#[actix_web::test]
async fn retrieve_returns_account_and_hides_credential() {
    let state = test_state();
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    seed_account(&state, "sec@example.com", Some(Role::Secretary), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "sec@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "vet@example.com");
    assert_eq!(body["role"], "veterinarian");
    assert_eq!(body["roleDisplay"], "Vétérinaire");
    assert!(body.get("password").is_none());
}

#[rstest]
#[case("not-a-uuid")]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[actix_web::test]
async fn retrieve_unknown_or_malformed_id_is_not_found(#[case] id: &str) {
    let state = test_state();
    seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "vet@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unauthenticated_create_is_rejected() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(create_payload("new@example.com", "secretary"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(Role::Veterinarian)]
#[case(Role::Secretary)]
#[actix_web::test]
async fn non_admin_roles_cannot_create(#[case] actor_role: Role) {
    let state = test_state();
    seed_account(&state, "actor@example.com", Some(actor_role), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "actor@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(create_payload("new@example.com", "secretary"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "forbidden");
    assert!(body.get("details").is_none());
}

#[actix_web::test]
async fn admin_creates_secretary_account() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie.clone())
            .set_json(create_payload("new@example.com", "secretary"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"], "secretary");
    assert_eq!(body["roleDisplay"], "Secrétaire");
    assert_eq!(body["isActive"], true);
    assert_eq!(body["isStaff"], false);

    // The new credential is usable straight away.
    login_cookie(&app, "new@example.com", PASSWORD).await;
}

#[actix_web::test]
async fn read_only_fields_in_payload_are_ignored() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let mut payload = create_payload("new@example.com", "secretary");
    payload["isStaff"] = json!(true);
    payload["isActive"] = json!(false);
    payload["dateJoined"] = json!("2000-01-01T00:00:00Z");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["isStaff"], false);
    assert_eq!(body["isActive"], true);
    assert_ne!(body["dateJoined"], "2000-01-01T00:00:00Z");
}

#[actix_web::test]
async fn admin_cannot_assign_admin_role_on_create() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(create_payload("newadmin@example.com", "admin"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["details"]["role"][0],
        "only a superuser may assign the administrator role"
    );
}

#[actix_web::test]
async fn superuser_assigns_admin_role_on_create() {
    let state = test_state();
    seed_superuser(&state, "root@example.com", PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "root@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(create_payload("newadmin@example.com", "admin"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["roleDisplay"], "Administrateur");
}

#[actix_web::test]
async fn create_without_password_reports_password_field() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let mut payload = create_payload("new@example.com", "secretary");
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("password");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["password"][0], "this field is required");
}

#[rstest]
#[case("short1!", "password must contain at least 8 characters")]
#[case("12345678", "password must not be entirely numeric")]
#[actix_web::test]
async fn weak_passwords_are_rejected(#[case] password: &str, #[case] expected: &str) {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let mut payload = create_payload("new@example.com", "secretary");
    payload["password"] = json!(password);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    let messages = body["details"]["password"].as_array().expect("messages");
    assert!(messages.iter().any(|m| m == expected));
}

#[actix_web::test]
async fn create_reports_every_invalid_field_at_once() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(json!({ "email": "not-an-email", "role": "director" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    let details = body["details"].as_object().expect("details map");
    assert!(details.contains_key("email"));
    assert!(details.contains_key("firstName"));
    assert!(details.contains_key("lastName"));
    assert!(details.contains_key("password"));
    assert_eq!(
        details["role"][0],
        "role must be one of admin, veterinarian, secretary"
    );
}

#[actix_web::test]
async fn duplicate_email_reports_email_field() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    seed_account(&state, "taken@example.com", Some(Role::Secretary), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(create_payload("taken@example.com", "secretary"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["details"]["email"][0],
        "an account with this email already exists"
    );
}

#[actix_web::test]
async fn patch_updates_names_for_admin() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "firstName": "Updated", "lastName": "Name" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["firstName"], "Updated");
    assert_eq!(body["lastName"], "Name");
    assert_eq!(body["role"], "veterinarian");
}

#[actix_web::test]
async fn patch_is_forbidden_for_non_admin_actors() {
    let state = test_state();
    seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let target = seed_account(&state, "sec@example.com", Some(Role::Secretary), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "vet@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "firstName": "Updated" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_cannot_promote_to_admin_via_patch() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "role": "admin" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["details"]["role"][0],
        "only a superuser may assign the administrator role"
    );
}

#[actix_web::test]
async fn resubmitting_admin_role_unchanged_is_still_rejected_for_admins() {
    // The policy runs on the submitted value, not the delta: a no-op role
    // update on an existing admin account still requires a superuser.
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "other-admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "role": "admin" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn superuser_promotes_to_admin_via_patch() {
    let state = test_state();
    seed_superuser(&state, "root@example.com", PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "root@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "role": "admin" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["role"], "admin");
}

#[actix_web::test]
async fn put_requires_identity_fields() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "firstName": "Only" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    let details = body["details"].as_object().expect("details map");
    assert!(details.contains_key("email"));
    assert!(details.contains_key("lastName"));
    assert!(!details.contains_key("firstName"));
    // Password stays optional on update.
    assert!(!details.contains_key("password"));
}

#[actix_web::test]
async fn patch_password_rehashes_and_allows_new_login() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .set_json(json!({ "password": "NewStr0ngP@ss!" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    login_cookie(&app, "vet@example.com", "NewStr0ngP@ss!").await;

    let stale = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "vet@example.com", "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_deletes_veterinarian() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let lookup = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_cannot_delete_another_admin() {
    let state = test_state();
    seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let target = seed_account(&state, "other-admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "admin@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn superuser_deletes_an_admin() {
    let state = test_state();
    seed_superuser(&state, "root@example.com", PASSWORD).await;
    let target = seed_account(&state, "admin@example.com", Some(Role::Admin), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "root@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/users/{}", target.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn login_rejects_wrong_credentials_uniformly() {
    let state = test_state();
    seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;

    for (email, password) in [
        ("vet@example.com", "wrong-password"),
        ("unknown@example.com", PASSWORD),
    ] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "invalid credentials");
    }
}

#[actix_web::test]
async fn login_stamps_last_login() {
    let state = test_state();
    let seeded = seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    assert!(seeded.last_login().is_none());
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "vet@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{}", seeded.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body["lastLogin"].is_string());
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let state = test_state();
    seed_account(&state, "vet@example.com", Some(Role::Veterinarian), PASSWORD).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "vet@example.com", PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let removal = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}
