// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers;
use crate::middleware::auth::{auth_guard, password_change_guard};

pub fn api_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Liberadas mesmo com senha temporária pendente
    let account_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/password", post(handlers::auth::change_password));

    let user_routes = Router::new()
        .route("/me/businesses", get(handlers::auth::get_my_businesses));

    let business_routes = Router::new()
        .route("/", post(handlers::business::create_branch))
        .route(
            "/{business_id}/staff",
            post(handlers::business::invite_staff).get(handlers::business::list_staff),
        )
        .route(
            "/{business_id}/shifts",
            post(handlers::shifts::create_shift).get(handlers::shifts::list_owner_shifts),
        )
        .route(
            "/{business_id}/shifts/{shift_id}",
            delete(handlers::shifts::delete_shift),
        )
        .route("/{business_id}/schedule", get(handlers::shifts::list_staff_shifts))
        .route("/{business_id}/clock-in", post(handlers::clock::clock_in))
        .route("/{business_id}/clock-out", post(handlers::clock::clock_out))
        .route("/{business_id}/attendance", get(handlers::reports::staff_status))
        .route("/{business_id}/my-hours", get(handlers::reports::my_hours));

    let assistant_routes = Router::new()
        .route("/schedule-question", post(handlers::assistant::ask_schedule));

    // Tudo que exige senha definitiva: primeiro o auth_guard, depois a troca de senha
    let guarded = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/businesses", business_routes)
        .nest("/api/assistant", assistant_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            password_change_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let account = Router::new()
        .nest("/api/users", account_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(account)
        .merge(guarded)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use sqlx::PgPool;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        models::business::MemberRole,
        test_support::{seed_business, seed_member, seed_user, test_state},
    };

    struct Branch {
        app_state: AppState,
        business_id: Uuid,
        owner_token: String,
        employee_token: String,
    }

    async fn branch_with_staff(pool: PgPool, employee_must_change: bool) -> Branch {
        let business = seed_business(&pool, "Centro").await;
        let owner = seed_user(&pool, "luigi").await;
        let employee = seed_user(&pool, "ana").await;
        seed_member(&pool, business.id, owner.id, MemberRole::Owner, false).await;
        seed_member(&pool, business.id, employee.id, MemberRole::Employee, employee_must_change).await;

        let app_state = test_state(pool);
        let owner_token = app_state.auth_service.create_token(owner.id).unwrap();
        let employee_token = app_state.auth_service.create_token(employee.id).unwrap();

        Branch {
            app_state,
            business_id: business.id,
            owner_token,
            employee_token,
        }
    }

    async fn get_as(app_state: &AppState, uri: &str, token: &str) -> Response {
        api_router(app_state.clone())
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn employee_sees_schedule_but_not_owner_shift_list(pool: PgPool) {
        let branch = branch_with_staff(pool, false).await;
        let owner_list = format!("/api/businesses/{}/shifts", branch.business_id);
        let staff_list = format!("/api/businesses/{}/schedule", branch.business_id);

        let denied = get_as(&branch.app_state, &owner_list, &branch.employee_token).await;
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let allowed = get_as(&branch.app_state, &staff_list, &branch.employee_token).await;
        assert_eq!(allowed.status(), StatusCode::OK);

        let owner = get_as(&branch.app_state, &owner_list, &branch.owner_token).await;
        assert_eq!(owner.status(), StatusCode::OK);
        let body = axum::body::to_bytes(owner.into_body(), usize::MAX).await.unwrap();
        let shifts: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(shifts, serde_json::json!([]));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn employee_is_redirected_away_from_staff_page(pool: PgPool) {
        let branch = branch_with_staff(pool, false).await;
        let staff_page = format!("/api/businesses/{}/staff", branch.business_id);

        let denied = get_as(&branch.app_state, &staff_page, &branch.employee_token).await;
        assert_eq!(denied.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            denied.headers().get(header::LOCATION).unwrap(),
            "/api/users/me/businesses"
        );

        let owner = get_as(&branch.app_state, &staff_page, &branch.owner_token).await;
        assert_eq!(owner.status(), StatusCode::OK);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pending_password_change_blocks_everything_but_account(pool: PgPool) {
        let branch = branch_with_staff(pool, true).await;
        let staff_list = format!("/api/businesses/{}/schedule", branch.business_id);

        let blocked = get_as(&branch.app_state, &staff_list, &branch.employee_token).await;
        assert_eq!(blocked.status(), StatusCode::FORBIDDEN);

        let me = get_as(&branch.app_state, "/api/users/me", &branch.employee_token).await;
        assert_eq!(me.status(), StatusCode::OK);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn missing_token_is_unauthorized(pool: PgPool) {
        let app_state = test_state(pool);
        let response = api_router(app_state)
            .oneshot(Request::builder().uri("/api/users/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
