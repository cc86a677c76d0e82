use crate::error::AppError;
use crate::middlewares::current_user;
use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/lottery",
    tag = "lottery",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Draw finished (won, no_win or none_available)", body = DrawResponse),
        (status = 401, description = "Unauthorized")
    )
)]
/// Draw once for the current user
pub async fn draw(service: web::Data<LotteryService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match service.draw(user.id).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(DrawResponse::from(outcome)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "lottery",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Prizes still in stock", body = [PrizeResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_prizes(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.list_available().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/my-prizes",
    tag = "lottery",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user's wins, newest first", body = [UserPrizeResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_prizes(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match service.list_user_prizes(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/getList",
    tag = "lottery",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All wins, newest first", body = [UserPrizeResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an administrator")
    )
)]
/// Admin only
pub async fn get_all_prizes(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_user(&req) {
        Ok(user) if user.is_admin => {}
        Ok(_) => return Ok(AppError::Forbidden.error_response()),
        Err(e) => return Ok(e.error_response()),
    }
    match service.list_all_prizes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/lottery", web::post().to(draw))
        .route("/prizes", web::get().to(get_prizes))
        .route("/my-prizes", web::get().to(get_my_prizes))
        .route("/getList", web::get().to(get_all_prizes));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotteryConfig;
    use crate::database::test_support::{insert_prize, prize_quantity, setup_test_db};
    use crate::entities::user_entity as users;
    use crate::handlers::auth_config;
    use crate::middlewares::AuthMiddleware;
    use crate::services::AuthService;
    use crate::utils::JwtService;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use sea_orm::sea_query::Expr;
    use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
    use serde_json::{Value, json};

    async fn setup() -> (DatabaseConnection, JwtService) {
        (setup_test_db().await, JwtService::new("test-secret", 3600))
    }

    macro_rules! init_app {
        ($db:expr, $jwt:expr, $threshold:expr) => {
            test::init_service(
                App::new()
                    .wrap(AuthMiddleware::new($jwt.clone()))
                    .app_data(web::Data::new(AuthService::new($db.clone(), $jwt.clone())))
                    .app_data(web::Data::new(LotteryService::new(
                        $db.clone(),
                        LotteryConfig {
                            no_win_threshold: $threshold,
                            ..Default::default()
                        },
                    )))
                    .service(
                        web::scope("/api")
                            .configure(auth_config)
                            .configure(lottery_config),
                    ),
            )
            .await
        };
    }

    /// Registers and logs in, evaluating to the access token.
    macro_rules! sign_in {
        ($app:expr, $username:expr) => {{
            let credentials = json!({ "username": $username, "password": "Password123" });

            let req = test::TestRequest::post()
                .uri("/api/register")
                .set_json(&credentials)
                .to_request();
            let resp = test::call_service($app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let req = test::TestRequest::post()
                .uri("/api/login")
                .set_json(&credentials)
                .to_request();
            let body: Value = test::call_and_read_body_json($app, req).await;
            assert_eq!(body["success"], true);
            body["data"]["access_token"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_login_then_draw_last_unit() {
        let (db, jwt) = setup().await;
        let prize_id = insert_prize(&db, "A", 1).await;
        let app = init_app!(db, jwt, 0.0);
        let token = sign_in!(&app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/lottery")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["outcome"], "won");
        assert_eq!(body["data"]["prize_id"], prize_id);
        assert_eq!(body["data"]["prize_name"], "A");
        assert_eq!(prize_quantity(&db, prize_id).await, 0);

        // legacy header works too; stock is gone now
        let req = test::TestRequest::post()
            .uri("/api/lottery")
            .insert_header(("Token", token.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["outcome"], "none_available");

        let req = test::TestRequest::get()
            .uri("/api/my-prizes")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let wins = body["data"].as_array().unwrap();
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0]["prize_id"], prize_id);
    }

    #[actix_web::test]
    async fn test_no_win_returns_sentinel() {
        let (db, jwt) = setup().await;
        let prize_id = insert_prize(&db, "A", 1).await;
        let app = init_app!(db, jwt, 1.0);
        let token = sign_in!(&app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/lottery")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["outcome"], "no_win");
        assert_eq!(body["data"]["prize_id"], 0);
        assert_eq!(prize_quantity(&db, prize_id).await, 1);
    }

    #[actix_web::test]
    async fn test_draw_requires_token() {
        let (db, jwt) = setup().await;
        let app = init_app!(db, jwt, 0.0);

        let req = test::TestRequest::post().uri("/api/lottery").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/lottery")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_login_rejects_wrong_password() {
        let (db, jwt) = setup().await;
        let app = init_app!(db, jwt, 0.0);
        sign_in!(&app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": "alice", "password": "Password999" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_all_prizes_is_admin_only() {
        let (db, jwt) = setup().await;
        insert_prize(&db, "A", 5).await;
        let app = init_app!(db, jwt, 0.0);
        let token = sign_in!(&app, "alice");

        let req = test::TestRequest::get()
            .uri("/api/getList")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        users::Entity::update_many()
            .col_expr(users::Column::IsAdmin, Expr::value(true))
            .filter(users::Column::Username.eq("alice"))
            .exec(&db)
            .await
            .unwrap();
        // admin flag is read from the token, so sign in again
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": "alice", "password": "Password123" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let admin_token = body["data"]["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/lottery")
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/getList")
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
