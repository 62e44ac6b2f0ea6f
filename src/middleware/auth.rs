use std::{
    future::{ready, Ready},
    sync::Arc,
};

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::warn;
use uuid::Uuid;

use crate::{routes::auth::Claims, AppConfig};

/// Identity decoded from a valid Bearer token. Extracting it in a handler
/// turns a missing or invalid token into a 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing or invalid session token")),
        )
    }
}

pub struct Authentication {
    pub app_config: Arc<AppConfig>,
}

// Middleware factory is `Transform` trait
// `S` - type of the next service
// `B` - type of response's body
impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware {
            service,
            app_config: self.app_config.clone(),
        }))
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
    app_config: Arc<AppConfig>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Decode the Bearer token, if any, and stash the identity in the
        // request extensions. Handlers decide whether they require it.
        let app_config = self.app_config.clone();

        let auth_header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("Bearer "))
            .map(|value| &value["Bearer ".len()..]);

        if let Some(token) = auth_header {
            let decoding_key = DecodingKey::from_secret(app_config.jwt_secret.as_ref());

            match decode::<Claims>(token, &decoding_key, &Validation::default()) {
                Ok(token_data) => match token_data.claims.sub.parse::<Uuid>() {
                    Ok(user_id) => {
                        req.extensions_mut().insert(AuthenticatedUser { user_id });
                    }
                    Err(e) => {
                        warn!("Token subject is not a user id: {:?}", e);
                    }
                },
                Err(e) => {
                    warn!("Invalid token: {:?}", e);
                }
            }
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    async fn whoami(authenticated_user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(authenticated_user.user_id.to_string())
    }

    fn test_config(secret: &str) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            database_url: String::new(),
            jwt_secret: secret.to_string(),
            openai_api_key: String::new(),
            openai_api_base: None,
            port: 0,
        })
    }

    fn token_signed_with(secret: &str, sub: &str) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    async fn guarded_call(secret: &str, bearer: Option<String>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::scope("/profile")
                    .wrap(Authentication {
                        app_config: test_config(secret),
                    })
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/profile/whoami");
        if let Some(token) = bearer {
            req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
        }
        test::call_service(&app, req.to_request()).await.status()
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        assert_eq!(guarded_call("secret", None).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn token_signed_with_another_secret_is_unauthorized() {
        let token = token_signed_with("other-secret", &Uuid::new_v4().to_string());
        assert_eq!(
            guarded_call("secret", Some(token)).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn token_with_a_non_uuid_subject_is_unauthorized() {
        let token = token_signed_with("secret", "not-a-user-id");
        assert_eq!(
            guarded_call("secret", Some(token)).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler() {
        let token = token_signed_with("secret", &Uuid::new_v4().to_string());
        assert_eq!(guarded_call("secret", Some(token)).await, StatusCode::OK);
    }
}
