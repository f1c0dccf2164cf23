#![allow(unused)]

use actix_http::Method;
use actix_web::{
    body::MessageBody,
    dev::{Service as WebService, ServiceResponse},
    test::{self, TestRequest},
};
use anyhow::Result;
use donatebox::{setting::Setting, AppState};
use migration::{Migrator, MigratorTrait};
use serde_json::Value;

/// Fresh app state backed by a throwaway sqlite file, unless the
/// DONATEBOX_DB_URL env points the tests at a real database.
pub async fn create_test_state() -> Result<AppState> {
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_filename_override(".env.test");
    let mut setting = Setting::from_env("DONATEBOX".to_owned())?;
    if std::env::var("DONATEBOX_DB_URL").is_err() {
        let file = tempfile::Builder::new()
            .prefix("donatebox-test")
            .suffix(".sqlite")
            .tempfile()?;
        let path = file.into_temp_path().keep()?;
        setting.db_url = format!("sqlite://{}?mode=rwc", path.display());
    }
    let state = AppState::from_setting(setting).await?;
    Migrator::fresh(state.service.db()).await?;
    Ok(state)
}

pub fn get_req(path: &str) -> TestRequest {
    TestRequest::with_uri(path)
}

pub fn post_req(path: &str, data: Value) -> TestRequest {
    TestRequest::with_uri(path)
        .method(Method::POST)
        .set_json(data)
}

pub fn put_req(path: &str, data: Value) -> TestRequest {
    TestRequest::with_uri(path)
        .method(Method::PUT)
        .set_json(data)
}

pub async fn call<S, B>(req: TestRequest, app: &S) -> Result<(Value, u16)>
where
    S: WebService<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    let val = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };
    Ok((val, status))
}

pub async fn get<S, B>(app: &S, path: &str) -> Result<(Value, u16)>
where
    S: WebService<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(get_req(path), app).await
}

pub async fn post<S, B>(app: &S, path: &str, data: Value) -> Result<(Value, u16)>
where
    S: WebService<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(post_req(path, data), app).await
}

pub async fn put<S, B>(app: &S, path: &str, data: Value) -> Result<(Value, u16)>
where
    S: WebService<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(put_req(path, data), app).await
}
