use actix_web::{test::init_service, web};
use anyhow::Result;
use donatebox::create_web_app;
use serde_json::json;
use util::create_test_state;

mod util;

#[actix_rt::test]
async fn info() -> Result<()> {
    let state = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = util::get(&app, "/v1/info").await?;
    assert_eq!(status, 200);
    assert!(val["version"].is_string());
    assert!(val["packages"].as_array().unwrap().len() >= 1);
    assert!(val["payment"]["phone"].is_string());
    Ok(())
}

#[actix_rt::test]
async fn payment_instructions() -> Result<()> {
    let state = create_test_state().await?;
    let bank = state.setting.payment.bank.clone();
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = util::get(&app, "/v1/payment?amount=299&package=VIP").await?;
    assert_eq!(status, 200);
    assert_eq!(val["bank"], json!(bank));
    assert_eq!(val["amount"], json!("299"));
    assert!(val["sbp_link"].as_str().unwrap().contains("sum=299"));

    // repeated call returns the same instructions
    let (again, _) = util::get(&app, "/v1/payment?amount=299&package=VIP").await?;
    assert_eq!(val, again);

    let (val, status) = util::get(&app, "/v1/payment?amount=0&package=VIP").await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], json!(true));

    let (_val, status) = util::get(&app, "/v1/payment?amount=299").await?;
    assert_eq!(status, 400);
    Ok(())
}

#[actix_rt::test]
async fn payment_instructions_by_order_id() -> Result<()> {
    let state = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = util::post(
        &app,
        "/v1/donations",
        json!({"player_nickname": "Steve", "package_name": "VIP", "amount": 299}),
    )
    .await?;
    assert_eq!(status, 201);
    let id = val["donation"]["id"].as_i64().unwrap();

    // amount/package come from the stored record, the query string lies
    let (val, status) = util::get(
        &app,
        &format!("/v1/payment?id={}&amount=1&package=Legend", id),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["amount"], json!("299"));
    assert_eq!(val["package"], json!("VIP"));

    let (_val, status) = util::get(&app, "/v1/payment?id=9999").await?;
    assert_eq!(status, 404);
    Ok(())
}

#[actix_rt::test]
async fn donation_lifecycle() -> Result<()> {
    let state = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    // buyer claims a VIP purchase
    let (val, status) = util::post(
        &app,
        "/v1/donations",
        json!({"player_nickname": "Steve", "package_name": "VIP", "amount": 299, "phone": "+70001112233"}),
    )
    .await?;
    assert_eq!(status, 201);
    assert_eq!(val["success"], json!(true));
    assert_eq!(val["donation"]["status"], json!("pending"));
    assert_eq!(val["donation"]["amount"], json!(299));
    let id = val["donation"]["id"].as_i64().unwrap();

    let (val, status) = util::get(&app, "/v1/donations").await?;
    assert_eq!(status, 200);
    let donations = val["donations"].as_array().unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0]["id"], json!(id));

    // operator confirms the transfer arrived
    let (val, status) =
        util::put(&app, "/v1/donations", json!({"id": id, "status": "completed"})).await?;
    assert_eq!(status, 200);
    assert_eq!(val["donation"]["status"], json!("completed"));

    let (val, _) = util::get(&app, "/v1/stats").await?;
    assert_eq!(val["total"], json!(1));
    assert_eq!(val["completed"], json!(1));
    assert_eq!(val["revenue"], json!(299));

    // double-click: accepted, revenue unchanged
    let (_val, status) =
        util::put(&app, "/v1/donations", json!({"id": id, "status": "completed"})).await?;
    assert_eq!(status, 200);
    let (val, _) = util::get(&app, "/v1/stats").await?;
    assert_eq!(val["revenue"], json!(299));

    // direct completed -> cancelled is rejected
    let (val, status) =
        util::put(&app, "/v1/donations", json!({"id": id, "status": "cancelled"})).await?;
    assert_eq!(status, 409);
    assert_eq!(val["error"], json!(true));

    // routing through pending is allowed
    let (_val, status) =
        util::put(&app, "/v1/donations", json!({"id": id, "status": "pending"})).await?;
    assert_eq!(status, 200);
    let (val, status) =
        util::put(&app, "/v1/donations", json!({"id": id, "status": "cancelled"})).await?;
    assert_eq!(status, 200);
    assert_eq!(val["donation"]["status"], json!("cancelled"));

    let (val, _) = util::get(&app, "/v1/stats").await?;
    assert_eq!(val["revenue"], json!(0));
    assert_eq!(val["pending"], json!(0));
    Ok(())
}

#[actix_rt::test]
async fn donation_create_rejections() -> Result<()> {
    let state = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = util::post(
        &app,
        "/v1/donations",
        json!({"player_nickname": "Steve", "package_name": "VIP", "amount": 100}),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], json!(true));

    let (_val, status) = util::post(
        &app,
        "/v1/donations",
        json!({"player_nickname": "Steve", "package_name": "Mythic", "amount": 100}),
    )
    .await?;
    assert_eq!(status, 400);

    // rejected orders leave no record behind
    let (val, _) = util::get(&app, "/v1/donations").await?;
    assert_eq!(val["donations"].as_array().unwrap().len(), 0);
    Ok(())
}

#[actix_rt::test]
async fn donation_update_notes_and_errors() -> Result<()> {
    let state = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, _) = util::post(
        &app,
        "/v1/donations",
        json!({"player_nickname": "Steve", "package_name": "Starter", "amount": 99}),
    )
    .await?;
    let id = val["donation"]["id"].as_i64().unwrap();

    // notes-only update leaves the status alone
    let (val, status) = util::put(
        &app,
        "/v1/donations",
        json!({"id": id, "notes": "transfer seen at 14:02"}),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["donation"]["notes"], json!("transfer seen at 14:02"));
    assert_eq!(val["donation"]["status"], json!("pending"));

    // empty string clears the notes
    let (val, _) = util::put(&app, "/v1/donations", json!({"id": id, "notes": ""})).await?;
    assert_eq!(val["donation"]["notes"], json!(null));

    let (_val, status) = util::put(&app, "/v1/donations", json!({"id": id})).await?;
    assert_eq!(status, 400);

    let (_val, status) = util::put(
        &app,
        "/v1/donations",
        json!({"id": 9999, "status": "completed"}),
    )
    .await?;
    assert_eq!(status, 404);
    Ok(())
}
