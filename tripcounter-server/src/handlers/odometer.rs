use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::db::{self, DaoError, TableStore};

use super::{today, DateQuery};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct OdometerRequest {
    pub action: String,
    // The form submits readings as strings; accept numbers too
    pub km_value: serde_json::Value,
    pub fecha: Option<NaiveDate>,
    #[serde(default)]
    pub notas: String,
}

pub async fn get(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let date = query.date.unwrap_or_else(today);

    let entry = match db::odometer::Dao::new(&store).entry_for_date(date).await {
        Ok(entry) => entry,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to read the odometer entry",
            ));
        }
    };

    let Some((_, entry)) = entry else {
        return Ok(HttpResponse::Ok().json(json!({ "status": "no_record" })));
    };

    Ok(HttpResponse::Ok().json(json!({
        "fecha": entry.date,
        "km_inicio": entry.start_reading,
        "km_fin": entry.end_reading,
        "recorrido": entry.distance,
        "notas": entry.notes,
    })))
}

pub async fn submit(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    body: web::Json<OdometerRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let reading = parse_reading(&body.km_value)?;
    let date = body.fecha.unwrap_or_else(today);
    let dao = db::odometer::Dao::new(&store);

    match body.action.as_str() {
        "start" => {
            let entry = match dao.start_day(date, reading, body.notas.clone()).await {
                Ok(entry) => entry,
                Err(DaoError::Duplicate(msg)) => return Err(HttpErrorResponse::Conflict(msg)),
                Err(e) => {
                    log::error!("{e}");
                    return Err(HttpErrorResponse::InternalError(
                        "Failed to record the starting reading",
                    ));
                }
            };

            Ok(HttpResponse::Created().json(json!({
                "status": "ok",
                "km_inicio": entry.start_reading,
            })))
        }
        "end" => {
            let entry = match dao.end_day(date, reading).await {
                Ok(entry) => entry,
                Err(DaoError::NotFound(msg)) | Err(DaoError::InvalidState(msg)) => {
                    return Err(HttpErrorResponse::InvalidInput(msg));
                }
                Err(e) => {
                    log::error!("{e}");
                    return Err(HttpErrorResponse::InternalError(
                        "Failed to record the ending reading",
                    ));
                }
            };

            Ok(HttpResponse::Ok().json(json!({
                "status": "ok",
                "km_fin": entry.end_reading,
                "recorrido": entry.distance,
            })))
        }
        _ => Err(HttpErrorResponse::InvalidInput(
            "action must be 'start' or 'end'",
        )),
    }
}

fn parse_reading(value: &serde_json::Value) -> Result<i64, HttpErrorResponse> {
    let reading = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    match reading {
        Some(reading) if reading >= 0 => Ok(reading),
        _ => Err(HttpErrorResponse::InvalidInput(
            "km_value must be a non-negative integer",
        )),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::handlers::test_utils::{body_json, get, memory_store, post_json, test_app};

    fn km_body(action: &str, km_value: serde_json::Value) -> serde_json::Value {
        json!({
            "action": action,
            "km_value": km_value,
            "fecha": "2025-11-03",
            "notas": "city shift",
        })
    }

    #[actix_web::test]
    async fn a_full_day_reports_its_distance() {
        let app = test_app(memory_store()).await;

        // Readings arrive as strings from the form
        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("start", json!("1000"))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["km_inicio"], 1000);

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("end", json!(1120))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["km_fin"], 1120);
        assert_eq!(body["recorrido"], 120);

        let resp =
            test::call_service(&app, get("/api/kilometraje?date=2025-11-03").to_request()).await;
        let body = body_json(resp).await;
        assert_eq!(body["km_inicio"], 1000);
        assert_eq!(body["recorrido"], 120);
        assert_eq!(body["notas"], "city shift");
    }

    #[actix_web::test]
    async fn a_day_without_an_entry_reports_no_record() {
        let app = test_app(memory_store()).await;

        let resp =
            test::call_service(&app, get("/api/kilometraje?date=2025-11-03").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "no_record");
    }

    #[actix_web::test]
    async fn starting_twice_conflicts() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("start", json!(1000))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("start", json!(1010))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn ending_below_the_start_is_rejected() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("start", json!(1000))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("end", json!(950))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn ending_an_unstarted_day_is_rejected() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("end", json!(1120))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_actions_are_rejected() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json("/api/kilometraje", km_body("pause", json!(1000))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
