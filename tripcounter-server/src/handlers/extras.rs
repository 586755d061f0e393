use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::db::{self, DaoError, TableStore};
use tripcounter_common::models::extra::NewExtra;
use tripcounter_common::models::parse_clock_time;

use super::{today, DateQuery};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct NewExtraRequest {
    pub fecha: Option<NaiveDate>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub monto: f64,
}

pub async fn get(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let date = query.date.unwrap_or_else(today);

    let extras = match db::extras::Dao::new(&store).extras_for_date(date).await {
        Ok(extras) => extras,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to read extras"));
        }
    };

    Ok(HttpResponse::Ok().json(extras))
}

pub async fn create(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    body: web::Json<NewExtraRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if !body.monto.is_finite() || body.monto < 0.0 {
        return Err(HttpErrorResponse::InvalidInput(
            "monto must be a non-negative number",
        ));
    }

    let start_time = parse_clock_time(&body.hora_inicio)
        .ok_or(HttpErrorResponse::InvalidInput("hora_inicio must be HH:MM"))?;
    let end_time = parse_clock_time(&body.hora_fin)
        .ok_or(HttpErrorResponse::InvalidInput("hora_fin must be HH:MM"))?;

    let new_extra = NewExtra {
        date: body.fecha.unwrap_or_else(today),
        start_time,
        end_time,
        fare: body.monto,
    };

    let extra = match db::extras::Dao::new(&store).create(&new_extra).await {
        Ok(extra) => extra,
        Err(DaoError::Duplicate(msg)) => return Err(HttpErrorResponse::Conflict(msg)),
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to save extra"));
        }
    };

    Ok(HttpResponse::Created().json(json!({ "status": "ok", "extra": extra })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::handlers::test_utils::{body_json, get, memory_store, post_json, test_app};

    #[actix_web::test]
    async fn extras_do_not_affect_trip_numbering_or_bonus() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json(
                "/api/extras",
                json!({
                    "fecha": "2025-11-03",
                    "hora_inicio": "09:00",
                    "hora_fin": "09:40",
                    "monto": 20.0,
                }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = body_json(resp).await;
        assert_eq!(body["extra"]["number"], 1);
        assert_eq!(body["extra"]["total"], 20.0);

        // The trips table stays empty and its bonus stays zero
        let resp = test::call_service(
            &app,
            get("/api/trips?date=2025-11-03").to_request(),
        )
        .await;
        let body = body_json(resp).await;
        assert_eq!(body["trips"].as_array().unwrap().len(), 0);
        assert_eq!(body["bonus"], 0.0);
    }

    #[actix_web::test]
    async fn duplicate_extra_conflicts() {
        let app = test_app(memory_store()).await;

        let body = json!({
            "fecha": "2025-11-03",
            "hora_inicio": "09:00",
            "hora_fin": "09:40",
            "monto": 20.0,
        });

        let resp =
            test::call_service(&app, post_json("/api/extras", body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(&app, post_json("/api/extras", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn listing_is_filtered_by_date() {
        let app = test_app(memory_store()).await;

        for (fecha, hora) in [("2025-11-03", "09:00"), ("2025-11-04", "10:00")] {
            let resp = test::call_service(
                &app,
                post_json(
                    "/api/extras",
                    json!({
                        "fecha": fecha,
                        "hora_inicio": hora,
                        "hora_fin": "11:00",
                        "monto": 15.0,
                    }),
                )
                .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp =
            test::call_service(&app, get("/api/extras?date=2025-11-04").to_request()).await;
        let body = body_json(resp).await;

        let extras = body.as_array().unwrap();
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0]["date"], "2025-11-04");
    }
}
