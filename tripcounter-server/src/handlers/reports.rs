use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::db::{DaoError, TableStore};
use tripcounter_common::reports::{daily_summary, monthly_report};

use super::{today, DateQuery};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: u32,
    pub year: i32,
}

pub async fn summary(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let date = query.date.unwrap_or_else(today);

    let summary = match daily_summary(&store, date).await {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to build the daily summary",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(summary))
}

pub async fn monthly(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if !(1..=12).contains(&query.month) {
        return Err(HttpErrorResponse::InvalidInput(
            "month must be between 1 and 12",
        ));
    }

    let report = match monthly_report(&store, query.month, query.year).await {
        Ok(report) => report,
        Err(DaoError::InvalidState(msg)) => return Err(HttpErrorResponse::InvalidInput(msg)),
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to build the monthly report",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "report": report.summary,
        "details": report.details,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::handlers::test_utils::{body_json, get, memory_store, post_json, test_app};

    #[actix_web::test]
    async fn an_empty_day_summarizes_to_zeroes() {
        let app = test_app(memory_store()).await;

        let resp =
            test::call_service(&app, get("/api/summary?date=2025-11-03").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["total_trips"], 0);
        assert_eq!(body["total_km"], 0);
        assert_eq!(body["net_income"], 0.0);
        assert_eq!(body["productivity_per_km"], 0.0);
        assert_eq!(body["is_complete"], false);
    }

    #[actix_web::test]
    async fn a_recorded_day_summarizes_trips_expenses_and_distance() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json(
                "/api/trips",
                json!({
                    "fecha": "2025-11-03",
                    "hora_inicio": "08:00",
                    "hora_fin": "08:25",
                    "monto": 40.0,
                    "propina": 10.0,
                }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            post_json(
                "/api/expenses",
                json!({ "fecha": "2025-11-03", "hora": "12:00", "monto": 12.0, "categoria": "fuel" }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        for (action, km) in [("start", 1000), ("end", 1100)] {
            let resp = test::call_service(
                &app,
                post_json(
                    "/api/kilometraje",
                    json!({ "action": action, "km_value": km, "fecha": "2025-11-03" }),
                )
                .to_request(),
            )
            .await;
            assert!(resp.status().is_success());
        }

        let resp =
            test::call_service(&app, get("/api/summary?date=2025-11-03").to_request()).await;
        let body = body_json(resp).await;

        assert_eq!(body["total_trips"], 1);
        assert_eq!(body["gross_trip_income"], 50.0);
        assert_eq!(body["total_expenses"], 12.0);
        assert_eq!(body["total_km"], 100);
        assert_eq!(body["net_income"], 38.0);
        assert_eq!(body["productivity_per_km"], 0.38);
        assert_eq!(body["is_complete"], true);
    }

    #[actix_web::test]
    async fn the_monthly_report_rolls_recorded_days_up() {
        let app = test_app(memory_store()).await;

        for (fecha, monto) in [("2025-11-03", 30.0), ("2025-11-10", 20.0)] {
            let resp = test::call_service(
                &app,
                post_json(
                    "/api/trips",
                    json!({
                        "fecha": fecha,
                        "hora_inicio": "08:00",
                        "hora_fin": "08:25",
                        "monto": monto,
                    }),
                )
                .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = test::call_service(
            &app,
            get("/api/monthly_report?month=11&year=2025").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["report"]["month"], 11);
        assert_eq!(body["report"]["year"], 2025);
        assert_eq!(body["report"]["total_trips"], 2);
        assert_eq!(body["report"]["total_gross_income"], 50.0);
        assert_eq!(body["details"].as_array().unwrap().len(), 30);
    }

    #[actix_web::test]
    async fn an_invalid_month_is_rejected() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            get("/api/monthly_report?month=13&year=2025").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
