use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::db::{self, TableStore};
use tripcounter_common::models::expense::ExpenseRecord;
use tripcounter_common::models::parse_clock_time;

use super::{current_clock_time, today, DateQuery};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct NewExpenseRequest {
    pub fecha: Option<NaiveDate>,
    pub hora: Option<String>,
    pub monto: f64,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub descripcion: String,
}

pub async fn get(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let date = query.date.unwrap_or_else(today);

    let expenses = match db::expenses::Dao::new(&store).expenses_for_date(date).await {
        Ok(expenses) => expenses,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to read expenses"));
        }
    };

    Ok(HttpResponse::Ok().json(expenses))
}

pub async fn create(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    body: web::Json<NewExpenseRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if !body.monto.is_finite() || body.monto <= 0.0 {
        return Err(HttpErrorResponse::InvalidInput(
            "monto must be a positive number",
        ));
    }

    let time = match &body.hora {
        Some(hora) => {
            parse_clock_time(hora).ok_or(HttpErrorResponse::InvalidInput("hora must be HH:MM"))?
        }
        None => current_clock_time(),
    };

    let expense = ExpenseRecord {
        date: body.fecha.unwrap_or_else(today),
        time,
        amount: body.monto,
        category: String::from(body.categoria.trim()),
        description: body.descripcion.clone(),
    };

    if let Err(e) = db::expenses::Dao::new(&store).create(&expense).await {
        log::error!("{e}");
        return Err(HttpErrorResponse::InternalError("Failed to save expense"));
    }

    Ok(HttpResponse::Created().json(json!({ "status": "ok", "expense": expense })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::handlers::test_utils::{body_json, get, memory_store, post_json, test_app};

    fn expense_body(monto: f64) -> serde_json::Value {
        json!({
            "fecha": "2025-11-03",
            "hora": "12:00",
            "monto": monto,
            "categoria": "fuel",
            "descripcion": "tank refill",
        })
    }

    #[actix_web::test]
    async fn identical_expenses_are_both_recorded() {
        let app = test_app(memory_store()).await;

        for _ in 0..2 {
            let resp = test::call_service(
                &app,
                post_json("/api/expenses", expense_body(25.0)).to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp =
            test::call_service(&app, get("/api/expenses?date=2025-11-03").to_request()).await;
        let body = body_json(resp).await;

        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn non_positive_amounts_are_rejected() {
        let app = test_app(memory_store()).await;

        for monto in [0.0, -10.0] {
            let resp = test::call_service(
                &app,
                post_json("/api/expenses", expense_body(monto)).to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn category_may_be_empty_or_omitted() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json(
                "/api/expenses",
                json!({ "fecha": "2025-11-03", "monto": 8.0, "categoria": "" }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["expense"]["category"], "");

        let resp = test::call_service(
            &app,
            post_json(
                "/api/expenses",
                json!({ "fecha": "2025-11-03", "hora": "13:00", "monto": 9.0 }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn omitted_time_defaults_to_the_current_clock() {
        let app = test_app(memory_store()).await;

        let resp = test::call_service(
            &app,
            post_json(
                "/api/expenses",
                json!({ "fecha": "2025-11-03", "monto": 8.0, "categoria": "parking" }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = body_json(resp).await;
        let time = body["expense"]["time"].as_str().unwrap();
        assert_eq!(time.len(), 5);
        assert_eq!(&time[2..3], ":");
    }
}
