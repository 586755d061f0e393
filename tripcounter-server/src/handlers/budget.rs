use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::db::{self, TableStore};
use tripcounter_common::models::budget_item::BudgetItem;

use super::today;
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct NewBudgetItemRequest {
    pub categoria: String,
    pub monto: f64,
    pub fecha_pago: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub row_index: Option<usize>,
}

pub async fn get(
    store: web::Data<TableStore>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let items = match db::budget::Dao::new(&store).items_for_owner(&user.email).await {
        Ok(items) => items,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to read budget items",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(items))
}

pub async fn create(
    store: web::Data<TableStore>,
    user: AuthenticatedUser,
    body: web::Json<NewBudgetItemRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if body.categoria.trim().is_empty() {
        return Err(HttpErrorResponse::MissingField("categoria is required"));
    }

    let Some(due_date) = body.fecha_pago else {
        return Err(HttpErrorResponse::MissingField("fecha_pago is required"));
    };

    if !body.monto.is_finite() || body.monto <= 0.0 {
        return Err(HttpErrorResponse::InvalidInput(
            "monto must be a positive number",
        ));
    }

    let item = BudgetItem {
        owner: user.email,
        category: String::from(body.categoria.trim()),
        amount: body.monto,
        due_date: Some(due_date),
        paid: false,
    };

    if let Err(e) = db::budget::Dao::new(&store).create(&item).await {
        log::error!("{e}");
        return Err(HttpErrorResponse::InternalError(
            "Failed to save budget item",
        ));
    }

    Ok(HttpResponse::Created().json(json!({ "status": "ok", "entry": item })))
}

pub async fn mark_paid(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    body: web::Json<MarkPaidRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let Some(row_index) = body.row_index else {
        return Err(HttpErrorResponse::MissingField("row_index is required"));
    };

    // Row 1 is the header row
    if row_index < 2 {
        return Err(HttpErrorResponse::InvalidInput(
            "row_index must address a data row",
        ));
    }

    if let Err(e) = db::budget::Dao::new(&store).mark_paid(row_index).await {
        log::error!("{e}");
        return Err(HttpErrorResponse::InternalError(
            "Failed to mark the budget item as paid",
        ));
    }

    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

pub async fn reminders(
    store: web::Data<TableStore>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let reminders = match db::budget::Dao::new(&store)
        .reminders(&user.email, today())
        .await
    {
        Ok(reminders) => reminders,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Failed to compute reminders",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(reminders))
}
