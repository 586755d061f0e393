use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tripcounter_common::bonus::compute_bonus;
use tripcounter_common::db::{self, DaoError, TableStore};
use tripcounter_common::models::parse_clock_time;
use tripcounter_common::models::trip::NewTrip;

use super::{today, DateQuery};
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct NewTripRequest {
    pub fecha: Option<NaiveDate>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub monto: f64,
    pub propina: Option<f64>,
    #[serde(default)]
    pub aeropuerto: bool,
}

pub async fn get(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let date = query.date.unwrap_or_else(today);

    let trips = match db::trips::Dao::new(&store).trips_for_date(date).await {
        Ok(trips) => trips,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to read trips"));
        }
    };

    let bonus = match db::bonus_ledger::Dao::new(&store).bonus_for_date(date).await {
        Ok(bonus) => bonus,
        Err(e) => {
            log::warn!("Bonus ledger read failed for {date}; reporting 0: {e}");
            0.0
        }
    };

    Ok(HttpResponse::Ok().json(json!({ "trips": trips, "bonus": bonus })))
}

pub async fn create(
    store: web::Data<TableStore>,
    _user: AuthenticatedUser,
    body: web::Json<NewTripRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let new_trip = validate(&body)?;

    let trip = match db::trips::Dao::new(&store).create(&new_trip).await {
        Ok(trip) => trip,
        Err(DaoError::Duplicate(msg)) => return Err(HttpErrorResponse::Conflict(msg)),
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError("Failed to save trip"));
        }
    };

    // The trip row is already committed; a failure past this point is
    // reported but not rolled back.
    let new_bonus = match recompute_bonus(&store, new_trip.date).await {
        Ok(bonus) => bonus,
        Err(e) => {
            log::error!("Bonus recompute failed after trip append: {e}");
            return Err(HttpErrorResponse::InternalError(
                "Trip was saved but the bonus could not be updated",
            ));
        }
    };

    Ok(HttpResponse::Created().json(json!({
        "status": "ok",
        "trip": trip,
        "new_bonus": new_bonus,
    })))
}

/// Recomputes the date's bonus from scratch from its current trip count and
/// upserts the ledger row.
async fn recompute_bonus(store: &TableStore, date: NaiveDate) -> Result<f64, DaoError> {
    let trips = db::trips::Dao::new(store).trips_for_date(date).await?;
    let bonus = compute_bonus(date, trips.len() as u32);

    db::bonus_ledger::Dao::new(store)
        .set_for_date(date, bonus)
        .await?;

    Ok(bonus)
}

fn validate(body: &NewTripRequest) -> Result<NewTrip, HttpErrorResponse> {
    if !body.monto.is_finite() || body.monto < 0.0 {
        return Err(HttpErrorResponse::InvalidInput(
            "monto must be a non-negative number",
        ));
    }

    let tip = body.propina.unwrap_or(0.0);
    if !tip.is_finite() || tip < 0.0 {
        return Err(HttpErrorResponse::InvalidInput(
            "propina must be a non-negative number",
        ));
    }

    let start_time = parse_clock_time(&body.hora_inicio)
        .ok_or(HttpErrorResponse::InvalidInput("hora_inicio must be HH:MM"))?;
    let end_time = parse_clock_time(&body.hora_fin)
        .ok_or(HttpErrorResponse::InvalidInput("hora_fin must be HH:MM"))?;

    Ok(NewTrip {
        date: body.fecha.unwrap_or_else(today),
        start_time,
        end_time,
        fare: body.monto,
        tip,
        airport: body.aeropuerto,
    })
}
