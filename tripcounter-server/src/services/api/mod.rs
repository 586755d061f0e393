use actix_web::web::*;

mod budget;
mod expenses;
mod extras;
mod health;
mod odometer;
mod reports;
mod trips;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/api")
            .configure(trips::configure)
            .configure(extras::configure)
            .configure(expenses::configure)
            .configure(budget::configure)
            .configure(odometer::configure)
            .configure(reports::configure),
    )
    .configure(health::configure);
}
