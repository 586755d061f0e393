use actix_web::web::*;

use crate::handlers::budget;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/presupuesto")
            .route("", get().to(budget::get))
            .route("", post().to(budget::create))
            .route("", put().to(budget::mark_paid))
            .route("/reminders", get().to(budget::reminders)),
    );
}
