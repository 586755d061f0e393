use actix_web::web::*;

use crate::handlers::odometer;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/kilometraje")
            .route("", get().to(odometer::get))
            .route("", post().to(odometer::submit)),
    );
}
