use actix_web::web::*;

use crate::handlers::trips;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/trips")
            .route("", get().to(trips::get))
            .route("", post().to(trips::create)),
    );
}
