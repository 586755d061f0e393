use actix_web::web::*;

use crate::handlers::expenses;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/expenses")
            .route("", get().to(expenses::get))
            .route("", post().to(expenses::create)),
    );
}
