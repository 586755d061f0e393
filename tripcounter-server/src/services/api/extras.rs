use actix_web::web::*;

use crate::handlers::extras;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/extras")
            .route("", get().to(extras::get))
            .route("", post().to(extras::create)),
    );
}
