use actix_web::web::*;

use crate::handlers::reports;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/summary", get().to(reports::summary))
        .route("/monthly_report", get().to(reports::monthly));
}
