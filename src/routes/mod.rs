// Route exports
pub mod likes;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(likes::configure);
}
