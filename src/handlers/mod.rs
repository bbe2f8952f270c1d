pub mod health;
pub mod quote;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config).configure(quote::config);
}
