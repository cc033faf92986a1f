pub mod auth;
pub mod processes;

pub use processes::{kill_process, list_processes, resume_process, suspend_process};

use actix_web::{HttpResponse, Responder};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}
