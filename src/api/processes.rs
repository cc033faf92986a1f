use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::api::auth::authorize;
use crate::services::{enumerate, ControlError};
use crate::state::AppState;

pub async fn list_processes(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    if let Err(rejection) = authorize(&req, data.get_ref()) {
        return rejection;
    }

    HttpResponse::Ok().json(enumerate())
}

pub async fn kill_process(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    if let Err(rejection) = authorize(&req, data.get_ref()) {
        return rejection;
    }

    let pid = path.into_inner();
    match data.controller.terminate(pid).await {
        Ok(()) => success(pid, "killed"),
        Err(error) => failure(error, "kill"),
    }
}

pub async fn suspend_process(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    if let Err(rejection) = authorize(&req, data.get_ref()) {
        return rejection;
    }

    let pid = path.into_inner();
    match data.controller.suspend(pid) {
        Ok(()) => success(pid, "suspended"),
        Err(error) => failure(error, "suspend"),
    }
}

pub async fn resume_process(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    if let Err(rejection) = authorize(&req, data.get_ref()) {
        return rejection;
    }

    let pid = path.into_inner();
    match data.controller.resume(pid) {
        Ok(()) => success(pid, "resumed"),
        Err(error) => failure(error, "resume"),
    }
}

fn success(pid: i32, past_tense: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": format!("Process {} {} successfully", pid, past_tense)
    }))
}

/// 控制器闭合错误集到 HTTP 状态码的唯一映射
fn failure(error: ControlError, action: &str) -> HttpResponse {
    match error {
        ControlError::NotFound(pid) => HttpResponse::NotFound().json(serde_json::json!({
            "status": "error",
            "message": format!("Process with PID {} not found", pid)
        })),
        ControlError::PermissionDenied(pid) => HttpResponse::Forbidden().json(serde_json::json!({
            "status": "error",
            "message": format!("Permission denied to {} process {}", action, pid)
        })),
        ControlError::Unexpected { pid, errno } => {
            log::error!(
                "Unexpected failure trying to {} process {}: {}",
                action,
                pid,
                errno
            );
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Unexpected failure operating on process {}", pid)
            }))
        }
    }
}
