use actix_web::{HttpRequest, HttpResponse};

use crate::state::AppState;

/// 请求必须携带的鉴权头
pub const API_KEY_HEADER: &str = "X-API-Key";

/// 校验 X-API-Key，不匹配时直接返回可用的 401 响应
pub fn authorize(req: &HttpRequest, state: &AppState) -> Result<(), HttpResponse> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented == Some(state.api_key.as_str()) {
        return Ok(());
    }

    log::warn!("Rejected request to {} with invalid API key", req.path());

    Err(HttpResponse::Unauthorized().json(serde_json::json!({
        "status": "error",
        "message": "Invalid or missing API key"
    })))
}
