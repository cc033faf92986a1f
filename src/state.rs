use crate::services::LifecycleController;
use std::sync::Arc;

/// 进程启动时注入的应用状态，全程只读，请求之间没有共享可变量
pub struct AppStateInner {
    /// 四个进程路由共用的静态 API key
    pub api_key: String,
    pub controller: LifecycleController,
}

pub type AppState = Arc<AppStateInner>;

pub fn new_state(api_key: String) -> AppState {
    Arc::new(AppStateInner {
        api_key,
        controller: LifecycleController::new(),
    })
}
