use serde::{Deserialize, Serialize};

/// 进程快照（单次枚举产生的只读记录）
///
/// 每次枚举时重新生成，不持有任何指向活进程的引用，
/// 序列化完成后即丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    /// 进程 ID
    pub pid: i32,
    /// 可执行文件 / 命令的显示名称
    pub name: String,
    /// 操作系统报告的运行状态（原样透传，如 Runnable / Sleep / Stop）
    pub status: String,
    /// 占系统总内存的百分比 (0-100)
    pub memory_percent: f32,
}
