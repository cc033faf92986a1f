use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

use crate::models::ProcessSnapshot;

/// 单个进程读不出来的原因（闭合集合）
///
/// 前三种是正常现象，静默跳过；`Other` 同样跳过，但要留下
/// 日志，方便运维发现异常。
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// 遍历到一半进程已经退出
    Vanished,
    /// 当前用户无权读取该进程的属性
    AccessDenied,
    /// 僵尸进程，属性已经没有意义
    Zombie,
    /// 正常系统行为下不应出现的读取失败
    Other(String),
}

/// 遍历一次当前进程表，返回所有可读进程的快照
///
/// 单个进程读取失败不会让整次枚举失败，结果顺序就是
/// 进程表的遍历顺序，调用方不要假设任何排序。
pub fn enumerate() -> Vec<ProcessSnapshot> {
    let mut sys = System::new_all();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let total_memory = sys.total_memory();
    let pids: Vec<Pid> = sys.processes().keys().copied().collect();

    filter_readable(
        pids.into_iter()
            .map(|pid| read_snapshot(&sys, pid, total_memory)),
    )
}

/// 读取单个进程的四个属性
fn read_snapshot(sys: &System, pid: Pid, total_memory: u64) -> Result<ProcessSnapshot, SkipReason> {
    let process = sys.process(pid).ok_or(SkipReason::Vanished)?;

    if matches!(process.status(), ProcessStatus::Zombie) {
        return Err(SkipReason::Zombie);
    }

    let name = process.name().to_string_lossy().into_owned();
    if name.is_empty() {
        // 对当前用户不可见的进程在表里只剩一个空壳
        return Err(SkipReason::AccessDenied);
    }

    let pid = i32::try_from(pid.as_u32())
        .map_err(|_| SkipReason::Other(format!("pid {} out of i32 range", pid)))?;

    Ok(ProcessSnapshot {
        pid,
        name,
        status: process.status().to_string(),
        memory_percent: if total_memory > 0 {
            (process.memory() as f32 / total_memory as f32) * 100.0
        } else {
            0.0
        },
    })
}

/// 过滤掉读不出来的进程，保持输入顺序
fn filter_readable<I>(results: I) -> Vec<ProcessSnapshot>
where
    I: IntoIterator<Item = Result<ProcessSnapshot, SkipReason>>,
{
    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(snapshot) => Some(snapshot),
            Err(SkipReason::Other(detail)) => {
                log::warn!("Skipping unreadable process: {}", detail);
                None
            }
            Err(_) => None,
        })
        .collect()
}
