use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use sysinfo::{Pid as SysPid, ProcessStatus, ProcessesToUpdate, System};
use thiserror::Error;

/// 生命周期操作的失败类型（闭合集合）
///
/// 正常系统行为下只会出现前两种；其余 errno 归入 `Unexpected`，
/// 原样上抛给边界层，绝不折算成前两种之一。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    /// 执行动作时目标进程已不存在
    #[error("process with PID {0} not found")]
    NotFound(i32),
    /// 当前用户权限不足
    #[error("permission denied for process {0}")]
    PermissionDenied(i32),
    #[error("unexpected errno {errno} while signaling process {pid}")]
    Unexpected { pid: i32, errno: Errno },
}

/// SIGKILL 之后等待目标退出的时间上限
const KILL_WAIT: Duration = Duration::from_secs(3);
/// 等待期间的轮询间隔
const KILL_WAIT_POLL: Duration = Duration::from_millis(100);

/// 进程生命周期控制器
///
/// 每次调用都按 pid 重新解析目标，句柄只活在单次调用里，
/// 不跨请求缓存。两次调用之间 pid 被复用指向别的进程是
/// 已知且接受的竞态。
pub struct LifecycleController {
    kill_wait: Duration,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::with_kill_wait(KILL_WAIT)
    }
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kill_wait(kill_wait: Duration) -> Self {
        Self { kill_wait }
    }

    /// 强制终止进程
    ///
    /// 发 SIGKILL（不可捕获）而不是 SIGTERM：这个接口要的是
    /// 确定停止，不给目标拒绝退出的机会。信号送达即算成功，
    /// 随后的有界等待只是尽力确认退出，超时不算失败。
    pub async fn terminate(&self, pid: i32) -> Result<(), ControlError> {
        let target = resolve(pid)?;
        send_signal(target, Signal::SIGKILL)?;
        self.await_exit(pid).await;
        Ok(())
    }

    /// 暂停进程的全部执行 (SIGSTOP)
    pub fn suspend(&self, pid: i32) -> Result<(), ControlError> {
        let target = resolve(pid)?;
        send_signal(target, Signal::SIGSTOP)
    }

    /// 恢复被暂停的进程 (SIGCONT)
    pub fn resume(&self, pid: i32) -> Result<(), ControlError> {
        let target = resolve(pid)?;
        send_signal(target, Signal::SIGCONT)
    }

    /// SIGKILL 之后的有界等待，僵尸视为已退出（收尸是父进程的事）
    async fn await_exit(&self, pid: i32) {
        let deadline = tokio::time::Instant::now() + self.kill_wait;

        while process_alive(pid) {
            if tokio::time::Instant::now() >= deadline {
                log::debug!(
                    "Process {} still present after {:?} kill wait",
                    pid,
                    self.kill_wait
                );
                return;
            }
            tokio::time::sleep(KILL_WAIT_POLL).await;
        }

        log::debug!("Process {} exited within kill wait", pid);
    }
}

/// 按 pid 解析活进程
///
/// 信号 0 只做存在性探测。EPERM 说明进程存在、只是无权操作，
/// 解析仍算成功，权限问题留给真正的信号发送去暴露。
fn resolve(pid: i32) -> Result<Pid, ControlError> {
    // kill(2) 对 0 和负数的语义是进程组 / 广播，这里永远只针对单个进程
    if pid <= 0 {
        return Err(ControlError::NotFound(pid));
    }

    let target = Pid::from_raw(pid);
    match signal::kill(target, None) {
        Ok(()) | Err(Errno::EPERM) => Ok(target),
        Err(errno) => Err(map_send_errno(pid, errno)),
    }
}

fn send_signal(target: Pid, sig: Signal) -> Result<(), ControlError> {
    // 解析和发送之间目标可能刚好退出，此时 ESRCH 映射成 NotFound
    signal::kill(target, sig).map_err(|errno| map_send_errno(target.as_raw(), errno))
}

fn map_send_errno(pid: i32, errno: Errno) -> ControlError {
    match errno {
        Errno::ESRCH => ControlError::NotFound(pid),
        Errno::EPERM => ControlError::PermissionDenied(pid),
        errno => ControlError::Unexpected { pid, errno },
    }
}

fn process_alive(pid: i32) -> bool {
    let sys_pid = SysPid::from_u32(pid as u32);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);

    match sys.process(sys_pid) {
        Some(process) => !matches!(process.status(), ProcessStatus::Zombie),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Child, Command, Stdio};
    use std::sync::Arc;

    fn spawn_sleeper() -> Child {
        Command::new("sleep")
            .arg("60")
            .stdout(Stdio::null())
            .spawn()
            .expect("failed to spawn sleep")
    }

    /// 找一个当前确定没人用的 pid
    fn unused_pid() -> i32 {
        (424242..)
            .find(|&p| signal::kill(Pid::from_raw(p), None) == Err(Errno::ESRCH))
            .unwrap()
    }

    #[test]
    fn errno_mapping_is_exact() {
        assert_eq!(map_send_errno(7, Errno::ESRCH), ControlError::NotFound(7));
        assert_eq!(
            map_send_errno(7, Errno::EPERM),
            ControlError::PermissionDenied(7)
        );
        assert_eq!(
            map_send_errno(7, Errno::EINVAL),
            ControlError::Unexpected {
                pid: 7,
                errno: Errno::EINVAL
            }
        );
    }

    #[test]
    fn group_addressing_pids_are_rejected() {
        let ctl = LifecycleController::new();
        assert_eq!(ctl.suspend(0), Err(ControlError::NotFound(0)));
        assert_eq!(ctl.resume(-1), Err(ControlError::NotFound(-1)));
    }

    #[tokio::test]
    async fn terminate_missing_pid_is_not_found() {
        let ctl = LifecycleController::new();
        let pid = unused_pid();

        assert_eq!(ctl.terminate(pid).await, Err(ControlError::NotFound(pid)));
    }

    #[test]
    fn suspend_missing_pid_is_not_found() {
        let ctl = LifecycleController::new();
        let pid = unused_pid();

        assert_eq!(ctl.suspend(pid), Err(ControlError::NotFound(pid)));
    }

    #[tokio::test]
    async fn terminate_live_process_then_repeat_is_not_found() {
        let mut child = spawn_sleeper();
        let pid = child.id() as i32;
        let ctl = LifecycleController::with_kill_wait(Duration::from_secs(1));

        assert_eq!(ctl.terminate(pid).await, Ok(()));

        // 收尸之后 pid 才真正消失
        child.wait().expect("failed to reap child");
        assert_eq!(ctl.terminate(pid).await, Err(ControlError::NotFound(pid)));
    }

    #[tokio::test]
    async fn kill_wait_timeout_is_still_success() {
        let mut child = spawn_sleeper();
        let pid = child.id() as i32;
        // 零等待窗口：确认不到退出也算成功，信号已经送达
        let ctl = LifecycleController::with_kill_wait(Duration::ZERO);

        assert_eq!(ctl.terminate(pid).await, Ok(()));

        child.wait().expect("failed to reap child");
    }

    #[test]
    fn suspend_then_resume_live_process() {
        let mut child = spawn_sleeper();
        let pid = child.id() as i32;
        let ctl = LifecycleController::new();

        assert_eq!(ctl.suspend(pid), Ok(()));
        assert!(process_alive(pid));
        assert_eq!(ctl.resume(pid), Ok(()));

        child.kill().expect("failed to kill child");
        child.wait().expect("failed to reap child");
    }

    #[tokio::test]
    async fn terminate_init_without_root_is_permission_denied() {
        if nix::unistd::Uid::effective().is_root() {
            // root 可以杀任何进程，这个断言没有意义
            return;
        }
        let ctl = LifecycleController::new();

        assert_eq!(ctl.terminate(1).await, Err(ControlError::PermissionDenied(1)));
        assert!(process_alive(1));
    }

    #[tokio::test]
    async fn concurrent_terminates_never_crash() {
        let mut child = spawn_sleeper();
        let pid = child.id() as i32;
        let ctl = Arc::new(LifecycleController::with_kill_wait(Duration::from_millis(
            200,
        )));

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.terminate(pid).await }
        });
        let second = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.terminate(pid).await }
        });

        for outcome in [first.await.unwrap(), second.await.unwrap()] {
            assert!(matches!(outcome, Ok(()) | Err(ControlError::NotFound(_))));
        }

        child.wait().expect("failed to reap child");
    }
}
