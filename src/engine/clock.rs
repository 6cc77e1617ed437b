// ==========================================
// NCR 质量系统 - 可注入时钟
// ==========================================
// 职责: 抽象模拟延迟（提交处理/分析耗时）
// 实现: TokioClock 使用真实定时器；ManualClock 由测试手动推进
// ==========================================

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

/// 时钟 Trait
///
/// 控制器只通过该 trait 等待，测试注入 ManualClock 即可确定性地控制完成顺序
#[async_trait]
pub trait Clock: Send + Sync {
    /// 等待指定时长
    async fn sleep(&self, duration: Duration);
}

// ==========================================
// TokioClock - 真实时钟
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ==========================================
// ManualClock - 手动时钟
// ==========================================

struct Sleeper {
    seq: u64,
    deadline: Duration,
    tx: oneshot::Sender<()>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    sleepers: Vec<Sleeper>,
}

impl ManualState {
    /// 移除已被丢弃的等待者（sleep future 被 drop 或任务被 abort）
    fn prune(&mut self) {
        self.sleepers.retain(|s| !s.tx.is_closed());
    }
}

/// 手动推进的时钟
///
/// - `advance(d)`: 时间前进 d，唤醒所有到期的等待者（按到期时间、注册顺序）
/// - `release_newest()`: 不推进时间，直接唤醒最近注册的等待者
///
/// 零时长的 sleep 立即返回。
#[derive(Default)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(&self) -> MutexGuard<'_, ManualState> {
        let mut state = self.lock();
        state.prune();
        state
    }

    /// 当前挂起的等待者数量
    pub fn pending(&self) -> usize {
        self.live().sleepers.len()
    }

    /// 已推进的总时长
    pub fn elapsed(&self) -> Duration {
        self.lock().now
    }

    /// 推进时间
    ///
    /// # 返回
    /// 本次唤醒的等待者数量
    pub fn advance(&self, duration: Duration) -> usize {
        let mut due = {
            let mut state = self.live();
            state.now += duration;
            let now = state.now;
            let (due, waiting): (Vec<_>, Vec<_>) = state
                .sleepers
                .drain(..)
                .partition(|s| s.deadline <= now);
            state.sleepers = waiting;
            due
        };

        due.sort_by_key(|s| (s.deadline, s.seq));
        let fired = due.len();
        for sleeper in due {
            let _ = sleeper.tx.send(());
        }
        fired
    }

    /// 唤醒最近注册的等待者
    pub fn release_newest(&self) -> bool {
        let newest = {
            let mut state = self.live();
            let idx = state
                .sleepers
                .iter()
                .enumerate()
                .max_by_key(|(_, s)| s.seq)
                .map(|(i, _)| i);
            idx.map(|i| state.sleepers.remove(i))
        };

        match newest {
            Some(sleeper) => {
                let _ = sleeper.tx.send(());
                true
            }
            None => false,
        }
    }

    /// 等待直到至少有 n 个挂起的等待者（测试辅助）
    pub async fn wait_for_pending(&self, n: usize) {
        while self.pending() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        let rx = {
            let mut state = self.lock();
            let (tx, rx) = oneshot::channel();
            let seq = state.next_seq;
            state.next_seq += 1;
            let deadline = state.now + duration;
            state.sleepers.push(Sleeper { seq, deadline, tx });
            rx
        };

        // 时钟被释放时发送端随之丢弃，直接返回
        let _ = rx.await;
    }
}
