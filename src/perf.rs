use once_cell::sync::Lazy;
use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 性能日志开关
///
/// - Debug 默认开启；Release 默认关闭
/// - `GARMENT_WIP_PERF=1` 强制开启, `GARMENT_WIP_PERF=0` 强制关闭
static PERF_ENABLED: Lazy<bool> = Lazy::new(|| match std::env::var("GARMENT_WIP_PERF") {
    Ok(v) => is_true(&v),
    Err(_) => cfg!(debug_assertions),
});

/// 慢操作阈值（毫秒）, `GARMENT_WIP_SLOW_OP_MS=50` 覆写
static SLOW_OP_THRESHOLD_MS: Lazy<u64> = Lazy::new(|| {
    std::env::var("GARMENT_WIP_SLOW_OP_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
});

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度, 超过阈值时输出慢操作告警
///
/// 使用方式：
/// ```ignore
/// let _perf = garment_wip::perf::PerfGuard::new("wip_import");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        if *PERF_ENABLED {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                depth = self.depth,
                "done"
            );
        }

        let threshold = *SLOW_OP_THRESHOLD_MS;
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "slow_op",
                op = self.op,
                elapsed_ms,
                threshold_ms = threshold,
                "slow operation"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
