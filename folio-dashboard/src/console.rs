//! Deployment console animator
//!
//! Replays a fixed script one line per tick, each line stamped with the time
//! it is emitted. Once the whole script is shown, the next tick clears the
//! console and the replay starts over. The console never holds more lines
//! than the script has.

use crate::state::{new_state, Shared};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_SCRIPT: &[&str] = &[
    "[JENKINS] Triggering Pipeline: Portfolio-CI...",
    "[AWS] Checking EC2 Resources (t2.micro)...",
    "[LINUX] Swap Memory Status: 2GB Available (OK)",
    "[DOCKER] Building image: node:20-alpine...",
    "[BUILD] Next.js Standalone Output generated",
    "[DOCKER] Stopping old container...",
    "[DOCKER] Starting new container on Port 3000...",
    "[NGINX] Reloading Proxy Configuration...",
    "[SUCCESS] 🚀 Application Live on AWS EC2",
];

pub fn default_script() -> Vec<String> {
    DEFAULT_SCRIPT.iter().map(|line| line.to_string()).collect()
}

/// `> HH:MM:SS <line>` using the emission time
pub fn stamp_line(now: DateTime<Utc>, line: &str) -> String {
    format!("> {} {}", now.format("%H:%M:%S"), line)
}

/// Fixed-height window that follows the newest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleViewport {
    height: usize,
    scroll_top: usize,
}

impl ConsoleViewport {
    pub fn new(height: usize) -> Self {
        Self { height: height.max(1), scroll_top: 0 }
    }

    pub fn scroll_to_bottom(&mut self, line_count: usize) {
        self.scroll_top = line_count.saturating_sub(self.height);
    }

    #[cfg(test)]
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn window<'a>(&self, lines: &'a [String]) -> &'a [String] {
        let start = self.scroll_top.min(lines.len());
        let end = (start + self.height).min(lines.len());
        &lines[start..end]
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTick {
    Appended,
    Reset,
}

#[derive(Debug, Clone)]
pub struct ConsoleState {
    script: Vec<String>,
    cursor: usize,
    lines: Vec<String>,
    viewport: ConsoleViewport,
}

impl ConsoleState {
    pub fn new(script: Vec<String>, viewport_height: usize) -> Self {
        let capacity = script.len();
        Self {
            script,
            cursor: 0,
            lines: Vec::with_capacity(capacity),
            viewport: ConsoleViewport::new(viewport_height),
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> ConsoleTick {
        match self.script.get(self.cursor) {
            Some(line) => {
                self.lines.push(stamp_line(now, line));
                self.cursor += 1;
                self.viewport.scroll_to_bottom(self.lines.len());
                ConsoleTick::Appended
            }
            None => {
                self.lines.clear();
                self.cursor = 0;
                self.viewport.scroll_to_bottom(0);
                ConsoleTick::Reset
            }
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn visible(&self) -> &[String] {
        self.viewport.window(&self.lines)
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn viewport(&self) -> ConsoleViewport {
        self.viewport
    }
}

struct AnimatorShared {
    console: ConsoleState,
    stopped: bool,
}

/// Timer task driving a [`ConsoleState`]; the first line appears one period after start
pub struct LogAnimator {
    shared: Shared<AnimatorShared>,
    task: Option<JoinHandle<()>>,
}

impl LogAnimator {
    pub fn start(script: Vec<String>, period: Duration, viewport_height: usize) -> Self {
        let shared = new_state(AnimatorShared {
            console: ConsoleState::new(script, viewport_height),
            stopped: false,
        });

        let tick_state = shared.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let mut st = tick_state.lock();
                if st.stopped {
                    break;
                }
                if st.console.tick(Utc::now()) == ConsoleTick::Reset {
                    debug!("console script finished, replaying");
                }
            }
        });

        info!(period_secs = period.as_secs_f64(), "log animator started");
        Self { shared, task: Some(task) }
    }

    /// Copy of the console state for rendering
    pub fn snapshot(&self) -> ConsoleState {
        self.shared.lock().console.clone()
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Release the timer; a tick already scheduled will not append. Idempotent.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else { return };
        self.shared.lock().stopped = true;
        task.abort();
        info!("log animator stopped");
    }
}

impl Drop for LogAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::time::sleep;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    fn script(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("[STEP] {i}")).collect()
    }

    #[test]
    fn test_stamp_uses_emission_time() {
        assert_eq!(stamp_line(at(9, 5, 7), "[AWS] hello"), "> 09:05:07 [AWS] hello");
    }

    #[test]
    fn test_replays_in_order_then_resets() {
        let len = DEFAULT_SCRIPT.len();
        let mut console = ConsoleState::new(default_script(), 4);

        for i in 0..len {
            assert_eq!(console.tick(at(12, 0, i as u32)), ConsoleTick::Appended);
            assert_eq!(console.lines().len(), i + 1);
        }
        assert_eq!(console.lines()[0], format!("> 12:00:00 {}", DEFAULT_SCRIPT[0]));
        assert_eq!(console.lines()[len - 1], format!("> 12:00:08 {}", DEFAULT_SCRIPT[len - 1]));

        // tick L+1 clears
        assert_eq!(console.tick(at(12, 0, 9)), ConsoleTick::Reset);
        assert!(console.lines().is_empty());
        assert_eq!(console.cursor(), 0);

        // and the loop starts over with a fresh timestamp
        console.tick(at(12, 1, 0));
        assert_eq!(console.lines(), [format!("> 12:01:00 {}", DEFAULT_SCRIPT[0])]);
    }

    #[test]
    fn test_viewport_follows_newest_line() {
        let mut console = ConsoleState::new(script(5), 3);
        for _ in 0..2 {
            console.tick(at(0, 0, 0));
        }
        assert_eq!(console.viewport().scroll_top(), 0);
        assert_eq!(console.visible().len(), 2);

        for _ in 0..3 {
            console.tick(at(0, 0, 0));
        }
        assert_eq!(console.viewport().scroll_top(), 2);
        let visible = console.visible();
        assert_eq!(visible.len(), 3);
        assert!(visible[2].ends_with("[STEP] 5"));

        console.tick(at(0, 0, 0));
        assert_eq!(console.viewport().scroll_top(), 0);
        assert!(console.visible().is_empty());
    }

    #[test]
    fn test_empty_script_stays_empty() {
        let mut console = ConsoleState::new(Vec::new(), 3);
        assert_eq!(console.tick(at(0, 0, 0)), ConsoleTick::Reset);
        assert!(console.lines().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_animator_timing_and_loop() {
        let period = Duration::from_secs(2);
        let animator = LogAnimator::start(script(3), period, 6);

        sleep(Duration::from_millis(1_900)).await;
        assert!(animator.snapshot().lines().is_empty());

        sleep(Duration::from_millis(200)).await; // t=2.1
        assert_eq!(animator.snapshot().lines().len(), 1);

        sleep(Duration::from_secs(4)).await; // t=6.1
        assert_eq!(animator.snapshot().lines().len(), 3);

        sleep(Duration::from_secs(2)).await; // t=8.1, reset
        assert!(animator.snapshot().lines().is_empty());

        sleep(Duration::from_secs(2)).await; // t=10.1
        assert_eq!(animator.snapshot().lines().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_console() {
        let mut animator = LogAnimator::start(script(5), Duration::from_secs(2), 6);

        sleep(Duration::from_millis(4_100)).await;
        let before = animator.snapshot();
        assert_eq!(before.lines().len(), 2);

        animator.stop();
        assert!(!animator.is_running());
        sleep(Duration::from_secs(60)).await;

        let after = animator.snapshot();
        assert_eq!(after.lines(), before.lines());
        assert_eq!(after.cursor(), 2);
    }
}
