//! Text rendering of the dashboard frame

use crate::state::PollerPhase;
use crate::view::Frame;
use std::fmt::Write;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

struct MetricCard<'a> {
    label: &'a str,
    value: String,
    unit: &'a str,
}

pub fn render_frame(frame: &Frame) -> String {
    let metrics = &frame.poller.metrics;
    let mut out = String::new();

    let live = match frame.poller.phase {
        PollerPhase::Live => "●",
        PollerPhase::Idle => "○",
        PollerPhase::Stopped => "■",
    };
    // writing to a String cannot fail
    let _ = writeln!(out, "{live} LIVE METRICS ({})", metrics.region);
    let _ = writeln!(out);

    let cards = [
        MetricCard { label: "Avg CPU Load", value: format!("{}%", metrics.cpu), unit: "vCPU" },
        MetricCard { label: "Memory Usage", value: metrics.mem.to_string(), unit: "MB" },
        MetricCard { label: "Container Uptime", value: metrics.uptime.to_string(), unit: "sec" },
    ];
    for card in &cards {
        let _ = writeln!(out, "  {:<18} {:>8} {}", card.label.to_uppercase(), card.value, card.unit);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "┌─ jenkins-console-output");
    for line in &frame.console {
        let _ = writeln!(out, "│ {line}");
    }
    let _ = writeln!(out, "│ _");
    let _ = writeln!(out, "└─");
    out
}

/// Frame prefixed with the ANSI sequence that clears the terminal
pub fn render_screen(frame: &Frame) -> String {
    format!("{CLEAR_SCREEN}{}", render_frame(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollerStatus;
    use crate::state::DisplayMetrics;

    #[test]
    fn test_initial_frame_placeholders() {
        let frame = Frame { poller: PollerStatus::default(), console: Vec::new() };
        let text = render_frame(&frame);
        assert!(text.starts_with("○ LIVE METRICS (...)"));
        assert!(text.contains("AVG CPU LOAD"));
        assert!(text.contains("0% vCPU"));
        assert!(text.contains("jenkins-console-output"));
        assert!(text.contains("│ _"));
    }

    #[test]
    fn test_live_frame_values() {
        let frame = Frame {
            poller: PollerStatus {
                metrics: DisplayMetrics { cpu: 11, mem: 87, uptime: 3600, region: "iad1".into() },
                phase: PollerPhase::Live,
                successes: 4,
                failures: 1,
            },
            console: vec!["> 10:00:00 [AWS] Checking".into()],
        };
        let text = render_frame(&frame);
        assert!(text.starts_with("● LIVE METRICS (iad1)"));
        assert!(text.contains("11% vCPU"));
        assert!(text.contains("87 MB"));
        assert!(text.contains("3600 sec"));
        assert!(text.contains("│ > 10:00:00 [AWS] Checking"));

        assert!(render_screen(&frame).starts_with(CLEAR_SCREEN));
    }
}
