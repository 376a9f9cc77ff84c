//! Animated count-up for the summary-stat labels, driven one frame at a
//! time on an `indicatif` line. Quartic ease-out: fast start, slow settle.

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{interval, Instant};

const FRAME: Duration = Duration::from_millis(16);

pub fn ease_out_quart(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(4)
}

/// Displayed value at `elapsed` into the animation. Progress is clamped to
/// 1, so once the duration has passed this returns `final_value` exactly.
pub fn value_at(final_value: f64, elapsed: Duration, duration: Duration) -> f64 {
    let p = if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
    };
    final_value * ease_out_quart(p)
}

/// Two-decimal fixed display, used when the caller has no formatter.
pub fn default_format(value: f64) -> String {
    format!("{:.2}", value)
}

/// One animator per stat label. The generation counter keeps overlapping
/// invocations from interleaving: a newer `animate` call wins and stale
/// frames stop scheduling.
pub struct NumberAnimator {
    generation: AtomicU64,
}

impl NumberAnimator {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
        }
    }

    pub async fn animate<F>(
        &self,
        bar: &ProgressBar,
        label: &str,
        final_value: f64,
        duration: Duration,
        formatter: F,
    ) where
        F: Fn(f64) -> String,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();
        let mut frames = interval(FRAME);

        loop {
            frames.tick().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            let elapsed = start.elapsed();
            let done = elapsed >= duration;
            // The last frame lands on p == 1 exactly, never just close to it.
            let value = if done {
                final_value
            } else {
                value_at(final_value, elapsed, duration)
            };
            bar.set_message(format!("{}: {}", label, formatter(value)));
            if done {
                return;
            }
        }
    }
}

impl Default for NumberAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easing_endpoints_are_exact() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
    }

    #[test]
    fn easing_front_loads_progress() {
        // Quartic ease-out covers most of the distance in the first half.
        assert!(ease_out_quart(0.5) > 0.9);
        assert_relative_eq!(ease_out_quart(0.5), 1.0 - 0.0625);
    }

    #[test]
    fn value_settles_on_the_target_exactly() {
        let duration = Duration::from_millis(800);
        assert_eq!(value_at(42.0, duration, duration), 42.0);
        assert_eq!(value_at(42.0, Duration::from_secs(5), duration), 42.0);
        assert_eq!(value_at(42.0, Duration::ZERO, duration), 0.0);
    }

    #[test]
    fn value_grows_monotonically() {
        let duration = Duration::from_millis(800);
        let mut last = -1.0;
        for ms in (0..=800).step_by(50) {
            let v = value_at(42.0, Duration::from_millis(ms), duration);
            assert!(v >= last);
            last = v;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn final_frame_shows_the_formatted_target() {
        let animator = NumberAnimator::new();
        let bar = ProgressBar::hidden();
        animator
            .animate(&bar, "Average", 42.0, Duration::from_millis(800), |v| {
                format!("{:.1}%", v)
            })
            .await;
        assert_eq!(bar.message(), "Average: 42.0%");
    }

    #[tokio::test(start_paused = true)]
    async fn default_formatter_is_two_decimal_fixed() {
        let animator = NumberAnimator::new();
        let bar = ProgressBar::hidden();
        animator
            .animate(&bar, "Counties", 3142.0, Duration::from_millis(100), default_format)
            .await;
        assert_eq!(bar.message(), "Counties: 3142.00");
    }

    #[tokio::test(start_paused = true)]
    async fn a_newer_animation_supersedes_an_older_one() {
        let animator = NumberAnimator::new();
        let bar = ProgressBar::hidden();
        tokio::join!(
            animator.animate(&bar, "Stat", 10.0, Duration::from_millis(400), default_format),
            animator.animate(&bar, "Stat", 20.0, Duration::from_millis(400), default_format),
        );
        assert_eq!(bar.message(), "Stat: 20.00");
    }
}
