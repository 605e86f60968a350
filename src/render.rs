//! Deterministic text rendering for the presence widget: the scrolling
//! marquee line and the fixed-layout progress bar/clock.

/// Marquee window capacity in characters. Once the window shrinks to this
/// size it re-seeds from the full string.
pub const AUTOSCROLL_CAP: usize = 24;

/// Number of characters in the progress bar between the two clocks.
const BAR_WIDTH: usize = 19;

/// The mm:ss clock saturates at 99:59 instead of overflowing its field.
const MAX_CLOCK_SECONDS: u64 = 99 * 60 + 59;

/// Advance the marquee by one step and return the next window.
///
/// A window at or below `capacity` re-seeds to `full_text` (this is also the
/// fresh-track case: seed with an empty previous window and the first call
/// returns the full string). A longer window drops its leading character, so
/// the visible line shrinks by one character per tick until the next re-seed.
pub fn render_marquee(full_text: &str, previous_window: &str, capacity: usize) -> String {
    if previous_window.chars().count() <= capacity {
        return full_text.to_string();
    }

    let mut chars = previous_window.chars();
    chars.next();
    chars.as_str().to_string()
}

/// Render `MM:SS <bar> MM:SS` with exact character positions: a 5-char
/// elapsed clock, a 19-char bar of dashes with one `o` marker, and a 5-char
/// total clock, space-separated (31 characters in all).
///
/// An unresolved track has `total_seconds == 0`; the marker is parked at the
/// leftmost position instead of dividing by zero.
pub fn render_progress_bar(elapsed_seconds: u64, total_seconds: u64) -> String {
    let marker = if total_seconds == 0 {
        0
    } else {
        let fraction = elapsed_seconds as f64 / total_seconds as f64;
        ((BAR_WIDTH as f64 * fraction) as usize).min(BAR_WIDTH - 1)
    };

    let mut bar = String::with_capacity(BAR_WIDTH);
    for position in 0..BAR_WIDTH {
        bar.push(if position == marker { 'o' } else { '-' });
    }

    format!(
        "{} {} {}",
        format_clock(elapsed_seconds),
        bar,
        format_clock(total_seconds)
    )
}

/// Zero-padded `MM:SS`, saturating at 99:59.
fn format_clock(total_seconds: u64) -> String {
    let clamped = total_seconds.min(MAX_CLOCK_SECONDS);
    format!("{:02}:{:02}", clamped / 60, clamped % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marquee_seeds_fresh_track_with_full_text() {
        let full = "Song X - Artist Y - ";
        assert_eq!(render_marquee(full, "", AUTOSCROLL_CAP), full);
    }

    #[test]
    fn marquee_shrinks_one_char_per_tick() {
        let full = "A very long song title - Some Artist - Some Album";
        let mut window = render_marquee(full, "", AUTOSCROLL_CAP);
        assert_eq!(window, full);

        window = render_marquee(full, &window, AUTOSCROLL_CAP);
        assert_eq!(window, &full[1..]);

        window = render_marquee(full, &window, AUTOSCROLL_CAP);
        assert_eq!(window, &full[2..]);
    }

    #[test]
    fn marquee_reseeds_once_window_reaches_cap() {
        let full = "A very long song title - Some Artist - Some Album";
        let mut window = full.to_string();
        while window.chars().count() > AUTOSCROLL_CAP {
            window = render_marquee(full, &window, AUTOSCROLL_CAP);
        }
        assert_eq!(window.chars().count(), AUTOSCROLL_CAP);

        // Next step wraps back to the full string.
        window = render_marquee(full, &window, AUTOSCROLL_CAP);
        assert_eq!(window, full);
    }

    #[test]
    fn marquee_short_text_stays_put() {
        let full = "Short - One - ";
        let window = render_marquee(full, full, AUTOSCROLL_CAP);
        assert_eq!(window, full);
    }

    #[test]
    fn marquee_is_char_boundary_safe() {
        let full = "Thérèse - Mylène Farmer - Très long titre d'album";
        let window = render_marquee(full, full, AUTOSCROLL_CAP);
        assert_eq!(window.chars().count(), full.chars().count() - 1);
        assert!(window.starts_with("hérèse"));
    }

    #[test]
    fn progress_bar_layout_is_exact() {
        let line = render_progress_bar(0, 200);
        assert_eq!(line, "00:00 o------------------ 03:20");
        assert_eq!(line.len(), 31);
    }

    #[test]
    fn progress_bar_marker_moves_proportionally() {
        // 100/200 = 0.5 -> floor(19 * 0.5) = 9
        let line = render_progress_bar(100, 200);
        assert_eq!(line, "01:40 ---------o--------- 03:20");
    }

    #[test]
    fn progress_bar_marker_clamps_at_right_edge() {
        let line = render_progress_bar(200, 200);
        assert_eq!(line, "03:20 ------------------o 03:20");
    }

    #[test]
    fn progress_bar_zero_total_parks_marker_left() {
        let line = render_progress_bar(17, 0);
        assert_eq!(line, "00:17 o------------------ 00:00");
    }

    #[test]
    fn clock_saturates_at_99_minutes() {
        assert_eq!(format_clock(100 * 60), "99:59");
        assert_eq!(format_clock(99 * 60 + 59), "99:59");
        assert_eq!(format_clock(9), "00:09");
    }
}
