//! Star-rating widget state: hover previews a score, click commits it,
//! leaving the widget reverts the display to the committed score.

pub const STAR_COUNT: u8 = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    committed: u8,
    hovered: Option<u8>,
}

impl StarRating {
    pub fn with_committed(score: u8) -> Self {
        Self {
            committed: score.min(STAR_COUNT),
            hovered: None,
        }
    }

    pub fn hover(&mut self, score: u8) {
        self.hovered = Some(score.clamp(1, STAR_COUNT));
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn commit(&mut self, score: u8) {
        self.committed = score.clamp(1, STAR_COUNT);
        self.hovered = None;
    }

    /// Score currently shown: the hover preview when present, otherwise the
    /// committed score.
    pub fn displayed(&self) -> u8 {
        self.hovered.unwrap_or(self.committed)
    }

    pub fn committed(&self) -> u8 {
        self.committed
    }

    /// Whether the 1-based `star` renders filled.
    pub fn is_filled(&self, star: u8) -> bool {
        star <= self.displayed()
    }
}

/// Average-rating display text: one decimal, trailing `.0` dropped, so
/// `4.5` renders as "4.5" and `4.0` as "4".
pub fn format_average(average: f64) -> String {
    let text = format!("{average:.1}");
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_previews_without_committing() {
        let mut rating = StarRating::with_committed(2);
        rating.hover(4);
        assert_eq!(rating.displayed(), 4);
        assert_eq!(rating.committed(), 2);
    }

    #[test]
    fn leave_reverts_to_committed() {
        let mut rating = StarRating::with_committed(2);
        rating.hover(5);
        rating.leave();
        assert_eq!(rating.displayed(), 2);
    }

    #[test]
    fn click_commits_the_hovered_score() {
        let mut rating = StarRating::default();
        rating.hover(3);
        rating.commit(3);
        rating.leave();
        assert_eq!(rating.committed(), 3);
        assert_eq!(rating.displayed(), 3);
    }

    #[test]
    fn scores_clamp_to_the_star_count() {
        let mut rating = StarRating::default();
        rating.commit(9);
        assert_eq!(rating.committed(), 5);
        rating.hover(0);
        assert_eq!(rating.displayed(), 1);
    }

    #[test]
    fn fill_tracks_the_displayed_score() {
        let mut rating = StarRating::with_committed(3);
        assert!(rating.is_filled(3));
        assert!(!rating.is_filled(4));
        rating.hover(5);
        assert!(rating.is_filled(5));
    }

    #[test]
    fn average_text_drops_trailing_zero() {
        assert_eq!(format_average(4.5), "4.5");
        assert_eq!(format_average(4.0), "4");
        assert_eq!(format_average(0.0), "0");
        assert_eq!(format_average(3.7), "3.7");
    }
}
