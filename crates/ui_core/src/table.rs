//! Client-side table sorting. One column is sorted at a time; clicking the
//! active column flips direction, clicking a new column starts ascending.
//! Values compare locale-aware and numeric-first, so "2" orders before "10".

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<K> {
    active: Option<(K, SortDirection)>,
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a header click and returns the direction to sort by.
    pub fn click(&mut self, column: K) -> SortDirection {
        let direction = match self.active {
            Some((active, SortDirection::Ascending)) if active == column => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.active = Some((column, direction));
        direction
    }

    pub fn direction_of(&self, column: K) -> Option<SortDirection> {
        match self.active {
            Some((active, direction)) if active == column => Some(direction),
            _ => None,
        }
    }

    pub fn active(&self) -> Option<(K, SortDirection)> {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Locale-aware, numeric-first comparison: digit runs compare as numbers,
/// everything else compares case-insensitively.
pub fn compare_sort_values(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(lc), Some(rc)) => {
                if lc.is_ascii_digit() && rc.is_ascii_digit() {
                    let ln = take_number(&mut left);
                    let rn = take_number(&mut right);
                    match ln.cmp(&rn) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                } else {
                    let lf = lc.to_lowercase().next().unwrap_or(lc);
                    let rf = rc.to_lowercase().next().unwrap_or(rc);
                    match lf.cmp(&rf) {
                        Ordering::Equal => {
                            left.next();
                            right.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u128 {
    let mut value: u128 = 0;
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_add((c as u8 - b'0') as u128);
        chars.next();
    }
    value
}

/// Reorders rows in place by each row's sort value. The sort is stable, so
/// equal values keep their relative order across direction flips.
pub fn sort_rows<T>(rows: &mut [T], direction: SortDirection, value_of: impl Fn(&T) -> String) {
    rows.sort_by(|a, b| {
        let ordering = compare_sort_values(&value_of(a), &value_of(b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Column {
        Title,
        Size,
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        assert_eq!(compare_sort_values("2", "10"), Ordering::Less);
        assert_eq!(compare_sort_values("chapter 2", "chapter 10"), Ordering::Less);
        assert_eq!(compare_sort_values("100", "99"), Ordering::Greater);
    }

    #[test]
    fn text_compares_case_insensitively() {
        assert_eq!(compare_sort_values("Apple", "apple"), Ordering::Equal);
        assert_eq!(compare_sort_values("Apple", "banana"), Ordering::Less);
        assert_eq!(compare_sort_values("zebra", "Apple"), Ordering::Greater);
    }

    #[test]
    fn mixed_runs_compare_chunk_by_chunk() {
        assert_eq!(compare_sort_values("note2.pdf", "note10.pdf"), Ordering::Less);
        assert_eq!(compare_sort_values("sem1-math", "sem1-physics"), Ordering::Less);
    }

    #[test]
    fn clicking_the_same_column_toggles_direction() {
        let mut state = SortState::new();
        assert_eq!(state.click(Column::Title), SortDirection::Ascending);
        assert_eq!(state.click(Column::Title), SortDirection::Descending);
        assert_eq!(state.click(Column::Title), SortDirection::Ascending);
    }

    #[test]
    fn switching_columns_starts_ascending() {
        let mut state = SortState::new();
        state.click(Column::Title);
        state.click(Column::Title);
        assert_eq!(state.click(Column::Size), SortDirection::Ascending);
        assert_eq!(state.direction_of(Column::Title), None);
    }

    #[test]
    fn third_click_inverts_the_second_clicks_order() {
        let mut rows = vec!["b", "a", "c"];
        let mut state = SortState::new();

        let first = state.click(Column::Title);
        sort_rows(&mut rows, first, |r| r.to_string());
        assert_eq!(rows, vec!["a", "b", "c"]);

        let second = state.click(Column::Title);
        sort_rows(&mut rows, second, |r| r.to_string());
        let second_order = rows.clone();

        let third = state.click(Column::Title);
        sort_rows(&mut rows, third, |r| r.to_string());
        let inverse: Vec<_> = second_order.into_iter().rev().collect();
        assert_eq!(rows, inverse);
    }

    #[test]
    fn sort_is_stable_for_equal_values() {
        let mut rows = vec![("a", 1), ("b", 0), ("a", 2)];
        sort_rows(&mut rows, SortDirection::Ascending, |r| r.0.to_string());
        assert_eq!(rows, vec![("a", 1), ("a", 2), ("b", 0)]);
    }
}
