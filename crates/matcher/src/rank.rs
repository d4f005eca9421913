//! Rounding and ordering shared by both scorers.

/// Round to two decimal places.
///
/// Rounds the exact binary value, so `0.885` (stored as 0.88500000000000000888..)
/// becomes `0.89`, matching decimal rounding of the printed score.
pub fn round_score(score: f64) -> f64 {
    format!("{score:.2}").parse().unwrap_or(score)
}

/// Stable sort by score, descending. Equal scores keep their input order.
pub fn sort_desc_stable<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_score(0.886_363_636), 0.89);
        assert_eq!(round_score(0.883_333), 0.88);
        assert_eq!(round_score(0.736_842_105), 0.74);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.0), 0.0);
    }

    #[test]
    fn rounds_stored_value_not_literal() {
        assert_eq!(round_score(0.885), 0.89);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut rows = vec![("a", 0.5), ("b", 0.9), ("c", 0.5), ("d", 1.0), ("e", 0.9)];
        sort_desc_stable(&mut rows, |row| row.1);
        let ids: Vec<&str> = rows.iter().map(|row| row.0).collect();
        assert_eq!(ids, vec!["d", "b", "e", "a", "c"]);
    }

    #[test]
    fn sort_sees_differences_below_rounding() {
        let mut rows = vec![("low", 0.870), ("high", 0.872)];
        sort_desc_stable(&mut rows, |row| row.1);
        assert_eq!(rows[0].0, "high");
        assert_eq!(round_score(rows[0].1), round_score(rows[1].1));
    }
}
