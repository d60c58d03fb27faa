/// Geometric mean of likes and views. Zero when either counter is zero.
pub fn combined_score(likes: u64, views: u64) -> f64 {
	(likes as f64 * views as f64).sqrt()
}
