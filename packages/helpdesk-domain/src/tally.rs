/// Running success statistics of one solution.
///
/// `success_rate` is the exact arithmetic mean of every recorded outcome, recomputed from the
/// previous mean and count on each update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessTally {
	pub success_rate: f64,
	pub usage_count: i64,
}
impl SuccessTally {
	pub const fn new(success_rate: f64, usage_count: i64) -> Self {
		Self { success_rate, usage_count }
	}

	pub fn record(self, was_successful: bool) -> Self {
		let previous = self.usage_count.max(0);
		let usage_count = previous + 1;
		let outcome = if was_successful { 1.0 } else { 0.0 };
		let success_rate =
			(self.success_rate * previous as f64 + outcome) / usage_count as f64;

		Self { success_rate: success_rate.clamp(0.0, 1.0), usage_count }
	}
}
impl Default for SuccessTally {
	fn default() -> Self {
		Self::new(0.0, 0)
	}
}
