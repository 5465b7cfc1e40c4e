pub struct Math {}

impl Math {
    pub fn round_float_to_n_decimals(number: f64, decimals: i32) -> f64 {
        let multiplier = 10.0_f64.powi(decimals);
        (number * multiplier).round() / multiplier
    }

    pub fn mean(nums: &[f64]) -> f64 {
        let sum: f64 = nums.iter().sum();
        let len = nums.len() as f64;
        sum / len
    }
}
