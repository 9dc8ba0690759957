//Arithmetic mean of the present values, rounded to two decimals. None if no value is present.
pub fn mean_of_present(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(round_to(sum / count as f64, 2))
    }
}

//halves go to the even neighbour
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_missing_values() {
        let mean = mean_of_present(vec![Some(70.0), None, Some(72.0), None]);
        assert_eq!(mean, Some(71.0));
    }

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert_eq!(mean_of_present(vec![None, None]), None);
        assert_eq!(mean_of_present(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        let mean = mean_of_present(vec![Some(70.0), Some(70.0), Some(71.0)]);
        assert_eq!(mean, Some(70.33));
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(mean_of_present(vec![Some(70.0), Some(70.25)]), Some(70.12));
        assert_eq!(mean_of_present(vec![Some(70.0), Some(70.75)]), Some(70.38));
    }

    #[test]
    fn mean_ignores_nan() {
        assert_eq!(mean_of_present(vec![Some(f64::NAN), Some(68.0)]), Some(68.0));
    }
}
