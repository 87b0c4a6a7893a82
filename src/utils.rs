// Utility functions
use rand::Rng;
use std::time::Duration;

/// Pulls the short product code out of the `/dp/<code>` segment of a url.
pub fn product_id_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/dp/")?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();
    (!id.is_empty()).then_some(id)
}

/// Display name used when a page carries no product title.
pub fn placeholder_name(product_id: &str) -> String {
    format!("Product {product_id}")
}

/// Uniform random delay in `[min_seconds, max_seconds]`.
pub fn uniform_delay(min_seconds: f64, max_seconds: f64) -> Duration {
    if max_seconds <= min_seconds {
        return Duration::from_secs_f64(min_seconds.max(0.0));
    }
    Duration::from_secs_f64(rand::rng().random_range(min_seconds..=max_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_parsed_from_dp_segment() {
        assert_eq!(
            product_id_from_url("https://www.amazon.com/Some-Widget/dp/B08N5WRWNW?th=1"),
            Some("B08N5WRWNW".to_string())
        );
        assert_eq!(
            product_id_from_url("https://www.amazon.com/dp/B000AAA111/ref=sr_1_1"),
            Some("B000AAA111".to_string())
        );
    }

    #[test]
    fn urls_without_product_code_are_rejected() {
        assert_eq!(product_id_from_url("https://www.amazon.com/gp/bestsellers"), None);
        assert_eq!(product_id_from_url("https://www.amazon.com/dp/"), None);
        assert_eq!(product_id_from_url("https://www.amazon.com/dp/lowercase"), None);
    }

    #[test]
    fn placeholder_name_embeds_id() {
        assert_eq!(placeholder_name("B08N5WRWNW"), "Product B08N5WRWNW");
    }

    #[test]
    fn degenerate_delay_range_collapses_to_min() {
        assert_eq!(uniform_delay(0.0, 0.0), Duration::ZERO);
        assert_eq!(uniform_delay(2.0, 1.0), Duration::from_secs(2));
    }

    #[test]
    fn delay_stays_inside_range() {
        for _ in 0..32 {
            let d = uniform_delay(5.0, 10.0);
            assert!(d >= Duration::from_secs(5) && d <= Duration::from_secs(10));
        }
    }
}
