/// Format a number for display: always one decimal place.
pub fn format_number(n: f64) -> String {
    format!("{:.1}", n)
}
