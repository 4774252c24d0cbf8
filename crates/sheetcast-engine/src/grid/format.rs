/// Format a number the way it is written into a table.
///
/// Integral values drop the fractional part (`5`, not `5.0`); everything else
/// uses the shortest representation that parses back to the same value.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        // Covers -0.0, which would otherwise print as "-0".
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
