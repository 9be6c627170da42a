//! Range-list canonicalization
//!
//! Range lists are comma-separated numbers and dash ranges such as
//! `2-5,3,7,8,9`. The canonical form merges overlaps and runs:
//! `2-5,7-9`. Segments are kept as intervals, so the cost depends on
//! the number of segments and not on the width of a range.

/// An inclusive `(low, high)` span of members
pub type Span = (u32, u32);

/// Parse a range list into its segments, in input order
pub fn parse(list: &str) -> Result<Vec<Span>, String> {
    let mut spans = Vec::new();
    for segment in list.split(',').map(str::trim) {
        if segment.is_empty() {
            return Err(format!("empty segment in range list '{list}'"));
        }
        let (low, high) = match segment.split_once('-') {
            Some((low, high)) => (parse_bound(low, segment)?, parse_bound(high, segment)?),
            None => {
                let n = parse_bound(segment, segment)?;
                (n, n)
            }
        };
        if low > high {
            return Err(format!("reversed range '{segment}'"));
        }
        spans.push((low, high));
    }
    Ok(spans)
}

fn parse_bound(text: &str, segment: &str) -> Result<u32, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("invalid range segment '{segment}'"))
}

/// Sort spans and join the ones that overlap or touch
pub fn merge(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_unstable();
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for (low, high) in spans {
        match merged.last_mut() {
            Some(last) if low <= last.1.saturating_add(1) => last.1 = last.1.max(high),
            _ => merged.push((low, high)),
        }
    }
    merged
}

/// Render merged spans as a canonical range list
pub fn render(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|&(low, high)| {
            if low == high {
                low.to_string()
            } else {
                format!("{low}-{high}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Canonicalize a range list
pub fn summarize(list: &str) -> Result<String, String> {
    Ok(render(&merge(parse(list)?)))
}
