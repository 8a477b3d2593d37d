//! Compact rendering of sorted test numbers, e.g. `2, 4-5`.

/// Render strictly increasing numbers as comma-separated runs.
///
/// Runs of consecutive numbers become `first-last`, singletons stay as-is.
/// Input is consumed lazily; only the rendered runs are held in memory.
pub fn format_ranges(nums: impl IntoIterator<Item = u32>) -> String {
    let mut parts = Vec::new();
    let mut iter = nums.into_iter();
    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;

    for num in iter {
        if end.checked_add(1) == Some(num) {
            end = num;
            continue;
        }
        parts.push(render_run(start, end));
        start = num;
        end = num;
    }
    parts.push(render_run(start, end));

    parts.join(", ")
}

fn render_run(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(rendered: &str) -> Vec<u32> {
        if rendered.is_empty() {
            return Vec::new();
        }
        rendered
            .split(", ")
            .flat_map(|part| match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo: u32 = lo.parse().expect("range start");
                    let hi: u32 = hi.parse().expect("range end");
                    (lo..=hi).collect::<Vec<_>>()
                }
                None => vec![part.parse().expect("single number")],
            })
            .collect()
    }

    #[test]
    fn renders_single_number() {
        assert_eq!(format_ranges([2]), "2");
    }

    #[test]
    fn renders_single_run() {
        assert_eq!(format_ranges([2, 3, 4, 5]), "2-5");
    }

    #[test]
    fn renders_mixed_runs() {
        assert_eq!(format_ranges([2, 4, 5]), "2, 4-5");
        assert_eq!(format_ranges([1, 3, 5, 6, 7, 10]), "1, 3, 5-7, 10");
    }

    #[test]
    fn renders_empty_input() {
        assert_eq!(format_ranges(std::iter::empty()), "");
    }

    #[test]
    fn handles_top_of_range() {
        let top = u32::MAX;
        assert_eq!(format_ranges([top - 1, top]), format!("{}-{}", top - 1, top));
    }

    #[test]
    fn rendering_reparses_to_same_set() {
        let cases: Vec<Vec<u32>> = vec![
            vec![1],
            vec![1, 2],
            vec![1, 3],
            vec![2, 4, 5],
            vec![1, 2, 3, 7, 9, 10, 11, 20],
            (1..=50).filter(|n| n % 3 != 0).collect(),
        ];
        for nums in cases {
            assert_eq!(expand(&format_ranges(nums.iter().copied())), nums);
        }
    }
}
