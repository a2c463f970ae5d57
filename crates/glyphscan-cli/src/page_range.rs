/// Parse a page list like "1,3-5" into sorted, deduplicated 1-based page numbers.
///
/// Every page must lie in `1..=page_count`. Empty items are ignored.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<u32>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (page_number(a, page_count)?, page_number(b, page_count)?),
            None => {
                let page = page_number(part, page_count)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("descending range: '{part}'"));
        }
        pages.extend(start..=end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<u32, String> {
    let text = text.trim();
    let page: u32 = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page as usize > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("1", 5).unwrap(), vec![1]);
        assert_eq!(parse_page_range("3", 5).unwrap(), vec![3]);
    }

    #[test]
    fn ranges_and_lists() {
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_page_range("5, 1,3-4", 5).unwrap(), vec![1, 3, 4, 5]);
    }

    #[test]
    fn duplicates_removed() {
        assert_eq!(parse_page_range("1-3,2,3", 5).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn trailing_comma_ignored() {
        assert_eq!(parse_page_range("2,", 3).unwrap(), vec![2]);
    }

    #[test]
    fn page_zero_rejected() {
        assert!(parse_page_range("0", 5).unwrap_err().contains("page 0"));
        assert!(parse_page_range("0-2", 5).is_err());
    }

    #[test]
    fn out_of_range_rejected() {
        let err = parse_page_range("6", 5).unwrap_err();
        assert_eq!(err, "page 6 exceeds document page count (5)");
        assert!(parse_page_range("4-9", 5).is_err());
    }

    #[test]
    fn malformed_rejected() {
        assert!(parse_page_range("abc", 5).is_err());
        assert!(parse_page_range("1-", 5).is_err());
        assert!(parse_page_range("4-2", 5).unwrap_err().contains("descending"));
    }
}
