//! End-of-crawl summary report
//!
//! Printed after every crawl, including crawls that found nothing.

use crate::state::{CrawlResult, Field, StopReason};
use std::fmt::Write;

/// Share of records carrying each known field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoverage {
    pub field: Field,
    pub count: usize,
    pub percent: f64,
}

/// Counts, per known field, how many records carry it
///
/// Fields no record carries are left out.
pub fn field_coverage(result: &CrawlResult) -> Vec<FieldCoverage> {
    let total = result.total_records();
    if total == 0 {
        return Vec::new();
    }

    Field::all()
        .into_iter()
        .filter_map(|field| {
            let count = result
                .records()
                .iter()
                .filter(|r| r.field(field).is_some())
                .count();
            (count > 0).then(|| FieldCoverage {
                field,
                count,
                percent: count as f64 / total as f64 * 100.0,
            })
        })
        .collect()
}

/// Formats the summary report
pub fn format_summary(result: &CrawlResult, stop_reason: Option<&StopReason>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Summary ===");
    let _ = writeln!(out, "Pages processed: {}", result.pages_processed());
    let _ = writeln!(out, "Ideas found: {}", result.total_records());
    if let Some(reason) = stop_reason {
        let _ = writeln!(out, "Stopped: {}", reason);
    }

    let coverage = field_coverage(result);
    if !coverage.is_empty() {
        let _ = writeln!(out, "\nField coverage:");
        for entry in coverage {
            let _ = writeln!(
                out,
                "  {:<20} {:>6} ({:.1}%)",
                entry.field.key(),
                entry.count,
                entry.percent
            );
        }
    }

    out
}

/// Prints the summary report to stdout
pub fn print_summary(result: &CrawlResult, stop_reason: Option<&StopReason>) {
    print!("{}", format_summary(result, stop_reason));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::IdeaRecord;

    #[test]
    fn test_empty_summary() {
        let text = format_summary(&CrawlResult::new(), None);
        assert_eq!(text, "=== Crawl Summary ===\nPages processed: 0\nIdeas found: 0\n");
    }

    #[test]
    fn test_summary_with_coverage() {
        let mut result = CrawlResult::new();
        result.append(vec![
            IdeaRecord::new()
                .with(Field::Title, "A")
                .with(Field::Url, "https://e.com/1"),
            IdeaRecord::new().with(Field::Title, "B"),
        ]);
        result.set_pages_processed(2);

        let coverage = field_coverage(&result);
        assert_eq!(coverage.len(), 2);
        assert_eq!(coverage[0].field, Field::Title);
        assert_eq!(coverage[1].count, 1);
        assert!((coverage[1].percent - 50.0).abs() < 0.01);

        let text = format_summary(&result, Some(&StopReason::NoNextPage { page: 2 }));
        assert!(text.contains("Pages processed: 2"));
        assert!(text.contains("Ideas found: 2"));
        assert!(text.contains("Stopped: no page after page 2"));
        assert!(text.contains("idea_url"));
    }
}
