//! Structured extraction of idea records
//!
//! The extractor turns a parsed document into idea records using the compiled
//! field selector schema. It never fails past its boundary: a unit that can't
//! be extracted becomes an [`ExtractionError`] in [`Extraction::skipped`] plus
//! one warning, and the rest of the page is still processed.

use crate::crawler::document::{Document, Node};
use crate::crawler::schema::{CompiledDetail, CompiledListing, CompiledSchema, FieldSelectorSchema};
use crate::state::{Field, IdeaRecord};
use crate::url::resolve_href;
use crate::ConfigError;
use thiserror::Error;
use url::Url;

/// Why one extraction unit produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("listing heading #{index} has no link")]
    MissingLink { index: usize },

    #[error("listing heading #{index} has an empty title")]
    EmptyTitle { index: usize },

    #[error("region '{region}' not found (selector '{selector}')")]
    MissingRegion { region: String, selector: String },

    #[error("{field} not found (selector '{selector}')")]
    MissingField { field: Field, selector: String },

    #[error("{field} expects paragraph {position}, but only {found} present")]
    MissingParagraph {
        field: Field,
        position: usize,
        found: usize,
    },
}

/// Which kind of page a document is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A listing page with one heading per idea
    Listing,
    /// A single idea's detail page
    Detail,
}

/// Result of extracting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<IdeaRecord>,
    pub skipped: Vec<ExtractionError>,
}

/// Extracts idea records from documents
#[derive(Debug, Clone)]
pub struct Extractor {
    schema: CompiledSchema,
}

impl Extractor {
    /// Compiles the schema into an extractor
    pub fn new(schema: &FieldSelectorSchema) -> Result<Self, ConfigError> {
        Ok(Self {
            schema: schema.compile()?,
        })
    }

    /// Extracts all records of the given page kind
    pub fn extract(&self, doc: &Document, kind: PageKind, page_url: &Url) -> Extraction {
        match kind {
            PageKind::Listing => self.extract_listing(doc, page_url),
            PageKind::Detail => {
                let mut extraction = Extraction::default();
                match self.extract_detail(doc, page_url) {
                    Ok(record) => extraction.records.push(record),
                    Err(e) => extraction.skipped.push(e),
                }
                extraction
            }
        }
    }

    /// Extracts one record per listing heading
    ///
    /// Headings without a link or with an empty link text are skipped with a
    /// warning. A link whose `href` can't be resolved against `page_url`
    /// yields a record without `idea_url`.
    pub fn extract_listing(&self, doc: &Document, page_url: &Url) -> Extraction {
        let rules: &CompiledListing = &self.schema.listing;
        let mut extraction = Extraction::default();

        for (index, heading) in doc.select(&rules.heading.selector).into_iter().enumerate() {
            match listing_record(&heading, rules, index + 1, page_url) {
                Ok(record) => extraction.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping idea on {}: {}", page_url, e);
                    extraction.skipped.push(e);
                }
            }
        }

        tracing::debug!(
            "Extracted {} ideas from {} ({} skipped)",
            extraction.records.len(),
            page_url,
            extraction.skipped.len()
        );

        extraction
    }

    /// Extracts the single record of a detail page
    ///
    /// Title and every positional paragraph are required; if any is missing
    /// the whole record fails. Team, comments and supplements are added only
    /// when their region is present with non-empty text.
    pub fn extract_detail(&self, doc: &Document, page_url: &Url) -> Result<IdeaRecord, ExtractionError> {
        let result = detail_record(doc, &self.schema.detail, page_url);
        if let Err(e) = &result {
            tracing::warn!("Could not extract idea details from {}: {}", page_url, e);
        }
        result
    }
}

fn listing_record(
    heading: &Node<'_>,
    rules: &CompiledListing,
    index: usize,
    page_url: &Url,
) -> Result<IdeaRecord, ExtractionError> {
    let link = heading
        .select_first(&rules.link.selector)
        .ok_or(ExtractionError::MissingLink { index })?;

    let title = link.text(true);
    if title.is_empty() {
        return Err(ExtractionError::EmptyTitle { index });
    }

    let mut record = IdeaRecord::new().with(Field::Title, title);

    match link.attribute("href").and_then(|href| resolve_href(href, page_url)) {
        Some(url) => record.set(Field::Url, url.as_str()),
        None => tracing::debug!("Idea #{} on {} has no usable link target", index, page_url),
    }

    Ok(record)
}

fn detail_record(
    doc: &Document,
    rules: &CompiledDetail,
    page_url: &Url,
) -> Result<IdeaRecord, ExtractionError> {
    let highlight = doc
        .select_first(&rules.highlight.selector)
        .ok_or_else(|| ExtractionError::MissingRegion {
            region: "highlight".to_string(),
            selector: rules.highlight.source.clone(),
        })?;

    let title = highlight
        .select_first(&rules.title_heading.selector)
        .map(|heading| heading.text(true))
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ExtractionError::MissingField {
            field: Field::Title,
            selector: rules.title_heading.source.clone(),
        })?;

    let details = doc
        .select_first(&rules.details.selector)
        .ok_or_else(|| ExtractionError::MissingRegion {
            region: "details".to_string(),
            selector: rules.details.source.clone(),
        })?;

    let paragraphs = details.select(&rules.paragraph.selector);

    let mut record = IdeaRecord::new()
        .with(Field::Title, title)
        .with(Field::Url, page_url.as_str());

    for &(field, position) in &rules.positions {
        let paragraph = position
            .checked_sub(1)
            .and_then(|i| paragraphs.get(i))
            .ok_or(ExtractionError::MissingParagraph {
                field,
                position,
                found: paragraphs.len(),
            })?;
        record.set(field, paragraph.text(true));
    }

    for (field, rule) in &rules.regions {
        if let Some(region) = doc.select_first(&rule.selector) {
            let text = region.text(true);
            if !text.is_empty() {
                record.set(*field, text);
            }
        }
    }

    Ok(record)
}
