//! Field selector schema
//!
//! One table per page kind says where each output field lives in the markup.
//! When the upstream markup changes, this table (or the `[listing]` /
//! `[detail]` config sections overriding it) is the only thing to edit.

use crate::state::Field;
use crate::ConfigError;
use scraper::Selector;
use serde::Deserialize;

/// Where listing-page fields live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingSchema {
    /// Heading wrapping each idea on a listing page
    #[serde(rename = "title-heading")]
    pub title_heading: String,

    /// Link inside the heading; its text is the title, its `href` the URL
    #[serde(rename = "title-link")]
    pub title_link: String,
}

impl Default for ListingSchema {
    fn default() -> Self {
        Self {
            title_heading: "h3.titulo-18".to_string(),
            title_link: "a".to_string(),
        }
    }
}

/// Where detail-page fields live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetailSchema {
    /// Highlight region holding the idea title
    pub highlight: String,

    /// Heading inside the highlight region
    #[serde(rename = "title-heading")]
    pub title_heading: String,

    /// Details region holding the positional paragraphs
    pub details: String,

    /// Paragraph selector inside the details region
    pub paragraph: String,

    /// Team region (optional on the page)
    pub team: String,

    /// Comments region (optional on the page)
    pub comments: String,

    /// Supplements region (optional on the page)
    pub supplements: String,

    /// 1-based paragraph position of the idea state
    #[serde(rename = "state-position")]
    pub state_position: usize,

    /// 1-based paragraph position of the department
    #[serde(rename = "department-position")]
    pub department_position: usize,

    /// 1-based paragraph position of the demand
    #[serde(rename = "demand-position")]
    pub demand_position: usize,
}

impl Default for DetailSchema {
    fn default() -> Self {
        Self {
            highlight: "div.destaque".to_string(),
            title_heading: "h2".to_string(),
            details: "#detalhes".to_string(),
            paragraph: "p".to_string(),
            team: "#equipe".to_string(),
            comments: "#comentarios".to_string(),
            supplements: "#complementos".to_string(),
            state_position: 1,
            department_position: 2,
            demand_position: 3,
        }
    }
}

impl DetailSchema {
    /// The ordinal table: which paragraph of the details region feeds which field
    pub fn positional_fields(&self) -> [(Field, usize); 3] {
        [
            (Field::State, self.state_position),
            (Field::Department, self.department_position),
            (Field::Demand, self.demand_position),
        ]
    }

    /// Optional regions whose whole text becomes a field when present
    pub fn region_fields(&self) -> [(Field, &str); 3] {
        [
            (Field::Team, self.team.as_str()),
            (Field::Comments, self.comments.as_str()),
            (Field::Supplements, self.supplements.as_str()),
        ]
    }
}

/// The complete schema owned by an extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelectorSchema {
    pub listing: ListingSchema,
    pub detail: DetailSchema,
}

impl FieldSelectorSchema {
    /// Compiles every selector, failing on the first one that doesn't parse
    pub fn compile(&self) -> Result<CompiledSchema, ConfigError> {
        let listing = CompiledListing {
            heading: Rule::compile("listing.title-heading", &self.listing.title_heading)?,
            link: Rule::compile("listing.title-link", &self.listing.title_link)?,
        };

        let detail = &self.detail;
        let regions = vec![
            (Field::Team, Rule::compile("detail.team", &detail.team)?),
            (Field::Comments, Rule::compile("detail.comments", &detail.comments)?),
            (
                Field::Supplements,
                Rule::compile("detail.supplements", &detail.supplements)?,
            ),
        ];

        let compiled_detail = CompiledDetail {
            highlight: Rule::compile("detail.highlight", &detail.highlight)?,
            title_heading: Rule::compile("detail.title-heading", &detail.title_heading)?,
            details: Rule::compile("detail.details", &detail.details)?,
            paragraph: Rule::compile("detail.paragraph", &detail.paragraph)?,
            positions: detail.positional_fields().to_vec(),
            regions,
        };

        Ok(CompiledSchema {
            listing,
            detail: compiled_detail,
        })
    }
}

/// A selector together with the text it was parsed from
#[derive(Debug, Clone)]
pub struct Rule {
    pub source: String,
    pub selector: Selector,
}

impl Rule {
    fn compile(field: &str, source: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(source).map_err(|_| ConfigError::InvalidSelector {
            field: field.to_string(),
            selector: source.to_string(),
        })?;

        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }
}

/// Compiled listing rules
#[derive(Debug, Clone)]
pub struct CompiledListing {
    pub heading: Rule,
    pub link: Rule,
}

/// Compiled detail rules
#[derive(Debug, Clone)]
pub struct CompiledDetail {
    pub highlight: Rule,
    pub title_heading: Rule,
    pub details: Rule,
    pub paragraph: Rule,
    pub positions: Vec<(Field, usize)>,
    pub regions: Vec<(Field, Rule)>,
}

/// Compiled schema, ready for extraction
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub listing: CompiledListing,
    pub detail: CompiledDetail,
}
