//! Movie dataset cleaning pipeline
//!
//! Applies, in order:
//! 1. Drop irrelevant columns
//! 2. Drop rows missing a required column
//! 3. Deduplicate on a key subset (first occurrence wins, order-stable)
//! 4. Fill categorical nulls, optionally snapping values onto known vocabularies
//! 5. Fill object and numeric nulls
//! 6. Parse dates, filling unparseable or missing ones with a fixed date
//! 7. Canonicalize the company column
//! 8. Sort by title
//!
//! Columns named in the configuration but absent from the input are skipped.

use crate::canon::{Canonicalizer, PassReport};
use crate::category::{default_vocabularies, CategorySnapper, DEFAULT_CATEGORY_THRESHOLD};
use crate::config::AppConfig;
use crate::error::{CanonError, Result};
use crate::frame::{canonicalize_frame_column, replace_string_column, string_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Column layout and fill policy of the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub irrelevant_columns: Vec<String>,
    /// Rows with a null in any of these are dropped
    pub required_columns: Vec<String>,
    pub dedup_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub object_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub date_columns: Vec<String>,
    /// Column handed to the canonicalization engine
    pub company_column: String,
    pub sort_column: Option<String>,
    /// Null replacement for categorical and object columns
    pub fill_label: String,
    pub numeric_fill: f64,
    pub date_format: String,
    pub date_fill: String,
    /// Snap categorical columns onto `category_vocabularies`. Off by default:
    /// values outside a vocabulary would be replaced by `fill_label`.
    pub snap_categories: bool,
    pub category_vocabularies: BTreeMap<String, Vec<String>>,
    pub category_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            irrelevant_columns: strings(&[
                "rotten_tomatoes_link",
                "movie_info",
                "critics_consensus",
                "tomatometer_count",
                "tomatometer_top_critics_count",
                "tomatometer_fresh_critics_count",
                "tomatometer_rotten_critics_count",
                "audience_count",
            ]),
            required_columns: strings(&["movie_title"]),
            dedup_columns: strings(&["movie_title", "original_release_date", "directors"]),
            categorical_columns: strings(&["content_rating", "tomatometer_status", "audience_status"]),
            // The company column is left out: the engine labels its missing values
            object_columns: strings(&["directors", "genres", "authors", "actors"]),
            numeric_columns: strings(&["runtime"]),
            date_columns: strings(&["original_release_date", "streaming_release_date"]),
            company_column: "production_company".to_string(),
            sort_column: Some("movie_title".to_string()),
            fill_label: "nr".to_string(),
            numeric_fill: 0.0,
            date_format: "%Y-%m-%d".to_string(),
            date_fill: "1900-01-01".to_string(),
            snap_categories: false,
            category_vocabularies: default_vocabularies(),
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.category_threshold > 100 {
            return Err(CanonError::InvalidConfiguration(format!(
                "category_threshold must be within 0..=100, got {}",
                self.category_threshold
            )));
        }
        if self.company_column.trim().is_empty() {
            return Err(CanonError::InvalidConfiguration(
                "company_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters collected while cleaning
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_missing_required: usize,
    pub dropped_duplicates: usize,
    /// Date cells that were null in the input
    pub date_nulls: usize,
    /// Non-null date cells that did not parse with `date_format`
    pub unparseable_dates: usize,
    /// `None` when the company column is absent
    pub company: Option<PassReport>,
}

#[derive(Debug, Default)]
struct DateCounts {
    nulls: usize,
    unparseable: usize,
}

pub struct CleaningOutcome {
    pub frame: DataFrame,
    pub report: CleaningReport,
}

pub struct CleaningPipeline {
    config: PipelineConfig,
    canonicalizer: Canonicalizer,
}

impl CleaningPipeline {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.pipeline.validate()?;
        Ok(Self {
            config: config.pipeline.clone(),
            canonicalizer: Canonicalizer::new(&config.canon)?,
        })
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    pub fn run(&self, df: DataFrame) -> Result<CleaningOutcome> {
        let mut report = CleaningReport {
            input_rows: df.height(),
            ..Default::default()
        };
        info!("Cleaning {} rows", report.input_rows);

        let mut df = self.drop_irrelevant(df)?;

        let before = df.height();
        df = self.drop_missing_required(df)?;
        report.dropped_missing_required = before - df.height();

        let before = df.height();
        df = self.deduplicate(df)?;
        report.dropped_duplicates = before - df.height();
        debug!(
            "Dropped {} rows missing required values, {} duplicates",
            report.dropped_missing_required, report.dropped_duplicates
        );

        df = self.fill_nulls(df)?;
        if self.config.snap_categories {
            self.snap_categories(&mut df)?;
        }

        let (counts, frame) = self.fill_dates(df)?;
        report.date_nulls = counts.nulls;
        report.unparseable_dates = counts.unparseable;
        df = frame;

        let company = self.config.company_column.as_str();
        if has_column(&df, company) {
            report.company = Some(canonicalize_frame_column(&mut df, company, &self.canonicalizer)?);
        } else {
            warn!("Company column '{}' not found, skipping canonicalization", company);
        }

        if let Some(sort_column) = &self.config.sort_column {
            if has_column(&df, sort_column) {
                df = df
                    .lazy()
                    .sort_by_exprs(
                        vec![col(sort_column)],
                        SortMultipleOptions::default().with_maintain_order(true),
                    )
                    .collect()?;
            } else {
                warn!("Sort column '{}' not found, leaving row order", sort_column);
            }
        }

        report.output_rows = df.height();
        info!(
            "Cleaning complete: {} -> {} rows, {} missing and {} unparseable dates filled",
            report.input_rows, report.output_rows, report.date_nulls, report.unparseable_dates
        );

        Ok(CleaningOutcome { frame: df, report })
    }

    fn drop_irrelevant(&self, df: DataFrame) -> Result<DataFrame> {
        let irrelevant: BTreeSet<&str> = self.config.irrelevant_columns.iter().map(String::as_str).collect();
        let keep: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| !irrelevant.contains(name))
            .map(str::to_string)
            .collect();

        if keep.len() == df.width() {
            return Ok(df);
        }
        debug!("Dropping {} irrelevant columns", df.width() - keep.len());
        Ok(df.select(keep)?)
    }

    fn drop_missing_required(&self, df: DataFrame) -> Result<DataFrame> {
        let required = self.present(&df, &self.config.required_columns);
        if required.is_empty() {
            return Ok(df);
        }

        let mut lf = df.lazy();
        for column in required {
            lf = lf.filter(col(&column).is_not_null());
        }
        Ok(lf.collect()?)
    }

    fn deduplicate(&self, df: DataFrame) -> Result<DataFrame> {
        let subset = self.present(&df, &self.config.dedup_columns);
        if subset.is_empty() {
            return Ok(df);
        }

        Ok(df
            .lazy()
            .unique_stable(Some(subset), UniqueKeepStrategy::First)
            .collect()?)
    }

    fn fill_nulls(&self, df: DataFrame) -> Result<DataFrame> {
        let fill_label = self.config.fill_label.as_str();
        let mut exprs: Vec<Expr> = Vec::new();

        for column in self.present(&df, &self.config.categorical_columns) {
            exprs.push(col(&column).fill_null(lit(fill_label)).alias(&column));
        }
        for column in self.present(&df, &self.config.object_columns) {
            exprs.push(col(&column).fill_null(lit(fill_label)).alias(&column));
        }
        for column in self.present(&df, &self.config.numeric_columns) {
            exprs.push(col(&column).fill_null(lit(self.config.numeric_fill)).alias(&column));
        }

        if exprs.is_empty() {
            return Ok(df);
        }
        Ok(df.lazy().with_columns(exprs).collect()?)
    }

    fn snap_categories(&self, df: &mut DataFrame) -> Result<()> {
        let scorer = crate::canon::TokenSortRatio;

        for column in self.present(df, &self.config.categorical_columns) {
            let Some(vocabulary) = self.config.category_vocabularies.get(&column) else {
                continue;
            };
            let snapper = CategorySnapper::new(
                &scorer,
                vocabulary,
                self.config.category_threshold,
                self.config.fill_label.as_str(),
            );

            let snapped: Vec<String> = string_values(df, &column)?
                .iter()
                .map(|value| snapper.snap(value.as_deref()))
                .collect();
            replace_string_column(df, &column, snapped)?;
            debug!("Snapped '{}' onto {} categories", column, vocabulary.len());
        }
        Ok(())
    }

    /// Parse date columns and fill the gaps with `date_fill`
    fn fill_dates(&self, df: DataFrame) -> Result<(DateCounts, DataFrame)> {
        let options = StrptimeOptions {
            format: Some(self.config.date_format.clone()),
            strict: false,
            ..Default::default()
        };

        let mut counts = DateCounts::default();
        let mut parse = Vec::new();
        let mut raw_nulls: BTreeMap<String, usize> = BTreeMap::new();
        for column in self.present(&df, &self.config.date_columns) {
            let series = df.column(&column)?;
            match series.dtype() {
                DataType::String => {
                    raw_nulls.insert(column.clone(), series.null_count());
                    parse.push(col(&column).str().to_date(options.clone()).alias(&column))
                }
                DataType::Date => {
                    raw_nulls.insert(column.clone(), series.null_count());
                }
                other => {
                    warn!("Date column '{}' has type {:?}, skipping", column, other);
                    continue;
                }
            }
        }
        let df = if parse.is_empty() {
            df
        } else {
            df.lazy().with_columns(parse).collect()?
        };

        let mut fill = Vec::new();
        for (column, nulls) in &raw_nulls {
            let parsed_nulls = df.column(column)?.null_count();
            counts.nulls += nulls;
            counts.unparseable += parsed_nulls.saturating_sub(*nulls);
            fill.push(
                col(column)
                    .fill_null(lit(self.config.date_fill.as_str()).str().to_date(options.clone()))
                    .alias(column),
            );
        }

        if fill.is_empty() {
            return Ok((counts, df));
        }
        Ok((counts, df.lazy().with_columns(fill).collect()?))
    }

    /// Configured columns that exist in `df`, in configuration order
    fn present(&self, df: &DataFrame, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|column| {
                let found = has_column(df, column);
                if !found {
                    debug!("Column '{}' not in input, skipping", column);
                }
                found
            })
            .cloned()
            .collect()
    }
}

fn has_column(df: &DataFrame, column: &str) -> bool {
    df.get_column_names().contains(&column)
}

pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path).with_has_header(true).finish()?.collect()?;
    info!("Read {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
