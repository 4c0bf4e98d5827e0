// Dataset Loader & Index
// Loads the financial metrics CSV once at startup and builds the
// read-only lookup structures the resolver works against.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One row of the source table. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "Company")]
    pub company: String,

    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Total Revenue")]
    pub total_revenue: i64,

    #[serde(rename = "Total Revenue Growth (%)")]
    pub total_revenue_growth: f64,

    #[serde(rename = "Net Income")]
    pub net_income: i64,

    #[serde(rename = "Net Income Growth (%)")]
    pub net_income_growth: f64,

    #[serde(rename = "Cash Flow")]
    pub cash_flow: i64,

    #[serde(rename = "Cash Flow Growth (%)")]
    pub cash_flow_growth: f64,
}

/// Per-company aggregate built once at load time.
///
/// Invariant: `revenues`, `net_incomes` and `years` have the same length
/// and are positionally aligned - index i in all three refers to the same
/// source row, in file order.
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
    pub latest_year: i32,
    pub revenues: Vec<i64>,
    pub net_incomes: Vec<i64>,
    pub years: Vec<i32>,
}

/// The aggregate index: full row sequence, distinct company names and
/// per-company summaries. Built once before any query is answered and
/// never mutated afterwards, so it can be shared by reference across
/// concurrent request handlers without locking.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    records: Vec<FinancialRecord>,
    companies: Vec<String>,
    summaries: HashMap<String, CompanySummary>,
}

impl DatasetIndex {
    /// Build the index from an already-parsed row sequence.
    /// Fails on an empty sequence: "the latest record" is defined
    /// positionally as the last row, so zero rows means there is nothing
    /// to answer queries from.
    pub fn from_records(records: Vec<FinancialRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("dataset contains no rows");
        }

        // First-appearance order. This order is part of the matching
        // contract: the first company whose name occurs in a query wins.
        let mut companies: Vec<String> = Vec::new();
        for record in &records {
            if !companies.contains(&record.company) {
                companies.push(record.company.clone());
            }
        }

        let mut summaries = HashMap::new();
        for company in &companies {
            let rows: Vec<&FinancialRecord> =
                records.iter().filter(|r| &r.company == company).collect();

            let latest_year = rows
                .iter()
                .map(|r| r.year)
                .max()
                .expect("every company has at least one row");

            summaries.insert(
                company.clone(),
                CompanySummary {
                    latest_year,
                    revenues: rows.iter().map(|r| r.total_revenue).collect(),
                    net_incomes: rows.iter().map(|r| r.net_income).collect(),
                    years: rows.iter().map(|r| r.year).collect(),
                },
            );
        }

        Ok(DatasetIndex {
            records,
            companies,
            summaries,
        })
    }

    /// Full row sequence in file order.
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    /// Distinct company names, original case preserved for display,
    /// in first-appearance order.
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Summary for a company, by its stored (original-case) name.
    pub fn summary(&self, company: &str) -> Option<&CompanySummary> {
        self.summaries.get(company)
    }

    /// Latest overall record: the last row in file order. The source is
    /// assumed pre-sorted so the last row is chronologically most recent.
    /// `from_records` rejects empty datasets, so this never panics.
    pub fn latest(&self) -> &FinancialRecord {
        self.records.last().expect("index is never empty")
    }

    /// First record matching (company, year) in sequence order. If several
    /// rows share the pair, the first one is the deterministic pick.
    pub fn record_for(&self, company: &str, year: i32) -> Option<&FinancialRecord> {
        self.records
            .iter()
            .find(|r| r.company == company && r.year == year)
    }
}

// ============================================================================
// CSV LOADING
// ============================================================================

/// Load the financial table from a CSV file and build the index.
///
/// Fails if the file cannot be read, a row cannot be deserialized (which
/// covers missing required columns), or the file has zero data rows.
/// Never writes back to the source.
pub fn load_csv(csv_path: &Path) -> Result<DatasetIndex> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {:?}", csv_path))?;

    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: FinancialRecord =
            result.context("Failed to deserialize financial record")?;
        records.push(record);
    }

    DatasetIndex::from_records(records)
        .with_context(|| format!("Failed to build index from {:?}", csv_path))
}

// ============================================================================
// TESTS
// ============================================================================
