// Query Resolver
// Case-insensitive substring dispatch over the query text. The resolver is
// a total function: any input string gets a textual answer, unmatched
// queries degrade to a fixed fallback sentence.

use crate::dataset::{DatasetIndex, FinancialRecord};

/// Fixed fallback sentence for unrecognized queries. The company list is
/// fixed product copy, independent of the loaded dataset (see DESIGN.md).
pub const FALLBACK_RESPONSE: &str = "I'm sorry, I can only provide information about total revenue, net income, and cash flow for Apple, Microsoft, and Tesla. Could you rephrase your query?";

// ============================================================================
// METRICS
// ============================================================================

/// The three metrics a query can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Revenue,
    NetIncome,
    CashFlow,
}

impl Metric {
    /// Phrase used inside response sentences.
    pub fn phrase(&self) -> &'static str {
        match self {
            Metric::Revenue => "total revenue",
            Metric::NetIncome => "net income",
            Metric::CashFlow => "cash flow",
        }
    }

    pub fn value(&self, record: &FinancialRecord) -> i64 {
        match self {
            Metric::Revenue => record.total_revenue,
            Metric::NetIncome => record.net_income,
            Metric::CashFlow => record.cash_flow,
        }
    }

    pub fn growth(&self, record: &FinancialRecord) -> f64 {
        match self {
            Metric::Revenue => record.total_revenue_growth,
            Metric::NetIncome => record.net_income_growth,
            Metric::CashFlow => record.cash_flow_growth,
        }
    }
}

// Keyword tables evaluated top to bottom; the first match wins. The order
// is a contract, not an implementation detail: a query naming several
// metrics always gets the revenue answer.
const GLOBAL_KEYWORDS: &[(&[&str], Metric)] = &[
    (&["total revenue", "revenue"], Metric::Revenue),
    (&["net income", "profit"], Metric::NetIncome),
    (&["cash flow", "cashflow"], Metric::CashFlow),
];

// The company sub-resolver accepts a narrower keyword set: no "total
// revenue" alias (plain "revenue" already covers it) and no "cashflow".
const COMPANY_KEYWORDS: &[(&[&str], Metric)] = &[
    (&["revenue"], Metric::Revenue),
    (&["net income", "profit"], Metric::NetIncome),
    (&["cash flow"], Metric::CashFlow),
];

// ============================================================================
// RESOLUTION
// ============================================================================

/// Process a user query and return the chatbot response.
///
/// Priority order: company-specific answers first (companies checked in
/// first-appearance order, first substring match wins), then the global
/// metric keywords, then the fallback sentence. Never fails.
pub fn process_query(query: &str, index: &DatasetIndex) -> String {
    let normalized = query.to_lowercase();

    for company in index.companies() {
        if normalized.contains(&company.to_lowercase()) {
            return resolve_company(company, &normalized, index);
        }
    }

    for (keywords, metric) in GLOBAL_KEYWORDS {
        if keywords.iter().any(|kw| normalized.contains(kw)) {
            let latest = index.latest();
            return format!(
                "The latest {} is ${} with a growth rate of {:.2}%.",
                metric.phrase(),
                group_thousands(metric.value(latest)),
                metric.growth(latest)
            );
        }
    }

    FALLBACK_RESPONSE.to_string()
}

/// Answer a query already known to mention `company`. Reads the record for
/// the company's latest fiscal year and dispatches on the metric keywords.
fn resolve_company(company: &str, normalized_query: &str, index: &DatasetIndex) -> String {
    let record = index
        .summary(company)
        .and_then(|summary| index.record_for(company, summary.latest_year));

    let Some(record) = record else {
        // Unreachable for names coming out of the index, but the resolver
        // stays total either way.
        return more_specific(company);
    };

    for (keywords, metric) in COMPANY_KEYWORDS {
        if keywords.iter().any(|kw| normalized_query.contains(kw)) {
            return format!(
                "{}'s latest {} is ${} with a growth rate of {:.2}%.",
                company,
                metric.phrase(),
                group_thousands(metric.value(record)),
                metric.growth(record)
            );
        }
    }

    more_specific(company)
}

fn more_specific(company: &str) -> String {
    format!(
        "I have financial information about {}, but could you be more specific?",
        company
    )
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Render a currency amount with thousands separators and no decimals.
/// Negative amounts keep the sign in front of the grouped digits, so the
/// rendered sentence reads "$-5,644,000,000".
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetIndex;

    fn record(
        company: &str,
        year: i32,
        revenue: i64,
        revenue_growth: f64,
        net_income: i64,
        net_income_growth: f64,
        cash_flow: i64,
        cash_flow_growth: f64,
    ) -> FinancialRecord {
        FinancialRecord {
            company: company.to_string(),
            year,
            total_revenue: revenue,
            total_revenue_growth: revenue_growth,
            net_income,
            net_income_growth,
            cash_flow,
            cash_flow_growth,
        }
    }

    /// Three companies, two years each; the last row is Apple's latest.
    fn sample_index() -> DatasetIndex {
        DatasetIndex::from_records(vec![
            record("Microsoft", 2022, 198270000000, 17.96, 72738000000, 18.72, 89035000000, 16.02),
            record("Microsoft", 2023, 211915000000, 6.88, 72361000000, -0.52, 87582000000, -1.63),
            record("Tesla", 2022, 81462000000, 51.35, 12583000000, 127.99, 14724000000, 28.07),
            record("Tesla", 2023, 96773000000, 18.80, 14997000000, 19.19, 13256000000, -9.97),
            record("Apple", 2022, 365817000000, 33.26, 94680000000, 64.92, 104038000000, 28.93),
            record("Apple", 2023, 394328000000, 2.80, 96995000000, -2.81, 110543000000, 6.25),
        ])
        .unwrap()
    }

    #[test]
    fn test_company_revenue_sentence() {
        let index = sample_index();
        assert_eq!(
            process_query("apple revenue", &index),
            "Apple's latest total revenue is $394,328,000,000 with a growth rate of 2.80%."
        );
    }

    #[test]
    fn test_company_net_income_and_profit_alias() {
        let index = sample_index();
        let expected =
            "Tesla's latest net income is $14,997,000,000 with a growth rate of 19.19%.";
        assert_eq!(process_query("tesla net income", &index), expected);
        assert_eq!(process_query("how much profit did tesla make", &index), expected);
    }

    #[test]
    fn test_company_cash_flow_sentence() {
        let index = sample_index();
        assert_eq!(
            process_query("microsoft cash flow", &index),
            "Microsoft's latest cash flow is $87,582,000,000 with a growth rate of -1.63%."
        );
    }

    #[test]
    fn test_company_without_metric_asks_for_specifics() {
        let index = sample_index();
        assert_eq!(
            process_query("tell me about tesla", &index),
            "I have financial information about Tesla, but could you be more specific?"
        );
    }

    #[test]
    fn test_company_match_is_case_insensitive() {
        let index = sample_index();
        assert_eq!(
            process_query("APPLE revenue", &index),
            process_query("apple revenue", &index)
        );
    }

    #[test]
    fn test_company_wins_over_global_keyword() {
        let index = sample_index();
        let response = process_query("what is apple's total revenue", &index);
        assert!(response.starts_with("Apple's latest total revenue"));
    }

    #[test]
    fn test_first_listed_company_wins_on_double_mention() {
        // Microsoft appears first in the dataset, so it wins even though
        // the query names Apple first.
        let index = sample_index();
        let response = process_query("compare apple and microsoft revenue", &index);
        assert!(response.starts_with("Microsoft's"));
    }

    #[test]
    fn test_global_revenue_reads_last_row() {
        let index = sample_index();
        assert_eq!(
            process_query("what is the total revenue", &index),
            "The latest total revenue is $394,328,000,000 with a growth rate of 2.80%."
        );
    }

    #[test]
    fn test_global_net_income_with_negative_growth() {
        let index = sample_index();
        assert_eq!(
            process_query("what about net income", &index),
            "The latest net income is $96,995,000,000 with a growth rate of -2.81%."
        );
    }

    #[test]
    fn test_global_cashflow_alias() {
        let index = sample_index();
        assert_eq!(
            process_query("show me the cashflow", &index),
            "The latest cash flow is $110,543,000,000 with a growth rate of 6.25%."
        );
    }

    #[test]
    fn test_unmatched_query_returns_fallback_verbatim() {
        let index = sample_index();
        assert_eq!(
            process_query("what is the weather today", &index),
            FALLBACK_RESPONSE
        );
    }

    #[test]
    fn test_resolver_is_total() {
        let index = sample_index();
        assert_eq!(process_query("", &index), FALLBACK_RESPONSE);
        assert_eq!(process_query("   \t  ", &index), FALLBACK_RESPONSE);
        assert_eq!(process_query("¿cuánto vale ésto? 🤖", &index), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_resolver_is_idempotent() {
        let index = sample_index();
        let first = process_query("apple revenue", &index);
        let second = process_query("apple revenue", &index);
        assert_eq!(first, second);
    }

    #[test]
    fn test_growth_always_two_decimals() {
        let records = vec![record("Apple", 2023, 100, 5.0, 200, 1.234, 300, -0.005)];
        let index = DatasetIndex::from_records(records).unwrap();
        assert_eq!(
            process_query("revenue", &index),
            "The latest total revenue is $100 with a growth rate of 5.00%."
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(5), "5");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(394328000000), "394,328,000,000");
        assert_eq!(group_thousands(-5644000000), "-5,644,000,000");
        assert_eq!(group_thousands(-12), "-12");
    }
}
