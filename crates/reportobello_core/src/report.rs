use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A data record bound to a named server-side template.
pub trait ReportTemplate: Serialize + DeserializeOwned {
    /// Template name the API renders this record against.
    const NAME: &'static str;
}

/// Typst source the page starts with; reads its input from `data.json`.
pub const DEFAULT_TEMPLATE_SOURCE: &str = r#"#let data = json("data.json")

= Q#data.quarter Earnings Report

Generated: #datetime.today().display()

Earnings: $#data.earnings"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyReport {
    pub quarter: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub earnings: Decimal,
}

impl ReportTemplate for QuarterlyReport {
    const NAME: &'static str = "quarterly_report";
}

impl QuarterlyReport {
    pub fn placeholder() -> Self {
        Self {
            quarter: 1,
            earnings: Decimal::from(123_456),
        }
    }

    /// Pretty JSON for the placeholder record, used to seed the data box.
    pub fn placeholder_json() -> String {
        serde_json::to_string_pretty(&Self::placeholder()).unwrap_or_default()
    }
}
