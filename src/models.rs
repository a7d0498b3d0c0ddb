//! Response shapes of the analysis backend.
//!
//! Field names mirror the JSON the service emits; the client never writes
//! these back, so everything is deserialize-only.

use serde::Deserialize;
use std::collections::HashMap;

/// Identifier the backend assigns to an uploaded dataset.
pub type DatasetId = u64;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub dataset_id: DatasetId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rows: u64,
    #[serde(default)]
    pub columns: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalysisReport {
    pub stats: AnalysisStats,
    #[serde(default)]
    pub charts: Vec<String>,
    pub summary: String,
    pub processing_time: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalysisStats {
    /// `[rows, columns]`, pandas order.
    pub shape: [u64; 2],
    pub columns: Vec<String>,
    pub dtypes: HashMap<String, String>,
    pub missing_values: HashMap<String, u64>,
    #[serde(default)]
    pub quality_metrics: Option<QualityMetrics>,
}

impl AnalysisStats {
    pub fn rows(&self) -> u64 {
        self.shape[0]
    }

    pub fn cols(&self) -> u64 {
        self.shape[1]
    }

    /// Missing cells across all columns.
    pub fn total_missing(&self) -> u64 {
        self.missing_values.values().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QualityMetrics {
    #[serde(default)]
    pub completeness_ratio: f64,
    #[serde(default)]
    pub duplicate_rows: u64,
    #[serde(default)]
    pub columns_with_missing: u64,
    #[serde(default)]
    pub numeric_columns: u64,
    #[serde(default)]
    pub categorical_columns: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrainingResult {
    pub algorithm: String,
    #[serde(default)]
    pub model_type: Option<String>,
    pub score: f64,
    pub score_name: String,
    #[serde(default)]
    pub feature_importance: HashMap<String, f64>,
    #[serde(default)]
    pub chart_url: Option<String>,
    pub processing_time: f64,
    #[serde(default)]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub trust_level: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrainedModel {
    pub id: u64,
    pub dataset_name: String,
    pub target_column: String,
    pub algorithm: String,
    pub score: f64,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<TrainedModel>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryEntry {
    pub dataset_name: String,
    pub timestamp: String,
    pub summary: String,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SystemMetrics {
    pub total_datasets: u64,
    pub total_analyses: u64,
    pub avg_processing_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_report_decodes_backend_payload() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "stats": {
                "shape": [100, 5],
                "missing_values": {"a": 0, "b": 2},
                "columns": ["a", "b", "c", "d", "e"],
                "dtypes": {"a": "int64", "b": "float64"}
            },
            "charts": ["/static/charts/dist_1.png"],
            "summary": "Five columns, mostly numeric.",
            "processing_time": 1.42
        }))
        .unwrap();

        assert_eq!(report.stats.rows(), 100);
        assert_eq!(report.stats.cols(), 5);
        assert_eq!(report.stats.total_missing(), 2);
        assert_eq!(report.charts.len(), 1);
        assert!(report.stats.quality_metrics.is_none());
    }

    #[test]
    fn training_result_tolerates_missing_optional_fields() {
        let result: TrainingResult = serde_json::from_value(json!({
            "algorithm": "RandomForestClassifier",
            "score": 0.91,
            "score_name": "accuracy",
            "feature_importance": {"age": 0.4, "income": 0.6},
            "processing_time": 3.8
        }))
        .unwrap();

        assert_eq!(result.algorithm, "RandomForestClassifier");
        assert!(result.chart_url.is_none());
        assert!(result.warnings.is_empty());
        assert!(result.interpretation.is_none());
    }

    #[test]
    fn history_entry_processing_time_is_optional() {
        let response: HistoryResponse = serde_json::from_value(json!({
            "history": [
                {"dataset_name": "sales.csv", "timestamp": "2024-05-01T10:00:00", "summary": "ok"},
                {"dataset_name": "hr.csv", "timestamp": "2024-05-02T11:00:00", "summary": "ok", "processing_time": 2.5}
            ]
        }))
        .unwrap();

        assert_eq!(response.history.len(), 2);
        assert!(response.history[0].processing_time.is_none());
        assert_eq!(response.history[1].processing_time, Some(2.5));
    }
}
