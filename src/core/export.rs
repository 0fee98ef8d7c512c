use crate::domain::model::{LookupOutcome, LookupResult, VehicleRecord};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";
pub const JSON_MIME_TYPE: &str = "application/json;charset=utf-8";

const CSV_HEADERS: [&str; 9] = [
    "codigo",
    "status",
    "erro",
    "marca",
    "modelo",
    "anoModelo",
    "combustivel",
    "valor",
    "mesReferencia",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME_TYPE,
            Self::Json => JSON_MIME_TYPE,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub count: usize,
    #[serde(rename = "okCount")]
    pub ok_count: usize,
}

pub fn summarize(results: &[LookupResult]) -> BatchSummary {
    BatchSummary {
        count: results.len(),
        ok_count: results.iter().filter(|r| r.is_ok()).count(),
    }
}

/// Flattened CSV projection of one result and its first data record.
/// Constructed on demand for the export only.
struct ExportRow {
    codigo: String,
    status: String,
    erro: String,
    vehicle: VehicleRecord,
}

impl ExportRow {
    fn from_result(result: &LookupResult) -> Self {
        match &result.outcome {
            LookupOutcome::Failure { status, error } => Self {
                codigo: result.code.clone(),
                // Transport failures carry no usable status number.
                status: if *status == 0 {
                    "erro".to_string()
                } else {
                    status.to_string()
                },
                erro: if error.is_empty() {
                    "Falha na consulta".to_string()
                } else {
                    error.clone()
                },
                vehicle: VehicleRecord::default(),
            },
            LookupOutcome::Success { data } => Self {
                codigo: result.code.clone(),
                status: "ok".to_string(),
                erro: String::new(),
                vehicle: VehicleRecord::from_payload(data),
            },
        }
    }

    fn columns(&self) -> [&str; 9] {
        let v = &self.vehicle;
        [
            &self.codigo,
            &self.status,
            &self.erro,
            v.marca.as_deref().unwrap_or(""),
            v.modelo.as_deref().unwrap_or(""),
            v.ano_modelo.as_deref().unwrap_or(""),
            v.combustivel.as_deref().unwrap_or(""),
            v.valor.as_deref().unwrap_or(""),
            v.mes_referencia.as_deref().unwrap_or(""),
        ]
    }
}

/// Quote a field containing a double quote, comma, semicolon or newline,
/// doubling internal quotes. Everything else passes through untouched.
pub fn csv_escape(value: &str) -> String {
    if value.contains(&['"', ',', ';', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the full result sequence as CSV, header row first.
pub fn to_csv(results: &[LookupResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for result in results {
        let row = ExportRow::from_result(result);
        let line: Vec<String> = row.columns().iter().map(|field| csv_escape(field)).collect();
        lines.push(line.join(","));
    }

    lines.join("\n")
}

/// The full result sequence, pretty-printed, one-to-one with the wire fields.
pub fn to_pretty_json(results: &[LookupResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Export artifact name, e.g. `fipei-export-2026-08-06-14-03-59.csv`.
pub fn export_filename(format: ExportFormat) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S");
    format!("fipei-export-{}.{}", timestamp, format.extension())
}

/// Write the requested export artifacts (both formats when `format` is None)
/// through the storage port. Returns the filenames written.
pub async fn write_exports<S: Storage>(
    storage: &S,
    results: &[LookupResult],
    format: Option<ExportFormat>,
) -> Result<Vec<String>> {
    let formats: &[ExportFormat] = match format {
        Some(ExportFormat::Csv) => &[ExportFormat::Csv],
        Some(ExportFormat::Json) => &[ExportFormat::Json],
        None => &[ExportFormat::Csv, ExportFormat::Json],
    };

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let content = match format {
            ExportFormat::Csv => to_csv(results),
            ExportFormat::Json => to_pretty_json(results)?,
        };
        let filename = export_filename(*format);
        storage.write_file(&filename, content.as_bytes()).await?;
        tracing::debug!("Export written: {}", filename);
        written.push(filename);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_escape_quotes_and_embedded_newline() {
        assert_eq!(
            csv_escape("He said, \"hi\"\nline2"),
            "\"He said, \"\"hi\"\"\nline2\""
        );
    }

    #[test]
    fn test_csv_escape_semicolon_triggers_quoting() {
        assert_eq!(csv_escape("a;b"), "\"a;b\"");
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape(""), "");
    }

    #[test]
    fn test_to_csv_success_row() {
        let results = vec![LookupResult::success(
            "001004-9",
            json!([{
                "marca": "Fiat",
                "modelo": "Uno Mille 1.0",
                "anoModelo": 2014,
                "combustivel": "Gasolina",
                "valor": "R$ 20.000,00",
                "mesReferencia": "junho de 2024"
            }]),
        )];

        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(
            lines[0],
            "codigo,status,erro,marca,modelo,anoModelo,combustivel,valor,mesReferencia"
        );
        assert_eq!(
            lines[1],
            "001004-9,ok,,Fiat,Uno Mille 1.0,2014,Gasolina,\"R$ 20.000,00\",junho de 2024"
        );
    }

    #[test]
    fn test_to_csv_failure_rows() {
        let results = vec![
            LookupResult::failure("111111-1", 404, "nao encontrado"),
            LookupResult::failure("222222-2", 0, "connection refused"),
        ];

        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines[1], "111111-1,404,nao encontrado,,,,,,");
        assert_eq!(lines[2], "222222-2,erro,connection refused,,,,,,");
    }

    #[test]
    fn test_to_csv_missing_fields_render_empty() {
        let results = vec![LookupResult::success(
            "001004-9",
            json!({"marca": "Fiat"}),
        )];

        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[1], "001004-9,ok,,Fiat,,,,,");
    }

    #[test]
    fn test_summarize_counts() {
        let results = vec![
            LookupResult::success("111111-1", json!({})),
            LookupResult::failure("222222-2", 404, "x"),
            LookupResult::success("333333-3", json!({})),
        ];

        let summary = summarize(&results);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.ok_count, 2);
    }

    #[test]
    fn test_pretty_json_mirrors_wire_fields() {
        let results = vec![LookupResult::failure("111111-1", 404, "nao encontrado")];
        let rendered = to_pretty_json(&results).unwrap();

        let parsed: Vec<LookupResult> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, results);
        assert!(rendered.contains("\"ok\": false"));
        assert!(rendered.contains("\"status\": 404"));
    }

    #[test]
    fn test_export_filename_shape() {
        let csv = export_filename(ExportFormat::Csv);
        let json = export_filename(ExportFormat::Json);

        assert!(csv.starts_with("fipei-export-"));
        assert!(csv.ends_with(".csv"));
        assert!(json.ends_with(".json"));
        // fipei-export-YYYY-MM-DD-HH-MM-SS.csv
        assert_eq!(csv.len(), "fipei-export-".len() + 19 + ".csv".len());
    }

    #[test]
    fn test_format_mime_types() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv;charset=utf-8");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json;charset=utf-8");
    }
}
