use anyhow::Result;
use fipei::core::codes::merge_text_sources;
use fipei::core::export::{summarize, write_exports, ExportFormat};
use fipei::core::Storage;
use fipei::domain::model::LookupResult;
use fipei::{BatchEngine, FipeClient, LocalStorage};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_end_to_end_batch_export_with_real_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/preco/v1/001004-9");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{
                "marca": "Fiat",
                "modelo": "Uno Mille 1.0",
                "anoModelo": 2014,
                "combustivel": "Gasolina",
                "valor": "R$ 20.000,00",
                "mesReferencia": "junho de 2024"
            }]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/preco/v1/999999-9");
        then.status(404).body("codigo nao encontrado");
    });

    let client = FipeClient::new(&server.url("/preco/v1"))?;
    let engine = BatchEngine::new(client, 5);

    let codes = vec!["001004-9".to_string()];
    let response = engine.run(&codes, "999999-9").await?;

    let summary = summarize(&response.results);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.ok_count, 1);

    let storage = LocalStorage::new(output_path.clone());
    let written = write_exports(&storage, &response.results, None).await?;
    assert_eq!(written.len(), 2);

    // CSV artifact: header first, one row per result, failure row flattened.
    let csv_name = written.iter().find(|name| name.ends_with(".csv")).unwrap();
    let csv = String::from_utf8(storage.read_file(csv_name).await?)?;
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("codigo,status,erro"));
    assert!(lines[1].starts_with("001004-9,ok,,Fiat,Uno Mille 1.0,2014"));
    assert!(lines[2].starts_with("999999-9,404,codigo nao encontrado"));

    // JSON artifact round-trips to the same results.
    let json_name = written.iter().find(|name| name.ends_with(".json")).unwrap();
    let exported = storage.read_file(json_name).await?;
    let parsed: Vec<LookupResult> = serde_json::from_slice(&exported)?;
    assert_eq!(parsed, response.results);

    Ok(())
}

#[tokio::test]
async fn test_input_file_codes_are_merged_and_exported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir_path = temp_dir.path().to_str().unwrap().to_string();

    let storage = LocalStorage::new(dir_path.clone());
    storage
        .write_file("codes.txt", b"001004-9; 0010057\nnot-a-code\n")
        .await?;

    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET).path("/preco/v1/001004-9");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"marca": "Fiat"}]));
    });
    let second = server.mock(|when, then| {
        when.method(GET).path("/preco/v1/001005-7");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"marca": "VW"}]));
    });

    let client = FipeClient::new(&server.url("/preco/v1"))?;
    let engine = BatchEngine::new(client, 2);

    let file_text = String::from_utf8(storage.read_file("codes.txt").await?)?;
    let text = merge_text_sources(&[file_text.as_str(), "001004-9"]);

    let response = engine.run(&[], &text).await?;

    assert_eq!(response.count, 2);
    assert_eq!(response.results[0].code, "001004-9");
    assert_eq!(response.results[1].code, "001005-7");
    first.assert_hits(1);
    second.assert_hits(1);

    let written = write_exports(&storage, &response.results, Some(ExportFormat::Csv)).await?;
    assert_eq!(written.len(), 1);
    let csv = String::from_utf8(storage.read_file(&written[0]).await?)?;
    assert_eq!(csv.split('\n').count(), 3);

    Ok(())
}
