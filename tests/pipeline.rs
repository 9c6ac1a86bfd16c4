use healthboard::charts::OUTCOME_FIELD;
use healthboard::data::{DataLoader, LoadError};
use healthboard::pipeline::{initialize, ExportOutcome, PipelineError};
use healthboard::PipelineConfig;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const HEADER: &str = "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome,Id";

fn write_observations(dir: &Path, rows: usize) -> PathBuf {
    let mut text = String::from(HEADER);
    text.push('\n');
    for i in 0..rows {
        let outcome = i % 2;
        writeln!(
            text,
            "{},{},{},{},{},{:.1},{:.3},{},{},{}",
            i % 13,
            80 + (i % 120) + outcome * 30,
            50 + i % 40,
            i % 60,
            (i * 7) % 300,
            18.0 + (i % 25) as f64,
            0.1 + (i % 9) as f64 / 10.0,
            21 + i % 50,
            outcome,
            i + 1
        )
        .unwrap();
    }

    let path = dir.join("dirtydata.csv");
    std::fs::write(&path, text).unwrap();
    path
}

fn config_for(dir: &Path, input: PathBuf) -> PipelineConfig {
    PipelineConfig {
        input,
        output: Some(dir.join("cleandata.csv")),
        report: Some(dir.join("report.json")),
        ..PipelineConfig::default()
    }
}

#[test]
fn full_export_is_cleaned_to_58_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_observations(dir.path(), 2800);
    let config = config_for(dir.path(), input);

    let result = initialize(&config).unwrap();

    let cleaned = result.cleaned_dataset();
    assert_eq!(
        cleaned.column_names(),
        vec!["Pregnancies", "Glucose", "BP", "SkinThickness", "Insulin", "BMI", "Age", "Outcome"]
    );
    assert_eq!(cleaned.height(), 58);

    // rows 0..26 then 2768..2800 survive
    let glucose = cleaned.numeric_values("Glucose").unwrap();
    assert_eq!(glucose[0], 80.0);
    assert_eq!(glucose[26], (80 + 2768 % 120) as f64);

    assert_eq!(result.stats().len(), 7);
    assert!(result.stats().get(OUTCOME_FIELD).is_none());
    assert!(result.stats().iter().all(|(_, entry)| entry.is_available()));
    for (_, entry) in result.stats().iter() {
        let stats = entry.computed().unwrap();
        assert!(stats.range.unwrap() >= 0.0);
    }

    assert_eq!(result.chart_specs().len(), 5);
    for chart in result.chart_specs() {
        assert!(chart.fields().iter().all(|f| cleaned.has_column(f)));
    }

    assert!(result.export_outcome().is_written());
    assert!(result.report_outcome().is_written());
    assert_eq!(cleaned.label(), "cleandata");
    assert!(result.chart_specs().iter().all(|c| c.dataset == "cleandata"));
}

#[test]
fn exported_csv_matches_cleaned_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_observations(dir.path(), 2800);
    let config = config_for(dir.path(), input);

    initialize(&config).unwrap();

    let output = config.output.unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("Pregnancies,Glucose,BP,SkinThickness,Insulin,BMI,Age,Outcome")
    );

    let reloaded = DataLoader::new().load(&output).unwrap();
    assert_eq!(reloaded.height(), 58);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.report.unwrap()).unwrap()).unwrap();
    assert_eq!(report["rows"], 58);
    assert_eq!(report["charts"][2]["bins"], 20);
    assert_eq!(report["stats"]["Glucose"]["status"], "computed");
}

#[test]
fn short_export_is_left_whole() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_observations(dir.path(), 20);
    let config = config_for(dir.path(), input);

    let result = initialize(&config).unwrap();
    assert_eq!(result.cleaned_dataset().height(), 20);
    assert_eq!(result.cleaned_dataset().frame().width(), 8);
}

#[test]
fn missing_input_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), dir.path().join("absent.csv"));

    let err = initialize(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoadError::Unreadable { .. })));
    assert!(!dir.path().join("cleandata.csv").exists());
}

#[test]
fn ragged_input_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dirtydata.csv");
    std::fs::write(&input, format!("{HEADER}\n6,148,72,35,0,33.6,0.627,50,1\n")).unwrap();

    let err = initialize(&config_for(dir.path(), input)).unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoadError::Ragged { .. })));
}

#[test]
fn unwritable_output_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_observations(dir.path(), 30);
    let config = PipelineConfig {
        input,
        output: Some(dir.path().join("missing").join("cleandata.csv")),
        ..PipelineConfig::default()
    };

    let result = initialize(&config).unwrap();
    assert!(matches!(result.export_outcome(), ExportOutcome::Failed { .. }));
    assert_eq!(result.cleaned_dataset().height(), 26);
    assert_eq!(result.stats().len(), 7);
}

#[test]
fn uncleaned_export_survives_missing_chart_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_observations(dir.path(), 30);
    let config = PipelineConfig {
        steps: Vec::new(),
        ..config_for(dir.path(), input)
    };

    let result = initialize(&config).unwrap();
    assert!(result.chart_specs().is_empty());
    assert!(result.chart_error().unwrap().contains("BP"));
    assert_eq!(result.cleaned_dataset().height(), 30);

    let reloaded = DataLoader::new().load(&config.output.unwrap()).unwrap();
    assert_eq!(reloaded.height(), 30);
    assert!(reloaded.has_column("BloodPressure"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.report.unwrap()).unwrap()).unwrap();
    assert_eq!(report["charts"].as_array().unwrap().len(), 0);
    assert!(report["chart_error"].as_str().unwrap().contains("BP"));
}
