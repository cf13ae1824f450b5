use polars::prelude::*;
use reel_canon::config::AppConfig;
use reel_canon::frame::string_values;
use reel_canon::pipeline::{read_csv, write_csv, CleaningPipeline};
use std::fs;
use std::path::PathBuf;

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reel_canon_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a small slice of the movie dataset as CSV
fn create_movies_csv(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut df = df! [
        "rotten_tomatoes_link" => ["m/zoo", "m/alpha", "m/alpha", "m/beta", "m/none", "m/gamma"],
        "movie_title" => [Some("Zoo"), Some("Alpha"), Some("Alpha"), Some("Beta"), None, Some("Gamma")],
        "movie_info" => ["z", "a", "a", "b", "n", "g"],
        "content_rating" => [Some("PG-13"), Some("R"), Some("R"), None, Some("G"), Some("NC17")],
        "tomatometer_status" => [Some("Certified-Fresh"), Some("Rotten"), Some("Rotten"), Some("Fresh"), None, None],
        "directors" => [Some("A. Director"), Some("B. Director"), Some("B. Director"), None, Some("X"), Some("C")],
        "runtime" => [Some(101.0), None, None, Some(88.0), Some(90.0), Some(120.0)],
        "original_release_date" => [Some("2010-05-01"), Some("1999-01-01"), Some("1999-01-01"), None, Some("2000-01-01"), Some("bad")],
        "production_company" => [
            Some("Sony Pictures Classics"),
            Some("Sony Pictures Classics, Inc."),
            Some("Sony Pictures Classics, Inc."),
            Some("Sony Pictures Classic"),
            Some("Warner Bros."),
            None
        ]
    ]?;

    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

#[test]
fn test_clean_movies_csv_end_to_end() {
    let dir = test_dir("end_to_end");
    let input = dir.join("movies.csv");
    let output = dir.join("out/movies_clean.csv");
    create_movies_csv(&input).unwrap();

    let pipeline = CleaningPipeline::new(&AppConfig::default()).unwrap();
    let df = read_csv(&input).unwrap();
    let mut outcome = pipeline.run(df).unwrap();
    write_csv(&mut outcome.frame, &output).unwrap();

    let report = &outcome.report;
    assert_eq!(report.input_rows, 6);
    assert_eq!(report.dropped_missing_required, 1);
    assert_eq!(report.dropped_duplicates, 1);
    assert_eq!(report.output_rows, 4);
    // Beta has no date, Gamma's date does not parse
    assert_eq!(report.date_nulls, 1);
    assert_eq!(report.unparseable_dates, 1);

    let cleaned = read_csv(&output).unwrap();
    assert!(cleaned.column("rotten_tomatoes_link").is_err());
    assert!(cleaned.column("movie_info").is_err());

    assert_eq!(
        string_values(&cleaned, "movie_title").unwrap(),
        vec![
            Some("Alpha".to_string()),
            Some("Beta".to_string()),
            Some("Gamma".to_string()),
            Some("Zoo".to_string())
        ]
    );
    assert_eq!(
        string_values(&cleaned, "production_company").unwrap(),
        vec![
            Some("sony classics".to_string()),
            Some("sony classics".to_string()),
            Some("nr".to_string()),
            Some("sony classics".to_string())
        ]
    );
    assert_eq!(
        string_values(&cleaned, "content_rating").unwrap(),
        vec![
            Some("R".to_string()),
            Some("nr".to_string()),
            Some("NC17".to_string()),
            Some("PG-13".to_string())
        ]
    );
    assert_eq!(
        string_values(&cleaned, "original_release_date").unwrap(),
        vec![
            Some("1999-01-01".to_string()),
            Some("1900-01-01".to_string()),
            Some("1900-01-01".to_string()),
            Some("2010-05-01".to_string())
        ]
    );

    let company = report.company.as_ref().unwrap();
    assert_eq!(company.rows, 4);
    assert_eq!(company.missing_rows, 1);
    assert_eq!(company.relabelled_rows, 1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_category_snapping_enabled_from_config_file() {
    let dir = test_dir("snapping");
    let input = dir.join("movies.csv");
    let config_path = dir.join("canon.json");
    create_movies_csv(&input).unwrap();
    fs::write(&config_path, r#"{ "pipeline": { "snap_categories": true } }"#).unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    let pipeline = CleaningPipeline::new(&config).unwrap();
    let outcome = pipeline.run(read_csv(&input).unwrap()).unwrap();

    assert_eq!(
        string_values(&outcome.frame, "content_rating").unwrap(),
        vec![
            Some("r".to_string()),
            Some("nr".to_string()),
            Some("nc17".to_string()),
            Some("pg13".to_string())
        ]
    );
    assert_eq!(
        string_values(&outcome.frame, "tomatometer_status").unwrap(),
        vec![
            Some("rotten".to_string()),
            Some("fresh".to_string()),
            Some("nr".to_string()),
            Some("certified-fresh".to_string())
        ]
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_custom_company_column_from_config_file() {
    let dir = test_dir("config");
    let config_path = dir.join("canon.json");
    fs::write(
        &config_path,
        r#"{
            "canon": { "cutoff": 80, "missing_label": "unknown" },
            "pipeline": { "company_column": "studio", "sort_column": null, "snap_categories": false }
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    let pipeline = CleaningPipeline::new(&config).unwrap();
    let df = df! [
        "movie_title" => ["A", "B", "C"],
        "studio" => [Some("Sony"), Some("Sonny"), None]
    ]
    .unwrap();

    let outcome = pipeline.run(df).unwrap();

    assert_eq!(
        string_values(&outcome.frame, "studio").unwrap(),
        vec![Some("sony".to_string()), Some("sonny".to_string()), Some("unknown".to_string())]
    );

    fs::remove_dir_all(&dir).ok();
}
