use line_livery::models::{Assignment, Color};
use line_livery::storage;
use std::fs;
use tempfile::tempdir;

fn sample(n: u16) -> Vec<Assignment> {
    (0..n)
        .map(|i| Assignment {
            line: i + 1,
            number: 10 + i,
            color: Color::rgb(0x16, 0xf5, 0xf1 - i as u8),
            name: (i % 2 == 0).then(|| format!("#{} Line", 10 + i)),
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("assignments.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("line,number,color,name"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(&records[0], vec!["1", "10", "#16F5F1", "#10 Line"]);
    // unnamed lines keep an empty name cell
    assert_eq!(&records[1], vec!["2", "11", "#16F5F0", ""]);

    let json_path = dir.path().join("assignments.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.len());
    assert_eq!(v[0]["color"], "#16F5F1");
    assert!(v[1]["name"].is_null());

    let back: Vec<Assignment> = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(back, rows);
}

// Names come from user-editable word lists and district names, so a name like
// "=HYPERLINK(...)" must not turn into a live formula when the CSV is opened.
#[test]
fn csv_names_are_prefixed_to_avoid_formulas() {
    let rows: Vec<Assignment> = ["=HYPERLINK(\"http://evil\")", "+SUM(A1:A9)", "@foo", "-1 Line"]
        .iter()
        .enumerate()
        .map(|(i, name)| Assignment {
            line: i as u16,
            number: 1,
            color: Color::rgb(0, 0, 0),
            name: Some(name.to_string()),
        })
        .collect();

    let dir = tempdir().unwrap();
    let path = dir.path().join("csv_injection.csv");
    storage::save_csv(&rows, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let idx = headers.iter().position(|h| h == "name").expect("name header");
    let names: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(idx).unwrap().to_string())
        .collect();

    assert_eq!(names.len(), rows.len());
    for (name, row) in names.iter().zip(&rows) {
        let original = row.name.as_deref().unwrap();
        assert!(name.starts_with('\''), "not prefixed: {name}");
        assert_eq!(&name[1..], original);
    }
}

#[test]
fn unwritable_path_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    let err = storage::save_csv(&sample(1), &path).unwrap_err();
    assert!(err.to_string().contains("out.csv"), "{err}");
}
