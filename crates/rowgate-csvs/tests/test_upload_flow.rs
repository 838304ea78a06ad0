use rowgate_csvs::{
    template_header, validate_rows, write_template, AcceptAll, BatchRules, ColumnRule, FileInput,
    IntakeSettings, JsonRowsFile, Row, UploadSession, ValidationOutcome, ValueCheck,
};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

fn people_rules() -> Vec<ColumnRule> {
    vec![
        ColumnRule::required("id").with_validator(ValueCheck::Integer.compile().unwrap()),
        ColumnRule::required("name"),
        ColumnRule::optional("status").with_validator(
            ValueCheck::OneOf {
                values: vec!["active".into(), "inactive".into()],
                case_insensitive: true,
            }
            .compile()
            .unwrap(),
        ),
    ]
}

#[test]
fn test_required_scenario() {
    let rules = vec![ColumnRule::required("id")];
    let rows: Vec<Row> = vec![
        [("id", "1")].into_iter().collect(),
        [("id", "")].into_iter().collect(),
    ];

    let outcome = validate_rows(&rows, &rules, &AcceptAll);
    assert_eq!(
        outcome,
        ValidationOutcome::Rejected(vec!["Row 3: Missing required field \"id\".".into()])
    );
}

#[test]
fn test_invalid_value_scenario() {
    let rules = vec![ColumnRule::optional("age").with_validator(ValueCheck::Integer.compile().unwrap())];
    let rows: Vec<Row> = vec![[("age", "abc")].into_iter().collect()];

    let outcome = validate_rows(&rows, &rules, &AcceptAll);
    assert_eq!(outcome.errors(), &["Row 2: Invalid value in \"age\".".to_string()]);
    assert!(outcome.rows().is_empty());
}

#[test]
fn test_template_scenario() {
    let rules = vec![ColumnRule::optional("id"), ColumnRule::optional("age")];
    assert_eq!(template_header(&rules), "id,age");

    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path(), &rules).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "id,age");
}

#[test]
fn test_end_to_end_accept_then_reload() {
    let dir = TempDir::new().unwrap();
    let store = JsonRowsFile::new(dir.path().join("accepted.json"));
    let saved = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&saved);
    let callback_store = store.clone();

    let mut session = UploadSession::new(people_rules())
        .unwrap()
        .with_batch_check(BatchRules {
            unique: vec!["id".into()],
            ..Default::default()
        })
        .on_accept(move |rows| {
            *sink.borrow_mut() = Some(callback_store.save(rows).is_ok());
        });

    let csv = "id,name,status\n1,Ann,Active\n2,Bo,\n3,Cy,inactive\n4,Di,active\n5,Ed,active\n6,Flo,active\n";
    let state = session.upload(FileInput::new("people.csv", csv));
    assert!(state.is_accepted(), "errors: {:?}", state.errors);
    assert_eq!(state.rows.len(), 6);
    assert_eq!(*saved.borrow(), Some(true));

    assert!(session.set_rows_per_page(5));
    session.set_page(1);
    let visible = session.state().visible_rows();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].get("name"), Some("Flo"));

    let mut viewer = UploadSession::new(people_rules()).unwrap();
    let state = viewer.load_previous(&store);
    assert_eq!(state.rows.len(), 6);
    assert_eq!(state.rows[0].get("status"), Some("Active"));
}

#[test]
fn test_mixed_file_rejects_every_row() {
    let mut session = UploadSession::new(people_rules()).unwrap();

    let csv = "id,name,status\n1,Ann,active\nx,,gone\n3,Cy,active\n";
    let state = session.upload(FileInput::new("people.csv", csv));
    assert_eq!(
        state.errors,
        vec![
            "Row 3: Invalid value in \"id\".".to_string(),
            "Row 3: Missing required field \"name\".".to_string(),
            "Row 3: Invalid value in \"status\".".to_string(),
        ]
    );
    assert!(state.rows.is_empty());
}

#[test]
fn test_size_rejection_is_separate_from_errors() {
    let mut session = UploadSession::new(people_rules())
        .unwrap()
        .with_settings(IntakeSettings::with_max_file_size_mb(1));

    let big = format!("id,name\n{}", "1,Ann\n".repeat(200_000));
    let state = session.upload(FileInput::new("people.csv", big));
    assert_eq!(
        state.rejection.as_deref(),
        Some("File size exceeds the maximum limit of 1 MB.")
    );
    assert!(state.errors.is_empty());
    assert!(state.rows.is_empty());
}
