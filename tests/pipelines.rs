//! Integration tests for the four scrubbers
//!
//! Each test runs a full pipeline on a fixture from `testdata/` and checks
//! the files it writes.

use chrono::NaiveDate;
use contact_scrubber::error::ScrubError;
use contact_scrubber::pipeline::{
    EmailOptions, LogMatchOptions, PartitionOptions, SmsOptions, run_email_pipeline,
    run_log_match, run_partition, run_sms_pipeline,
};
use std::path::{Path, PathBuf};

const ANN_ID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("output file exists")
        .lines()
        .map(str::to_owned)
        .collect()
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

#[test]
fn test_email_scrub_end_to_end() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = EmailOptions::new(7, "Spring").with_run_date(run_date());

    let report = run_email_pipeline(&fixture("email_contacts.csv"), out.path(), &options)
        .expect("email scrub succeeds");

    assert_eq!(report.output_path, out.path().join("Spring_mass_email.csv"));
    assert_eq!(report.rows_before, 3);
    assert_eq!(report.rows_after, 3);
    assert_eq!(
        report.columns,
        vec!["InsertGroup", "GroupName", "person_id", "first", "last", "Email", "DOB"]
    );
    // "March 5" cannot be read and is left empty
    assert_eq!(report.warnings.len(), 1);

    assert_eq!(
        read_lines(&report.output_path),
        vec![
            "InsertGroup,GroupName,person_id,first,last,Email,DOB".to_owned(),
            format!("7,Spring,{ANN_ID},Ann,Lee,ann@example.com,1999-03-05"),
            "7,Spring,,Bo,Kim,bo@example.com,2024-03-05".to_owned(),
            "7,Spring,,Cy,Day,cy@example.com,".to_owned(),
        ]
    );
}

#[test]
fn test_email_scrub_with_only_an_email_column() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("minimal.csv");
    std::fs::write(&input, "Email\nann@example.com\n").expect("write input");

    let report = run_email_pipeline(&input, dir.path(), &EmailOptions::new(1, "Minimal"))
        .expect("missing optional columns are skipped");

    assert_eq!(report.columns, vec!["InsertGroup", "GroupName", "Email"]);
    assert!(report.warnings.is_empty());
    assert_eq!(
        read_lines(&report.output_path),
        vec!["InsertGroup,GroupName,Email", "1,Minimal,ann@example.com"]
    );
}

#[test]
fn test_email_scrub_unreadable_input_writes_nothing() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = EmailOptions::new(7, "Spring");

    let err = run_email_pipeline(&out.path().join("absent.csv"), out.path(), &options)
        .expect_err("missing input must fail");

    assert!(matches!(err, ScrubError::Read { .. }));
    assert!(!out.path().join("Spring_mass_email.csv").exists());
}

#[test]
fn test_sms_scrub_sets_invalid_ids_aside() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = SmsOptions::new(12, "Fall").with_run_date(run_date());

    let outcome = run_sms_pipeline(&fixture("sms_contacts.csv"), out.path(), &options)
        .expect("sms scrub succeeds");

    assert!(!outcome.relaxed_read);
    assert_eq!(outcome.invalid_rows, 1);
    assert_eq!(outcome.report.rows_before, 3);
    assert_eq!(outcome.report.rows_after, 2);

    let side_file = outcome.invalid_path.expect("side file written");
    assert_eq!(side_file, out.path().join("Fall-invalid-data-2024-03-05.csv"));
    assert_eq!(
        read_lines(&side_file),
        vec![
            "Last Name,First Name,Phone,Date of Birth,Person_id,Medicaid Number,InsertGroup,GroupName",
            "Kim,Bo,555.987.6543,1/2/2003,bad-id,0099,,",
        ]
    );

    assert_eq!(
        read_lines(&outcome.report.output_path),
        vec![
            "first,last,DOB,cell_phone,InsertGroup,GroupName,mem_nbr,person_id".to_owned(),
            format!("Ann,Lee,1945-03-05,5551234567,12,Fall,0012345,{ANN_ID}"),
            "Cy,Day,Invalid date format: Original String someday,5552223333,12,Fall,0100,6fa459ea-ee8a-3ca4-894e-db77e160355e".to_owned(),
        ]
    );
}

#[test]
fn test_sms_scrub_without_id_column_keeps_all_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("no_ids.csv");
    std::fs::write(&input, "First Name,Phone\nAnn,1-555-123-4567\nBo,555 987 6543\n")
        .expect("write input");

    let outcome = run_sms_pipeline(&input, dir.path(), &SmsOptions::new(3, "NoIds"))
        .expect("sms scrub succeeds");

    assert!(outcome.invalid_path.is_none());
    assert_eq!(outcome.invalid_rows, 0);
    assert_eq!(
        read_lines(&outcome.report.output_path),
        vec![
            "first,cell_phone,InsertGroup,GroupName",
            "Ann,5551234567,3,NoIds",
            "Bo,5559876543,3,NoIds",
        ]
    );
}

#[test]
fn test_sms_scrub_retries_ragged_input() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = SmsOptions::new(1, "Ragged");

    let outcome = run_sms_pipeline(&fixture("sms_ragged.csv"), out.path(), &options)
        .expect("relaxed read recovers");

    assert!(outcome.relaxed_read);
    assert_eq!(outcome.report.rows_after, 2);
}

#[test]
fn test_log_match_normalizes_both_sides() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = LogMatchOptions::new(
        fixture("delivery_contacts.csv"),
        fixture("delivery_log.csv"),
    )
    .with_output_dir(out.path());

    let report = run_log_match(&options).expect("match succeeds");

    assert_eq!(report.contacts, 3);
    assert_eq!(report.log_entries, 4);
    assert_eq!(report.sent, 2);
    assert_eq!(
        read_lines(&report.output_path),
        vec![
            "first,cell_phone,f_sent",
            "Ann,5551234567,1",
            // the later "sent" row overrides the earlier "failed"
            "Bo,(555) 000-1111,1",
            "Cy,5552223333,0",
        ]
    );
}

#[test]
fn test_log_match_keeps_leading_one_on_ten_digit_numbers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let contacts = dir.path().join("contacts.csv");
    let log = dir.path().join("log.csv");
    std::fs::write(&contacts, "first,cell_phone\nAnn,1234567890\n").expect("write contacts");
    std::fs::write(&log, "To,Status\n+11234567890,sent\n").expect("write log");

    let options = LogMatchOptions::new(&contacts, &log).with_output_dir(dir.path());
    let report = run_log_match(&options).expect("match succeeds");

    assert_eq!(report.sent, 1);
    assert_eq!(
        read_lines(&report.output_path),
        vec!["first,cell_phone,f_sent", "Ann,1234567890,1"]
    );
}

#[test]
fn test_log_match_with_precomputed_keys() {
    let dir = tempfile::tempdir().expect("temp dir");
    let contacts = dir.path().join("log1.csv");
    let log = dir.path().join("log2.csv");
    std::fs::write(&contacts, "first,To_norm\nAnn,5551234567\nBo,5550001111\n")
        .expect("write contacts");
    std::fs::write(&log, "Recipients,Status\n5551234567,undelivered\n5550001111,DELIVERED\n")
        .expect("write log");

    let options = LogMatchOptions::new(&contacts, &log)
        .with_schema(Default::default(), true)
        .with_output_dir(dir.path());
    let report = run_log_match(&options).expect("match succeeds");

    assert_eq!(report.sent, 1);
    assert_eq!(
        read_lines(&report.output_path),
        vec!["first,f_sent", "Ann,0", "Bo,1"]
    );
}

#[test]
fn test_log_match_reports_missing_key_column() {
    let out = tempfile::tempdir().expect("temp dir");
    let options = LogMatchOptions::new(
        fixture("delivery_contacts.csv"),
        fixture("delivery_log.csv"),
    )
    .with_schema(Default::default(), true)
    .with_output_dir(out.path());

    let err = run_log_match(&options).expect_err("contacts have no To_norm column");

    match err {
        ScrubError::MissingColumn { column, .. } => assert_eq!(column, "To_norm"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.path().join("result.csv").exists());
}

#[test]
fn test_partition_end_to_end() {
    let out = tempfile::tempdir().expect("temp dir");
    let options =
        PartitionOptions::new(fixture("partition_contacts.csv")).with_output_dir(out.path());

    let report = run_partition(&options).expect("partition succeeds");

    assert_eq!(
        (report.total, report.duplicates, report.missing_id, report.unique),
        (5, 2, 1, 2)
    );
    assert_eq!(
        read_lines(&out.path().join("duplicates.csv")),
        vec![
            "Name,Phone,Medicaid Number",
            "B,5551234567,M2",
            "E,5551234567,M5",
        ]
    );
    assert_eq!(
        read_lines(&out.path().join("noNumber.csv")),
        vec!["Name,Phone,Medicaid Number", "C,5550000002,"]
    );
    assert_eq!(
        read_lines(&out.path().join("unique_phones.csv")),
        vec![
            "Name,Phone,Medicaid Number",
            "A,5550000001,M1",
            "D,5550000003,M4",
        ]
    );
    assert_eq!(
        report.summary_lines("Medicaid Number")[2],
        "Records with missing Medicaid Number: 1"
    );
}

#[test]
fn test_partition_requires_id_column() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("old.csv");
    std::fs::write(&input, "Name,Phone\nA,1\n").expect("write input");

    let err = run_partition(&PartitionOptions::new(&input).with_output_dir(dir.path()))
        .expect_err("id column is required");

    assert!(matches!(err, ScrubError::MissingColumn { column, .. } if column == "Medicaid Number"));
}
