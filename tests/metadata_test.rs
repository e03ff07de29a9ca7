use mail_metadata::*;
use std::cell::RefCell;

const REFERENCES: &[u8] = include_bytes!("fixtures/email_with_references.eml");
const WITH_ATTACHMENT: &[u8] = include_bytes!("fixtures/email_with_email_attachment.eml");

#[derive(Default)]
struct RecordingLogger {
    warnings: RefCell<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

fn assert_common_fields(record: &MetadataRecord) {
    assert_eq!(
        record.message_id.as_deref(),
        Some("B63CAA43-F378-4033-BA8B-ED408805B5B5@empire42.com")
    );
    assert_eq!(record.sent_at.as_deref(), Some("2010-04-21T14:43:24+01:00"));
    assert_eq!(
        record.in_reply_to.as_deref(),
        Some("B63CAA43-F378-4033-BA8B-foo@empire42.com")
    );
    assert_eq!(
        record.references,
        Some(vec![
            "B63CAA43-F378-4033-BA8B-foo@empire42.com".to_string(),
            "B63CAA43-F378-4033-BA8B-bar@empire42.com".to_string(),
            "B63CAA43-F378-4033-BA8B-baz@empire42.com".to_string(),
        ])
    );
    assert_eq!(
        record.from,
        Some(NormalizedAddress::new(
            Some("Peter MacRobert"),
            "peter.macrobert@empire42.com"
        ))
    );
    assert_eq!(
        record.sender,
        Some(NormalizedAddress::new(None, "foo@bar.com"))
    );
    assert_eq!(
        record.to,
        vec![
            NormalizedAddress::new(None, "foo@bar.com"),
            NormalizedAddress::new(Some("bar mcbar"), "bar.mcbar@bar.com"),
        ]
    );
    assert!(record.cc.is_empty());
    assert!(record.bcc.is_empty());
}

#[test]
fn test_mail_to_hash_excluding_subject() {
    let record = Extractor::new().mail_to_hash(REFERENCES, true).unwrap();

    assert_common_fields(&record);
    assert_eq!(record.subject, None);
}

#[test]
fn test_mail_to_hash_including_subject() {
    let record = Extractor::new().mail_to_hash(REFERENCES, false).unwrap();

    assert_common_fields(&record);
    assert_eq!(record.subject, Some(Some("Test email".to_string())));
}

#[test]
fn test_mail_to_hash_from_parsed_message() {
    let message = Message::parse(REFERENCES).unwrap();

    let record = Extractor::new().mail_to_hash(&message, true).unwrap();

    assert_common_fields(&record);
}

#[test]
fn test_json_key_order_without_subject() {
    let record = Extractor::new().mail_to_hash(REFERENCES, true).unwrap();
    let json = record.to_json().unwrap();

    let keys = [
        "\"message_id\"",
        "\"sent_at\"",
        "\"in_reply_to\"",
        "\"references\"",
        "\"from\"",
        "\"sender\"",
        "\"to\"",
        "\"cc\"",
        "\"bcc\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!json.contains("\"subject\""));
    assert!(json.contains("\"cc\":[]"));
    assert!(json.contains("\"bcc\":[]"));
}

#[test]
fn test_json_subject_last_when_kept() {
    let record = Extractor::new().mail_to_hash(REFERENCES, false).unwrap();
    let json = record.to_json().unwrap();

    assert!(json.ends_with(",\"subject\":\"Test email\"}"));
}

#[test]
fn test_missing_fields_are_null() {
    let record = Extractor::new()
        .mail_to_hash(b"X-Nothing: here\r\n\r\nbody", false)
        .unwrap();
    let value = record.to_value().unwrap();

    for key in [
        "message_id",
        "sent_at",
        "in_reply_to",
        "references",
        "from",
        "sender",
        "subject",
    ] {
        assert!(value[key].is_null(), "{key} should be null");
    }
    for key in ["to", "cc", "bcc"] {
        assert_eq!(value[key], serde_json::json!([]), "{key} should be empty");
    }
    assert_eq!(value.as_object().unwrap().len(), 10);
}

#[test]
fn test_empty_cc_and_bcc_headers() {
    let raw = b"To: a@x.com\r\nCc:\r\nBcc:\r\n\r\nbody";

    let record = Extractor::new().mail_to_hash(raw, true).unwrap();

    assert!(record.cc.is_empty());
    assert!(record.bcc.is_empty());
}

#[test]
fn test_undisclosed_recipients_group() {
    let raw = b"To: undisclosed-recipients:;\r\nBcc: team: a@x.com, b@x.com;\r\n\r\n";

    let record = Extractor::new().mail_to_hash(raw, true).unwrap();

    assert!(record.to.is_empty());
    let bcc: Vec<_> = record.bcc.iter().map(|a| a.email_address.as_str()).collect();
    assert_eq!(bcc, vec!["a@x.com", "b@x.com"]);
}

#[test]
fn test_malformed_recipient_skipped_and_logged() {
    let raw = b"From: \"foo mcfoo\" <foo@bar.com>\r\n\
                To: \"baz mcbaz\" <<baz@boo.com>, bar@bar.com\r\n\
                \r\n";
    let extractor = Extractor::with_logger(RecordingLogger::default());

    let record = extractor.mail_to_hash(raw, true).unwrap();

    assert_eq!(record.to, vec![NormalizedAddress::new(None, "bar@bar.com")]);
    assert_eq!(extractor.logger().warnings.borrow().len(), 1);
}

#[test]
fn test_encoded_names_with_commas() {
    let raw = b"From: =?UTF-8?Q?M=C3=BCller=2C_Hans?= <hans@x.com>\r\n\
                To: =?UTF-8?Q?Doe=2C_John?= <john@x.com>, jane@x.com\r\n\
                \r\n\
                body";
    let extractor = Extractor::with_logger(RecordingLogger::default());

    let record = extractor.mail_to_hash(raw, true).unwrap();

    assert_eq!(
        record.from,
        Some(NormalizedAddress::new(Some("M\u{fc}ller, Hans"), "hans@x.com"))
    );
    assert_eq!(
        record.to,
        vec![
            NormalizedAddress::new(Some("Doe, John"), "john@x.com"),
            NormalizedAddress::new(None, "jane@x.com"),
        ]
    );
    assert!(extractor.logger().warnings.borrow().is_empty());
}

#[test]
fn test_rejected_header_parsed_entry_by_entry() {
    let raw = b"To: foo, bar@x.com\r\n\r\n";
    let extractor = Extractor::with_logger(RecordingLogger::default());

    let record = extractor.mail_to_hash(raw, true).unwrap();

    assert_eq!(record.to, vec![NormalizedAddress::new(None, "bar@x.com")]);
    let warnings = extractor.logger().warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("failure parsing: foo: "));
}

#[test]
fn test_utc_date() {
    let raw = b"Date: Thu, 01 Jan 2025 12:00:00 +0000\r\n\r\n";

    let record = Extractor::new().mail_to_hash(raw, true).unwrap();

    assert_eq!(record.sent_at.as_deref(), Some("2025-01-01T12:00:00+00:00"));
}

#[test]
fn test_lenient_date_falls_back_to_utc() {
    // Obsolete two-digit year with a named zone
    let raw = b"Date: 21 Apr 10 14:43:24 GMT\r\n\r\n";

    let record = Extractor::new().mail_to_hash(raw, true).unwrap();

    assert_eq!(record.sent_at.as_deref(), Some("2010-04-21T14:43:24+00:00"));
}

#[test]
fn test_invalid_date_is_an_error() {
    let raw = b"Date: not a date\r\n\r\n";

    let err = Extractor::new().mail_to_hash(raw, true).unwrap_err();

    assert!(matches!(err, ParseError::InvalidDate(_)));
}

#[test]
fn test_unwrap_then_project() {
    let extractor = Extractor::new();
    let message = extractor
        .extract_journalled_mail(WITH_ATTACHMENT, true)
        .unwrap();

    let record = extractor.mail_to_hash(&message, false).unwrap();

    assert_eq!(
        record.message_id.as_deref(),
        Some("0FDFBAF6-0960-40FB-B730-B0C7C3299948@empire42.com")
    );
    assert_eq!(record.sent_at.as_deref(), Some("2010-04-21T14:43:24+01:00"));
    assert_eq!(record.to, vec![NormalizedAddress::new(None, "foo@bar.com")]);
    assert_eq!(record.subject, Some(Some("Quarterly figures".to_string())));
}
