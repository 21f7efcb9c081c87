use std::collections::HashSet;

use resi_model::{FieldKind, SCHEMA, TargetField};

#[test]
fn required_fields_listing() {
    let listing = TargetField::required()
        .map(|field| format!("{} -> {}", field.as_str(), field.column()))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    fullName -> full_name
    phoneNumber -> phone_number
    address -> address
    dob -> dob
    gender -> gender
    ");
}

#[test]
fn identifiers_and_columns_are_unique() {
    let ids: HashSet<_> = SCHEMA.iter().map(|spec| spec.id).collect();
    let columns: HashSet<_> = SCHEMA.iter().map(|spec| spec.column).collect();
    assert_eq!(ids.len(), SCHEMA.len());
    assert_eq!(columns.len(), SCHEMA.len());
}

#[test]
fn every_field_has_examples_and_keywords() {
    for spec in &SCHEMA {
        assert!(!spec.examples.is_empty(), "{} has no examples", spec.id);
        assert!(!spec.keywords.is_empty(), "{} has no keywords", spec.id);
        assert!(
            spec.keywords
                .iter()
                .all(|keyword| keyword.chars().all(|c| c.is_ascii_lowercase())),
            "{} keywords must be folded ascii",
            spec.id
        );
    }
}

#[test]
fn kinds_cover_the_typed_fields() {
    assert_eq!(TargetField::Dob.kind(), FieldKind::Date);
    assert_eq!(TargetField::PartyJoinDate.kind(), FieldKind::OptionalDate);
    assert_eq!(TargetField::IsHeadOfHousehold.kind(), FieldKind::Flag);
    assert_eq!(TargetField::Email.kind(), FieldKind::Email);
}

#[test]
fn template_headers_are_upper_cased_examples() {
    assert_eq!(TargetField::FullName.template_header(), "HỌ TÊN");
    assert_eq!(TargetField::PartyJoinDate.template_header(), "NGÀY VÀO ĐẢNG");
    assert_eq!(TargetField::IdentityCard.template_header(), "CCCD");
}
