use unify_model::{SourceIdentity, StampedField, TargetTable};

fn uk() -> SourceIdentity {
    SourceIdentity {
        id: "UK".to_string(),
        country_code: "UK".to_string(),
        currency: "GBP".to_string(),
        dial_code: None,
    }
}

#[test]
fn stamped_values_come_from_identity() {
    let identity = uk();
    assert_eq!(identity.stamp(StampedField::CountryCode), Some("UK"));
    assert_eq!(identity.stamp(StampedField::SalaryCurrency), Some("GBP"));
    assert_eq!(identity.stamp(StampedField::DialCode), None);

    let with_dial = SourceIdentity {
        dial_code: Some("+44".to_string()),
        ..identity
    };
    assert_eq!(with_dial.stamp(StampedField::DialCode), Some("+44"));
}

#[test]
fn every_stamped_field_is_text() {
    for table in TargetTable::ALL {
        for spec in table.fields().iter().filter(|spec| spec.is_stamped()) {
            assert_eq!(spec.kind.as_str(), "text", "{table}.{}", spec.name);
        }
    }
}

#[test]
fn table_names_parse_back() {
    for table in TargetTable::ALL {
        assert_eq!(table.as_str().parse::<TargetTable>(), Ok(table));
    }
    assert!("orders".parse::<TargetTable>().is_err());
}
