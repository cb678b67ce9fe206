//! Integration tests for field rules loaded from rule sets.

use ocr_tables::config::RuleSet;
use ocr_tables::document::{Document, GridPosition, Page, Token};
use ocr_tables::geometry::BoundingBox;
use ocr_tables::Error;

fn invoice() -> Document {
    let mut doc = Document::new(Page::new(1000.0, 1400.0));
    let lines = [
        ("CUIT: 30-71234567-8", 50.0, 80.0),
        ("IVA: Responsable Inscripto", 50.0, 120.0),
        ("Fecha de Emision: 10/04/2024", 600.0, 80.0),
        ("CUIT: 20-12345678-9", 50.0, 500.0),
        ("IVA: Consumidor Final", 50.0, 540.0),
        ("CAE Vto: 20/04/2024", 600.0, 1300.0),
    ];
    for (text, x, y) in lines {
        let bbox = BoundingBox::from_coords(x, y, x + 300.0, y + 20.0);
        doc.grid
            .insert(GridPosition::new(x as i64, y as i64), Token::new(text, bbox))
            .unwrap();
    }
    doc
}

#[test]
fn test_provider_and_client_fields() {
    let rules = RuleSet::from_json(
        r#"{
            "fields": [
                { "label": "cuitProveedor", "pattern": "CUIT: ([0-9-]+)", "filter": { "name": "topFirst" } },
                { "label": "cuitCliente", "pattern": "CUIT: ([0-9-]+)", "filter": { "name": "bottomFirst" } },
                { "label": "fechas", "pattern": "([0-9]{2}/[0-9]{2}/[0-9]{4})" },
                {
                    "label": "ivaProveedor",
                    "pattern": "IVA: (.*)",
                    "filter": {
                        "name": "section",
                        "coordinates": {
                            "begin": "beginOfDocument",
                            "end": {
                                "x": "endOfDocument",
                                "y": { "type": "relative", "to": "endOfDocument", "percentage": 20 }
                            }
                        }
                    }
                }
            ]
        }"#,
    )
    .unwrap();

    let doc = invoice();
    let result = rules.compile(&doc.page).unwrap().apply(&doc);

    assert_eq!(result.fields["cuitProveedor"], vec!["30-71234567-8"]);
    assert_eq!(result.fields["cuitCliente"], vec!["20-12345678-9"]);
    assert_eq!(result.fields["fechas"], vec!["10/04/2024", "20/04/2024"]);
    assert_eq!(result.fields["ivaProveedor"], vec!["Responsable Inscripto"]);

    let labels: Vec<&str> = result.fields.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["cuitProveedor", "cuitCliente", "fechas", "ivaProveedor"]);
}

#[test]
fn test_unmatched_field_is_empty() {
    let rules = RuleSet::from_json(r#"{ "fields": [ { "label": "remito", "pattern": "Remito: (.*)" } ] }"#)
        .unwrap();
    let doc = invoice();
    let result = rules.compile(&doc.page).unwrap().apply(&doc);
    assert!(result.fields["remito"].is_empty());
}

#[test]
fn test_invalid_definitions_fail_at_compile() {
    let page = Page::new(100.0, 100.0);

    let bad_regex = RuleSet::from_json(r#"{ "fields": [ { "label": "x", "pattern": "([0-9]" } ] }"#).unwrap();
    assert!(matches!(bad_regex.compile(&page), Err(Error::InvalidPattern { .. })));

    let bad_section = RuleSet::from_json(
        r#"{ "fields": [ { "label": "x", "pattern": "(x)", "filter": {
            "name": "section",
            "coordinates": { "begin": "beginOfDocument", "end": "middleOfDocument" }
        } } ] }"#,
    )
    .unwrap();
    assert!(matches!(bad_section.compile(&page), Err(Error::InvalidRule { .. })));
}
