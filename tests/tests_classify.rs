// Released under MIT License.

//! Tests of the classification of a full structure snapshot.

use approx::assert_relative_eq;
use sgrowth::prelude::*;

fn slab_classification(cation: CationKind) -> Classification {
    Classification::builder()
        .structure("tests/files/POSCAR")
        .cation(cation)
        .build()
        .unwrap()
}

#[test]
fn test_classify_sodium_slab() {
    let results = slab_classification(CationKind::Sodium).run().unwrap();

    // two waters: one at the surface, one hydrating the sodium
    assert_eq!(results.water().len(), 2);

    assert_eq!(results.water_contacts().len(), 1);
    let contact = &results.water_contacts()[0];
    assert_eq!(contact.group().central_atom(), 2);
    assert_eq!(contact.closest_hydrogen(), 4);
    assert_eq!(contact.closest_surface_atom(), 0);
    assert_relative_eq!(contact.distance(), 2.0);

    // monoatomic cations are never surface-classified
    assert!(results.cation_contacts().is_empty());

    assert_eq!(results.in_shell().len(), 1);
    let shell = &results.in_shell()[0];
    assert_eq!(shell.water().central_atom(), 3);
    assert_relative_eq!(shell.cation_distance(), 2.0);

    assert_eq!(results.out_of_shell().len(), 1);
    assert_eq!(results.out_of_shell()[0].water().central_atom(), 2);
}

#[test]
fn test_classify_from_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("classify.json");
    std::fs::write(
        &config,
        r#"{
            "structure": "tests/files/POSCAR",
            "cation": "Na",
            "thresholds": { "hydration_shell": 1.5 }
        }"#,
    )
    .unwrap();

    let classification = Classification::from_file(&config).unwrap();
    let results = classification.run().unwrap();

    // the tightened shell threshold excludes the hydrating water
    assert!(results.in_shell().is_empty());
    assert_eq!(results.out_of_shell().len(), 2);
}

#[test]
fn test_classify_missing_structure_file() {
    let classification = Classification::builder()
        .structure("tests/files/definitely_not_here")
        .cation(CationKind::Sodium)
        .build()
        .unwrap();

    assert!(classification.run().is_err());
}
