//! End-to-end cluster report: catalog lookup, Galactocentric transform and
//! NEMO unit conversion
use approx::assert_relative_eq;
use gc_stream_core::core_types::KMS_TO_KPC_PER_MYR;
use gc_stream_core::{get_cluster, ClusterCatalog, KilometersPerSecond, SolarMasses};
use std::io::Write;

#[test]
fn test_documented_conversion_examples() {
    assert_relative_eq!(
        KilometersPerSecond::new(100.0).to_kpc_per_myr().value(),
        102.2684,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        SolarMasses::new(5e5).to_nemo_mass().value(),
        5e-5,
        max_relative = 1e-12
    );
}

#[test]
fn test_ngc6569_report() {
    let cluster = get_cluster("NGC6569").unwrap();
    let record = cluster.record();
    let nemo = record.to_nemo_units();

    // Galactic bulge cluster: a few kpc from the centre, just below the plane
    let [x, y, z] = record.position;
    let r = (x.value().powi(2) + y.value().powi(2) + z.value().powi(2)).sqrt();
    assert!(r > 1.0 && r < 5.0, "r = {r}");
    assert!(z.value() < 0.0);

    for (kms, kpc_myr) in record.velocity.iter().zip(&nemo.velocity) {
        assert_relative_eq!(kpc_myr.value(), kms.value() * KMS_TO_KPC_PER_MYR);
    }
    assert_relative_eq!(nemo.mass.value(), 2.3e-5, max_relative = 1e-12);
    assert_eq!(nemo.position, record.position);

    let text = nemo.to_string();
    assert!(text.starts_with("NGC 6569 (NEMO units)"));
    assert!(text.contains("kpc/Myr"));
    assert!(text.ends_with("x 1e10 Msun"));
}

#[test]
fn test_catalog_file_extends_builtin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "ngc104": {{
                "name": "47 Tuc",
                "ra": 6.024, "dec": -72.081, "distance": 4.52,
                "pm_ra_cosdec": 5.252, "pm_dec": -2.551,
                "radial_velocity": -17.45, "mass": 8.95e5,
                "source": "Baumgardt & Vasiliev 2021"
            }}
        }}"#
    )
    .unwrap();

    let mut catalog = ClusterCatalog::builtin();
    assert_eq!(catalog.merge_json_file(file.path()).unwrap(), 1);
    assert_eq!(catalog.ids().last().map(String::as_str), Some("ngc104"));

    let tuc = catalog.cluster("NGC104").unwrap();
    assert_eq!(tuc.name(), "47 Tuc");
    // 47 Tuc sits well below the disk, towards the SMC
    assert!(tuc.galactocentric().pos.z < -2.0);
    assert!(tuc.info().contains("Source: Baumgardt & Vasiliev 2021"));

    let loaded = ClusterCatalog::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, catalog);
}

#[test]
fn test_missing_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = ClusterCatalog::builtin();
    let err = catalog
        .merge_json_file(dir.path().join("missing.json"))
        .unwrap_err();
    assert!(matches!(err, gc_stream_core::CatalogError::Read { .. }));
    assert_eq!(catalog.len(), 3);
}
