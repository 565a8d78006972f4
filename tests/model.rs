//! Running the meteorology component inside a [`Model`].

use ndarray::array;
use snowmet::prelude::*;

fn build_model() -> Model {
    let mut builder = ModelBuilder::new(3)
        .with_field(VAR_AIR_TEMPERATURE.name, array![1.0, 1.0, 2.0])
        .unwrap()
        .with_field(VAR_SURFACE_TEMPERATURE.name, array![-1.0, 1.0, -2.0])
        .unwrap()
        .with_field(VAR_LATITUDE.name, array![40.0, 40.0, 45.0])
        .unwrap()
        .with_field(VAR_LONGITUDE.name, array![-105.0, -105.0, -110.0])
        .unwrap();

    let config = MeteorologyConfig::new("2023-01-01 12:00:00").with_gmt_offset(-7.0);
    let meteorology = Meteorology::new(builder.fields_mut(), config).unwrap();
    builder.with_component(Box::new(meteorology)).build().unwrap()
}

#[test]
fn test_model_runs_meteorology() {
    let mut model = build_model();
    assert_eq!(model.fields().len(), 17);

    model.run(2, 3600.0).unwrap();
    assert_eq!(model.step_count(), 2);
    assert_eq!(model.elapsed(), 7200.0);
    assert_eq!(model.fields().len(), 35);

    let q_h = model.get(VAR_SENSIBLE_HEAT_FLUX.name).unwrap();
    assert_eq!(q_h[1], 0.0);
    assert!(q_h[0] > 0.0);
}

#[test]
fn test_model_requires_drivers() {
    let mut builder = ModelBuilder::new(1)
        .with_field(VAR_AIR_TEMPERATURE.name, array![1.0])
        .unwrap()
        .with_field(VAR_SURFACE_TEMPERATURE.name, array![-1.0])
        .unwrap()
        .with_field(VAR_LATITUDE.name, array![40.0])
        .unwrap()
        .with_field(VAR_LONGITUDE.name, array![-105.0])
        .unwrap();
    let meteorology = Meteorology::new(
        builder.fields_mut(),
        MeteorologyConfig::new("2023-01-01 12:00:00"),
    )
    .unwrap();

    // Drivers dropped after construction are reported when the model is built
    builder.fields_mut().remove(VAR_LATITUDE.name);
    let err = builder
        .with_component(Box::new(meteorology))
        .build()
        .unwrap_err();
    assert_eq!(err, SnowMetError::MissingField(VAR_LATITUDE.name.to_string()));
}

#[test]
fn test_model_toml_roundtrip() {
    let mut model = build_model();
    model.run_one_step(3600.0).unwrap();

    let serialised = toml::to_string(&model).unwrap();
    let mut restored: Model = toml::from_str(&serialised).unwrap();

    assert_eq!(restored.step_count(), 1);
    assert_eq!(restored.components().len(), 1);
    assert_eq!(restored.fields().names(), model.fields().names());

    // The restored clock carries on from where the original stopped
    model.run_one_step(3600.0).unwrap();
    restored.run_one_step(3600.0).unwrap();
    let expected = model.get(VAR_NET_ENERGY_FLUX.name).unwrap();
    let actual = restored.get(VAR_NET_ENERGY_FLUX.name).unwrap();
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{} vs {}", a, e);
    }
}
