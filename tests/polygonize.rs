use levelset::compile::{compile_formulas, presets_3d};
use levelset::mesh::{polygonize_3d, PolygonizeOptions, Polygonizer};

#[test]
fn test_torus() {
    // distance from the unit circle in the xy plane, offset by the minor
    // radius
    let batch = compile_formulas(
        &["hypot(hypot(x,y)-1,z)=1/3"],
        &["x", "y", "z"],
        presets_3d(),
    );
    let result = &batch.results[0];
    assert!(result.error.is_none());
    let options = PolygonizeOptions {
        max_resolution: 64,
        ..PolygonizeOptions::default()
    };
    let surface =
        polygonize_3d(&batch.context, result.node.unwrap(), options).unwrap();
    assert!(surface.triangle_count() > 0);
    for v in surface.positions.chunks_exact(3) {
        let h = f64::from(v[0]).hypot(f64::from(v[1])) - 1.0;
        let d = h.hypot(f64::from(v[2]));
        assert!(
            (d - 1.0 / 3.0).abs() < 0.05,
            "vertex {v:?} off the torus: {d}"
        );
    }
}

#[test]
fn test_snapshot_resolutions_double() {
    let batch = compile_formulas(&["r=1"], &["x", "y", "z"], presets_3d());
    let node = batch.results[0].node.unwrap();
    let options = PolygonizeOptions {
        max_resolution: 64,
        ..PolygonizeOptions::default()
    };
    let mut p =
        Polygonizer::new(&batch.context, node, ["x", "y", "z"], options)
            .unwrap();
    let mut resolutions = Vec::new();
    while let Some(s) = p.step() {
        resolutions.push(s.resolution);
    }
    assert_eq!(resolutions, [8, 16, 32, 64]);
}
