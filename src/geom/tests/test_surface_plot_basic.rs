use crate::geom::{
    GeomCache, GeomError, Rgb, SurfacePlotOptions, Tolerance, accumulate_vertex_normals, grid_indices,
    mexican_hat, plot_bivariate, plot_bivariate_cached,
};

fn small(resolution: u32) -> SurfacePlotOptions {
    SurfacePlotOptions {
        resolution,
        ..SurfacePlotOptions::default()
    }
}

#[test]
fn mexican_hat_peaks_at_the_centre() {
    assert!(Tolerance::DEFAULT.approx_eq_f64(mexican_hat(0.5, 0.5), 0.5));
    assert!(mexican_hat(0.0, 0.0).abs() < 0.5);
}

#[test]
fn grid_indices_for_one_cell() {
    // v = 1·2 + 1 = 3
    assert_eq!(grid_indices(1).expect("grid"), vec![0, 1, 3, 0, 3, 2]);
}

#[test]
fn grid_indices_reject_resolutions_past_the_u32_range() {
    assert!(grid_indices(0).is_err());
    assert!(matches!(
        grid_indices(65_536),
        Err(GeomError::InvalidParameter { name: "resolution", .. })
    ));
}

#[test]
fn default_plot_has_expected_counts() {
    let mesh = plot_bivariate(mexican_hat, &SurfacePlotOptions::default()).expect("plot");
    assert_eq!(mesh.vertex_count(), 101 * 101);
    assert_eq!(mesh.triangle_count(), 2 * 100 * 100);
    mesh.validate().expect("valid mesh");
}

#[test]
fn plot_vertices_are_row_major_in_y() {
    let mesh = plot_bivariate(|x, y| x + y, &small(4)).expect("plot");
    let tol = Tolerance::DEFAULT;
    let p = mesh.positions[5 + 2];
    assert!(tol.approx_eq_f64(p[0], 0.5));
    assert!(tol.approx_eq_f64(p[1], 0.25));
    assert!(tol.approx_eq_f64(p[2], 0.75));
}

#[test]
fn plot_colours_follow_sign() {
    let mesh = plot_bivariate(|x, _| x - 0.5, &small(2)).expect("plot");
    let colors = mesh.colors.expect("colors");
    assert_eq!(colors[0], Rgb::GREEN.to_array());
    assert_eq!(colors[1], Rgb::GREEN.to_array());
    assert_eq!(colors[2], Rgb::RED.to_array());
}

#[test]
fn flat_plot_normals_point_up() {
    let mesh = plot_bivariate(|_, _| 0.25, &small(3)).expect("plot");
    let tol = Tolerance::DEFAULT;
    for n in mesh.normals.expect("normals") {
        assert!(tol.approx_eq_f64(n[2], 1.0));
    }
}

#[test]
fn normals_are_unit_or_zero() {
    let mesh = plot_bivariate(mexican_hat, &small(20)).expect("plot");
    let tol = Tolerance::new(1e-9);
    for n in mesh.normals.expect("normals") {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!(tol.approx_eq_f64(len, 1.0) || len == 0.0);
    }
}

#[test]
fn degenerate_triangles_do_not_poison_normals() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let normals = accumulate_vertex_normals(&positions, &[0, 1, 2, 0, 1, 3]);
    assert_eq!(normals[2], [0.0, 0.0, 0.0]);
    assert_eq!(normals[3], [0.0, 0.0, 1.0]);
}

#[test]
fn invalid_options_are_rejected() {
    assert!(plot_bivariate(mexican_hat, &small(0)).is_err());
    let empty = SurfacePlotOptions {
        x_range: (1.0, 1.0),
        ..SurfacePlotOptions::default()
    };
    assert!(plot_bivariate(mexican_hat, &empty).is_err());
    assert!(plot_bivariate(|_, _| f64::NAN, &small(2)).is_err());
}

#[test]
fn cached_plot_reuses_grid_indices() {
    let mut cache = GeomCache::new();
    let a = plot_bivariate_cached(mexican_hat, &small(10), &mut cache).expect("a");
    let b = plot_bivariate_cached(|x, y| x * y, &small(10), &mut cache).expect("b");
    assert_eq!(a.indices, b.indices);
    assert_eq!(cache.stats().grid_index_hits, 1);
    assert_eq!(cache.stats().grid_index_entries, 1);
}
