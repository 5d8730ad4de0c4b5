#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod scene;
pub mod sim;

use std::fmt;

use geom::{
    ControlPointId, GeomCache, GeomMesh, Point2, Point3, SurfacePlotOptions, Transform,
    generate_sphere, mexican_hat, plot_bivariate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scene::{
    Axis, BezierEditor, CameraCommand, ModelRotation, OrthoBounds, QuaternionCamera, canvas_to_ndc,
};
use serde::Serialize;
use sim::{
    BOB_CENTER, BOB_RADIUS, BOB_SIDES, ChaosGame, OrbitClock, OrbitSpeed, OrbitalSystem,
    Pendulum, PendulumConfig, Rotator, StarfieldOptions, bob_fan, starfield,
};
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Sphere resolution used for every demo body.
const DEMO_SPHERE_BANDS: u32 = 30;

#[derive(Debug, Serialize)]
struct MeshExport {
    positions: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colors: Option<Vec<f32>>,
    indices: Vec<u32>,
}

impl From<&GeomMesh> for MeshExport {
    fn from(mesh: &GeomMesh) -> Self {
        Self {
            positions: mesh.positions_f32(),
            normals: mesh.normals_f32(),
            colors: mesh.colors_flat().map(geom::to_f32),
            indices: mesh.indices.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bezier editor
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct BezierDemo {
    editor: BezierEditor,
    view: OrthoBounds,
    rotation: ModelRotation,
    cache: GeomCache,
    rng: StdRng,
}

impl Default for BezierDemo {
    fn default() -> Self {
        Self::new(None)
    }
}

#[wasm_bindgen]
impl BezierDemo {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(seed: Option<u64>) -> BezierDemo {
        BezierDemo {
            editor: BezierEditor::default(),
            view: OrthoBounds::default(),
            rotation: ModelRotation::default(),
            cache: GeomCache::new(),
            rng: make_rng(seed),
        }
    }

    /// Starts a drag at canvas pixel `(px, py)`; returns the picked point
    /// index or `undefined`.
    pub fn pointer_down(&mut self, px: f64, py: f64, width: f64, height: f64) -> Option<usize> {
        let world = self.canvas_to_world(px, py, width, height)?;
        let picked = self.editor.begin_drag(world.x, world.y);
        debug_log!("bezier pointer_down at ({}, {}) picked {:?}", world.x, world.y, picked);
        picked.map(ControlPointId::index)
    }

    /// Returns true when a point moved and the buffers need re-uploading.
    pub fn pointer_move(&mut self, px: f64, py: f64, width: f64, height: f64) -> bool {
        match self.canvas_to_world(px, py, width, height) {
            Some(world) => self.editor.drag_to(world.x, world.y),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.editor.end_drag();
    }

    pub fn set_point(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        let id = ControlPointId::from_index(index)
            .ok_or_else(|| js_error(&format!("control point index {index} out of range")))?;
        self.editor
            .set_point(id, Point3::new(x, y, z))
            .map_err(to_js_error)
    }

    pub fn reset(&mut self) {
        self.editor.reset();
    }

    pub fn randomize_colors(&mut self) {
        self.editor.randomize_colors(&mut self.rng);
    }

    pub fn recolor(&mut self) {
        self.editor.recolor(&mut self.rng);
    }

    #[must_use]
    pub fn curve_vertices(&self) -> Vec<f32> {
        self.editor.curve_vertices()
    }

    #[must_use]
    pub fn curve_vertex_count(&self) -> usize {
        self.editor.curve_vertex_count()
    }

    #[must_use]
    pub fn tangent_vertices(&self) -> Vec<f32> {
        self.editor.tangent_vertices()
    }

    /// Flat `[x, y, z]` for the seven control points.
    #[must_use]
    pub fn control_points(&self) -> Vec<f32> {
        let flat: Vec<f64> = self
            .editor
            .chain()
            .points()
            .iter()
            .flat_map(|p| p.to_array())
            .collect();
        geom::to_f32(&flat)
    }

    /// Shrinks the view box by one step; false once it cannot shrink further.
    pub fn zoom_in(&mut self) -> bool {
        self.view.zoom_in()
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset();
    }

    /// Rotates the model one step about `axis` (`"x"`, `"y"` or `"z"`).
    pub fn rotate(&mut self, axis: &str, positive: bool) -> Result<(), JsValue> {
        let axis =
            Axis::from_name(axis).ok_or_else(|| js_error(&format!("unknown axis `{axis}`")))?;
        self.rotation.nudge(axis, positive);
        Ok(())
    }

    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
    }

    #[must_use]
    pub fn model_matrix(&self) -> Vec<f32> {
        matrix_f32(self.rotation.transform()).to_vec()
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Vec<f32> {
        matrix_f32(self.view.projection()).to_vec()
    }

    pub fn marker_meshes(&mut self) -> Result<JsValue, JsValue> {
        let meshes = self
            .editor
            .marker_meshes(&mut self.cache)
            .map_err(to_js_error)?;
        let export: Vec<MeshExport> = meshes.iter().map(MeshExport::from).collect();
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }
}

impl BezierDemo {
    /// Canvas pixel to world x/y through the current view box.
    fn canvas_to_world(&self, px: f64, py: f64, width: f64, height: f64) -> Option<Point2> {
        canvas_to_ndc(px, py, width, height).map(|ndc| self.view.ndc_to_world(ndc))
    }

    #[must_use]
    pub fn view(&self) -> &OrthoBounds {
        &self.view
    }

    #[must_use]
    pub fn editor(&self) -> &BezierEditor {
        &self.editor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pendulum and rotator
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct PendulumDemo {
    pendulum: Pendulum,
}

#[wasm_bindgen]
impl PendulumDemo {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PendulumDemo, JsValue> {
        let pendulum = Pendulum::new(PendulumConfig::default()).map_err(to_js_error)?;
        Ok(PendulumDemo { pendulum })
    }

    /// Advances by `dt` seconds; returns the number of frames simulated.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.pendulum.advance(dt)
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.pendulum.angle()
    }

    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.pendulum.gravity()
    }

    pub fn increase_gravity(&mut self) {
        self.pendulum.increase_gravity();
    }

    pub fn decrease_gravity(&mut self) {
        self.pendulum.decrease_gravity();
    }

    pub fn stop(&mut self) {
        self.pendulum.stop();
    }

    pub fn reset(&mut self) {
        self.pendulum.reset();
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.pendulum.state()).map_err(to_js_error)
    }

    #[must_use]
    pub fn model_matrix(&self) -> Vec<f32> {
        matrix_f32(self.pendulum.model_transform()).to_vec()
    }

    pub fn bob_vertices(&self) -> Result<Vec<f32>, JsValue> {
        bob_fan(BOB_CENTER, BOB_RADIUS, BOB_SIDES).map_err(to_js_error)
    }
}

#[wasm_bindgen]
#[derive(Default)]
pub struct RotatorDemo {
    rotator: Rotator,
}

#[wasm_bindgen]
impl RotatorDemo {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> RotatorDemo {
        RotatorDemo::default()
    }

    pub fn advance(&mut self, dt: f64) -> f64 {
        self.rotator.advance(dt)
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.rotator.step()
    }

    pub fn increase(&mut self) {
        self.rotator.increase();
    }

    pub fn decrease(&mut self) {
        self.rotator.decrease();
    }

    pub fn stop(&mut self) {
        self.rotator.stop();
    }

    pub fn reset(&mut self) {
        self.rotator.reset();
    }

    #[must_use]
    pub fn model_matrix(&self) -> Vec<f32> {
        matrix_f32(self.rotator.model_transform()).to_vec()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Solar system
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct SolarSystemDemo {
    system: OrbitalSystem,
    clock: OrbitClock,
    camera: QuaternionCamera,
    cache: GeomCache,
}

impl Default for SolarSystemDemo {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SolarSystemDemo {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> SolarSystemDemo {
        SolarSystemDemo {
            system: OrbitalSystem::solar_system(),
            clock: OrbitClock::default(),
            camera: QuaternionCamera::default(),
            cache: GeomCache::new(),
        }
    }

    /// Advances the orbit clock by `dt` seconds and returns the angle.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.clock.advance(dt)
    }

    /// Selects a speed preset, slowest first.
    pub fn set_speed(&mut self, preset: usize) -> Result<(), JsValue> {
        let speed = OrbitSpeed::from_index(preset)
            .ok_or_else(|| js_error(&format!("unknown speed preset {preset}")))?;
        self.clock.set_speed(speed);
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn camera_command(&mut self, name: &str) -> Result<(), JsValue> {
        let command = CameraCommand::from_name(name)
            .ok_or_else(|| js_error(&format!("unknown camera command `{name}`")))?;
        self.camera.apply(command);
        Ok(())
    }

    #[must_use]
    pub fn body_names(&self) -> Vec<String> {
        self.system.bodies.iter().map(|b| b.name.clone()).collect()
    }

    /// Sixteen column-major floats per body, in body order.
    #[must_use]
    pub fn body_matrices(&self) -> Vec<f32> {
        self.system
            .body_transforms(self.clock.angle())
            .into_iter()
            .flat_map(matrix_f32)
            .collect()
    }

    #[must_use]
    pub fn view_matrix(&self) -> Vec<f32> {
        matrix_f32(self.camera.view_matrix()).to_vec()
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Vec<f32> {
        matrix_f32(self.camera.frustum().projection()).to_vec()
    }

    pub fn body_meshes(&mut self) -> Result<JsValue, JsValue> {
        let meshes = self
            .system
            .meshes(DEMO_SPHERE_BANDS, DEMO_SPHERE_BANDS, &mut self.cache)
            .map_err(to_js_error)?;
        let export: Vec<MeshExport> = meshes.iter().map(MeshExport::from).collect();
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }

    pub fn starfield(&self, seed: Option<u64>) -> Result<Vec<f32>, JsValue> {
        starfield(&StarfieldOptions::default(), &mut make_rng(seed)).map_err(to_js_error)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stateless helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Chaos-game vertex buffer, `[x, y, r, g, b]` per row, anchors first.
#[wasm_bindgen]
pub fn chaos_vertices(iterations: usize, seed: Option<u64>) -> Result<Vec<f32>, JsValue> {
    ChaosGame::with_iterations(iterations)
        .vertex_buffer(&mut make_rng(seed))
        .map_err(to_js_error)
}

#[wasm_bindgen]
pub fn sphere_mesh(radius: f64, lat_bands: u32, lon_bands: u32) -> Result<JsValue, JsValue> {
    let mesh = generate_sphere(radius, Point3::ORIGIN, lat_bands, lon_bands)
        .map_err(to_js_error)?
        .into_geom_mesh();
    serde_wasm_bindgen::to_value(&MeshExport::from(&mesh)).map_err(to_js_error)
}

/// Mexican-hat surface plot on a `resolution`² grid over `[0, 1]²`.
#[wasm_bindgen]
pub fn surface_plot(resolution: u32) -> Result<JsValue, JsValue> {
    let options = SurfacePlotOptions {
        resolution,
        ..SurfacePlotOptions::default()
    };
    let mesh = plot_bivariate(mexican_hat, &options).map_err(to_js_error)?;
    debug_log!("surface_plot: {} vertices", mesh.vertex_count());
    serde_wasm_bindgen::to_value(&MeshExport::from(&mesh)).map_err(to_js_error)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn matrix_f32(transform: Transform) -> [f32; 16] {
    transform.to_column_major_f32()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
