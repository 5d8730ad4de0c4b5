#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("geom_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use gldemo_engine::geom::{
        GeomCache, GeomMesh, Point3, SurfacePlotOptions, generate_sphere, mexican_hat,
        plot_bivariate_cached,
    };
    use gldemo_engine::scene::BezierEditor;
    use gldemo_engine::sim::{ChaosGame, OrbitalSystem};
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;
    const CHAOS_SEED: u64 = 1;
    const CHAOS_ITERATIONS: usize = 2_000;
    const SOLAR_ANGLE: f64 = 30.0;

    const USAGE: &str = r"geom_cli (gldemo-engine)

USAGE:
  geom_cli list
  geom_cli run <scenario|all> [options]

SCENARIOS:
  sphere
  mexican_hat
  bezier
  chaos
  solar_system

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write snapshot (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
";

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                for scenario in Scenario::ALL {
                    println!("{}", scenario.name());
                }
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            let scenarios = if scenario_name == "all" {
                Scenario::ALL.to_vec()
            } else {
                vec![Scenario::parse(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?]
            };
            for scenario in scenarios {
                let output = run_scenario(scenario)?;
                if write_snap {
                    let path = dir.join(format!("{}.snap", output.name));
                    write_text_file(&path, &output.snapshot, overwrite)?;
                    eprintln!("wrote {}", path.display());
                }
                if write_obj {
                    let path = dir.join(format!("{}.obj", output.name));
                    write_obj_file(&path, &output, overwrite)?;
                    eprintln!("wrote {}", path.display());
                }
                eprintln!("{}", output.summary());
            }
            return Ok(());
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::parse(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}", output.summary());
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────

    fn refuse_existing(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        refuse_existing(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, output: &ScenarioOutput, overwrite: bool) -> Result<(), String> {
        if let Payload::Mesh(mesh) = &output.payload {
            mesh.validate()
                .map_err(|e| format!("mesh validation failed: {e}"))?;
        }
        refuse_existing(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_obj(&mut w, output).map_err(|e| format!("write obj: {e}"))?;
        w.flush()
            .map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn write_obj(w: &mut impl Write, output: &ScenarioOutput) -> std::io::Result<()> {
        writeln!(w, "# gldemo-engine geom_cli")?;
        writeln!(w, "o {}", output.name)?;

        match &output.payload {
            Payload::Mesh(mesh) => {
                for p in &mesh.positions {
                    writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
                }
                if let Some(normals) = mesh.normals.as_ref() {
                    for n in normals {
                        writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
                    }
                }
                let has_normals = mesh.normals.is_some();
                for tri in mesh.indices.chunks_exact(3) {
                    let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
                    if has_normals {
                        writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
                    } else {
                        writeln!(w, "f {a} {b} {c}")?;
                    }
                }
            }
            Payload::Polylines(lines) => {
                for p in lines.iter().flatten() {
                    writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
                }
                let mut base = 1;
                for line in lines {
                    let refs: Vec<String> =
                        (base..base + line.len()).map(|i| i.to_string()).collect();
                    writeln!(w, "l {}", refs.join(" "))?;
                    base += line.len();
                }
            }
            Payload::Points(points) => {
                for p in points {
                    writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
                }
                for i in 1..=points.len() {
                    writeln!(w, "p {i}")?;
                }
            }
        }
        Ok(())
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_mesh_section(out: &mut String, mesh: &GeomMesh) {
        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
        for (idx, p) in mesh.positions.iter().enumerate() {
            write_vec3_line(out, &format!("v.{idx}"), *p);
        }
        for (idx, tri) in mesh.indices.chunks_exact(3).enumerate() {
            let _ = writeln!(out, "f.{idx} {} {} {}", tri[0], tri[1], tri[2]);
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# gldemo-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scenarios
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        Sphere,
        MexicanHat,
        Bezier,
        Chaos,
        SolarSystem,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::Sphere,
            Scenario::MexicanHat,
            Scenario::Bezier,
            Scenario::Chaos,
            Scenario::SolarSystem,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::Sphere => "sphere",
                Scenario::MexicanHat => "mexican_hat",
                Scenario::Bezier => "bezier",
                Scenario::Chaos => "chaos",
                Scenario::SolarSystem => "solar_system",
            }
        }

        fn parse(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|s| s.name() == name)
        }
    }

    enum Payload {
        Mesh(GeomMesh),
        Polylines(Vec<Vec<Point3>>),
        Points(Vec<Point3>),
    }

    struct ScenarioOutput {
        name: &'static str,
        payload: Payload,
        snapshot: String,
    }

    impl ScenarioOutput {
        fn summary(&self) -> String {
            match &self.payload {
                Payload::Mesh(mesh) => format!(
                    "{}: vertices={} triangles={}",
                    self.name,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                ),
                Payload::Polylines(lines) => format!(
                    "{}: polylines={} vertices={}",
                    self.name,
                    lines.len(),
                    lines.iter().map(Vec::len).sum::<usize>()
                ),
                Payload::Points(points) => format!("{}: points={}", self.name, points.len()),
            }
        }
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        let name = scenario.name();
        match scenario {
            Scenario::Sphere => {
                let mesh = generate_sphere(1.0, Point3::ORIGIN, 8, 8)
                    .map_err(|e| format!("{name}: {e}"))?
                    .into_geom_mesh();
                let snapshot = snapshot(name, |out| {
                    let _ = writeln!(out, "sphere.radius 1");
                    let _ = writeln!(out, "sphere.bands 8 8");
                    write_mesh_section(out, &mesh);
                });
                Ok(ScenarioOutput {
                    name,
                    payload: Payload::Mesh(mesh),
                    snapshot,
                })
            }
            Scenario::MexicanHat => {
                let options = SurfacePlotOptions {
                    resolution: 20,
                    ..SurfacePlotOptions::default()
                };
                let mut cache = GeomCache::new();
                let mesh = plot_bivariate_cached(mexican_hat, &options, &mut cache)
                    .map_err(|e| format!("{name}: {e}"))?;
                let snapshot = snapshot(name, |out| {
                    let _ = writeln!(out, "plot.resolution {}", options.resolution);
                    write_mesh_section(out, &mesh);
                });
                Ok(ScenarioOutput {
                    name,
                    payload: Payload::Mesh(mesh),
                    snapshot,
                })
            }
            Scenario::Bezier => {
                let editor = BezierEditor::default();
                let [a, b] = editor.chain().sample(editor.config().segments_per_curve);
                let snapshot = snapshot(name, |out| {
                    for (idx, p) in editor.chain().points().iter().enumerate() {
                        write_vec3_line(out, &format!("control.{idx}"), p.to_array());
                    }
                    for (label, line) in [("a", &a), ("b", &b)] {
                        let _ = writeln!(out, "segment.{label}.vertex_count {}", line.len());
                        for (idx, p) in line.iter().enumerate().step_by(10) {
                            write_vec3_line(out, &format!("segment.{label}.{idx}"), p.to_array());
                        }
                    }
                });
                Ok(ScenarioOutput {
                    name,
                    payload: Payload::Polylines(vec![a, b]),
                    snapshot,
                })
            }
            Scenario::Chaos => {
                let game = ChaosGame::with_iterations(CHAOS_ITERATIONS);
                let samples: Vec<_> = game.seeded(CHAOS_SEED).collect();
                let snapshot = snapshot(name, |out| {
                    let _ = writeln!(out, "chaos.seed {CHAOS_SEED}");
                    let _ = writeln!(out, "chaos.point_count {}", samples.len());
                    for (idx, s) in samples.iter().enumerate().take(32) {
                        let _ = write!(out, "p.{idx} {} ", s.anchor);
                        write_f64(out, s.point.x);
                        out.push(' ');
                        write_f64(out, s.point.y);
                        out.push('\n');
                    }
                });
                let points = samples
                    .iter()
                    .map(|s| Point3::new(s.point.x, s.point.y, 0.0))
                    .collect();
                Ok(ScenarioOutput {
                    name,
                    payload: Payload::Points(points),
                    snapshot,
                })
            }
            Scenario::SolarSystem => {
                let system = OrbitalSystem::solar_system();
                let mut cache = GeomCache::new();
                let meshes = system
                    .meshes(12, 12, &mut cache)
                    .map_err(|e| format!("{name}: {e}"))?;
                let transforms = system.body_transforms(SOLAR_ANGLE);
                let mut scene = GeomMesh::new(Vec::new(), Vec::new());
                for (mesh, transform) in meshes.iter().zip(&transforms) {
                    scene
                        .append(&mesh.transformed(*transform))
                        .map_err(|e| format!("{name}: {e}"))?;
                }
                let positions = system.body_positions(SOLAR_ANGLE);
                let snapshot = snapshot(name, |out| {
                    let _ = writeln!(out, "clock.angle {SOLAR_ANGLE}");
                    for (body, p) in system.bodies.iter().zip(&positions) {
                        write_vec3_line(out, &format!("body.{}", body.name), p.to_array());
                    }
                    let stats = cache.stats();
                    let _ = writeln!(
                        out,
                        "cache.sphere_index {} hits {} misses",
                        stats.sphere_index_hits, stats.sphere_index_misses
                    );
                    let _ = write!(out, "cache.entries {} hit_rate ", stats.total_entries());
                    write_f64(out, stats.hit_rate());
                    let _ = writeln!(out, " bytes {}", stats.estimated_memory_bytes);
                    let _ = writeln!(out, "mesh.vertex_count {}", scene.vertex_count());
                    let _ = writeln!(out, "mesh.triangle_count {}", scene.triangle_count());
                });
                Ok(ScenarioOutput {
                    name,
                    payload: Payload::Mesh(scene),
                    snapshot,
                })
            }
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
