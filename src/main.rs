//! Bézier-Spline CLI.
//!
//! Liest Stützpunkte (Argumente `x,y` oder JSON-Datei `[[x, y], ...]`),
//! rendert die interpolierende Kurve und gibt ein SVG-Dokument auf stdout aus.

use anyhow::Context;
use bezier_spline_engine::{ComputeRuntime, SplineOptions, SplineRenderer, SvgCanvas};
use glam::DVec2;
use std::path::PathBuf;

const USAGE: &str =
    "Aufruf: bezier-spline [--gpu] [--cpu] [--measure] [--smooth <f>] [--points <datei.json>] [x,y ...]";

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

/// Über die Kommandozeile gesetzte Werte.
#[derive(Debug, Default)]
struct CliArgs {
    help: bool,
    use_gpu: Option<bool>,
    measure: bool,
    smooth_factor: Option<f64>,
    points_file: Option<PathBuf>,
    points: Vec<DVec2>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut cli = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--gpu" => cli.use_gpu = Some(true),
                "--cpu" => cli.use_gpu = Some(false),
                "--measure" => cli.measure = true,
                "--smooth" => {
                    let value = args.next().context("--smooth erwartet einen Wert")?;
                    cli.smooth_factor = Some(
                        value
                            .parse()
                            .with_context(|| format!("Ungültiger Glättungsfaktor: {}", value))?,
                    );
                }
                "--points" => {
                    let path = args.next().context("--points erwartet einen Dateipfad")?;
                    cli.points_file = Some(PathBuf::from(path));
                }
                "-h" | "--help" => cli.help = true,
                other => cli.points.push(parse_point(other)?),
            }
        }
        Ok(cli)
    }
}

fn parse_point(text: &str) -> anyhow::Result<DVec2> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("Punkt '{}' ist nicht im Format x,y\n{}", text, USAGE))?;
    let x: f64 = x
        .trim()
        .parse()
        .with_context(|| format!("Ungültige x-Koordinate in '{}'", text))?;
    let y: f64 = y
        .trim()
        .parse()
        .with_context(|| format!("Ungültige y-Koordinate in '{}'", text))?;
    Ok(DVec2::new(x, y))
}

fn load_points(path: &std::path::Path) -> anyhow::Result<Vec<DVec2>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Punktdatei nicht lesbar: {}", path.display()))?;
    let raw: Vec<[f64; 2]> = serde_json::from_str(&content)
        .with_context(|| format!("Punktdatei fehlerhaft: {}", path.display()))?;
    log::info!("{} Punkte geladen aus: {}", raw.len(), path.display());
    Ok(raw.into_iter().map(DVec2::from).collect())
}

struct AppRunner;

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Bézier-Spline v{} startet...", env!("CARGO_PKG_VERSION"));

        let cli = CliArgs::parse(std::env::args().skip(1))?;
        if cli.help {
            println!("{}", USAGE);
            return Ok(());
        }

        let mut options = SplineOptions::load_from_file(&SplineOptions::config_path());
        if let Some(use_gpu) = cli.use_gpu {
            options.use_gpu_acceleration = use_gpu;
        }
        if let Some(smooth_factor) = cli.smooth_factor {
            options.smooth_factor = smooth_factor;
        }
        if cli.measure {
            options.measurement.measurements_enabled = true;
        }

        let mut points = match &cli.points_file {
            Some(path) => load_points(path)?,
            None => Vec::new(),
        };
        points.extend(cli.points);

        let runtime = ComputeRuntime::global();
        let result = Self::render(runtime, &options, &points);
        runtime.shutdown();

        print!("{}", result?);
        Ok(())
    }

    fn render(
        runtime: &ComputeRuntime,
        options: &SplineOptions,
        points: &[DVec2],
    ) -> anyhow::Result<String> {
        let renderer = SplineRenderer::new(runtime, options);
        let mut canvas = SvgCanvas::new();
        let curve = renderer.render(points, &options.measurement, &mut canvas)?;

        log::info!(
            "{} Punkte, {} Kontrollpunkte, {} Segmente",
            points.len(),
            curve.control_points.len(),
            curve.path.len()
        );
        if let Some(label) = &curve.label {
            log::info!("Länge: {}", label);
        }
        Ok(canvas.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags_and_points() {
        let cli = CliArgs::parse(args(&["--gpu", "--measure", "--smooth", "0.3", "0,0", "10, 5"]))
            .expect("Argumente müssen parsen");
        assert_eq!(cli.use_gpu, Some(true));
        assert!(cli.measure);
        assert_eq!(cli.smooth_factor, Some(0.3));
        assert_eq!(cli.points, vec![DVec2::ZERO, DVec2::new(10.0, 5.0)]);
    }

    #[test]
    fn test_last_backend_flag_wins() {
        let cli = CliArgs::parse(args(&["--gpu", "--cpu"])).expect("Argumente müssen parsen");
        assert_eq!(cli.use_gpu, Some(false));
    }

    #[test]
    fn test_help_is_not_an_error() {
        let cli = CliArgs::parse(args(&["--help"])).expect("--help darf nicht scheitern");
        assert!(cli.help);
        let cli = CliArgs::parse(args(&["0,0", "-h"])).expect("-h darf nicht scheitern");
        assert!(cli.help);
    }

    #[test]
    fn test_invalid_point_is_rejected() {
        assert!(CliArgs::parse(args(&["1;2"])).is_err());
        assert!(CliArgs::parse(args(&["a,2"])).is_err());
        assert!(CliArgs::parse(args(&["--smooth"])).is_err());
    }
}
