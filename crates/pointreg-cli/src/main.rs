use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argh::FromArgs;
use log::info;

use pointreg::{align, Method, PointCloud};

#[derive(FromArgs)]
/// Align a moving point cloud to a stationary point cloud and print the
/// resulting 4x4 affine transform, one row per line.
struct Args {
    /// path to the moving point cloud (text lines of `x y z [scalar]`,
    /// `#` comments ignored)
    #[argh(option, short = 'm')]
    moving: PathBuf,

    /// path to the stationary point cloud (same format)
    #[argh(option, short = 's')]
    stationary: PathBuf,

    /// algorithm to use: com, pca, or rigid (rigid CPD)
    #[argh(option, short = 't', long = "type", default = "String::from(\"rigid\")")]
    algorithm: String,

    /// maximum number of EM iterations for rigid CPD
    #[argh(option, short = 'd', default = "100")]
    iterations: usize,

    /// numerical factor tuning rigid CPD: overrides the initial
    /// sigma-squared estimate (capital -T; lowercase -t selects the
    /// algorithm)
    #[argh(option, short = 'T')]
    tune: Option<f64>,

    /// probability mass in [0, 1) given to the uniform outlier component
    /// of rigid CPD
    #[argh(option, short = 'w', default = "0.0")]
    outlier_weight: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let moving = read_cloud(&args.moving)?;
    let stationary = read_cloud(&args.stationary)?;
    if moving.is_empty() {
        return Err(format!("moving cloud '{}' contains no points", args.moving.display()).into());
    }
    if stationary.is_empty() {
        return Err(format!(
            "stationary cloud '{}' contains no points",
            args.stationary.display()
        )
        .into());
    }

    let method = match Method::parse(&args.algorithm)? {
        Method::CpdRigid(mut params) => {
            params.max_iterations = args.iterations;
            params.w = args.outlier_weight;
            params.sigma_squared_init = args.tune;
            Method::CpdRigid(params)
        }
        other => other,
    };

    info!(
        "aligning {} moving points to {} stationary points",
        moving.len(),
        stationary.len()
    );
    let transform = align(&stationary, &moving, &method)?;

    for j in 0..4 {
        println!(
            "{:+.12e} {:+.12e} {:+.12e} {:+.12e}",
            transform.coeff(0, j),
            transform.coeff(1, j),
            transform.coeff(2, j),
            transform.coeff(3, j)
        );
    }

    Ok(())
}

/// Read a whitespace-separated `x y z [scalar]` cloud. The column count
/// is fixed by the first data line; every line must match it.
fn read_cloud(path: &Path) -> Result<PointCloud, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read '{}': {err}", path.display()))?;

    let mut points = Vec::new();
    let mut scalars = Vec::new();
    let mut expected_fields = None;

    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 && fields.len() != 4 {
            return Err(format!(
                "'{}' line {}: expected 3 or 4 columns, found {}",
                path.display(),
                line_number + 1,
                fields.len()
            )
            .into());
        }
        match expected_fields {
            None => expected_fields = Some(fields.len()),
            Some(expected) if expected != fields.len() => {
                return Err(format!(
                    "'{}' line {}: inconsistent column count ({} after {})",
                    path.display(),
                    line_number + 1,
                    fields.len(),
                    expected
                )
                .into());
            }
            Some(_) => {}
        }

        let mut values = [0.0; 4];
        for (k, field) in fields.iter().enumerate() {
            values[k] = field.parse().map_err(|err| {
                format!(
                    "'{}' line {}: cannot parse '{field}': {err}",
                    path.display(),
                    line_number + 1
                )
            })?;
        }
        points.push([values[0], values[1], values[2]]);
        if fields.len() == 4 {
            scalars.push(values[3]);
        }
    }

    if scalars.is_empty() {
        Ok(PointCloud::from_points(points))
    } else {
        Ok(PointCloud::new(points, Some(scalars)))
    }
}
