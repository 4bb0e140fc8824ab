use anyhow::Context;
use clap::{Parser, Subcommand};
use cubecam_camera::{Camera, Eulers, PoseReadout};
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubecam-cli", about = "CLI tool for cubecam operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compile and link the shader pair
    CheckShaders {
        /// Directory containing vertex.wgsl and fragment.wgsl (embedded shaders if omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Build a camera pose and print its readout and view matrix
    Pose {
        /// Camera position x,y,z
        #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true, default_values_t = [0.0, 0.0, 3.0])]
        position: Vec<f32>,
        /// Orientation pitch,roll,yaw in degrees
        #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true, default_values_t = [0.0, 0.0, -90.0])]
        eulers: Vec<f32>,
        /// Point the camera at x,y,z after placing it
        #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
        look_at: Option<Vec<f32>>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn vec3(values: &[f32]) -> anyhow::Result<Vec3> {
    match values {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => anyhow::bail!("expected 3 comma-separated values, got {}", values.len()),
    }
}

fn pose(position: &[f32], eulers: &[f32], look_at: Option<&[f32]>) -> anyhow::Result<Camera> {
    let position = vec3(position).context("--position")?;
    let eulers = vec3(eulers).context("--eulers")?;
    let mut camera = Camera::new(position, Eulers::from(eulers.to_array()));

    if let Some(target) = look_at {
        let target = vec3(target).context("--look-at")?;
        if !camera.can_look_at(target) {
            anyhow::bail!("look-at target must not be straight above, below, or at the camera");
        }
        camera.look_at(target);
    }
    Ok(camera)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubecam-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("camera: {}", cubecam_camera::crate_info());
            println!("input: {}", cubecam_input::crate_info());
            println!("render: {}", cubecam_render::crate_info());
            println!(
                "defaults: pitch limit={}, fov={} deg",
                cubecam_input::PITCH_LIMIT,
                cubecam_camera::Projection::default().fov_degrees
            );
        }
        Commands::CheckShaders { dir } => {
            let source = match &dir {
                Some(d) => d.display().to_string(),
                None => "embedded".to_string(),
            };
            let program = cubecam_render::build_program(dir.as_deref())
                .with_context(|| format!("shader check failed ({source})"))?;
            println!("Shaders OK ({source})");
            println!(
                "vertex: {}  fragment: {}",
                program.vertex().entry_point(),
                program.fragment().entry_point()
            );
        }
        Commands::Pose {
            position,
            eulers,
            look_at,
            json,
        } => {
            let camera = pose(&position, &eulers, look_at.as_deref())?;
            let readout = PoseReadout::capture(&camera);
            tracing::debug!("pose built: {readout}");
            if json {
                println!("{}", serde_json::to_string_pretty(&readout)?);
            } else {
                println!("{readout}");
                println!("view (rows):");
                let view = camera.view();
                for i in 0..4 {
                    let r = view.row(i);
                    println!("  [{:>8.4} {:>8.4} {:>8.4} {:>8.4}]", r.x, r.y, r.z, r.w);
                }
            }
        }
    }

    Ok(())
}
