use anyhow::Context as _;
use clap::Parser;
use nalgebra::Point2;
use pickray::{
    Camera, Projection, Raycaster,
    geometry::{WorldPoint, WorldRotation, WorldVector},
    scene::demo_scene,
};

/// Casts a single pick ray into a small demo scene and prints the hits.
#[derive(Parser)]
#[command(name = "pickray-cli")]
struct Cli {
    /// Horizontal coordinate in normalized device coordinates, -1 to 1
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f64,
    /// Vertical coordinate in normalized device coordinates, -1 to 1
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f64,
    /// Only test the root node, not its children
    #[arg(long)]
    no_recursive: bool,
    /// Log traversal details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fmt_subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(if cli.verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(fmt_subscriber)?;

    let scene = demo_scene();

    // Above and behind the scene, looking slightly down
    let camera = Camera::builder()
        .position(WorldPoint::new(0.0, 4.0, 10.0))
        .rotation(WorldRotation::from_axis_angle(&WorldVector::x_axis(), -0.3))
        .near(0.1)
        .far(100.0)
        .projection(Projection::Perspective {
            fovy: 50f64.to_radians(),
            aspect: 16.0 / 9.0,
        })
        .build()
        .context("Building the camera")?;

    let mut raycaster = Raycaster::default();
    raycaster
        .set_from_camera(&Point2::new(cli.x, cli.y), &camera)
        .context("Setting up the pick ray")?;
    tracing::info!(origin = ?raycaster.ray.origin, direction = ?raycaster.ray.direction, "Casting");

    let intersections = raycaster.intersect_object(&scene, !cli.no_recursive);
    if intersections.is_empty() {
        println!("No hits");
    }
    for intersection in &intersections {
        let target = intersection.target;
        let normal = intersection.normal;
        println!(
            "{:<12} {:>9.4}  target ({:.3}, {:.3}, {:.3})  normal ({:.3}, {:.3}, {:.3})",
            intersection.object.name(),
            intersection.distance,
            target.x,
            target.y,
            target.z,
            normal.x,
            normal.y,
            normal.z,
        );
    }

    Ok(())
}
