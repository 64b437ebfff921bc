// std
use std::sync::Arc;
// others
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rayon::prelude::*;
// pbrt
use rs_photonmap::accelerators::bvh::BeamBvh;
use rs_photonmap::accelerators::kdtree::{KdTree, VolumeRadius};
use rs_photonmap::accelerators::VolumeLookup;
use rs_photonmap::cameras::pinhole::PinholeCamera;
use rs_photonmap::core::common::{Float, Spectrum, INV_PI, PI};
use rs_photonmap::core::geometry::{Point2i, Point3f, Vector3f};
use rs_photonmap::core::medium::Medium;
use rs_photonmap::core::photon::{link_path_beams, PathPhoton, Photon, PhotonRange, VolumePhoton};
use rs_photonmap::core::primitive::Primitive;
use rs_photonmap::core::scene::Scene;
use rs_photonmap::core::settings::{PhotonMapSettings, VolumePhotonType};
use rs_photonmap::integrators::photon_map::PhotonTracer;
use rs_photonmap::lights::point::PointLight;
use rs_photonmap::materials::matte::LambertBsdf;
use rs_photonmap::media::homogeneous::HomogeneousMedium;
use rs_photonmap::samplers::random::RandomSampler;
use rs_photonmap::shapes::quad::Quad;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const ALBEDO: Float = 0.5;
const LIGHT_HEIGHT: Float = 1.0;

/// Trace photons from a point light above a diffuse plane and
/// estimate the radiance of the plane as seen from above.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// number of photon paths to trace
    #[arg(short = 'p', long = "paths", default_value_t = 100_000)]
    paths: usize,
    /// capacity of each photon map (surface, volume, path)
    #[arg(long = "photon-count", default_value_t = 1_000_000)]
    photon_count: usize,
    /// photons used for each surface density estimate
    #[arg(short = 'k', long = "gather-count", default_value_t = 100)]
    gather_count: usize,
    #[arg(long = "gather-radius", default_value_t = 1e30)]
    gather_radius: Float,
    #[arg(long = "volume-gather-radius", default_value_t = 0.05)]
    volume_gather_radius: Float,
    #[arg(long = "max-bounces", default_value_t = 4)]
    max_bounces: u32,
    #[arg(long = "min-bounces", default_value_t = 0)]
    min_bounces: u32,
    /// volumetric estimator, "points" or "beams"
    #[arg(long = "volume", default_value = "points")]
    volume_photon_type: VolumePhotonType,
    /// extinction of a homogeneous fog filling the scene, 0 for none
    #[arg(long = "fog", default_value_t = 0.0)]
    fog: Float,
    /// width and height of the gathered image
    #[arg(short = 'r', long = "resolution", default_value_t = 16)]
    resolution: i32,
    #[arg(long = "spp", default_value_t = 4)]
    samples_per_pixel: u32,
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,
    /// use specified number of threads for rendering
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: u8,
}

fn build_scene(cli: &Cli) -> Scene {
    let fog: Option<Arc<dyn Medium>> = if cli.fog > 0.0 as Float {
        let medium: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(
            &Spectrum::new(0.2 as Float * cli.fog),
            &Spectrum::new(0.8 as Float * cli.fog),
            0.0 as Float,
        ));
        Some(medium)
    } else {
        None
    };
    // irradiance directly below the light is one
    let light: Arc<dyn Primitive> = Arc::new(
        PointLight::new(
            Point3f::new(0.0, LIGHT_HEIGHT, 0.0),
            Spectrum::new(4.0 as Float * PI * LIGHT_HEIGHT * LIGHT_HEIGHT),
        )
        .with_medium(fog.clone()),
    );
    let floor: Arc<dyn Primitive> = Arc::new(
        Quad::horizontal(
            Point3f::default(),
            50.0 as Float,
            Arc::new(LambertBsdf::new(Spectrum::new(ALBEDO))),
        )
        .with_media(None, fog.clone()),
    );
    let camera = Arc::new(
        PinholeCamera::look_at(
            Point3f::new(0.0, 2.0, 0.0),
            Point3f::default(),
            Vector3f::new(0.0, 0.0, 1.0),
            20.0 as Float,
            Point2i {
                x: cli.resolution,
                y: cli.resolution,
            },
        )
        .with_medium(fog),
    );
    Scene::new(vec![light, floor], camera)
}

struct PhotonMaps {
    surface: Vec<Photon>,
    volume: Vec<VolumePhoton>,
    path: Vec<PathPhoton>,
}

/// Every worker traces its share of the paths into its own, disjoint
/// set of photon ranges.
fn emit_photons(
    scene: &Scene,
    settings: &PhotonMapSettings,
    paths: usize,
    seed: u64,
    num_cores: usize,
) -> Result<PhotonMaps> {
    let paths_per_worker: usize = (paths + num_cores - 1) / num_cores;
    let mut surface: Vec<Photon> = vec![Photon::default(); settings.photon_count];
    let mut volume: Vec<VolumePhoton> = vec![VolumePhoton::default(); settings.volume_photon_count];
    let mut path: Vec<PathPhoton> = vec![PathPhoton::default(); settings.path_photon_count];
    let surface_chunk: usize = (settings.photon_count / num_cores).max(1);
    let volume_chunk: usize = (settings.volume_photon_count / num_cores).max(1);
    let path_chunk: usize = (settings.path_photon_count / num_cores).max(1);
    let counts: Vec<(usize, usize, usize)> = {
        let bands = surface
            .chunks_mut(surface_chunk)
            .zip(volume.chunks_mut(volume_chunk))
            .zip(path.chunks_mut(path_chunk))
            .take(num_cores);
        crossbeam::scope(|scope| {
            let (band_tx, band_rx) = crossbeam_channel::bounded(num_cores);
            let mut workers = Vec::with_capacity(num_cores);
            // spawn worker threads
            for (b, ((surface_band, volume_band), path_band)) in bands.enumerate() {
                let band_tx = band_tx.clone();
                workers.push(scope.spawn(move |_| {
                    let tracer: PhotonTracer = PhotonTracer::new(scene, *settings);
                    let mut sampler: RandomSampler =
                        RandomSampler::new(seed.wrapping_add(b as u64));
                    let mut surface_range = PhotonRange::new(surface_band);
                    let mut volume_range = PhotonRange::new(volume_band);
                    let mut path_range = PhotonRange::new(path_band);
                    for _ in 0..paths_per_worker {
                        tracer.trace_photon(
                            &mut surface_range,
                            &mut volume_range,
                            &mut path_range,
                            &mut sampler,
                        );
                    }
                    // send progress through the channel to main thread
                    let _ = band_tx.send(b);
                    (surface_range.len(), volume_range.len(), path_range.len())
                }));
            }
            drop(band_tx);
            // spawn thread to report progress
            let n_workers: usize = workers.len();
            scope.spawn(move |_| {
                let mut pb = pbr::ProgressBar::new(n_workers as u64);
                pb.message("photon emission ");
                for _ in band_rx.iter() {
                    pb.inc();
                }
                pb.finish();
            });
            workers
                .into_iter()
                .map(|worker| worker.join())
                .collect::<std::thread::Result<Vec<(usize, usize, usize)>>>()
        })
        .map_err(|_| anyhow!("photon emission scope panicked"))?
        .map_err(|_| anyhow!("photon emission worker panicked"))?
    };
    // compact the used part of every band
    let mut maps: PhotonMaps = PhotonMaps {
        surface: Vec::new(),
        volume: Vec::new(),
        path: Vec::new(),
    };
    let traced: usize = paths_per_worker * counts.len();
    for (b, (n_surface, n_volume, n_path)) in counts.iter().enumerate() {
        maps.surface
            .extend_from_slice(&surface[b * surface_chunk..b * surface_chunk + n_surface]);
        maps.volume
            .extend_from_slice(&volume[b * volume_chunk..b * volume_chunk + n_volume]);
        maps.path
            .extend_from_slice(&path[b * path_chunk..b * path_chunk + n_path]);
    }
    let scale: Float = 1.0 as Float / traced.max(1) as Float;
    maps.surface.iter_mut().for_each(|p| p.scale_power(scale));
    maps.volume.iter_mut().for_each(|p| p.scale_power(scale));
    maps.path.iter_mut().for_each(|p| p.scale_power(scale));
    log::info!(
        "{} paths traced: {} surface, {} volume and {} path photons",
        traced,
        maps.surface.len(),
        maps.volume.len(),
        maps.path.len()
    );
    Ok(maps)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    // handle command line options
    let cli: Cli = Cli::parse();
    let num_cores: usize = if cli.nthreads == 0_u8 {
        num_cpus::get()
    } else {
        cli.nthreads as usize
    };
    log::info!(
        "rs_photonmap version {} [using {} thread(s)]",
        VERSION,
        num_cores
    );
    let mut settings: PhotonMapSettings = PhotonMapSettings::default();
    settings.photon_count = cli.photon_count;
    settings.volume_photon_count = cli.photon_count;
    settings.path_photon_count = cli.photon_count;
    settings.gather_count = cli.gather_count;
    settings.gather_radius = cli.gather_radius;
    settings.volume_gather_radius = cli.volume_gather_radius;
    settings.max_bounces = cli.max_bounces;
    settings.min_bounces = cli.min_bounces;
    settings.volume_photon_type = cli.volume_photon_type;
    settings.validate().context("invalid photon map settings")?;
    if cli.resolution <= 0 {
        return Err(anyhow!("resolution must be positive, got {}", cli.resolution));
    }
    let scene: Scene = build_scene(&cli);
    let maps: PhotonMaps = emit_photons(&scene, &settings, cli.paths, cli.seed, num_cores)
        .context("photon emission failed")?;
    // build the photon indices
    let surface_tree: KdTree<Photon> = KdTree::new(maps.surface);
    let mut volume_tree: Option<KdTree<VolumePhoton>> = None;
    let mut path_photons: Vec<PathPhoton> = maps.path;
    let mut beam_bvh: Option<BeamBvh> = None;
    if cli.fog > 0.0 as Float {
        match settings.volume_photon_type {
            VolumePhotonType::Points => {
                let mut tree: KdTree<VolumePhoton> = KdTree::new(maps.volume);
                tree.build_volume_hierarchy(VolumeRadius::Fixed(settings.volume_gather_radius));
                volume_tree = Some(tree);
            }
            VolumePhotonType::Beams => {
                link_path_beams(&mut path_photons);
                beam_bvh = Some(BeamBvh::new(
                    &path_photons,
                    settings.volume_gather_radius,
                    4,
                ));
            }
        }
    }
    let volume_lookup: VolumeLookup = match (&volume_tree, &beam_bvh) {
        (Some(tree), _) => VolumeLookup::Points(tree),
        (None, Some(bvh)) => VolumeLookup::Beams {
            bvh,
            path_photons: &path_photons,
        },
        (None, None) => VolumeLookup::None,
    };
    // gather, one tracer per rayon worker
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cores)
        .build_global()
        .context("failed to set up the gather thread pool")?;
    let resolution: i32 = cli.resolution;
    let spp: u32 = cli.samples_per_pixel.max(1);
    let pixels: Vec<Spectrum> = (0..resolution * resolution)
        .into_par_iter()
        .map_init(
            || PhotonTracer::new(&scene, settings),
            |tracer, index| {
                let pixel: Point2i = Point2i {
                    x: index % resolution,
                    y: index / resolution,
                };
                let mut sampler: RandomSampler =
                    RandomSampler::new(cli.seed ^ ((index as u64 + 1) << 32));
                let mut sum: Spectrum = Spectrum::default();
                for _ in 0..spp {
                    sum += tracer.trace_sample(
                        pixel,
                        &surface_tree,
                        volume_lookup,
                        &mut sampler,
                        settings.gather_radius,
                        settings.volume_gather_radius,
                    );
                }
                sum / spp as Float
            },
        )
        .collect();
    let centre: Spectrum = pixels[((resolution / 2) * resolution + resolution / 2) as usize];
    let mean: Float = pixels.iter().map(|l| l.average()).sum::<Float>() / pixels.len() as Float;
    // Lambertian plane lit by unit irradiance
    let analytic: Float = ALBEDO * INV_PI;
    log::info!("centre pixel radiance: {:?}", centre.c);
    log::info!("mean image radiance: {}", mean);
    if cli.fog == 0.0 as Float {
        log::info!(
            "analytic radiance below the light: {} (relative error {:.3})",
            analytic,
            (centre.average() - analytic).abs() / analytic
        );
    }
    Ok(())
}
