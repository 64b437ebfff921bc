//! # Photon Mapping
//!
//! Photon mapping is a two pass algorithm. The first pass traces
//! paths from the light sources and deposits **photons** wherever a
//! path interacts with the scene: on non-specular surfaces
//! ([`Photon`]), at scattering events inside participating media
//! ([`VolumePhoton`]) and at every vertex of the path
//! ([`PathPhoton`], used for photon beams).
//!
//! The second pass traces paths from the camera. Specular and
//! transparent surfaces are followed like in a path tracer. Inside a
//! medium the in-scattered radiance along each ray segment is
//! estimated from the volume photons, and at the first non-specular
//! surface the outgoing radiance is estimated from the density of the
//! nearest surface photons.
//!
//! A [`PhotonTracer`] is meant to be owned by one worker. The scene
//! and the photon indices are shared read-only between workers; the
//! nearest-neighbour buffers of a tracer are reused for every call.

// pbrt
use crate::accelerators::{PhotonLookup, VolumeLookup};
use crate::core::common::{Float, Spectrum, INV_PI};
use crate::core::geometry::vec3_dot_nrmf;
use crate::core::geometry::{Point2i, Ray, Vector3f};
use crate::core::integrator::make_local_scatter_event;
use crate::core::integrator::{choose_light_adjoint, handle_surface, is_path_valid};
use crate::core::interaction::{SurfaceInteraction, SurfaceScatterEvent};
use crate::core::medium::{Medium, MediumState};
use crate::core::photon::{PathPhoton, Photon, PhotonRange, VolumePhoton};
use crate::core::primitive::{DirectionSample, PositionSample};
use crate::core::reflection::{is_pure_specular, SPECULAR_LOBES};
use crate::core::sampler::Sampler;
use crate::core::sampling::Distribution1D;
use crate::core::scene::{compute_light_power_distribution, Scene};
use crate::core::settings::PhotonMapSettings;
use crate::integrators::volume_radiance::{estimate_beams, estimate_points};

pub struct PhotonTracer<'s> {
    scene: &'s Scene,
    settings: PhotonMapSettings,
    light_distribution: Option<Distribution1D>,
    // k-NN scratch buffers, gather_count entries each
    photon_query: Vec<usize>,
    distance_query: Vec<Float>,
}

impl<'s> PhotonTracer<'s> {
    pub fn new(scene: &'s Scene, settings: PhotonMapSettings) -> Self {
        let light_distribution: Option<Distribution1D> = compute_light_power_distribution(scene);
        if light_distribution.is_none() {
            log::debug!("photon tracer: scene has no lights, no photons will be emitted");
        }
        log::debug!(
            "photon tracer: bounces [{}, {}), gather count {}, volume photons as {}",
            settings.min_bounces,
            settings.max_bounces,
            settings.gather_count,
            settings.volume_photon_type
        );
        PhotonTracer {
            scene,
            settings,
            light_distribution,
            photon_query: vec![0_usize; settings.gather_count],
            distance_query: vec![0.0 as Float; settings.gather_count],
        }
    }
    pub fn settings(&self) -> &PhotonMapSettings {
        &self.settings
    }
    /// Traces one path from a light source and deposits photons into
    /// the three ranges. Ranges that are full are skipped.
    pub fn trace_photon(
        &self,
        surface_range: &mut PhotonRange<Photon>,
        volume_range: &mut PhotonRange<VolumePhoton>,
        path_range: &mut PhotonRange<PathPhoton>,
        sampler: &mut dyn Sampler,
    ) {
        let scene: &'s Scene = self.scene;
        let light_distribution: &Distribution1D = match self.light_distribution {
            Some(ref distribution) => distribution,
            None => return,
        };
        let (light, light_pdf) = match choose_light_adjoint(light_distribution, scene, sampler) {
            Some(choice) => choice,
            None => return,
        };
        let point: PositionSample = match light.sample_position(sampler) {
            Some(point) => point,
            None => return,
        };
        let direction: DirectionSample = match light.sample_direction(sampler, &point) {
            Some(direction) => direction,
            None => return,
        };
        let mut medium: Option<&'s dyn Medium> = light.ext_medium();
        let mut ray: Ray = Ray::new(point.p, direction.d);
        let mut throughput: Spectrum = point.weight * direction.weight / light_pdf;
        let mut state: MediumState = MediumState::default();
        if let Some(p) = path_range.add_photon() {
            p.pos = point.p;
            p.power = throughput;
            p.set_path_info(0, false);
        }
        let max_bounces: u32 = self.settings.max_bounces;
        let mut bounce: u32 = 0;
        let mut was_specular: bool = true;
        // was the current vertex reached through a specular surface scatter?
        let mut on_specular: bool = false;
        let mut isect: Option<SurfaceInteraction<'s>> = scene.intersect(&mut ray);
        while (isect.is_some() || medium.is_some()) && bounce + 1 < max_bounces {
            bounce += 1;
            let mut hit_surface: bool = true;
            if let Some(m) = medium {
                let medium_sample = match m.sample_distance(sampler, &ray, &mut state) {
                    Some(sample) => sample,
                    None => break,
                };
                throughput *= medium_sample.weight;
                hit_surface = medium_sample.exited;
                if !hit_surface {
                    if let Some(p) = volume_range.add_photon() {
                        p.pos = medium_sample.p;
                        p.dir = ray.d;
                        p.power = throughput;
                        p.bounce = bounce;
                    }
                    if let Some(p) = path_range.add_photon() {
                        p.pos = medium_sample.p;
                        p.power = throughput;
                        p.set_path_info(bounce, false);
                    }
                    let phase_sample = match medium_sample.phase.sample(sampler, &ray.d) {
                        Some(sample) => sample,
                        None => break,
                    };
                    ray = ray.scatter(&medium_sample.p, &phase_sample.w, 0.0 as Float);
                    ray.primary = false;
                    throughput *= phase_sample.weight;
                    on_specular = false;
                }
            }
            let mut surface: Option<SurfaceInteraction<'s>> = None;
            if hit_surface {
                let si: SurfaceInteraction<'s> = match isect {
                    Some(si) => si,
                    None => break,
                };
                if !is_pure_specular(si.bsdf.lobes()) {
                    // shading normal correction, the gather pass
                    // evaluates the BSDF non-adjoint
                    let correction: Float =
                        (vec3_dot_nrmf(&ray.d, &si.ns) / vec3_dot_nrmf(&ray.d, &si.ng)).abs();
                    if correction.is_finite() {
                        if let Some(p) = surface_range.add_photon() {
                            p.pos = si.p;
                            p.dir = ray.d;
                            p.power = throughput * correction;
                            p.bounce = bounce;
                        }
                    } else {
                        log::trace!("photon at grazing hit dropped");
                    }
                }
                if let Some(p) = path_range.add_photon() {
                    p.pos = si.p;
                    p.power = throughput;
                    p.set_path_info(bounce, on_specular);
                }
                surface = Some(si);
            }
            if volume_range.full() && surface_range.full() && path_range.full() {
                break;
            }
            if let Some(si) = surface {
                let mut event: SurfaceScatterEvent =
                    make_local_scatter_event(&si, &ray, self.settings.enable_two_sided_shading);
                if !handle_surface(
                    &mut event,
                    &si,
                    sampler,
                    &mut medium,
                    &mut ray,
                    &mut throughput,
                    &mut was_specular,
                    &mut state,
                    true,
                    self.settings.enable_consistency_checks,
                ) {
                    break;
                }
                on_specular = was_specular;
            }
            if throughput.max_component_value() == 0.0 as Float {
                break;
            }
            if !is_path_valid(&ray, &throughput) {
                log::trace!("photon path at bounce {} has invalid numbers", bounce);
                break;
            }
            if bounce < max_bounces {
                isect = scene.intersect(&mut ray);
            }
        }
    }
    /// Estimates the radiance arriving through `pixel` from the
    /// deposited photons. `volume_lookup` selects the volumetric
    /// estimator.
    pub fn trace_sample(
        &mut self,
        pixel: Point2i,
        surface_lookup: &dyn PhotonLookup<Photon>,
        volume_lookup: VolumeLookup,
        sampler: &mut dyn Sampler,
        gather_radius: Float,
        volume_gather_radius: Float,
    ) -> Spectrum {
        let scene: &'s Scene = self.scene;
        let point: PositionSample = match scene.camera.sample_position(sampler) {
            Some(point) => point,
            None => return Spectrum::default(),
        };
        let direction: DirectionSample = match scene.camera.sample_direction(sampler, &point, pixel)
        {
            Some(direction) => direction,
            None => return Spectrum::default(),
        };
        let mut throughput: Spectrum = point.weight * direction.weight;
        let mut ray: Ray = Ray::new(point.p, direction.d);
        ray.primary = true;
        let mut medium: Option<&'s dyn Medium> = scene.camera.medium();
        let max_bounces: u32 = self.settings.max_bounces;
        let min_bounces: u32 = self.settings.min_bounces;
        let mut result: Spectrum = Spectrum::default();
        let mut bounce: u32 = 0;
        let mut isect: Option<SurfaceInteraction<'s>> = scene.intersect(&mut ray);
        while (medium.is_some() || isect.is_some()) && bounce < max_bounces {
            bounce += 1;
            if let Some(m) = medium {
                let estimate: Spectrum = match volume_lookup {
                    VolumeLookup::None => Spectrum::default(),
                    VolumeLookup::Points(lookup) => {
                        estimate_points(&self.settings, bounce, &ray, m, lookup, sampler)
                    }
                    VolumeLookup::Beams { bvh, path_photons } => estimate_beams(
                        &self.settings,
                        bounce,
                        &ray,
                        m,
                        bvh,
                        path_photons,
                        volume_gather_radius,
                        sampler,
                    ),
                };
                result += throughput * estimate;
                throughput *= m.transmittance(sampler, &ray);
            }
            let si: SurfaceInteraction<'s> = match isect {
                Some(si) => si,
                None => break,
            };
            let mut event: SurfaceScatterEvent =
                make_local_scatter_event(&si, &ray, self.settings.enable_two_sided_shading);
            let transparency: Spectrum = si.bsdf.eval(&event.make_forward_event(), false);
            let transparency_scalar: Float = transparency.average();
            let wo: Vector3f = if sampler.next_boolean(transparency_scalar) {
                throughput *= transparency / transparency_scalar;
                ray.d
            } else {
                event.requested_lobe = SPECULAR_LOBES;
                if !si.bsdf.sample(&mut event, sampler, false) {
                    // non-specular surface, estimate from photons here
                    break;
                }
                throughput *= event.weight;
                event.frame.to_global(&event.wo)
            };
            let geometric_backside: bool = vec3_dot_nrmf(&wo, &si.ng) < 0.0 as Float;
            medium = si.primitive.select_medium(medium, geometric_backside);
            ray = ray.scatter(&si.p, &wo, si.epsilon);
            if !is_path_valid(&ray, &throughput) {
                log::trace!("camera path at bounce {} has invalid numbers", bounce);
                return result;
            }
            if bounce < max_bounces {
                isect = scene.intersect(&mut ray);
            } else {
                return result;
            }
        }
        let si: SurfaceInteraction<'s> = match isect {
            Some(si) => si,
            None => {
                if medium.is_none() && bounce > min_bounces {
                    if let Some(info) = scene.intersect_infinites(&ray) {
                        result += throughput * info.primitive.eval_direct(&info);
                    }
                }
                return result;
            }
        };
        if si.primitive.is_emissive() && bounce > min_bounces {
            result += throughput * si.primitive.eval_direct(&si);
        }
        let count: usize = surface_lookup.nearest_neighbours(
            &si.p,
            &mut self.photon_query,
            &mut self.distance_query,
            gather_radius,
        );
        if count == 0 {
            return result;
        }
        let mut event: SurfaceScatterEvent =
            make_local_scatter_event(&si, &ray, self.settings.enable_two_sided_shading);
        let mut surface_estimate: Spectrum = Spectrum::default();
        for index in &self.photon_query[..count] {
            let photon: &Photon = surface_lookup.photon(*index);
            if !self.settings.accepts_path_length(bounce, photon.bounce) {
                continue;
            }
            event.wo = event.frame.to_local(&-photon.dir);
            let cos_theta: Float = event.wo.z.abs();
            if cos_theta == 0.0 as Float {
                continue;
            }
            // the shading normal correction was applied at deposit time
            surface_estimate += photon.power * si.bsdf.eval(&event, false) / cos_theta;
        }
        let radius_sq: Float = if count == self.settings.gather_count {
            self.distance_query[count - 1]
        } else {
            gather_radius * gather_radius
        };
        if radius_sq <= 0.0 as Float {
            log::trace!("degenerate gather radius");
            return result;
        }
        result += throughput * surface_estimate * (INV_PI / radius_sq);
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    use crate::accelerators::bvh::BeamBvh;
    use crate::accelerators::kdtree::{KdTree, VolumeRadius};
    use crate::cameras::pinhole::PinholeCamera;
    use crate::core::common::PI;
    use crate::core::geometry::Point3f;
    use crate::core::photon::link_path_beams;
    use crate::core::primitive::Primitive;
    use crate::lights::infinite::InfiniteSphere;
    use crate::lights::point::PointLight;
    use crate::materials::matte::LambertBsdf;
    use crate::materials::mirror::MirrorBsdf;
    use crate::materials::null::NullBsdf;
    use crate::media::homogeneous::HomogeneousMedium;
    use crate::samplers::random::RandomSampler;
    use crate::shapes::quad::Quad;

    fn camera_looking_down(height: Float, fov: Float) -> Arc<PinholeCamera> {
        Arc::new(PinholeCamera::look_at(
            Point3f::new(0.0, height, 0.0),
            Point3f::default(),
            Vector3f::new(0.0, 0.0, 1.0),
            fov,
            Point2i { x: 1, y: 1 },
        ))
    }

    fn diffuse_floor(half_size: Float) -> Arc<dyn Primitive> {
        Arc::new(Quad::horizontal(
            Point3f::default(),
            half_size,
            Arc::new(LambertBsdf::default()),
        ))
    }

    /// Isotropic point light at height one whose irradiance at the
    /// origin below it is exactly one.
    fn unit_point_light() -> Arc<dyn Primitive> {
        Arc::new(PointLight::new(
            Point3f::new(0.0, 1.0, 0.0),
            Spectrum::new(4.0 * PI),
        ))
    }

    fn settings(max_bounces: u32) -> PhotonMapSettings {
        let mut settings = PhotonMapSettings::default();
        settings.max_bounces = max_bounces;
        settings
    }

    struct Deposits {
        surface: Vec<Photon>,
        volume: Vec<VolumePhoton>,
        path: Vec<PathPhoton>,
    }

    /// Traces `paths` photon paths into ranges large enough to never
    /// fill up and normalises the power by the path count.
    fn emit(tracer: &PhotonTracer, paths: usize, seed: u64) -> Deposits {
        let capacity = paths * tracer.settings().max_bounces as usize;
        let mut surface = vec![Photon::default(); capacity];
        let mut volume = vec![VolumePhoton::default(); capacity];
        let mut path = vec![PathPhoton::default(); capacity + paths];
        let (n_surface, n_volume, n_path) = {
            let mut surface_range = PhotonRange::new(&mut surface);
            let mut volume_range = PhotonRange::new(&mut volume);
            let mut path_range = PhotonRange::new(&mut path);
            let mut sampler = RandomSampler::new(seed);
            for _ in 0..paths {
                tracer.trace_photon(
                    &mut surface_range,
                    &mut volume_range,
                    &mut path_range,
                    &mut sampler,
                );
            }
            (surface_range.len(), volume_range.len(), path_range.len())
        };
        surface.truncate(n_surface);
        volume.truncate(n_volume);
        path.truncate(n_path);
        let scale = 1.0 / paths as Float;
        surface.iter_mut().for_each(|p| p.scale_power(scale));
        volume.iter_mut().for_each(|p| p.scale_power(scale));
        path.iter_mut().for_each(|p| p.scale_power(scale));
        Deposits {
            surface,
            volume,
            path,
        }
    }

    #[test]
    fn one_surface_photon_per_path_with_two_bounces() {
        let scene = Scene::new(
            vec![diffuse_floor(50.0), unit_point_light()],
            camera_looking_down(2.0, 1.0),
        );
        let tracer = PhotonTracer::new(&scene, settings(2));
        let mut sampler = RandomSampler::new(7);
        let mut hits = 0;
        for _ in 0..2000 {
            let mut surface = vec![Photon::default(); 4];
            let mut volume = vec![VolumePhoton::default(); 4];
            let mut path = vec![PathPhoton::default(); 4];
            let mut surface_range = PhotonRange::new(&mut surface);
            let mut volume_range = PhotonRange::new(&mut volume);
            let mut path_range = PhotonRange::new(&mut path);
            tracer.trace_photon(
                &mut surface_range,
                &mut volume_range,
                &mut path_range,
                &mut sampler,
            );
            assert!(volume_range.is_empty());
            // the emission vertex is always recorded
            assert_eq!(path_range.photons()[0].bounce(), 0);
            match surface_range.len() {
                0 => assert_eq!(path_range.len(), 1),
                1 => {
                    hits += 1;
                    let photon = surface_range.photons()[0];
                    assert_eq!(photon.bounce, 1);
                    assert!(photon.pos.y.abs() < 1e-4);
                    assert!(photon.dir.y < 0.0);
                    assert_eq!(path_range.len(), 2);
                    assert_eq!(path_range.photons()[1].bounce(), 1);
                }
                n => panic!("{} surface photons", n),
            }
        }
        // about half of the photons leave downwards
        assert!(hits > 800 && hits < 1200, "{} hits", hits);
    }

    #[test]
    fn bounce_indices_count_scattering_events() {
        // diffuse floor and ceiling, the light in between
        let ceiling: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::new(0.0, 2.0, 0.0),
            50.0,
            Arc::new(LambertBsdf::new(Spectrum::new(0.9))),
        ));
        let scene = Scene::new(
            vec![diffuse_floor(50.0), ceiling, unit_point_light()],
            camera_looking_down(1.5, 1.0),
        );
        let max_bounces: u32 = 5;
        let tracer = PhotonTracer::new(&scene, settings(max_bounces));
        let mut sampler = RandomSampler::new(3);
        for _ in 0..500 {
            let mut surface = vec![Photon::default(); 16];
            let mut volume = vec![VolumePhoton::default(); 16];
            let mut path = vec![PathPhoton::default(); 16];
            let mut surface_range = PhotonRange::new(&mut surface);
            let mut volume_range = PhotonRange::new(&mut volume);
            let mut path_range = PhotonRange::new(&mut path);
            tracer.trace_photon(
                &mut surface_range,
                &mut volume_range,
                &mut path_range,
                &mut sampler,
            );
            assert!(surface_range.len() < max_bounces as usize);
            for (i, photon) in surface_range.photons().iter().enumerate() {
                assert_eq!(photon.bounce, i as u32 + 1);
                assert!(photon.power.min_component_value() >= 0.0);
                assert!(photon.power.is_finite());
            }
            for (i, photon) in path_range.photons().iter().enumerate() {
                assert_eq!(photon.bounce(), i as u32);
            }
        }
    }

    #[test]
    fn specular_surfaces_never_receive_photons() {
        let mirror: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::default(),
            50.0,
            Arc::new(MirrorBsdf::new(Spectrum::new(1.0))),
        ));
        let ceiling: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::new(0.0, 2.0, 0.0),
            50.0,
            Arc::new(LambertBsdf::default()),
        ));
        let scene = Scene::new(
            vec![mirror, ceiling, unit_point_light()],
            camera_looking_down(1.5, 1.0),
        );
        let tracer = PhotonTracer::new(&scene, settings(8));
        let deposits = emit(&tracer, 5000, 13);
        assert!(!deposits.surface.is_empty());
        for photon in &deposits.surface {
            assert!((photon.pos.y - 2.0).abs() < 1e-3, "photon at {:?}", photon.pos);
        }
        // path photons are recorded on the mirror nonetheless, flagged
        // as reached through a specular scatter when they come from it
        assert!(deposits.path.iter().any(|p| p.pos.y.abs() < 1e-3));
        assert!(deposits
            .path
            .iter()
            .any(|p| (p.pos.y - 2.0).abs() < 1e-3 && p.on_specular()));
    }

    #[test]
    fn diffuse_plane_under_point_light_converges() {
        let scene = Scene::new(
            vec![diffuse_floor(50.0), unit_point_light()],
            camera_looking_down(2.0, 1.0),
        );
        let mut settings = settings(2);
        settings.gather_count = 400;
        let mut tracer = PhotonTracer::new(&scene, settings);
        let deposits = emit(&tracer, 100_000, 21);
        let surface_tree = KdTree::new(deposits.surface);
        let mut sampler = RandomSampler::new(5);
        let mut estimate: Float = 0.0;
        let n = 16;
        for _ in 0..n {
            let radiance = tracer.trace_sample(
                Point2i { x: 0, y: 0 },
                &surface_tree,
                VolumeLookup::None,
                &mut sampler,
                1e30,
                1e30,
            );
            assert!(radiance.min_component_value() >= 0.0);
            estimate += radiance.average() / n as Float;
        }
        // albedo / pi times unit irradiance
        let expected: Float = 0.5 * INV_PI;
        assert!(
            (estimate - expected).abs() < 0.15 * expected,
            "estimate {} expected {}",
            estimate,
            expected
        );
    }

    #[test]
    fn empty_photon_maps_return_direct_emission() {
        let emitter: Arc<dyn Primitive> = Arc::new(
            Quad::horizontal(Point3f::default(), 1.0, Arc::new(LambertBsdf::default()))
                .with_emission(Spectrum::new(2.0)),
        );
        let scene = Scene::new(vec![emitter], camera_looking_down(2.0, 10.0));
        let empty: KdTree<Photon> = KdTree::new(Vec::new());
        let mut tracer = PhotonTracer::new(&scene, settings(4));
        let mut sampler = RandomSampler::new(1);
        for _ in 0..10 {
            let radiance = tracer.trace_sample(
                Point2i { x: 0, y: 0 },
                &empty,
                VolumeLookup::None,
                &mut sampler,
                1e30,
                1e30,
            );
            assert_eq!(radiance, Spectrum::new(2.0));
        }
        // direct emission is a path of one bounce
        let mut no_direct = settings(4);
        no_direct.min_bounces = 1;
        let mut tracer = PhotonTracer::new(&scene, no_direct);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &empty,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            1e30,
        );
        assert!(radiance.is_black());
        // environment reflected by a mirror below the camera
        let sky: Arc<dyn Primitive> = Arc::new(InfiniteSphere::new(Spectrum::new(0.25)));
        let mirror: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::default(),
            1.0,
            Arc::new(MirrorBsdf::new(Spectrum::new(0.5))),
        ));
        let scene = Scene::new(vec![sky, mirror], camera_looking_down(2.0, 10.0));
        let mut tracer = PhotonTracer::new(&scene, settings(4));
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &empty,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            1e30,
        );
        assert_eq!(radiance, Spectrum::new(0.125));
    }

    #[test]
    fn photon_tracing_stops_once_all_ranges_are_full() {
        let ceiling: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::new(0.0, 2.0, 0.0),
            50.0,
            Arc::new(LambertBsdf::new(Spectrum::new(0.9))),
        ));
        let scene = Scene::new(
            vec![diffuse_floor(50.0), ceiling, unit_point_light()],
            camera_looking_down(1.5, 1.0),
        );
        let max_bounces: u32 = 64;
        let tracer = PhotonTracer::new(&scene, settings(max_bounces));
        let mut surface = vec![Photon::default(); 3];
        let mut volume: Vec<VolumePhoton> = Vec::new();
        let mut path = vec![PathPhoton::default(); 2];
        let mut surface_range = PhotonRange::new(&mut surface);
        let mut volume_range = PhotonRange::new(&mut volume);
        let mut path_range = PhotonRange::new(&mut path);
        let mut sampler = RandomSampler::new(11);
        for _ in 0..100 {
            tracer.trace_photon(
                &mut surface_range,
                &mut volume_range,
                &mut path_range,
                &mut sampler,
            );
        }
        assert_eq!(surface_range.len(), 3);
        assert!(volume_range.is_empty());
        assert_eq!(path_range.len(), 2);
        assert!(surface_range.full() && volume_range.full() && path_range.full());
        assert_eq!(path_range.photons()[0].bounce(), 0);
        for photon in surface_range.photons() {
            assert!(photon.bounce >= 1 && photon.bounce < max_bounces);
        }
    }

    #[test]
    fn camera_paths_pass_through_transparent_surfaces() {
        let emitter: Arc<dyn Primitive> = Arc::new(
            Quad::horizontal(Point3f::default(), 1.0, Arc::new(LambertBsdf::default()))
                .with_emission(Spectrum::new(2.0)),
        );
        let veil: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::new(0.0, 1.0, 0.0),
            1.0,
            Arc::new(NullBsdf::default()),
        ));
        let scene = Scene::new(vec![emitter, veil], camera_looking_down(2.0, 10.0));
        let empty: KdTree<Photon> = KdTree::new(Vec::new());
        let mut sampler = RandomSampler::new(6);
        let mut tracer = PhotonTracer::new(&scene, settings(4));
        for _ in 0..10 {
            let radiance = tracer.trace_sample(
                Point2i { x: 0, y: 0 },
                &empty,
                VolumeLookup::None,
                &mut sampler,
                1e30,
                1e30,
            );
            // full transparency, the throughput stays one
            assert_eq!(radiance, Spectrum::new(2.0));
        }
        // passing the veil counts as a bounce
        let mut skip_one = settings(4);
        skip_one.min_bounces = 1;
        let mut tracer = PhotonTracer::new(&scene, skip_one);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &empty,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            1e30,
        );
        assert_eq!(radiance, Spectrum::new(2.0));
        let mut skip_two = settings(4);
        skip_two.min_bounces = 2;
        let mut tracer = PhotonTracer::new(&scene, skip_two);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &empty,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            1e30,
        );
        assert!(radiance.is_black());
    }

    fn photon_below(x: Float) -> Photon {
        Photon {
            pos: Point3f::new(x, 0.0, 0.0),
            dir: Vector3f::new(0.0, -1.0, 0.0),
            power: Spectrum::new(1.0),
            bounce: 1,
        }
    }

    #[test]
    fn gather_radius_policy() {
        let scene = Scene::new(vec![diffuse_floor(10.0)], camera_looking_down(2.0, 0.01));
        let tree = KdTree::new(vec![
            photon_below(0.0),
            photon_below(0.1),
            photon_below(-0.2),
            photon_below(0.3),
        ]);
        let diffuse: Float = 0.5 * INV_PI;
        let mut sampler = RandomSampler::new(2);
        // all four requested photons found: radius of the farthest
        let mut full = settings(4);
        full.gather_count = 4;
        let mut tracer = PhotonTracer::new(&scene, full);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &tree,
            VolumeLookup::None,
            &mut sampler,
            1.0,
            1.0,
        );
        let expected = 4.0 * diffuse * INV_PI / 0.09;
        assert!((radiance[0] - expected).abs() < 0.01 * expected);
        // fewer photons than requested: the fixed gather radius
        let mut partial = settings(4);
        partial.gather_count = 10;
        let mut tracer = PhotonTracer::new(&scene, partial);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &tree,
            VolumeLookup::None,
            &mut sampler,
            1.0,
            1.0,
        );
        let expected = 4.0 * diffuse * INV_PI;
        assert!((radiance[0] - expected).abs() < 1e-3 * expected);
        // photons of too long paths are filtered out
        let mut short = settings(1);
        short.gather_count = 10;
        let mut tracer = PhotonTracer::new(&scene, short);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &tree,
            VolumeLookup::None,
            &mut sampler,
            1.0,
            1.0,
        );
        assert!(radiance.is_black());
    }

    #[test]
    fn mirror_corridor_terminates() {
        // two parallel mirrors, light and camera in between
        let floor: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::default(),
            1000.0,
            Arc::new(MirrorBsdf::new(Spectrum::new(1.0))),
        ));
        let ceiling: Arc<dyn Primitive> = Arc::new(Quad::horizontal(
            Point3f::new(0.0, 2.0, 0.0),
            1000.0,
            Arc::new(MirrorBsdf::new(Spectrum::new(1.0))),
        ));
        let camera = Arc::new(PinholeCamera::look_at(
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.3, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            1.0,
            Point2i { x: 1, y: 1 },
        ));
        let scene = Scene::new(vec![floor, ceiling, unit_point_light()], camera);
        let max_bounces: u32 = 6;
        let mut tracer = PhotonTracer::new(&scene, settings(max_bounces));
        let deposits = emit(&tracer, 200, 9);
        assert!(deposits.surface.is_empty());
        assert!(deposits.path.iter().all(|p| p.bounce() < max_bounces));
        let empty: KdTree<Photon> = KdTree::new(Vec::new());
        let mut sampler = RandomSampler::new(4);
        let radiance = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &empty,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            1e30,
        );
        assert!(radiance.is_black());
    }

    /// Downward facing emitter above a diffuse floor, everything in
    /// between filled with fog.
    fn foggy_scene(fog: Arc<dyn Medium>) -> Scene {
        let half: Float = 0.25;
        let emitter: Arc<dyn Primitive> = Arc::new(
            Quad::new(
                Point3f::new(-half, 2.0, half),
                Vector3f::new(0.0, 0.0, -2.0 * half),
                Vector3f::new(2.0 * half, 0.0, 0.0),
                Arc::new(LambertBsdf::default()),
            )
            .with_emission(Spectrum::new(10.0))
            .with_media(None, Some(fog.clone())),
        );
        let floor: Arc<dyn Primitive> = Arc::new(
            Quad::horizontal(Point3f::default(), 10.0, Arc::new(LambertBsdf::default()))
                .with_media(None, Some(fog.clone())),
        );
        let camera = Arc::new(
            PinholeCamera::look_at(
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::default(),
                Vector3f::new(0.0, 0.0, 1.0),
                1.0,
                Point2i { x: 1, y: 1 },
            )
            .with_medium(Some(fog)),
        );
        Scene::new(vec![emitter, floor], camera)
    }

    #[test]
    fn fog_scatters_photons_and_both_volume_estimators_see_them() {
        let fog: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(
            &Spectrum::new(0.05),
            &Spectrum::new(0.5),
            0.0,
        ));
        let scene = foggy_scene(fog);
        let radius: Float = 0.2;
        let mut tracer = PhotonTracer::new(&scene, settings(4));
        let deposits = emit(&tracer, 20_000, 17);
        assert!(!deposits.volume.is_empty());
        assert!(deposits.volume.iter().all(|p| p.bounce >= 1 && p.bounce < 4));
        let surface_tree: KdTree<Photon> = KdTree::new(Vec::new());
        let mut volume_tree = KdTree::new(deposits.volume);
        volume_tree.build_volume_hierarchy(VolumeRadius::Fixed(radius));
        let mut path = deposits.path;
        link_path_beams(&mut path);
        let bvh = BeamBvh::new(&path, radius, 4);
        let mut sampler = RandomSampler::new(8);
        let points = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &surface_tree,
            VolumeLookup::Points(&volume_tree),
            &mut sampler,
            1e30,
            radius,
        );
        let beams = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &surface_tree,
            VolumeLookup::Beams {
                bvh: &bvh,
                path_photons: &path,
            },
            &mut sampler,
            1e30,
            radius,
        );
        for estimate in [points, beams].iter() {
            assert!(estimate.is_finite());
            assert!(estimate.min_component_value() > 0.0, "{:?}", estimate);
        }
        // without a volume estimator the floor alone contributes nothing
        let none = tracer.trace_sample(
            Point2i { x: 0, y: 0 },
            &surface_tree,
            VolumeLookup::None,
            &mut sampler,
            1e30,
            radius,
        );
        assert!(none.is_black());
    }
}
