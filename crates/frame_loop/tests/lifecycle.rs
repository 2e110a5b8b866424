mod common;

use bevy_math::Mat4;
use bevy_math::Vec3;
use common::RecordingDevice;
use common::VALID_PIXEL;
use common::VALID_VERTEX;
use common::shader_dir;
use common::surface;
use frame_loop::DriverTier;
use frame_loop::FrameLoop;
use frame_loop::FrameLoopConfig;
use frame_loop::FrameLoopError;
use frame_loop::LoopState;
use frame_loop::RasterizerConfig;
use frame_loop::RenderDevice;
use frame_loop::Scene;
use frame_loop::geometry::Semantic;
use frame_loop::geometry::triangle;
use frame_loop::logging::LogFile;
use frame_loop::logging::log_file_layer;
use frame_loop::shader::ShaderProgram;
use frame_loop::sphere::SphereMesh;
use frame_loop::transform::ConstantBuffer;
use frame_loop::transform::Projection;
use frame_loop::transform::aspect_ratio_of;
use tracing_subscriber::layer::SubscriberExt;

fn clear_only_scene() -> Scene {
    Scene {
        clear_color: [0.0, 0.0, 1.0, 1.0],
        program: None,
        mesh: None,
        depth_buffer: false,
        rasterizer: None,
        world_translation: Vec3::new(0.0, 0.0, 3.0),
    }
}

fn triangle_scene(name: &str) -> Scene {
    let dir = shader_dir(name, VALID_VERTEX, VALID_PIXEL);
    Scene {
        clear_color: [0.0, 0.0, 0.0, 1.0],
        program: Some(ShaderProgram::new(dir, [Semantic::Position, Semantic::Color])),
        mesh: Some(triangle()),
        depth_buffer: false,
        rasterizer: None,
        world_translation: Vec3::new(0.0, 0.0, 3.0),
    }
}

fn sphere_scene(name: &str) -> Scene {
    let dir = shader_dir(name, VALID_VERTEX, VALID_PIXEL);
    Scene {
        clear_color: [0.0, 0.0, 0.0, 1.0],
        program: Some(ShaderProgram::new(dir, [Semantic::Position])),
        mesh: Some(SphereMesh::default().into_mesh()),
        depth_buffer: true,
        rasterizer: Some(RasterizerConfig::CULL_NONE_SOLID),
        world_translation: Vec3::new(0.0, 0.0, 3.0),
    }
}

fn new_loop(scene: Scene) -> FrameLoop<RecordingDevice> {
    FrameLoop::new(FrameLoopConfig::default(), scene)
}

#[test]
fn resize_binds_target_and_viewport_with_matching_aspect() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    assert_eq!(frame_loop.state(), LoopState::Running);

    for (w, h) in [(1024, 768), (320, 1000), (1, 1), (1920, 1080)] {
        frame_loop.resize(w, h).unwrap();
        let recording = surface.borrow();
        assert!(recording.render_target_bound);
        assert_eq!(recording.viewport, Some((w, h)));
        let expected = w as f32 / h as f32;
        assert!((aspect_ratio_of(&frame_loop.projection()) - expected).abs() < 1e-4 * expected.max(1.0));
        assert_eq!(frame_loop.state(), LoopState::Running);
    }
}

#[test]
fn zero_size_resize_keeps_previous_views() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    frame_loop.resize(0, 0).unwrap();
    assert_eq!(surface.borrow().viewport, Some((800, 600)));
    assert_eq!(frame_loop.size(), (800, 600));
}

#[test]
fn shutdown_releases_every_object_in_dependency_order() {
    let surface = surface();
    let mut frame_loop = new_loop(sphere_scene("shutdown"));
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    assert!(surface.borrow().live > 0);
    assert_eq!(
        frame_loop.device().map(|device| device.live_objects()),
        Some(surface.borrow().live)
    );

    frame_loop.set_active(true);
    frame_loop.render_frame().unwrap();
    frame_loop.shutdown().unwrap();

    let recording = surface.borrow();
    assert_eq!(recording.live, 0);
    assert_eq!(
        recording.released,
        vec!["views", "buffers", "pipeline", "context", "device"]
    );
    assert_eq!(frame_loop.state(), LoopState::Terminated);
    assert!(frame_loop.device().is_none());
    drop(recording);

    frame_loop.shutdown().unwrap();
    assert_eq!(surface.borrow().released.len(), 5);
}

#[test]
fn repeated_same_size_resizes_do_not_leak() {
    let surface = surface();
    let mut frame_loop = new_loop(sphere_scene("leak"));
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    let live = surface.borrow().live;
    for _ in 0..32 {
        frame_loop.resize(800, 600).unwrap();
    }
    assert_eq!(surface.borrow().live, live);
    assert_eq!(surface.borrow().peak_live, live);
}

#[test]
fn invalid_shader_fails_initialize_and_logs_compiler_text() {
    let dir = shader_dir("invalid", "float4 mian() : SV_POSITION { return 0; }", VALID_PIXEL);
    let log_path = std::env::temp_dir().join(format!("frame_loop_it_log_{}.txt", std::process::id()));
    let log_file = LogFile::create(&log_path).unwrap();

    let surface = surface();
    let mut scene = triangle_scene("invalid_unused");
    scene.program = Some(ShaderProgram::new(dir, [Semantic::Position, Semantic::Color]));
    let mut frame_loop = new_loop(scene);

    let subscriber = tracing_subscriber::registry().with(log_file_layer(log_file));
    let result = tracing::subscriber::with_default(subscriber, || {
        frame_loop.initialize(&surface, (800, 600))
    });

    match result {
        Err(FrameLoopError::ShaderCompile { diagnostics, .. }) => {
            assert!(diagnostics.contains("error X3501"))
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(frame_loop.state(), LoopState::Uninitialized);
    assert_eq!(surface.borrow().live, 0);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("VS(1,1): error X3501: 'main': entrypoint not found"));
    std::fs::remove_file(log_path).ok();
}

#[test]
fn driver_tiers_fall_back_in_order() {
    let surface = surface();
    surface.borrow_mut().failing_tiers = vec![DriverTier::Hardware, DriverTier::Warp];
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    assert_eq!(frame_loop.driver_tier(), Some(DriverTier::Software));
    assert_eq!(surface.borrow().created_on, Some(DriverTier::Software));
}

#[test]
fn exhausting_driver_tiers_leaves_loop_uninitialized() {
    let surface = surface();
    surface.borrow_mut().failing_tiers = DriverTier::ALL.to_vec();
    let mut frame_loop = new_loop(clear_only_scene());
    match frame_loop.initialize(&surface, (800, 600)) {
        Err(FrameLoopError::DeviceCreation { tried, status }) => {
            assert_eq!(tried, DriverTier::ALL.to_vec());
            assert_eq!(status.to_string(), "0x887A0004");
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(frame_loop.state(), LoopState::Uninitialized);
}

#[test]
fn inactive_window_skips_drawing() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();

    assert!(!frame_loop.render_frame().unwrap());
    assert!(surface.borrow().clears.is_empty());

    frame_loop.set_active(true);
    assert!(frame_loop.render_frame().unwrap());
    frame_loop.update();
    let recording = surface.borrow();
    assert_eq!(recording.clears, vec![[0.0, 0.0, 1.0, 1.0]]);
    assert!(recording.draws.is_empty());
    assert_eq!(recording.presents, 1);
    assert_eq!(frame_loop.frame_count(), 1);
}

#[test]
fn triangle_frame_uploads_wvp_and_draws_three_vertices() {
    let surface = surface();
    let mut frame_loop = new_loop(triangle_scene("triangle"));
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    frame_loop.set_active(true);
    frame_loop.render_frame().unwrap();

    let expected = ConstantBuffer::from(
        Projection::default().matrix(800, 600) * Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0)),
    );
    let recording = surface.borrow();
    assert_eq!(recording.transforms, vec![expected]);
    assert_eq!(recording.draws, vec![(3, false)]);
    assert_eq!(recording.bound_inputs, vec![Semantic::Position, Semantic::Color]);
}

#[test]
fn sphere_frame_is_indexed_with_depth() {
    let surface = surface();
    let mut frame_loop = new_loop(sphere_scene("sphere"));
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    frame_loop.set_active(true);
    frame_loop.render_frame().unwrap();

    let recording = surface.borrow();
    assert!(recording.depth_bound);
    assert_eq!(recording.draws, vec![(2280, true)]);
    assert_eq!(recording.uploaded_streams, 3);
    assert_eq!(recording.bound_inputs, vec![Semantic::Position]);
}

#[test]
fn failed_present_drops_the_frame() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    frame_loop.set_active(true);
    surface.borrow_mut().fail_present = true;

    assert!(matches!(
        frame_loop.render_frame(),
        Err(FrameLoopError::Present { .. })
    ));
    assert_eq!(surface.borrow().presents, 0);
    assert_eq!(frame_loop.state(), LoopState::Running);

    surface.borrow_mut().fail_present = false;
    assert!(frame_loop.render_frame().unwrap());
    assert_eq!(surface.borrow().presents, 1);
}

#[test]
fn failed_resize_stops_presenting_until_views_return() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    frame_loop.initialize(&surface, (800, 600)).unwrap();
    frame_loop.set_active(true);

    surface.borrow_mut().fail_resize = true;
    assert!(matches!(
        frame_loop.resize(1024, 768),
        Err(FrameLoopError::SwapChainResize { .. })
    ));
    assert_eq!(frame_loop.state(), LoopState::Running);
    assert!(!frame_loop.render_frame().unwrap());
    assert_eq!(surface.borrow().presents, 0);
    assert!(surface.borrow().clears.is_empty());

    surface.borrow_mut().fail_resize = false;
    frame_loop.resize(1024, 768).unwrap();
    assert!(frame_loop.render_frame().unwrap());
    assert_eq!(surface.borrow().presents, 1);
}

#[test]
fn operations_out_of_order_are_rejected() {
    let surface = surface();
    let mut frame_loop = new_loop(clear_only_scene());
    assert!(matches!(
        frame_loop.resize(640, 480),
        Err(FrameLoopError::InvalidState {
            operation: "resize",
            state: LoopState::Uninitialized
        })
    ));
    assert!(matches!(
        frame_loop.render_frame(),
        Err(FrameLoopError::InvalidState { .. })
    ));

    frame_loop.initialize(&surface, (800, 600)).unwrap();
    assert!(matches!(
        frame_loop.initialize(&surface, (800, 600)),
        Err(FrameLoopError::InvalidState { .. })
    ));

    frame_loop.shutdown().unwrap();
    assert!(matches!(
        frame_loop.render_frame(),
        Err(FrameLoopError::InvalidState { .. })
    ));
}

#[test]
fn missing_vertex_stream_is_reported_before_upload() {
    let surface = surface();
    let mut scene = triangle_scene("mismatch");
    if let Some(program) = scene.program.as_mut() {
        program.inputs = vec![Semantic::Position, Semantic::Normal];
    }
    let mut frame_loop = new_loop(scene);
    assert!(matches!(
        frame_loop.initialize(&surface, (800, 600)),
        Err(FrameLoopError::InputLayoutMismatch { semantic: "NORMAL" })
    ));
    assert_eq!(surface.borrow().live, 0);
    assert_eq!(surface.borrow().uploaded_streams, 0);
}
