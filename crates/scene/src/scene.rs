use glam::{Vec2, Vec3};
use peakbars_assets::{DatasetSource, LoadError, ViewerConfig, load_dataset};
use peakbars_chart::{ChartError, DatasetWidget, Gradient, WidgetStyle};
use peakbars_common::{Color, CountryRecord};
use peakbars_geometry::LineSegments;
use peakbars_input::{ChartAction, HoverState, PickingController, PointerState};
use peakbars_render::{
    AmbientLight, DirectionalLight, Frame, LineNode, Lighting, OrbitControls, OrthographicCamera,
};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("dataset load failed: {0}")]
    Load(#[from] LoadError),
    #[error("chart error: {0}")]
    Chart(#[from] ChartError),
}

/// The chart plus its camera rig, lights and floor grid.
#[derive(Debug)]
pub struct ChartScene {
    camera: OrthographicCamera,
    controls: OrbitControls,
    lighting: Lighting,
    background: Color,
    grid: LineNode,
    widget: DatasetWidget,
    picker: PickingController,
    pointer: PointerState,
    viewport: Vec2,
}

impl ChartScene {
    pub fn new(records: &[CountryRecord], config: &ViewerConfig) -> Result<Self, SceneError> {
        let style = WidgetStyle {
            gradient: Gradient::from_hex(config.palette.gradient_start, config.palette.gradient_end),
            outline_color: Color::from_hex(config.palette.outline),
        };
        let widget = DatasetWidget::new(records, style)?;

        let viewport = Vec2::new(config.window.width.max(1) as f32, config.window.height.max(1) as f32);
        let cam = &config.camera;
        let target = Vec3::from_array(cam.target);
        let mut camera = OrthographicCamera::new(cam.frustum_size, viewport.x / viewport.y, cam.near, cam.far);
        camera.position = Vec3::from_array(cam.direction).normalize_or_zero() * cam.distance;
        camera.look_at(target);

        let ctl = &config.controls;
        let mut controls = OrbitControls::new(target);
        controls.enable_damping = ctl.enable_damping;
        controls.damping_factor = ctl.damping_factor;
        controls.rotate_speed = ctl.rotate_speed;
        controls.zoom_speed = ctl.zoom_speed;
        controls.pan_speed = ctl.pan_speed;
        controls.min_zoom = ctl.min_zoom;
        controls.max_zoom = ctl.max_zoom;

        let light = &config.lighting;
        let lighting = Lighting {
            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: light.ambient_intensity,
            },
            directional: DirectionalLight {
                color: Color::WHITE,
                intensity: light.directional_intensity,
                position: Vec3::from_array(light.directional_position),
            },
        };

        let grid = LineNode::new(
            "grid",
            LineSegments::grid(config.grid.size, config.grid.divisions),
            Color::from_hex(config.grid.color),
        );

        tracing::info!(
            bars = widget.len(),
            width = viewport.x,
            height = viewport.y,
            "chart scene built"
        );

        Ok(Self {
            camera,
            controls,
            lighting,
            background: Color::from_hex(config.window.background),
            grid,
            widget,
            picker: PickingController::new(),
            pointer: PointerState::default(),
            viewport,
        })
    }

    /// Load the dataset, then build the scene. Nothing is built on failure.
    pub fn load(source: &DatasetSource, config: &ViewerConfig) -> Result<Self, SceneError> {
        let records = load_dataset(source)?;
        Self::new(&records, config)
    }

    /// Match the camera frustum to a new viewport. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.camera.set_aspect(self.viewport.x / self.viewport.y);
        tracing::debug!(width, height, "scene resized");
    }

    /// Record the pointer at a client pixel position.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.set_client(Vec2::new(x, y), self.viewport);
    }

    pub fn rotate_drag(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(Vec2::new(dx, dy), self.viewport.y);
    }

    pub fn pan_drag(&mut self, dx: f32, dy: f32) {
        self.controls.pan(Vec2::new(dx, dy), &self.camera, self.viewport);
    }

    pub fn scroll(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    pub fn apply(&mut self, action: ChartAction) {
        match action {
            ChartAction::PointerMoved(p) => self.pointer_moved(p.x, p.y),
            ChartAction::Rotate(d) => self.rotate_drag(d.x, d.y),
            ChartAction::Pan(d) => self.pan_drag(d.x, d.y),
            ChartAction::Zoom(steps) => self.scroll(steps),
            ChartAction::Resize(size) => self.resize(size.x as u32, size.y as u32),
        }
    }

    /// Advance one frame: move the camera, then update hover and tooltips.
    pub fn frame(&mut self) -> Result<HoverState, SceneError> {
        self.controls.update(&mut self.camera);
        let half = self.half_extent();
        let state = self
            .picker
            .update(self.pointer.ndc(), &self.camera, &mut self.widget, half)?;
        Ok(state)
    }

    /// What to draw: grid, bars, then the outline overlay.
    pub fn render_frame(&self) -> Frame<'_> {
        let mut frame = Frame::new(&self.camera, &self.lighting, self.background);
        frame.push(&self.grid);
        for item in self.widget.renderables() {
            frame.push(item);
        }
        frame
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn widget(&self) -> &DatasetWidget {
        &self.widget
    }

    pub fn hover(&self) -> HoverState {
        self.picker.state()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn half_extent(&self) -> Vec2 {
        self.viewport / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakbars_render::{DebugTextRenderer, Renderer};
    use std::io::Write;

    fn records() -> Vec<CountryRecord> {
        vec![
            CountryRecord::new("A", vec![1.0, 2.0]),
            CountryRecord::new("B", vec![3.0, 4.0]),
        ]
    }

    fn scene() -> ChartScene {
        ChartScene::new(&records(), &ViewerConfig::default()).unwrap()
    }

    #[test]
    fn builds_with_default_config() {
        let s = scene();
        assert_eq!(s.widget().len(), 2);
        assert_eq!(s.viewport(), Vec2::new(1280.0, 720.0));
        assert_eq!(s.camera().target, Vec3::new(0.0, 2.5, 0.0));
        let expected = Vec3::new(-1.0, 1.0, 0.75).normalize() * 12.0;
        assert!(s.camera().position.abs_diff_eq(expected, 1e-5));
        assert_eq!(s.background().to_hex(), 0xface8d);
        assert!(s.controls().enable_damping);
    }

    #[test]
    fn first_frame_hovers_nothing() {
        let mut s = scene();
        s.widget.show_data();
        assert_eq!(s.frame().unwrap(), HoverState::Idle);
        assert!(!s.widget().is_data_visible());
    }

    #[test]
    fn pointer_at_view_center_hovers_a_bar() {
        let mut s = scene();
        s.pointer_moved(640.0, 360.0);
        let state = s.frame().unwrap();
        let Some(index) = state.bar() else {
            panic!("expected a hovered bar, got {state:?}");
        };
        assert!(s.widget().is_data_visible());
        assert_eq!(s.widget().name_tooltip().text, s.widget().bars()[index].country_name);
    }

    #[test]
    fn resize_applies_to_camera_and_viewport() {
        let mut s = scene();
        s.resize(400, 800);
        assert_eq!(s.viewport(), Vec2::new(400.0, 800.0));
        assert!((s.camera().aspect() - 0.5).abs() < 1e-6);
        assert_eq!(s.half_extent(), Vec2::new(200.0, 400.0));

        s.resize(0, 300);
        assert_eq!(s.viewport(), Vec2::new(400.0, 800.0));
    }

    #[test]
    fn actions_reach_the_camera() {
        let mut s = scene();
        let start = s.camera().position;
        s.apply(ChartAction::Rotate(Vec2::new(200.0, 0.0)));
        s.apply(ChartAction::Zoom(2.0));
        s.frame().unwrap();
        assert_ne!(s.camera().position, start);
        assert!(s.camera().zoom > 1.0);

        s.apply(ChartAction::PointerMoved(Vec2::new(0.0, 0.0)));
        assert_eq!(s.pointer().ndc(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn render_frame_orders_grid_bars_outline() {
        let s = scene();
        let frame = s.render_frame();
        let names: Vec<&str> = frame.items.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["grid", "A", "B", "outline"]);

        let text = DebugTextRenderer::new().render(&frame);
        assert!(text.contains("grid lines=22"));
        assert!(text.contains("background=#face8d"));
        // The outline is hidden until something is hovered.
        assert!(!text.contains("outline"));
    }

    #[test]
    fn config_drives_palette_and_grid() {
        let mut config = ViewerConfig::default();
        config.palette.gradient_start = 0x000000;
        config.grid.divisions = 4;
        let s = ChartScene::new(&records(), &config).unwrap();
        assert_eq!(s.widget().bars()[0].color.to_hex(), 0x000000);
        assert_eq!(s.grid.lines.segment_count(), 10);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(br#"[{"countryName": "A", "peaks": [1, 2, 3]}]"#).unwrap();
        let source = DatasetSource::File(tmp.path().to_path_buf());
        let s = ChartScene::load(&source, &ViewerConfig::default()).unwrap();
        assert_eq!(s.widget().len(), 1);
    }

    #[test]
    fn failed_load_builds_no_scene() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::File(dir.path().join("absent.json"));
        let err = ChartScene::load(&source, &ViewerConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::Load(LoadError::Io(_))));
    }

    /// Answer one HTTP request on a local port with `response`.
    fn serve_once(response: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = std::io::Read::read(&mut stream, &mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/population_data.json")
    }

    #[test]
    fn http_404_builds_no_scene() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = ChartScene::load(&DatasetSource::Http(url), &ViewerConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::Load(LoadError::Http { status: 404 })), "{err:?}");
    }
}
