use glam::Vec2;
use peakbars_chart::{ChartError, DatasetWidget};
use peakbars_render::OrthographicCamera;

/// Which bar, if any, is under the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(usize),
}

impl HoverState {
    pub fn bar(self) -> Option<usize> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(index) => Some(index),
        }
    }
}

/// Per-frame hover picking.
///
/// Each update casts a ray from the pointer through the camera and keeps the
/// nearest bar it hits. Entering a bar, or moving onto a different one,
/// rebuilds the highlight and shows it; a miss hides it. Tooltip positions are
/// recomputed every hovering frame since the camera may still be gliding.
#[derive(Debug, Clone, Default)]
pub struct PickingController {
    state: HoverState,
}

impl PickingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn update(
        &mut self,
        pointer_ndc: Vec2,
        camera: &OrthographicCamera,
        widget: &mut DatasetWidget,
        half_extent: Vec2,
    ) -> Result<HoverState, ChartError> {
        let ray = camera.ray_from_ndc(pointer_ndc);
        let Some((index, distance)) = widget.pick(&ray) else {
            widget.hide_data();
            widget.clear_selection();
            if self.state != HoverState::Idle {
                tracing::debug!("hover cleared");
            }
            self.state = HoverState::Idle;
            return Ok(self.state);
        };

        if self.state != HoverState::Hovering(index) {
            widget.set_selected(index)?;
            widget.show_data();
            tracing::debug!(bar = index, distance, "hover entered");
            self.state = HoverState::Hovering(index);
        }
        widget.show_text(index, camera, half_extent)?;
        Ok(self.state)
    }
}
