use glam::{Vec2, Vec3};
use peakbars_common::{Color, CountryRecord, Transform};
use peakbars_geometry::Ray;
use peakbars_render::{OrthographicCamera, Renderable};

use crate::error::ChartError;
use crate::gradient::Gradient;
use crate::group::CountryBar;
use crate::outline::{GeometryStats, OutlineOverlay};
use crate::tooltip::Tooltip;

/// Distance between neighbouring bars along Z.
pub const BAR_SPACING: f32 = 0.5;

/// Lateral offset of bar `index` out of `count`, centering the row on z = 0.
/// The first bar sits nearest the viewer.
pub fn lateral_offset(index: usize, count: usize) -> f32 {
    ((count as f32 - 1.0) * 0.5 - index as f32) * BAR_SPACING
}

/// Display options for [`DatasetWidget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetStyle {
    pub gradient: Gradient,
    pub outline_color: Color,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            outline_color: Color::from_hex(0xff0088),
        }
    }
}

/// The whole chart: one bar per country plus the highlight outline and the
/// two tooltips that follow the selected bar.
///
/// The outline and both tooltips are shown and hidden together.
#[derive(Debug)]
pub struct DatasetWidget {
    bars: Vec<CountryBar>,
    outline: OutlineOverlay,
    name_tooltip: Tooltip,
    value_tooltip: Tooltip,
    selected: Option<usize>,
    stats: GeometryStats,
}

impl DatasetWidget {
    pub fn new(records: &[CountryRecord], style: WidgetStyle) -> Result<Self, ChartError> {
        let count = records.len();
        let mut bars = Vec::with_capacity(count);
        for (index, record) in records.iter().enumerate() {
            let mut bar = CountryBar::from_record(record).map_err(|source| ChartError::Bar {
                country: record.country_name.clone(),
                source,
            })?;
            bar.color = style.gradient.sample(index, count);
            bar.transform = Transform::from_position(Vec3::new(0.0, 0.0, lateral_offset(index, count)));
            bars.push(bar);
        }
        if bars.is_empty() {
            tracing::warn!("dataset widget built with no bars");
        }

        let mut stats = GeometryStats::default();
        let outline = OutlineOverlay::new(style.outline_color, &mut stats);
        Ok(Self {
            bars,
            outline,
            name_tooltip: Tooltip::default(),
            value_tooltip: Tooltip::default(),
            selected: None,
            stats,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[CountryBar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> Result<&CountryBar, ChartError> {
        self.bars.get(index).ok_or(ChartError::UnknownBar {
            index,
            len: self.bars.len(),
        })
    }

    /// The bar the outline was last built for.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn outline(&self) -> &OutlineOverlay {
        &self.outline
    }

    pub fn name_tooltip(&self) -> &Tooltip {
        &self.name_tooltip
    }

    pub fn value_tooltip(&self) -> &Tooltip {
        &self.value_tooltip
    }

    pub fn tooltips(&self) -> [&Tooltip; 2] {
        [&self.name_tooltip, &self.value_tooltip]
    }

    pub fn geometry_stats(&self) -> GeometryStats {
        self.stats
    }

    pub fn is_data_visible(&self) -> bool {
        self.outline.visible
    }

    pub fn show_data(&mut self) {
        self.outline.visible = true;
        self.name_tooltip.show();
        self.value_tooltip.show();
    }

    pub fn hide_data(&mut self) {
        self.outline.visible = false;
        self.name_tooltip.hide();
        self.value_tooltip.hide();
    }

    /// Forget the selected bar. The outline keeps its last geometry until
    /// the next `set_selected`.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Point the outline and tooltip texts at bar `index`.
    pub fn set_selected(&mut self, index: usize) -> Result<(), ChartError> {
        let bar = self.bars.get(index).ok_or(ChartError::UnknownBar {
            index,
            len: self.bars.len(),
        })?;
        self.outline.rebuild(bar.mesh(), bar.transform, &mut self.stats);
        self.name_tooltip.set_text(bar.country_name.clone());
        self.value_tooltip.set_text(format!("{:.2}", bar.latest()));
        self.selected = Some(index);
        Ok(())
    }

    /// Place the tooltips at bar `index`'s anchors as seen through `camera`:
    /// the name below the first peak, the value above the last.
    pub fn show_text(
        &mut self,
        index: usize,
        camera: &OrthographicCamera,
        half_extent: Vec2,
    ) -> Result<(), ChartError> {
        let bar = self.bar(index)?;
        let mut anchors = [Vec2::ZERO; 2];
        bar.project_anchors(camera, half_extent, &mut anchors);
        let viewport = half_extent * 2.0;
        self.name_tooltip.place(anchors[0], viewport);
        self.value_tooltip.place(anchors[1], viewport);
        Ok(())
    }

    /// Nearest bar hit by `ray` and its distance. Equal distances keep the
    /// earlier bar.
    pub fn pick(&self, ray: &Ray) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, bar) in self.bars.iter().enumerate() {
            let Some(distance) = bar.raycast(ray) else {
                continue;
            };
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best
    }

    /// Bars first, then the outline, which draws over them.
    pub fn renderables(&self) -> impl Iterator<Item = &dyn Renderable> + '_ {
        self.bars
            .iter()
            .map(|bar| bar as &dyn Renderable)
            .chain(std::iter::once(&self.outline as &dyn Renderable))
    }
}
