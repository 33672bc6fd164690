//! CPU rasterization on `vello_cpu`.

use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, PixelBuffer, Point, Rect, Rgba};
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::geometry::rounded_rect_path;
use crate::render::backend::{Primitive, RenderBackend, ShadowPrimitive};
use crate::render::blur::{blur_rgba8_premul, shadow_kernel};

/// Rasterizes primitives into a premultiplied RGBA8 pixmap.
///
/// Primitives accumulate in a `vello_cpu` render context; [`finish`](Self::finish) resolves
/// them into pixels. A color clear discards everything submitted before it.
pub struct CpuBackend {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl CpuBackend {
    pub fn new(width: u32, height: u32) -> GraphicsResult<Self> {
        let (width, height) = dims_u16(width, height, "render target")?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Resolve everything submitted so far into a premultiplied pixel buffer.
    #[tracing::instrument(level = "debug", skip(self), fields(width = self.width, height = self.height))]
    pub fn finish(&mut self) -> PixelBuffer {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        PixelBuffer {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn clear(&mut self, color: Rgba) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        if color.is_transparent() {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn fill(&mut self, path: &BezPath, color: Rgba, transform: Affine) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn shadow(&mut self, shadow: &ShadowPrimitive) -> GraphicsResult<()> {
        let (radius, sigma) = shadow_kernel(shadow.blur_radius);
        let to_target = shadow.transform * Affine::translate(shadow.geometry.pos.to_vec2());
        let Some(region) = self.visible_shadow_region(shadow, to_target, radius) else {
            return Ok(());
        };
        let (w, h) = dims_u16(
            region.width() as u32,
            region.height() as u32,
            "box shadow buffer",
        )?;

        let mut body = vello_cpu::RenderContext::new(w, h);
        body.set_transform(affine_to_cpu(Affine::translate((-region.x0, -region.y0))));
        body.set_paint(color_to_cpu(shadow.color));
        body.fill_path(&bezpath_to_cpu(&rounded_rect_path(
            shadow.body,
            shadow.border_radius,
        )));
        body.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        body.render_to_pixmap(&mut pixmap);

        let blurred = blur_rgba8_premul(
            pixmap.data_as_u8_slice(),
            u32::from(w),
            u32::from(h),
            radius,
            sigma,
        )?;
        let image = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(premul_bytes_to_pixmap(
                &blurred, w, h,
            )?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(
            to_target * Affine::translate((region.x0, region.y0)),
        ));
        self.ctx.set_paint(image);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        Ok(())
    }

    /// Part of the shadow box, in its own pixel grid, that can reach the target.
    ///
    /// The target is mapped back into shadow space and grown by the blur radius so pixels
    /// cut away never bleed into visible ones. `None` when nothing is visible.
    fn visible_shadow_region(
        &self,
        shadow: &ShadowPrimitive,
        to_target: Affine,
        blur_radius: u32,
    ) -> Option<Rect> {
        let size = shadow.geometry.size;
        if !(size.width > 0.0 && size.height > 0.0) {
            return None;
        }
        let det = to_target.determinant();
        if !det.is_finite() || det == 0.0 {
            return None;
        }
        let target = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        let margin = f64::from(blur_radius);
        let reach = to_target
            .inverse()
            .transform_rect_bbox(target)
            .inflate(margin, margin);
        let full = Rect::new(0.0, 0.0, size.width.ceil(), size.height.ceil());
        let clipped = full.intersect(reach);
        let region = Rect::new(
            clipped.x0.floor().max(0.0),
            clipped.y0.floor().max(0.0),
            clipped.x1.ceil().min(full.x1),
            clipped.y1.ceil().min(full.y1),
        );
        (region.width() >= 1.0 && region.height() >= 1.0).then_some(region)
    }
}

impl RenderBackend for CpuBackend {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn submit(&mut self, primitive: Primitive) -> GraphicsResult<()> {
        match primitive {
            Primitive::Clear { color, mask } => {
                // Depth and stencil buffers do not exist on this target.
                if mask.color {
                    self.clear(color);
                }
                Ok(())
            }
            Primitive::Fill {
                path,
                color,
                transform,
            } => {
                self.fill(&path, color, transform);
                Ok(())
            }
            Primitive::Shadow(shadow) => self.shadow(&shadow),
        }
    }
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn dims_u16(width: u32, height: u32, what: &str) -> GraphicsResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GraphicsError::resource(format!("{what} width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GraphicsError::resource(format!("{what} height {height} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(GraphicsError::resource(format!(
            "{what} must be non-empty, got {width}x{height}"
        )));
    }
    Ok((w, h))
}

fn color_to_cpu(c: Rgba) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    w: u16,
    h: u16,
) -> GraphicsResult<vello_cpu::Pixmap> {
    if rgba8_premul.len() != PixelBuffer::expected_len(u32::from(w), u32::from(h)) {
        return Err(GraphicsError::resource(
            "blurred shadow byte length mismatch",
        ));
    }
    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
