//! Toast entry animation.

use ratatui::layout::Rect;

use reframe_types::ui::{AnimPhase, FlashEffect};

/// Slide the toast in from the right edge of the viewport while its flash runs.
#[must_use]
pub fn apply_toast_effect(flash: Option<&FlashEffect>, base: Rect, viewport: Rect) -> Rect {
    let Some(AnimPhase::Running { progress }) = flash.map(FlashEffect::phase) else {
        return base;
    };
    let t = ease_out_cubic(progress);
    let viewport_right = viewport.x.saturating_add(viewport.width);
    let base_right = base.x.saturating_add(base.width);
    let max_offset = viewport_right.saturating_sub(base.x).min(base.width);
    let x_offset = ((1.0 - t) * f32::from(max_offset)).round() as u16;
    let x = base.x.saturating_add(x_offset);
    Rect {
        x,
        width: base_right.min(viewport_right).saturating_sub(x).max(1),
        ..base
    }
}

/// True while the flash is in its first half, used to bold the toast.
#[must_use]
pub fn is_flash_peak(flash: Option<&FlashEffect>) -> bool {
    matches!(
        flash.map(FlashEffect::phase),
        Some(AnimPhase::Running { progress }) if progress < 0.5
    )
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}
