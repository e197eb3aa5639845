//! # Interaction Mapper
//!
//! Pointer positions re-enter the numeric core here: the pixel is mapped back through the
//! inverse transform, and the click is only accepted when its `x` lies inside `[a, b]`.
//! Rejected or locked clicks never reach the callback.
use crate::numerical::coordinate_mapper::CoordinateMapper;
use crate::numerical::domain::{Interval, MathPoint, ScreenPoint};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionMapper {
    mapper: CoordinateMapper,
    interval: Interval,
    locked: bool,
}

impl InteractionMapper {
    pub fn new(mapper: CoordinateMapper, interval: Interval) -> Self {
        Self {
            mapper,
            interval,
            locked: false,
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// A locked mapper ignores every click, e.g. while a solver animation is running.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Unconditional inverse transform of a pointer position.
    pub fn pointer_to_math(&self, px: f64, py: f64) -> MathPoint {
        self.mapper.to_math(ScreenPoint::new(px, py))
    }

    /// The accepted domain point, or `None` for a rejected click.
    pub fn pick(&self, px: f64, py: f64) -> Option<MathPoint> {
        if self.locked {
            debug!("click at ({}, {}) ignored: interaction locked", px, py);
            return None;
        }
        let point = self.pointer_to_math(px, py);
        if self.interval.contains(point.x) {
            Some(point)
        } else {
            debug!(
                "click at ({}, {}) rejected: x = {:.4} outside [{}, {}]",
                px,
                py,
                point.x,
                self.interval.a(),
                self.interval.b()
            );
            None
        }
    }

    /// Calls `on_estimate` with the accepted `x`; returns whether it was called.
    pub fn handle_click<C>(&self, px: f64, py: f64, on_estimate: C) -> bool
    where
        C: FnOnce(f64),
    {
        match self.pick(px, py) {
            Some(point) => {
                on_estimate(point.x);
                true
            }
            None => false,
        }
    }
}
