use crate::math::vector_2d::{pedal, unit};
use crate::math::{Point2, Vector2};
use crate::physics::BodyState;

/// Kick given to a fragment after a cut.
///
/// Points away from the cut line, tilted along it by `along_ratio`, with
/// magnitude `power / clamp(mass, 1, 5)`.
#[must_use]
pub fn slash_force(state: &BodyState, line: &[Point2; 2], along_ratio: f64, power: f64) -> Vector2 {
    let along = unit(line[1] - line[0]);
    let away = unit(state.position - pedal(&state.position, line));
    unit(away + along * along_ratio) * (power / state.mass.clamp(1.0, 5.0))
}
