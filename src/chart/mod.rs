/// Chart geometry that is independent of any drawing backend.
///
/// Everything here is expressed in canvas-local pixels (origin at the
/// top-left corner of the chart), so the egui painter and the SVG writer
/// consume the same numbers.

pub mod curve;
pub mod layout;
pub mod scale;
