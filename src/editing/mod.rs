//! Capabilities of value editors and index-based selections, free of any
//! widget toolkit. Rendering, layout and event loops belong to the embedder.

pub mod quantity;
pub mod selection;

pub use quantity::{LengthEditor, MeasurementSystem, QuantityEditor};
pub use selection::{AnyIndex, IndexBound, IndexedSelectionModel, SelectionEvent, SelectionPolicy};
