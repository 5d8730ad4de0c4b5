//! Caller-owned interaction state: the Bezier editor, cameras and views.

mod bezier_editor;
mod camera;
mod view;

pub use bezier_editor::{BezierEditor, BezierEditorConfig};
pub use camera::{CameraCommand, CameraConfig, Frustum, QuaternionCamera, look_at};
pub use view::{Axis, ModelRotation, OrthoBounds, canvas_to_ndc};
