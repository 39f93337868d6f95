mod axis_config;
mod axis_config_validation;
mod continuous_axis;
mod layout_pass;
mod update_context;

pub use axis_config::{AxisConfig, ConfigChange, DEFAULT_GAP_LENGTH};
pub use continuous_axis::{ContinuousAxis, DateTimeAxis, LinearAxis, LogarithmicAxis};
pub use layout_pass::{AxisLayout, collect_axis_values, compute_layout};
pub use update_context::AxisUpdateContext;
