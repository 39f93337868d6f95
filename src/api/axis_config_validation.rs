use crate::error::{AxisError, AxisResult};

pub(super) fn validate_bounds(minimum: Option<f64>, maximum: Option<f64>) -> AxisResult<()> {
    if let Some(minimum) = minimum {
        if !minimum.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "axis minimum must be finite".to_owned(),
            ));
        }
    }
    if let Some(maximum) = maximum {
        if !maximum.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "axis maximum must be finite".to_owned(),
            ));
        }
    }
    if let (Some(minimum), Some(maximum)) = (minimum, maximum) {
        if minimum > maximum {
            return Err(AxisError::InvalidConfiguration(
                "axis minimum must be <= maximum".to_owned(),
            ));
        }
    }
    Ok(())
}

pub(super) fn validate_major_step(step: Option<f64>) -> AxisResult<()> {
    if let Some(step) = step {
        if !step.is_finite() || step <= 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "major step must be finite and > 0".to_owned(),
            ));
        }
    }
    Ok(())
}

pub(super) fn validate_desired_tick_count(count: Option<usize>) -> AxisResult<()> {
    if matches!(count, Some(count) if count < 2) {
        return Err(AxisError::InvalidConfiguration(
            "desired tick count must be >= 2".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_maximum_ticks(maximum_ticks: usize) -> AxisResult<()> {
    if maximum_ticks <= 1 {
        return Err(AxisError::InvalidConfiguration(
            "maximum ticks must be > 1".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_gap_length(gap_length: f64) -> AxisResult<()> {
    if !gap_length.is_finite() || !(0.0..=1.0).contains(&gap_length) {
        return Err(AxisError::InvalidConfiguration(
            "gap length must be finite and in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_zoom(zoom: f64) -> AxisResult<()> {
    if !zoom.is_finite() || zoom < 1.0 {
        return Err(AxisError::InvalidViewport(
            "zoom factor must be finite and >= 1".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_pan_offset(pan_offset: f64) -> AxisResult<()> {
    if !pan_offset.is_finite() {
        return Err(AxisError::InvalidViewport(
            "pan offset must be finite".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_plot_length(length_px: f64) -> AxisResult<()> {
    if !length_px.is_finite() || length_px <= 0.0 {
        return Err(AxisError::InvalidViewport(
            "plot length must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}
