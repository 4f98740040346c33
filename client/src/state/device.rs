//! Presentation variant selection.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell renders one component tree parameterized by [`Variant`].
//! Narrow viewports default to the mobile variant; the device switcher can
//! force either one, and that choice outlives reloads.

#[cfg(test)]
#[path = "device_test.rs"]
mod device_test;

/// Viewports narrower than this render the mobile variant.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Desktop,
    Mobile,
}

impl Variant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "desktop" => Some(Self::Desktop),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Mobile => "Mobile",
        }
    }
}

#[must_use]
pub fn classify_width(width_px: f64) -> Variant {
    if width_px < MOBILE_BREAKPOINT_PX { Variant::Mobile } else { Variant::Desktop }
}

/// Detected viewport class plus the user's override, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub detected: Variant,
    pub forced: Option<Variant>,
}

impl DeviceState {
    #[must_use]
    pub fn effective(&self) -> Variant {
        self.forced.unwrap_or(self.detected)
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.effective() == Variant::Mobile
    }
}
