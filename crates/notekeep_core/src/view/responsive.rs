//! Responsive sizing lookup tables.
//!
//! # Responsibility
//! - Classify a window width into a size class.
//! - Resolve spacing/typography values and the dashboard grid layout.
//!
//! # Invariants
//! - Size classes partition all widths: mobile < 480 <= tablet < 1024 <=
//!   desktop < 1920 <= extra large.
//! - Layout widths are never negative.

/// Width breakpoints in logical pixels.
pub mod breakpoints {
    pub const MOBILE: f64 = 320.0;
    pub const TABLET_SMALL: f64 = 480.0;
    pub const TABLET_LARGE: f64 = 768.0;
    pub const DESKTOP_SMALL: f64 = 1024.0;
    pub const DESKTOP_LARGE: f64 = 1440.0;
    pub const EXTRA_LARGE: f64 = 1920.0;
}

const CARD_CONTAINER_GUTTER: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Mobile,
    Tablet,
    Desktop,
    ExtraLarge,
}

impl SizeClass {
    pub fn for_width(width: f64) -> Self {
        if width < breakpoints::TABLET_SMALL {
            Self::Mobile
        } else if width < breakpoints::DESKTOP_SMALL {
            Self::Tablet
        } else if width < breakpoints::EXTRA_LARGE {
            Self::Desktop
        } else {
            Self::ExtraLarge
        }
    }
}

/// One value per size class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Responsive<T> {
    pub mobile: T,
    pub tablet: T,
    pub desktop: T,
    pub extra_large: T,
}

impl<T: Copy> Responsive<T> {
    pub const fn new(mobile: T, tablet: T, desktop: T, extra_large: T) -> Self {
        Self {
            mobile,
            tablet,
            desktop,
            extra_large,
        }
    }

    pub fn pick(&self, class: SizeClass) -> T {
        match class {
            SizeClass::Mobile => self.mobile,
            SizeClass::Tablet => self.tablet,
            SizeClass::Desktop => self.desktop,
            SizeClass::ExtraLarge => self.extra_large,
        }
    }

    pub fn for_width(&self, width: f64) -> T {
        self.pick(SizeClass::for_width(width))
    }
}

pub const MARGIN: Responsive<f64> = Responsive::new(12.0, 28.0, 40.0, 60.0);
pub const PADDING: Responsive<f64> = Responsive::new(12.0, 28.0, 40.0, 60.0);
pub const H1: Responsive<f64> = Responsive::new(26.0, 36.0, 48.0, 56.0);
pub const H2: Responsive<f64> = Responsive::new(22.0, 30.0, 40.0, 48.0);
pub const BODY: Responsive<f64> = Responsive::new(16.0, 18.0, 22.0, 26.0);
pub const SMALL: Responsive<f64> = Responsive::new(13.0, 15.0, 18.0, 20.0);

/// Upper bound of the dashboard card container per size class.
pub const CARD_CONTAINER_CAP: Responsive<f64> = Responsive::new(350.0, 700.0, 900.0, 1200.0);

/// Dashboard grid geometry for one window width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardLayout {
    pub container_width: f64,
    pub columns: usize,
    pub item_width: f64,
}

impl DashboardLayout {
    pub fn for_width(width: f64) -> Self {
        let cap = CARD_CONTAINER_CAP.for_width(width);
        let container_width = if width > cap {
            cap
        } else {
            (width - CARD_CONTAINER_GUTTER).max(0.0)
        };
        let columns = columns_for_width(width);
        let item_width = ((container_width - CARD_CONTAINER_GUTTER) / columns as f64).max(0.0);
        Self {
            container_width,
            columns,
            item_width,
        }
    }

    /// Splits items into rows of `columns` entries, last row possibly short.
    pub fn rows<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items.chunks(self.columns.max(1)).collect()
    }
}

/// 3 columns from large desktops, 2 from large tablets, otherwise 1.
pub fn columns_for_width(width: f64) -> usize {
    if width >= breakpoints::DESKTOP_LARGE {
        3
    } else if width >= breakpoints::TABLET_LARGE {
        2
    } else {
        1
    }
}
