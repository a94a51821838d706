#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bbox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, String> {
        if !(-180.0..=180.0).contains(&xmin) || !(-180.0..=180.0).contains(&xmax) {
            return Err("Longitude values must be between -180 and 180".to_string());
        }

        if !(-90.0..=90.0).contains(&ymin) || !(-90.0..=90.0).contains(&ymax) {
            return Err("Latitude values must be between -90 and 90".to_string());
        }

        if xmin > xmax || ymin > ymax {
            return Err("Min values must be <= max values".to_string());
        }

        Ok(Bbox {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Extent of a set of (lon, lat) points, ignoring non-finite coordinates.
    pub fn from_points<I>(points: I) -> Option<Result<Self, String>>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut extent: Option<(f64, f64, f64, f64)> = None;

        for (lon, lat) in points {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            extent = Some(match extent {
                None => (lon, lon, lat, lat),
                Some((xmin, xmax, ymin, ymax)) => {
                    (xmin.min(lon), xmax.max(lon), ymin.min(lat), ymax.max(lat))
                }
            });
        }

        extent.map(|(xmin, xmax, ymin, ymax)| Bbox::new(xmin, xmax, ymin, ymax))
    }

    /// Grow by `dx`/`dy` on each side, clamped to the geographic ranges.
    pub fn padded(&self, dx: f64, dy: f64) -> Self {
        Bbox {
            xmin: (self.xmin - dx.abs()).max(-180.0),
            xmax: (self.xmax + dx.abs()).min(180.0),
            ymin: (self.ymin - dy.abs()).max(-90.0),
            ymax: (self.ymax + dy.abs()).min(90.0),
        }
    }
}
