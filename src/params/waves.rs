//! Wave shading parameters and the name-indexed store surface.

use log::warn;

/// Value held by one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Vec2([f32; 2]),
    Rgb([f32; 3]),
}

/// Slider metadata consumed by the debug panel.
///
/// The render path never clamps; these bounds constrain UI input only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f64,
}

/// Identifier for one parameter slot in [`WaveParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Wavelength,
    Frequency,
    WaveSpeed,
    DepthColor,
    SurfaceColor,
    ColorOffset,
    ColorMultiplier,
    SmallWaveElevation,
    SmallWaveFrequency,
    SmallWaveSpeed,
    Time,
}

impl ParamId {
    pub const ALL: [ParamId; 11] = [
        ParamId::Wavelength,
        ParamId::Frequency,
        ParamId::WaveSpeed,
        ParamId::DepthColor,
        ParamId::SurfaceColor,
        ParamId::ColorOffset,
        ParamId::ColorMultiplier,
        ParamId::SmallWaveElevation,
        ParamId::SmallWaveFrequency,
        ParamId::SmallWaveSpeed,
        ParamId::Time,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Wavelength => "wavelength",
            ParamId::Frequency => "frequency",
            ParamId::WaveSpeed => "wave_speed",
            ParamId::DepthColor => "depth_color",
            ParamId::SurfaceColor => "surface_color",
            ParamId::ColorOffset => "color_offset",
            ParamId::ColorMultiplier => "color_multiplier",
            ParamId::SmallWaveElevation => "small_wave_elevation",
            ParamId::SmallWaveFrequency => "small_wave_frequency",
            ParamId::SmallWaveSpeed => "small_wave_speed",
            ParamId::Time => "time",
        }
    }

    /// Look up a parameter by name. Unknown names resolve to `None`.
    pub fn from_name(name: &str) -> Option<ParamId> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Slider range for panel-bound scalar parameters.
    ///
    /// Colors use a dedicated picker and the time slot is written by the
    /// render loop, so both return `None`.
    pub fn range(self) -> Option<SliderRange> {
        let (min, max) = match self {
            ParamId::Wavelength => (0.0, 1.0),
            ParamId::Frequency => (0.0, 10.0),
            ParamId::WaveSpeed => (0.0, 4.0),
            ParamId::ColorOffset => (0.0, 1.0),
            ParamId::ColorMultiplier => (0.0, 10.0),
            ParamId::SmallWaveElevation => (0.0, 1.0),
            ParamId::SmallWaveFrequency => (0.0, 30.0),
            ParamId::SmallWaveSpeed => (0.0, 30.0),
            ParamId::DepthColor | ParamId::SurfaceColor | ParamId::Time => return None,
        };
        Some(SliderRange {
            min,
            max,
            step: 0.001,
        })
    }
}

/// Wave shading parameters, the single source of truth for every frame's
/// uniform upload.
///
/// Created once with fixed defaults and mutated in place for the process
/// lifetime: the debug panel writes on user input, the render loop writes the
/// time slot and reads everything else when building uniforms. Both run on
/// the event-loop thread, so the last write before a frame always wins.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParams {
    /// Big-wave elevation scale (world units)
    pub wavelength: f32,

    /// Big-wave spatial frequency over world (x, z)
    pub frequency: [f32; 2],

    /// Big-wave animation speed (radians per second)
    pub wave_speed: f32,

    /// Color of wave troughs (linear-ish RGB, uploaded as stored)
    pub depth_color: [f32; 3],

    /// Color of wave crests
    pub surface_color: [f32; 3],

    /// Elevation offset applied before the color mix
    pub color_offset: f32,

    /// Elevation multiplier applied before the color mix
    pub color_multiplier: f32,

    /// Small-wave (noise) elevation scale (world units)
    pub small_wave_elevation: f32,

    /// Small-wave spatial frequency
    pub small_wave_frequency: f32,

    /// Small-wave animation speed
    pub small_wave_speed: f32,

    /// Elapsed scene time (seconds), written by the render loop every frame
    pub time: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            wavelength: 0.38,
            frequency: [5.0, 2.5],
            wave_speed: 0.75,
            depth_color: [0x2d as f32 / 255.0, 0x81 as f32 / 255.0, 0xae as f32 / 255.0],
            surface_color: [0x66 as f32 / 255.0, 0xc1 as f32 / 255.0, 0xf9 as f32 / 255.0],
            color_offset: 0.03,
            color_multiplier: 9.0,
            small_wave_elevation: 0.15,
            small_wave_frequency: 3.0,
            small_wave_speed: 0.2,
            time: 0.0,
        }
    }
}

impl WaveParams {
    pub fn get(&self, id: ParamId) -> ParamValue {
        match id {
            ParamId::Wavelength => ParamValue::Scalar(self.wavelength),
            ParamId::Frequency => ParamValue::Vec2(self.frequency),
            ParamId::WaveSpeed => ParamValue::Scalar(self.wave_speed),
            ParamId::DepthColor => ParamValue::Rgb(self.depth_color),
            ParamId::SurfaceColor => ParamValue::Rgb(self.surface_color),
            ParamId::ColorOffset => ParamValue::Scalar(self.color_offset),
            ParamId::ColorMultiplier => ParamValue::Scalar(self.color_multiplier),
            ParamId::SmallWaveElevation => ParamValue::Scalar(self.small_wave_elevation),
            ParamId::SmallWaveFrequency => ParamValue::Scalar(self.small_wave_frequency),
            ParamId::SmallWaveSpeed => ParamValue::Scalar(self.small_wave_speed),
            ParamId::Time => ParamValue::Scalar(self.time),
        }
    }

    /// Write a parameter. No range validation: out-of-range values are stored
    /// as-is. A value of the wrong kind is a developer-visible warning and
    /// leaves the slot unchanged.
    pub fn set(&mut self, id: ParamId, value: ParamValue) {
        match (id, value) {
            (ParamId::Wavelength, ParamValue::Scalar(v)) => self.wavelength = v,
            (ParamId::Frequency, ParamValue::Vec2(v)) => self.frequency = v,
            (ParamId::WaveSpeed, ParamValue::Scalar(v)) => self.wave_speed = v,
            (ParamId::DepthColor, ParamValue::Rgb(v)) => self.depth_color = v,
            (ParamId::SurfaceColor, ParamValue::Rgb(v)) => self.surface_color = v,
            (ParamId::ColorOffset, ParamValue::Scalar(v)) => self.color_offset = v,
            (ParamId::ColorMultiplier, ParamValue::Scalar(v)) => self.color_multiplier = v,
            (ParamId::SmallWaveElevation, ParamValue::Scalar(v)) => self.small_wave_elevation = v,
            (ParamId::SmallWaveFrequency, ParamValue::Scalar(v)) => self.small_wave_frequency = v,
            (ParamId::SmallWaveSpeed, ParamValue::Scalar(v)) => self.small_wave_speed = v,
            (ParamId::Time, ParamValue::Scalar(v)) => self.time = v,
            (id, value) => warn!("parameter {} rejects {:?}: wrong value kind", id.name(), value),
        }
    }
}

/// Parse a `#rrggbb` color into float RGB channels.
pub fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let packed = u32::from_str_radix(hex, 16).ok()?;
    Some([
        ((packed >> 16) & 0xff) as f32 / 255.0,
        ((packed >> 8) & 0xff) as f32 / 255.0,
        (packed & 0xff) as f32 / 255.0,
    ])
}

/// Format float RGB channels as `#rrggbb`.
pub fn format_hex_color(rgb: [f32; 3]) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    format!("#{:02x}{:02x}{:02x}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_declared_values() {
        let p = WaveParams::default();
        assert_eq!(p.wavelength, 0.38);
        assert_eq!(p.frequency, [5.0, 2.5]);
        assert_eq!(p.wave_speed, 0.75);
        assert_eq!(p.color_offset, 0.03);
        assert_eq!(p.color_multiplier, 9.0);
        assert_eq!(p.small_wave_elevation, 0.15);
        assert_eq!(p.small_wave_frequency, 3.0);
        assert_eq!(p.small_wave_speed, 0.2);
        assert_eq!(p.time, 0.0);
        assert_eq!(format_hex_color(p.depth_color), "#2d81ae");
        assert_eq!(format_hex_color(p.surface_color), "#66c1f9");
    }

    #[test]
    fn set_then_get_round_trips_every_parameter() {
        let mut p = WaveParams::default();
        for id in ParamId::ALL {
            let value = match p.get(id) {
                ParamValue::Scalar(_) => {
                    // Any in-range value; sliders bottom out at 0.
                    let v = id.range().map(|r| (r.min + r.max) / 2.0).unwrap_or(1.25);
                    ParamValue::Scalar(v)
                }
                ParamValue::Vec2(_) => ParamValue::Vec2([1.5, 9.5]),
                ParamValue::Rgb(_) => ParamValue::Rgb([0.1, 0.2, 0.3]),
            };
            p.set(id, value);
            assert_eq!(p.get(id), value, "round trip failed for {}", id.name());
        }
    }

    #[test]
    fn kind_mismatch_leaves_value_unchanged() {
        let mut p = WaveParams::default();
        p.set(ParamId::Wavelength, ParamValue::Rgb([1.0, 0.0, 0.0]));
        assert_eq!(p.wavelength, 0.38);
        p.set(ParamId::DepthColor, ParamValue::Scalar(7.0));
        assert_eq!(format_hex_color(p.depth_color), "#2d81ae");
        p.set(ParamId::Frequency, ParamValue::Scalar(1.0));
        assert_eq!(p.frequency, [5.0, 2.5]);
    }

    #[test]
    fn out_of_range_writes_are_not_rejected() {
        let mut p = WaveParams::default();
        p.set(ParamId::Wavelength, ParamValue::Scalar(42.0));
        assert_eq!(p.wavelength, 42.0);
    }

    #[test]
    fn name_lookup_round_trips_and_rejects_unknown() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_name(id.name()), Some(id));
        }
        assert_eq!(ParamId::from_name("uWaveLength"), None);
        assert_eq!(ParamId::from_name(""), None);
    }

    #[test]
    fn every_panel_slider_has_a_range() {
        for id in ParamId::ALL {
            match id {
                ParamId::DepthColor | ParamId::SurfaceColor | ParamId::Time => {
                    assert!(id.range().is_none())
                }
                _ => {
                    let r = id.range().expect("slider range");
                    assert!(r.min < r.max);
                    assert!(r.step > 0.0);
                }
            }
        }
    }

    #[test]
    fn hex_colors_round_trip() {
        for hex in ["#2d81ae", "#66c1f9", "#000000", "#ffffff"] {
            let rgb = parse_hex_color(hex).expect("valid hex");
            assert_eq!(format_hex_color(rgb), hex);
        }
        assert_eq!(parse_hex_color("2d81ae"), None);
        assert_eq!(parse_hex_color("#2d81a"), None);
        assert_eq!(parse_hex_color("#2d81ag"), None);
    }
}
