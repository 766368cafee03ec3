//! Parameter introspection for discoverable effect parameters.
//!
//! Every effect describes its controls through [`ParameterInfo`]: an
//! index-based table of [`ParamDescriptor`]s plus getters and setters in
//! plain units. The chain builds its atomic parameter store from these
//! tables, hosts and the CLI list them, and presets address them by
//! `string_id`.
//!
//! Each descriptor carries:
//!
//! - [`ParamId`]: stable numeric ID for automation and persistence
//! - [`ParamScale`]: normalization curve (linear, logarithmic, power)
//! - [`ParamFlags`]: capability flags (automatable, stepped, ...)
//! - `string_id`: human-readable stable key used in presets and state blobs
//! - `labels`: option names for closed-choice parameters
//!
//! Effects usually implement the trait with [`impl_params!`](crate::impl_params),
//! which keeps each descriptor next to its getter and setter.
//!
//! # Example
//!
//! ```rust
//! use cadena_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct SimpleGain {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for SimpleGain {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0)
//!                 .with_id(ParamId(100), "gain_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-60.0, 12.0);
//!         }
//!     }
//! }
//! ```

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default).
    #[default]
    Linear,
    /// Logarithmic mapping for frequency-like parameters. Requires `min > 0.0`.
    Logarithmic,
    /// Power curve. Exponents below 1.0 give more resolution at the low end.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
///
/// # Convention
///
/// Each effect gets a base ID in steps of 100; params are sequential from
/// there (phaser 100.., chorus 200.., saturator 300.., ladder 400.., filter 500..).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// ```rust
/// use cadena_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter takes discrete integer values (closed choice).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for effects that expose introspectable parameters.
///
/// Parameters are addressed by zero-based index, stable for the lifetime of
/// the type. Values are in the descriptor's plain units (percent, Hz, dB);
/// closed-choice parameters use the option index as a whole number.
pub trait ParameterInfo {
    /// Number of parameters; valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`. Out-of-range indices read `0.0`.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamped to its range. Out-of-range
    /// indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter by its `string_id`.
    fn param_index_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count())
            .find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }

    /// Finds a parameter by name or short name, ignoring ASCII case.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name) || d.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name (e.g., "Centre Delay").
    pub name: &'static str,
    /// Short name for narrow displays, 8 characters or fewer.
    pub short_name: &'static str,
    /// Unit used when formatting the value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value on construction and after a reset to defaults.
    pub default: f32,
    /// Recommended increment for encoder-style control.
    pub step: f32,
    /// Stable numeric ID. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable text key, `"effect_param"` by convention (e.g. `"chorus_mix"`).
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Option names for closed-choice parameters; empty for continuous ones.
    pub labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Generic continuous parameter with no unit.
    pub const fn custom(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            labels: &[],
        }
    }

    /// Closed-choice parameter over `labels`, stored as the option index.
    ///
    /// ```rust
    /// use cadena_core::ParamDescriptor;
    ///
    /// let mode = ParamDescriptor::choice("Mode", "Mode", &["Low", "High"], 1);
    /// assert_eq!(mode.max, 1.0);
    /// assert_eq!(mode.label(1.0), Some("High"));
    /// assert!(mode.is_choice());
    /// ```
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        let last = if labels.is_empty() { 0 } else { labels.len() - 1 };
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: last as f32,
            default: default_index as f32,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels,
        }
    }

    /// Wet/dry mix in percent.
    pub const fn mix(min: f32, default: f32) -> Self {
        Self::custom("Mix", "Mix", min, 100.0, default).with_unit(ParamUnit::Percent)
    }

    /// Modulation depth in percent.
    pub const fn depth(min: f32, default: f32) -> Self {
        Self::custom("Depth", "Depth", min, 100.0, default).with_unit(ParamUnit::Percent)
    }

    /// Bipolar feedback in percent (−100 to 100).
    pub const fn feedback() -> Self {
        Self::custom("Feedback", "Fdbk", -100.0, 100.0, 0.0)
            .with_unit(ParamUnit::Percent)
            .with_step(1.0)
    }

    /// Modulation rate in Hz, logarithmically scaled.
    pub const fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self::custom("Rate", "Rate", min, max, default)
            .with_unit(ParamUnit::Hertz)
            .with_scale(ParamScale::Logarithmic)
    }

    /// Frequency in Hz, logarithmically scaled.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, min, max, default)
            .with_unit(ParamUnit::Hertz)
            .with_scale(ParamScale::Logarithmic)
            .with_step(1.0)
    }

    /// Time in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, min, max, default)
            .with_unit(ParamUnit::Milliseconds)
            .with_step(0.1)
    }

    /// Gain in decibels.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, min, max, default)
            .with_unit(ParamUnit::Decibels)
            .with_step(0.1)
    }

    /// Sets the stable numeric ID and string ID.
    ///
    /// ```rust
    /// use cadena_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::mix(1.0, 5.0).with_id(ParamId(204), "chorus_mix");
    /// assert_eq!(desc.id, ParamId(204));
    /// assert_eq!(desc.string_id, "chorus_mix");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the encoder step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the capability flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns `true` for closed-choice parameters.
    pub const fn is_choice(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Number of options for a choice parameter, zero otherwise.
    pub const fn choice_count(&self) -> usize {
        self.labels.len()
    }

    /// Label for a choice value, rounding to the nearest option.
    pub fn label(&self, value: f32) -> Option<&'static str> {
        if !self.is_choice() {
            return None;
        }
        let index = libm::roundf(self.clamp(value)) as usize;
        self.labels.get(index).copied()
    }

    /// Option index for a label, ignoring ASCII case.
    pub fn choice_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.eq_ignore_ascii_case(label))
    }

    /// Clamps a value to the valid range. Choice values also snap to the
    /// nearest whole option.
    ///
    /// ```rust
    /// use cadena_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Gain", "Gain", -24.0, 24.0, 0.0);
    /// assert_eq!(desc.clamp(-100.0), -24.0);
    /// assert_eq!(desc.clamp(3.0), 3.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let clamped = if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        if self.flags.contains(ParamFlags::STEPPED) {
            libm::roundf(clamped)
        } else {
            clamped
        }
    }

    /// Converts a plain value to the normalized range (0.0 to 1.0).
    ///
    /// ```rust
    /// use cadena_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::mix(0.0, 50.0);
    /// assert_eq!(desc.normalize(50.0), 0.5);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::Power(exp) => libm::powf((value - self.min) / range, 1.0 / exp),
        }
    }

    /// Converts a normalized value (0.0 to 1.0) back to plain units.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let plain = match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
            ParamScale::Power(exp) => {
                self.min + libm::powf(normalized, exp) * (self.max - self.min)
            }
        };
        self.clamp(plain)
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Milliseconds.
    Milliseconds,
    /// Percent.
    Percent,
    /// Ratio (n:1), e.g. drive amount.
    Ratio,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix appended to a formatted value.
    ///
    /// ```rust
    /// use cadena_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Implements [`ParameterInfo`] from a table of descriptors, getters and setters.
///
/// Each row names the index, the descriptor expression, a getter expression
/// and a setter closure body. The identifier after the type names the `self`
/// binding used inside the rows.
///
/// ```rust
/// use cadena_core::{ParamDescriptor, ParamId, ParameterInfo, impl_params};
///
/// struct Tone {
///     level: f32,
/// }
///
/// impl_params! {
///     Tone, this {
///         [0] ParamDescriptor::gain_db("Level", "Level", -12.0, 12.0, 0.0)
///                 .with_id(ParamId(1), "tone_level"),
///             get: this.level,
///             set: |v| this.level = v.clamp(-12.0, 12.0);
///     }
/// }
///
/// let mut tone = Tone { level: 0.0 };
/// tone.set_param(0, 30.0);
/// assert_eq!(tone.get_param(0), 12.0);
/// assert_eq!(tone.param_count(), 1);
/// ```
#[macro_export]
macro_rules! impl_params {
    (
        $ty:ty, $this:ident {
            $(
                [$idx:literal] $desc:expr,
                    get: $get:expr,
                    set: |$v:ident| $set:expr;
            )*
        }
    ) => {
        impl $crate::ParameterInfo for $ty {
            fn param_count(&self) -> usize {
                [$($idx),*].len()
            }

            fn param_info(&self, index: usize) -> Option<$crate::ParamDescriptor> {
                match index {
                    $($idx => Some($desc),)*
                    _ => None,
                }
            }

            fn get_param(&self, index: usize) -> f32 {
                let $this = self;
                match index {
                    $($idx => $get,)*
                    _ => 0.0,
                }
            }

            fn set_param(&mut self, index: usize, value: f32) {
                let $this = self;
                match index {
                    $($idx => {
                        let $v = value;
                        $set;
                    })*
                    _ => {}
                }
            }
        }
    };
}
