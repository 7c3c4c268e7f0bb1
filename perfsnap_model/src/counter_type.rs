//! Counter type taxonomy
//!
//! Every raw sample declares what kind of counter produced it. The kind fixes
//! how many samples are needed to report a value, whether a paired base
//! counter is involved and which clock the timestamps are read from. Counter
//! kinds are grouped into a [`Family`] of related formulas.
//!
//! Operating systems identify counter kinds by a packed numeric code. Those
//! codes are accepted at the boundary through `TryFrom<u32>` and never used
//! past it.

use serde::{Deserialize, Serialize};

/// Errors produced when converting native counter type codes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The numeric code does not name a known counter type.
    #[error("Unknown counter type code: {code:#010x}")]
    UnknownCode {
        /// The offending code
        code: u32,
    },
}

/// The broad formula family a [`CounterType`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// The raw value is the reported value.
    Instantaneous,
    /// Counts or busy time per unit of elapsed time.
    Rate,
    /// Change in the raw value per change in the base value.
    Average,
    /// Sampled fraction or sampled rate.
    Sample,
    /// Raw value over base value, as a percentage.
    Fraction,
    /// Change in the raw value between two reads.
    Delta,
    /// Time since an object started.
    ElapsedTime,
    /// Timer over several concurrently measured components.
    MultiTimer,
    /// Denominator of another counter, never displayed.
    Base,
}

/// The closed set of counter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterType {
    /// Instantaneous 32-bit count, displayed in hexadecimal.
    NumberOfItemsHex32,
    /// Instantaneous 64-bit count, displayed in hexadecimal.
    NumberOfItemsHex64,
    /// Instantaneous 32-bit count.
    #[default]
    NumberOfItems32,
    /// Instantaneous 64-bit count.
    NumberOfItems64,
    /// Change in a 32-bit count between two reads.
    CounterDelta32,
    /// Change in a 64-bit count between two reads.
    CounterDelta64,
    /// Sampled count per second.
    SampleCounter,
    /// Average 32-bit count per timer tick, typically a queue length.
    CountPerTimeInterval32,
    /// Average 64-bit count per timer tick, typically a queue length.
    CountPerTimeInterval64,
    /// 32-bit count per second.
    RateOfCountsPerSecond32,
    /// 64-bit count per second.
    RateOfCountsPerSecond64,
    /// Instantaneous ratio of the raw value to its base, as a percentage.
    RawFraction,
    /// Percentage of elapsed time a component was busy.
    CounterTimer,
    /// Percentage of elapsed time a component was busy, in 100ns units.
    Timer100Ns,
    /// Percentage of sampled events that were successful.
    SampleFraction,
    /// Percentage of elapsed time a component was idle.
    CounterTimerInverse,
    /// Percentage of elapsed time a component was idle, in 100ns units.
    Timer100NsInverse,
    /// Busy time across several components.
    CounterMultiTimer,
    /// Busy time across several components, in 100ns units.
    CounterMultiTimer100Ns,
    /// Idle time across several components.
    CounterMultiTimerInverse,
    /// Idle time across several components, in 100ns units.
    CounterMultiTimer100NsInverse,
    /// Average seconds per operation.
    AverageTimer32,
    /// Seconds since the measured object started.
    ElapsedTime,
    /// Average count per operation.
    AverageCount64,
    /// Base for [`CounterType::SampleFraction`].
    SampleBase,
    /// Base for [`CounterType::AverageTimer32`] and [`CounterType::AverageCount64`].
    AverageBase,
    /// Base for [`CounterType::RawFraction`].
    RawBase,
    /// Base for the multi-timer kinds, the number of measured components.
    CounterMultiBase,
}

impl CounterType {
    /// Every counter type, in native code order.
    pub const ALL: [CounterType; 28] = [
        CounterType::NumberOfItemsHex32,
        CounterType::NumberOfItemsHex64,
        CounterType::NumberOfItems32,
        CounterType::NumberOfItems64,
        CounterType::CounterDelta32,
        CounterType::CounterDelta64,
        CounterType::SampleCounter,
        CounterType::CountPerTimeInterval32,
        CounterType::CountPerTimeInterval64,
        CounterType::RateOfCountsPerSecond32,
        CounterType::RateOfCountsPerSecond64,
        CounterType::RawFraction,
        CounterType::CounterTimer,
        CounterType::Timer100Ns,
        CounterType::SampleFraction,
        CounterType::CounterTimerInverse,
        CounterType::Timer100NsInverse,
        CounterType::CounterMultiTimer,
        CounterType::CounterMultiTimer100Ns,
        CounterType::CounterMultiTimerInverse,
        CounterType::CounterMultiTimer100NsInverse,
        CounterType::AverageTimer32,
        CounterType::ElapsedTime,
        CounterType::AverageCount64,
        CounterType::SampleBase,
        CounterType::AverageBase,
        CounterType::RawBase,
        CounterType::CounterMultiBase,
    ];

    /// The native numeric code of this counter type.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            CounterType::NumberOfItemsHex32 => 0x0000_0000,
            CounterType::NumberOfItemsHex64 => 0x0000_0100,
            CounterType::NumberOfItems32 => 0x0001_0000,
            CounterType::NumberOfItems64 => 0x0001_0100,
            CounterType::CounterDelta32 => 0x0040_0400,
            CounterType::CounterDelta64 => 0x0040_0500,
            CounterType::SampleCounter => 0x0041_0400,
            CounterType::CountPerTimeInterval32 => 0x0045_0400,
            CounterType::CountPerTimeInterval64 => 0x0045_0500,
            CounterType::RateOfCountsPerSecond32 => 0x1041_0400,
            CounterType::RateOfCountsPerSecond64 => 0x1041_0500,
            CounterType::RawFraction => 0x2002_0400,
            CounterType::CounterTimer => 0x2041_0500,
            CounterType::Timer100Ns => 0x2051_0500,
            CounterType::SampleFraction => 0x20C2_0400,
            CounterType::CounterTimerInverse => 0x2141_0500,
            CounterType::Timer100NsInverse => 0x2151_0500,
            CounterType::CounterMultiTimer => 0x2241_0500,
            CounterType::CounterMultiTimer100Ns => 0x2251_0500,
            CounterType::CounterMultiTimerInverse => 0x2341_0500,
            CounterType::CounterMultiTimer100NsInverse => 0x2351_0500,
            CounterType::AverageTimer32 => 0x3002_0400,
            CounterType::ElapsedTime => 0x3024_0500,
            CounterType::AverageCount64 => 0x4002_0500,
            CounterType::SampleBase => 0x4003_0401,
            CounterType::AverageBase => 0x4003_0402,
            CounterType::RawBase => 0x4003_0403,
            CounterType::CounterMultiBase => 0x4203_0500,
        }
    }

    /// The formula family of this counter type.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            CounterType::NumberOfItemsHex32
            | CounterType::NumberOfItemsHex64
            | CounterType::NumberOfItems32
            | CounterType::NumberOfItems64 => Family::Instantaneous,
            CounterType::RateOfCountsPerSecond32
            | CounterType::RateOfCountsPerSecond64
            | CounterType::CountPerTimeInterval32
            | CounterType::CountPerTimeInterval64
            | CounterType::CounterTimer
            | CounterType::CounterTimerInverse
            | CounterType::Timer100Ns
            | CounterType::Timer100NsInverse => Family::Rate,
            CounterType::AverageTimer32 | CounterType::AverageCount64 => Family::Average,
            CounterType::SampleFraction | CounterType::SampleCounter => Family::Sample,
            CounterType::RawFraction => Family::Fraction,
            CounterType::CounterDelta32 | CounterType::CounterDelta64 => Family::Delta,
            CounterType::ElapsedTime => Family::ElapsedTime,
            CounterType::CounterMultiTimer
            | CounterType::CounterMultiTimer100Ns
            | CounterType::CounterMultiTimerInverse
            | CounterType::CounterMultiTimer100NsInverse => Family::MultiTimer,
            CounterType::SampleBase
            | CounterType::AverageBase
            | CounterType::RawBase
            | CounterType::CounterMultiBase => Family::Base,
        }
    }

    /// Whether this type only exists as the denominator of another.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self.family(), Family::Base)
    }

    /// The base counter type this type is paired with, if any.
    #[must_use]
    pub const fn base_type(self) -> Option<CounterType> {
        match self {
            CounterType::RawFraction => Some(CounterType::RawBase),
            CounterType::AverageTimer32 | CounterType::AverageCount64 => {
                Some(CounterType::AverageBase)
            }
            CounterType::SampleFraction => Some(CounterType::SampleBase),
            CounterType::CounterMultiTimer
            | CounterType::CounterMultiTimer100Ns
            | CounterType::CounterMultiTimerInverse
            | CounterType::CounterMultiTimer100NsInverse => Some(CounterType::CounterMultiBase),
            _ => None,
        }
    }

    /// Whether a value can only be computed from two successive samples.
    #[must_use]
    pub const fn needs_previous(self) -> bool {
        matches!(
            self.family(),
            Family::Rate | Family::Average | Family::Sample | Family::Delta | Family::MultiTimer
        )
    }

    /// Whether the formula divides by the sample's counter frequency.
    #[must_use]
    pub const fn needs_frequency(self) -> bool {
        matches!(
            self,
            CounterType::RateOfCountsPerSecond32
                | CounterType::RateOfCountsPerSecond64
                | CounterType::SampleCounter
                | CounterType::AverageTimer32
                | CounterType::ElapsedTime
        )
    }

    /// Whether elapsed time is read from the 100ns timestamp.
    #[must_use]
    pub const fn uses_100ns_clock(self) -> bool {
        matches!(
            self,
            CounterType::Timer100Ns
                | CounterType::Timer100NsInverse
                | CounterType::CounterMultiTimer100Ns
                | CounterType::CounterMultiTimer100NsInverse
        )
    }

    /// Whether the value is displayed in hexadecimal.
    #[must_use]
    pub const fn is_hex(self) -> bool {
        matches!(
            self,
            CounterType::NumberOfItemsHex32 | CounterType::NumberOfItemsHex64
        )
    }

    /// Whether the value reports idle rather than busy time.
    #[must_use]
    pub const fn is_inverse(self) -> bool {
        matches!(
            self,
            CounterType::CounterTimerInverse
                | CounterType::Timer100NsInverse
                | CounterType::CounterMultiTimerInverse
                | CounterType::CounterMultiTimer100NsInverse
        )
    }
}

impl TryFrom<u32> for CounterType {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        CounterType::ALL
            .iter()
            .copied()
            .find(|ty| ty.code() == code)
            .ok_or(Error::UnknownCode { code })
    }
}

impl From<CounterType> for u32 {
    fn from(ty: CounterType) -> Self {
        ty.code()
    }
}

impl std::fmt::Display for CounterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CounterType::NumberOfItemsHex32 => "NumberOfItemsHEX32",
            CounterType::NumberOfItemsHex64 => "NumberOfItemsHEX64",
            CounterType::NumberOfItems32 => "NumberOfItems32",
            CounterType::NumberOfItems64 => "NumberOfItems64",
            CounterType::CounterDelta32 => "CounterDelta32",
            CounterType::CounterDelta64 => "CounterDelta64",
            CounterType::SampleCounter => "SampleCounter",
            CounterType::CountPerTimeInterval32 => "CountPerTimeInterval32",
            CounterType::CountPerTimeInterval64 => "CountPerTimeInterval64",
            CounterType::RateOfCountsPerSecond32 => "RateOfCountsPerSecond32",
            CounterType::RateOfCountsPerSecond64 => "RateOfCountsPerSecond64",
            CounterType::RawFraction => "RawFraction",
            CounterType::CounterTimer => "CounterTimer",
            CounterType::Timer100Ns => "Timer100Ns",
            CounterType::SampleFraction => "SampleFraction",
            CounterType::CounterTimerInverse => "CounterTimerInverse",
            CounterType::Timer100NsInverse => "Timer100NsInverse",
            CounterType::CounterMultiTimer => "CounterMultiTimer",
            CounterType::CounterMultiTimer100Ns => "CounterMultiTimer100Ns",
            CounterType::CounterMultiTimerInverse => "CounterMultiTimerInverse",
            CounterType::CounterMultiTimer100NsInverse => "CounterMultiTimer100NsInverse",
            CounterType::AverageTimer32 => "AverageTimer32",
            CounterType::ElapsedTime => "ElapsedTime",
            CounterType::AverageCount64 => "AverageCount64",
            CounterType::SampleBase => "SampleBase",
            CounterType::AverageBase => "AverageBase",
            CounterType::RawBase => "RawBase",
            CounterType::CounterMultiBase => "CounterMultiBase",
        };
        f.write_str(name)
    }
}
